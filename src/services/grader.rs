//! 阈值判定 - 能力层
//!
//! 将一个策略的审计结果与配置阈值逐格比对，产出成绩单。
//! 不做 I/O，不关心调度顺序。

use crate::config::ActiveConfig;
use crate::models::{AuditResult, GradedCell, StrategyReport, Summary, UrlReport, Verdict};

/// 对一个策略的全部结果进行判定
///
/// 行顺序与传入结果的顺序一致（调度层保证等于配置的 URL 顺序）。
/// 参与判定的分类以配置为准：引擎失败（空分数）的结果，每个配置
/// 分类都记为失败；结果里出现但配置中不存在的分类直接忽略。
pub fn grade_strategy(
    results: &[AuditResult],
    strategy: &str,
    config: &ActiveConfig,
) -> StrategyReport {
    let mut summary = Summary::default();
    let mut rows = Vec::with_capacity(results.len());

    for result in results {
        let mut cells = Vec::with_capacity(config.categories.len());

        for (category, rule) in &config.categories {
            let score = result.scores.get(category).copied();
            let verdict = match score {
                Some(value) => Verdict::from_score(
                    value,
                    rule.threshold_for(strategy),
                    rule.lower_threshold_for(strategy),
                ),
                // 引擎没有给出该分类的分数，记为失败
                None => Verdict::Fail,
            };

            match verdict {
                Verdict::Pass => summary.pass += 1,
                Verdict::Warn => summary.warn += 1,
                Verdict::Fail => summary.fail += 1,
            }
            summary.total += 1;

            cells.push(GradedCell {
                category: category.clone(),
                score,
                verdict,
            });
        }

        rows.push(UrlReport {
            url: result.url.clone(),
            cells,
        });
    }

    StrategyReport {
        strategy: strategy.to_string(),
        rows,
        summary,
    }
}
