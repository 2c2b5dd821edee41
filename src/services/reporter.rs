//! 成绩单渲染 - 能力层
//!
//! 将一个策略的成绩单渲染为终端表格：每个 URL 一行、每个分类一列，
//! 单元格为判定标记加四舍五入后的分数，最后是一行汇总。

use crate::models::{GradedCell, StrategyReport, Summary};
use phf::phf_map;

/// 已知 lighthouse 分类的显示名，未收录的分类直接显示原始 id
static CATEGORY_LABELS: phf::Map<&'static str, &'static str> = phf_map! {
    "performance" => "Performance",
    "accessibility" => "Accessibility",
    "best-practices" => "Best Practices",
    "seo" => "SEO",
    "pwa" => "PWA",
};

const SEPARATOR_WIDTH: usize = 64;

/// 渲染一个策略的成绩单
pub fn render(report: &StrategyReport) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(SEPARATOR_WIDTH);
    let light = "-".repeat(SEPARATOR_WIDTH);

    out.push_str(&heavy);
    out.push('\n');
    out.push_str(&format!("📋 策略: {}\n", report.strategy));
    out.push_str(&heavy);
    out.push('\n');

    let labels: Vec<&str> = report
        .rows
        .first()
        .map(|row| {
            row.cells
                .iter()
                .map(|cell| category_label(&cell.category))
                .collect()
        })
        .unwrap_or_default();

    let url_width = report
        .rows
        .iter()
        .map(|row| row.url.chars().count())
        .chain(std::iter::once("URL".len()))
        .max()
        .unwrap_or(3);

    let column_widths: Vec<usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            report
                .rows
                .iter()
                .map(|row| format_cell(&row.cells[i]).chars().count())
                .chain(std::iter::once(label.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    // 表头
    out.push_str(&pad("URL", url_width));
    for (label, width) in labels.iter().zip(&column_widths) {
        out.push_str("  ");
        out.push_str(&pad(label, *width));
    }
    out.push('\n');

    // 数据行（顺序与配置的 URL 顺序一致）
    for row in &report.rows {
        out.push_str(&pad(&row.url, url_width));
        for (cell, width) in row.cells.iter().zip(&column_widths) {
            out.push_str("  ");
            out.push_str(&pad(&format_cell(cell), *width));
        }
        out.push('\n');
    }

    out.push_str(&light);
    out.push('\n');
    out.push_str(&summary_line(&report.summary));
    out.push('\n');

    out
}

/// 汇总行
pub fn summary_line(summary: &Summary) -> String {
    if summary.fail > 0 {
        format!("❌ {}/{} 项检查未通过", summary.fail, summary.total)
    } else {
        format!("✅ 全部检查通过（共 {} 项）", summary.total)
    }
}

fn category_label(id: &str) -> &str {
    CATEGORY_LABELS.get(id).copied().unwrap_or(id)
}

/// 单元格：标记 + 四舍五入后的分数，引擎失败显示 `--`
fn format_cell(cell: &GradedCell) -> String {
    match cell.score {
        Some(score) => format!("{} {}", cell.verdict.marker(), score.round() as i64),
        None => format!("{} --", cell.verdict.marker()),
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}
