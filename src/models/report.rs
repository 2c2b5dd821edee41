//! 判定结果模型

/// 单元格判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// 分数 ≥ 及格线
    Pass,
    /// 不及格线 ≤ 分数 < 及格线
    Warn,
    /// 分数 < 不及格线
    Fail,
}

impl Verdict {
    /// 按阈值规则判定分数
    pub fn from_score(score: f64, threshold: f64, lower_threshold: f64) -> Self {
        if score < lower_threshold {
            Verdict::Fail
        } else if score < threshold {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }

    /// 终端显示标记
    pub fn marker(self) -> &'static str {
        match self {
            Verdict::Pass => "✅",
            Verdict::Warn => "⚠️",
            Verdict::Fail => "❌",
        }
    }
}

/// 一个分类在一个 URL 上的判定结果
#[derive(Debug, Clone)]
pub struct GradedCell {
    pub category: String,
    /// 引擎失败时为 `None`
    pub score: Option<f64>,
    pub verdict: Verdict,
}

/// 一个 URL 在某策略下的整行判定
#[derive(Debug, Clone)]
pub struct UrlReport {
    pub url: String,
    pub cells: Vec<GradedCell>,
}

/// 某策略的判定计数
#[derive(Debug, Clone, Copy, Default)]
pub struct Summary {
    pub pass: usize,
    pub warn: usize,
    pub fail: usize,
    pub total: usize,
}

/// 某策略的完整成绩单
///
/// 行顺序与配置中的 URL 顺序一致。
#[derive(Debug, Clone)]
pub struct StrategyReport {
    pub strategy: String,
    pub rows: Vec<UrlReport>,
    pub summary: Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_boundaries() {
        // 及格线 70，不及格线 50
        assert_eq!(Verdict::from_score(40.0, 70.0, 50.0), Verdict::Fail);
        assert_eq!(Verdict::from_score(49.9, 70.0, 50.0), Verdict::Fail);
        // 不及格线本身属于警告区间
        assert_eq!(Verdict::from_score(50.0, 70.0, 50.0), Verdict::Warn);
        assert_eq!(Verdict::from_score(65.0, 70.0, 50.0), Verdict::Warn);
        // 及格线本身属于通过区间
        assert_eq!(Verdict::from_score(70.0, 70.0, 50.0), Verdict::Pass);
        assert_eq!(Verdict::from_score(85.0, 70.0, 50.0), Verdict::Pass);
        assert_eq!(Verdict::from_score(100.0, 70.0, 50.0), Verdict::Pass);
    }
}
