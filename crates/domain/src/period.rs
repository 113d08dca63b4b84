//! # 報告対象期間
//!
//! 件名・本文に埋め込む「先月」「四半期の開始月」「年」を現在時刻から求める。
//!
//! - 先月: 現在から 1 か月前の月名（英語のフル表記）
//! - 四半期の開始月: 現在から 3 か月前の月名
//! - 年: 現在の年
//!
//! 月の減算は短い月の末日に丸める（例: 3 月 31 日の 1 か月前は 2 月 28 日）。

use chrono::{DateTime, Datelike, Months, Utc};

/// 報告対象期間
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportingPeriod {
    /// 先月の月名（例: `"September"`）
    pub last_month:         String,
    /// 3 か月前の月名（例: `"July"`）
    pub last_quarter_month: String,
    /// 現在の年
    pub year:               i32,
}

impl ReportingPeriod {
    /// 現在時刻から報告対象期間を求める
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            last_month:         month_name_before(now, 1),
            last_quarter_month: month_name_before(now, 3),
            year:               now.year(),
        }
    }
}

fn month_name_before(now: DateTime<Utc>, months: u32) -> String {
    // 範囲外になるのは chrono の表現限界付近のみ
    let shifted = now.checked_sub_months(Months::new(months)).unwrap_or(now);
    shifted.format("%B").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn 先月と三か月前の月名を返す() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();

        let period = ReportingPeriod::at(now);

        assert_eq!(
            period,
            ReportingPeriod {
                last_month:         "September".to_string(),
                last_quarter_month: "July".to_string(),
                year:               2026,
            }
        );
    }

    #[rstest]
    #[case(2026, 1, 15, "December", "October")]
    #[case(2026, 3, 31, "February", "December")]
    #[case(2026, 5, 31, "April", "February")]
    fn 年や月末をまたいでも月名を丸めて返す(
        #[case] year: i32,
        #[case] month: u32,
        #[case] day: u32,
        #[case] last_month: &str,
        #[case] last_quarter_month: &str,
    ) {
        let now = Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap();

        let period = ReportingPeriod::at(now);

        assert_eq!(period.last_month, last_month);
        assert_eq!(period.last_quarter_month, last_quarter_month);
    }

    #[test]
    fn 年は先月ではなく現在の年を使う() {
        let now = Utc.with_ymd_and_hms(2027, 1, 5, 0, 0, 0).unwrap();

        let period = ReportingPeriod::at(now);

        assert_eq!(period.last_month, "December");
        assert_eq!(period.year, 2027);
    }
}
