//! # 移籍データ
//!
//! 入力 CSV の 1 行（[`TransferRow`]）と、そこから派生するクラブ単位の
//! 移籍レコード（[`TransferRecord`]）、およびその集約（[`ClubTransferSet`]）を定義する。
//!
//! ## 集約ルール
//!
//! 1 行の移籍につき 2 件のレコードを生成する:
//!
//! | 方向 | 帰属クラブ |
//! |------|-----------|
//! | [`TransferDirection::In`] | 移籍先（`target_club`） |
//! | [`TransferDirection::Out`] | 移籍元（`home_club`） |
//!
//! 同じ行から生成される 2 件は同一のタイムスタンプを共有する。
//! 重複排除は行わない。

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 入力 CSV の 1 行
///
/// 列順は CSV ヘッダーと一致する。クラブ名は入力のまま保持し、
/// 大文字小文字・前後の空白を区別する。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransferRow {
    #[serde(rename = "MemberID")]
    pub member_id:       String,
    #[serde(rename = "FobNumber")]
    pub fob_number:      String,
    #[serde(rename = "FirstName")]
    pub first_name:      String,
    #[serde(rename = "LastName")]
    pub last_name:       String,
    #[serde(rename = "MembershipType")]
    pub membership_type: String,
    #[serde(rename = "HomeClub")]
    pub home_club:       String,
    #[serde(rename = "TargetClub")]
    pub target_club:     String,
}

impl TransferRow {
    /// 入力 CSV のヘッダー（列順）
    pub const HEADERS: [&'static str; 7] = [
        "MemberID",
        "FobNumber",
        "FirstName",
        "LastName",
        "MembershipType",
        "HomeClub",
        "TargetClub",
    ];
}

/// 移籍の方向
///
/// 添付 CSV の `TransferType` 列には `TRANSFER IN` / `TRANSFER OUT` と出力される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransferDirection {
    /// 移籍先クラブから見た移籍
    #[serde(rename = "TRANSFER IN")]
    In,
    /// 移籍元クラブから見た移籍
    #[serde(rename = "TRANSFER OUT")]
    Out,
}

/// クラブに帰属する移籍レコード
///
/// [`TransferRow`] の全フィールドに方向とタイムスタンプを付与したもの。
/// フィールド順がそのまま添付 CSV の列順になる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferRecord {
    #[serde(rename = "MemberID")]
    pub member_id:       String,
    #[serde(rename = "FobNumber")]
    pub fob_number:      String,
    #[serde(rename = "FirstName")]
    pub first_name:      String,
    #[serde(rename = "LastName")]
    pub last_name:       String,
    #[serde(rename = "MembershipType")]
    pub membership_type: String,
    #[serde(rename = "HomeClub")]
    pub home_club:       String,
    #[serde(rename = "TargetClub")]
    pub target_club:     String,
    #[serde(rename = "TransferType")]
    pub direction:       TransferDirection,
    #[serde(rename = "TransferDate")]
    pub transfer_date:   DateTime<Utc>,
}

impl TransferRecord {
    /// 添付 CSV のヘッダー（列順）
    pub const HEADERS: [&'static str; 9] = [
        "MemberID",
        "FobNumber",
        "FirstName",
        "LastName",
        "MembershipType",
        "HomeClub",
        "TargetClub",
        "TransferType",
        "TransferDate",
    ];

    /// 移籍行から指定方向のレコードを生成する
    pub fn from_row(
        row: &TransferRow,
        direction: TransferDirection,
        transfer_date: DateTime<Utc>,
    ) -> Self {
        Self {
            member_id: row.member_id.clone(),
            fob_number: row.fob_number.clone(),
            first_name: row.first_name.clone(),
            last_name: row.last_name.clone(),
            membership_type: row.membership_type.clone(),
            home_club: row.home_club.clone(),
            target_club: row.target_club.clone(),
            direction,
            transfer_date,
        }
    }
}

/// クラブ名 → 移籍レコード列の集約
///
/// `BTreeMap` で保持するため、クラブはいつも名前順に走査される。
/// 各クラブのレコード列は入力行の順序を保ち、同一行では IN が OUT より先に並ぶ。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClubTransferSet {
    clubs: BTreeMap<String, Vec<TransferRecord>>,
}

impl ClubTransferSet {
    /// 移籍行をクラブ単位に集約する
    ///
    /// `transfer_date` は集約 1 回につき 1 度だけ取得した時刻を渡す。
    /// すべてのレコードが同じ時刻を共有する。
    pub fn aggregate(rows: &[TransferRow], transfer_date: DateTime<Utc>) -> Self {
        let mut clubs: BTreeMap<String, Vec<TransferRecord>> = BTreeMap::new();

        for row in rows {
            let transfer_in = TransferRecord::from_row(row, TransferDirection::In, transfer_date);
            let transfer_out =
                TransferRecord::from_row(row, TransferDirection::Out, transfer_date);

            clubs
                .entry(row.target_club.clone())
                .or_default()
                .push(transfer_in);
            clubs
                .entry(row.home_club.clone())
                .or_default()
                .push(transfer_out);
        }

        Self { clubs }
    }

    /// クラブ名とレコード列を名前順に返す
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TransferRecord])> {
        self.clubs
            .iter()
            .map(|(club, records)| (club.as_str(), records.as_slice()))
    }

    /// 指定クラブのレコード列
    pub fn records_for(&self, club: &str) -> Option<&[TransferRecord]> {
        self.clubs.get(club).map(Vec::as_slice)
    }

    /// クラブ数
    pub fn len(&self) -> usize {
        self.clubs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clubs.is_empty()
    }

    /// 全クラブのレコード総数
    pub fn record_count(&self) -> usize {
        self.clubs.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn row(member_id: &str, home_club: &str, target_club: &str) -> TransferRow {
        TransferRow {
            member_id:       member_id.to_string(),
            fob_number:      format!("F-{member_id}"),
            first_name:      "Alice".to_string(),
            last_name:       "Smith".to_string(),
            membership_type: "Gold".to_string(),
            home_club:       home_club.to_string(),
            target_club:     target_club.to_string(),
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    #[test]
    fn 一行の移籍から移籍先にinと移籍元にoutが生成される() {
        let rows = vec![row("M1", "ClubA", "ClubB")];

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        assert_eq!(set.len(), 2);
        let club_b = set.records_for("ClubB").unwrap();
        assert_eq!(club_b.len(), 1);
        assert_eq!(club_b[0].direction, TransferDirection::In);
        assert_eq!(club_b[0].first_name, "Alice");

        let club_a = set.records_for("ClubA").unwrap();
        assert_eq!(club_a.len(), 1);
        assert_eq!(club_a[0].direction, TransferDirection::Out);
        assert_eq!(club_a[0].member_id, "M1");
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(5)]
    #[case(40)]
    fn レコード総数は行数の二倍になる(#[case] count: usize) {
        let rows: Vec<TransferRow> = (0..count)
            .map(|i| row(&format!("M{i}"), &format!("Club{}", i % 3), &format!("Club{}", i % 4)))
            .collect();

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        assert_eq!(set.record_count(), count * 2);
        let ins = set
            .iter()
            .flat_map(|(_, records)| records)
            .filter(|r| r.direction == TransferDirection::In)
            .count();
        assert_eq!(ins, count);
    }

    #[test]
    fn クラブ内のレコードは入力行の順序を保つ() {
        let rows = vec![
            row("M1", "ClubA", "ClubB"),
            row("M2", "ClubC", "ClubA"),
            row("M3", "ClubA", "ClubC"),
        ];

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        let club_a: Vec<(&str, TransferDirection)> = set
            .records_for("ClubA")
            .unwrap()
            .iter()
            .map(|r| (r.member_id.as_str(), r.direction))
            .collect();
        assert_eq!(
            club_a,
            vec![
                ("M1", TransferDirection::Out),
                ("M2", TransferDirection::In),
                ("M3", TransferDirection::Out),
            ]
        );
    }

    #[test]
    fn 同一クラブ内の移籍ではinがoutより先に並ぶ() {
        let rows = vec![row("M1", "ClubA", "ClubA")];

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        let records = set.records_for("ClubA").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].direction, TransferDirection::In);
        assert_eq!(records[1].direction, TransferDirection::Out);
    }

    #[test]
    fn すべてのレコードが同じタイムスタンプを共有する() {
        let rows = vec![row("M1", "ClubA", "ClubB"), row("M2", "ClubB", "ClubC")];

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        assert!(
            set.iter()
                .flat_map(|(_, records)| records)
                .all(|r| r.transfer_date == fixed_now())
        );
    }

    #[test]
    fn クラブ名は大文字小文字と空白を区別する() {
        let rows = vec![row("M1", "clubA", "ClubA "), row("M2", "ClubA", "ClubB")];

        let set = ClubTransferSet::aggregate(&rows, fixed_now());

        let names: Vec<&str> = set.iter().map(|(club, _)| club).collect();
        assert_eq!(names, vec!["ClubA", "ClubA ", "ClubB", "clubA"]);
    }

    #[test]
    fn 空の入力では空の集約になる() {
        let set = ClubTransferSet::aggregate(&[], fixed_now());

        assert!(set.is_empty());
        assert_eq!(set.record_count(), 0);
    }
}
