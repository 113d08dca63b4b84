//! # 移籍種別
//!
//! 会費の支払い方法で区別される移籍バッチの種別。
//! 件名・本文の文言と添付ファイル名の接頭辞を決める。

/// 移籍種別
///
/// 表示形式は種別コード（`PIF` / `DD`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum TransferType {
    /// Paid in Full（一括払い会員）
    #[strum(serialize = "PIF")]
    Pif,
    /// Direct Debit（口座振替会員）
    #[strum(serialize = "DD")]
    Dd,
}

impl TransferType {
    /// 添付ファイル名: `{pif|dd}_club_transfer_{club}.csv`
    pub fn attachment_file_name(&self, club: &str) -> String {
        match self {
            Self::Dd => format!("dd_club_transfer_{club}.csv"),
            Self::Pif => format!("pif_club_transfer_{club}.csv"),
        }
    }
}
