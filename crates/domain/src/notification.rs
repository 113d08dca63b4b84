//! # 通知
//!
//! クラブ宛て移籍通知メールに関するドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 |
//! |---|------------|
//! | [`OutboundMessage`] | クラブ 1 件分の送信メッセージ（本文 + 添付 CSV） |
//! | [`NoticeContent`] | 移籍種別と報告対象期間から決まる件名・本文の文言 |
//! | [`NotificationError`] | メッセージ構築・送信の失敗 |
//!
//! ## 設計方針
//!
//! - **best-effort**: 1 クラブの失敗は他クラブの処理に影響しない
//! - **文言と骨格の分離**: 件名・本文の文言はここで決め、HTML の骨格はテンプレートが持つ

use thiserror::Error;

use crate::{period::ReportingPeriod, transfer_type::TransferType};

/// 通知エラー
#[derive(Debug, Error)]
pub enum NotificationError {
    /// 添付ファイルや MIME メッセージの構築に失敗
    #[error("メッセージ構築に失敗: {0}")]
    ComposeFailed(String),

    /// メール送信に失敗
    #[error("メール送信に失敗: {0}")]
    SendFailed(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

/// 送信メッセージ
///
/// クラブごとに組み立て、MIME 化して送信した後は破棄する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// 送信元メールアドレス
    pub sender:          String,
    /// 送信先メールアドレス
    pub recipient:       String,
    /// 件名
    pub subject:         String,
    /// HTML 本文
    pub html_body:       String,
    /// 添付ファイル名
    pub attachment_name: String,
    /// 添付ファイルの内容
    pub attachment:      Vec<u8>,
}

impl OutboundMessage {
    /// プレーンテキスト版の本文（HTML タグを除去したもの）
    pub fn text_body(&self) -> String {
        strip_html_tags(&self.html_body)
    }
}

/// 件名と本文の文言
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeContent {
    pub subject:       String,
    pub body_sentence: String,
}

impl NoticeContent {
    /// 移籍種別と報告対象期間から件名・本文を決める
    pub fn for_transfer(transfer_type: TransferType, period: &ReportingPeriod) -> Self {
        let ReportingPeriod {
            last_month,
            last_quarter_month,
            year,
        } = period;

        match transfer_type {
            TransferType::Pif => Self {
                subject:       format!(
                    "Club Transfer for Paid in Full Members ({last_month} {year})"
                ),
                body_sentence: format!(
                    "Please find attached the Paid in Full club transfer data for your club ({last_month} {year})."
                ),
            },
            TransferType::Dd => Self {
                subject:       format!(
                    "Club Transfer for Direct Debit Members ({last_quarter_month} - {last_month} {year})"
                ),
                body_sentence: format!(
                    "Please find attached the Direct Debit club transfer data for your club ({last_quarter_month} - {last_month} {year})."
                ),
            },
        }
    }
}

/// HTML タグを取り除く
///
/// `<` から `>` までを読み飛ばし、それ以外の文字はそのまま残す。
/// エンティティ（`&amp;` など）のデコードは行わない。
pub fn strip_html_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn period() -> ReportingPeriod {
        ReportingPeriod {
            last_month:         "September".to_string(),
            last_quarter_month: "July".to_string(),
            year:               2026,
        }
    }

    #[rstest]
    #[case("<b>hi</b>", "hi")]
    #[case("<p>Hello team,</p><p>Regards</p>", "Hello team,Regards")]
    #[case("no tags at all", "no tags at all")]
    #[case("a <br/>b", "a b")]
    #[case("<<b>>x", "x")]
    #[case("Tom &amp; Jerry", "Tom &amp; Jerry")]
    #[case("unterminated <tag", "unterminated ")]
    #[case("", "")]
    fn strip_html_tagsはタグのみを除去する(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(strip_html_tags(html), expected);
    }

    #[test]
    fn strip_html_tagsは改行やマルチバイト文字を保持する() {
        let html = "<html>\n  <p>こんにちは</p>\n</html>";

        assert_eq!(strip_html_tags(html), "\n  こんにちは\n");
    }

    #[test]
    fn pifの件名と本文() {
        let content = NoticeContent::for_transfer(TransferType::Pif, &period());

        assert_eq!(
            content.subject,
            "Club Transfer for Paid in Full Members (September 2026)"
        );
        assert_eq!(
            content.body_sentence,
            "Please find attached the Paid in Full club transfer data for your club (September 2026)."
        );
    }

    #[test]
    fn ddの件名と本文は四半期の範囲を含む() {
        let content = NoticeContent::for_transfer(TransferType::Dd, &period());

        assert_eq!(
            content.subject,
            "Club Transfer for Direct Debit Members (July - September 2026)"
        );
        assert_eq!(
            content.body_sentence,
            "Please find attached the Direct Debit club transfer data for your club (July - September 2026)."
        );
    }

    #[test]
    fn text_bodyはhtml本文からタグを除去する() {
        let message = OutboundMessage {
            sender:          "no-reply@the-hub.ai".to_string(),
            recipient:       "clubb@example.org".to_string(),
            subject:         "件名".to_string(),
            html_body:       "<p>Hello team,</p>".to_string(),
            attachment_name: "pif_club_transfer_ClubB.csv".to_string(),
            attachment:      Vec::new(),
        };

        assert_eq!(message.text_body(), "Hello team,");
    }
}
