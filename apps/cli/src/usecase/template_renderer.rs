//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで移籍通知メールの HTML 本文を生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **文言はドメイン側**: 件名・本文の文は [`NoticeContent`] が決め、テンプレートは骨格のみ持つ
//! - **プレーンテキスト版は生成しない**: HTML からタグを除去して作る

use coral_domain::notification::{NoticeContent, NotificationError};
use tera::{Context, Tera};

const CLUB_TRANSFER_TEMPLATE: &str = "club_transfer.html";

/// テンプレートレンダラー
pub struct TemplateRenderer {
    engine: Tera,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    pub fn new() -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_template(
                CLUB_TRANSFER_TEMPLATE,
                include_str!("../../templates/notifications/club_transfer.html"),
            )
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine })
    }

    /// 移籍通知の HTML 本文を生成する
    pub fn render_club_transfer(&self, content: &NoticeContent) -> Result<String, NotificationError> {
        let mut context = Context::new();
        context.insert("body_sentence", &content.body_sentence);

        self.engine
            .render(CLUB_TRANSFER_TEMPLATE, &context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use coral_domain::{
        notification::strip_html_tags,
        period::ReportingPeriod,
        transfer_type::TransferType,
    };

    use super::*;

    fn content(transfer_type: TransferType) -> NoticeContent {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        NoticeContent::for_transfer(transfer_type, &ReportingPeriod::at(now))
    }

    #[test]
    fn newが正常に初期化される() {
        let renderer = TemplateRenderer::new();
        assert!(renderer.is_ok());
    }

    #[test]
    fn pifの本文に挨拶と文言と結びが含まれる() {
        let renderer = TemplateRenderer::new().unwrap();

        let html = renderer.render_club_transfer(&content(TransferType::Pif)).unwrap();

        assert!(html.contains("<p>Hello team,</p>"));
        assert!(html.contains(
            "<p>Please find attached the Paid in Full club transfer data for your club (September 2026).</p>"
        ));
        assert!(html.contains("<p>Regards</p>"));
    }

    #[test]
    fn ddの本文に四半期の期間が含まれる() {
        let renderer = TemplateRenderer::new().unwrap();

        let html = renderer.render_club_transfer(&content(TransferType::Dd)).unwrap();

        assert!(html.contains(
            "Please find attached the Direct Debit club transfer data for your club (July - September 2026)."
        ));
    }

    #[test]
    fn タグを除去すると文言だけが残る() {
        let renderer = TemplateRenderer::new().unwrap();

        let html = renderer.render_club_transfer(&content(TransferType::Pif)).unwrap();
        let text = strip_html_tags(&html);

        assert!(!text.contains('<'));
        assert!(!text.contains('>'));
        assert!(text.contains("Hello team,"));
        assert!(text.contains("Regards"));
    }
}
