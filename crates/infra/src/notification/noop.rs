//! Noop 通知送信実装
//!
//! メールを実際に送信せず、ログ出力のみ行う。
//! ドライランや通知無効化時に使用する。

use async_trait::async_trait;
use coral_domain::notification::NotificationError;

use super::NotificationSender;

/// Noop 通知送信（ログ出力のみ）
#[derive(Debug, Clone)]
pub struct NoopNotificationSender;

#[async_trait]
impl NotificationSender for NoopNotificationSender {
    async fn send_raw(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<(), NotificationError> {
        tracing::info!(
            from = %sender,
            to = %recipient,
            bytes = raw.len(),
            "Noop: メール送信をスキップ"
        );
        Ok(())
    }
}
