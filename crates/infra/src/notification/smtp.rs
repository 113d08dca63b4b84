//! SMTP 通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用して構築済みメッセージを送信する。
//! 開発環境では Mailpit（ローカル SMTP サーバー）に接続する。

use async_trait::async_trait;
use coral_domain::notification::NotificationError;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Tokio1Executor, address::Envelope};

use super::NotificationSender;

/// SMTP 通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
/// Mailpit（開発）や SMTP リレー（テスト環境）で使用する。
pub struct SmtpNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotificationSender {
    /// 新しい SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "localhost"）
    /// - `port`: SMTP サーバーのポート番号（例: 1025 for Mailpit）
    pub fn new(host: &str, port: u16) -> Self {
        // builder_dangerous: TLS なしで接続（Mailpit 等のローカル SMTP 向け）
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self { transport }
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_raw(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<(), NotificationError> {
        let from: Address = sender
            .parse()
            .map_err(|e| NotificationError::ComposeFailed(format!("送信元アドレス不正: {e}")))?;
        let to: Address = recipient
            .parse()
            .map_err(|e| NotificationError::ComposeFailed(format!("宛先アドレス不正: {e}")))?;
        let envelope = Envelope::new(Some(from), vec![to])
            .map_err(|e| NotificationError::ComposeFailed(format!("エンベロープ構築失敗: {e}")))?;

        self.transport
            .send_raw(&envelope, raw)
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SMTP 送信失敗: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SmtpNotificationSender>();
    }

    #[tokio::test]
    async fn 宛先アドレスが不正な場合は接続前にcompose_failedを返す() {
        let sender = SmtpNotificationSender::new("localhost", 1025);

        let result = sender
            .send_raw("hub@example.com", "not an address", b"Subject: x\r\n\r\nbody")
            .await;

        assert!(matches!(result, Err(NotificationError::ComposeFailed(_))));
    }
}
