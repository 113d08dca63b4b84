//! SES 通知送信実装
//!
//! AWS SES v2 API の raw メール送信を使用する。
//! 添付ファイル付きメールを送るため、simple ではなく raw コンテンツで送る。
//! 本番環境で使用する。

use async_trait::async_trait;
use aws_sdk_sesv2::{
    Client,
    primitives::Blob,
    types::{Destination, EmailContent, RawMessage},
};
use coral_domain::notification::NotificationError;

use super::NotificationSender;

/// 指定リージョンの SES v2 クライアントを作成する
///
/// 認証情報は AWS SDK 標準のプロバイダチェーン（環境変数、共有設定ファイル、
/// インスタンスロール等）から解決する。
pub async fn create_client(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// SES 通知送信
///
/// `aws_sdk_sesv2::Client` をラップする。
/// 送信元アドレスは SES で検証済みであること。
pub struct SesNotificationSender {
    client: Client,
}

impl SesNotificationSender {
    /// 新しい SES 送信インスタンスを作成
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl NotificationSender for SesNotificationSender {
    async fn send_raw(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<(), NotificationError> {
        let raw_message = RawMessage::builder()
            .data(Blob::new(raw))
            .build()
            .map_err(|e| NotificationError::ComposeFailed(format!("raw メッセージ構築失敗: {e}")))?;

        let destination = Destination::builder().to_addresses(recipient).build();
        let content = EmailContent::builder().raw(raw_message).build();

        self.client
            .send_email()
            .from_email_address(sender)
            .destination(destination)
            .content(content)
            .send()
            .await
            .map_err(|e| NotificationError::SendFailed(format!("SES 送信失敗: {e}")))?;

        Ok(())
    }
}
