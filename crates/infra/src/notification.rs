//! # 通知送信
//!
//! 移籍通知メールの MIME 構築と送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **構築と送信の分離**: [`compose_raw_message`] が RFC 5322 形式のバイト列を作り、
//!   `NotificationSender` はそのバイト列を配送するだけ
//! - **3 つの実装**: SMTP（Mailpit 開発用）、SES（本番用）、Noop（ドライラン用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` でランタイム選択

mod message;
mod noop;
mod ses;
mod smtp;

use async_trait::async_trait;
use coral_domain::notification::NotificationError;
pub use message::compose_raw_message;
pub use noop::NoopNotificationSender;
pub use ses::{SesNotificationSender, create_client as create_ses_client};
pub use smtp::SmtpNotificationSender;

/// メール送信トレイト
///
/// 構築済みの MIME メッセージを 1 通ずつ配送する。
/// SMTP / SES / Noop の 3 実装を環境変数で切り替える。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// 構築済みのメッセージを送信する
    ///
    /// `raw` はヘッダーを含む完全な RFC 5322 メッセージ。
    async fn send_raw(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<(), NotificationError>;
}
