//! # 実行設定
//!
//! 環境変数から設定を読み込み、CLI 引数で上書きして配信設定を組み立てる。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `CORAL_ENV` | No | 実行環境（デフォルト: `dev`）。DB シークレット名の選択に使う |
//! | `CORAL_EMAIL_SENDER` | No | 送信元アドレス（デフォルト: `no-reply@the-hub.ai`） |
//! | `CORAL_EMAIL_TEST` | No | 設定時は全クラブ宛てのメールをこのアドレスに送る |
//! | `CORAL_AWS_REGION` | No | SES / Secrets Manager のリージョン（デフォルト: `ap-southeast-2`） |
//! | `CORAL_WORKER_DELAY_MS` | No | 送信成功後の待機時間（デフォルト: `1000`） |
//! | `CORAL_EXPORT_DIR` | No | 設定時は添付 CSV をこのディレクトリにも書き出す |
//! | `DATABASE_URL` | No | 所在地ストアの PostgreSQL 接続 URL。未設定時は Secrets Manager の `hub-insights-rds-cluster-readonly-{CORAL_ENV}` から解決する |
//! | `NOTIFICATION_BACKEND` | No | `ses` / `smtp` / `noop`（デフォルト: `ses`） |
//! | `SMTP_HOST` / `SMTP_PORT` | No | SMTP バックエンドの接続先（デフォルト: `localhost` / `1025`） |

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use coral_domain::transfer_type::TransferType;
use thiserror::Error;

const DEFAULT_ENV: &str = "dev";
const DEFAULT_SENDER: &str = "no-reply@the-hub.ai";
const DEFAULT_AWS_REGION: &str = "ap-southeast-2";
const DEFAULT_WORKER_DELAY_MS: u64 = 1000;
const DEFAULT_SMTP_HOST: &str = "localhost";
const DEFAULT_SMTP_PORT: u16 = 1025;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 設定値の形式が不正
    #[error("{key} の値が不正です: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// 実行設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 実行環境（dev / staging / prod）
    ///
    /// `database_url` が未設定のとき、どの環境の DB シークレットを使うかを決める。
    pub env:          String,
    /// 送信元メールアドレス
    pub email_sender: String,
    /// テスト送信先（設定時は全メールをここへ送る）
    pub email_test:   Option<String>,
    /// SES / Secrets Manager のリージョン
    pub aws_region:   String,
    /// 送信成功後の待機時間
    pub worker_delay: Duration,
    /// 添付 CSV の書き出し先
    pub export_dir:   Option<PathBuf>,
    /// 所在地ストアの接続 URL（未設定時はシークレットから解決）
    pub database_url: Option<String>,
    /// 通知設定
    pub notification: NotificationConfig,
}

/// 送信バックエンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationBackend {
    /// Amazon SES v2（本番）
    Ses,
    /// SMTP（Mailpit 等の開発用）
    Smtp,
    /// 送信しない（ログ出力のみ）
    Noop,
}

impl FromStr for NotificationBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ses" => Ok(Self::Ses),
            "smtp" => Ok(Self::Smtp),
            "noop" => Ok(Self::Noop),
            other => Err(ConfigError::Invalid {
                key:   "NOTIFICATION_BACKEND",
                value: other.to_string(),
            }),
        }
    }
}

/// 通知機能の設定
///
/// `NOTIFICATION_BACKEND` 環境変数で送信バックエンドを切り替える。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationConfig {
    pub backend:   NotificationBackend,
    /// SMTP ホスト（backend=smtp の場合に使用）
    pub smtp_host: String,
    /// SMTP ポート（backend=smtp の場合に使用）
    pub smtp_port: u16,
}

impl AppConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// キーから値を引く関数を使って設定を読み込む
    ///
    /// 空文字の値は未設定として扱う。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let worker_delay_ms = match get("CORAL_WORKER_DELAY_MS") {
            Some(value) => parse_value("CORAL_WORKER_DELAY_MS", &value)?,
            None => DEFAULT_WORKER_DELAY_MS,
        };
        let backend = match get("NOTIFICATION_BACKEND") {
            Some(value) => value.parse()?,
            None => NotificationBackend::Ses,
        };
        let smtp_port = match get("SMTP_PORT") {
            Some(value) => parse_value("SMTP_PORT", &value)?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Self {
            env:          get("CORAL_ENV").unwrap_or_else(|| DEFAULT_ENV.to_string()),
            email_sender: get("CORAL_EMAIL_SENDER").unwrap_or_else(|| DEFAULT_SENDER.to_string()),
            email_test:   get("CORAL_EMAIL_TEST"),
            aws_region:   get("CORAL_AWS_REGION")
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            worker_delay: Duration::from_millis(worker_delay_ms),
            export_dir:   get("CORAL_EXPORT_DIR").map(PathBuf::from),
            database_url: get("DATABASE_URL"),
            notification: NotificationConfig {
                backend,
                smtp_host: get("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
                smtp_port,
            },
        })
    }

    /// CLI 引数の上書きを反映する
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(env) = overrides.env {
            self.env = env;
        }
        if let Some(sender) = overrides.sender {
            self.email_sender = sender;
        }
        if let Some(test_email) = overrides.test_email {
            self.email_test = Some(test_email);
        }
        if let Some(export_dir) = overrides.export_dir {
            self.export_dir = Some(export_dir);
        }
    }

    /// 移籍種別を指定して配信設定を組み立てる
    pub fn delivery_settings(&self, transfer_type: TransferType) -> DeliverySettings {
        DeliverySettings {
            transfer_type,
            sender: self.email_sender.clone(),
            test_email: self.email_test.clone(),
            worker_delay: self.worker_delay,
            export_dir: self.export_dir.clone(),
        }
    }
}

fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

/// CLI 引数による上書き
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub env:        Option<String>,
    pub sender:     Option<String>,
    pub test_email: Option<String>,
    pub export_dir: Option<PathBuf>,
}

/// 1 回の配信実行の設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliverySettings {
    pub transfer_type: TransferType,
    pub sender:        String,
    pub test_email:    Option<String>,
    pub worker_delay:  Duration,
    pub export_dir:    Option<PathBuf>,
}
