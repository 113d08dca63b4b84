//! # 実行の組み立て
//!
//! 設定から外部接続（DB、送信バックエンド）を組み立て、配信を 1 回実行する。
//!
//! ## 実行順序
//!
//! 1. 所在地ストアの接続先を決める（`DATABASE_URL`、なければ実行環境の DB シークレット）
//! 2. 所在地ストアへの接続プールを開く
//! 3. 入力 CSV を読み込む
//! 4. 送信バックエンドとテンプレートを準備し、配信ループを実行する
//! 5. 接続プールを閉じる
//!
//! プールを開いた後はどの経路でも必ず閉じてから戻る。

use std::{path::Path, sync::Arc};

use coral_domain::{clock::SystemClock, transfer_type::TransferType};
use coral_infra::{
    db,
    notification::{
        NoopNotificationSender,
        NotificationSender,
        SesNotificationSender,
        SmtpNotificationSender,
        create_ses_client,
    },
    repository::PostgresLocationRepository,
    secrets::{self, AwsSecretStore, SecretStore},
    transfer_csv,
};
use coral_shared::event_log::error as log_error;
use sqlx::{PgPool, postgres::PgConnectOptions};

use crate::{
    config::{AppConfig, NotificationBackend},
    error::RunError,
    usecase::{ClubTransferService, DeliveryReport, TemplateRenderer},
};

/// 移籍通知の配信を 1 回実行する
pub async fn send_email(
    config: &AppConfig,
    transfer_type: TransferType,
    input: &Path,
) -> Result<DeliveryReport, RunError> {
    let options = match &config.database_url {
        Some(url) => database_options_from_url(url)?,
        None => {
            let store = AwsSecretStore::new(secrets::create_client(&config.aws_region).await);
            database_options_from_secret(&store, &config.env).await?
        }
    };

    let pool = db::create_pool(options).await.map_err(|e| {
        tracing::error!(
            error.category = log_error::category::INFRASTRUCTURE,
            error.kind = log_error::kind::DATABASE,
            error = %e,
            "データベース接続に失敗しました"
        );
        RunError::Setup(format!("データベース接続に失敗: {e}"))
    })?;
    tracing::info!("データベースに接続しました");

    let result = run_with_pool(config, transfer_type, input, pool.clone()).await;

    pool.close().await;
    tracing::debug!("データベース接続を閉じました");

    result
}

/// `DATABASE_URL` の値から接続先を作る
pub fn database_options_from_url(url: &str) -> Result<PgConnectOptions, RunError> {
    url.parse()
        .map_err(|e| RunError::Setup(format!("DATABASE_URL が不正です: {e}")))
}

/// 実行環境の DB シークレットから接続先を作る
pub async fn database_options_from_secret(
    store: &dyn SecretStore,
    env: &str,
) -> Result<PgConnectOptions, RunError> {
    let secret = secrets::fetch_database_secret(store, env).await.map_err(|e| {
        tracing::error!(
            error.category = log_error::category::EXTERNAL_SERVICE,
            error.kind = log_error::kind::DATABASE_SECRET,
            error = %e,
            "DB 接続情報の取得に失敗しました"
        );
        RunError::Setup(format!("DB 接続情報の取得に失敗: {e}"))
    })?;
    Ok(secret.connect_options())
}

async fn run_with_pool(
    config: &AppConfig,
    transfer_type: TransferType,
    input: &Path,
    pool: PgPool,
) -> Result<DeliveryReport, RunError> {
    let rows = transfer_csv::read_transfer_csv(input)?;
    tracing::info!(input = %input.display(), rows = rows.len(), "入力ファイルを読み込みました");

    let sender = build_sender(config).await;
    let service = ClubTransferService::new(
        Arc::new(PostgresLocationRepository::new(pool)),
        sender,
        TemplateRenderer::new()?,
        Arc::new(SystemClock),
        config.delivery_settings(transfer_type),
    );

    service.run(&rows).await
}

/// 設定に応じた送信バックエンドを作成する
pub async fn build_sender(config: &AppConfig) -> Arc<dyn NotificationSender> {
    let notification = &config.notification;
    match notification.backend {
        NotificationBackend::Ses => {
            tracing::info!(region = %config.aws_region, "通知バックエンド: SES");
            let client = create_ses_client(&config.aws_region).await;
            Arc::new(SesNotificationSender::new(client))
        }
        NotificationBackend::Smtp => {
            tracing::info!(
                host = %notification.smtp_host,
                port = notification.smtp_port,
                "通知バックエンド: SMTP"
            );
            Arc::new(SmtpNotificationSender::new(
                &notification.smtp_host,
                notification.smtp_port,
            ))
        }
        NotificationBackend::Noop => {
            tracing::info!("通知バックエンド: Noop（送信しない）");
            Arc::new(NoopNotificationSender)
        }
    }
}

#[cfg(test)]
mod tests {
    use coral_infra::mock::MockSecretStore;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn database_urlから接続先を作る() {
        let options = database_options_from_url("postgres://reader:pw@db.local:6543/hub").unwrap();

        assert_eq!(options.get_host(), "db.local");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("hub"));
    }

    #[test]
    fn 不正なdatabase_urlは準備エラーになる() {
        let err = database_options_from_url("not a url").unwrap_err();

        assert!(matches!(err, RunError::Setup(_)));
    }

    #[tokio::test]
    async fn 実行環境のシークレットから接続先を作る() {
        let store = MockSecretStore::new();
        store.insert(
            "hub-insights-rds-cluster-readonly-staging",
            r#"{"username":"reader","password":"pw","host":"staging.db","port":5432,"dbname":"hub"}"#,
        );

        let options = database_options_from_secret(&store, "staging").await.unwrap();

        assert_eq!(store.fetched(), vec!["hub-insights-rds-cluster-readonly-staging"]);
        assert_eq!(options.get_host(), "staging.db");
        assert_eq!(options.get_username(), "reader");
    }

    #[tokio::test]
    async fn シークレットがなければ準備エラーになる() {
        let store = MockSecretStore::new();

        let err = database_options_from_secret(&store, "dev").await.unwrap_err();

        assert!(matches!(err, RunError::Setup(_)));
        assert_eq!(store.fetched(), vec!["hub-insights-rds-cluster-readonly-dev"]);
    }
}
