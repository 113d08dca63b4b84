//! # データベース接続情報のシークレット
//!
//! `DATABASE_URL` が未設定の場合、所在地ストアの読み取り専用接続情報を
//! AWS Secrets Manager から取得する。シークレット名は実行環境ごとに
//! `hub-insights-rds-cluster-readonly-{env}`。
//!
//! シークレットの値は次の形の JSON 文字列:
//!
//! ```json
//! {"username":"reader","password":"…","host":"cluster.example","port":5432,"dbname":"hub"}
//! ```

use std::fmt;

use async_trait::async_trait;
use aws_sdk_secretsmanager::{Client, error::DisplayErrorContext};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

use crate::error::InfraError;

const DATABASE_SECRET_PREFIX: &str = "hub-insights-rds-cluster-readonly";

/// シークレットストア
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// 名前を指定して文字列シークレットを取得する
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError>;
}

/// 実行環境に対応する DB シークレット名
pub fn database_secret_name(env: &str) -> String {
    format!("{DATABASE_SECRET_PREFIX}-{env}")
}

/// DB 接続情報
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseSecret {
    pub username: String,
    pub password: String,
    pub host:     String,
    pub port:     u16,
    #[serde(alias = "dbName", alias = "DBName")]
    pub dbname:   String,
}

impl DatabaseSecret {
    /// シークレットの JSON 文字列を解釈する
    pub fn parse(json: &str) -> Result<Self, InfraError> {
        serde_json::from_str(json)
            .map_err(|e| InfraError::secret(format!("DB シークレットの形式が不正です: {e}")))
    }

    /// 接続オプションに変換する
    ///
    /// URL を経由しないため、パスワードに `@` や `/` が含まれていてもよい。
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .password(&self.password)
            .database(&self.dbname)
    }
}

impl fmt::Debug for DatabaseSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSecret")
            .field("username", &self.username)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .finish()
    }
}

/// 実行環境の DB シークレットを取得して解釈する
pub async fn fetch_database_secret(
    store: &dyn SecretStore,
    env: &str,
) -> Result<DatabaseSecret, InfraError> {
    let name = database_secret_name(env);
    tracing::info!(secret = %name, "DB 接続情報をシークレットから取得します");

    let value = store.get_secret_string(&name).await?;
    DatabaseSecret::parse(&value)
}

/// 指定リージョンの Secrets Manager クライアントを作成する
pub async fn create_client(region: &str) -> Client {
    let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(region.to_string()))
        .load()
        .await;
    Client::new(&config)
}

/// AWS Secrets Manager
pub struct AwsSecretStore {
    client: Client,
}

impl AwsSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SecretStore for AwsSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError> {
        let output = self
            .client
            .get_secret_value()
            .secret_id(name)
            .send()
            .await
            .map_err(|e| {
                InfraError::secret(format!("{name} の取得に失敗: {}", DisplayErrorContext(&e)))
            })?;

        output
            .secret_string()
            .map(str::to_string)
            .ok_or_else(|| InfraError::secret(format!("{name} に文字列の値がありません")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::InfraErrorKind;

    const SECRET_JSON: &str = r#"{
        "username": "reader",
        "password": "p@ss/word",
        "host": "hub-cluster.internal",
        "port": 6432,
        "dbname": "hub",
        "engine": "postgres"
    }"#;

    struct StaticSecretStore(&'static str);

    #[async_trait]
    impl SecretStore for StaticSecretStore {
        async fn get_secret_string(&self, name: &str) -> Result<String, InfraError> {
            if name == "hub-insights-rds-cluster-readonly-prod" {
                Ok(self.0.to_string())
            } else {
                Err(InfraError::secret(format!("{name} は存在しません")))
            }
        }
    }

    #[test]
    fn シークレット名に実行環境が付く() {
        assert_eq!(database_secret_name("dev"), "hub-insights-rds-cluster-readonly-dev");
        assert_eq!(database_secret_name("prod"), "hub-insights-rds-cluster-readonly-prod");
    }

    #[test]
    fn シークレットのjsonから接続オプションを作る() {
        let secret = DatabaseSecret::parse(SECRET_JSON).unwrap();
        let options = secret.connect_options();

        assert_eq!(options.get_host(), "hub-cluster.internal");
        assert_eq!(options.get_port(), 6432);
        assert_eq!(options.get_username(), "reader");
        assert_eq!(options.get_database(), Some("hub"));
    }

    #[test]
    fn 大文字のdbnameキーも受け付ける() {
        let secret = DatabaseSecret::parse(
            r#"{"username":"u","password":"p","host":"h","port":5432,"DBName":"hub"}"#,
        )
        .unwrap();

        assert_eq!(secret.dbname, "hub");
    }

    #[test]
    fn 項目が欠けたシークレットはエラーになる() {
        let err = DatabaseSecret::parse(r#"{"username":"u","password":"p"}"#).unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::Secret(_)));
    }

    #[test]
    fn debug出力にパスワードを含めない() {
        let secret = DatabaseSecret::parse(SECRET_JSON).unwrap();

        let debug = format!("{secret:?}");

        assert!(!debug.contains("p@ss/word"), "{debug}");
        assert!(debug.contains("hub-cluster.internal"), "{debug}");
    }

    #[tokio::test]
    async fn 実行環境のシークレットを取得して解釈する() {
        let store = StaticSecretStore(SECRET_JSON);

        let secret = fetch_database_secret(&store, "prod").await.unwrap();

        assert_eq!(secret.host, "hub-cluster.internal");
        assert_eq!(secret.password, "p@ss/word");
    }

    #[tokio::test]
    async fn 別の環境のシークレットは取得できない() {
        let store = StaticSecretStore(SECRET_JSON);

        let err = fetch_database_secret(&store, "staging").await.unwrap_err();

        assert!(matches!(err.kind(), InfraErrorKind::Secret(_)));
    }
}
