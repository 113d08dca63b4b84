//! # LocationRepository
//!
//! クラブ名から所在地（通知先メールアドレス）を解決するリポジトリ。
//!
//! ## 設計方針
//!
//! - **読み取り専用**: `location` テーブルは外部システムが管理する
//! - **名前の正規化**: 検索前にクラブ名の前後の空白を除去し、DB 側も `TRIM(name)` で比較する
//! - **未登録は正常系**: 該当なしは `Ok(None)`、メールアドレス NULL は `email: None`

use async_trait::async_trait;
use coral_domain::location::Location;
use sqlx::PgPool;

use crate::error::InfraError;

/// 所在地リポジトリトレイト
#[async_trait]
pub trait LocationRepository: Send + Sync {
    /// クラブ名で所在地を検索
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, InfraError>;
}

/// PostgreSQL 実装の LocationRepository
#[derive(Debug, Clone)]
pub struct PostgresLocationRepository {
    pool: PgPool,
}

impl PostgresLocationRepository {
    /// 新しいリポジトリインスタンスを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LocationRow {
    id:    String,
    name:  String,
    email: Option<String>,
}

impl From<LocationRow> for Location {
    fn from(row: LocationRow) -> Self {
        Self {
            id:    row.id,
            name:  row.name,
            email: row.email,
        }
    }
}

#[async_trait]
impl LocationRepository for PostgresLocationRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, InfraError> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id::text AS id, name, email
            FROM location
            WHERE TRIM(name) = $1
            LIMIT 1
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Location::from))
    }
}
