//! # Coral インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 設計方針
//!
//! このクレートはユースケースが依存するインターフェース（リポジトリトレイト、
//! 送信トレイト）の具体的な実装を提供する。外部システムの詳細をカプセル化し、
//! ユースケースをインフラの変更から保護する。
//!
//! ## 責務
//!
//! - **入力ファイル**: 移籍 CSV の読み込みと添付 CSV の生成
//! - **データベース接続**: PostgreSQL への接続プール管理
//! - **リポジトリ実装**: クラブ所在地の検索
//! - **シークレット**: `DATABASE_URL` 未設定時の DB 接続情報の取得
//! - **メール送信**: MIME 構築と SES / SMTP / Noop による配送
//!
//! ## 依存関係
//!
//! ```text
//! cli → infra → domain
//!   ↘            ↗
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - PostgreSQL データベース接続管理
//! - [`error`] - インフラ層エラー定義
//! - [`notification`] - MIME 構築と送信
//! - [`repository`] - リポジトリ実装
//! - [`secrets`] - Secrets Manager からの DB 接続情報
//! - [`transfer_csv`] - 移籍 CSV の読み書き
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use coral_infra::{db, repository::PostgresLocationRepository, transfer_csv};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let rows = transfer_csv::read_transfer_csv("transfers.csv")?;
//!
//!     let pool = db::create_pool("postgres://localhost/hub".parse()?).await?;
//!     let locations = PostgresLocationRepository::new(pool.clone());
//!
//!     pool.close().await;
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod notification;
pub mod repository;
pub mod secrets;
pub mod transfer_csv;

pub use error::{InfraError, InfraErrorKind};
