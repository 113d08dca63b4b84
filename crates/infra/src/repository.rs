//! # リポジトリ実装
//!
//! 外部ストアへの問い合わせを trait で抽象化し、PostgreSQL 実装を提供する。
//!
//! ## 設計方針
//!
//! - **依存性逆転**: ユースケースは trait にのみ依存する
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod location_repository;

pub use location_repository::{LocationRepository, PostgresLocationRepository};
