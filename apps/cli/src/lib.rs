//! # Coral CLI ライブラリ
//!
//! `coral` バイナリの設定・ユースケース・起動処理を公開する。
//! 結合テストからユースケースを直接呼び出せるようにするためライブラリとしても提供する。

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod usecase;
