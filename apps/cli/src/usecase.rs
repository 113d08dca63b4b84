//! # ユースケース層
//!
//! クラブ移籍通知の業務フローを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリと送信手段を `Arc<dyn Trait>` で外部から注入
//! - **薄いエントリポイント**: `main` は配線のみ行い、ロジックはユースケースに集約
//!
//! ## モジュール構成
//!
//! - `club_transfer`: 集約から送信までの配信ループ
//! - `template_renderer`: メール本文のテンプレート描画

pub mod club_transfer;
pub mod template_renderer;

pub use club_transfer::{ClubTransferService, DeliveryReport, SentNotice, SkipReason, SkippedClub};
pub use template_renderer::TemplateRenderer;
