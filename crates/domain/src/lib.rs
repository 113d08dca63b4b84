//! # Coral ドメイン層
//!
//! クラブ移籍通知の中核となるドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **純粋性**: DB やメール送信などの外部システムには一切依存しない
//! - **時刻の注入**: 現在時刻は [`clock::Clock`] 経由で受け取り、テストで固定できる
//! - **決定性**: クラブ単位の集約は名前順に走査できる構造で保持する
//!
//! ## 依存関係の方向
//!
//! ```text
//! cli → infra → domain
//!   ↘            ↑
//!     ──────────
//! ```
//!
//! ## モジュール構成
//!
//! - [`transfer`] - 移籍行・移籍レコード・クラブ単位の集約
//! - [`transfer_type`] - 移籍種別（PIF / DD）と添付ファイル名
//! - [`period`] - 件名・本文に埋め込む報告対象期間
//! - [`location`] - クラブの所在地情報（通知先メールアドレス）
//! - [`notification`] - 送信メッセージと通知エラー
//! - [`clock`] - 時刻プロバイダ
//!
//! ## 使用例
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use coral_domain::transfer::{ClubTransferSet, TransferRow};
//!
//! let rows = vec![TransferRow {
//!     member_id:       "M1".to_string(),
//!     fob_number:      "F1".to_string(),
//!     first_name:      "Alice".to_string(),
//!     last_name:       "Smith".to_string(),
//!     membership_type: "Gold".to_string(),
//!     home_club:       "ClubA".to_string(),
//!     target_club:     "ClubB".to_string(),
//! }];
//!
//! let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
//! let set = ClubTransferSet::aggregate(&rows, now);
//! assert_eq!(set.record_count(), 2);
//! ```

pub mod clock;
pub mod location;
pub mod notification;
pub mod period;
pub mod transfer;
pub mod transfer_type;
