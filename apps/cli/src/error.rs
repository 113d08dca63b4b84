//! # 実行エラー定義
//!
//! 実行全体を中断させる致命的なエラーを定義する。
//!
//! クラブ単位の失敗（所在地の検索失敗、送信失敗など）はここに含まれない。
//! それらはログに記録して次のクラブへ進み、[`DeliveryReport`](crate::usecase::DeliveryReport)
//! に集計される。

use coral_domain::notification::NotificationError;
use coral_infra::InfraError;
use thiserror::Error;

/// 実行を中断するエラー
#[derive(Debug, Error)]
pub enum RunError {
    /// 設定の読み込み、DB 接続など実行前の準備に失敗
    #[error("実行環境の準備に失敗: {0}")]
    Setup(String),

    /// 入力 CSV の読み込みに失敗
    #[error("入力ファイルの読み込みに失敗: {0}")]
    Input(#[from] InfraError),

    /// メールテンプレートの初期化に失敗
    #[error("テンプレートの初期化に失敗: {0}")]
    Template(#[from] NotificationError),
}
