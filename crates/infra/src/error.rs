//! # インフラ層エラー定義
//!
//! 入力ファイルの読み込み、データベースやシークレットストアとの通信で発生するエラーを表現する。
//!
//! ## 設計方針
//!
//! - **エラーの変換**: `std::io::Error`, `csv::Error`, `sqlx::Error` をラップ
//! - **行番号の保持**: CSV の不正行はどの行かをエラーに残す
//! - **SpanTrace 自動捕捉**: `From` 実装や convenience constructor で
//!   エラー生成時の呼び出し経路を自動記録する
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別（Io, Csv, InvalidRow 等）

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別（[`InfraErrorKind`]）と [`SpanTrace`]（呼び出し経路）を保持する。
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::InvalidRow { line, .. } => { /* 行番号を報告 */ }
///     _ => { /* その他 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
    kind:       InfraErrorKind,
    span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
    /// ファイル入出力エラー
    ///
    /// 入力ファイルが存在しない、読み取り権限がない、出力先に書き込めないなど。
    #[error("ファイル入出力エラー: {0}")]
    Io(#[source] std::io::Error),

    /// CSV の読み書きエラー
    ///
    /// クォートの不整合、UTF-8 として不正なバイト列など。
    #[error("CSV エラー: {0}")]
    Csv(#[source] csv::Error),

    /// 列数が想定と異なる行
    #[error("{line} 行目の列数が不正です（期待値: {expected}, 実際: {found}）")]
    InvalidRow {
        /// 1 始まりの行番号（ヘッダーが 1 行目）
        line:     u64,
        expected: usize,
        found:    usize,
    },

    /// ヘッダーが想定した列名と一致しない
    #[error("ヘッダーが不正です（期待値: {expected}, 実際: {found}）")]
    HeaderMismatch { expected: String, found: String },

    /// データベースエラー
    ///
    /// SQL クエリの実行失敗、接続エラーなど。
    #[error("データベースエラー: {0}")]
    Database(#[source] sqlx::Error),

    /// シークレットの取得・解釈エラー
    ///
    /// Secrets Manager への問い合わせ失敗、値の JSON が不正など。
    #[error("シークレットエラー: {0}")]
    Secret(String),

    /// 予期しないエラー
    #[error("予期しないエラー: {0}")]
    Unexpected(String),
}

// ===== InfraError のメソッド =====

impl InfraError {
    /// エラー種別を取得する
    pub fn kind(&self) -> &InfraErrorKind {
        &self.kind
    }

    /// SpanTrace を取得する
    pub fn span_trace(&self) -> &SpanTrace {
        &self.span_trace
    }

    // ===== Convenience constructors =====

    /// 列数不正エラーを生成する
    pub fn invalid_row(line: u64, expected: usize, found: usize) -> Self {
        Self {
            kind:       InfraErrorKind::InvalidRow {
                line,
                expected,
                found,
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// ヘッダー不一致エラーを生成する
    pub fn header_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::HeaderMismatch {
                expected: expected.into(),
                found:    found.into(),
            },
            span_trace: SpanTrace::capture(),
        }
    }

    /// シークレットエラーを生成する
    pub fn secret(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Secret(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }

    /// 予期しないエラーを生成する
    pub fn unexpected(msg: impl Into<String>) -> Self {
        Self {
            kind:       InfraErrorKind::Unexpected(msg.into()),
            span_trace: SpanTrace::capture(),
        }
    }
}

// ===== トレイト実装 =====

impl fmt::Debug for InfraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InfraError")
            .field("kind", &self.kind)
            .field("span_trace", &self.span_trace)
            .finish()
    }
}

impl std::error::Error for InfraError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.kind.source()
    }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<std::io::Error> for InfraError {
    fn from(source: std::io::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Io(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<csv::Error> for InfraError {
    fn from(source: csv::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Csv(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

impl From<sqlx::Error> for InfraError {
    fn from(source: sqlx::Error) -> Self {
        Self {
            kind:       InfraErrorKind::Database(source),
            span_trace: SpanTrace::capture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::layer::SubscriberExt as _;

    use super::*;

    /// テスト用に ErrorLayer 付き subscriber を設定する
    fn with_error_layer(f: impl FnOnce()) {
        let subscriber = tracing_subscriber::registry().with(tracing_error::ErrorLayer::default());
        let _guard = tracing::subscriber::set_default(subscriber);
        f();
    }

    #[test]
    fn test_from_io_errorでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_read_input");
            let _enter = span.enter();

            let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "transfers.csv");
            let err: InfraError = io_err.into();

            assert!(matches!(err.kind(), InfraErrorKind::Io(_)));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_read_input"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }

    #[test]
    fn test_from_sqlx_errorでdatabase種別になる() {
        let err: InfraError = sqlx::Error::RowNotFound.into();

        assert!(matches!(err.kind(), InfraErrorKind::Database(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_invalid_rowのメッセージに行番号が含まれる() {
        let err = InfraError::invalid_row(3, 7, 6);

        assert!(matches!(
            err.kind(),
            InfraErrorKind::InvalidRow {
                line: 3,
                expected: 7,
                found: 6
            }
        ));
        assert_eq!(
            err.to_string(),
            "3 行目の列数が不正です（期待値: 7, 実際: 6）"
        );
    }

    #[test]
    fn test_header_mismatchでspan_traceがキャプチャされる() {
        with_error_layer(|| {
            let span = tracing::info_span!("test_header");
            let _enter = span.enter();

            let err = InfraError::header_mismatch("MemberID", "Id");

            assert!(matches!(err.kind(), InfraErrorKind::HeaderMismatch { .. }));
            let trace_str = format!("{}", err.span_trace());
            assert!(
                trace_str.contains("test_header"),
                "SpanTrace がスパン名を含むこと: {trace_str}",
            );
        });
    }
}
