//! # Observability 基盤
//!
//! バッチ実行のログ出力を組み立てる。
//!
//! - 出力形式は `LOG_FORMAT`（`json` / `pretty`）で切り替える
//! - ログは標準エラー出力に書き出す。標準出力は実行結果のサマリ用に空けておく
//! - ルートスパンには [`TracingConfig::app_name`] を `app` フィールドとして載せる。
//!   JSON 出力では `span.app` としてすべての行に付く
//!
//! ```text
//! {"timestamp":"…","level":"INFO","message":"通知を送信しました",
//!  "span":{"app":"coral","run_id":"…","name":"club_transfer"},…}
//! ```

/// ログ出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// JSON 形式（スケジューラ実行・ログ収集向け）
    Json,
    /// 人間が読みやすい形式（手動実行向け）
    #[default]
    Pretty,
}

impl LogFormat {
    /// 文字列からログ形式を解釈する
    ///
    /// 前後の空白と大文字小文字は無視する。空文字は未設定として
    /// [`Pretty`](LogFormat::Pretty) になる。不明な値も `Pretty` にするが、
    /// トレーシング初期化前なので警告は stderr に直接書く。
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Self::Json,
            "pretty" | "" => Self::Pretty,
            other => {
                eprintln!("WARNING: unknown LOG_FORMAT={other:?}, falling back to pretty");
                Self::Pretty
            }
        }
    }

    /// キーから値を引く関数を使って `LOG_FORMAT` を読み取る
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        lookup("LOG_FORMAT")
            .map(|value| Self::parse(&value))
            .unwrap_or_default()
    }

    /// 環境変数 `LOG_FORMAT` から読み取る
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

/// トレーシング初期化設定
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// アプリケーション名
    ///
    /// ルートスパンの `app` フィールドと、デフォルトのログレベル指定に使う。
    pub app_name:   String,
    /// ログ出力形式
    pub log_format: LogFormat,
}

impl TracingConfig {
    pub fn new(app_name: impl Into<String>, log_format: LogFormat) -> Self {
        Self {
            app_name: app_name.into(),
            log_format,
        }
    }

    /// 環境変数から設定を読み取る
    pub fn from_env(app_name: impl Into<String>) -> Self {
        Self::new(app_name, LogFormat::from_env())
    }

    /// `RUST_LOG` 未設定時のフィルタ
    ///
    /// 外部クレートは `info`、自アプリのクレート（`coral_*` を含む）は `debug`。
    /// `EnvFilter` のターゲット指定は前方一致で評価される。
    pub fn default_directives(&self) -> String {
        format!("info,{}=debug", self.app_name)
    }
}

/// 設定と出力先から subscriber を組み立てる
///
/// [`init_tracing`] は stderr を出力先にしてこれを登録する。
/// `ErrorLayer` を含むため、インフラ層のエラーが生成時の `SpanTrace` を保持できる。
#[cfg(feature = "observability")]
pub fn build_subscriber<W>(
    config: &TracingConfig,
    writer: W,
) -> impl tracing::Subscriber + Send + Sync + use<W>
where
    W: for<'w> tracing_subscriber::fmt::MakeWriter<'w> + Send + Sync + 'static,
{
    use tracing_subscriber::{Layer as _, layer::SubscriberExt as _};

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.default_directives().into());

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_target(true)
            .with_current_span(true)
            .with_span_list(false)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_writer(writer).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(tracing_error::ErrorLayer::default())
}

/// グローバル subscriber を登録する
///
/// `RUST_LOG` でログレベルを上書きできる。
#[cfg(feature = "observability")]
pub fn init_tracing(config: &TracingConfig) {
    use tracing_subscriber::util::SubscriberInitExt as _;

    build_subscriber(config, std::io::stderr).init();

    tracing::debug!(format = ?config.log_format, "トレーシングを初期化しました");
}
