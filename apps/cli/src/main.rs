//! # Coral
//!
//! 移籍 CSV を読み込み、クラブごとに移籍データを添付した通知メールを送るバッチツール。
//!
//! ## 処理の流れ
//!
//! ```text
//! 入力 CSV ──→ 集約（クラブ別 IN / OUT）──→ クラブごとに
//!                                            所在地解決 → 添付 CSV → MIME 構築 → 送信
//! ```
//!
//! クラブ単位の失敗はログに残して次のクラブへ進む。入力の読み込みと
//! 実行環境の準備（設定、DB 接続、テンプレート）の失敗のみ非ゼロで終了する。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（Mailpit へ送信）
//! NOTIFICATION_BACKEND=smtp cargo run -p coral-cli -- send-email --type PIF --input transfers.csv
//!
//! # 本番環境
//! coral send-email --type DD --input transfers.csv --sender no-reply@the-hub.ai
//! ```
//!
//! 環境変数は [`coral_cli::config`] を参照。

use anyhow::Context as _;
use clap::Parser as _;
use coral_cli::{
    cli::{Cli, Command},
    config::AppConfig,
    error::RunError,
    runner,
    usecase::DeliveryReport,
};
use coral_domain::transfer_type::TransferType;
use coral_shared::observability::{TracingConfig, init_tracing};
use tracing::Instrument as _;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let tracing_config = TracingConfig::from_env("coral");
    init_tracing(&tracing_config);

    let Command::SendEmail(args) = cli.command;

    let mut config = AppConfig::from_env().map_err(|e| RunError::Setup(e.to_string()))?;
    config.apply_overrides(args.overrides());
    let transfer_type = TransferType::from(args.transfer_type);

    let span = tracing::info_span!(
        "club_transfer",
        app = %tracing_config.app_name,
        run_id = %Uuid::now_v7(),
        transfer_type = %transfer_type,
        env = %config.env,
    );

    let report = async {
        tracing::info!(
            input = %args.input.display(),
            sender = %config.email_sender,
            test_email = ?config.email_test,
            "移籍通知の配信を開始します"
        );
        runner::send_email(&config, transfer_type, &args.input).await
    }
    .instrument(span)
    .await
    .context("移籍通知の配信に失敗しました")?;

    print_summary(&report);
    Ok(())
}

fn print_summary(report: &DeliveryReport) {
    println!(
        "Total: {} clubs, sent: {}, skipped: {}",
        report.club_count(),
        report.sent.len(),
        report.skipped.len()
    );
    for sent in &report.sent {
        println!("  sent     {} -> {} ({})", sent.club, sent.recipient, sent.attachment_name);
    }
    for skipped in &report.skipped {
        println!("  skipped  {}: {}", skipped.club, skipped.reason);
    }
}
