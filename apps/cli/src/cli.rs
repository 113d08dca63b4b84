//! # コマンドライン引数
//!
//! ```text
//! coral send-email --type <PIF|DD> --input <file> [--sender <addr>] [--env <env>]
//!                  [--test-email <addr>] [--export-dir <dir>]
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use coral_domain::transfer_type::TransferType;

use crate::config::ConfigOverrides;

/// クラブ移籍通知ツール
#[derive(Debug, Parser)]
#[command(name = "coral", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 移籍 CSV を読み込み、クラブごとに通知メールを送信する
    SendEmail(SendEmailArgs),
}

#[derive(Debug, Args)]
pub struct SendEmailArgs {
    /// 移籍種別
    #[arg(long = "type", value_enum, ignore_case = true)]
    pub transfer_type: TransferTypeArg,

    /// 入力 CSV ファイル
    #[arg(long)]
    pub input: PathBuf,

    /// 送信元メールアドレス（CORAL_EMAIL_SENDER より優先）
    #[arg(long)]
    pub sender: Option<String>,

    /// 実行環境。DATABASE_URL 未設定時に使う DB シークレットを選ぶ（CORAL_ENV より優先）
    #[arg(long)]
    pub env: Option<String>,

    /// 全メールの送信先を置き換えるテスト用アドレス（CORAL_EMAIL_TEST より優先）
    #[arg(long)]
    pub test_email: Option<String>,

    /// 添付 CSV の書き出し先ディレクトリ（CORAL_EXPORT_DIR より優先）
    #[arg(long)]
    pub export_dir: Option<PathBuf>,
}

impl SendEmailArgs {
    /// 設定の上書き分を取り出す
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            env:        self.env.clone(),
            sender:     self.sender.clone(),
            test_email: self.test_email.clone(),
            export_dir: self.export_dir.clone(),
        }
    }
}

/// `--type` に指定できる値
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TransferTypeArg {
    #[value(name = "PIF")]
    Pif,
    #[value(name = "DD")]
    Dd,
}

impl From<TransferTypeArg> for TransferType {
    fn from(arg: TransferTypeArg) -> Self {
        match arg {
            TransferTypeArg::Pif => Self::Pif,
            TransferTypeArg::Dd => Self::Dd,
        }
    }
}
