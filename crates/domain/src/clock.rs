//! # Clock（時刻プロバイダ）
//!
//! 1 回の配信実行で使う「現在時刻」の供給元。
//!
//! `ClubTransferService::run`（`coral-cli`）が実行開始時に [`Clock::now`] を 1 度だけ呼び、
//! その時刻を次の 2 か所に渡す:
//!
//! - [`ClubTransferSet::aggregate`](crate::transfer::ClubTransferSet::aggregate):
//!   添付 CSV の `TransferDate` 列
//! - [`ReportingPeriod::at`](crate::period::ReportingPeriod::at):
//!   件名・本文の対象月と年
//!
//! 本番は [`SystemClock`]、テストは [`FixedClock`] を注入する。

use chrono::{DateTime, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// システム時刻（UTC）
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 固定時刻を返す実装
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}
