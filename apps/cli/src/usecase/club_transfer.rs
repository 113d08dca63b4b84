//! # クラブ移籍通知サービス
//!
//! 集約 → 所在地解決 → 添付生成 → MIME 構築 → 送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **best-effort**: 1 クラブの失敗はログに記録して次のクラブへ進む。再送はしない
//! - **逐次処理**: クラブ名の昇順に 1 件ずつ処理し、送信は常に 1 通のみ
//! - **スロットリング**: 送信に成功した後だけ設定された時間待機する
//! - **書き出しは付随処理**: 添付 CSV のファイル書き出しに失敗してもログに残すだけで送信は続ける
//! - **依存性注入**: `LocationRepository` / `NotificationSender` / `Clock` は trait で抽象化
//!
//! ## クラブごとの状態遷移
//!
//! ```text
//! Resolve ──(検索失敗 / 未登録 / メールなし)──→ Skipped
//!    │
//!    ↓
//! Compose ──(添付・メッセージ構築失敗)──→ Skipped
//!    │
//!    ↓
//!  Send ──(送信失敗)──→ Skipped
//!    │
//!    ↓
//!  Sent ──→ Throttle ──→ 次のクラブ
//! ```

use std::{fmt, sync::Arc};

use coral_domain::{
    clock::Clock,
    notification::{NoticeContent, OutboundMessage},
    period::ReportingPeriod,
    transfer::{ClubTransferSet, TransferRecord, TransferRow},
};
use coral_infra::{
    notification::{NotificationSender, compose_raw_message},
    repository::LocationRepository,
    transfer_csv,
};
use coral_shared::{
    event_log::{error as log_error, event},
    log_business_event,
};
use tracing::Instrument as _;

use super::TemplateRenderer;
use crate::{config::DeliverySettings, error::RunError};

/// クラブを送信対象から外した理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// 所在地ストアへの問い合わせに失敗
    LocationLookupFailed(String),
    /// 所在地が登録されていない
    LocationNotFound,
    /// 所在地にメールアドレスが登録されていない
    EmailNotFound,
    /// 添付ファイルまたはメッセージの構築に失敗
    ComposeFailed(String),
    /// 送信に失敗
    SendFailed(String),
}

impl SkipReason {
    /// ログに出力する種別名
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LocationLookupFailed(_) => "location_lookup_failed",
            Self::LocationNotFound => "location_not_found",
            Self::EmailNotFound => "email_not_found",
            Self::ComposeFailed(_) => "compose_failed",
            Self::SendFailed(_) => "send_failed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocationLookupFailed(e) => write!(f, "所在地の検索に失敗: {e}"),
            Self::LocationNotFound => f.write_str("所在地が見つかりません"),
            Self::EmailNotFound => f.write_str("メールアドレスが登録されていません"),
            Self::ComposeFailed(e) => write!(f, "メッセージ構築に失敗: {e}"),
            Self::SendFailed(e) => write!(f, "送信に失敗: {e}"),
        }
    }
}

/// 送信済みのクラブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotice {
    pub club:            String,
    pub recipient:       String,
    pub attachment_name: String,
}

/// 送信対象外になったクラブ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedClub {
    pub club:   String,
    pub reason: SkipReason,
}

/// 1 回の実行結果
///
/// クラブ名の昇順で記録される。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent:    Vec<SentNotice>,
    pub skipped: Vec<SkippedClub>,
}

impl DeliveryReport {
    /// 処理したクラブ数
    pub fn club_count(&self) -> usize {
        self.sent.len() + self.skipped.len()
    }

    /// 送信済みクラブ名
    pub fn sent_clubs(&self) -> Vec<&str> {
        self.sent.iter().map(|s| s.club.as_str()).collect()
    }

    /// 指定したクラブのスキップ理由
    pub fn skip_reason(&self, club: &str) -> Option<&SkipReason> {
        self.skipped
            .iter()
            .find(|s| s.club == club)
            .map(|s| &s.reason)
    }
}

/// 1 回の実行で全クラブに共通する文面
struct NoticeTemplate {
    subject:   String,
    html_body: String,
}

/// クラブ移籍通知サービス
pub struct ClubTransferService {
    locations: Arc<dyn LocationRepository>,
    sender:    Arc<dyn NotificationSender>,
    renderer:  TemplateRenderer,
    clock:     Arc<dyn Clock>,
    settings:  DeliverySettings,
}

impl ClubTransferService {
    pub fn new(
        locations: Arc<dyn LocationRepository>,
        sender: Arc<dyn NotificationSender>,
        renderer: TemplateRenderer,
        clock: Arc<dyn Clock>,
        settings: DeliverySettings,
    ) -> Self {
        Self {
            locations,
            sender,
            renderer,
            clock,
            settings,
        }
    }

    /// 移籍行を集約し、全クラブに通知を送る
    ///
    /// 集約のタイムスタンプと報告対象期間は同じ時刻から求める。
    /// クラブ単位の失敗はエラーにせず [`DeliveryReport`] に記録する。
    pub async fn run(&self, rows: &[TransferRow]) -> Result<DeliveryReport, RunError> {
        let now = self.clock.now();
        let transfers = ClubTransferSet::aggregate(rows, now);
        tracing::info!(
            rows = rows.len(),
            clubs = transfers.len(),
            records = transfers.record_count(),
            "移籍データを集約しました"
        );

        let content =
            NoticeContent::for_transfer(self.settings.transfer_type, &ReportingPeriod::at(now));
        let template = NoticeTemplate {
            html_body: self.renderer.render_club_transfer(&content)?,
            subject:   content.subject,
        };

        log_business_event!(
            event.category = event::category::CLUB_TRANSFER,
            event.action = event::action::RUN_STARTED,
            event.entity_type = event::entity_type::TRANSFER_FILE,
            event.result = event::result::SUCCESS,
            clubs = transfers.len(),
            subject = %template.subject,
            "移籍通知の配信を開始"
        );

        let report = self.deliver(&transfers, &template).await;

        log_business_event!(
            event.category = event::category::CLUB_TRANSFER,
            event.action = event::action::RUN_COMPLETED,
            event.entity_type = event::entity_type::TRANSFER_FILE,
            event.result = event::result::SUCCESS,
            clubs = report.club_count(),
            sent = report.sent.len(),
            skipped = report.skipped.len(),
            "移籍通知の配信が完了"
        );

        Ok(report)
    }

    async fn deliver(&self, transfers: &ClubTransferSet, template: &NoticeTemplate) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for (club, records) in transfers.iter() {
            let outcome = self
                .deliver_club(club, records, template)
                .instrument(tracing::info_span!("club", club = %club, records = records.len()))
                .await;

            match outcome {
                Ok(sent) => {
                    log_business_event!(
                        event.category = event::category::NOTIFICATION,
                        event.action = event::action::NOTIFICATION_SENT,
                        event.entity_type = event::entity_type::CLUB,
                        event.entity_id = %club,
                        event.result = event::result::SUCCESS,
                        notification.recipient = %sent.recipient,
                        notification.attachment = %sent.attachment_name,
                        "通知メール送信成功"
                    );
                    report.sent.push(sent);

                    if !self.settings.worker_delay.is_zero() {
                        tokio::time::sleep(self.settings.worker_delay).await;
                    }
                }
                Err(reason) => {
                    log_skip(club, &reason);
                    report.skipped.push(SkippedClub {
                        club: club.to_string(),
                        reason,
                    });
                }
            }
        }

        report
    }

    async fn deliver_club(
        &self,
        club: &str,
        records: &[TransferRecord],
        template: &NoticeTemplate,
    ) -> Result<SentNotice, SkipReason> {
        // Resolve
        let location = self
            .locations
            .find_by_name(club)
            .await
            .map_err(|e| SkipReason::LocationLookupFailed(e.to_string()))?
            .ok_or(SkipReason::LocationNotFound)?;
        let contact = location.contact_email().ok_or(SkipReason::EmailNotFound)?;
        tracing::debug!(location_id = %location.id, email = %contact, "所在地を解決しました");

        let recipient = self
            .settings
            .test_email
            .clone()
            .unwrap_or_else(|| contact.to_string());

        // Compose
        let attachment_name = self.settings.transfer_type.attachment_file_name(club);
        let attachment = transfer_csv::write_club_transfer_csv(records)
            .map_err(|e| SkipReason::ComposeFailed(e.to_string()))?;

        if let Some(dir) = &self.settings.export_dir {
            match transfer_csv::write_club_transfer_file(dir, &attachment_name, records).await {
                Ok(path) => tracing::debug!(path = %path.display(), "添付 CSV を書き出しました"),
                Err(e) => tracing::error!(
                    error.category = log_error::category::INFRASTRUCTURE,
                    error.kind = log_error::kind::FILE_EXPORT,
                    error = %e,
                    dir = %dir.display(),
                    "添付 CSV の書き出しに失敗しました"
                ),
            }
        }

        let message = OutboundMessage {
            sender: self.settings.sender.clone(),
            recipient: recipient.clone(),
            subject: template.subject.clone(),
            html_body: template.html_body.clone(),
            attachment_name: attachment_name.clone(),
            attachment,
        };
        let raw = compose_raw_message(&message)
            .map_err(|e| SkipReason::ComposeFailed(e.to_string()))?;

        // Send
        self.sender
            .send_raw(&message.sender, &message.recipient, &raw)
            .await
            .map_err(|e| SkipReason::SendFailed(e.to_string()))?;

        Ok(SentNotice {
            club: club.to_string(),
            recipient,
            attachment_name,
        })
    }
}

fn log_skip(club: &str, reason: &SkipReason) {
    match reason {
        SkipReason::LocationLookupFailed(e) => tracing::error!(
            error.category = log_error::category::INFRASTRUCTURE,
            error.kind = log_error::kind::LOCATION_LOOKUP,
            error = %e,
            "所在地の検索に失敗したためスキップします"
        ),
        SkipReason::ComposeFailed(e) => tracing::error!(
            error.category = log_error::category::INFRASTRUCTURE,
            error.kind = log_error::kind::MESSAGE_COMPOSE,
            error = %e,
            "メッセージの構築に失敗したためスキップします"
        ),
        SkipReason::SendFailed(e) => tracing::error!(
            error.category = log_error::category::EXTERNAL_SERVICE,
            error.kind = log_error::kind::EMAIL_DELIVERY,
            error = %e,
            "メールの送信に失敗したためスキップします"
        ),
        SkipReason::LocationNotFound | SkipReason::EmailNotFound => {
            tracing::warn!(reason = %reason, "通知先がないためスキップします");
        }
    }

    let (action, result) = match reason {
        SkipReason::SendFailed(_) => (event::action::NOTIFICATION_FAILED, event::result::FAILURE),
        _ => (event::action::NOTIFICATION_SKIPPED, event::result::SKIPPED),
    };
    log_business_event!(
        event.category = event::category::NOTIFICATION,
        event.action = action,
        event.entity_type = event::entity_type::CLUB,
        event.entity_id = %club,
        event.result = result,
        skip.reason = reason.kind(),
        "通知をスキップ"
    );
}
