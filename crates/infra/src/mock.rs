//! # テスト用モック
//!
//! ユースケーステストで使用するインメモリのモック実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! coral-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use coral_domain::{location::Location, notification::NotificationError};

use crate::{
    error::InfraError,
    notification::NotificationSender,
    repository::LocationRepository,
    secrets::SecretStore,
};

// ===== MockLocationRepository =====

#[derive(Clone, Default)]
pub struct MockLocationRepository {
    locations: Arc<Mutex<HashMap<String, Location>>>,
    failing:   Arc<Mutex<HashSet<String>>>,
    lookups:   Arc<Mutex<Vec<String>>>,
}

impl MockLocationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 所在地を登録する（キーは前後の空白を除いたクラブ名）
    pub fn add_location(&self, name: &str, email: Option<&str>) {
        let key = name.trim().to_string();
        let location = Location {
            id:    format!("loc-{key}"),
            name:  key.clone(),
            email: email.map(str::to_string),
        };
        self.locations.lock().unwrap().insert(key, location);
    }

    /// 指定したクラブの検索をデータベースエラーにする
    pub fn fail_lookup_for(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.trim().to_string());
    }

    /// 検索されたクラブ名を検索順に返す
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl LocationRepository for MockLocationRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Location>, InfraError> {
        self.lookups.lock().unwrap().push(name.to_string());

        let key = name.trim();
        if self.failing.lock().unwrap().contains(key) {
            return Err(InfraError::unexpected(format!("所在地の検索に失敗: {key}")));
        }
        Ok(self.locations.lock().unwrap().get(key).cloned())
    }
}

// ===== MockNotificationSender =====

/// 送信されたメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub sender:    String,
    pub recipient: String,
    pub raw:       Vec<u8>,
}

impl SentMessage {
    /// raw メッセージを文字列として返す
    pub fn raw_text(&self) -> String {
        String::from_utf8_lossy(&self.raw).into_owned()
    }
}

#[derive(Clone, Default)]
pub struct MockNotificationSender {
    sent:    Arc<Mutex<Vec<SentMessage>>>,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// 指定した宛先への送信を失敗させる
    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().insert(recipient.to_string());
    }

    /// 送信に成功したメッセージを送信順に返す
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_raw(
        &self,
        sender: &str,
        recipient: &str,
        raw: &[u8],
    ) -> Result<(), NotificationError> {
        if self.failing.lock().unwrap().contains(recipient) {
            return Err(NotificationError::SendFailed(format!(
                "モック送信失敗: {recipient}"
            )));
        }

        self.sent.lock().unwrap().push(SentMessage {
            sender:    sender.to_string(),
            recipient: recipient.to_string(),
            raw:       raw.to_vec(),
        });
        Ok(())
    }
}

// ===== MockSecretStore =====

#[derive(Clone, Default)]
pub struct MockSecretStore {
    secrets: Arc<Mutex<HashMap<String, String>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl MockSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// シークレットを登録する
    pub fn insert(&self, name: &str, value: &str) {
        self.secrets
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
    }

    /// 取得されたシークレット名を取得順に返す
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl SecretStore for MockSecretStore {
    async fn get_secret_string(&self, name: &str) -> Result<String, InfraError> {
        self.fetched.lock().unwrap().push(name.to_string());

        self.secrets
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| InfraError::secret(format!("{name} は存在しません")))
    }
}
