//! # クラブ所在地
//!
//! 外部の所在地ストアから解決したクラブ情報。通知先メールアドレスを持つ。

/// クラブ所在地
///
/// `email` が `None` または空文字の場合は「連絡先未登録」を表す。
/// これはエラーではなく、通知対象から外すだけの正常な状態である。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id:    String,
    pub name:  String,
    pub email: Option<String>,
}

impl Location {
    /// 送信に使える連絡先メールアドレスを返す
    ///
    /// 前後の空白を除いて空になる場合は `None`。
    pub fn contact_email(&self) -> Option<&str> {
        self.email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}
