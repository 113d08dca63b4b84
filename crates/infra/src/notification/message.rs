//! MIME メッセージ構築
//!
//! 1 クラブ分の [`OutboundMessage`] から、以下の構造のメッセージを組み立てる。
//!
//! ```text
//! multipart/mixed
//! ├── multipart/alternative
//! │   ├── text/plain   （HTML からタグを除去した本文）
//! │   └── text/html
//! └── 添付ファイル      （Content-Type はファイル名の拡張子から推定、base64）
//! ```

use coral_domain::notification::{NotificationError, OutboundMessage};
use lettre::{
    Message,
    message::{
        Attachment,
        Body,
        Mailbox,
        MultiPart,
        SinglePart,
        header::{ContentTransferEncoding, ContentType},
    },
};

/// 送信可能な RFC 5322 メッセージのバイト列を構築する
pub fn compose_raw_message(message: &OutboundMessage) -> Result<Vec<u8>, NotificationError> {
    let from: Mailbox = message
        .sender
        .parse()
        .map_err(|e| NotificationError::ComposeFailed(format!("送信元アドレス不正: {e}")))?;
    let to: Mailbox = message
        .recipient
        .parse()
        .map_err(|e| NotificationError::ComposeFailed(format!("宛先アドレス不正: {e}")))?;

    let mime = mime_guess::from_path(&message.attachment_name).first_or_octet_stream();
    let content_type = ContentType::parse(mime.as_ref())
        .map_err(|e| NotificationError::ComposeFailed(format!("Content-Type 不正: {e}")))?;
    let attachment_body =
        Body::new_with_encoding(message.attachment.clone(), ContentTransferEncoding::Base64)
            .map_err(|_| {
                NotificationError::ComposeFailed("添付ファイルのエンコードに失敗".to_string())
            })?;

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(&message.subject)
        .multipart(
            MultiPart::mixed()
                .multipart(
                    MultiPart::alternative()
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_PLAIN)
                                .body(message.text_body()),
                        )
                        .singlepart(
                            SinglePart::builder()
                                .header(ContentType::TEXT_HTML)
                                .body(message.html_body.clone()),
                        ),
                )
                .singlepart(
                    Attachment::new(message.attachment_name.clone())
                        .body(attachment_body, content_type),
                ),
        )
        .map_err(|e| NotificationError::ComposeFailed(format!("メッセージ構築失敗: {e}")))?;

    Ok(email.formatted())
}

#[cfg(test)]
mod tests {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use pretty_assertions::assert_eq;

    use super::*;

    const ATTACHMENT: &str = "MemberID,FobNumber,FirstName,LastName,MembershipType,HomeClub,TargetClub,TransferType,TransferDate\nM1,F1,Alice,Smith,Gold,ClubA,ClubB,TRANSFER IN,2026-10-19T09:30:00Z\n";

    fn outbound() -> OutboundMessage {
        OutboundMessage {
            sender:          "hub@example.com".to_string(),
            recipient:       "clubb@example.com".to_string(),
            subject:         "Paid in Full Club Transfers".to_string(),
            html_body:       "<html><body><p>Hello team,</p><p>Please see attached.</p></body></html>"
                .to_string(),
            attachment_name: "pif_club_transfer_ClubB.csv".to_string(),
            attachment:      ATTACHMENT.as_bytes().to_vec(),
        }
    }

    fn compose(message: &OutboundMessage) -> String {
        String::from_utf8(compose_raw_message(message).unwrap()).unwrap()
    }

    /// base64 の添付パートを取り出してデコードする
    fn decode_attachment(raw: &str) -> Vec<u8> {
        let start = raw
            .find("Content-Transfer-Encoding: base64")
            .expect("base64 パートが存在すること");
        let body_start = start + raw[start..].find("\r\n\r\n").unwrap() + 4;
        let body_end = body_start + raw[body_start..].find("\r\n--").unwrap();
        let encoded: String = raw[body_start..body_end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        STANDARD.decode(encoded).unwrap()
    }

    #[test]
    fn ヘッダーに送信元と宛先と件名が含まれる() {
        let raw = compose(&outbound());

        assert!(raw.contains("From: hub@example.com\r\n"));
        assert!(raw.contains("To: clubb@example.com\r\n"));
        assert!(raw.contains("Subject: Paid in Full Club Transfers\r\n"));
        assert!(raw.contains("MIME-Version: 1.0\r\n"));
    }

    #[test]
    fn mixedの中にalternativeと添付を持つ() {
        let raw = compose(&outbound());

        let mixed = raw.find("multipart/mixed").unwrap();
        let alternative = raw.find("multipart/alternative").unwrap();
        let plain = raw.find("text/plain").unwrap();
        let html = raw.find("text/html").unwrap();
        let attachment = raw.find("Content-Disposition: attachment").unwrap();

        assert!(mixed < alternative);
        assert!(alternative < plain);
        assert!(plain < html);
        assert!(html < attachment);
    }

    #[test]
    fn 添付は拡張子から推定したcontent_typeとファイル名を持つ() {
        let raw = compose(&outbound());

        assert!(raw.contains("Content-Type: text/csv"));
        assert!(raw.contains("filename=\"pif_club_transfer_ClubB.csv\""));
    }

    #[test]
    fn 添付はbase64でエンコードされ元のバイト列に戻る() {
        let raw = compose(&outbound());

        assert_eq!(decode_attachment(&raw), ATTACHMENT.as_bytes());
    }

    #[test]
    fn テキスト本文はタグを除去したものになる() {
        let raw = compose(&outbound());

        assert!(raw.contains("Hello team,Please see attached."));
    }

    #[test]
    fn 拡張子が不明な添付はoctet_streamになる() {
        let mut message = outbound();
        message.attachment_name = "transfers.unknownext".to_string();

        let raw = compose(&message);

        assert!(raw.contains("Content-Type: application/octet-stream"));
    }

    #[test]
    fn 宛先アドレスが不正な場合はcompose_failedを返す() {
        let mut message = outbound();
        message.recipient = "not an address".to_string();

        let result = compose_raw_message(&message);

        assert!(matches!(result, Err(NotificationError::ComposeFailed(_))));
    }

    #[test]
    fn 送信元アドレスが不正な場合はcompose_failedを返す() {
        let mut message = outbound();
        message.sender = String::new();

        let result = compose_raw_message(&message);

        assert!(matches!(result, Err(NotificationError::ComposeFailed(_))));
    }
}
