//! # 移籍 CSV の読み書き
//!
//! 入力 CSV（移籍行）の読み込みと、クラブ単位の添付 CSV の生成を担当する。
//!
//! ## 入力形式
//!
//! ```text
//! MemberID,FobNumber,FirstName,LastName,MembershipType,HomeClub,TargetClub
//! M1,F1,Alice,Smith,Gold,ClubA,ClubB
//! ```
//!
//! - 1 行目はヘッダーとして検証し、読み飛ばす
//! - 列数が 7 でない行が見つかった時点で読み込みを中断する（行番号付きエラー）
//! - 値はトリムせずそのまま保持する
//!
//! ## 添付 CSV
//!
//! [`TransferRecord::HEADERS`] の列順でヘッダー行を出力し、続けて 1 レコード 1 行を出力する。
//! 区切り文字やクォートを含む値は RFC 4180 に従ってクォートする。

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use coral_domain::transfer::{TransferRecord, TransferRow};
use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::InfraError;

/// 入力 CSV ファイルを読み込む
pub fn read_transfer_csv(path: impl AsRef<Path>) -> Result<Vec<TransferRow>, InfraError> {
    let path = path.as_ref();
    let file = File::open(path)?;

    let rows = read_transfer_rows(file)?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "移籍 CSV を読み込みました");

    Ok(rows)
}

/// 任意の入力から移籍行を読み込む
pub fn read_transfer_rows<R: io::Read>(input: R) -> Result<Vec<TransferRow>, InfraError> {
    let expected = TransferRow::HEADERS.len();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    let mut records = reader.records();

    let Some(header) = records.next() else {
        return Err(InfraError::header_mismatch(
            TransferRow::HEADERS.join(","),
            "",
        ));
    };
    validate_header(&header?)?;

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if record.len() != expected {
            let line = record.position().map_or(0, |p| p.line());
            return Err(InfraError::invalid_row(line, expected, record.len()));
        }
        rows.push(record.deserialize::<TransferRow>(None)?);
    }

    Ok(rows)
}

fn validate_header(header: &StringRecord) -> Result<(), InfraError> {
    let expected = TransferRow::HEADERS.len();
    if header.len() != expected {
        let line = header.position().map_or(1, |p| p.line());
        return Err(InfraError::invalid_row(line, expected, header.len()));
    }

    let matches = header
        .iter()
        .zip(TransferRow::HEADERS)
        .all(|(found, name)| found.trim_start_matches('\u{feff}').trim() == name);
    if !matches {
        return Err(InfraError::header_mismatch(
            TransferRow::HEADERS.join(","),
            header.iter().collect::<Vec<_>>().join(","),
        ));
    }

    Ok(())
}

/// クラブの移籍レコード列を添付 CSV のバイト列に変換する
///
/// 同じレコード列からは常に同じバイト列が得られる。
pub fn write_club_transfer_csv(records: &[TransferRecord]) -> Result<Vec<u8>, InfraError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(TransferRecord::HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| InfraError::unexpected(format!("CSV バッファの取り出しに失敗: {e}")))
}

/// 書き出し用のファイル名
///
/// 添付ファイル名はクラブ名をそのまま含むため、`/` や `\` が入りうる。
/// パス区切り文字と制御文字を `_` に置き換え、`dir` 直下の 1 要素に収める。
pub fn export_file_name(file_name: &str) -> String {
    let name: String = file_name
        .chars()
        .map(|c| {
            if matches!(c, '/' | '\\') || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    match name.as_str() {
        "" | "." | ".." => format!("_{name}"),
        _ => name,
    }
}

/// 添付 CSV を `dir` 直下に書き出す
///
/// ファイル名は [`export_file_name`] で変換する。ディレクトリが存在しない場合は
/// 作成する。書き出したパスを返す。
pub async fn write_club_transfer_file(
    dir: &Path,
    file_name: &str,
    records: &[TransferRecord],
) -> Result<PathBuf, InfraError> {
    let content = write_club_transfer_csv(records)?;
    let path = dir.join(export_file_name(file_name));

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(&path, content).await?;

    Ok(path)
}
