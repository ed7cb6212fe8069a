//! CSV export of the collection.
//!
//! Output is semicolon-delimited with every field quoted and a UTF-8 BOM up
//! front so spreadsheet tools pick up the encoding.

use chrono::NaiveDate;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::Item;
use crate::tags::serialize_tags;
use crate::utils::{DATE_FORMAT, TIMESTAMP_FORMAT};

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub const EXPORT_HEADER: [&str; 13] = [
    "id",
    "title",
    "creator",
    "kind",
    "status",
    "genre",
    "mood",
    "year",
    "sources",
    "video_url",
    "note",
    "finished_at",
    "created_at",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// `biblioteca_<YYYY-MM-DD>.csv`
pub fn export_file_name(date: NaiveDate) -> String {
    format!("biblioteca_{}.csv", date.format(DATE_FORMAT))
}

fn record(item: &Item) -> [String; 13] {
    let opt = |v: &Option<String>| v.clone().unwrap_or_default();
    [
        item.id.map(|id| id.to_string()).unwrap_or_default(),
        item.title.clone(),
        item.creator.clone(),
        item.kind.to_string(),
        item.status.to_string(),
        opt(&item.genre),
        item.mood.map(|m| m.to_string()).unwrap_or_default(),
        item.year.map(|y| y.to_string()).unwrap_or_default(),
        serialize_tags(&item.source_tags),
        opt(&item.video_url),
        opt(&item.note),
        item.completed_at
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default(),
        item.created_at.format(TIMESTAMP_FORMAT).to_string(),
    ]
}

/// Write the BOM, header and one row per item
pub fn write_csv<W: Write>(mut out: W, items: &[Item]) -> Result<(), ExportError> {
    out.write_all(BOM)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(out);

    writer.write_record(EXPORT_HEADER)?;
    for item in items {
        writer.write_record(record(item))?;
    }
    writer.flush()?;
    Ok(())
}

/// Export into `dir`, named after `date`. Returns the written path.
pub fn export_to_dir(dir: &Path, date: NaiveDate, items: &[Item]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    let file = File::create(&path)?;
    write_csv(BufWriter::new(file), items)?;
    tracing::info!(path = %path.display(), rows = items.len(), "collection exported");
    Ok(path)
}
