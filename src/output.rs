//! Record output for the CLI: plain text, JSON and CSV.

use crate::error::Result;
use crate::extract::{ResultExtractor, ResultRecord};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Write records as CSV with a `Title,Authors,Abstract,URL` header.
pub fn write_csv<W: Write>(writer: W, records: &[ResultRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for record in records {
        wtr.serialize(record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Save records to a CSV file
pub fn save_csv(path: &Path, records: &[ResultRecord]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv(file, records)?;
    info!(path = ?path, count = records.len(), "Saved CSV");
    Ok(())
}

/// Write records as a pretty-printed JSON array
pub fn write_json<W: Write>(mut writer: W, records: &[ResultRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writeln!(writer)?;
    Ok(())
}

/// Human-readable listing, one block per record
pub fn write_text<W: Write>(
    mut writer: W,
    records: &[ResultRecord],
    extractor: &ResultExtractor,
) -> Result<()> {
    for record in records {
        writeln!(writer, "Title: {}", record.title)?;
        writeln!(writer, "Authors: {}", record.authors)?;
        if let Some(year) = extractor.publication_year(record) {
            writeln!(writer, "Year: {}", year)?;
        }
        writeln!(writer, "Abstract: {}", record.abstract_text)?;
        writeln!(writer, "URL: {}", record.url)?;
        writeln!(writer, "{}", "-".repeat(80))?;
    }
    Ok(())
}
