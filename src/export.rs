//! Dataset export.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;

use crate::config::CSV_HEADER;
use crate::models::EntryDataset;

/// Writes the full dataset as CSV to `output`, or to stdout when `output`
/// is `None`. Returns the number of data rows written.
///
/// The header row is written unconditionally, so an empty dataset still
/// exports as a well-formed file in the canonical column order.
pub fn export_csv(dataset: &EntryDataset, output: Option<&PathBuf>) -> anyhow::Result<usize> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create export file {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(sink);
    writer
        .write_record(CSV_HEADER)
        .context("Failed to write CSV header")?;
    for entry in dataset.entries() {
        writer
            .serialize(entry)
            .context("Failed to write CSV record")?;
    }
    writer.flush().context("Failed to flush CSV output")?;

    if let Some(path) = output {
        log::info!(
            "Exported {} entries to {}",
            dataset.len(),
            path.display()
        );
    }
    Ok(dataset.len())
}
