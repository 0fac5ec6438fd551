//! CSV file exporter for export-category orders.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;

use orderflow_core::UserId;
use orderflow_orders::config::DEFAULT_HIGH_VALUE_ORDER_THRESHOLD;
use orderflow_orders::{ExportError, FileExporter, Order};

const HEADER: [&str; 6] = ["ID", "Type", "Amount", "Flag", "Status", "Priority"];
const HIGH_VALUE_NOTE: [&str; 6] = ["", "", "", "", "Note", "High value order"];

/// Writes one record per exported order to `orders_type_A_{user}_{unix_seconds}.csv`.
///
/// Orders exported for the same user within the same second share a file; the
/// header is written only when the file is created. Rows are encoded before the
/// file is touched and appended in a single write.
#[derive(Debug, Clone)]
pub struct CsvFileExporter {
    output_dir: PathBuf,
    high_value_threshold: f64,
}

impl CsvFileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            high_value_threshold: DEFAULT_HIGH_VALUE_ORDER_THRESHOLD,
        }
    }

    pub fn with_high_value_threshold(mut self, threshold: f64) -> Self {
        self.high_value_threshold = threshold;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_name(user_id: UserId, timestamp: i64) -> String {
        format!("orders_type_A_{user_id}_{timestamp}.csv")
    }

    /// Export with an explicit timestamp; returns the file written to.
    pub fn export_at(
        &self,
        order: &Order,
        user_id: UserId,
        timestamp: i64,
    ) -> Result<PathBuf, ExportError> {
        let path = self.output_dir.join(Self::file_name(user_id, timestamp));

        let header = encode(|writer| writer.write_record(HEADER))?;
        let rows = encode(|writer| {
            writer.write_record(record(order))?;
            if order.amount() > self.high_value_threshold {
                writer.write_record(HIGH_VALUE_NOTE)?;
            }
            Ok(())
        })?;

        let (file, created) = open_for_append(&path)?;
        let chunk = if created {
            [header, rows].concat()
        } else {
            rows
        };
        append_chunk(file, &chunk, &path, created)?;
        Ok(path)
    }
}

impl FileExporter for CsvFileExporter {
    fn export(&self, order: &Order, user_id: UserId) -> Result<(), ExportError> {
        let path = self.export_at(order, user_id, Utc::now().timestamp())?;
        tracing::debug!(order_id = %order.id(), %user_id, path = %path.display(), "order exported");
        Ok(())
    }
}

fn record(order: &Order) -> [String; 6] {
    [
        order.id().to_string(),
        order.category().code().to_string(),
        format_amount(order.amount()),
        order.flag().to_string(),
        order.outcome().code().to_string(),
        order.priority().code().to_string(),
    ]
}

fn encode<F>(write: F) -> Result<Vec<u8>, ExportError>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    write(&mut writer).map_err(csv_error)?;
    writer
        .into_inner()
        .map_err(|err| ExportError::from(err.into_error()))
}

/// Opens `path` for appending; the flag tells whether this call created it.
fn open_for_append(path: &Path) -> io::Result<(File, bool)> {
    match OpenOptions::new().append(true).create_new(true).open(path) {
        Ok(file) => Ok((file, true)),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
            let file = OpenOptions::new().append(true).open(path)?;
            Ok((file, false))
        }
        Err(err) => Err(err),
    }
}

/// Appends `chunk` to `file`. A file created by this export is removed again
/// when the write fails, so no header-less file is left for the next export.
fn append_chunk(
    mut file: impl Write,
    chunk: &[u8],
    path: &Path,
    created: bool,
) -> Result<(), ExportError> {
    let written = file.write_all(chunk).and_then(|()| file.flush());
    drop(file);

    match written {
        Ok(()) => Ok(()),
        Err(err) => {
            if created {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    tracing::warn!(
                        path = %path.display(),
                        error = %remove_err,
                        "partial export file not removed"
                    );
                }
            }
            Err(err.into())
        }
    }
}

fn csv_error(err: csv::Error) -> ExportError {
    ExportError::Io(err.to_string())
}

// Keeps a trailing ".0" on whole amounts so the column always reads as a decimal.
fn format_amount(amount: f64) -> String {
    format!("{amount:?}")
}
