use crate::utils::error::{ErrorKind, RowError};
use serde::Serialize;
use std::collections::HashMap;

/// One input row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputRecord {
    pub data: HashMap<String, String>,
}

impl InputRecord {
    pub fn field(&self, name: &str) -> Result<&str, RowError> {
        self.data
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| RowError::MissingField {
                field: name.to_string(),
            })
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRow {
    pub timestamp: String,
    pub address: String,
    pub zip: String,
    pub full_name: String,
    pub foo_duration: f64,
    pub bar_duration: f64,
    pub total_duration: f64,
    pub notes: String,
}

impl NormalizedRow {
    pub const FIELD_COUNT: usize = 8;

    /// Output columns in their fixed order.
    pub fn to_fields(&self) -> [String; Self::FIELD_COUNT] {
        use crate::core::normalizer::format_seconds;

        [
            self.timestamp.clone(),
            self.address.clone(),
            self.zip.clone(),
            self.full_name.clone(),
            format_seconds(self.foo_duration),
            format_seconds(self.bar_duration),
            format_seconds(self.total_duration),
            self.notes.clone(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedRow {
    /// 1-based line in the input where the record starts.
    pub line: u64,
    pub kind: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_dropped: usize,
    pub dropped: Vec<DroppedRow>,
}

impl RunSummary {
    pub fn record_written(&mut self) {
        self.rows_read += 1;
        self.rows_written += 1;
    }

    pub fn record_dropped(&mut self, line: u64, error: &RowError) {
        self.rows_read += 1;
        self.rows_dropped += 1;
        self.dropped.push(DroppedRow {
            line,
            kind: error.kind(),
            message: error.to_string(),
        });
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    /// Serialized CSV rows, no header.
    pub output: Vec<u8>,
    pub summary: RunSummary,
}
