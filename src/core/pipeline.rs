use crate::core::normalizer::{fields, normalize_row};
use crate::core::{ConfigProvider, Pipeline, Storage, TransformResult};
use crate::domain::model::{InputRecord, RunSummary};
use crate::utils::error::{Result, RowError};
use std::borrow::Cow;
use std::io::{Read, Write};

const BOM: char = '\u{feff}';

/// Where dropped-row diagnostics go.
pub trait DiagnosticSink {
    fn report(&mut self, line: u64, error: &RowError) -> std::io::Result<()>;

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One `Parse error: ...` text line per dropped row.
pub struct LineDiagnostics<W: Write>(pub W);

impl<W: Write> DiagnosticSink for LineDiagnostics<W> {
    fn report(&mut self, line: u64, error: &RowError) -> std::io::Result<()> {
        tracing::debug!(line, kind = ?error.kind(), "Dropping record");
        writeln!(self.0, "Parse error: {}", error)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.flush()
    }
}

/// One `tracing` warning per dropped row, for structured log output.
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn report(&mut self, line: u64, error: &RowError) -> std::io::Result<()> {
        tracing::warn!(line, kind = ?error.kind(), error = %error, "Parse error");
        Ok(())
    }
}

fn read_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>> {
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(BOM).to_string())
        .collect();

    let missing: Vec<&str> = fields::REQUIRED
        .iter()
        .copied()
        .filter(|required| !headers.iter().any(|h| h == required))
        .collect();
    if !missing.is_empty() {
        tracing::info!(
            "Input header is missing required columns: {}",
            missing.join(", ")
        );
    }

    Ok(headers)
}

fn normalize_records<R: Read, W: Write, S: DiagnosticSink>(
    reader: &mut csv::Reader<R>,
    writer: &mut csv::Writer<W>,
    diagnostics: &mut S,
) -> Result<RunSummary> {
    let headers = read_headers(reader)?;
    let mut summary = RunSummary::default();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let input: InputRecord = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();

        match normalize_row(&input) {
            Ok(row) => {
                writer.write_record(row.to_fields())?;
                summary.record_written();
            }
            Err(e) => {
                diagnostics.report(line, &e)?;
                summary.record_dropped(line, &e);
            }
        }
    }

    Ok(summary)
}

/// Normalizes every record of a CSV stream, writing one `Parse error: ...`
/// line to `diagnostics` per dropped row.
pub fn normalize_csv<R: Read, W: Write, D: Write>(
    input: R,
    output: W,
    diagnostics: D,
) -> Result<RunSummary> {
    normalize_csv_with(input, output, &mut LineDiagnostics(diagnostics))
}

/// Normalizes every record of a CSV stream.
///
/// Rows that fail to normalize are skipped and handed to `diagnostics`.
/// Reader and writer failures end the run. `output` is flushed on every path,
/// so rows written before a failure are kept. Lines end in CRLF.
pub fn normalize_csv_with<R: Read, W: Write, S: DiagnosticSink>(
    input: R,
    output: W,
    diagnostics: &mut S,
) -> Result<RunSummary> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(output);

    let result = normalize_records(&mut reader, &mut writer, diagnostics);
    let flushed = writer.flush();
    let diagnostics_flushed = diagnostics.flush();

    let summary = result?;
    flushed?;
    diagnostics_flushed?;
    Ok(summary)
}

pub struct NormalizePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> NormalizePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for NormalizePipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        tracing::debug!("Reading input from: {}", self.config.input_path());
        let bytes = self.storage.read_input().await?;
        tracing::debug!("Read {} bytes", bytes.len());

        let text = String::from_utf8_lossy(&bytes);
        if matches!(text, Cow::Owned(_)) {
            tracing::info!("Input contained invalid UTF-8; replaced with U+FFFD");
        }
        Ok(text.into_owned())
    }

    async fn transform(&self, data: String) -> Result<TransformResult> {
        let mut output = Vec::new();
        let summary = if self.config.json_logs() {
            normalize_csv_with(data.as_bytes(), &mut output, &mut TracingDiagnostics)?
        } else {
            normalize_csv(data.as_bytes(), &mut output, std::io::stderr())?
        };
        Ok(TransformResult { output, summary })
    }

    async fn load(&self, result: TransformResult) -> Result<RunSummary> {
        tracing::debug!(
            "Writing {} bytes to: {}",
            result.output.len(),
            self.config.output_path()
        );
        self.storage.write_output(&result.output).await?;

        if let Some(path) = self.config.report_path() {
            let report = serde_json::to_string_pretty(&result.summary)?;
            tokio::fs::write(path, report).await?;
            tracing::debug!("Run report saved to: {}", path);
        }

        Ok(result.summary)
    }
}
