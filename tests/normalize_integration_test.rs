use anyhow::Result;
use csv_normalizer::{
    normalize_csv, EtlEngine, ErrorKind, LocalStorage, NormalizePipeline, RunConfig,
};
use std::process::Command;
use tempfile::TempDir;

const SAMPLE: &str = include_str!("fixtures/sample.csv");
const EXPECTED: &str = include_str!("fixtures/expected.csv");
const HEADER: &str = "Timestamp,Address,ZIP,FullName,FooDuration,BarDuration,TotalDuration,Notes\n";

fn file_config(dir: &TempDir, report: bool) -> RunConfig {
    let path = |name: &str| dir.path().join(name).to_str().unwrap().to_string();
    RunConfig {
        input: path("input.csv"),
        output: path("out/normalized.csv"),
        report: report.then(|| path("report.json")),
        ..RunConfig::default()
    }
}

fn engine_for(config: RunConfig) -> EtlEngine<NormalizePipeline<LocalStorage, RunConfig>> {
    let storage = LocalStorage::new(config.input.clone(), config.output.clone());
    EtlEngine::new(NormalizePipeline::new(storage, config))
}

#[test]
fn test_sample_drops_bad_rows_and_keeps_order() -> Result<()> {
    let mut output = Vec::new();
    let mut diagnostics = Vec::new();
    let summary = normalize_csv(SAMPLE.as_bytes(), &mut output, &mut diagnostics)?;

    assert_eq!(String::from_utf8(output)?, EXPECTED);

    let diagnostics = String::from_utf8(diagnostics)?;
    let lines: Vec<&str> = diagnostics.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Parse error: invalid duration \"bad\""));
    assert!(lines[1].starts_with("Parse error: invalid timestamp \"13/45/99 99:99:99 PM\""));

    assert_eq!(summary.rows_read, 5);
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.rows_dropped, 2);
    assert_eq!(summary.dropped[0].line, 4);
    assert_eq!(summary.dropped[1].line, 6);
    Ok(())
}

#[test]
fn test_every_output_row_has_eight_fields() -> Result<()> {
    let mut output = Vec::new();
    normalize_csv(SAMPLE.as_bytes(), &mut output, std::io::sink())?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(output.as_slice());
    for record in reader.records() {
        assert_eq!(record?.len(), 8);
    }
    Ok(())
}

#[test]
fn test_dst_scenarios_through_csv() -> Result<()> {
    let input = format!(
        "{}{}{}",
        HEADER,
        "03/08/20 02:30:00 AM,a,1,b,00:00:00.000,00:00:00.000,,c\n",
        "07/01/20 09:00:00 AM,a,1,b,00:00:00.000,00:00:00.000,,c\n",
    );
    let mut output = Vec::new();
    normalize_csv(input.as_bytes(), &mut output, std::io::sink())?;

    let output = String::from_utf8(output)?;
    let timestamps: Vec<&str> = output
        .lines()
        .filter_map(|line| line.split(',').next())
        .collect();
    assert_eq!(
        timestamps,
        ["2020-03-08T06:30:00-04:00", "2020-07-01T12:00:00-04:00"]
    );
    Ok(())
}

#[test]
fn test_sum_law() -> Result<()> {
    let input = format!(
        "{}{}",
        HEADER, "07/01/20 09:00:00 AM,a,1,b,01:02:03.456,00:00:01.000,,c\n"
    );
    let mut output = Vec::new();
    normalize_csv(input.as_bytes(), &mut output, std::io::sink())?;

    let output = String::from_utf8(output)?;
    let fields: Vec<&str> = output.trim_end().split(',').collect();
    assert_eq!(&fields[4..7], ["3723.456", "1.0", "3724.456"]);
    Ok(())
}

#[tokio::test]
async fn test_end_to_end_with_files_and_report() -> Result<()> {
    let dir = TempDir::new()?;
    let config = file_config(&dir, true);
    std::fs::write(&config.input, SAMPLE)?;

    let summary = engine_for(config.clone()).run().await?;
    assert_eq!(summary.rows_written, 3);
    assert_eq!(summary.rows_dropped, 2);

    assert_eq!(std::fs::read_to_string(&config.output)?, EXPECTED);

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(config.report.as_deref().unwrap())?)?;
    assert_eq!(report["rows_read"], 5);
    assert_eq!(report["rows_written"], 3);
    assert_eq!(report["rows_dropped"], 2);
    assert_eq!(report["dropped"][0]["line"], 4);
    assert_eq!(report["dropped"][0]["kind"], "value_format");
    assert_eq!(report["dropped"][1]["kind"], "value_format");
    Ok(())
}

#[tokio::test]
async fn test_header_only_file_produces_empty_output() -> Result<()> {
    let dir = TempDir::new()?;
    let config = file_config(&dir, false);
    std::fs::write(&config.input, HEADER)?;

    let summary = engine_for(config.clone()).run().await?;
    assert_eq!(summary.rows_read, 0);
    assert!(summary.dropped.is_empty());
    assert_eq!(std::fs::read_to_string(&config.output)?, "");
    Ok(())
}

#[tokio::test]
async fn test_invalid_utf8_is_replaced() -> Result<()> {
    let dir = TempDir::new()?;
    let config = file_config(&dir, false);
    let mut input = HEADER.as_bytes().to_vec();
    input.extend_from_slice(b"07/01/20 09:00:00 AM,a\x80b,1,name,00:00:00.000,00:00:00.000,,notes\xc3\n");
    std::fs::write(&config.input, input)?;

    engine_for(config.clone()).run().await?;

    let output = std::fs::read_to_string(&config.output)?;
    assert_eq!(
        output,
        "2020-07-01T12:00:00-04:00,a\u{fffd}b,00001,NAME,0.0,0.0,0.0,notes\u{fffd}\r\n"
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_is_structural() -> Result<()> {
    let dir = TempDir::new()?;
    let config = file_config(&dir, false);

    let err = engine_for(config.clone()).run().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Structural);
    assert!(!std::path::Path::new(&config.output).exists());
    Ok(())
}

#[test]
fn test_binary_keeps_diagnostics_off_stdout() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("input.csv");
    std::fs::write(&input, SAMPLE)?;

    let output = Command::new(env!("CARGO_BIN_EXE_csv-normalizer"))
        .arg("--input")
        .arg(&input)
        .env_remove("RUST_LOG")
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, EXPECTED);

    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.lines().count(), 2);
    assert!(stderr.lines().all(|line| line.starts_with("Parse error: ")));
    Ok(())
}

#[test]
fn test_binary_json_logs_report_dropped_rows_as_events() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("input.csv");
    std::fs::write(&input, SAMPLE)?;

    let output = Command::new(env!("CARGO_BIN_EXE_csv-normalizer"))
        .arg("--input")
        .arg(&input)
        .arg("--json-logs")
        .env_remove("RUST_LOG")
        .output()?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, EXPECTED);

    let stderr = String::from_utf8(output.stderr)?;
    let events = stderr
        .lines()
        .map(serde_json::from_str::<serde_json::Value>)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["message"], "Parse error");
    }
    assert_eq!(events[0]["fields"]["line"], 4);
    assert_eq!(events[1]["fields"]["line"], 6);
    Ok(())
}

#[test]
fn test_binary_fails_on_unreadable_input() -> Result<()> {
    let dir = TempDir::new()?;
    let output = Command::new(env!("CARGO_BIN_EXE_csv-normalizer"))
        .arg("--input")
        .arg(dir.path().join("missing.csv"))
        .env_remove("RUST_LOG")
        .output()?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    Ok(())
}
