mod support;

use std::path::PathBuf;

use filequery::config::RunConfig;
use filequery::engine::{DuckDbEngine, Engine};
use filequery::error::Error;
use filequery::export::OutputFormat;
use filequery::runner::{open, run_batch};
use support::{RecordingEngine, TEST_CSV, write_file};

fn config_for(input: PathBuf, query: &str) -> RunConfig {
    RunConfig {
        filename: Some(input),
        query: Some(query.to_string()),
        ..RunConfig::default()
    }
}

#[test]
fn test_prints_delimited_results() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);

    let mut config = config_for(input, "select col1, col2 from test where col1 < 3 order by col1;");
    config.delimiter = Some('|');

    let (engine, _) = open(&config).unwrap();
    let mut out = Vec::new();
    run_batch(&engine, &config, &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert_eq!(printed, "\"col1\"|\"col2\"\n1|\"a\"\n2|\"b\"\n");
}

#[test]
fn test_prints_tables_for_each_statement() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);

    let config = config_for(
        input,
        "select count(*) as n from test; -- how many\nselect max(col1) as top from test;",
    );
    let (engine, _) = open(&config).unwrap();
    let mut out = Vec::new();
    run_batch(&engine, &config, &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("│ n │"));
    assert!(printed.contains("│ top │"));
    assert_eq!(printed.matches("1 row(s)").count(), 2);
}

#[test]
fn test_later_statements_see_earlier_effects() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);

    let mut config = config_for(
        input,
        "create table big as select * from test where col1 > 1;\nselect count(*) from big;",
    );
    config.delimiter = Some(',');
    let (engine, _) = open(&config).unwrap();
    let mut out = Vec::new();
    run_batch(&engine, &config, &mut out).unwrap();

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.trim_end().ends_with("\n2"));
}

#[test]
fn test_blank_query_is_rejected() {
    let engine = RecordingEngine::default();
    let config = config_for(PathBuf::from("unused.csv"), " ; \n");
    let err = run_batch(&engine, &config, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::NoQuery));
    assert!(engine.recorded().is_empty());
}

#[test]
fn test_export_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);
    let outputs: Vec<PathBuf> = (1..=3)
        .map(|i| dir.path().join(format!("result{}.csv", i)))
        .collect();

    let mut config = config_for(
        input,
        "select * from test; select sum(col3) as total from test; select col1 from test where col1 = 1;",
    );
    config.out_file = Some(outputs.clone());

    let (engine, _) = open(&config).unwrap();
    run_batch(&engine, &config, &mut Vec::new()).unwrap();

    for path in &outputs {
        assert!(path.exists(), "{} missing", path.display());
    }
    let second = std::fs::read_to_string(&outputs[1]).unwrap();
    assert_eq!(second.lines().next(), Some("total"));
    assert_eq!(second.lines().nth(1), Some("7.5"));
}

#[test]
fn test_export_csv_with_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);
    let output = dir.path().join("out.csv");

    let mut config = config_for(input, "select col1, col2 from test order by col1 limit 1");
    config.out_file = Some(vec![output.clone()]);
    config.delimiter = Some(';');

    let (engine, _) = open(&config).unwrap();
    run_batch(&engine, &config, &mut Vec::new()).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().collect::<Vec<_>>(), vec!["col1;col2", "1;a"]);
}

#[test]
fn test_export_parquet_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_file(dir.path(), "test.csv", TEST_CSV);
    let outputs = vec![dir.path().join("r1.parquet"), dir.path().join("r2.parquet")];

    let mut config = config_for(input, "select * from test; select col2 from test;");
    config.out_file = Some(outputs.clone());
    config.out_file_format = Some(OutputFormat::Parquet);

    let (engine, _) = open(&config).unwrap();
    run_batch(&engine, &config, &mut Vec::new()).unwrap();

    let check = DuckDbEngine::open_in_memory().unwrap();
    let result = check
        .query(&format!("select * from read_parquet('{}')", outputs[1].display()))
        .unwrap();
    assert_eq!(result.columns, vec!["col2"]);
    assert_eq!(result.row_count(), 3);
}

#[test]
fn test_count_mismatch_runs_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let outputs = vec![dir.path().join("a.csv"), dir.path().join("b.csv")];

    let mut config = config_for(PathBuf::from("unused.csv"), "select 1; select 2; select 3;");
    config.out_file = Some(outputs.clone());

    let engine = RecordingEngine::default();
    let err = run_batch(&engine, &config, &mut Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        Error::ExportCountMismatch {
            statements: 3,
            destinations: 2
        }
    ));
    assert!(engine.recorded().is_empty());
    assert!(outputs.iter().all(|p| !p.exists()));
}

#[test]
fn test_failing_export_halts_the_batch() {
    let mut config = config_for(PathBuf::from("unused.csv"), "select 1; select broken; select 3;");
    config.out_file = Some(vec![
        PathBuf::from("one.csv"),
        PathBuf::from("two.csv"),
        PathBuf::from("three.csv"),
    ]);

    let engine = RecordingEngine::failing_on("broken");
    let err = run_batch(&engine, &config, &mut Vec::new()).unwrap_err();
    assert!(matches!(err, Error::StatementExecution(_)));

    let recorded = engine.recorded();
    assert_eq!(recorded.len(), 2);
    assert!(recorded[0].starts_with("copy (select 1) to 'one.csv'"));
}

#[test]
fn test_query_file_with_comments() {
    let dir = tempfile::tempdir().unwrap();
    let query_file = write_file(
        dir.path(),
        "join.sql",
        "-- count rows; this semicolon is in a comment\nselect 1 as a;\n",
    );

    let config = RunConfig {
        filename: Some(PathBuf::from("unused.csv")),
        query_file: Some(query_file),
        ..RunConfig::default()
    };
    let engine = RecordingEngine::default();
    run_batch(&engine, &config, &mut Vec::new()).unwrap();
    assert_eq!(engine.recorded(), vec!["select 1 as a"]);
}
