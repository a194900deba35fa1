use std::fs;

use mission_engine::{PersistError, ReportWriter};
use tempfile::TempDir;

#[test]
fn missing_report_dir_is_created() {
    let temp = TempDir::new().unwrap();
    let reports = temp.path().join("exports").join("today");
    let writer = ReportWriter::new(&reports, "jobs_report.xlsx");

    let saved = writer.save(b"PK\x03\x04").unwrap();
    assert_eq!(saved, reports.join("jobs_report.xlsx"));
    assert!(reports.is_dir());
}

#[test]
fn later_export_replaces_earlier_one() {
    let temp = TempDir::new().unwrap();
    let writer = ReportWriter::new(temp.path(), "jobs_report.xlsx");

    let first = writer.save(b"first mission").unwrap();
    let second = writer.save(b"second").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), b"second");
    // Only the report itself; no staged leftovers.
    assert_eq!(fs::read_dir(temp.path()).unwrap().count(), 1);
}

#[test]
fn empty_report_is_refused() {
    let temp = TempDir::new().unwrap();
    let writer = ReportWriter::new(temp.path(), "jobs_report.xlsx");

    assert!(matches!(writer.save(b""), Err(PersistError::EmptyReport)));
    assert!(!writer.target().exists());
}

#[test]
fn report_dir_that_is_a_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let occupied = temp.path().join("not_a_dir");
    fs::write(&occupied, "x").unwrap();

    let writer = ReportWriter::new(&occupied, "jobs_report.xlsx");
    assert!(matches!(
        writer.save(b"data"),
        Err(PersistError::ReportDir { .. })
    ));
}
