//! Integration tests for the scaninv binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const SAMPLE: &str = "Invoice: INV-100\n\
    Purchase Order: PO-7\n\
    Ship to:\n\
    Asahi Beverages VIC\n\
    Frozen Sunshine\n\
    123 Example St\n\
    Material Number\n\
    5 MAT001 Widget 10.00 50.00\n\
    Direct deposit details:\n";

fn scaninv() -> Command {
    Command::cargo_bin("scaninv").unwrap()
}

#[test]
fn process_txt_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("invoice.txt");
    fs::write(&input, SAMPLE).unwrap();

    scaninv()
        .arg("process")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"invoice_number\": \"INV-100\""))
        .stdout(predicate::str::contains("MAT001 - Widget x 5"));
}

#[test]
fn process_missing_input_fails() {
    scaninv()
        .arg("process")
        .arg("no/such/file.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn batch_writes_csv_and_txt_pair() {
    let dir = tempfile::tempdir().unwrap();
    let input_dir = dir.path().join("in");
    let output_dir = dir.path().join("out");
    fs::create_dir(&input_dir).unwrap();
    fs::write(input_dir.join("inv1.txt"), SAMPLE).unwrap();

    scaninv()
        .arg("batch")
        .arg(&input_dir)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    let csv = fs::read_to_string(output_dir.join("inv1.csv")).unwrap();
    assert!(csv.starts_with("Description,Amount,Inc-Tax Amount,Date,Invoice #"));
    assert!(csv.contains("MAT001 - Widget x 5"));
    assert!(csv.contains("ASAHI-VIC"));

    let txt = fs::read_to_string(output_dir.join("inv1.txt")).unwrap();
    let row = txt.lines().nth(1).unwrap();
    let fields: Vec<&str> = row.split('\t').collect();
    assert_eq!(fields.len(), 16);
    assert_eq!(fields[1], "50.00");
    assert_eq!(fields[15], "GST");
}

#[test]
fn batch_missing_input_dir_reports_without_failing() {
    scaninv()
        .arg("batch")
        .arg("no/such/dir")
        .assert()
        .success()
        .stderr(predicate::str::contains("does not exist"));
}
