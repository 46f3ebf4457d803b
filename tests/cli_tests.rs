//! End-to-end tests for the command-line interface.

use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{NamedTempFile, TempDir};

const FASTA: &str = ">IGHV1-2*02\nACGTACGT\n>IGHD3-10*01\nGGTACC\n>IGHJ4*02\nAACTGG\n>IGHG1*01\nGCCTCC\n";

const ANNOTATIONS: &str = "\
id\tgene_type\tfive_prime_position\tfive_prime_length\tthree_prime_position\tthree_prime_length
IGHV1-2*02\tV\t.\t.\t8\t2
IGHJ4*02\tJ\t0\t3\t.\t.
";

fn write_temp(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(suffix).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn cmd() -> Command {
    Command::cargo_bin("germline-resolver").unwrap()
}

fn source_args<'a>(fasta: &'a Path, annotations: &'a Path) -> [&'a std::ffi::OsStr; 4] {
    [
        "--fasta".as_ref(),
        fasta.as_os_str(),
        "--annotations".as_ref(),
        annotations.as_os_str(),
    ]
}

#[test]
fn test_resolve_from_fasta() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);

    cmd()
        .arg("resolve")
        .args(source_args(fasta.path(), annotations.path()))
        .arg("IGHV1-2*02")
        .arg("IGHJ4*02")
        .assert()
        .success()
        .stdout(predicate::str::contains("IGHV1-2*02 (V, 8 nt + 2 P)"))
        .stdout(predicate::str::contains("ACGTACGTAC"))
        .stdout(predicate::str::contains("GTTAACTGG"));
}

#[test]
fn test_resolve_unknown_segment_fails() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);

    cmd()
        .arg("resolve")
        .args(source_args(fasta.path(), annotations.path()))
        .arg("IGHV1-2*02")
        .arg("IGHV9-99*01")
        .assert()
        .failure()
        .stdout(predicate::str::contains("ACGTACGTAC"))
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("IGHV9-99*01"));
}

#[test]
fn test_resolve_fasta_output() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);

    cmd()
        .args(["resolve", "--format", "fasta"])
        .args(source_args(fasta.path(), annotations.path()))
        .arg("IGHJ4*02")
        .assert()
        .success()
        .stdout(">IGHJ4*02\nGTTAACTGG\n");
}

#[test]
fn test_resolve_json_output() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);

    let output = cmd()
        .args(["resolve", "--format", "json"])
        .args(source_args(fasta.path(), annotations.path()))
        .arg("IGHV1-2*02")
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json[0]["id"], "IGHV1-2*02");
    assert_eq!(json[0]["gene_type"], "V");
    assert_eq!(json[0]["p_length"], 2);
    assert_eq!(json[0]["sequence"], "ACGTACGTAC");
}

#[test]
fn test_resolve_ids_file() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);
    let ids = write_temp(".txt", "# segments\nIGHV1-2*02\n\nIGHG1*01\n");

    cmd()
        .args(["resolve", "--format", "tsv", "--ids-file"])
        .arg(ids.path())
        .args(source_args(fasta.path(), annotations.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("IGHV1-2*02\tV\t8\t2\tACGTACGTAC"))
        .stdout(predicate::str::contains("IGHG1*01\tC\t6\t0\tGCCTCC"));
}

#[test]
fn test_default_p_length() {
    let fasta = write_temp(".fa", FASTA);

    cmd()
        .args(["resolve", "--format", "fasta", "--default-p-length", "1", "--fasta"])
        .arg(fasta.path())
        .arg("IGHD3-10*01")
        .assert()
        .success()
        .stdout(predicate::str::contains("CGGTACCG"));
}

#[test]
fn test_malformed_annotation_fails_before_lookup() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", "IGHJ4*02\tJ\t0\t10\t.\t.\n");

    cmd()
        .arg("resolve")
        .args(source_args(fasta.path(), annotations.path()))
        .arg("IGHV1-2*02")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_library_build_then_resolve() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);
    let dir = TempDir::new().unwrap();
    let library = dir.path().join("library.json");

    cmd()
        .args(["library", "build"])
        .args(source_args(fasta.path(), annotations.path()))
        .arg("--output")
        .arg(&library)
        .assert()
        .success();
    assert!(library.exists());

    // Refuses to overwrite without --force
    cmd()
        .args(["library", "build"])
        .args(source_args(fasta.path(), annotations.path()))
        .arg("--output")
        .arg(&library)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cmd()
        .args(["resolve", "--library"])
        .arg(&library)
        .arg("IGHV1-2*02")
        .assert()
        .success()
        .stdout(predicate::str::contains("ACGTACGTAC"));
}

#[test]
fn test_library_list_and_show() {
    let fasta = write_temp(".fa", FASTA);
    let annotations = write_temp(".tsv", ANNOTATIONS);

    cmd()
        .args(["library", "list", "--format", "tsv", "--gene-type", "V"])
        .args(source_args(fasta.path(), annotations.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("IGHV1-2*02\tV\t8\t.\t8:2"))
        .stdout(predicate::str::contains("IGHJ4*02").not());

    cmd()
        .args(["library", "show", "IGHJ4*02"])
        .args(source_args(fasta.path(), annotations.path()))
        .assert()
        .success()
        .stdout(predicate::str::contains("5' junction: position 0, 3 P-nucleotides (GTT)"))
        .stdout(predicate::str::contains("GTTAACTGG"));

    cmd()
        .args(["library", "show", "IGHJ9*01"])
        .args(source_args(fasta.path(), annotations.path()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_library_and_fasta_conflict() {
    let fasta = write_temp(".fa", FASTA);

    cmd()
        .args(["resolve", "--library", "library.json", "--fasta"])
        .arg(fasta.path())
        .arg("IGHV1-2*02")
        .assert()
        .failure();
}
