//! End-to-end tests for the `simple-sign` binary: exit codes and output.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn simple_sign(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_simple-sign"))
        .args(args)
        .current_dir(cwd)
        .env_remove("SIMPLE_SIGN_CONFIG")
        .env_remove("SIMPLE_SIGN_ALGORITHM")
        .env_remove("SIMPLE_SIGN_ENVELOPE")
        .env_remove("SIMPLE_SIGN_SIGNER_ID")
        .env_remove("SIMPLE_SIGN_LOG")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_document(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_sign_then_verify_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    write_document(dir.path(), "report.txt", b"quarterly numbers");

    let signed = simple_sign(&["sign", "report.txt"], dir.path());
    assert_eq!(signed.status.code(), Some(0), "stderr: {}", stderr(&signed));
    assert!(dir.path().join("report.txt.sig").exists());
    assert!(dir.path().join("report.txt.pk").exists());

    let verified = simple_sign(&["verify", "report.txt"], dir.path());
    assert_eq!(verified.status.code(), Some(0), "stderr: {}", stderr(&verified));
    assert_eq!(stdout(&verified).trim(), "valid");
}

#[test]
fn test_tampered_document_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_document(dir.path(), "report.txt", b"quarterly numbers");

    let signed = simple_sign(&["sign", "--algorithm", "ecdsa-p256", "report.txt"], dir.path());
    assert_eq!(signed.status.code(), Some(0), "stderr: {}", stderr(&signed));

    fs::write(&doc, b"quarterly numbers, revised").unwrap();

    let verified = simple_sign(&["verify", "report.txt"], dir.path());
    assert_eq!(verified.status.code(), Some(1));
    assert!(stdout(&verified).starts_with("INVALID"));
    assert!(stderr(&verified).is_empty());
}

#[test]
fn test_garbage_public_key_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    write_document(dir.path(), "report.txt", b"quarterly numbers");

    let signed = simple_sign(&["sign", "report.txt"], dir.path());
    assert_eq!(signed.status.code(), Some(0), "stderr: {}", stderr(&signed));

    write_document(dir.path(), "report.txt.pk", &[0x13, 0x37, 0xde, 0xad, 0xbe, 0xef]);

    let verified = simple_sign(&["verify", "report.txt"], dir.path());
    assert_eq!(verified.status.code(), Some(2));
    assert!(stdout(&verified).is_empty());
    assert!(
        stderr(&verified).starts_with("error (malformed artifact):"),
        "stderr: {}",
        stderr(&verified)
    );
}

#[test]
fn test_missing_document_exits_two() {
    let dir = tempfile::tempdir().unwrap();

    let signed = simple_sign(&["sign", "absent.docx"], dir.path());
    assert_eq!(signed.status.code(), Some(2));
    assert!(stderr(&signed).starts_with("error (i/o):"), "stderr: {}", stderr(&signed));
    assert!(!dir.path().join("absent.docx.sig").exists());
}

#[test]
fn test_envelope_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let doc = write_document(dir.path(), "memo.txt", b"memo");

    let signed = simple_sign(
        &["sign", "--envelope", "--signer-id", "legal@company.com", "memo.txt"],
        dir.path(),
    );
    assert_eq!(signed.status.code(), Some(0), "stderr: {}", stderr(&signed));
    assert!(dir.path().join("memo.txt.sig.json").exists());

    let verified = simple_sign(&["verify-envelope", "memo.txt"], dir.path());
    assert_eq!(verified.status.code(), Some(0), "stderr: {}", stderr(&verified));

    fs::write(&doc, b"memo!").unwrap();
    let verified = simple_sign(&["verify-envelope", "memo.txt"], dir.path());
    assert_eq!(verified.status.code(), Some(1));
}

#[test]
fn test_unknown_algorithm_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    write_document(dir.path(), "report.txt", b"quarterly numbers");

    let signed = simple_sign(&["sign", "--algorithm", "dsa", "report.txt"], dir.path());
    assert_eq!(signed.status.code(), Some(2));
    assert!(!dir.path().join("report.txt.sig").exists());
}
