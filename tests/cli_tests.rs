use std::fs;
use std::process::{Command, Output};
use tempfile::tempdir;

fn run_cli(args: &[&std::ffi::OsStr]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_img2bin"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

#[test]
fn test_success_exits_zero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("prog.img");
    fs::write(&input, "v2.0 raw\n4578616d706c65\n").unwrap();
    let out = run_cli(&[input.as_os_str()]);
    assert!(out.status.success());
    assert!(out.stderr.is_empty());
    assert_eq!(fs::read(dir.path().join("prog.img.bin")).unwrap(), b"Example");
}

#[test]
fn test_mismatched_header_warns_and_exits_zero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("prog.img");
    fs::write(&input, "v1.0 raw\n00\n").unwrap();
    let out = run_cli(&[input.as_os_str()]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unexpected format"), "stderr: {}", stderr);
    assert_eq!(fs::read(dir.path().join("prog.img.bin")).unwrap(), vec![0x00]);
}

#[test]
fn test_invalid_hex_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("prog.img");
    fs::write(&input, "v2.0 raw\nxyz\n").unwrap();
    let out = run_cli(&[input.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("invalid hex on line 2"));
}

#[test]
fn test_missing_input_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("missing.img");
    let out = run_cli(&[input.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_no_argument_is_usage_error() {
    let out = run_cli(&[]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn test_uncreatable_output_exits_nonzero() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("prog.img");
    fs::write(&input, "v2.0 raw\n00\n").unwrap();
    fs::create_dir(dir.path().join("prog.img.bin")).unwrap();
    let out = run_cli(&[input.as_os_str()]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("prog.img.bin"));
}
