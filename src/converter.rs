use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;

use crate::error::ConversionError;
use crate::header::{check_header, HeaderCheck, FORMAT_TAG};
use crate::utils::{hex_to_bin, read_line_universal};
#[cfg(test)]
use std::io::Cursor;

/// Appended to the input path to name the binary image.
pub const OUTPUT_SUFFIX: &str = ".bin";

/// Path reported in i/o errors raised by [`convert_stream`].
const STREAM_PATH: &str = "<stream>";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub header: HeaderCheck,
    /// Body lines read, blank lines included.
    pub records: usize,
    pub bytes_written: u64,
}

pub fn output_path(input: &Path) -> PathBuf {
    let mut name: OsString = input.as_os_str().to_os_string();
    name.push(OUTPUT_SUFFIX);
    PathBuf::from(name)
}

/// Convert the image at `input` into `<input>.bin`, truncating any previous output.
///
/// A header other than [`FORMAT_TAG`] is logged as a warning and conversion
/// carries on. A malformed record aborts the run and leaves whatever was
/// already decoded in the output file. The output is only created once the
/// header line has been read.
pub fn convert(input: &Path) -> Result<ConversionReport, ConversionError> {
    let output = output_path(input);
    let file = File::open(input).map_err(|e| ConversionError::io(input, e))?;
    let mut reader = BufReader::new(file);
    let header = read_header(&mut reader, input)?;

    let file = File::create(&output).map_err(|e| ConversionError::io(&output, e))?;
    let mut writer = BufWriter::new(file);
    let report = convert_body(reader, &mut writer, header, input, &output)?;
    writer.flush().map_err(|e| ConversionError::io(&output, e))?;

    info!(
        "converted {} -> {}: {} records, {} bytes",
        input.display(),
        output.display(),
        report.records,
        report.bytes_written
    );
    Ok(report)
}

/// Same as [`convert`] but over an arbitrary reader and writer.
///
/// The writer is not flushed.
pub fn convert_stream<R: BufRead, W: Write>(
    mut reader: R,
    writer: W,
) -> Result<ConversionReport, ConversionError> {
    let label = Path::new(STREAM_PATH);
    let header = read_header(&mut reader, label)?;
    convert_body(reader, writer, header, label, label)
}

fn read_header<R: BufRead>(reader: &mut R, input: &Path) -> Result<HeaderCheck, ConversionError> {
    let line = read_line_universal(reader).map_err(|e| ConversionError::io(input, e))?;
    let header = check_header(line.as_deref().unwrap_or(""));
    if let HeaderCheck::Mismatched { found } = &header {
        warn!("unexpected format: expected {:?} on the first line, found {:?}", FORMAT_TAG, found);
    }
    Ok(header)
}

fn convert_body<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    header: HeaderCheck,
    input: &Path,
    output: &Path,
) -> Result<ConversionReport, ConversionError> {
    let mut records = 0;
    let mut bytes_written = 0u64;
    // header is line 1
    let mut line_no = 1;
    loop {
        let next = read_line_universal(&mut reader).map_err(|e| ConversionError::io(input, e))?;
        let Some(text) = next else {
            break;
        };
        line_no += 1;
        records += 1;

        let bytes = hex_to_bin(&text).map_err(|source| ConversionError::InvalidHex {
            line: line_no,
            text: text.clone(),
            source,
        })?;
        writer.write_all(&bytes).map_err(|e| ConversionError::io(output, e))?;
        debug!("line {}: {} bytes", line_no, bytes.len());
        bytes_written += bytes.len() as u64;
    }

    Ok(ConversionReport { header, records, bytes_written })
}

#[cfg(test)]
fn convert_str(image: &str) -> (Result<ConversionReport, ConversionError>, Vec<u8>) {
    let mut out = Vec::new();
    let res = convert_stream(Cursor::new(image), &mut out);
    (res, out)
}

#[test]
fn test_example_word() {
    let (res, out) = convert_str("v2.0 raw\n4578616d706c65\n");
    let report = res.unwrap();
    assert_eq!(out, b"Example");
    assert_eq!(
        report,
        ConversionReport { header: HeaderCheck::Matched, records: 1, bytes_written: 7 }
    );
}

#[test]
fn test_single_bytes_in_order() {
    let (res, out) = convert_str("v2.0 raw\n00\nff\n10\n");
    assert_eq!(res.unwrap().bytes_written, 3);
    assert_eq!(out, vec![0x00, 0xff, 0x10]);
}

#[test]
fn test_crlf_and_missing_final_newline() {
    let (res, out) = convert_str("v2.0 raw\r\n01 02\r\nA0b0");
    let report = res.unwrap();
    assert!(report.header.is_match());
    assert_eq!(report.records, 2);
    assert_eq!(out, vec![0x01, 0x02, 0xa0, 0xb0]);
}

#[test]
fn test_bare_cr_terminators() {
    let (res, out) = convert_str("v2.0 raw\r00\rff\r");
    let report = res.unwrap();
    assert!(report.header.is_match());
    assert_eq!(report.records, 2);
    assert_eq!(out, vec![0x00, 0xff]);
}

#[test]
fn test_invalid_character_reports_line_offset() {
    let (res, _) = convert_str("v2.0 raw\n00 11 0g\n");
    let err = res.unwrap_err();
    assert!(matches!(
        err,
        ConversionError::InvalidHex {
            line: 2,
            source: hex::FromHexError::InvalidHexCharacter { c: 'g', index: 7 },
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        r#"invalid hex on line 2 ("00 11 0g"): Invalid character 'g' at position 7"#
    );
}

#[test]
fn test_blank_lines_are_empty_records() {
    let (res, out) = convert_str("v2.0 raw\n01\n\n02\n");
    let report = res.unwrap();
    assert_eq!(report.records, 3);
    assert_eq!(report.bytes_written, 2);
    assert_eq!(out, vec![0x01, 0x02]);
}

#[test]
fn test_header_only() {
    let (res, out) = convert_str("v2.0 raw\n");
    assert_eq!(
        res.unwrap(),
        ConversionReport { header: HeaderCheck::Matched, records: 0, bytes_written: 0 }
    );
    assert!(out.is_empty());
}

#[test]
fn test_empty_input() {
    let (res, out) = convert_str("");
    let report = res.unwrap();
    assert_eq!(report.header, HeaderCheck::Mismatched { found: String::new() });
    assert_eq!(report.records, 0);
    assert!(out.is_empty());
}

#[test]
fn test_mismatched_header_still_converts() {
    let (res, out) = convert_str("v1.0 raw\n4578616d706c65\n");
    let report = res.unwrap();
    assert_eq!(report.header, HeaderCheck::Mismatched { found: "v1.0 raw".to_string() });
    assert_eq!(out, b"Example");
}

#[test]
fn test_odd_length_aborts() {
    let (res, out) = convert_str("v2.0 raw\n4A\n4\n00\n");
    match res {
        Err(ConversionError::InvalidHex { line, text, source }) => {
            assert_eq!(line, 3);
            assert_eq!(text, "4");
            assert_eq!(source, hex::FromHexError::OddLength);
        }
        other => panic!("expected InvalidHex, got {:?}", other),
    }
    // records before the bad line were already written
    assert_eq!(out, vec![0x4a]);
}

#[test]
fn test_invalid_character_aborts() {
    let (res, out) = convert_str("v2.0 raw\nzz\n");
    assert!(matches!(res, Err(ConversionError::InvalidHex { line: 2, .. })));
    assert!(out.is_empty());
}

#[test]
fn test_non_utf8_input_is_io_error() {
    let mut out = Vec::new();
    let res = convert_stream(Cursor::new(b"v2.0 raw\n\xff\xfe\n".to_vec()), &mut out);
    match res {
        Err(ConversionError::Io { path, .. }) => assert_eq!(path, PathBuf::from(STREAM_PATH)),
        other => panic!("expected Io, got {:?}", other),
    }
}

#[test]
fn test_output_path_appends_suffix() {
    assert_eq!(output_path(Path::new("mem.img")), PathBuf::from("mem.img.bin"));
    assert_eq!(output_path(Path::new("dir/dump")), PathBuf::from("dir/dump.bin"));
}

#[test]
fn test_report_json() {
    let (res, _) = convert_str("v2.0 raw\n0102\n");
    let json = serde_json::to_string(&res.unwrap()).unwrap();
    assert_eq!(json, r#"{"header":{"status":"matched"},"records":1,"bytes_written":2}"#);
}
