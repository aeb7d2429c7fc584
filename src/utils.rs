use std::io::{self, BufRead};

use hex::FromHexError;

/// Whitespace allowed between digit pairs. Vertical tab counts, unlike
/// `char::is_ascii_whitespace`.
fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Decode one hex record into bytes.
///
/// Digit pairs may be separated by whitespace, which is skipped. Every
/// whitespace-delimited group must hold an even number of hex digits, so a
/// pair split by a space ("4 A") is rejected as odd length. The index of an
/// invalid character is its byte offset in `hex`.
pub fn hex_to_bin(hex: &str) -> Result<Vec<u8>, FromHexError>
{
    let mut bytes = Vec::with_capacity(hex.len() / 2);
    let mut offset = 0;
    // separators are single ascii bytes
    for group in hex.split(is_separator) {
        if !group.is_empty() {
            let decoded = hex::decode(group).map_err(|e| match e {
                FromHexError::InvalidHexCharacter { c, index } => {
                    FromHexError::InvalidHexCharacter { c, index: offset + index }
                }
                other => other,
            })?;
            bytes.extend(decoded);
        }
        offset += group.len() + 1;
    }
    Ok(bytes)
}

/// Read one line ended by `\n`, `\r\n` or a bare `\r`, terminator removed.
///
/// Returns `None` at end of input. A final line without terminator is still
/// returned. Invalid UTF-8 is reported as `InvalidData`.
pub fn read_line_universal<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut bytes = Vec::new();
    let mut read_any = false;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            break;
        }
        read_any = true;
        match buf.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let cr = buf[i] == b'\r';
                bytes.extend_from_slice(&buf[..i]);
                reader.consume(i + 1);
                if cr && reader.fill_buf()?.first() == Some(&b'\n') {
                    reader.consume(1);
                }
                break;
            }
            None => {
                let n = buf.len();
                bytes.extend_from_slice(buf);
                reader.consume(n);
            }
        }
    }
    if !read_any {
        return Ok(None);
    }
    String::from_utf8(bytes)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
