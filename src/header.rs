use serde::Serialize;

/// First line of every memory image this tool understands.
pub const FORMAT_TAG: &str = "v2.0 raw";

/// Outcome of comparing the first line of an image against [`FORMAT_TAG`].
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeaderCheck {
    Matched,
    Mismatched { found: String },
}

impl HeaderCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, HeaderCheck::Matched)
    }
}

/// Strip a trailing `\n` or `\r\n`, leaving any other whitespace in place.
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

pub fn check_header(line: &str) -> HeaderCheck {
    let tag = strip_line_terminator(line);
    if tag == FORMAT_TAG {
        HeaderCheck::Matched
    } else {
        HeaderCheck::Mismatched { found: tag.to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matching_tag() {
        assert_eq!(check_header("v2.0 raw\n"), HeaderCheck::Matched);
        assert_eq!(check_header("v2.0 raw\r\n"), HeaderCheck::Matched);
        assert_eq!(check_header("v2.0 raw"), HeaderCheck::Matched);
    }

    #[test]
    fn test_other_tags() {
        assert_eq!(
            check_header("v1.0 raw\n"),
            HeaderCheck::Mismatched { found: "v1.0 raw".to_string() }
        );
        assert!(!check_header("V2.0 RAW\n").is_match());
        assert!(!check_header("v2.0 raw \n").is_match());
        assert!(!check_header("").is_match());
    }

    #[test]
    fn test_strip_only_terminator() {
        assert_eq!(strip_line_terminator("00 ff\r\n"), "00 ff");
        assert_eq!(strip_line_terminator(" 00\t\n"), " 00\t");
        assert_eq!(strip_line_terminator("\n"), "");
    }

    #[test]
    fn test_serialize() {
        assert_eq!(
            serde_json::to_value(HeaderCheck::Matched).unwrap(),
            json!({"status": "matched"})
        );
        assert_eq!(
            serde_json::to_value(check_header("v1.0 raw")).unwrap(),
            json!({"status": "mismatched", "found": "v1.0 raw"})
        );
    }
}
