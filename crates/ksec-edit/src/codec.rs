//! Line-oriented `key: value` rendering of secret data
//!
//! Values are written verbatim, so a value containing a newline or non-UTF-8
//! bytes does not survive a round trip. Both cases are logged when encoding.

use std::fmt::Write;

use tracing::warn;

use ksec_types::{Error, Result, SecretData};

/// Render secret data as one `key: value` line per entry, sorted by key
pub fn encode(data: &SecretData) -> String {
    let mut out = String::new();
    for (key, value) in data {
        let text = String::from_utf8_lossy(value);
        if std::str::from_utf8(value).is_err() {
            warn!(key, "Value is not valid UTF-8 and will be rendered lossily");
        } else if text.contains('\n') {
            warn!(key, "Value spans multiple lines and will not parse back as-is");
        }
        // Writing to a String cannot fail
        let _ = writeln!(out, "{}: {}", key, text);
    }
    out
}

/// Parse `key: value` lines back into secret data
///
/// Blank lines are skipped. Each remaining line is split on its first colon,
/// with whitespace trimmed around key and value. Later duplicates win.
pub fn decode(text: &str) -> Result<SecretData> {
    let mut data = SecretData::new();

    for (idx, line) in text.split('\n').enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            return Err(Error::Parse {
                line: idx + 1,
                content: line.to_string(),
            });
        };

        data.insert(key.trim().to_string(), value.trim().as_bytes().to_vec());
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn data(pairs: &[(&str, &str)]) -> SecretData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn test_encode_sorted_lines() {
        let encoded = encode(&data(&[("b", "2"), ("a", "1")]));
        assert_eq!(encoded, "a: 1\nb: 2\n");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&SecretData::new()), "");
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::single(&[("user", "alice")])]
    #[case::colons_in_value(&[
        ("DATABASE_URL", "postgres://user:pw@db:5432/app"),
        ("ts", "12:30:00"),
    ])]
    #[case::empty_value(&[("empty", ""), ("token", "abc==")])]
    #[case::unicode(&[("greeting", "grüße 👋"), ("path", "C:\\temp")])]
    fn test_round_trip(#[case] pairs: &[(&str, &str)]) {
        let original = data(pairs);
        assert_eq!(decode(&encode(&original)).unwrap(), original);
    }

    #[test]
    fn test_decode_splits_on_first_colon() {
        let decoded = decode("url: http://host:8080/path\n").unwrap();
        assert_eq!(decoded, data(&[("url", "http://host:8080/path")]));
    }

    #[test]
    fn test_decode_trims_and_skips_blank_lines() {
        let decoded = decode("\n  user :  alice  \n\n   \r\npass:x\r\n").unwrap();
        assert_eq!(decoded, data(&[("pass", "x"), ("user", "alice")]));
    }

    #[test]
    fn test_decode_last_duplicate_wins() {
        let decoded = decode("k: 1\nk: 2\n").unwrap();
        assert_eq!(decoded, data(&[("k", "2")]));
    }

    #[rstest]
    #[case("no colon here", 1)]
    #[case("a: 1\nbroken", 2)]
    #[case("a: 1\n\nb: 2\n   missing\n", 4)]
    fn test_decode_rejects_line_without_colon(#[case] text: &str, #[case] expected: usize) {
        match decode(text) {
            Err(Error::Parse { line, content }) => {
                assert_eq!(line, expected);
                assert!(!content.contains(':'));
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }
}
