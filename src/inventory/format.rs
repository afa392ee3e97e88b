use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::io;

use crate::Error;

const INDENT: &[u8] = b"  ";

/// Pretty printer with a two space indent which escapes every non-ASCII
/// character as `\uXXXX`, so the output is plain ASCII.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn new() -> Self {
        AsciiPrettyFormatter {
            inner: PrettyFormatter::with_indent(INDENT),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Rebuild `value` with the keys of every object, at any depth, in sorted order.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Serialize `data` the way inventory consumers expect it: sorted keys, two space indent.
/// Array order is left untouched.
pub fn json_format_dict<T: Serialize + ?Sized>(data: &T) -> Result<String, Error> {
    let value = sort_keys(serde_json::to_value(data)?);

    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, AsciiPrettyFormatter::new());
    value.serialize(&mut serializer)?;

    String::from_utf8(buf)
        .map_err(|e| Error::Output(io::Error::new(io::ErrorKind::InvalidData, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn test_empty_mapping_is_braces() {
        let empty: BTreeMap<String, Value> = BTreeMap::new();
        assert_eq!(json_format_dict(&empty).unwrap(), "{}");
    }

    #[test]
    fn test_two_space_indent_and_sorted_keys() {
        let data = json!({
            "backend_servers": ["10.0.0.3"],
            "app_servers": ["10.0.0.1", "10.0.0.2"],
        });

        let expected = r#"{
  "app_servers": [
    "10.0.0.1",
    "10.0.0.2"
  ],
  "backend_servers": [
    "10.0.0.3"
  ]
}"#;
        assert_eq!(json_format_dict(&data).unwrap(), expected);
    }

    #[test]
    fn test_nested_keys_sorted_and_list_order_kept() {
        let data = json!({
            "z": {"b": 1, "a": [3, 1, 2]},
            "a": [],
        });

        let expected = r#"{
  "a": [],
  "z": {
    "a": [
      3,
      1,
      2
    ],
    "b": 1
  }
}"#;
        assert_eq!(json_format_dict(&data).unwrap(), expected);
    }

    #[test]
    fn test_non_ascii_is_escaped() {
        let data = json!({"hosts": ["café", "🦀"]});
        let formatted = json_format_dict(&data).unwrap();

        assert!(formatted.is_ascii());
        assert!(formatted.contains(r#""caf\u00e9""#));
        assert!(formatted.contains(r#""\ud83e\udd80""#));
        assert_eq!(serde_json::from_str::<Value>(&formatted).unwrap(), data);
    }

    #[test]
    fn test_control_characters_still_escaped() {
        let data = json!({"k": "line\n\"quoted\""});
        assert_eq!(
            json_format_dict(&data).unwrap(),
            "{\n  \"k\": \"line\\n\\\"quoted\\\"\"\n}"
        );
    }

    #[test]
    fn test_reformatting_output_is_byte_identical() {
        let data = json!({
            "backend_servers": ["db-1", "db-0"],
            "app_servers": ["web-ü", "web-2"],
        });

        let first = json_format_dict(&data).unwrap();
        let reparsed: Value = serde_json::from_str(&first).unwrap();
        let second = json_format_dict(&reparsed).unwrap();

        assert_eq!(first, second);
    }
}
