//! Line-stream converter: raw container dump text → structured [`Config`].
//!
//! The dump is a list of non-blank lines read as `key, value` pairs. A key's
//! value line may be missing; that is detected purely by look-ahead: if the
//! next line is itself a name from either vocabulary, the key is value-less.
//! A value that happens to spell a vocabulary name is therefore read as a key.

use crate::models::{ButtonKey, Config, LineKind, RecognizedKey, CONTROLLER_BINDINGS_KEY};
use crate::services::coercion::{coerce_binding, coerce_value, trim_blank};
use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Fatal conversion errors. No partial config is produced when one occurs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("Input is empty. Please provide key-value pairs.")]
    EmptyInput,

    /// `position` is 1-based among non-blank lines
    #[error("Unknown key \"{key}\" at position {position}.")]
    UnknownKey { key: String, position: usize },
}

/// A trimmed, non-blank input line and its vocabulary classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    pub text: &'a str,
    pub kind: LineKind,
}

/// Split input into trimmed non-blank lines and classify each one.
///
/// Trimming also drops byte order marks, so a dump saved with a UTF-8 BOM
/// reads the same as one without.
pub fn tokenize(input: &str) -> Result<Vec<ClassifiedLine<'_>>, ConvertError> {
    let lines: Vec<ClassifiedLine<'_>> = input
        .split('\n')
        .map(trim_blank)
        .filter(|line| !line.is_empty())
        .map(|text| ClassifiedLine {
            text,
            kind: LineKind::classify(text),
        })
        .collect();

    if lines.is_empty() {
        return Err(ConvertError::EmptyInput);
    }

    Ok(lines)
}

/// One step of the resolver.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Top-level config entry under the key's output name
    Setting { key: RecognizedKey, value: Value },
    /// Controller binding at the button's index
    Binding { button: ButtonKey, value: String },
    /// Excluded key; its value line (if any) was consumed and dropped
    Excluded { key: RecognizedKey },
}

/// Single forward pass over classified lines.
///
/// Each step consumes one line (value-less key) or two (key and value). After
/// an unknown key is reported the resolver is exhausted.
pub struct PairResolver<'a> {
    lines: &'a [ClassifiedLine<'a>],
    cursor: usize,
}

impl<'a> PairResolver<'a> {
    pub fn new(lines: &'a [ClassifiedLine<'a>]) -> Self {
        Self { lines, cursor: 0 }
    }

    /// Current cursor position (0-based index of the next key line).
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// The value line for the key at the cursor, unless the next line is
    /// missing or is itself a vocabulary name.
    fn value_line(&self) -> Option<&'a str> {
        self.lines
            .get(self.cursor + 1)
            .filter(|next| !next.kind.is_vocabulary())
            .map(|next| next.text)
    }
}

impl Iterator for PairResolver<'_> {
    type Item = Result<Resolved, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.get(self.cursor)?;
        let value_line = self.value_line();

        let resolved = match line.kind {
            LineKind::Button(button) => Resolved::Binding {
                button,
                value: value_line.map(coerce_binding).unwrap_or_default(),
            },
            LineKind::Key(key) if key.is_excluded() => Resolved::Excluded { key },
            LineKind::Key(key) => Resolved::Setting {
                key,
                value: coerce_value(value_line.unwrap_or(""), key),
            },
            LineKind::Unrecognized => {
                let error = ConvertError::UnknownKey {
                    key: line.text.to_string(),
                    position: self.cursor + 1,
                };
                self.cursor = self.lines.len();
                return Some(Err(error));
            }
        };

        self.cursor += if value_line.is_some() { 2 } else { 1 };
        Some(Ok(resolved))
    }
}

/// Counters describing one successful conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionStats {
    pub lines: usize,
    pub settings: usize,
    pub bindings: usize,
    pub excluded: usize,
}

impl ConversionStats {
    pub fn summary(&self) -> String {
        format!(
            "{} lines, {} settings, {} bindings, {} excluded",
            self.lines, self.settings, self.bindings, self.excluded
        )
    }
}

/// Convert dump text into a structured config.
///
/// # Errors
///
/// [`ConvertError::EmptyInput`] when there are no non-blank lines and
/// [`ConvertError::UnknownKey`] when a key line matches neither vocabulary.
pub fn convert(input: &str) -> Result<Config, ConvertError> {
    convert_with_stats(input).map(|(config, _)| config)
}

/// Like [`convert`], also returning [`ConversionStats`].
pub fn convert_with_stats(input: &str) -> Result<(Config, ConversionStats), ConvertError> {
    let lines = tokenize(input)?;

    let mut config = Config::new();
    let mut bindings: IndexMap<&'static str, String> = IndexMap::new();
    let mut stats = ConversionStats {
        lines: lines.len(),
        ..Default::default()
    };

    for step in PairResolver::new(&lines) {
        match step? {
            Resolved::Setting { key, value } => {
                tracing::debug!("{} = {}", key.output_name(), value);
                config.insert(key.output_name().to_string(), value);
                stats.settings += 1;
            }
            Resolved::Binding { button, value } => {
                tracing::debug!("binding {} ({}) = {:?}", button.index(), button.as_str(), value);
                bindings.insert(button.index(), value);
                stats.bindings += 1;
            }
            Resolved::Excluded { key } => {
                tracing::debug!("Skipping excluded key: {}", key.as_str());
                stats.excluded += 1;
            }
        }
    }

    if !bindings.is_empty() {
        bindings.sort_by(|a, _, b, _| binding_slot(a).cmp(&binding_slot(b)));
        let map = bindings
            .into_iter()
            .map(|(index, value)| (index.to_string(), Value::String(value)))
            .collect();
        config.insert(CONTROLLER_BINDINGS_KEY.to_string(), Value::Object(map));
    }

    tracing::info!("Converted config: {}", stats.summary());
    Ok((config, stats))
}

fn binding_slot(index: &str) -> u8 {
    index.parse().unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tokenize_drops_blank_lines() {
        let lines = tokenize("\n  wineVersion \r\n\n8.0\n   \n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "wineVersion");
        assert_eq!(lines[0].kind, LineKind::Key(RecognizedKey::WineVersion));
        assert_eq!(lines[1].text, "8.0");
        assert_eq!(lines[1].kind, LineKind::Unrecognized);
    }

    #[test]
    fn test_tokenize_strips_byte_order_mark() {
        let lines = tokenize("\u{feff}id\r\nSTEAM_1\n\u{feff}\n").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "id");
        assert_eq!(lines[0].kind, LineKind::Key(RecognizedKey::Id));
    }

    #[test]
    fn test_bom_prefixed_dump_converts() {
        let config = convert("\u{feff}id\nSTEAM_1\nname\nx").unwrap();
        assert_eq!(config["id"], json!("STEAM_1"));
        assert_eq!(config["name"], json!("x"));
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize(""), Err(ConvertError::EmptyInput));
        assert_eq!(tokenize(" \n\t\n  "), Err(ConvertError::EmptyInput));
    }

    #[test]
    fn test_end_to_end_example() {
        let config = convert("wineVersion\n8.0\nshowFPS\ntrue\nA\nbutton1").unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value,
            json!({
                "wineVersion": "8.0",
                "showFPS": true,
                "controllerEmulationBindings": {"0": "button1"}
            })
        );
    }

    #[test]
    fn test_value_less_button_advances_by_one() {
        let lines = tokenize("B\nshowFPS\nfalse").unwrap();
        let mut resolver = PairResolver::new(&lines);

        let first = resolver.next().unwrap().unwrap();
        assert_eq!(
            first,
            Resolved::Binding {
                button: ButtonKey::B,
                value: String::new()
            }
        );
        assert_eq!(resolver.position(), 1);

        let second = resolver.next().unwrap().unwrap();
        assert_eq!(
            second,
            Resolved::Setting {
                key: RecognizedKey::ShowFps,
                value: json!(false)
            }
        );
        assert_eq!(resolver.position(), 3);
        assert!(resolver.next().is_none());
    }

    #[test]
    fn test_button_at_end_of_input() {
        let config = convert("name\nGame\nDPAD RIGHT").unwrap();
        assert_eq!(config["controllerEmulationBindings"], json!({"16": ""}));
    }

    #[test]
    fn test_value_less_key_gets_empty_coercion() {
        let config = convert("envVars\nextraData\ndrives").unwrap();
        assert_eq!(config["envVars"], json!(""));
        assert_eq!(config["extraData"], Value::Null);
        assert_eq!(config["drives"], json!(""));
    }

    #[test]
    fn test_excluded_keys_consume_value() {
        let config = convert(
            "avg fps\n59.8\nprofileId\n3\nconfig changed\nname\nMy Game\nsession length sec\n120",
        )
        .unwrap();
        let keys: Vec<&String> = config.keys().collect();
        assert_eq!(keys, vec!["name"]);
        assert_eq!(config["name"], json!("My Game"));
    }

    #[test]
    fn test_lc_all_renamed() {
        let config = convert("lc all\nen_US.utf8").unwrap();
        assert_eq!(config["lc_all"], json!("en_US.utf8"));
        assert!(!config.contains_key("lc all"));
    }

    #[test]
    fn test_unknown_key_position() {
        let err = convert("name\nGame\n\nfooBar\nx").unwrap_err();
        assert_eq!(
            err,
            ConvertError::UnknownKey {
                key: "fooBar".to_string(),
                position: 3
            }
        );
        assert_eq!(err.to_string(), "Unknown key \"fooBar\" at position 3.");
    }

    #[test]
    fn test_unknown_line_in_value_position_is_a_value() {
        let config = convert("name\nfooBar").unwrap();
        assert_eq!(config["name"], json!("fooBar"));
    }

    #[test]
    fn test_value_colliding_with_vocabulary_is_read_as_key() {
        let config = convert("name\nid\nSTEAM_10").unwrap();
        assert_eq!(config["name"], json!(""));
        assert_eq!(config["id"], json!("STEAM_10"));
    }

    #[test]
    fn test_bindings_ordered_by_index() {
        let config = convert("DPAD UP\nup\nA\na\nR2\nr2\nX\nx").unwrap();
        let bindings = config["controllerEmulationBindings"].as_object().unwrap();
        let order: Vec<&String> = bindings.keys().collect();
        assert_eq!(order, vec!["0", "2", "10", "13"]);
    }

    #[test]
    fn test_bindings_come_last() {
        let config = convert("A\njump\nname\nGame").unwrap();
        let keys: Vec<&String> = config.keys().collect();
        assert_eq!(keys, vec!["name", "controllerEmulationBindings"]);
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let config = convert("name\nfirst\nid\nx\nname\nsecond").unwrap();
        let keys: Vec<&String> = config.keys().collect();
        assert_eq!(keys, vec!["name", "id"]);
        assert_eq!(config["name"], json!("second"));
    }

    #[test]
    fn test_stats() {
        let (_, stats) = convert_with_stats("name\nGame\nappVersion\n1.2\nA\nB\njump").unwrap();
        assert_eq!(
            stats,
            ConversionStats {
                lines: 7,
                settings: 1,
                bindings: 2,
                excluded: 1,
            }
        );
        assert_eq!(stats.summary(), "7 lines, 1 settings, 2 bindings, 1 excluded");
    }
}
