//! Struct tag grammar.
//!
//! A raw tag is a space-separated list of `key:"value"` pairs. Keys that are
//! not a known [`Namespace`] are ignored. Each known namespace is parsed with
//! the grammar of its family:
//!
//! - naming namespaces: `name[,option...]` where `-` alone drops the field
//!   and `-,` renames it to `-`;
//! - validation namespaces: `rule[=arg][,rule[=arg]...]`.
//!
//! Grammar failures are collected in [`ParsedTags::malformed`] and the
//! offending namespace is left out of [`ParsedTags::values`].

use crate::ir::{MalformedTag, NameOverride, Namespace, TagSet, TagValue, ValidatorRule};

/// Result of parsing one raw struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTags {
    /// Well-formed namespaces in tag order
    pub values: TagSet,

    /// Namespaces or fragments that failed the grammar
    pub malformed: Vec<MalformedTag>,
}

/// Parse a raw struct tag.
pub fn parse_struct_tag(raw: &str) -> ParsedTags {
    let mut parsed = ParsedTags::default();
    let mut rest = raw;

    loop {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            break;
        }

        let key_len = rest
            .find(|c: char| c <= ' ' || c == ':' || c == '"' || c == '\u{7f}')
            .unwrap_or(rest.len());
        let key = &rest[..key_len];
        let after_key = &rest[key_len..];

        if key.is_empty() || !after_key.starts_with(":\"") {
            parsed
                .malformed
                .push(MalformedTag::new(key, rest, "expected `key:\"value\"`"));
            break;
        }

        let quoted = &after_key[1..];
        let Some((value, consumed)) = scan_quoted(quoted) else {
            parsed
                .malformed
                .push(MalformedTag::new(key, quoted, "unterminated quoted value"));
            break;
        };
        rest = &quoted[consumed..];

        let Some(namespace) = Namespace::from_key(key) else {
            continue;
        };
        if parsed.values.contains_key(&namespace) {
            parsed
                .malformed
                .push(MalformedTag::new(key, &value, "duplicate tag key"));
            continue;
        }

        let result = if namespace.is_validation() {
            parse_validation_value(&value)
        } else {
            parse_naming_value(&value)
        };
        match result {
            Ok(tag_value) => {
                parsed.values.insert(namespace, tag_value);
            }
            Err(reason) => parsed
                .malformed
                .push(MalformedTag::new(key, &value, reason)),
        }
    }

    parsed
}

/// Scan a double-quoted string at the start of `input`.
///
/// Returns the unescaped content and the number of bytes consumed, including
/// both quotes.
fn scan_quoted(input: &str) -> Option<(String, usize)> {
    let mut chars = input.char_indices();
    let (_, first) = chars.next()?;
    if first != '"' {
        return None;
    }

    let mut value = String::new();
    while let Some((index, c)) = chars.next() {
        match c {
            '"' => return Some((value, index + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => other,
                });
            }
            other => value.push(other),
        }
    }
    None
}

fn parse_naming_value(value: &str) -> Result<TagValue, String> {
    let mut parts = value.split(',');
    let name = parts.next().unwrap_or_default();
    let has_options = value.contains(',');

    if name.chars().any(|c| c.is_whitespace() || c == '"' || c == '\'') {
        return Err(format!("invalid name `{name}`"));
    }

    let mut tag_value = TagValue::new();
    tag_value.name = match name {
        "" => None,
        "-" if !has_options => Some(NameOverride::Drop),
        other => Some(NameOverride::Rename(other.to_string())),
    };

    for option in parts {
        match option.trim() {
            "omitempty" => tag_value.omit_empty = true,
            "required" => tag_value.required = true,
            _ => {}
        }
    }

    Ok(tag_value)
}

fn parse_validation_value(value: &str) -> Result<TagValue, String> {
    let mut tag_value = TagValue::new();
    if value.trim().is_empty() {
        return Ok(tag_value);
    }

    for part in value.split(',') {
        let part = part.trim();
        if part.is_empty() {
            return Err("empty rule".to_string());
        }

        let rule = match part.split_once('=') {
            Some((name, arg)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("rule `{part}` has no name"));
                }
                ValidatorRule::with_arg(name, arg)
            }
            None => ValidatorRule::new(part),
        };

        match rule.name.as_str() {
            "required" => tag_value.required = true,
            "omitempty" => tag_value.omit_empty = true,
            _ => {}
        }
        tag_value.validators.push(rule);
    }

    Ok(tag_value)
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parser_is_total() {
        proptest!(|(raw in ".{0,64}")| {
            let parsed = parse_struct_tag(&raw);
            for namespace in parsed.values.keys() {
                prop_assert!(Namespace::ALL.contains(namespace));
            }
        });
    }

    #[test]
    fn plain_names_round_trip() {
        proptest!(|(name in "[a-zA-Z_][a-zA-Z0-9_]{0,15}", omit in any::<bool>())| {
            let raw = if omit {
                format!("json:\"{name},omitempty\"")
            } else {
                format!("json:\"{name}\"")
            };
            let parsed = parse_struct_tag(&raw);
            prop_assert!(parsed.malformed.is_empty());
            let value = &parsed.values[&Namespace::Json];
            prop_assert_eq!(value.name.clone(), Some(NameOverride::Rename(name)));
            prop_assert_eq!(value.omit_empty, omit);
        });
    }
}
