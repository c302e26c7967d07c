//! Repair of pseudo-JSON literals into strict JSON text.
//!
//! The source dataset renders its `genres` and `production_companies`
//! columns as Python-literal lists of dicts: single-quoted strings and
//! capitalized `True`/`False`/`None` tokens. [`normalize_literal()`] turns
//! such a cell into text a strict JSON parser accepts, or reports that the
//! cell holds no usable structure at all.
//!
//! Quote repair tracks quoting context character by character. A blind
//! global `'` → `"` substitution corrupts apostrophes inside values
//! (`"Ocean's Eleven"`), which is the primary correctness risk here.

/// Convert a raw cell into strict JSON text.
///
/// Returns `None` for cells with no usable structure: empty/whitespace-only
/// input, the placeholder tokens `nan`/`None`, and anything that still does
/// not parse as JSON after repair. Callers treat `None` as an empty list.
pub fn normalize_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") || trimmed == "None" {
        return None;
    }
    // Cells that are already valid JSON pass through untouched.
    if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
        return Some(trimmed.to_string());
    }
    let repaired = repair_literal(trimmed);
    if serde_json::from_str::<serde_json::Value>(&repaired).is_ok() {
        Some(repaired)
    } else {
        None
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    Outside,
    InSingle,
    InDouble,
}

/// Rewrite Python-literal syntax as JSON syntax.
///
/// Single-quoted strings become double-quoted (escaping any interior double
/// quotes), double-quoted strings pass through verbatim (so apostrophes in
/// values survive), and bare `True`/`False`/`None` tokens outside strings
/// become `true`/`false`/`null`. The output is not guaranteed to be valid
/// JSON; [`normalize_literal()`] validates it with a strict parse.
fn repair_literal(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 8);
    let mut state = QuoteState::Outside;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            QuoteState::Outside => match c {
                '\'' => {
                    out.push('"');
                    state = QuoteState::InSingle;
                }
                '"' => {
                    out.push('"');
                    state = QuoteState::InDouble;
                }
                c if c.is_ascii_alphabetic() => {
                    let mut token = String::new();
                    token.push(c);
                    while let Some(&next) = chars.peek() {
                        if next.is_ascii_alphanumeric() || next == '_' {
                            token.push(next);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    out.push_str(match token.as_str() {
                        "True" => "true",
                        "False" => "false",
                        "None" => "null",
                        _ => &token,
                    });
                }
                c => out.push(c),
            },
            QuoteState::InSingle => match c {
                '\\' => {
                    // Python escapes: `\'` needs no escape in JSON, the rest
                    // are forwarded untouched.
                    match chars.next() {
                        Some('\'') => out.push('\''),
                        Some(escaped) => {
                            out.push('\\');
                            out.push(escaped);
                        }
                        None => out.push('\\'),
                    }
                }
                '\'' => {
                    out.push('"');
                    state = QuoteState::Outside;
                }
                '"' => out.push_str("\\\""),
                c => out.push(c),
            },
            QuoteState::InDouble => match c {
                '\\' => {
                    out.push('\\');
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => {
                    out.push('"');
                    state = QuoteState::Outside;
                }
                c => out.push(c),
            },
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_literal_rejects_empty_and_placeholder_inputs() {
        assert_eq!(normalize_literal(""), None);
        assert_eq!(normalize_literal("   "), None);
        assert_eq!(normalize_literal("nan"), None);
        assert_eq!(normalize_literal("NaN"), None);
        assert_eq!(normalize_literal("None"), None);
    }

    #[test]
    fn normalize_literal_repairs_single_quoted_list_of_dicts() {
        let raw = "[{'id': 28, 'name': 'Action'}, {'id': 18, 'name': 'Drama'}]";
        let normalized = normalize_literal(raw).expect("usable structure");
        assert_eq!(
            normalized,
            r#"[{"id": 28, "name": "Action"}, {"id": 18, "name": "Drama"}]"#
        );
    }

    #[test]
    fn normalize_literal_preserves_apostrophes_in_double_quoted_values() {
        let raw = r#"[{'id': 12, 'name': "Ocean's Eleven Productions"}]"#;
        let normalized = normalize_literal(raw).expect("usable structure");
        let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(parsed[0]["name"], "Ocean's Eleven Productions");
    }

    #[test]
    fn normalize_literal_unescapes_python_apostrophe_escapes() {
        let raw = r"[{'name': 'O\'Hara Films'}]";
        let normalized = normalize_literal(raw).expect("usable structure");
        let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(parsed[0]["name"], "O'Hara Films");
    }

    #[test]
    fn normalize_literal_escapes_double_quotes_inside_single_quoted_values() {
        let raw = r#"[{'name': 'The "Big" Studio'}]"#;
        let normalized = normalize_literal(raw).expect("usable structure");
        let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(parsed[0]["name"], r#"The "Big" Studio"#);
    }

    #[test]
    fn normalize_literal_replaces_python_keyword_tokens() {
        let raw = "[{'adult': False, 'video': True, 'homepage': None}]";
        let normalized = normalize_literal(raw).expect("usable structure");
        let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(parsed[0]["adult"], false);
        assert_eq!(parsed[0]["video"], true);
        assert_eq!(parsed[0]["homepage"], serde_json::Value::Null);
    }

    #[test]
    fn normalize_literal_keeps_keyword_lookalikes_inside_strings() {
        let raw = "[{'name': 'True Lies None False'}]";
        let normalized = normalize_literal(raw).expect("usable structure");
        let parsed: serde_json::Value = serde_json::from_str(&normalized).unwrap();
        assert_eq!(parsed[0]["name"], "True Lies None False");
    }

    #[test]
    fn normalize_literal_passes_valid_json_through_unchanged() {
        let raw = r#"[{"id": 1, "name": "Crime's Partner"}]"#;
        assert_eq!(normalize_literal(raw).as_deref(), Some(raw));
    }

    #[test]
    fn normalize_literal_rejects_unrepairable_text() {
        assert_eq!(normalize_literal("not structured at all"), None);
        assert_eq!(normalize_literal("[{'name': 'broken}"), None);
    }
}
