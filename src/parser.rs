use crate::models::{Field, ParsedLine, PlaceholderMarker, ProcessedTemplate, Token};

const PLACEHOLDER_TOKENS: [&str; 10] = [
    "your-",
    "YOUR_",
    "example",
    "EXAMPLE",
    "placeholder",
    "PLACEHOLDER",
    "change-me",
    "CHANGE_ME",
    "xxx",
    "XXX",
];

/// Classifies a single line (without its terminator) as `KEY=VALUE` or passthrough.
pub(crate) fn parse_line(line: &str) -> ParsedLine<'_> {
    match split_assignment(line) {
        Some((key, value)) => ParsedLine::Assignment { key, value },
        None => ParsedLine::Passthrough { raw: line },
    }
}

fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let first = line.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let key_end = line
        .find(|ch: char| !(ch.is_ascii_alphanumeric() || ch == '_'))
        .unwrap_or(line.len());
    let rest = line[key_end..].trim_start();
    let value = rest.strip_prefix('=')?.trim_start();
    Some((&line[..key_end], value))
}

pub(crate) fn is_placeholder(value: &str) -> bool {
    value.is_empty()
        || value == "\"\""
        || value == "''"
        || PLACEHOLDER_TOKENS.iter().any(|token| value.contains(token))
}

/// Builds the plain copy and the tab-stop snippet for a template.
///
/// Placeholder lines become `KEY=${N:default}` with `N` counting up from 1 in
/// file order. Every other line is emitted unchanged. A trailing `\r` is kept
/// on the line but never counted as part of the value.
pub(crate) fn process_template(content: &str) -> ProcessedTemplate {
    let mut lines = Vec::new();
    let mut markers: Vec<PlaceholderMarker> = Vec::new();
    let mut first_offset = None;
    let mut offset = 0;

    for (number, source) in content.split('\n').enumerate() {
        let (line, terminator) = match source.strip_suffix('\r') {
            Some(line) => (line, "\r"),
            None => (source, ""),
        };
        match parse_line(line) {
            ParsedLine::Assignment { key, value } if is_placeholder(value) => {
                let index = markers.len() + 1;
                if first_offset.is_none() {
                    let after_eq = line.find('=').map_or(key.len(), |at| at + 1);
                    first_offset = Some(offset + line[..after_eq].chars().count());
                }
                lines.push(format!(
                    "{key}=${{{index}:{}}}{terminator}",
                    escape_default(value)
                ));
                markers.push(PlaceholderMarker {
                    index,
                    line: number,
                    key: key.to_string(),
                    default: value.to_string(),
                });
            }
            ParsedLine::Assignment { .. } => lines.push(source.to_string()),
            ParsedLine::Passthrough { raw } => lines.push(format!("{raw}{terminator}")),
        }
        offset += source.chars().count() + 1;
    }

    ProcessedTemplate {
        plain: content.to_string(),
        snippet: lines.join("\n"),
        markers,
        first_offset,
    }
}

fn escape_default(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '$' | '}') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Splits snippet text into literal runs and the `${N:default}` stops listed
/// in `stops`.
///
/// A stop is only read on the line its marker was emitted for, right after
/// `KEY=`, so annotation syntax anywhere else stays literal text.
pub(crate) fn parse_snippet(body: &str, stops: &[PlaceholderMarker]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    for (number, line) in body.split('\n').enumerate() {
        if number > 0 {
            text.push('\n');
        }
        let found = stops
            .iter()
            .find(|stop| stop.line == number)
            .and_then(|stop| stop_on_line(line, stop));
        match found {
            Some((start, end, token)) => {
                text.push_str(&line[..start]);
                if !text.is_empty() {
                    tokens.push(Token::Text(std::mem::take(&mut text)));
                }
                tokens.push(token);
                text.push_str(&line[end..]);
            }
            None => text.push_str(line),
        }
    }
    if !text.is_empty() {
        tokens.push(Token::Text(text));
    }
    tokens
}

/// Byte span of `stop` within `line` and the parsed token.
fn stop_on_line(line: &str, stop: &PlaceholderMarker) -> Option<(usize, usize, Token)> {
    let after_key = line.strip_prefix(stop.key.as_str())?.strip_prefix('=')?;
    let inner = after_key.strip_prefix("${")?;
    let (token, consumed) = parse_stop(inner)?;
    match token {
        Token::Stop { index, .. } if index == stop.index => {
            let start = stop.key.len() + 1;
            Some((start, start + 2 + consumed, token))
        }
        _ => None,
    }
}

fn parse_stop(after: &str) -> Option<(Token, usize)> {
    let digits = after
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(after.len());
    if digits == 0 {
        return None;
    }
    let index = after[..digits].parse::<usize>().ok()?;
    let rest = after[digits..].strip_prefix(':')?;
    let mut default = String::new();
    let mut escaped = false;
    for (at, ch) in rest.char_indices() {
        if escaped {
            if !matches!(ch, '\\' | '$' | '}') {
                default.push('\\');
            }
            default.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '}' {
            return Some((Token::Stop { index, default }, digits + 1 + at + 1));
        } else if ch == '\n' {
            return None;
        } else {
            default.push(ch);
        }
    }
    None
}

pub(crate) fn collect_fields(tokens: &[Token], markers: &[PlaceholderMarker]) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    for token in tokens {
        if let Token::Stop { index, default } = token {
            if fields.iter().any(|field| field.index == *index) {
                continue;
            }
            let marker = markers.iter().find(|marker| marker.index == *index);
            fields.push(Field {
                index: *index,
                label: marker.map_or_else(|| format!("${index}"), |marker| marker.key.clone()),
                value: marker.map_or_else(|| default.clone(), |marker| marker.default.clone()),
                edited: false,
            });
        }
    }
    fields
}

pub(crate) fn render_snippet(tokens: &[Token], fields: &[Field]) -> String {
    let mut output = String::new();
    for token in tokens {
        match token {
            Token::Text(text) => output.push_str(text),
            Token::Stop { index, default } => {
                let value = fields
                    .iter()
                    .find(|field| field.index == *index)
                    .map(|field| field.value.as_str())
                    .unwrap_or(default.as_str());
                output.push_str(value);
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "DB_HOST=localhost\nDB_PASSWORD=change-me\nDEBUG=true";

    #[test]
    fn classifies_assignments_and_passthrough() {
        assert_eq!(
            parse_line("API_KEY = your-key-here"),
            ParsedLine::Assignment {
                key: "API_KEY",
                value: "your-key-here"
            }
        );
        assert_eq!(
            parse_line("# comment"),
            ParsedLine::Passthrough { raw: "# comment" }
        );
        assert_eq!(
            parse_line("1KEY=value"),
            ParsedLine::Passthrough { raw: "1KEY=value" }
        );
        assert_eq!(
            parse_line("bad-key=value"),
            ParsedLine::Passthrough {
                raw: "bad-key=value"
            }
        );
        assert_eq!(
            parse_line("lower_case="),
            ParsedLine::Assignment {
                key: "lower_case",
                value: ""
            }
        );
    }

    #[test]
    fn detects_placeholder_values() {
        assert!(is_placeholder("your-key-here"));
        assert!(!is_placeholder("8080"));
        assert!(is_placeholder("\"\""));
        assert!(is_placeholder("''"));
        assert!(is_placeholder(""));
        assert!(is_placeholder("sk_XXX"));
        assert!(is_placeholder("https://example.com"));
        // listed variants only, no case folding
        assert!(!is_placeholder("Your-key"));
        assert!(!is_placeholder("Change-Me"));
    }

    #[test]
    fn sample_template_gets_one_stop() {
        let processed = process_template(SAMPLE);
        assert_eq!(processed.plain, SAMPLE);
        assert!(processed.has_placeholder());
        assert_eq!(
            processed.snippet,
            "DB_HOST=localhost\nDB_PASSWORD=${1:change-me}\nDEBUG=true"
        );
        assert_eq!(
            processed.markers,
            vec![PlaceholderMarker {
                index: 1,
                line: 1,
                key: "DB_PASSWORD".to_string(),
                default: "change-me".to_string(),
            }]
        );
    }

    #[test]
    fn first_offset_points_past_equals_sign() {
        let processed = process_template(SAMPLE);
        let offset = processed.first_offset.unwrap();
        let rest: String = SAMPLE.chars().skip(offset).collect();
        assert!(rest.starts_with("change-me"));
    }

    #[test]
    fn first_offset_counts_characters() {
        let content = "NAME=héllo\nTOKEN=xxx";
        let offset = process_template(content).first_offset.unwrap();
        assert_eq!(offset, "NAME=héllo\nTOKEN=".chars().count());
    }

    #[test]
    fn empty_template_has_no_stops() {
        let processed = process_template("");
        assert_eq!(processed.plain, "");
        assert_eq!(processed.snippet, "");
        assert!(!processed.has_placeholder());
        assert_eq!(processed.first_offset, None);
    }

    #[test]
    fn stop_indices_follow_file_order() {
        let content = "# header\nA=\nPORT=8080\nB=YOUR_TOKEN\n\nC=''\nD=real";
        let processed = process_template(content);
        assert_eq!(
            processed.snippet,
            "# header\nA=${1:}\nPORT=8080\nB=${2:YOUR_TOKEN}\n\nC=${3:''}\nD=real"
        );
        let indices: Vec<usize> = processed.markers.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn keeps_trailing_newline_and_crlf() {
        let processed = process_template("A=1\r\nB=xxx\r\n");
        assert_eq!(processed.snippet, "A=1\r\nB=${1:xxx}\r\n");
        assert_eq!(processed.markers[0].default, "xxx");
    }

    #[test]
    fn escapes_annotation_characters_in_defaults() {
        let processed = process_template("SECRET=example${x}\\y");
        assert_eq!(processed.snippet, "SECRET=${1:example\\${x\\}\\\\y}");
        let tokens = parse_snippet(&processed.snippet, &processed.markers);
        assert_eq!(
            tokens,
            vec![
                Token::Text("SECRET=".to_string()),
                Token::Stop {
                    index: 1,
                    default: "example${x}\\y".to_string(),
                },
            ]
        );
    }

    #[test]
    fn snippet_leaves_other_dollars_literal() {
        let stops = [PlaceholderMarker {
            index: 1,
            line: 1,
            key: "KEY".to_string(),
            default: "abc".to_string(),
        }];
        let tokens = parse_snippet("URL=${HOST}:$PORT\nKEY=${1:abc}", &stops);
        assert_eq!(
            tokens,
            vec![
                Token::Text("URL=${HOST}:$PORT\nKEY=".to_string()),
                Token::Stop {
                    index: 1,
                    default: "abc".to_string(),
                },
            ]
        );
    }

    #[test]
    fn renders_defaults_then_user_values() {
        let processed = process_template(SAMPLE);
        let tokens = parse_snippet(&processed.snippet, &processed.markers);
        let mut fields = collect_fields(&tokens, &processed.markers);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "DB_PASSWORD");
        assert_eq!(render_snippet(&tokens, &fields), SAMPLE);

        fields[0].value = "s3cret".to_string();
        assert_eq!(
            render_snippet(&tokens, &fields),
            "DB_HOST=localhost\nDB_PASSWORD=s3cret\nDEBUG=true"
        );
    }

    #[test]
    fn literal_annotation_outside_placeholders_stays_text() {
        let content = "GREETING=${1:hi}\nAPI_KEY=";
        let processed = process_template(content);
        assert_eq!(processed.snippet, "GREETING=${1:hi}\nAPI_KEY=${1:}");
        let tokens = parse_snippet(&processed.snippet, &processed.markers);
        assert_eq!(
            tokens,
            vec![
                Token::Text("GREETING=${1:hi}\nAPI_KEY=".to_string()),
                Token::Stop {
                    index: 1,
                    default: String::new(),
                },
            ]
        );
        let mut fields = collect_fields(&tokens, &processed.markers);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label, "API_KEY");
        assert_eq!(render_snippet(&tokens, &fields), content);

        fields[0].value = "k".to_string();
        assert_eq!(
            render_snippet(&tokens, &fields),
            "GREETING=${1:hi}\nAPI_KEY=k"
        );
    }
}
