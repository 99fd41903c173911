//! Javadoc comment parsing: description, first sentence, inline and block
//! tags.

/// A parsed tag, inline or block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocTag {
    /// Plain text (`Text`), `{@code}`, `@param`, `@return`, ...
    Text { tag: String, text: String },
    /// `@see`, `{@link}`, `{@linkplain}` with an unresolved reference.
    Reference {
        tag: String,
        reference: String,
        label: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Javadoc {
    /// Main description, block tags excluded.
    pub description: String,
    pub inline: Vec<DocTag>,
    pub first_sentence: Vec<DocTag>,
    pub block: Vec<DocTag>,
}

/// Parse a raw `/** ... */` comment.
pub fn parse(raw: &str) -> Javadoc {
    let body = strip_delimiters(raw);
    let (description, blocks) = split_block_tags(&body);
    let description = description.trim().to_string();
    let first = first_sentence(&description);

    Javadoc {
        inline: inline_tags(&description),
        first_sentence: inline_tags(first),
        block: blocks.iter().map(|(name, text)| block_tag(name, text)).collect(),
        description,
    }
}

/// Remove `/**`, `*/` and the leading `*` of every line.
fn strip_delimiters(raw: &str) -> String {
    let inner = raw.trim();
    let inner = inner.strip_prefix("/**").unwrap_or(inner);
    let inner = inner.strip_suffix("*/").unwrap_or(inner);
    inner
        .lines()
        .map(|line| {
            let line = line.trim_start();
            let line = line.strip_prefix('*').unwrap_or(line);
            line.strip_prefix(' ').unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split at lines starting with `@`. Returns the description and
/// `(tag name, body)` pairs in order.
fn split_block_tags(body: &str) -> (String, Vec<(String, String)>) {
    let mut description = Vec::new();
    let mut blocks: Vec<(String, Vec<&str>)> = Vec::new();
    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('@') {
            let name_end = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let (name, rest) = trimmed.split_at(name_end);
            blocks.push((name.to_string(), vec![rest.trim_start()]));
        } else if let Some((_, lines)) = blocks.last_mut() {
            lines.push(line);
        } else {
            description.push(line);
        }
    }
    let blocks = blocks
        .into_iter()
        .map(|(name, lines)| (name, lines.join("\n").trim().to_string()))
        .collect();
    (description.join("\n"), blocks)
}

/// Prefix up to the first `.` followed by whitespace (outside braces), or
/// the first ideographic full stop.
fn first_sentence(text: &str) -> &str {
    let mut depth = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            '。' => return &text[..i + ch.len_utf8()],
            '.' if depth == 0 => match chars.peek() {
                None => return text,
                Some((_, next)) if next.is_whitespace() => return &text[..=i],
                _ => {}
            },
            _ => {}
        }
    }
    text
}

/// Text runs and `{@...}` tags of a description.
fn inline_tags(text: &str) -> Vec<DocTag> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{@") {
        push_text(&mut out, &rest[..start]);
        let after = &rest[start + 2..];
        match matching_brace(after) {
            Some(end) => {
                out.push(inline_tag(&after[..end]));
                rest = &after[end + 1..];
            }
            None => {
                push_text(&mut out, &rest[start..]);
                rest = "";
            }
        }
    }
    push_text(&mut out, rest);
    out
}

fn push_text(out: &mut Vec<DocTag>, text: &str) {
    if !text.trim().is_empty() {
        out.push(DocTag::Text {
            tag: "Text".to_string(),
            text: text.to_string(),
        });
    }
}

/// Index of the `}` closing an inline tag whose `{` was already consumed.
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return Some(i),
            '}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// `link Foo#bar label` or `code x < y`.
fn inline_tag(content: &str) -> DocTag {
    let name_end = content.find(char::is_whitespace).unwrap_or(content.len());
    let (name, body) = content.split_at(name_end);
    let body = body.trim();
    match name {
        "link" | "linkplain" => {
            let (reference, label) = split_reference(body);
            DocTag::Reference {
                tag: format!("@{name}"),
                reference,
                label,
            }
        }
        _ => DocTag::Text {
            tag: format!("@{name}"),
            text: body.to_string(),
        },
    }
}

fn block_tag(name: &str, body: &str) -> DocTag {
    if name == "@see" && !(body.starts_with('"') || body.starts_with('<')) && !body.is_empty() {
        let (reference, label) = split_reference(body);
        return DocTag::Reference {
            tag: name.to_string(),
            reference,
            label,
        };
    }
    DocTag::Text {
        tag: name.to_string(),
        text: body.to_string(),
    }
}

/// Reference token (up to whitespace outside parentheses) and the label.
fn split_reference(body: &str) -> (String, String) {
    let mut depth = 0usize;
    let mut end = body.len();
    for (i, ch) in body.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                end = i;
                break;
            }
            _ => {}
        }
    }
    let reference: String = body[..end].split_whitespace().collect::<Vec<_>>().join(" ");
    (reference, body[end..].trim().to_string())
}
