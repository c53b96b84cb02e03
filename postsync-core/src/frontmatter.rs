//! Markdown front matter parsing.
//!
//! A post starts with a `---` fence line, followed by a YAML mapping, closed
//! by another `---` (or `...`) line. Everything after the closing fence is
//! the body. A file without an opening fence has no attributes at all, so it
//! has no title either.

use serde::Deserialize;
use serde_yaml::Value;

use crate::error::FrontMatterError;

const FENCE: &str = "---";
const ALT_CLOSING_FENCE: &str = "...";

/// The parts of a post file postsync cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub tags: Vec<String>,
    pub body: String,
}

#[derive(Debug, Default, Deserialize)]
struct Attributes {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    tags: Option<TagsCompat>,
}

/// `tags:` may be a YAML list or one comma separated string. List items
/// may be any scalar; `2024` and `true` become `"2024"` and `"true"`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsCompat {
    List(Vec<Value>),
    Single(Value),
}

impl TagsCompat {
    fn into_vec(self) -> Vec<String> {
        let raw: Vec<String> = match self {
            TagsCompat::List(items) => items.iter().filter_map(scalar_text).collect(),
            TagsCompat::Single(Value::String(line)) => {
                line.split(',').map(str::to_owned).collect()
            }
            TagsCompat::Single(other) => scalar_text(&other).into_iter().collect(),
        };
        raw.into_iter()
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Text of a scalar tag; nulls, sequences and mappings carry none.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parses a post file into title, tags and body.
///
/// # Errors
/// - [`FrontMatterError::Yaml`] when the fenced block is not a YAML mapping.
/// - [`FrontMatterError::MissingTitle`] when no non-blank `title` exists.
pub fn parse(content: &str) -> Result<FrontMatter, FrontMatterError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (yaml, body) = match split(content) {
        Some(parts) => parts,
        None => ("", content),
    };

    let attributes: Attributes = if yaml.trim().is_empty() {
        Attributes::default()
    } else {
        serde_yaml::from_str(yaml)?
    };

    // Kept verbatim: remote matching compares titles exactly.
    let title = attributes
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(FrontMatterError::MissingTitle)?;

    Ok(FrontMatter {
        title,
        tags: attributes.tags.map(TagsCompat::into_vec).unwrap_or_default(),
        body: body.to_owned(),
    })
}

/// Reads only the title, for best-effort recovery of deleted posts.
pub fn parse_title(content: &str) -> Option<String> {
    parse(content).ok().map(|fm| fm.title)
}

/// Splits `content` into (yaml, body) when it opens with a fence.
fn split(content: &str) -> Option<(&str, &str)> {
    let mut lines = LineCursor::new(content);
    let first = lines.next()?;
    if first.text.trim_end() != FENCE {
        return None;
    }
    let yaml_start = first.end;

    for line in lines {
        let text = line.text.trim_end();
        if text == FENCE || text == ALT_CLOSING_FENCE {
            return Some((&content[yaml_start..line.start], &content[line.end..]));
        }
    }
    None
}

struct Line<'a> {
    text: &'a str,
    start: usize,
    /// Byte offset just past the line terminator.
    end: usize,
}

struct LineCursor<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> LineCursor<'a> {
    fn new(content: &'a str) -> Self {
        Self { content, pos: 0 }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.content[start..];
        let (text, consumed) = match rest.find('\n') {
            Some(idx) => (&rest[..idx], idx + 1),
            None => (rest, rest.len()),
        };
        self.pos = start + consumed;
        Some(Line {
            text: text.strip_suffix('\r').unwrap_or(text),
            start,
            end: self.pos,
        })
    }
}
