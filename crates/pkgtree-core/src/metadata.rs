//! Recipe metadata reader.
//!
//! Recipes are shell scripts; only their top-level variable assignments are
//! read, without any shell evaluation:
//!
//! ```text
//! SLOT="0/3"
//! KEYWORDS="amd64 ~x86"
//! RDEPEND="
//!     dev-libs/foo
//!     ssl? ( dev-libs/openssl )"
//! ```

use std::collections::HashMap;
use std::path::Path;

use pkgtree_util::errors::PkgtreeError;

/// The metadata fields pkgtree consumes from a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeMetadata {
    pub slot: String,
    pub subslot: Option<String>,
    pub keywords: Vec<String>,
    pub depend: String,
    pub rdepend: String,
}

impl Default for RecipeMetadata {
    fn default() -> Self {
        Self {
            slot: "0".to_string(),
            subslot: None,
            keywords: Vec::new(),
            depend: String::new(),
            rdepend: String::new(),
        }
    }
}

impl RecipeMetadata {
    pub fn parse(content: &str) -> Result<Self, PkgtreeError> {
        let mut vars = read_assignments(content)?;
        let mut meta = Self::default();

        if let Some(slot) = vars.remove("SLOT").filter(|s| !s.is_empty()) {
            match slot.split_once('/') {
                Some((slot, sub)) => {
                    meta.slot = slot.to_string();
                    meta.subslot = Some(sub.to_string());
                }
                None => meta.slot = slot,
            }
        }
        if let Some(keywords) = vars.remove("KEYWORDS") {
            meta.keywords = keywords.split_whitespace().map(str::to_string).collect();
        }
        meta.depend = vars.remove("DEPEND").unwrap_or_default();
        meta.rdepend = vars.remove("RDEPEND").unwrap_or_default();
        Ok(meta)
    }

    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PkgtreeError::Generic {
            message: format!("Failed to read recipe {}: {e}", path.display()),
        })?;
        Self::parse(&content).map_err(|e| {
            PkgtreeError::parse(format!("{}: {e}", path.display())).into()
        })
    }

    /// Build-time and runtime dependencies as one expression.
    pub fn dependencies(&self) -> String {
        format!("{} {}", self.depend, self.rdepend)
            .trim()
            .to_string()
    }
}

/// Read column-0 `KEY=value` assignments. Quoted values may span lines and
/// have their whitespace collapsed. `$KEY` and `${KEY}` inside double quotes
/// expand to earlier assignments (or nothing).
pub fn read_assignments(content: &str) -> Result<HashMap<String, String>, PkgtreeError> {
    let mut vars = HashMap::new();
    let mut pos = 0;

    while pos < content.len() {
        let line_end = content[pos..].find('\n').map_or(content.len(), |i| pos + i);
        let line = &content[pos..line_end];
        let Some((key, offset)) = split_assignment(line) else {
            pos = line_end + 1;
            continue;
        };
        let raw = &line[offset..];

        match raw.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let body_start = pos + offset + 1;
                let close = find_closing(&content[body_start..], quote).ok_or_else(|| {
                    PkgtreeError::parse(format!("unterminated value for {key}"))
                })?;
                let value = &content[body_start..body_start + close];
                let value = if quote == '"' {
                    expand(value, &vars)
                } else {
                    value.to_string()
                };
                vars.insert(key.to_string(), collapse(&value));
                let after = body_start + close + 1;
                pos = content[after..].find('\n').map_or(content.len(), |i| after + i) + 1;
            }
            _ => {
                let value = raw.split_whitespace().next().unwrap_or_default();
                vars.insert(key.to_string(), value.to_string());
                pos = line_end + 1;
            }
        }
    }
    Ok(vars)
}

/// Returns the key and the byte offset of its value within `line`.
fn split_assignment(line: &str) -> Option<(&str, usize)> {
    let start = if line.starts_with("export ") { 7 } else { 0 };
    let rest = &line[start..];
    let key_len = rest
        .find(|c: char| !(c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'))
        .unwrap_or(rest.len());
    let key = &rest[..key_len];
    if key.is_empty() || key.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    rest[key_len..]
        .starts_with('=')
        .then_some((key, start + key_len + 1))
}

fn find_closing(body: &str, quote: char) -> Option<usize> {
    let mut escaped = false;
    for (idx, c) in body.char_indices() {
        match c {
            '\\' if quote == '"' && !escaped => escaped = true,
            c if c == quote && !escaped => return Some(idx),
            _ => escaped = false,
        }
    }
    None
}

fn expand(value: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(idx) = rest.find('$') {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 1..];
        let (name, consumed) = match after.strip_prefix('{') {
            Some(braced) => match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            },
            None => {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            }
        };
        if name.is_empty() {
            out.push('$');
            rest = after;
            continue;
        }
        if let Some(value) = vars.get(name) {
            out.push_str(value);
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

fn collapse(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
