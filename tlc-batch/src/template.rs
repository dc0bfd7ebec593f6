//! Brace-placeholder templates for the generated checker document.
//!
//! A template is text with `{name}` placeholders; `{{` and `}}` stand for
//! literal braces. Binding is best-effort: a placeholder with no binding is
//! kept as a placeholder, and placeholders named in the deferred list are
//! kept even when a binding exists, so that a later pass can fill them.
//! Nothing here fails on a missing key.

use indexmap::IndexMap;
use std::fmt;

fn is_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Slot(String),
}

/// Placeholder values for one binding pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings(IndexMap<String, String>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a placeholder value, replacing any earlier value for the same name
    pub fn set(&mut self, name: impl Into<String>, value: impl fmt::Display) -> &mut Self {
        self.0.insert(name.into(), value.to_string());
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source. Unbalanced braces are kept as literal text.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((idx, ch)) = chars.next() {
            match ch {
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    text.push('{');
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    text.push('}');
                }
                '{' => {
                    let rest = &source[idx + 1..];
                    match rest.find(['{', '}']) {
                        Some(end) if rest.as_bytes()[end] == b'}' && is_name(&rest[..end]) => {
                            if !text.is_empty() {
                                segments.push(Segment::Text(std::mem::take(&mut text)));
                            }
                            segments.push(Segment::Slot(rest[..end].to_string()));
                            // skip the name and the closing brace
                            for _ in 0..rest[..=end].chars().count() {
                                chars.next();
                            }
                        }
                        _ => text.push('{'),
                    }
                }
                _ => text.push(ch),
            }
        }
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Self { segments }
    }

    /// Names of the placeholders still open, in order of appearance
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Text(_) => None,
        })
    }

    /// Fill every bound placeholder except those in `deferred`.
    pub fn bind(&self, bindings: &Bindings, deferred: &[&str]) -> Template {
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Slot(name) if !deferred.contains(&name.as_str()) => {
                    match bindings.get(name) {
                        Some(value) => Segment::Text(value.to_string()),
                        None => segment.clone(),
                    }
                }
                _ => segment.clone(),
            })
            .collect();
        Template { segments }
    }

    /// Render to final text; open placeholders come out as `{name}`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Slot(name) => {
                    out.push('{');
                    out.push_str(name);
                    out.push('}');
                }
            }
        }
        out
    }

    /// Shorthand for `bind(bindings, &[])` followed by `render()`
    pub fn fill(&self, bindings: &Bindings) -> String {
        self.bind(bindings, &[]).render()
    }
}

/// Writes template source back out, escaping literal braces so the result
/// parses to the same template.
impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => {
                    for ch in text.chars() {
                        match ch {
                            '{' => f.write_str("{{")?,
                            '}' => f.write_str("}}")?,
                            other => write!(f, "{}", other)?,
                        }
                    }
                }
                Segment::Slot(name) => write!(f, "{{{}}}", name)?,
            }
        }
        Ok(())
    }
}
