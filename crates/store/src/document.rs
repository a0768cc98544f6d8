//! Comment-preserving YAML document model.
//!
//! Responsibilities:
//! - Parse configuration text into an order-preserving mapping
//!   (`serde_yaml::Mapping` keeps insertion order).
//! - Capture the comment blocks sitting above each top-level key so they
//!   survive a mutate-and-save cycle.
//! - Serialize back to text. An unmodified document re-emits its original
//!   bytes verbatim.
//!
//! Does NOT handle:
//! - File I/O or environment snapshots (see `store.rs` / `env.rs`).
//! - YAML grammar details beyond what `serde_yaml` provides; the comment
//!   capture is a line scan over the raw text, not a parser.
//!
//! Invariants / Assumptions:
//! - The top-level YAML value must be a mapping (or empty).
//! - `to_yaml` on a never-mutated document equals the parsed input
//!   byte-for-byte.
//! - After `set`, top-level comment blocks, trailing comments and key order
//!   are preserved; comments nested inside block values are not.

use std::collections::HashMap;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors raised while parsing or serializing a [`Document`].
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("top-level YAML value must be a mapping")]
    NotAMapping,
}

/// An ordered key/value document with per-key comment metadata.
#[derive(Debug, Clone)]
pub struct Document {
    /// Original source text, re-emitted verbatim while the document is
    /// unmodified.
    raw: String,
    root: Mapping,
    /// Comment/blank-line blocks captured above each top-level key.
    comments: HashMap<String, Vec<String>>,
    /// Comment lines after the last key.
    trailing: Vec<String>,
    dirty: bool,
}

impl Document {
    /// Parses YAML text into a document.
    ///
    /// Empty input yields an empty document. A top-level sequence or scalar
    /// is rejected with [`DocumentError::NotAMapping`].
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        let root = match serde_yaml::from_str::<Value>(text)? {
            Value::Null => Mapping::new(),
            Value::Mapping(mapping) => mapping,
            _ => return Err(DocumentError::NotAMapping),
        };

        let (comments, trailing) = scan_comments(text);

        Ok(Self {
            raw: text.to_string(),
            root,
            comments,
            trailing,
            dirty: false,
        })
    }

    /// Looks up a value by dotted path, e.g. `"server.port"`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.root.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Looks up a string value by dotted path.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Looks up an integer value by dotted path.
    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    /// Looks up a boolean value by dotted path.
    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Sets a value by dotted path, creating intermediate mappings as
    /// needed. A non-mapping value in the middle of the path is replaced.
    ///
    /// Marks the document dirty: the next [`Document::to_yaml`] re-renders
    /// instead of echoing the original text.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) {
        let (parents, leaf) = match path.rfind('.') {
            Some(split) => (&path[..split], &path[split + 1..]),
            None => ("", path),
        };

        let mut current = &mut self.root;
        if !parents.is_empty() {
            for part in parents.split('.') {
                let key = Value::String(part.to_string());
                let slot = current
                    .entry(key)
                    .or_insert_with(|| Value::Mapping(Mapping::new()));
                if !slot.is_mapping() {
                    *slot = Value::Mapping(Mapping::new());
                }
                let Value::Mapping(next) = slot else {
                    unreachable!("slot was just set to a mapping");
                };
                current = next;
            }
        }

        current.insert(Value::String(leaf.to_string()), value.into());
        self.dirty = true;
    }

    /// Returns the comment block captured above a top-level key, if any.
    /// Lines include their leading `#`; blank separator lines are kept.
    pub fn comments(&self, key: &str) -> Option<&[String]> {
        self.comments.get(key).map(Vec::as_slice)
    }

    /// The underlying order-preserving mapping.
    pub fn root(&self) -> &Mapping {
        &self.root
    }

    /// Whether the document has been mutated since parsing.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Number of top-level keys.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Serializes the document back to YAML text.
    ///
    /// A never-mutated document returns its original text byte-for-byte.
    /// A mutated document is re-rendered: top-level comment blocks,
    /// trailing comments and key order are kept, while comments nested
    /// inside block values are dropped.
    pub fn to_yaml(&self) -> Result<String, DocumentError> {
        if !self.dirty {
            return Ok(self.raw.clone());
        }

        let mut out = String::new();
        for (key, value) in &self.root {
            if let Some(block) = key.as_str().and_then(|k| self.comments.get(k)) {
                for line in block {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            let mut entry = Mapping::new();
            entry.insert(key.clone(), value.clone());
            out.push_str(&serde_yaml::to_string(&entry)?);
        }
        for line in &self.trailing {
            out.push_str(line);
            out.push('\n');
        }
        Ok(out)
    }
}

/// Associates comment/blank-line blocks with the top-level key that follows
/// them. Indented content resets the pending block so nested comments are
/// never attached to the wrong key.
fn scan_comments(text: &str) -> (HashMap<String, Vec<String>>, Vec<String>) {
    let mut comments = HashMap::new();
    let mut pending: Vec<String> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            pending.push(line.to_string());
        } else if line.starts_with(char::is_whitespace) {
            // Nested content; any comment lines in it stay inline-only.
            pending.clear();
        } else if let Some(key) = top_level_key(line) {
            if !pending.is_empty() {
                comments.insert(key, std::mem::take(&mut pending));
            }
        } else {
            // Document markers and other non-key lines.
            pending.clear();
        }
    }

    // Whatever is left belongs to no key; keep it as trailing text, but
    // drop pure leading/trailing blank runs from the metadata.
    let trailing = if pending.iter().any(|l| l.starts_with('#')) {
        pending
    } else {
        Vec::new()
    };

    (comments, trailing)
}

/// Extracts the key from a column-zero `key: ...` line.
fn top_level_key(line: &str) -> Option<String> {
    let colon = line.find(':')?;
    let key = line[..colon].trim();
    if key.is_empty() || key.starts_with('-') {
        return None;
    }
    Some(
        key.trim_matches(|c| c == '"' || c == '\'')
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# Server settings
# (edit freely)
server:
  host: localhost
  port: 8080

# Feature toggles
features:
  fancy: true

name: demo
";

    #[test]
    fn parse_preserves_key_order() {
        let doc = Document::parse(SAMPLE).unwrap();
        let keys: Vec<&str> = doc.root().keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["server", "features", "name"]);
    }

    #[test]
    fn get_supports_dotted_paths() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.get_str("server.host"), Some("localhost"));
        assert_eq!(doc.get_i64("server.port"), Some(8080));
        assert_eq!(doc.get_bool("features.fancy"), Some(true));
        assert_eq!(doc.get_str("name"), Some("demo"));
        assert!(doc.get("server.missing").is_none());
        assert!(doc.get("missing.port").is_none());
    }

    #[test]
    fn unmodified_document_round_trips_exactly() {
        let doc = Document::parse(SAMPLE).unwrap();
        assert_eq!(doc.to_yaml().unwrap(), SAMPLE);
    }

    #[test]
    fn comments_are_attached_to_keys() {
        let doc = Document::parse(SAMPLE).unwrap();
        let block = doc.comments("server").unwrap();
        assert_eq!(block, ["# Server settings", "# (edit freely)"]);
        // `features` has a blank separator line in its block.
        let block = doc.comments("features").unwrap();
        assert_eq!(block, ["", "# Feature toggles"]);
        // `name` carries only its separator blank line.
        assert_eq!(doc.comments("name").unwrap(), [""]);
    }

    #[test]
    fn set_marks_dirty_and_updates_value() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        assert!(!doc.is_dirty());

        doc.set("server.port", 9090);
        assert!(doc.is_dirty());
        assert_eq!(doc.get_i64("server.port"), Some(9090));
    }

    #[test]
    fn set_creates_intermediate_mappings() {
        let mut doc = Document::parse("a: 1\n").unwrap();
        doc.set("b.c.d", "deep");
        assert_eq!(doc.get_str("b.c.d"), Some("deep"));
    }

    #[test]
    fn render_after_set_keeps_comments_and_order() {
        let mut doc = Document::parse(SAMPLE).unwrap();
        doc.set("server.port", 9090);

        let rendered = doc.to_yaml().unwrap();
        assert!(rendered.contains("# Server settings"));
        assert!(rendered.contains("# Feature toggles"));
        assert!(rendered.contains("port: 9090"));

        let server = rendered.find("server:").unwrap();
        let features = rendered.find("features:").unwrap();
        let name = rendered.find("name:").unwrap();
        assert!(server < features && features < name);

        // And the rendered text parses back to the same values.
        let reparsed = Document::parse(&rendered).unwrap();
        assert_eq!(reparsed.get_i64("server.port"), Some(9090));
        assert_eq!(reparsed.get_str("name"), Some("demo"));
    }

    #[test]
    fn empty_input_is_an_empty_document() {
        let doc = Document::parse("").unwrap();
        assert!(doc.is_empty());
        assert_eq!(doc.to_yaml().unwrap(), "");
    }

    #[test]
    fn top_level_sequence_is_rejected() {
        let err = Document::parse("- one\n- two\n").unwrap_err();
        assert!(matches!(err, DocumentError::NotAMapping));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        let err = Document::parse("key: [unclosed\n").unwrap_err();
        assert!(matches!(err, DocumentError::Yaml(_)));
    }

    #[test]
    fn trailing_comments_survive_a_render() {
        let text = "a: 1\n# the end\n";
        let mut doc = Document::parse(text).unwrap();
        doc.set("a", 2);
        let rendered = doc.to_yaml().unwrap();
        assert!(rendered.contains("a: 2"));
        assert!(rendered.ends_with("# the end\n"));
    }
}
