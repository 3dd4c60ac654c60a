use serde_json::Value;

use crate::path::NodePath;

/// What a display row represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Scalar,
    ContainerOpen,
    ContainerClose,
}

/// Bracket family of a container line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bracket {
    Brace,  // {}
    Square, // []
}

impl Bracket {
    pub fn open(&self) -> &'static str {
        match self {
            Bracket::Brace => "{",
            Bracket::Square => "[",
        }
    }

    pub fn close(&self) -> &'static str {
        match self {
            Bracket::Brace => "}",
            Bracket::Square => "]",
        }
    }

    pub fn pair(&self) -> &'static str {
        match self {
            Bracket::Brace => "{}",
            Bracket::Square => "[]",
        }
    }
}

/// Type tag for a piece of display markup; the theme maps these to colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragKind {
    Key,
    Colon,
    Bracket,
    Comma,
    Str,
    Num,
    Bool,
    Null,
}

/// One styled piece of a line's content. Concatenating the `text` of every
/// fragment of every line reassembles parseable JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub kind: FragKind,
    pub text: String,
}

impl Fragment {
    pub fn new(kind: FragKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Display markup for a single JSON scalar. Serialization goes through
    /// serde_json so strings come out correctly escaped.
    pub fn scalar(value: &Value) -> Fragment {
        let kind = match value {
            Value::String(_) => FragKind::Str,
            Value::Number(_) => FragKind::Num,
            Value::Bool(_) => FragKind::Bool,
            _ => FragKind::Null,
        };
        Fragment::new(kind, value.to_string())
    }
}

/// One renderable row of the flattened JSON view.
#[derive(Debug, Clone)]
pub struct Line {
    pub path: NodePath,
    pub level: usize,
    pub kind: LineKind,
    pub bracket: Option<Bracket>,
    /// Object member key reaching this line from its parent; `None` for
    /// array elements and the root.
    pub key: Option<String>,
    pub last_sibling: bool,
    pub collapsible: bool,
    pub fragments: Vec<Fragment>,
}

impl Line {
    /// Content with markup stripped.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    pub fn is_container_open(&self) -> bool {
        self.kind == LineKind::ContainerOpen
    }

    pub fn is_container_close(&self) -> bool {
        self.kind == LineKind::ContainerClose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_fragment_kinds() {
        assert_eq!(Fragment::scalar(&json!("hi")).kind, FragKind::Str);
        assert_eq!(Fragment::scalar(&json!(1.5)).kind, FragKind::Num);
        assert_eq!(Fragment::scalar(&json!(true)).kind, FragKind::Bool);
        assert_eq!(Fragment::scalar(&Value::Null).kind, FragKind::Null);
    }

    #[test]
    fn test_scalar_fragment_escapes_strings() {
        let frag = Fragment::scalar(&json!("a\"b"));
        assert_eq!(frag.text, "\"a\\\"b\"");
    }

    #[test]
    fn test_bracket_pairing() {
        assert_eq!(Bracket::Brace.open(), "{");
        assert_eq!(Bracket::Brace.close(), "}");
        assert_eq!(Bracket::Square.pair(), "[]");
    }
}
