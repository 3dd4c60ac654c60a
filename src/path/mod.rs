use std::fmt;

use serde_json::Value;

use crate::error::Error;

/// One step from a container to a child: an object member key or an array
/// element index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    Key(String),
    Index(usize),
}

impl Step {
    pub fn key(k: impl Into<String>) -> Self {
        Step::Key(k.into())
    }

    /// Segment label for breadcrumb display.
    pub fn label(&self) -> String {
        match self {
            Step::Key(k) => k.clone(),
            Step::Index(i) => format!("[{}]", i),
        }
    }
}

/// Location of a value within a JSON document, as an ordered list of steps.
///
/// The empty path is the document root. Paths are structural, not stable
/// identifiers: deleting an array element shifts the indices of later
/// siblings, so paths are recomputed on every flatten pass and never cached
/// across a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath {
    steps: Vec<Step>,
}

impl NodePath {
    pub fn root() -> Self {
        Self { steps: Vec::new() }
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Child path for an object member.
    pub fn child_key(&self, key: &str) -> NodePath {
        let mut steps = self.steps.clone();
        steps.push(Step::Key(key.to_string()));
        Self { steps }
    }

    /// Child path for an array element.
    pub fn child_index(&self, index: usize) -> NodePath {
        let mut steps = self.steps.clone();
        steps.push(Step::Index(index));
        Self { steps }
    }

    /// Parent path and final step, unless this is the root.
    pub fn split_last(&self) -> Option<(NodePath, &Step)> {
        let (last, parent) = self.steps.split_last()?;
        Some((
            NodePath {
                steps: parent.to_vec(),
            },
            last,
        ))
    }

    pub fn parent(&self) -> Option<NodePath> {
        self.split_last().map(|(p, _)| p)
    }

    /// Proper ancestors, root first. The path itself is not included.
    pub fn ancestors(&self) -> impl Iterator<Item = NodePath> + '_ {
        (0..self.steps.len()).map(|n| NodePath {
            steps: self.steps[..n].to_vec(),
        })
    }

    /// Walk `value` one step at a time. Returns `None` the moment a step
    /// dereferences into a scalar, a missing key, or an out-of-range index.
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        let mut current = value;
        for step in &self.steps {
            current = match (step, current) {
                (Step::Key(k), Value::Object(map)) => map.get(k)?,
                (Step::Index(i), Value::Array(items)) => items.get(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Bracket-indexed accessor expression, e.g. `a.b[2]` -> `["a"]["b"][2]`.
    pub fn accessor(&self) -> String {
        let mut out = String::new();
        for step in &self.steps {
            match step {
                Step::Key(k) => {
                    out.push('[');
                    out.push_str(&Value::String(k.clone()).to_string());
                    out.push(']');
                }
                Step::Index(i) => {
                    out.push('[');
                    out.push_str(&i.to_string());
                    out.push(']');
                }
            }
        }
        out
    }

    /// Parse the display form produced by `Display`. Accepts an optional
    /// leading `root` segment. Unquoted bracket groups are indices only when
    /// all-digits; quoted groups (`["..."]`) are always keys, so a key is
    /// never silently reinterpreted as an index.
    pub fn parse(input: &str) -> Result<NodePath, Error> {
        let s = input.trim();
        if s.is_empty() || s == "root" {
            return Ok(NodePath::root());
        }
        let s = if let Some(rest) = s.strip_prefix("root.") {
            rest
        } else if let Some(rest) = s.strip_prefix("root").filter(|r| r.starts_with('[')) {
            rest
        } else {
            s
        };

        let bytes: Vec<char> = s.chars().collect();
        let mut steps = Vec::new();
        let mut pos = 0;
        let mut expect_segment = true;

        while pos < bytes.len() {
            match bytes[pos] {
                '.' => {
                    if expect_segment {
                        return Err(Error::InvalidPath(input.to_string()));
                    }
                    pos += 1;
                    expect_segment = true;
                }
                '[' => {
                    pos += 1;
                    if pos < bytes.len() && bytes[pos] == '"' {
                        let (key, next) = parse_quoted_key(&bytes, pos, input)?;
                        pos = next;
                        if pos >= bytes.len() || bytes[pos] != ']' {
                            return Err(Error::InvalidPath(input.to_string()));
                        }
                        pos += 1;
                        steps.push(Step::Key(key));
                    } else {
                        let start = pos;
                        while pos < bytes.len() && bytes[pos] != ']' {
                            pos += 1;
                        }
                        if pos >= bytes.len() {
                            return Err(Error::InvalidPath(input.to_string()));
                        }
                        let content: String = bytes[start..pos].iter().collect();
                        pos += 1;
                        if content.is_empty() || !content.chars().all(|c| c.is_ascii_digit()) {
                            return Err(Error::InvalidPath(input.to_string()));
                        }
                        let index = content
                            .parse::<usize>()
                            .map_err(|_| Error::InvalidPath(input.to_string()))?;
                        steps.push(Step::Index(index));
                    }
                    expect_segment = false;
                }
                _ => {
                    if !expect_segment {
                        return Err(Error::InvalidPath(input.to_string()));
                    }
                    let start = pos;
                    while pos < bytes.len() && bytes[pos] != '.' && bytes[pos] != '[' {
                        pos += 1;
                    }
                    let name: String = bytes[start..pos].iter().collect();
                    if name.is_empty() {
                        return Err(Error::InvalidPath(input.to_string()));
                    }
                    steps.push(Step::Key(name));
                    expect_segment = false;
                }
            }
        }

        if expect_segment {
            return Err(Error::InvalidPath(input.to_string()));
        }
        Ok(NodePath { steps })
    }
}

fn parse_quoted_key(chars: &[char], open: usize, input: &str) -> Result<(String, usize), Error> {
    // chars[open] is the opening quote; scan to its unescaped partner and let
    // serde_json decode the literal.
    let mut pos = open + 1;
    let mut escaped = false;
    while pos < chars.len() {
        let c = chars[pos];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            let literal: String = chars[open..=pos].iter().collect();
            let key: String = serde_json::from_str(&literal)
                .map_err(|_| Error::InvalidPath(input.to_string()))?;
            return Ok((key, pos + 1));
        }
        pos += 1;
    }
    Err(Error::InvalidPath(input.to_string()))
}

fn key_needs_quoting(key: &str) -> bool {
    key.is_empty() || key.chars().any(|c| matches!(c, '.' | '[' | ']' | '"'))
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return write!(f, "root");
        }
        let mut first = true;
        for step in &self.steps {
            match step {
                Step::Key(k) if key_needs_quoting(k) => {
                    write!(f, "[{}]", Value::String(k.clone()))?;
                }
                Step::Key(k) => {
                    if !first {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", k)?;
                }
                Step::Index(i) => {
                    write!(f, "[{}]", i)?;
                }
            }
            first = false;
        }
        Ok(())
    }
}
