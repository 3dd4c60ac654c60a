use serde_json::Value;

use crate::error::Error;
use crate::path::{NodePath, Step};

/// Path-addressed mutations over a JSON document.
///
/// Every operation clones the document and edits the clone; the input is
/// never modified, so a failed operation leaves the caller's document
/// untouched. After a successful mutation the caller must re-flatten and
/// rebuild collapse/selection state; old paths may point at different
/// values.
pub struct EditOps;

impl EditOps {
    /// Replace the value at `path`. Updating the root replaces the whole
    /// document.
    pub fn update(doc: &Value, path: &NodePath, new_value: Value) -> Result<Value, Error> {
        if path.is_root() {
            return Ok(new_value);
        }
        let mut next = doc.clone();
        *resolve_mut(&mut next, path)? = new_value;
        Ok(next)
    }

    /// Insert a child under the container at `parent`. Objects require a
    /// key (an existing key is overwritten); arrays append.
    pub fn insert(
        doc: &Value,
        parent: &NodePath,
        key: Option<&str>,
        value: Value,
    ) -> Result<Value, Error> {
        let mut next = doc.clone();
        match resolve_mut(&mut next, parent)? {
            Value::Object(map) => {
                let key = key
                    .ok_or_else(|| Error::InvalidValue("object member needs a key".to_string()))?;
                map.insert(key.to_string(), value);
            }
            Value::Array(items) => items.push(value),
            _ => return Err(Error::PathNotFound(parent.clone())),
        }
        Ok(next)
    }

    /// Remove the object member or array element at `path`. Removing an
    /// array element shifts later indices down by one, invalidating any
    /// path that referenced a later sibling.
    pub fn delete(doc: &Value, path: &NodePath) -> Result<Value, Error> {
        let Some((parent_path, last)) = path.split_last() else {
            return Err(Error::PathNotFound(path.clone()));
        };
        let mut next = doc.clone();
        match (resolve_mut(&mut next, &parent_path)?, last) {
            (Value::Object(map), Step::Key(k)) => {
                if map.shift_remove(k).is_none() {
                    return Err(Error::PathNotFound(path.clone()));
                }
            }
            (Value::Array(items), Step::Index(i)) => {
                if *i >= items.len() {
                    return Err(Error::PathNotFound(path.clone()));
                }
                items.remove(*i);
            }
            _ => return Err(Error::PathNotFound(path.clone())),
        }
        Ok(next)
    }
}

fn resolve_mut<'a>(value: &'a mut Value, path: &NodePath) -> Result<&'a mut Value, Error> {
    let mut current = value;
    for step in path.steps() {
        current = match (step, current) {
            (Step::Key(k), Value::Object(map)) => map
                .get_mut(k)
                .ok_or_else(|| Error::PathNotFound(path.clone()))?,
            (Step::Index(i), Value::Array(items)) => items
                .get_mut(*i)
                .ok_or_else(|| Error::PathNotFound(path.clone()))?,
            _ => return Err(Error::PathNotFound(path.clone())),
        };
    }
    Ok(current)
}

/// Interpret quick-editor input the way the inline editor accepts it:
/// `null`/`true`/`false`, numbers, and `{`/`[`/`"`-led JSON literals; any
/// other text is taken as a plain string.
pub fn parse_value_literal(input: &str) -> Result<Value, Error> {
    let trimmed = input.trim();
    match trimmed {
        "null" => return Ok(Value::Null),
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }

    if trimmed.starts_with('-') || trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Ok(Value::Number(n.into()));
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            if let Some(n) = serde_json::Number::from_f64(f) {
                return Ok(Value::Number(n));
            }
        }
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') || trimmed.starts_with('"') {
        return serde_json::from_str(trimmed).map_err(|e| Error::InvalidValue(e.to_string()));
    }

    Ok(Value::String(trimmed.to_string()))
}
