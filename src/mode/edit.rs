use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{commit_value, InputResult, Mode, ModeHandler, ViewerContext};
use crate::edit::{parse_value_literal, EditOps};
use crate::path::NodePath;
use crate::viewer::SelectedNode;
use serde_json::Value;

/// Inline value editor: replaces the scalar at the seeded path.
///
/// The entry grammar is the quick-editor one (`null`, booleans, numbers,
/// JSON literals, bare strings). Bad input leaves the document unchanged
/// and keeps the editor open.
pub struct EditMode {
    target: NodePath,
    pub input: String,
}

impl EditMode {
    pub fn new() -> Self {
        Self {
            target: NodePath::root(),
            input: String::new(),
        }
    }

    /// Prime the editor from the current selection before entering the mode.
    pub fn seed(&mut self, node: &SelectedNode, current: &Value) {
        self.target = node.path.clone();
        self.input = match current {
            // strings edit unquoted, like the original inline editor
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }

    fn commit(&mut self, ctx: &mut ViewerContext) -> Result<InputResult> {
        let Some(doc) = ctx.document.value() else {
            return Ok(InputResult::ModeSwitch(Mode::Normal));
        };
        let new_value = match parse_value_literal(&self.input) {
            Ok(v) => v,
            Err(e) => return Ok(InputResult::Message(e.to_string())),
        };
        match EditOps::update(doc, &self.target, new_value) {
            Ok(next) => {
                let target = self.target.clone();
                commit_value(ctx, next, &target)?;
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }
            Err(e) => Ok(InputResult::Message(e.to_string())),
        }
    }
}

impl ModeHandler for EditMode {
    fn handle_key(&mut self, key: KeyEvent, mut ctx: ViewerContext) -> Result<InputResult> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.input.clear();
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }
            (KeyCode::Enter, _) => self.commit(&mut ctx),
            (KeyCode::Backspace, _) => {
                self.input.pop();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                self.input.push(c);
                Ok(InputResult::Handled)
            }
            _ => Ok(InputResult::NotHandled),
        }
    }
}

/// Which field of the add form has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AddField {
    Key,
    Value,
}

/// Add-child form: inserts a member into the seeded container. Objects take
/// a key and a value, arrays only a value (appended at the end).
pub struct AddMode {
    parent: NodePath,
    needs_key: bool,
    pub key: String,
    pub value: String,
    field: AddField,
}

impl AddMode {
    pub fn new() -> Self {
        Self {
            parent: NodePath::root(),
            needs_key: false,
            key: String::new(),
            value: String::new(),
            field: AddField::Value,
        }
    }

    pub fn seed_container(&mut self, parent: NodePath, needs_key: bool) {
        self.parent = parent;
        self.needs_key = needs_key;
        self.key.clear();
        self.value.clear();
        self.field = if needs_key {
            AddField::Key
        } else {
            AddField::Value
        };
    }

    pub fn prompt(&self) -> String {
        if self.needs_key {
            let (key_mark, value_mark) = match self.field {
                AddField::Key => (">", " "),
                AddField::Value => (" ", ">"),
            };
            format!(
                "add {}key: {}  {}value: {}",
                key_mark, self.key, value_mark, self.value
            )
        } else {
            format!("append value: {}", self.value)
        }
    }

    fn active_field(&mut self) -> &mut String {
        match self.field {
            AddField::Key => &mut self.key,
            AddField::Value => &mut self.value,
        }
    }

    fn commit(&mut self, ctx: &mut ViewerContext) -> Result<InputResult> {
        if self.needs_key && self.key.is_empty() {
            return Ok(InputResult::Message("key must not be empty".to_string()));
        }
        let Some(doc) = ctx.document.value() else {
            return Ok(InputResult::ModeSwitch(Mode::Normal));
        };
        let value = match parse_value_literal(&self.value) {
            Ok(v) => v,
            Err(e) => return Ok(InputResult::Message(e.to_string())),
        };
        let key = self.needs_key.then_some(self.key.as_str());
        match EditOps::insert(doc, &self.parent, key, value) {
            Ok(next) => {
                let parent = self.parent.clone();
                commit_value(ctx, next, &parent)?;
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }
            Err(e) => Ok(InputResult::Message(e.to_string())),
        }
    }
}

impl ModeHandler for AddMode {
    fn handle_key(&mut self, key: KeyEvent, mut ctx: ViewerContext) -> Result<InputResult> {
        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => Ok(InputResult::ModeSwitch(Mode::Normal)),
            (KeyCode::Enter, _) => self.commit(&mut ctx),
            (KeyCode::Tab, _) if self.needs_key => {
                self.field = match self.field {
                    AddField::Key => AddField::Value,
                    AddField::Value => AddField::Key,
                };
                Ok(InputResult::Handled)
            }
            (KeyCode::Backspace, _) => {
                self.active_field().pop();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                self.active_field().push(c);
                Ok(InputResult::Handled)
            }
            _ => Ok(InputResult::NotHandled),
        }
    }
}
