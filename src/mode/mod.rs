use anyhow::Result;
use crossterm::event::KeyEvent;

pub mod command;
pub mod edit;
pub mod normal;
pub mod register;

use crate::buffer::Buffer;
use crate::document::Document;
use crate::path::NodePath;
use crate::ui::{Tab, Theme};
use crate::viewer::Viewer;

pub use register::RegisterMap;

/// Viewer input states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Edit,
    Add,
    Command,
}

impl Mode {
    /// Returns a display string for the mode
    pub fn display(&self) -> &str {
        match self {
            Mode::Normal => "",
            Mode::Edit => "-- EDIT --",
            Mode::Add => "-- ADD --",
            Mode::Command => "-- COMMAND --",
        }
    }
}

/// Context passed to mode handlers
pub struct ViewerContext<'a> {
    pub document: &'a mut Document,
    pub viewer: &'a mut Viewer,
    pub buffer: &'a mut Buffer,
    pub registers: &'a mut RegisterMap,
    pub theme: &'a mut Theme,
    pub tab: &'a mut Tab,
    pub raw_scroll: &'a mut usize,
}

/// Result of handling an input event
#[derive(Debug)]
pub enum InputResult {
    /// Input was handled, continue
    Handled,
    /// Request mode change
    ModeSwitch(Mode),
    /// Request quit
    Quit,
    /// Input not handled, pass to next handler
    NotHandled,
    /// Display a message to the user
    Message(String),
}

/// Trait for mode-specific input handlers
pub trait ModeHandler {
    fn handle_key(&mut self, key: KeyEvent, ctx: ViewerContext) -> Result<InputResult>;
}

/// Accept a mutated document value: re-serialize, write the canonical text
/// back into the host buffer, re-flatten, and try to restore the selection.
/// A `reselect` path that no longer resolves simply leaves the clamped
/// default selection (the stale selection is dropped, never an error).
pub fn commit_value(
    ctx: &mut ViewerContext,
    value: serde_json::Value,
    reselect: &NodePath,
) -> Result<()> {
    ctx.document.replace_value(value)?;
    ctx.buffer.set_text(ctx.document.text());
    ctx.viewer.rebuild(ctx.document.value());
    ctx.viewer.goto(reselect);
    Ok(())
}
