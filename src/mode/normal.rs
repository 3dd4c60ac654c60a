use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{commit_value, InputResult, Mode, ModeHandler, ViewerContext};
use crate::document::{escape_text, unescape_text};
use crate::edit::EditOps;
use crate::tree::LineKind;
use crate::ui::Tab;

/// Normal mode handler - navigation, collapse, and document operations
pub struct NormalMode;

impl NormalMode {
    pub fn new() -> Self {
        Self
    }

    /// Delete the selected node and move the selection to its parent.
    fn delete_selected(&self, ctx: &mut ViewerContext) -> Result<InputResult> {
        let Some(line) = ctx.viewer.selected_line().cloned() else {
            return Ok(InputResult::Message("nothing selected".to_string()));
        };
        if line.path.is_root() {
            return Ok(InputResult::Message("cannot delete the root (use x to clear)".to_string()));
        }
        let Some(doc) = ctx.document.value() else {
            return Ok(InputResult::Message("no document".to_string()));
        };
        match EditOps::delete(doc, &line.path) {
            Ok(next) => {
                let reselect = line.path.parent().unwrap_or_default();
                commit_value(ctx, next, &reselect)?;
                Ok(InputResult::Message(format!("deleted {}", line.path)))
            }
            Err(e) => Ok(InputResult::Message(e.to_string())),
        }
    }

    fn yank_accessor(&self, ctx: &mut ViewerContext) -> InputResult {
        match ctx.viewer.selected_line() {
            Some(line) => {
                let accessor = line.path.accessor();
                let text = if accessor.is_empty() {
                    "root".to_string()
                } else {
                    accessor
                };
                ctx.registers.set(None, text.clone());
                InputResult::Message(format!("yanked {}", text))
            }
            None => InputResult::Message("nothing selected".to_string()),
        }
    }

    fn yank_subtree(&self, ctx: &mut ViewerContext) -> Result<InputResult> {
        let Some(line) = ctx.viewer.selected_line() else {
            return Ok(InputResult::Message("nothing selected".to_string()));
        };
        let Some(doc) = ctx.document.value() else {
            return Ok(InputResult::Message("no document".to_string()));
        };
        match line.path.resolve(doc) {
            Some(value) => {
                let text = crate::document::to_pretty(value, ctx.document.options.indent)?;
                ctx.registers.set(None, text);
                Ok(InputResult::Message(format!("yanked value at {}", line.path)))
            }
            None => Ok(InputResult::Message("selection is stale".to_string())),
        }
    }

    fn format_buffer(&self, ctx: &mut ViewerContext) -> InputResult {
        let input = ctx.buffer.text();
        match ctx.document.format(&input) {
            Ok(()) => {
                ctx.viewer.rebuild(ctx.document.value());
                *ctx.raw_scroll = 0;
                InputResult::Message("formatted".to_string())
            }
            Err(e) => InputResult::Message(e.to_string()),
        }
    }

    fn escape_buffer(&self, ctx: &mut ViewerContext) -> InputResult {
        let input = ctx.buffer.text();
        if input.trim().is_empty() {
            return InputResult::Message("nothing to escape".to_string());
        }
        let escaped = escape_text(&input);
        match ctx.document.format(&escaped) {
            Ok(()) => {
                ctx.viewer.rebuild(ctx.document.value());
                InputResult::Message("escaped".to_string())
            }
            Err(e) => InputResult::Message(e.to_string()),
        }
    }

    fn unescape_buffer(&self, ctx: &mut ViewerContext) -> InputResult {
        let input = ctx.buffer.text();
        match unescape_text(&input) {
            Ok(text) => {
                ctx.document.set_output_text(text);
                ctx.viewer.rebuild(ctx.document.value());
                *ctx.raw_scroll = 0;
                InputResult::Message("unescaped".to_string())
            }
            Err(e) => InputResult::Message(e.to_string()),
        }
    }
}

impl ModeHandler for NormalMode {
    fn handle_key(&mut self, key: KeyEvent, mut ctx: ViewerContext) -> Result<InputResult> {
        // raw tab only scrolls and switches back
        if *ctx.tab == Tab::Raw {
            match (key.code, key.modifiers) {
                (KeyCode::Char('q'), KeyModifiers::NONE) => return Ok(InputResult::Quit),
                (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                    let lines = ctx.document.text().lines().count().max(1);
                    *ctx.raw_scroll = (*ctx.raw_scroll + 1).min(lines - 1);
                    return Ok(InputResult::Handled);
                }
                (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                    *ctx.raw_scroll = ctx.raw_scroll.saturating_sub(1);
                    return Ok(InputResult::Handled);
                }
                (KeyCode::Tab, _) => {
                    *ctx.tab = ctx.tab.next();
                    return Ok(InputResult::Handled);
                }
                (KeyCode::Char('w'), KeyModifiers::NONE) => {
                    ctx.viewer.wrap = !ctx.viewer.wrap;
                    return Ok(InputResult::Handled);
                }
                (KeyCode::Char(':'), _) => return Ok(InputResult::ModeSwitch(Mode::Command)),
                _ => return Ok(InputResult::NotHandled),
            }
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), KeyModifiers::NONE) => Ok(InputResult::Quit),
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Ok(InputResult::Quit),

            // Selection movement over visible lines
            (KeyCode::Char('j'), KeyModifiers::NONE) | (KeyCode::Down, _) => {
                ctx.viewer.move_selection(1);
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('k'), KeyModifiers::NONE) | (KeyCode::Up, _) => {
                ctx.viewer.move_selection(-1);
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('d'), KeyModifiers::CONTROL) => {
                let half = ctx.viewer.half_page();
                ctx.viewer.move_selection(half);
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                let half = ctx.viewer.half_page();
                ctx.viewer.move_selection(-half);
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('g'), KeyModifiers::NONE) => {
                ctx.viewer.move_selection(isize::MIN / 2);
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('G'), _) => {
                ctx.viewer.move_selection(isize::MAX / 2);
                Ok(InputResult::Handled)
            }

            // Collapse / expand
            (KeyCode::Enter, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => {
                ctx.viewer.toggle_selected();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('h'), KeyModifiers::NONE) | (KeyCode::Left, _) => {
                ctx.viewer.collapse_selected();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('l'), KeyModifiers::NONE) | (KeyCode::Right, _) => {
                ctx.viewer.expand_selected();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('E'), _) => {
                ctx.viewer.expand_all();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('C'), _) => {
                ctx.viewer.collapse_all();
                Ok(InputResult::Handled)
            }

            // Node operations
            (KeyCode::Char('e'), KeyModifiers::NONE) => {
                match ctx.viewer.selected_line() {
                    Some(line) if line.kind == LineKind::Scalar => {
                        Ok(InputResult::ModeSwitch(Mode::Edit))
                    }
                    Some(_) => Ok(InputResult::Message(
                        "only scalar values are edited inline".to_string(),
                    )),
                    None => Ok(InputResult::Message("nothing selected".to_string())),
                }
            }
            (KeyCode::Char('a'), KeyModifiers::NONE) => {
                if ctx.viewer.selected_line().is_some() {
                    Ok(InputResult::ModeSwitch(Mode::Add))
                } else {
                    Ok(InputResult::Message("nothing selected".to_string()))
                }
            }
            (KeyCode::Char('%'), _) => {
                ctx.viewer.jump_matching();
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('d'), KeyModifiers::NONE) => self.delete_selected(&mut ctx),
            (KeyCode::Char('y'), KeyModifiers::NONE) => Ok(self.yank_accessor(&mut ctx)),
            (KeyCode::Char('Y'), _) => self.yank_subtree(&mut ctx),

            // Document operations
            (KeyCode::Char('f'), KeyModifiers::NONE) => Ok(self.format_buffer(&mut ctx)),
            (KeyCode::Char('s'), KeyModifiers::NONE) => Ok(self.escape_buffer(&mut ctx)),
            (KeyCode::Char('u'), KeyModifiers::NONE) => Ok(self.unescape_buffer(&mut ctx)),
            (KeyCode::Char('x'), KeyModifiers::NONE) => {
                ctx.document.clear();
                ctx.buffer.clear();
                ctx.viewer.rebuild(None);
                *ctx.raw_scroll = 0;
                Ok(InputResult::Message("cleared".to_string()))
            }

            // Display toggles
            (KeyCode::Char('w'), KeyModifiers::NONE) => {
                ctx.viewer.wrap = !ctx.viewer.wrap;
                Ok(InputResult::Handled)
            }
            (KeyCode::Char('t'), KeyModifiers::NONE) => {
                ctx.theme.toggle();
                Ok(InputResult::Handled)
            }
            (KeyCode::Tab, _) => {
                *ctx.tab = ctx.tab.next();
                Ok(InputResult::Handled)
            }

            (KeyCode::Char(':'), _) => Ok(InputResult::ModeSwitch(Mode::Command)),

            _ => Ok(InputResult::NotHandled),
        }
    }
}
