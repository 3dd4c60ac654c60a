use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{InputResult, Mode, ModeHandler, ViewerContext};
use crate::path::NodePath;

/// Command mode handler - ex-style commands
pub struct CommandMode {
    /// Current command being typed
    pub command_line: String,
}

impl CommandMode {
    pub fn new() -> Self {
        Self {
            command_line: String::new(),
        }
    }

    /// Execute a command
    fn execute_command(&mut self, cmd: &str, ctx: &mut ViewerContext) -> Result<InputResult> {
        let cmd = cmd.trim();

        if let Some(filename) = cmd.strip_prefix("w ").or_else(|| cmd.strip_prefix("write ")) {
            self.sync_buffer(ctx);
            ctx.buffer.save_as(filename.trim())?;
            return Ok(InputResult::ModeSwitch(Mode::Normal));
        }

        if let Some(filename) = cmd.strip_prefix("e ").or_else(|| cmd.strip_prefix("edit ")) {
            return self.open_file(filename.trim(), ctx);
        }

        if let Some(arg) = cmd.strip_prefix("indent ") {
            return match arg.trim().parse::<usize>() {
                Ok(n @ (2 | 4 | 8)) => {
                    ctx.document.set_indent(n)?;
                    self.sync_buffer(ctx);
                    Ok(InputResult::Message(format!("indent {}", n)))
                }
                _ => Ok(InputResult::Message("indent takes 2, 4 or 8".to_string())),
            };
        }

        if let Some(arg) = cmd.strip_prefix("sort ") {
            return match arg.trim() {
                "on" => {
                    ctx.document.set_sort_keys(true)?;
                    self.sync_buffer(ctx);
                    ctx.viewer.rebuild(ctx.document.value());
                    Ok(InputResult::Message("sort keys on".to_string()))
                }
                "off" => {
                    ctx.document.set_sort_keys(false)?;
                    Ok(InputResult::Message(
                        "sort keys off (reformat to restore input order)".to_string(),
                    ))
                }
                _ => Ok(InputResult::Message("sort takes on|off".to_string())),
            };
        }

        if let Some(arg) = cmd.strip_prefix("goto ") {
            return match NodePath::parse(arg.trim()) {
                Ok(path) => {
                    if ctx.viewer.goto(&path) {
                        Ok(InputResult::ModeSwitch(Mode::Normal))
                    } else {
                        Ok(InputResult::Message(format!("path not found: {}", path)))
                    }
                }
                Err(e) => Ok(InputResult::Message(e.to_string())),
            };
        }

        match cmd {
            "q" | "quit" => {
                if ctx.buffer.is_modified() {
                    return Ok(InputResult::Message(
                        "No write since last change (use :q! to override)".to_string(),
                    ));
                }
                Ok(InputResult::Quit)
            }
            "w" | "write" => {
                self.sync_buffer(ctx);
                ctx.buffer.save()?;
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }
            "wq" | "x" => {
                self.sync_buffer(ctx);
                ctx.buffer.save()?;
                Ok(InputResult::Quit)
            }
            "q!" => Ok(InputResult::Quit),
            "" => Ok(InputResult::ModeSwitch(Mode::Normal)),
            _ => Ok(InputResult::Message(format!("Unknown command: {}", cmd))),
        }
    }

    /// Saving persists the canonical document text when one exists.
    fn sync_buffer(&self, ctx: &mut ViewerContext) {
        if !ctx.document.text().is_empty() {
            ctx.buffer.set_text(ctx.document.text());
        }
    }

    fn open_file(&self, filename: &str, ctx: &mut ViewerContext) -> Result<InputResult> {
        if let Err(e) = ctx.buffer.load_file(filename) {
            return Ok(InputResult::Message(format!("cannot open {}: {}", filename, e)));
        }
        let input = ctx.buffer.text();
        match ctx.document.format(&input) {
            Ok(()) => {
                ctx.viewer.rebuild(ctx.document.value());
                *ctx.raw_scroll = 0;
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }
            Err(e) => {
                ctx.viewer.rebuild(ctx.document.value());
                Ok(InputResult::Message(e.to_string()))
            }
        }
    }
}

impl ModeHandler for CommandMode {
    fn handle_key(&mut self, key: KeyEvent, mut ctx: ViewerContext) -> Result<InputResult> {
        match (key.code, key.modifiers) {
            // Escape - cancel command mode
            (KeyCode::Esc, _) => {
                self.command_line.clear();
                Ok(InputResult::ModeSwitch(Mode::Normal))
            }

            // Enter - execute command
            (KeyCode::Enter, _) => {
                let cmd = self.command_line.clone();
                self.command_line.clear();
                self.execute_command(&cmd, &mut ctx)
            }

            // Backspace - delete character
            (KeyCode::Backspace, _) => {
                self.command_line.pop();
                if self.command_line.is_empty() {
                    Ok(InputResult::ModeSwitch(Mode::Normal))
                } else {
                    Ok(InputResult::Handled)
                }
            }

            // Type character
            (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
                self.command_line.push(c);
                Ok(InputResult::Handled)
            }

            _ => Ok(InputResult::NotHandled),
        }
    }
}
