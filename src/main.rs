use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use serde::{Deserialize, Serialize};
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

use jex::document::{Document, FormatOptions};
use jex::mode::command::CommandMode;
use jex::mode::edit::{AddMode, EditMode};
use jex::mode::normal::NormalMode;
use jex::mode::{InputResult, Mode, ModeHandler, RegisterMap, ViewerContext};
use jex::ui::{render, Tab, Theme};
use jex::viewer::{ParentKind, Viewer};
use jex::Buffer;

/// Host-persisted options (the sidecar the original kept in localStorage).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
struct Options {
    format: FormatOptions,
    dark: Option<bool>,
    wrap: Option<bool>,
}

fn options_path() -> String {
    std::env::var("JEX_CONFIG").unwrap_or_else(|_| ".jex.json".to_string())
}

fn load_options() -> Options {
    std::fs::read_to_string(options_path())
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_default()
}

fn save_options(options: &Options) {
    if let Ok(text) = serde_json::to_string_pretty(options) {
        let _ = std::fs::write(options_path(), text);
    }
}

struct App {
    should_quit: bool,
    buffer: Buffer,
    document: Document,
    viewer: Viewer,
    registers: RegisterMap,
    theme: Theme,
    tab: Tab,
    raw_scroll: usize,
    mode: Mode,
    normal: NormalMode,
    edit: EditMode,
    add: AddMode,
    command: CommandMode,
    message: Option<String>,
    show_performance: bool,
    flatten_time: f64,
    frame_count: u64,
    last_fps_update: Instant,
    fps: f64,
}

impl App {
    fn new() -> Self {
        let options = load_options();
        let mut document = Document::new();
        document.options = options.format;
        let mut viewer = Viewer::new(40);
        viewer.wrap = options.wrap.unwrap_or(false);
        Self {
            should_quit: false,
            buffer: Buffer::new(),
            document,
            viewer,
            registers: RegisterMap::new(),
            theme: Theme::new(options.dark.unwrap_or(true)),
            tab: Tab::Tree,
            raw_scroll: 0,
            mode: Mode::Normal,
            normal: NormalMode::new(),
            edit: EditMode::new(),
            add: AddMode::new(),
            command: CommandMode::new(),
            message: None,
            show_performance: false,
            flatten_time: 0.0,
            frame_count: 0,
            last_fps_update: Instant::now(),
            fps: 0.0,
        }
    }

    fn load_file(&mut self, path: &str) -> Result<()> {
        self.buffer.load_file(path)?;
        let input = self.buffer.text();

        let start = Instant::now();
        if let Err(e) = self.document.format(&input) {
            self.message = Some(e.to_string());
        }
        self.viewer.rebuild(self.document.value());
        self.flatten_time = start.elapsed().as_secs_f64();
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key(key)?,
            Event::Resize(_, height) => {
                self.viewer.viewport.resize(height.saturating_sub(4) as usize);
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::F(12) {
            self.show_performance = !self.show_performance;
            return Ok(());
        }

        let ctx = ViewerContext {
            document: &mut self.document,
            viewer: &mut self.viewer,
            buffer: &mut self.buffer,
            registers: &mut self.registers,
            theme: &mut self.theme,
            tab: &mut self.tab,
            raw_scroll: &mut self.raw_scroll,
        };
        let result = match self.mode {
            Mode::Normal => self.normal.handle_key(key, ctx)?,
            Mode::Edit => self.edit.handle_key(key, ctx)?,
            Mode::Add => self.add.handle_key(key, ctx)?,
            Mode::Command => self.command.handle_key(key, ctx)?,
        };
        self.apply_result(result);
        Ok(())
    }

    fn apply_result(&mut self, result: InputResult) {
        match result {
            InputResult::Handled | InputResult::NotHandled => {}
            InputResult::Quit => self.should_quit = true,
            InputResult::Message(text) => self.message = Some(text),
            InputResult::ModeSwitch(mode) => {
                self.message = None;
                if self.enter_mode(mode) {
                    self.mode = mode;
                } else {
                    self.mode = Mode::Normal;
                }
            }
        }
    }

    /// Seed the target handler from the current selection. Stale selections
    /// refuse the switch instead of editing the wrong node.
    fn enter_mode(&mut self, mode: Mode) -> bool {
        match mode {
            Mode::Normal => true,
            Mode::Command => {
                self.command.command_line.clear();
                true
            }
            Mode::Edit => {
                let Some(doc) = self.document.value() else {
                    return false;
                };
                let Some(node) = self.viewer.selected_node(doc) else {
                    return false;
                };
                let Some(current) = node.path.resolve(doc) else {
                    return false;
                };
                self.edit.seed(&node, current);
                true
            }
            Mode::Add => {
                let Some(doc) = self.document.value() else {
                    return false;
                };
                let Some(node) = self.viewer.selected_node(doc) else {
                    return false;
                };
                let Some(value) = node.path.resolve(doc) else {
                    return false;
                };
                // containers take the new child themselves; scalars add a
                // sibling into their parent
                if value.is_object() || value.is_array() {
                    self.add.seed_container(node.path.clone(), value.is_object());
                } else {
                    let parent = node.path.parent().unwrap_or_default();
                    match node.parent {
                        ParentKind::Object => self.add.seed_container(parent, true),
                        ParentKind::Array => self.add.seed_container(parent, false),
                        ParentKind::Root => return false,
                    }
                }
                true
            }
        }
    }

    fn status_line(&self) -> String {
        match self.mode {
            Mode::Command => format!(":{}", self.command.command_line),
            Mode::Edit => format!("{} value: {}", Mode::Edit.display(), self.edit.input),
            Mode::Add => format!("{} {}", Mode::Add.display(), self.add.prompt()),
            Mode::Normal => {
                if let Some(message) = &self.message {
                    return message.clone();
                }
                let file_name = self
                    .buffer
                    .path()
                    .and_then(|p| p.file_name())
                    .and_then(|n| n.to_str())
                    .unwrap_or("[no file]");
                format!(
                    " {} ({}) | {}/{} | f:format s:escape u:unescape e:edit a:add d:delete | FPS: {:.1}",
                    file_name,
                    format_size(self.buffer.file_size()),
                    self.viewer.selected_index() + 1,
                    self.viewer.visible_len(),
                    self.fps
                )
            }
        }
    }

    fn update_fps(&mut self) {
        self.frame_count += 1;
        let elapsed = self.last_fps_update.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_fps_update = Instant::now();
        }
    }

    fn options(&self) -> Options {
        Options {
            format: self.document.options,
            dark: Some(self.theme.dark),
            wrap: Some(self.viewer.wrap),
        }
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    terminal.show_cursor()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;
    const GB: usize = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

fn render_ui(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|frame| {
        let size = frame.area();
        let theme = app.theme;

        let has_error = app.document.error().is_some();
        let mut constraints = vec![Constraint::Length(1)];
        if has_error {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(1));
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        let breadcrumb_area = chunks[0];
        let (banner_area, main_area, status_area) = if has_error {
            (Some(chunks[1]), chunks[2], chunks[3])
        } else {
            (None, chunks[1], chunks[2])
        };

        let selected = app
            .document
            .value()
            .and_then(|doc| app.viewer.selected_node(doc));
        render::draw_breadcrumb(frame, breadcrumb_area, selected.as_ref(), &theme);

        if let (Some(area), Some(error)) = (banner_area, app.document.error()) {
            render::draw_error_banner(frame, area, error, &theme);
        }

        let title = format!(" jex [{}] ", app.tab.title());
        let main_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border()))
            .title(title);
        let inner_area = main_block.inner(main_area);
        frame.render_widget(main_block, main_area);

        app.viewer.viewport.resize(inner_area.height as usize);

        match app.tab {
            Tab::Tree => render::draw_tree(frame, inner_area, &app.viewer, &theme),
            Tab::Raw => {
                let text = if app.document.text().is_empty() {
                    app.buffer.text()
                } else {
                    app.document.text().to_string()
                };
                render::draw_raw(frame, inner_area, &text, app.raw_scroll, &theme, app.viewer.wrap);
            }
        }

        let status = Paragraph::new(app.status_line())
            .style(Style::default().bg(theme.status_bg()).fg(Color::White));
        frame.render_widget(status, status_area);

        if app.show_performance {
            let perf_area = Rect {
                x: size.width.saturating_sub(35),
                y: 2,
                width: 33.min(size.width),
                height: 7.min(size.height),
            };
            let perf_text = vec![
                Line::styled(" Performance ", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Line::from(format!(" FPS: {:.1}", app.fps)),
                Line::from(format!(" Lines: {}", app.viewer.lines().len())),
                Line::from(format!(" Visible: {}", app.viewer.visible_len())),
                Line::from(format!(" Flatten: {:.3}s", app.flatten_time)),
            ];
            let perf_block = Block::default()
                .borders(Borders::ALL)
                .style(Style::default().bg(Color::Black).fg(Color::White));
            frame.render_widget(Paragraph::new(perf_text).block(perf_block), perf_area);
        }
    })?;

    Ok(())
}

fn run(mut app: App, mut terminal: Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    loop {
        app.update_fps();
        render_ui(&mut terminal, &mut app)?;

        if app.should_quit {
            break;
        }

        // Poll with a timeout to keep the FPS counter honest without
        // spinning between key presses.
        if event::poll(Duration::from_millis(16))? {
            let event = event::read()?;
            app.handle_event(event)?;
        }
    }

    save_options(&app.options());
    Ok(())
}

fn main() -> Result<()> {
    // Restore the terminal even when a draw panics.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
        default_panic(info);
    }));

    let mut app = App::new();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        app.load_file(&args[1])?;
    }

    let terminal = setup_terminal()?;
    let result = run(app, terminal);

    let terminal = setup_terminal()?;
    restore_terminal(terminal)?;

    result
}
