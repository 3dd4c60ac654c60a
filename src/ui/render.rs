use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line as UiLine, Span};
use ratatui::widgets::{Paragraph, Wrap};
use ratatui::Frame;

use crate::highlight;
use crate::ui::theme::Theme;
use crate::viewer::{SelectedNode, Viewer};

/// Paint the windowed slice of the visible tree lines.
///
/// Only rows intersecting the viewport are materialized; the whole window
/// repaints each frame (retained-mode, no per-row event patching to leak).
pub fn draw_tree(frame: &mut Frame, area: Rect, viewer: &Viewer, theme: &Theme) {
    let total = viewer.visible_len();
    if total == 0 {
        let hint = Paragraph::new("no document (:e <file> to load, f to format)")
            .style(Style::default().fg(theme.line_number()));
        frame.render_widget(hint, area);
        return;
    }

    let Some((start, end)) = viewer.viewport.visible_range(total) else {
        return;
    };
    let first = viewer.viewport.first_index();
    let width = digits(total);

    let mut rows: Vec<UiLine> = Vec::with_capacity(area.height as usize);
    for vis_idx in start..=end {
        if vis_idx < first || vis_idx >= first + area.height as usize {
            // overscan rows outside the terminal window are not painted
            continue;
        }
        let Some(line) = viewer.visible_line(vis_idx) else {
            break;
        };
        let selected = vis_idx == viewer.selected_index();
        let bg = if selected {
            theme.selection_bg()
        } else {
            ratatui::style::Color::Reset
        };

        let mut spans = Vec::with_capacity(line.fragments.len() + 3);
        spans.push(Span::styled(
            format!("{:>width$} ", vis_idx + 1, width = width),
            Style::default().fg(theme.line_number()).bg(bg),
        ));

        let arrow = if line.collapsible {
            if viewer.collapse_state().is_collapsed(&line.path) {
                "▶ "
            } else {
                "▼ "
            }
        } else {
            "  "
        };
        spans.push(Span::styled(
            arrow,
            Style::default().fg(theme.arrow()).bg(bg),
        ));

        spans.push(Span::styled(
            "  ".repeat(line.level),
            Style::default().bg(bg),
        ));
        for frag in &line.fragments {
            spans.push(Span::styled(
                frag.text.clone(),
                Style::default().fg(theme.frag_color(frag.kind)).bg(bg),
            ));
        }
        rows.push(UiLine::from(spans));
    }

    let mut paragraph = Paragraph::new(rows);
    if viewer.wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, area);
}

/// Paint the raw text pane with token-based syntax highlighting.
pub fn draw_raw(
    frame: &mut Frame,
    area: Rect,
    text: &str,
    scroll: usize,
    theme: &Theme,
    wrap: bool,
) {
    let rows: Vec<UiLine> = text
        .lines()
        .skip(scroll)
        .take(area.height as usize)
        .map(|line| colorize_raw_line(line, theme))
        .collect();
    let mut paragraph = Paragraph::new(rows);
    if wrap {
        paragraph = paragraph.wrap(Wrap { trim: false });
    }
    frame.render_widget(paragraph, area);
}

fn colorize_raw_line<'a>(line: &'a str, theme: &Theme) -> UiLine<'a> {
    let spans: Vec<Span> = highlight::tokenize(line)
        .into_iter()
        .map(|token| {
            Span::styled(
                &line[token.start..token.end],
                Style::default().fg(theme.token_color(token.kind)),
            )
        })
        .collect();
    UiLine::from(spans)
}

/// Breadcrumb bar: selected path root-first plus the accessor expression.
pub fn draw_breadcrumb(
    frame: &mut Frame,
    area: Rect,
    selected: Option<&SelectedNode>,
    theme: &Theme,
) {
    let mut spans = vec![Span::styled(
        "root",
        Style::default()
            .fg(theme.breadcrumb())
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(node) = selected {
        for step in node.path.steps() {
            spans.push(Span::styled(" / ", Style::default().fg(theme.line_number())));
            spans.push(Span::styled(
                step.label(),
                Style::default().fg(theme.breadcrumb()),
            ));
        }
        let accessor = node.path.accessor();
        if !accessor.is_empty() {
            spans.push(Span::styled(
                format!("   {}", accessor),
                Style::default().fg(theme.line_number()),
            ));
        }
        spans.push(Span::styled(
            format!("   = {}", node.preview),
            Style::default().fg(theme.line_number()),
        ));
    }
    frame.render_widget(Paragraph::new(UiLine::from(spans)), area);
}

/// Parse-error banner shown above the still-intact last good tree.
pub fn draw_error_banner(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let banner = Paragraph::new(format!(" {} ", message)).style(
        Style::default()
            .bg(theme.banner_bg())
            .fg(ratatui::style::Color::White),
    );
    frame.render_widget(banner, area);
}

fn digits(n: usize) -> usize {
    let mut n = n;
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
