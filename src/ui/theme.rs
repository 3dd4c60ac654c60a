use ratatui::style::Color;

use crate::highlight::TokenKind;
use crate::tree::FragKind;

/// Dark/light color mapping. The flag changes colors only; structure and
/// behavior are identical in both modes.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub dark: bool,
}

impl Theme {
    pub fn new(dark: bool) -> Self {
        Self { dark }
    }

    pub fn toggle(&mut self) {
        self.dark = !self.dark;
    }

    pub fn frag_color(&self, kind: FragKind) -> Color {
        if self.dark {
            match kind {
                FragKind::Key => Color::Red,
                FragKind::Str => Color::Green,
                FragKind::Num => Color::Yellow,
                FragKind::Bool => Color::Cyan,
                FragKind::Null => Color::DarkGray,
                FragKind::Bracket => Color::Blue,
                FragKind::Colon => Color::Magenta,
                FragKind::Comma => Color::White,
            }
        } else {
            match kind {
                FragKind::Key => Color::LightRed,
                FragKind::Str => Color::LightGreen,
                FragKind::Num => Color::LightYellow,
                FragKind::Bool => Color::LightCyan,
                FragKind::Null => Color::Gray,
                FragKind::Bracket => Color::LightBlue,
                FragKind::Colon => Color::LightMagenta,
                FragKind::Comma => Color::Black,
            }
        }
    }

    pub fn token_color(&self, kind: TokenKind) -> Color {
        match kind {
            TokenKind::BraceOpen
            | TokenKind::BraceClose
            | TokenKind::BracketOpen
            | TokenKind::BracketClose => self.frag_color(FragKind::Bracket),
            TokenKind::Str => self.frag_color(FragKind::Str),
            TokenKind::Number => self.frag_color(FragKind::Num),
            TokenKind::True | TokenKind::False => self.frag_color(FragKind::Bool),
            TokenKind::Null => self.frag_color(FragKind::Null),
            TokenKind::Colon => self.frag_color(FragKind::Colon),
            TokenKind::Comma | TokenKind::Whitespace => self.text(),
            TokenKind::Invalid => Color::LightRed,
        }
    }

    pub fn text(&self) -> Color {
        if self.dark {
            Color::White
        } else {
            Color::Black
        }
    }

    pub fn border(&self) -> Color {
        if self.dark {
            Color::Blue
        } else {
            Color::DarkGray
        }
    }

    pub fn selection_bg(&self) -> Color {
        if self.dark {
            Color::DarkGray
        } else {
            Color::LightBlue
        }
    }

    pub fn arrow(&self) -> Color {
        Color::Yellow
    }

    pub fn line_number(&self) -> Color {
        Color::DarkGray
    }

    pub fn banner_bg(&self) -> Color {
        Color::Red
    }

    pub fn status_bg(&self) -> Color {
        Color::DarkGray
    }

    pub fn breadcrumb(&self) -> Color {
        Color::Cyan
    }
}

impl Default for Theme {
    fn default() -> Self {
        // dark by default, matching the original tool
        Self { dark: true }
    }
}
