//! Tokenizer for the raw-text view. Splits a line of JSON source into
//! typed spans the theme can color. Tolerant of invalid input: unknown
//! bytes come back as `Invalid` tokens, never an error.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    BraceOpen,    // {
    BraceClose,   // }
    BracketOpen,  // [
    BracketClose, // ]
    Colon,        // :
    Comma,        // ,
    Str,          // "..."
    Number,       // 123, 12.34, -5, 1e10
    True,
    False,
    Null,
    Whitespace,
    Invalid,
}

#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize, // byte offset
    pub end: usize,   // byte offset (exclusive)
}

impl Token {
    fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self { kind, start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) -> Option<Token> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch == b' ' || ch == b'\n' || ch == b'\r' || ch == b'\t' {
                self.advance();
            } else {
                break;
            }
        }
        (self.pos > start).then(|| Token::new(TokenKind::Whitespace, start, self.pos))
    }

    fn scan_string(&mut self, start: usize) -> Token {
        self.advance(); // opening quote
        loop {
            match self.advance() {
                Some(b'"') => return Token::new(TokenKind::Str, start, self.pos),
                Some(b'\\') => {
                    self.advance();
                }
                Some(_) => {}
                // unterminated string, e.g. a line break mid-string
                None => return Token::new(TokenKind::Str, start, self.pos),
            }
        }
    }

    fn scan_number(&mut self, start: usize) -> Token {
        if self.peek() == Some(b'-') {
            self.advance();
        }
        let mut has_digits = false;
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
                has_digits = true;
            } else {
                break;
            }
        }
        if self.peek() == Some(b'.') {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            self.advance();
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.advance();
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        if has_digits {
            Token::new(TokenKind::Number, start, self.pos)
        } else {
            Token::new(TokenKind::Invalid, start, self.pos)
        }
    }

    fn scan_keyword(&mut self, start: usize, keyword: &[u8], kind: TokenKind) -> Token {
        for &expected in keyword {
            match self.advance() {
                Some(ch) if ch == expected => continue,
                _ => return Token::new(TokenKind::Invalid, start, self.pos),
            }
        }
        Token::new(kind, start, self.pos)
    }

    fn next_token(&mut self) -> Option<Token> {
        if let Some(ws) = self.skip_whitespace() {
            return Some(ws);
        }
        let start = self.pos;
        let ch = self.peek()?;
        let token = match ch {
            b'{' => {
                self.advance();
                Token::new(TokenKind::BraceOpen, start, self.pos)
            }
            b'}' => {
                self.advance();
                Token::new(TokenKind::BraceClose, start, self.pos)
            }
            b'[' => {
                self.advance();
                Token::new(TokenKind::BracketOpen, start, self.pos)
            }
            b']' => {
                self.advance();
                Token::new(TokenKind::BracketClose, start, self.pos)
            }
            b':' => {
                self.advance();
                Token::new(TokenKind::Colon, start, self.pos)
            }
            b',' => {
                self.advance();
                Token::new(TokenKind::Comma, start, self.pos)
            }
            b'"' => self.scan_string(start),
            b'-' | b'0'..=b'9' => self.scan_number(start),
            b't' => self.scan_keyword(start, b"true", TokenKind::True),
            b'f' => self.scan_keyword(start, b"false", TokenKind::False),
            b'n' => self.scan_keyword(start, b"null", TokenKind::Null),
            _ => {
                // consume the whole UTF-8 sequence so spans stay sliceable
                self.advance();
                while self.peek().is_some_and(|b| (0x80..0xC0).contains(&b)) {
                    self.advance();
                }
                Token::new(TokenKind::Invalid, start, self.pos)
            }
        };
        Some(token)
    }
}

/// Tokenize one line of raw JSON text.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut scanner = Scanner::new(line);
    let mut tokens = Vec::new();
    while let Some(token) = scanner.next_token() {
        tokens.push(token);
    }
    tokens
}
