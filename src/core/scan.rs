/// Scanner — turns grammar source text into a one-token-lookahead stream.
///
/// Control characters (`# [ ] ( ) : , .`) and whitespace each become their
/// own token. Everything else accumulates into `Text` runs. A backslash
/// escapes the following character into the current run, except for a
/// doubled backslash which is emitted as a standalone `BackStroke` token.
use std::collections::VecDeque;

/// Classification of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    /// Reserved; the scanner never produces it.
    Error,
    /// Any run of non-control text, possibly an identifier.
    Text,
    WhiteSpace,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    BackStroke,
    Colon,
    Comma,
    Octo,
    Period,
}

/// A scanned token and the source text it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

fn control_kind(c: char) -> Option<TokenKind> {
    match c {
        '#' => Some(TokenKind::Octo),
        '[' => Some(TokenKind::LeftBracket),
        ']' => Some(TokenKind::RightBracket),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        ':' => Some(TokenKind::Colon),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Period),
        c if c.is_whitespace() => Some(TokenKind::WhiteSpace),
        _ => None,
    }
}

/// Lazy token stream over a source string.
///
/// Tokens are produced on demand; once the input is exhausted every further
/// call yields `Eof`.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    pending: VecDeque<Token>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            pending: VecDeque::new(),
        }
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Token {
        loop {
            if let Some(token) = self.pending.front() {
                return token.clone();
            }
            if !self.fill() {
                return Token::eof();
            }
        }
    }

    /// Consume and return the next token.
    pub fn next_token(&mut self) -> Token {
        let token = self.peek();
        self.pending.pop_front();
        token
    }

    /// Scan one step of input into the pending queue. Returns false at end of input.
    fn fill(&mut self) -> bool {
        let input = self.input;
        let rest = &input[self.pos..];
        if rest.is_empty() {
            return false;
        }

        let mut text = String::new();
        let mut chars = rest.char_indices();
        let mut consumed = rest.len();
        let mut trailing = None;

        while let Some((i, c)) = chars.next() {
            if c == '\\' {
                match chars.next() {
                    // Dangling escape, the run simply ends at EOF
                    None => break,
                    Some((j, '\\')) => {
                        consumed = j + 1;
                        trailing = Some(Token::new(TokenKind::BackStroke, "\\"));
                        break;
                    }
                    Some((_, escaped)) => text.push(escaped),
                }
                continue;
            }
            if let Some(kind) = control_kind(c) {
                consumed = i + c.len_utf8();
                trailing = Some(Token::new(kind, c.to_string()));
                break;
            }
            text.push(c);
        }

        self.pos += consumed;
        if !text.is_empty() {
            self.pending.push_back(Token::new(TokenKind::Text, text));
        }
        if let Some(token) = trailing {
            self.pending.push_back(token);
        }
        true
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    /// Yields tokens up to, but not including, `Eof`.
    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        (token.kind != TokenKind::Eof).then_some(token)
    }
}
