use std::fmt::Display;
use std::rc::Rc;

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum TokenKind {
    Illegal(Rc<str>),
    Ident(Rc<str>),
    Int(Rc<str>),
    String(Rc<str>),

    // Operators
    Assign,
    Plus,
    Minus,
    Bang,
    Asterisk,
    Slash,

    Equal,
    NotEqual,

    GreaterThan,
    LessThan,

    Comma,
    Colon,
    SemiColon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,

    // Keywords
    Function,
    Let,
    True,
    False,
    If,
    Else,
    Return,

    Eof,
}

impl TokenKind {
    /// Source text of the token. String literals are returned without quotes.
    pub fn literal(&self) -> &str {
        use TokenKind::*;
        match self {
            Illegal(text) | Ident(text) | Int(text) | String(text) => text,
            Assign => "=",
            Plus => "+",
            Minus => "-",
            Bang => "!",
            Asterisk => "*",
            Slash => "/",
            Equal => "==",
            NotEqual => "!=",
            GreaterThan => ">",
            LessThan => "<",
            Comma => ",",
            Colon => ":",
            SemiColon => ";",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Function => "fn",
            Let => "let",
            True => "true",
            False => "false",
            If => "if",
            Else => "else",
            Return => "return",
            Eof => "",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::String(text) => write!(f, "`\"{}\"`", text),
            kind => write!(f, "`{}`", kind.literal()),
        }
    }
}

/// Where a token starts. Lines and columns are 1-based, columns count bytes.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Position {
    pub file: Option<Rc<str>>,
    pub line: usize,
    pub column: usize,
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "{}:", file)?;
        }
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub position: Position,
}

impl Token {
    pub fn literal(&self) -> &str {
        self.kind.literal()
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "{}", self.kind),
            _ => write!(f, "{} at {}", self.kind, self.position),
        }
    }
}

fn keywords(ident: &str) -> Option<TokenKind> {
    match ident {
        "fn" => Some(TokenKind::Function),
        "let" => Some(TokenKind::Let),
        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "return" => Some(TokenKind::Return),
        _ => None,
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

#[derive(Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    file: Option<Rc<str>>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Self {
            input,
            file: None,
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    pub fn with_file(input: &'a str, file: impl Into<Rc<str>>) -> Self {
        Self {
            file: Some(file.into()),
            ..Self::new(input)
        }
    }

    /// Produces the next token. Once the input is exhausted (or a NUL byte is
    /// reached) every call yields `TokenKind::Eof`.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();
        let start = self.current_position();

        let kind = match self.ch {
            0 => {
                return Token {
                    kind: TokenKind::Eof,
                    position: start,
                }
            }
            b'"' => return self.read_string(start),
            ch if ch.is_ascii_digit() => return self.read_number(start),
            ch if is_letter(ch) => return self.read_identifier(start),
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::Equal
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::NotEqual
                } else {
                    TokenKind::Bang
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::LessThan,
            b'>' => TokenKind::GreaterThan,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b';' => TokenKind::SemiColon,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            ch if ch.is_ascii() => TokenKind::Illegal((ch as char).to_string().into()),
            _ => {
                // Keep multi-byte characters whole so the literal stays valid UTF-8
                let ch = self.input[self.position..]
                    .chars()
                    .next()
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                for _ in 1..ch.len_utf8() {
                    self.read_char();
                }
                TokenKind::Illegal(ch.to_string().into())
            }
        };

        self.read_char();
        Token {
            kind,
            position: start,
        }
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }
        self.position = self.read_position.min(self.input.len());
        self.ch = self
            .input
            .as_bytes()
            .get(self.read_position)
            .copied()
            .unwrap_or(0);
        if self.read_position < self.input.len() {
            self.read_position += 1;
        }
        self.column += 1;
    }

    fn peek_char(&self) -> u8 {
        self.input
            .as_bytes()
            .get(self.read_position)
            .copied()
            .unwrap_or(0)
    }

    fn current_position(&self) -> Position {
        Position {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\r' | b'\n') {
            self.read_char();
        }
    }

    fn read_identifier(&mut self, start: Position) -> Token {
        let begin = self.position;
        while is_letter(self.ch) || self.ch.is_ascii_digit() {
            self.read_char();
        }

        let ident = &self.input[begin..self.position];
        Token {
            kind: keywords(ident).unwrap_or_else(|| TokenKind::Ident(ident.into())),
            position: start,
        }
    }

    fn read_number(&mut self, start: Position) -> Token {
        let begin = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char();
        }

        Token {
            kind: TokenKind::Int(self.input[begin..self.position].into()),
            position: start,
        }
    }

    fn read_string(&mut self, start: Position) -> Token {
        let begin = self.position;
        self.read_char();
        while self.ch != b'"' {
            if self.ch == 0 && self.position >= self.input.len() {
                return Token {
                    kind: TokenKind::Illegal(self.input[begin..].into()),
                    position: start,
                };
            }
            self.read_char();
        }

        let string = &self.input[begin + 1..self.position];
        self.read_char();
        Token {
            kind: TokenKind::String(string.into()),
            position: start,
        }
    }
}

/// Yields every token up to, but excluding, the end of input.
impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.next_token();
        match token.kind {
            TokenKind::Eof => None,
            _ => Some(token),
        }
    }
}

pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}
