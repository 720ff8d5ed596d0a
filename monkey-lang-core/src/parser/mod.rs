pub mod error;
pub mod expressions;
pub mod statements;

use crate::ast::Program;
use crate::lexer::{Lexer, Token, TokenKind};
pub use error::{Expected, ParseError};
use statements::parse_statement;

/// Pratt parser over a token stream. `iter.peek()` is the lookahead slot; the
/// token being handled is always the one most recently taken with `next()`.
pub struct Parser<'a> {
    pub iter: std::iter::Peekable<Lexer<'a>>,
    errors: Vec<ParseError>,
    /// `{` consumed but not yet closed by the statement being parsed.
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Self {
        let iter = lexer.peekable();
        Self {
            iter,
            errors: Vec::new(),
            depth: 0,
        }
    }

    pub(crate) fn parse_ident(&mut self) -> Result<std::rc::Rc<str>, ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token {
                kind: TokenKind::Ident(name),
                ..
            }) => Ok(name),
            _ => Err(ParseError::unexpected_other(Expected::Identifier, token)),
        }
    }

    pub(crate) fn expect_token(&mut self, token_kind: TokenKind) -> Result<(), ParseError> {
        let token = self.iter.next();
        match token {
            Some(Token { kind, .. }) if kind == token_kind => Ok(()),
            _ => Err(ParseError::unexpected_token(token_kind, token)),
        }
    }

    pub(crate) fn skip_semicolon(&mut self) {
        self.iter.next_if(|token| token.kind == TokenKind::SemiColon);
    }

    /// Parses until the end of input. Statements that fail to parse are left
    /// out of the program and their errors are available from `errors()`.
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        while self.iter.peek().is_some() {
            match parse_statement(self) {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    tracing::debug!(error = %err, "syntax error");
                    self.synchronize(&err);
                    self.errors.push(err);
                }
            }
            self.skip_semicolon();
        }

        Program { statements }
    }

    pub(crate) fn open_brace(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn close_brace(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Drops the rest of a malformed statement. Skipping first leaves every
    /// brace the statement opened, then stops after a `;` or before a `let`,
    /// `return` or unmatched `}`.
    fn synchronize(&mut self, error: &ParseError) {
        let mut depth = std::mem::take(&mut self.depth);
        match error.token().map(|token| &token.kind) {
            Some(TokenKind::SemiColon) if depth == 0 => return,
            Some(TokenKind::LBrace) => depth += 1,
            Some(TokenKind::RBrace) => depth = depth.saturating_sub(1),
            _ => {}
        }

        while let Some(token) = self.iter.peek() {
            match token.kind {
                TokenKind::Let | TokenKind::Return | TokenKind::RBrace if depth == 0 => return,
                TokenKind::SemiColon if depth == 0 => {
                    self.iter.next();
                    return;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            self.iter.next();
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(|err| err.to_string()).collect()
    }
}

pub fn parse(input: &str) -> Result<Program, Vec<ParseError>> {
    let mut parser = Parser::new(Lexer::new(input));
    let program = parser.parse_program();
    if parser.errors.is_empty() {
        Ok(program)
    } else {
        Err(parser.errors)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_parsing(tests: Vec<(&str, &str)>) {
        for (input, expected) in tests {
            let program = parse(input).unwrap();

            assert_eq!(program.to_string(), expected)
        }
    }

    #[test]
    fn test_operator_precedence() {
        let tests = vec![
            ("-a * b", "((-a) * b);\n"),
            ("!-a", "(!(-a));\n"),
            ("a + b + c", "((a + b) + c);\n"),
            ("a + b - c", "((a + b) - c);\n"),
            ("a * b * c", "((a * b) * c);\n"),
            ("a * b / c", "((a * b) / c);\n"),
            ("a + b / c", "(a + (b / c));\n"),
            (
                "a + b * c + d / e - f",
                "(((a + (b * c)) + (d / e)) - f);\n",
            ),
            ("3 + 4; -5 * 5", "(3 + 4);\n((-5) * 5);\n"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4));\n"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4));\n"),
            (
                "3 + 4 * 5 == 3 * 1 + 4 * 5",
                "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)));\n",
            ),
            ("true != false == true", "((true != false) == true);\n"),
            (
                "a * [1, 2, 3, 4][b * c] * d",
                "((a * ([1, 2, 3, 4][(b * c)])) * d);\n",
            ),
            (
                "add(a * b[2], b[1], 2 * [1, 2][1])",
                "add((a * (b[2])), (b[1]), (2 * ([1, 2][1])));\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_grouped_expressions() {
        let tests = vec![
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4);\n"),
            ("(5 + 5) * 2", "((5 + 5) * 2);\n"),
            ("2 / (5 + 5)", "(2 / (5 + 5));\n"),
            ("-(5 + 5)", "(-(5 + 5));\n"),
            ("!(true == true)", "(!(true == true));\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_statements() {
        let tests = vec![
            ("let x = 5;", "let x = 5;\n"),
            ("let y = true", "let y = true;\n"),
            ("let foobar = y;", "let foobar = y;\n"),
            ("return 5;", "return 5;\n"),
            ("return x + y", "return (x + y);\n"),
            ("let a = 1 let b = 2", "let a = 1;\nlet b = 2;\n"),
            (r#""hello world";"#, "\"hello world\";\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_call_expression() {
        let tests = vec![
            ("a + add(b * c) + d", "((a + add((b * c))) + d);\n"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)));\n",
            ),
            (
                "add(a + b + c * d / f + g)",
                "add((((a + b) + ((c * d) / f)) + g));\n",
            ),
            ("add()", "add();\n"),
            ("fn(x) { x }(5)", "fn(x) {x;}(5);\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_conditional() {
        let tests = vec![
            ("if (x < y) { x }", "if (x < y) {x;};\n"),
            (
                "if (x < y) { x } else { y }",
                "if (x < y) {x;} else {y;};\n",
            ),
            (
                "if (x) { if (y) { return 1; } return 2; }",
                "if x {if y {return 1;}; return 2;};\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_function() {
        let tests = vec![
            ("fn() {}", "fn() {};\n"),
            ("fn(x, y) { x + y; }", "fn(x, y) {(x + y);};\n"),
            (
                "let getName = fn(person) { person[\"name\"]; };",
                "let getName = fn(person) {(person[\"name\"]);};\n",
            ),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_collection_literals() {
        let tests = vec![
            ("[]", "[];\n"),
            ("[1, 2 * 2, 3 + 3]", "[1, (2 * 2), (3 + 3)];\n"),
            ("{}", "{};\n"),
            (
                r#"{"one": 0 + 1, "two": 10 - 8}"#,
                "{\"one\": (0 + 1), \"two\": (10 - 8)};\n",
            ),
            ("{1: true, false: \"x\"}", "{1: true, false: \"x\"};\n"),
        ];

        test_parsing(tests)
    }

    #[test]
    fn test_errors_are_collected() {
        let mut parser = Parser::new(Lexer::new("let = 5; let x 4; let y = 3;"));
        let program = parser.parse_program();

        assert_eq!(program.to_string(), "let y = 3;\n");
        assert_eq!(
            parser.error_messages(),
            vec![
                "expected an identifier, got `=` at 1:5".to_owned(),
                "expected `=`, got `4` at 1:16".to_owned(),
            ]
        );
    }

    #[test]
    fn test_recovery_at_statement_boundaries() {
        let tests = vec![
            (
                "let = 1\nlet = 2\nlet z 3\nlet ok = 4",
                "let ok = 4;\n",
                vec![
                    "expected an identifier, got `=` at 1:5",
                    "expected an identifier, got `=` at 2:5",
                    "expected `=`, got `3` at 3:7",
                ],
            ),
            (
                "let x = 1 +\nreturn x",
                "return x;\n",
                vec!["no prefix parse function for `return` at 2:1"],
            ),
            (
                "let f = fn() { let = 1; 2 }; let y = 3;",
                "let y = 3;\n",
                vec!["expected an identifier, got `=` at 1:20"],
            ),
            (
                "if (x) { let y 1 }\nlet z = 2\nreturn z",
                "let z = 2;\nreturn z;\n",
                vec!["expected `=`, got `1` at 1:16"],
            ),
            (
                "let g = fn() { if (a) { 1 + } else { 2 } }\nlet b = 1",
                "let b = 1;\n",
                vec!["no prefix parse function for `}` at 1:29"],
            ),
            (
                "let h = {1: }\nlet k = 5",
                "let k = 5;\n",
                vec!["no prefix parse function for `}` at 1:13"],
            ),
        ];

        for (input, expected_program, expected_errors) in tests {
            let mut parser = Parser::new(Lexer::new(input));
            let program = parser.parse_program();

            assert_eq!(program.to_string(), expected_program, "parsing {:?}", input);
            assert_eq!(parser.error_messages(), expected_errors, "parsing {:?}", input);
        }
    }

    #[test]
    fn test_missing_prefix_function() {
        let errors = parse("let x = ; x + @;").unwrap_err();

        assert_eq!(
            errors,
            vec![
                ParseError::NoPrefixFunction(Token {
                    kind: TokenKind::SemiColon,
                    position: crate::lexer::Position {
                        file: None,
                        line: 1,
                        column: 9
                    }
                }),
                ParseError::NoPrefixFunction(Token {
                    kind: TokenKind::Illegal("@".into()),
                    position: crate::lexer::Position {
                        file: None,
                        line: 1,
                        column: 15
                    }
                }),
            ]
        );
    }

    #[test]
    fn test_premature_end() {
        let errors = parse("fn(x) { x").unwrap_err();
        assert_eq!(
            errors,
            vec![ParseError::PrematureEndOfInput {
                expected: Expected::Token(TokenKind::RBrace)
            }]
        );

        let errors = parse("1 +").unwrap_err();
        assert_eq!(errors[0].to_string(), "unexpected end of input, expected an expression");
    }

    #[test]
    fn test_integer_out_of_range() {
        let errors = parse("9223372036854775808").unwrap_err();
        assert_eq!(
            errors[0].to_string(),
            "could not parse `9223372036854775808` as an integer at 1:1"
        );
    }
}
