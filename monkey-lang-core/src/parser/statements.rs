use super::expressions::{parse_expression, Precedence};
use super::{ParseError, Parser};
use crate::ast::{Identifier, LetStatement, ReturnStatement, Statement};
use crate::lexer::TokenKind;

/// Parses one statement, leaving any trailing `;` for the caller.
pub fn parse_statement(parser: &mut Parser) -> Result<Statement, ParseError> {
    if parser.iter.next_if(|token| token.kind == TokenKind::Let).is_some() {
        let name = parser.parse_ident()?;
        parser.expect_token(TokenKind::Assign)?;
        let value = parse_expression(parser, Precedence::Lowest)?;

        return Ok(Statement::Let(LetStatement {
            identifier: Identifier { name },
            value,
        }));
    }

    if parser.iter.next_if(|token| token.kind == TokenKind::Return).is_some() {
        let value = parse_expression(parser, Precedence::Lowest)?;
        return Ok(Statement::Return(ReturnStatement { value }));
    }

    parse_expression(parser, Precedence::Lowest).map(Statement::Expression)
}
