use std::rc::Rc;

use super::error::{Expected, ParseError};
use super::statements::parse_statement;
use super::Parser;
use crate::ast::{
    BlockStatement, Expression, Identifier, InfixOperationKind, PrefixOperationKind,
};
use crate::lexer::{Token, TokenKind};

/// Binding power, weakest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Lowest,
    Equals,
    LessGreater,
    Sum,
    Product,
    Prefix,
    Call,
    Index,
}

/// What a token does when it follows a complete left operand.
#[derive(Debug, Clone, Copy)]
enum Postfix {
    Binary(InfixOperationKind),
    Call,
    Index,
}

fn postfix_of(kind: &TokenKind) -> Option<(Precedence, Postfix)> {
    use InfixOperationKind as Op;

    let entry = match kind {
        TokenKind::Equal => (Precedence::Equals, Postfix::Binary(Op::Equal)),
        TokenKind::NotEqual => (Precedence::Equals, Postfix::Binary(Op::NotEqual)),
        TokenKind::LessThan => (Precedence::LessGreater, Postfix::Binary(Op::LessThan)),
        TokenKind::GreaterThan => (Precedence::LessGreater, Postfix::Binary(Op::GreaterThan)),
        TokenKind::Plus => (Precedence::Sum, Postfix::Binary(Op::Plus)),
        TokenKind::Minus => (Precedence::Sum, Postfix::Binary(Op::Minus)),
        TokenKind::Asterisk => (Precedence::Product, Postfix::Binary(Op::Multiply)),
        TokenKind::Slash => (Precedence::Product, Postfix::Binary(Op::Divide)),
        TokenKind::LParen => (Precedence::Call, Postfix::Call),
        TokenKind::LBracket => (Precedence::Index, Postfix::Index),
        _ => return None,
    };
    Some(entry)
}

/// Pratt loop: parse a prefix form, then keep folding it into the left side of
/// any operator that binds tighter than `precedence`.
pub fn parse_expression(
    parser: &mut Parser,
    precedence: Precedence,
) -> Result<Expression, ParseError> {
    // Statement keywords stay in the stream so recovery can restart there.
    let Some(token) = parser.iter.next_if(|token| !starts_statement(&token.kind)) else {
        return Err(match parser.iter.peek() {
            Some(keyword) => ParseError::NoPrefixFunction(keyword.clone()),
            None => ParseError::premature_end_expected_expression(),
        });
    };
    let mut left = parse_prefix(parser, token)?;

    while let Some((next_precedence, postfix)) =
        parser.iter.peek().and_then(|token| postfix_of(&token.kind))
    {
        if next_precedence <= precedence {
            break;
        }
        parser.iter.next();

        left = match postfix {
            Postfix::Binary(operator) => {
                let right = parse_expression(parser, next_precedence)?;
                Expression::InfixOperation(operator, Box::new(left), Box::new(right))
            }
            Postfix::Call => Expression::CallExpression {
                function: Box::new(left),
                arguments: parse_delimited(parser, TokenKind::RParen, parse_lowest)?,
            },
            Postfix::Index => {
                let index = parse_lowest(parser)?;
                parser.expect_token(TokenKind::RBracket)?;
                Expression::IndexExpression {
                    left: Box::new(left),
                    index: Box::new(index),
                }
            }
        };
    }

    Ok(left)
}

fn starts_statement(kind: &TokenKind) -> bool {
    matches!(kind, TokenKind::Let | TokenKind::Return)
}

fn parse_lowest(parser: &mut Parser) -> Result<Expression, ParseError> {
    parse_expression(parser, Precedence::Lowest)
}

fn parse_prefix(parser: &mut Parser, token: Token) -> Result<Expression, ParseError> {
    let expression = match &token.kind {
        TokenKind::Ident(name) => Expression::Identifier(Identifier { name: name.clone() }),
        TokenKind::Int(literal) => {
            let value = literal.parse().map_err(|_| ParseError::InvalidInteger {
                literal: literal.clone(),
                position: token.position.clone(),
            })?;
            Expression::IntegerLiteral(value)
        }
        TokenKind::String(value) => Expression::StringLiteral(value.to_string()),
        TokenKind::True => Expression::BooleanLiteral(true),
        TokenKind::False => Expression::BooleanLiteral(false),
        TokenKind::Bang => parse_prefix_operation(parser, PrefixOperationKind::Bang)?,
        TokenKind::Minus => parse_prefix_operation(parser, PrefixOperationKind::Minus)?,
        TokenKind::LParen => {
            let inner = parse_lowest(parser)?;
            parser.expect_token(TokenKind::RParen)?;
            inner
        }
        TokenKind::LBracket => {
            Expression::ArrayLiteral(parse_delimited(parser, TokenKind::RBracket, parse_lowest)?)
        }
        TokenKind::LBrace => {
            parser.open_brace();
            let pairs = parse_delimited(parser, TokenKind::RBrace, parse_pair)?;
            parser.close_brace();
            Expression::HashLiteral(pairs)
        }
        TokenKind::If => parse_if(parser)?,
        TokenKind::Function => parse_function(parser)?,
        _ => return Err(ParseError::NoPrefixFunction(token.clone())),
    };
    Ok(expression)
}

fn parse_prefix_operation(
    parser: &mut Parser,
    operator: PrefixOperationKind,
) -> Result<Expression, ParseError> {
    let operand = parse_expression(parser, Precedence::Prefix)?;
    Ok(Expression::PrefixOperation(operator, Box::new(operand)))
}

fn parse_pair(parser: &mut Parser) -> Result<(Expression, Expression), ParseError> {
    let key = parse_lowest(parser)?;
    parser.expect_token(TokenKind::Colon)?;
    Ok((key, parse_lowest(parser)?))
}

/// Comma separated items after an opening delimiter, through `close`. Empty
/// lists and a trailing comma are accepted.
fn parse_delimited<T>(
    parser: &mut Parser,
    close: TokenKind,
    item: impl Fn(&mut Parser) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    let mut items = Vec::new();

    loop {
        if parser.iter.next_if(|token| token.kind == close).is_some() {
            return Ok(items);
        }
        if parser.iter.peek().is_none() {
            return Err(ParseError::PrematureEndOfInput {
                expected: Expected::Token(close),
            });
        }

        items.push(item(parser)?);

        match parser.iter.next() {
            Some(token) if token.kind == TokenKind::Comma => {}
            Some(token) if token.kind == close => return Ok(items),
            other => return Err(ParseError::unexpected_token(close, other)),
        }
    }
}

/// `if` has already been consumed. The condition needs no parentheses.
fn parse_if(parser: &mut Parser) -> Result<Expression, ParseError> {
    let condition = Box::new(parse_lowest(parser)?);
    let consequence = parse_block(parser)?;
    let alternative = match parser.iter.next_if(|token| token.kind == TokenKind::Else) {
        Some(_) => Some(parse_block(parser)?),
        None => None,
    };

    Ok(Expression::IfExpression {
        condition,
        consequence,
        alternative,
    })
}

fn parse_function(parser: &mut Parser) -> Result<Expression, ParseError> {
    parser.expect_token(TokenKind::LParen)?;
    let parameters = parse_delimited(parser, TokenKind::RParen, |parser| {
        parser.parse_ident().map(|name| Identifier { name })
    })?;
    let body = parse_block(parser)?;

    Ok(Expression::FunctionLiteral {
        parameters: parameters.into(),
        body: Rc::new(body),
    })
}

/// `{ statement; statement }` with optional separators.
fn parse_block(parser: &mut Parser) -> Result<BlockStatement, ParseError> {
    parser.expect_token(TokenKind::LBrace)?;
    parser.open_brace();
    let mut statements = Vec::new();

    loop {
        match parser.iter.peek().map(|token| &token.kind) {
            Some(TokenKind::RBrace) => {
                parser.iter.next();
                parser.close_brace();
                return Ok(BlockStatement { statements });
            }
            Some(_) => {
                statements.push(parse_statement(parser)?);
                parser.skip_semicolon();
            }
            None => {
                return Err(ParseError::PrematureEndOfInput {
                    expected: Expected::Token(TokenKind::RBrace),
                })
            }
        }
    }
}
