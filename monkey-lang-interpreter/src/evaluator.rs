use std::collections::HashMap;

use gc::Gc;
use monkey_lang_core::ast::{self, BlockStatement, Expression, Statement};

use crate::builtins;
use crate::environment::Environment;
use crate::object::{EvaluationError, HashPair, Object, QuickReturn};

type Eval = Result<Gc<Object>, QuickReturn>;

/// Runs `program` in `env` and yields the value of its last statement, or of
/// the first top-level `return`.
pub fn eval_program(
    program: &ast::Program,
    env: &mut Environment,
) -> Result<Gc<Object>, EvaluationError> {
    match eval_statements(&program.statements, env) {
        Ok(value) | Err(QuickReturn::Return(value)) => Ok(value),
        Err(QuickReturn::Error(error)) => Err(error),
    }
}

/// Blocks share the enclosing scope. A `return` travels up as `Err` until
/// a function call or the program boundary unwraps it.
fn eval_block_statement(block: &BlockStatement, env: &mut Environment) -> Eval {
    eval_statements(&block.statements, env)
}

fn eval_statements(statements: &[Statement], env: &mut Environment) -> Eval {
    let mut last = Object::null();
    for statement in statements {
        last = eval_statement(statement, env)?;
    }
    Ok(last)
}

fn eval_statement(statement: &Statement, env: &mut Environment) -> Eval {
    match statement {
        Statement::Let(ast::LetStatement { identifier, value }) => {
            let value = eval_expression(value, env)?;
            env.set(identifier.name.clone(), value);
            Ok(Object::null())
        }
        Statement::Return(ast::ReturnStatement { value }) => {
            Err(QuickReturn::Return(eval_expression(value, env)?))
        }
        Statement::Expression(expression) => eval_expression(expression, env),
    }
}

fn eval_expression(expression: &Expression, env: &mut Environment) -> Eval {
    let value = match expression {
        Expression::IntegerLiteral(value) => Object::integer(*value),
        Expression::BooleanLiteral(value) => Object::boolean(*value),
        Expression::StringLiteral(value) => Object::string(value.clone()),
        Expression::Identifier(identifier) => eval_identifier(identifier, env)?,
        Expression::ArrayLiteral(elements) => Object::array(eval_expressions(elements, env)?),
        Expression::HashLiteral(pairs) => eval_hash_literal(pairs, env)?,
        Expression::PrefixOperation(kind, operand) => {
            let operand = eval_expression(operand, env)?;
            eval_prefix_operation(*kind, operand)?
        }
        Expression::InfixOperation(kind, left, right) => {
            // Right operand first.
            let right = eval_expression(right, env)?;
            let left = eval_expression(left, env)?;
            eval_infix_operation(*kind, left, right)?
        }
        Expression::IfExpression {
            condition,
            consequence,
            alternative,
        } => {
            let branch = if eval_expression(condition, env)?.is_truthy() {
                Some(consequence)
            } else {
                alternative.as_ref()
            };
            match branch {
                Some(block) => eval_block_statement(block, env)?,
                None => Object::null(),
            }
        }
        Expression::FunctionLiteral { parameters, body } => {
            Object::function(parameters.clone(), body.clone(), env.clone())
        }
        Expression::CallExpression {
            function,
            arguments,
        } => {
            let callee = eval_expression(function, env)?;
            let arguments = eval_expressions(arguments, env)?;
            apply_function(&callee, arguments)?
        }
        Expression::IndexExpression { left, index } => {
            let collection = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index_expression(&collection, &index)?
        }
    };
    Ok(value)
}

/// Local bindings shadow the built-ins.
fn eval_identifier(
    identifier: &ast::Identifier,
    env: &Environment,
) -> Result<Gc<Object>, EvaluationError> {
    env.get(&identifier.name)
        .or_else(|| builtins::lookup(&identifier.name))
        .ok_or_else(|| EvaluationError::UnknownIdentifier(identifier.name.clone()))
}

/// Pairs are evaluated in source order; a key is checked as soon as it is
/// known, before its value is evaluated. Later duplicates win.
fn eval_hash_literal(pairs: &[(Expression, Expression)], env: &mut Environment) -> Eval {
    let mut entries = HashMap::with_capacity(pairs.len());
    for (key, value) in pairs {
        let key = eval_expression(key, env)?;
        let hash_key = key
            .hash_key()
            .ok_or_else(|| EvaluationError::InvalidHashKey(key.object_type()))?;
        let value = eval_expression(value, env)?;
        entries.insert(hash_key, HashPair { key, value });
    }
    Ok(Object::hash(entries))
}

fn eval_expressions(
    expressions: &[Expression],
    env: &mut Environment,
) -> Result<Vec<Gc<Object>>, QuickReturn> {
    expressions
        .iter()
        .map(|expression| eval_expression(expression, env))
        .collect()
}

/// Calls a function or builtin. A user function runs in a fresh scope enclosed
/// by the scope it was defined in, not the caller's.
#[tracing::instrument(level = "trace", skip_all, fields(arguments = arguments.len()))]
fn apply_function(
    function: &Gc<Object>,
    arguments: Vec<Gc<Object>>,
) -> Result<Gc<Object>, EvaluationError> {
    match &**function {
        Object::Function(function) => {
            if function.parameters.len() != arguments.len() {
                return Err(EvaluationError::WrongArgumentCount {
                    expected: function.parameters.len(),
                    actual: arguments.len(),
                });
            }

            let mut scope = Environment::new_enclosed(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                scope.set(parameter.name.clone(), argument);
            }

            match eval_block_statement(&function.body, &mut scope) {
                Ok(value) | Err(QuickReturn::Return(value)) => Ok(value),
                Err(QuickReturn::Error(error)) => Err(error),
            }
        }
        Object::Builtin(builtin) => {
            tracing::trace!(builtin = builtin.name, "calling builtin");
            (builtin.func)(arguments)
        }
        other => Err(EvaluationError::CallNonFunction(other.object_type())),
    }
}

fn eval_prefix_operation(
    kind: ast::PrefixOperationKind,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (kind, &*right) {
        (ast::PrefixOperationKind::Bang, object) => Ok(Object::boolean(!object.is_truthy())),
        (ast::PrefixOperationKind::Minus, Object::Integer(value)) => {
            Ok(Object::integer(value.wrapping_neg()))
        }
        (ast::PrefixOperationKind::Minus, object) => Err(EvaluationError::UnknownPrefixOperator {
            right: object.object_type(),
            operation: kind,
        }),
    }
}

fn eval_infix_operation(
    kind: ast::InfixOperationKind,
    left: Gc<Object>,
    right: Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    use ast::InfixOperationKind;

    if left.object_type() != right.object_type() {
        return Err(EvaluationError::TypeMismatch {
            left: left.object_type(),
            right: right.object_type(),
            operation: kind,
        });
    }

    match (kind, &*left, &*right) {
        (_, Object::Integer(left), Object::Integer(right)) => {
            eval_integer_infix_operation(kind, *left, *right)
        }
        (InfixOperationKind::Plus, Object::String(left), Object::String(right)) => {
            Ok(Object::string(format!("{}{}", left, right)))
        }
        (_, Object::String(_), Object::String(_)) => Err(unknown_infix_operator(kind, &left, &right)),
        // Everything else compares by identity; booleans and null are shared
        // instances so this is value equality for them.
        (InfixOperationKind::Equal, _, _) => Ok(Object::boolean(Gc::ptr_eq(&left, &right))),
        (InfixOperationKind::NotEqual, _, _) => Ok(Object::boolean(!Gc::ptr_eq(&left, &right))),
        _ => Err(unknown_infix_operator(kind, &left, &right)),
    }
}

fn unknown_infix_operator(
    kind: ast::InfixOperationKind,
    left: &Object,
    right: &Object,
) -> EvaluationError {
    EvaluationError::UnknownInfixOperator {
        left: left.object_type(),
        right: right.object_type(),
        operation: kind,
    }
}

fn eval_integer_infix_operation(
    kind: ast::InfixOperationKind,
    left: i64,
    right: i64,
) -> Result<Gc<Object>, EvaluationError> {
    use ast::InfixOperationKind::*;
    match kind {
        Plus => Ok(Object::integer(left.wrapping_add(right))),
        Minus => Ok(Object::integer(left.wrapping_sub(right))),
        Multiply => Ok(Object::integer(left.wrapping_mul(right))),
        Divide if right == 0 => Err(EvaluationError::DivisionByZero),
        Divide => Ok(Object::integer(left.wrapping_div(right))),
        LessThan => Ok(Object::boolean(left < right)),
        GreaterThan => Ok(Object::boolean(left > right)),
        Equal => Ok(Object::boolean(left == right)),
        NotEqual => Ok(Object::boolean(left != right)),
    }
}

fn eval_index_expression(
    left: &Gc<Object>,
    index: &Gc<Object>,
) -> Result<Gc<Object>, EvaluationError> {
    match (&**left, &**index) {
        (Object::Array(array), Object::Integer(index)) => Ok(usize::try_from(*index)
            .ok()
            .and_then(|index| array.get(index))
            .cloned()
            .unwrap_or_else(Object::null)),
        (Object::Array(_), index) => Err(EvaluationError::IndexingWithNonInteger(
            index.object_type(),
        )),
        (Object::Hash(hash), index) => {
            let hashed_index = index
                .hash_key()
                .ok_or(EvaluationError::InvalidHashKey(index.object_type()))?;
            Ok(hash
                .get(&hashed_index)
                .map(|pair| pair.value.clone())
                .unwrap_or_else(Object::null))
        }
        (left, _) => Err(EvaluationError::IndexNotSupported(left.object_type())),
    }
}
