use gc::Gc;

use crate::object::{Builtin, EvaluationError, Object};

const BUILTINS: &[Builtin] = &[
    Builtin {
        name: "len",
        func: builtin_len,
    },
    Builtin {
        name: "first",
        func: builtin_first,
    },
    Builtin {
        name: "last",
        func: builtin_last,
    },
    Builtin {
        name: "rest",
        func: builtin_rest,
    },
    Builtin {
        name: "push",
        func: builtin_push,
    },
    Builtin {
        name: "puts",
        func: builtin_puts,
    },
];

thread_local! {
    static BUILTIN_OBJECTS: Vec<Gc<Object>> =
        BUILTINS.iter().copied().map(Object::builtin).collect();
}

/// Resolves `name` against the fixed built-in table. Every lookup of a name
/// yields the same shared object.
pub fn lookup(name: &str) -> Option<Gc<Object>> {
    let index = BUILTINS.iter().position(|builtin| builtin.name == name)?;
    Some(BUILTIN_OBJECTS.with(|objects| objects[index].clone()))
}

fn check_argument_count(
    function: &'static str,
    expected: usize,
    args: &[Gc<Object>],
) -> Result<(), EvaluationError> {
    if args.len() != expected {
        return Err(EvaluationError::BuiltinArgumentCount {
            function,
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

fn unsupported(function: &'static str, argument: &Object) -> EvaluationError {
    EvaluationError::BuiltinArgumentType {
        function,
        got: argument.object_type(),
    }
}

fn builtin_len(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("len", 1, &args)?;
    match &*args[0] {
        Object::String(s) => Ok(Object::integer(s.len() as i64)),
        Object::Array(arr) => Ok(Object::integer(arr.len() as i64)),
        other => Err(unsupported("len", other)),
    }
}

fn builtin_first(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("first", 1, &args)?;
    match &*args[0] {
        Object::Array(arr) => Ok(arr.first().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported("first", other)),
    }
}

fn builtin_last(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("last", 1, &args)?;
    match &*args[0] {
        Object::Array(arr) => Ok(arr.last().cloned().unwrap_or_else(Object::null)),
        other => Err(unsupported("last", other)),
    }
}

fn builtin_rest(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("rest", 1, &args)?;
    match &*args[0] {
        Object::Array(arr) if arr.is_empty() => Ok(Object::null()),
        Object::Array(arr) => Ok(Object::array(arr[1..].to_vec())),
        other => Err(unsupported("rest", other)),
    }
}

fn builtin_push(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    check_argument_count("push", 2, &args)?;
    match &*args[0] {
        Object::Array(arr) => {
            let mut new_arr = arr.clone();
            new_arr.push(args[1].clone());
            Ok(Object::array(new_arr))
        }
        other => Err(unsupported("push", other)),
    }
}

fn builtin_puts(args: Vec<Gc<Object>>) -> Result<Gc<Object>, EvaluationError> {
    tracing::trace!(arguments = args.len(), "puts");
    for arg in &args {
        println!("{}", arg.inspect());
    }
    Ok(Object::null())
}
