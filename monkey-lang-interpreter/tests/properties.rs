use gc::Gc;
use monkey_lang_core::parser::parse;
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator::eval_program;
use monkey_lang_interpreter::object::{EvaluationError, Object};
use proptest::prelude::*;

fn eval(input: &str) -> Result<Gc<Object>, EvaluationError> {
    let program = parse(input).expect("generated programs parse");
    eval_program(&program, &mut Environment::new())
}

/// Printed value or error message. Function values compare by identity, so
/// outcomes are compared through their rendering.
fn outcome(input: &str) -> Result<String, String> {
    eval(input)
        .map(|value| value.inspect())
        .map_err(|err| err.to_string())
}

fn hash_key() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i32>().prop_map(|value| value.to_string()),
        any::<bool>().prop_map(|value| value.to_string()),
        "[a-z ]{0,12}".prop_map(|value| format!("\"{}\"", value)),
    ]
}

fn name() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["a", "b", "total", "x_1"])
}

/// Function literals only appear called in place, so no function value can be
/// bound to a name and no generated program can recurse.
fn source_expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..1000).prop_map(|value| value.to_string()),
        any::<bool>().prop_map(|value| value.to_string()),
        "[a-z ]{0,6}".prop_map(|value| format!("\"{}\"", value)),
        name().prop_map(str::to_owned),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        let operator = prop_oneof![
            Just("+"),
            Just("-"),
            Just("*"),
            Just("/"),
            Just("<"),
            Just(">"),
            Just("=="),
            Just("!="),
        ];
        prop_oneof![
            (inner.clone(), operator, inner.clone())
                .prop_map(|(left, operator, right)| format!("{} {} {}", left, operator, right)),
            inner.clone().prop_map(|operand| format!("-{}", operand)),
            inner.clone().prop_map(|operand| format!("!({})", operand)),
            (inner.clone(), inner.clone(), inner.clone()).prop_map(
                |(condition, consequence, alternative)| format!(
                    "if ({}) {{ {} }} else {{ {} }}",
                    condition, consequence, alternative
                )
            ),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| format!("[{}, {}][0]", left, right)),
            (inner.clone(), inner.clone())
                .prop_map(|(left, right)| format!("len([{}, {}])", left, right)),
            (name(), inner.clone(), inner.clone(), inner.clone()).prop_map(
                |(local, body, first, second)| format!(
                    "fn(a, b) {{ let {} = a; return {}; }}({}, {})",
                    local, body, first, second
                )
            ),
        ]
    })
}

fn source_statement() -> impl Strategy<Value = String> {
    prop_oneof![
        (name(), source_expression())
            .prop_map(|(name, value)| format!("let {} = {};", name, value)),
        source_expression().prop_map(|expression| format!("{};", expression)),
        source_expression().prop_map(|expression| format!("return {};", expression)),
    ]
}

fn source_program() -> impl Strategy<Value = String> {
    prop::collection::vec(source_statement(), 1..5).prop_map(|statements| statements.join("\n"))
}

proptest! {
    #[test]
    fn integer_literals_evaluate_to_themselves(value in 0..=i64::MAX) {
        prop_assert_eq!(eval(&value.to_string()), Ok(Object::integer(value)));
        prop_assert_eq!(eval(&format!("-{}", value)), Ok(Object::integer(-value)));
    }

    #[test]
    fn hash_lookup_returns_stored_value(key in hash_key(), value in any::<i32>()) {
        let program = format!("let h = {{{}: {}}}; h[{}]", key, value, key);
        prop_assert_eq!(eval(&program), Ok(Object::integer(i64::from(value))));
    }

    #[test]
    fn rendered_program_parses_and_evaluates_like_its_source(source in source_program()) {
        let program = parse(&source).expect("generated programs parse");
        let rendered = program.to_string();
        let reparsed = parse(&rendered).expect("rendered programs parse");

        prop_assert_eq!(reparsed.to_string(), rendered.clone());
        prop_assert_eq!(outcome(&rendered), outcome(&source));
    }
}
