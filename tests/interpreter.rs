use std::rc::Rc;

use rox::class::{Class, Instance};
use rox::environment::Environment;
use rox::error::LoxError;
use rox::interpreter::Interpreter;
use rox::token::{Token, TokenType};
use rox::value::Value;

/// Runs `source` in a fresh session, returning everything printed and the outcome.
fn run(source: &str) -> (String, Result<(), LoxError>) {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let result = interpreter.run_source(source);
    let output = String::from_utf8(interpreter.into_output()).unwrap();

    (output, result)
}

fn assert_prints(source: &str, expected: &[&str]) {
    let (output, result) = run(source);

    if let Err(e) = result {
        panic!("program failed:\n{}\noutput so far:\n{}", e, output);
    }

    assert_eq!(output.lines().collect::<Vec<_>>(), expected);
}

fn assert_runtime_error(source: &str, message: &str, line: usize) -> String {
    let (output, result) = run(source);

    match result {
        Err(LoxError::Runtime {
            message: actual,
            line: actual_line,
        }) => {
            assert_eq!(actual, message);
            assert_eq!(actual_line, line);
        }
        other => panic!("expected runtime error '{}', got {:?}", message, other),
    }

    output
}

#[test]
fn stringification() {
    assert_prints(
        "print 1; print 1.5; print -0.25; print 10 / 4; print true; print nil; print \"s\";",
        &["1", "1.5", "-0.25", "2.5", "true", "nil", "s"],
    );
}

#[test]
fn extreme_magnitudes_print_in_exponent_form() {
    assert_prints(
        "print 100000000000000000000; print 0.0000001; print 10000000000000000; \
         print -0.00001234; print 1000000000000000; print 0.0001;",
        &["1e+20", "1e-07", "1e+16", "-1.234e-05", "1000000000000000", "0.0001"],
    );
}

#[test]
fn negating_a_boolean_yields_a_number() {
    assert_prints("print -true; print -false == 0; print -true + 3;", &["-1", "true", "2"]);
}

#[test]
fn arithmetic_and_grouping() {
    assert_prints(
        "print 2 + 3 * 4; print (2 + 3) * 4; print 10 - 4 - 3; print -(-2);",
        &["14", "20", "3", "2"],
    );
}

#[test]
fn division_by_zero_follows_ieee() {
    assert_prints(
        "print 0 / 0; print 1 / 0; print -1 / 0; print 0 / 0 == 0 / 0;",
        &["nan", "inf", "-inf", "false"],
    );
}

#[test]
fn string_concatenation_stringifies_the_other_side() {
    assert_prints(
        "print \"a\" + \"b\"; print \"n=\" + 1; print 2.5 + \"!\"; print \"\" + nil + true;",
        &["ab", "n=1", "2.5!", "niltrue"],
    );
}

#[test]
fn equality_rules() {
    assert_prints(
        "print nil == nil; print 0 == false; print \"1\" == 1; print 1 == 1.0; \
         print nil == false; print \"a\" == \"a\"; print true != false;",
        &["true", "false", "false", "true", "false", "true", "true"],
    );
}

#[test]
fn identity_equality_for_objects() {
    assert_prints(
        "class A {} var a = A(); var b = a; print a == b; print a == A(); print A == A;\
         fun f() {} print f == f;",
        &["true", "false", "true", "true"],
    );
}

#[test]
fn truthiness_and_logical_operators_return_operands() {
    assert_prints(
        "print !nil; print !0; print !\"\"; print nil or \"x\"; print 0 or 1; \
         print nil and 1; print 1 and 2; print false or false;",
        &["true", "false", "false", "x", "0", "nil", "2", "false"],
    );
}

#[test]
fn logical_operators_short_circuit() {
    assert_prints(
        "var hits = 0; fun hit() { hits = hits + 1; return true; } \
         true or hit(); false and hit(); false or hit(); print hits;",
        &["1"],
    );
}

#[test]
fn type_errors() {
    assert_runtime_error("print -\"x\";", "Operand must be a number.", 1);
    assert_runtime_error("print -nil;", "Operand must be a number.", 1);
    assert_runtime_error("print 1 < \"2\";", "Operands must be numbers.", 1);
    assert_runtime_error("print\n true * 2;", "Operands must be numbers.", 2);
    assert_runtime_error(
        "print 1 + nil;",
        "Operands must be two numbers or two strings.",
        1,
    );
}

#[test]
fn block_scoping_shadows() {
    assert_prints(
        "var x = 1; { var x = 2; print x; } print x;",
        &["2", "1"],
    );
}

#[test]
fn blocks_can_assign_outer_variables() {
    assert_prints("var x = 1; { x = 5; var y = x; } print x;", &["5"]);
}

#[test]
fn undefined_variable_and_assignment_target() {
    assert_runtime_error("print ghost;", "Undefined variable 'ghost'.", 1);
    assert_runtime_error("\n\nghost = 1;", "Undefined variable 'ghost'.", 3);

    // A failed assignment inside a block must not create a global either.
    let mut interpreter = Interpreter::with_output(Vec::new());
    assert!(interpreter.run_source("{ ghost = 1; }").is_err());
    assert!(!interpreter.globals().borrow().contains_local("ghost"));
}

#[test]
fn if_else_and_while() {
    assert_prints(
        "if (1 > 2) print \"a\"; else print \"b\"; if (nil) print \"c\"; \
         var i = 0; while (i < 3) { print i; i = i + 1; }",
        &["b", "0", "1", "2"],
    );
}

#[test]
fn for_loops() {
    assert_prints(
        "for (var i = 0; i < 3; i = i + 1) print i;",
        &["0", "1", "2"],
    );
    assert_prints(
        "var n = 0; for (; n < 2;) n = n + 1; print n;",
        &["2"],
    );
}

#[test]
fn for_loop_variable_does_not_leak() {
    let (_, result) = run("for (var i = 0; i < 1; i = i + 1) {} print i;");

    assert!(matches!(result, Err(LoxError::Runtime { .. })));
}

#[test]
fn functions_bind_parameters_and_return_values() {
    assert_prints(
        "fun add(a, b) { return a + b; } print add(1, 2); \
         fun nothing() {} print nothing(); \
         fun early(n) { while (true) { if (n > 2) return n; n = n + 1; } } print early(0);",
        &["3", "nil", "3"],
    );
}

#[test]
fn recursion() {
    assert_prints(
        "fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(15);",
        &["610"],
    );
}

#[test]
fn closures_share_captured_state() {
    assert_prints(
        "fun make() { var n = 0; fun inc() { n = n + 1; print n; } return inc; } \
         var counter = make(); counter(); counter();",
        &["1", "2"],
    );
}

#[test]
fn closures_see_later_mutations_of_their_scope() {
    assert_prints(
        "var show; { var a = \"before\"; fun f() { print a; } show = f; a = \"after\"; } show();",
        &["after"],
    );
}

#[test]
fn functions_do_not_see_the_callers_locals() {
    assert_runtime_error(
        "fun peek() { print secret; } { var secret = 1; peek(); }",
        "Undefined variable 'secret'.",
        1,
    );
}

#[test]
fn call_errors() {
    assert_runtime_error("\"text\"();", "Can only call functions and classes.", 1);
    assert_runtime_error(
        "fun f(a) {}\nf(1, 2);",
        "Expected 1 arguments but got 2.",
        2,
    );
    assert_runtime_error("class A {} A(1);", "Expected 0 arguments but got 1.", 1);
}

#[test]
fn arguments_are_evaluated_before_the_call_fails() {
    let output = assert_runtime_error(
        "fun log(x) { print x; return x; } nil(log(1), log(2));",
        "Can only call functions and classes.",
        1,
    );

    assert_eq!(output, "1\n2\n");
}

#[test]
fn output_before_a_runtime_error_is_kept() {
    let output = assert_runtime_error("print 1; print 2; print -nil; print 3;", "Operand must be a number.", 1);

    assert_eq!(output, "1\n2\n");
}

#[test]
fn static_errors_prevent_execution() {
    let (output, result) = run("print 1; print ;");

    assert_eq!(output, "");
    assert_eq!(
        result.unwrap_err().to_string(),
        "[line 1] Error at ';': Expect expression."
    );
}

#[test]
fn classes_instances_and_methods() {
    assert_prints(
        "class Greeter { hello(name) { print \"hi \" + name; return 7; } } \
         var g = Greeter(); print Greeter; print g; print g.hello; print g.hello(\"bob\");",
        &[
            "<class Greeter>",
            "<Greeter instance>",
            "<bound method hello>",
            "hi bob",
            "7",
        ],
    );
}

#[test]
fn methods_close_over_the_declaring_scope() {
    assert_prints(
        "var tag = \"outer\"; { var tag = \"inner\"; class C { show() { print tag; } } C().show(); }",
        &["inner"],
    );
}

#[test]
fn property_errors() {
    assert_runtime_error("var x = 1; print x.y;", "Only instances have properties.", 1);
    assert_runtime_error(
        "class A {}\nprint A().missing;",
        "Undefined property 'missing'.",
        2,
    );
}

#[test]
fn functions_print_their_name() {
    assert_prints("fun f() {} print f;", &["<fn f>"]);
}

#[test]
fn fields_shadow_methods() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter
        .run_source("class Pair { first() { return 1; } } var p = Pair();")
        .unwrap();

    let name = |text: &str| Token::simple(TokenType::IDENTIFIER, text, 1);

    let instance: Rc<Instance> = match interpreter.globals().borrow().lookup(&name("p")).unwrap() {
        Value::Instance(instance) => instance,
        other => panic!("expected an instance, got {:?}", other),
    };

    match Instance::get(&instance, &name("first")).unwrap() {
        Value::BoundMethod(bound) => {
            assert!(Rc::ptr_eq(bound.receiver(), &instance));
            assert_eq!(bound.name(), "first");
        }
        other => panic!("expected a bound method, got {:?}", other),
    }

    instance.set_field("first", Value::Number(42.0));

    assert_eq!(instance.field("first"), Some(Value::Number(42.0)));
    assert_eq!(
        Instance::get(&instance, &name("first")).unwrap(),
        Value::Number(42.0)
    );

    interpreter.run_source("print p.first;").unwrap();
    assert_eq!(String::from_utf8_lossy(interpreter.output()), "42\n");
}

#[test]
fn instances_start_without_fields() {
    let class = Rc::new(Class::new("Empty".into(), Default::default()));
    let instance = Instance::new(Rc::clone(&class));

    assert_eq!(instance.field("anything"), None);
    assert_eq!(instance.class().name(), "Empty");
}

#[test]
fn sessions_keep_globals_between_runs() {
    let mut interpreter = Interpreter::with_output(Vec::new());

    interpreter.run_source("var a = 1;").unwrap();
    assert!(interpreter.run_source("print nope;").is_err());
    interpreter.run_source("a = a + 1; print a;").unwrap();

    assert_eq!(String::from_utf8_lossy(interpreter.output()), "2\n");
}

#[test]
fn run_in_a_caller_supplied_scope() {
    let mut interpreter = Interpreter::with_output(Vec::new());
    let env = Environment::global();
    env.borrow_mut().declare("seed", Value::Number(4.0));

    interpreter.run("var doubled = seed * 2;", &env).unwrap();

    let doubled = Token::simple(TokenType::IDENTIFIER, "doubled", 1);
    assert_eq!(env.borrow().lookup(&doubled).unwrap(), Value::Number(8.0));
    assert!(!interpreter.globals().borrow().contains_local("doubled"));
}
