//! End-to-end evaluation tests: arithmetic, special forms, closures and
//! scoping, pair mutation and the primitive library.

use sprout::runtime::Interpreter;
use sprout::value::Value;

fn eval(interpreter: &Interpreter, form: &str) -> Value {
    interpreter
        .rep(form)
        .unwrap_or_else(|err| panic!("failed to eval `{}`: {}", form, err.format_error()))
}

fn assert_int(value: &Value, expected: i64) {
    match value {
        Value::Int(v) => assert_eq!(*v, expected),
        other => panic!("expected Int({}), got {:?}", expected, other),
    }
}

fn assert_display(value: &Value, expected: &str) {
    assert_eq!(value.to_string(), expected);
}

//===----------------------------------------------------------------------===//
// Arithmetic
//===----------------------------------------------------------------------===//

#[test]
fn test_arithmetic_identities() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(+)"), 0);
    assert_int(&eval(&interpreter, "(*)"), 1);
}

#[test]
fn test_basic_arithmetic() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(+ 1 2 3)"), 6);
    assert_int(&eval(&interpreter, "(- 10 1 2)"), 7);
    assert_int(&eval(&interpreter, "(* 2 3 4)"), 24);
    assert_int(&eval(&interpreter, "(/ 20 2 5)"), 2);
    assert_int(&eval(&interpreter, "(+ 1 (* 2 3))"), 7);
}

#[test]
fn test_min_max_abs() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(min 3 1 2)"), 1);
    assert_int(&eval(&interpreter, "(max 3 1 2)"), 3);
    assert_int(&eval(&interpreter, "(abs -7)"), 7);
    assert_int(&eval(&interpreter, "(abs 7)"), 7);
}

#[test]
fn test_comparisons_chain() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(< 1 2 3)"), "#t");
    assert_display(&eval(&interpreter, "(< 1 3 2)"), "#f");
    assert_display(&eval(&interpreter, "(>= 3 3 2)"), "#t");
    assert_display(&eval(&interpreter, "(= 2 2 2)"), "#t");
    assert_display(&eval(&interpreter, "(=)"), "#t");
}

//===----------------------------------------------------------------------===//
// Special Forms
//===----------------------------------------------------------------------===//

#[test]
fn test_if_branches() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(if #t 1 2)"), 1);
    assert_int(&eval(&interpreter, "(if #f 1 2)"), 2);
    // No else branch and a false condition yields the empty value
    assert_display(&eval(&interpreter, "(if #f 1)"), "()");
}

#[test]
fn test_only_false_is_falsy() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(if 0 1 2)"), 1);
    assert_int(&eval(&interpreter, "(if '() 1 2)"), 1);
    assert_int(&eval(&interpreter, "(if (quote x) 1 2)"), 1);
}

#[test]
fn test_quote_returns_argument_unevaluated() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(quote (+ 1 2))"), "(+ 1 2)");
    assert_display(&eval(&interpreter, "'x"), "x");
    assert_display(&eval(&interpreter, "'(1 2)"), "(1 2)");
    assert_display(&eval(&interpreter, "''x"), "(quote x)");
}

#[test]
fn test_and_or() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(and)"), "#t");
    assert_display(&eval(&interpreter, "(or)"), "#f");
    assert_int(&eval(&interpreter, "(and 1 2 3)"), 3);
    assert_display(&eval(&interpreter, "(and 1 #f 3)"), "#f");
    assert_int(&eval(&interpreter, "(or #f 7 9)"), 7);
    assert_display(&eval(&interpreter, "(or #f #f)"), "#f");
}

#[test]
fn test_and_or_short_circuit() {
    let interpreter = Interpreter::new();
    // The unbound symbol after the short-circuit point is never evaluated
    assert_display(&eval(&interpreter, "(and #f nonexistent)"), "#f");
    assert_int(&eval(&interpreter, "(or 5 nonexistent)"), 5);
}

#[test]
fn test_define_and_set() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(define x 5)"), 5);
    assert_int(&eval(&interpreter, "x"), 5);
    assert_int(&eval(&interpreter, "(set! x 6)"), 6);
    assert_int(&eval(&interpreter, "x"), 6);
    // define rebinds
    assert_int(&eval(&interpreter, "(define x 42)"), 42);
    assert_int(&eval(&interpreter, "x"), 42);
}

#[test]
fn test_define_procedure_sugar() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define (twice x) (* 2 x))");
    assert_int(&eval(&interpreter, "(twice 21)"), 42);
}

#[test]
fn test_eval_special_form() {
    let interpreter = Interpreter::new();
    assert_int(&eval(&interpreter, "(eval '(+ 2 3))"), 5);
    eval(&interpreter, "(define x '(+ 2 3))");
    assert_int(&eval(&interpreter, "(eval x)"), 5);
    // A non-list argument evaluates to itself on the second pass
    assert_int(&eval(&interpreter, "(eval (+ 2 4))"), 6);
}

//===----------------------------------------------------------------------===//
// Closures & Scoping
//===----------------------------------------------------------------------===//

#[test]
fn test_lexical_capture() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define f (lambda (x) (lambda (y) (+ x y))))");
    assert_int(&eval(&interpreter, "((f 3) 4)"), 7);
}

#[test]
fn test_each_call_gets_a_fresh_frame() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define (make-adder n) (lambda (x) (+ x n)))");
    eval(&interpreter, "(define add1 (make-adder 1))");
    eval(&interpreter, "(define add10 (make-adder 10))");
    assert_int(&eval(&interpreter, "(add1 5)"), 6);
    assert_int(&eval(&interpreter, "(add10 5)"), 15);
    // The first closure's captured binding is untouched
    assert_int(&eval(&interpreter, "(add1 5)"), 6);
}

#[test]
fn test_recursive_closure() {
    let interpreter = Interpreter::new();
    eval(
        &interpreter,
        "(define (fact n) (if (= n 0) 1 (* n (fact (- n 1)))))",
    );
    assert_int(&eval(&interpreter, "(fact 5)"), 120);
    assert_int(&eval(&interpreter, "(fact 0)"), 1);
}

#[test]
fn test_set_mutates_captured_frame() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define counter 0)");
    eval(&interpreter, "(define (bump) (set! counter (+ counter 1)))");
    eval(&interpreter, "(bump)");
    eval(&interpreter, "(bump)");
    assert_int(&eval(&interpreter, "counter"), 2);
}

#[test]
fn test_multi_expression_body_returns_last() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define g (lambda () (define t 1) (+ t 2)))");
    assert_int(&eval(&interpreter, "(g)"), 3);
}

#[test]
fn test_procedures_are_first_class() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define my-add +)");
    assert_int(&eval(&interpreter, "(my-add 2 3)"), 5);
    eval(&interpreter, "(define (apply-twice f x) (f (f x)))");
    eval(&interpreter, "(define (inc n) (+ n 1))");
    assert_int(&eval(&interpreter, "(apply-twice inc 5)"), 7);
}

#[test]
fn test_degenerate_forms() {
    let interpreter = Interpreter::new();
    // A single bare sub-expression yields its value
    assert_int(&eval(&interpreter, "((+ 1 2))"), 3);
    // An operator that evaluates to a symbol gets one more evaluation
    eval(&interpreter, "(define op '+)");
    assert_int(&eval(&interpreter, "(op 1 2)"), 3);
}

//===----------------------------------------------------------------------===//
// Pairs, Lists & Mutation
//===----------------------------------------------------------------------===//

#[test]
fn test_cons_car_cdr() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(cons 1 2)"), "(1 . 2)");
    assert_int(&eval(&interpreter, "(car (cons 1 2))"), 1);
    assert_int(&eval(&interpreter, "(cdr (cons 1 2))"), 2);
    assert_display(&eval(&interpreter, "(cons 1 '(2 3))"), "(1 2 3)");
}

#[test]
fn test_set_car_aliasing() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define p (cons 1 2))");
    assert_int(&eval(&interpreter, "(set-car! p 9)"), 9);
    assert_int(&eval(&interpreter, "(car p)"), 9);
}

#[test]
fn test_mutation_is_visible_through_shared_structure() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define a '(1 2))");
    eval(&interpreter, "(define b (cons 0 a))");
    eval(&interpreter, "(set-car! (cdr b) 99)");
    // b's tail IS a, not a copy
    assert_int(&eval(&interpreter, "(car a)"), 99);
}

#[test]
fn test_set_cdr() {
    let interpreter = Interpreter::new();
    eval(&interpreter, "(define p (cons 1 2))");
    eval(&interpreter, "(set-cdr! p '(5 6))");
    assert_display(&eval(&interpreter, "p"), "(1 5 6)");
}

#[test]
fn test_list_construction_and_access() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(list 1 2 3)"), "(1 2 3)");
    assert_display(&eval(&interpreter, "(list)"), "()");
    assert_int(&eval(&interpreter, "(list-ref '(10 20 30) 1)"), 20);
    assert_display(&eval(&interpreter, "(list-tail '(10 20 30) 1)"), "(20 30)");
    assert_display(&eval(&interpreter, "(list-tail '(10 20 30) 3)"), "()");
}

//===----------------------------------------------------------------------===//
// Predicates
//===----------------------------------------------------------------------===//

#[test]
fn test_type_predicates() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(null? '())"), "#t");
    assert_display(&eval(&interpreter, "(null? '(1))"), "#f");
    assert_display(&eval(&interpreter, "(pair? (cons 1 2))"), "#t");
    assert_display(&eval(&interpreter, "(pair? 1)"), "#f");
    assert_display(&eval(&interpreter, "(number? 3)"), "#t");
    assert_display(&eval(&interpreter, "(number? 'x)"), "#f");
    assert_display(&eval(&interpreter, "(boolean? #t)"), "#t");
    assert_display(&eval(&interpreter, "(boolean? 'x)"), "#f");
    assert_display(&eval(&interpreter, "(symbol? 'x)"), "#t");
    assert_display(&eval(&interpreter, "(symbol? 3)"), "#f");
}

#[test]
fn test_list_predicate_is_structural() {
    let interpreter = Interpreter::new();
    // Element types do not matter, only proper termination
    assert_display(&eval(&interpreter, "(list? '(a b c))"), "#t");
    assert_display(&eval(&interpreter, "(list? '(1 2 3))"), "#t");
    assert_display(&eval(&interpreter, "(list? '())"), "#t");
    assert_display(&eval(&interpreter, "(list? '(1 . 2))"), "#f");
    assert_display(&eval(&interpreter, "(list? 5)"), "#f");
}

#[test]
fn test_not() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(not #f)"), "#t");
    assert_display(&eval(&interpreter, "(not #t)"), "#f");
    assert_display(&eval(&interpreter, "(not '())"), "#f");
    assert_display(&eval(&interpreter, "(not 0)"), "#f");
}

#[test]
fn test_eq_and_equal() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "(eq? 1 1)"), "#t");
    assert_display(&eval(&interpreter, "(eq? 'a 'a)"), "#t");
    // Distinct pairs are not eq?, but they are equal?
    assert_display(&eval(&interpreter, "(eq? '(1 2) '(1 2))"), "#f");
    assert_display(&eval(&interpreter, "(equal? '(1 (2 3)) '(1 (2 3)))"), "#t");
    assert_display(&eval(&interpreter, "(equal? '(1 2) '(1 3))"), "#f");
    eval(&interpreter, "(define p '(a b))");
    assert_display(&eval(&interpreter, "(eq? p p)"), "#t");
}

//===----------------------------------------------------------------------===//
// Printing
//===----------------------------------------------------------------------===//

#[test]
fn test_callables_print_as_placeholders() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "car"), "#<function>");
    assert_display(&eval(&interpreter, "(lambda (x) x)"), "#<function>");
    assert_display(&eval(&interpreter, "if"), "#<syntax>");
}

#[test]
fn test_booleans_print_as_themselves() {
    let interpreter = Interpreter::new();
    assert_display(&eval(&interpreter, "#t"), "#t");
    assert_display(&eval(&interpreter, "#f"), "#f");
}
