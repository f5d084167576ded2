use std::fmt::Write;

use crate::interner;
use crate::value::Value;

/// Pretty-prints an AST (Value) with indentation and proper formatting.
/// This function displays the tree in a more readable, multi-line format.
pub fn pretty_print_ast(value: &Value) -> String {
    pretty_print_ast_with_indent(value, 0)
}

fn pretty_print_ast_with_indent(value: &Value, indent: usize) -> String {
    let indent_str = "  ".repeat(indent);
    let mut result = String::new();

    match value {
        Value::Nil => write!(result, "Nil:()").unwrap(),
        Value::Int(i) => write!(result, "Int:{}", i).unwrap(),
        Value::Symbol(sym) => {
            write!(result, "Symbol:{}", interner::sym_to_str(*sym)).unwrap()
        }
        Value::Pair(_) => {
            let (elements, tail) = split_chain(value);
            write!(result, "Pair:(").unwrap();
            for element in &elements {
                write!(
                    result,
                    "\n{}  {}",
                    indent_str,
                    pretty_print_ast_with_indent(element, indent + 1)
                )
                .unwrap();
            }
            if let Some(tail) = tail {
                write!(
                    result,
                    "\n{}  . {}",
                    indent_str,
                    pretty_print_ast_with_indent(&tail, indent + 1)
                )
                .unwrap();
            }
            write!(result, "\n{})", indent_str).unwrap();
        }
        Value::Builtin(b) => {
            write!(result, "Builtin:{}", interner::sym_to_str(b.name)).unwrap()
        }
        Value::Closure(c) => {
            write!(result, "Closure:arity {}", c.params.len()).unwrap()
        }
        Value::SpecialForm(sym) => {
            write!(result, "SpecialForm:{}", interner::sym_to_str(*sym)).unwrap()
        }
    }

    result
}

/// Splits a cons chain into its elements and, for an improper list, the
/// dotted tail.
fn split_chain(value: &Value) -> (Vec<Value>, Option<Value>) {
    let mut elements = Vec::new();
    let mut current = value.clone();
    loop {
        match current {
            Value::Nil => return (elements, None),
            Value::Pair(pair) => {
                let (first, second) = {
                    let p = pair.borrow();
                    (p.first.clone(), p.second.clone())
                };
                elements.push(first);
                current = second;
            }
            tail => return (elements, Some(tail)),
        }
    }
}
