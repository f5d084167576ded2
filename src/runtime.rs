use crate::core::NativeRegistry;
use crate::env::Env;
use crate::error::{Error, ErrorWithSpan};
use crate::eval::Evaluator;
use crate::interner;
use crate::reader;
use crate::value::{self, Builtin, Value};

/// The interpreter instance: the evaluator plus the single persistent global
/// frame, seeded once with the boolean symbols, the special forms and the
/// primitive library. The global frame is explicitly cleared when the
/// interpreter is dropped, which breaks the reference cycle between the frame
/// and the closures `define` stores in it.
#[derive(Debug)]
pub struct Interpreter {
    evaluator: Evaluator,
    global: Env,
}

impl Interpreter {
    pub fn new() -> Self {
        let evaluator = Evaluator::new();
        let global = Env::new();

        // The boolean symbols resolve to themselves through lookup
        global.insert(interner::intern_sym("#t"), value::true_value());
        global.insert(interner::intern_sym("#f"), value::false_value());

        for sym in evaluator.special_forms.all() {
            global.insert(sym, Value::SpecialForm(sym));
        }

        for (sym, f) in NativeRegistry::new().iter() {
            global.insert(sym, Value::Builtin(Builtin { name: sym, f }));
        }

        Self { evaluator, global }
    }

    /// Top-level evaluation against the global environment.
    ///
    /// Beyond ordinary evaluation this entry point rejects an absent input
    /// and a raw numeric list literal: a list object produced as data may not
    /// be re-submitted as code from the outside (`eval` is the explicit
    /// opt-in).
    pub fn evaluate(&self, form: &Value) -> Result<Value, Error> {
        if matches!(form, Value::Nil) {
            return Err(Error::RuntimeError("no expression to evaluate".to_string()));
        }
        if is_numeric_list(form) {
            return Err(Error::RuntimeError(
                "lists are not self-evaluating".to_string(),
            ));
        }
        self.evaluator.eval(form, &self.global)
    }

    /// Reads one expression and evaluates it: the REPL and file driver.
    pub fn rep(&self, input: &str) -> Result<Value, ErrorWithSpan> {
        let form = reader::read(input)?;
        self.evaluate(&form).map_err(|error| ErrorWithSpan::bare(error, input))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        self.global.clear();
    }
}

/// The shape the top-level data guard rejects: a proper list whose elements
/// are all integers. A call form always has a symbol or pair in operator
/// position, so this only ever matches list literals.
fn is_numeric_list(form: &Value) -> bool {
    let mut current = form.clone();
    loop {
        match current {
            Value::Nil => return matches!(form, Value::Pair(_)),
            Value::Pair(pair) => {
                let (first, second) = {
                    let p = pair.borrow();
                    (p.first.clone(), p.second.clone())
                };
                if !matches!(first, Value::Int(_)) {
                    return false;
                }
                current = second;
            }
            _ => return false,
        }
    }
}
