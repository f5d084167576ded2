use std::rc::Rc;

use crate::core::SpecialFormRegistry;
use crate::env::Env;
use crate::error::{Error, SyntaxError};
use crate::interner::{self, SymId};
use crate::value::{self, Closure, Value};

//===----------------------------------------------------------------------===//
// Evaluator
//
// Purely synchronous recursive evaluation: every eval/apply call runs to
// completion on the caller's stack. Recursion depth is bounded only by the
// host stack; deeply recursive user programs are expected to exhaust it.
//===----------------------------------------------------------------------===//

#[derive(Debug, Clone)]
pub struct Evaluator {
    pub special_forms: SpecialFormRegistry,
}

impl Evaluator {
    pub fn new() -> Self {
        Self { special_forms: SpecialFormRegistry::new() }
    }

    /// Evaluates one expression in the given environment.
    ///
    /// Numbers self-evaluate, symbols resolve through the environment chain,
    /// pairs dispatch as calls. A callable or the empty value appearing
    /// directly as a program form is a runtime error.
    pub fn eval(&self, form: &Value, env: &Env) -> Result<Value, Error> {
        match form {
            Value::Int(_) => Ok(form.clone()),
            Value::Symbol(sym) => env.lookup(*sym),
            Value::Pair(pair) => {
                let (head, rest) = {
                    let p = pair.borrow();
                    (p.first.clone(), p.second.clone())
                };
                self.eval_call(&head, &rest, env)
            }
            Value::Nil => {
                Err(Error::RuntimeError("cannot evaluate an empty list".to_string()))
            }
            Value::Builtin(_) | Value::Closure(_) => {
                Err(Error::RuntimeError("cannot evaluate a function".to_string()))
            }
            Value::SpecialForm(_) => {
                Err(Error::RuntimeError("cannot evaluate a syntax".to_string()))
            }
        }
    }

    /// Evaluates a `(op . rest)` form: resolve the operator, then dispatch to
    /// special-form application (raw arguments) or procedure application
    /// (arguments evaluated left-to-right).
    ///
    /// Two degenerate shapes are tolerated: a single bare sub-expression
    /// `(X)` whose value is not callable simply yields that value, and a
    /// non-callable operator with arguments gets one further evaluation
    /// before being rejected, so an expression that computes a procedure can
    /// sit in operator position.
    fn eval_call(&self, head: &Value, rest: &Value, env: &Env) -> Result<Value, Error> {
        let mut operator = self.eval(head, env)?;

        if !is_callable(&operator) {
            if matches!(rest, Value::Nil) {
                return Ok(operator);
            }
            operator = self.eval(&operator, env)?;
            if !matches!(operator, Value::Builtin(_) | Value::Closure(_)) {
                return Err(Error::RuntimeError(format!(
                    "for operator position, expected a function or a syntax; got: {}",
                    operator
                )));
            }
        }

        let raw_args = value::list_to_vec(rest);
        match operator {
            Value::SpecialForm(name) => self.apply_special_form(name, &raw_args, env),
            Value::Builtin(builtin) => {
                let args = self.eval_args(&raw_args, env)?;
                (builtin.f)(&args, env)
            }
            Value::Closure(closure) => {
                let args = self.eval_args(&raw_args, env)?;
                self.apply_closure(&closure, &args)
            }
            _ => unreachable!("operator classified as callable above"),
        }
    }

    /// Evaluates a procedure's arguments left-to-right in the caller's
    /// environment.
    fn eval_args(&self, raw_args: &[Value], env: &Env) -> Result<Vec<Value>, Error> {
        let mut args = Vec::with_capacity(raw_args.len());
        for raw in raw_args {
            args.push(self.eval(raw, env)?);
        }
        Ok(args)
    }

    /// Applies a closure: exact arity, parameters bound in a fresh child
    /// frame of the captured definition-time frame, body evaluated in order.
    fn apply_closure(
        &self,
        closure: &Rc<Closure>,
        args: &[Value],
    ) -> Result<Value, Error> {
        if args.len() != closure.params.len() {
            return Err(Error::RuntimeError(format!(
                "wrong number of arguments: expected {}, got {}",
                closure.params.len(),
                args.len()
            )));
        }

        let frame = closure.env.child();
        for (param, arg) in closure.params.iter().zip(args.iter()) {
            frame.insert(*param, arg.clone());
        }

        let mut result = Value::Nil;
        for form in &closure.body {
            result = self.eval(form, &frame)?;
        }
        Ok(result)
    }

    //===------------------------------------------------------------------===//
    // Special forms
    //===------------------------------------------------------------------===//

    fn apply_special_form(
        &self,
        name: SymId,
        args: &[Value],
        env: &Env,
    ) -> Result<Value, Error> {
        let forms = &self.special_forms;
        match name {
            n if n == forms.s_if => self.sf_if(args, env),
            n if n == forms.s_quote => self.sf_quote(args),
            n if n == forms.s_lambda => self.sf_lambda(args, env),
            n if n == forms.s_and => self.sf_and(args, env),
            n if n == forms.s_or => self.sf_or(args, env),
            n if n == forms.s_define => self.sf_define(args, env),
            n if n == forms.s_set => self.sf_set(args, env),
            n if n == forms.s_eval => self.sf_eval(args, env),
            _ => Err(Error::RuntimeError(format!(
                "unknown special form: {}",
                interner::sym_to_str(name)
            ))),
        }
    }

    /// `(if cond then)` or `(if cond then else)`. A missing else branch
    /// yields the empty value.
    fn sf_if(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        if args.len() < 2 || args.len() > 3 {
            return Err(wrong_argument_count("if", args.len()));
        }

        let condition = self.eval(&args[0], env)?;
        if !condition.is_false() {
            self.eval(&args[1], env)
        } else if args.len() == 3 {
            self.eval(&args[2], env)
        } else {
            Ok(Value::Nil)
        }
    }

    /// `(quote x)` — returns the argument verbatim, unevaluated.
    fn sf_quote(&self, args: &[Value]) -> Result<Value, Error> {
        if args.len() != 1 {
            return Err(wrong_argument_count("quote", args.len()));
        }
        Ok(args[0].clone())
    }

    /// `(lambda (params...) body...)` — constructs a closure capturing the
    /// defining environment. The parameter list may be empty; the body may
    /// not.
    fn sf_lambda(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        if args.len() < 2 {
            return Err(wrong_argument_count("lambda", args.len()));
        }

        let mut params = Vec::new();
        for param in value::list_to_vec(&args[0]) {
            match param {
                Value::Symbol(sym) => params.push(sym),
                other => {
                    return Err(Error::SyntaxError(SyntaxError::InvalidForm {
                        form: "lambda".to_string(),
                        reason: format!("parameters must be symbols, got {}", other),
                    }));
                }
            }
        }

        let body = args[1..].to_vec();
        Ok(Value::Closure(Rc::new(Closure { params, body, env: env.clone() })))
    }

    /// `(and args...)` — left-to-right, short-circuits on the first falsy
    /// value; `#t` with no arguments.
    fn sf_and(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        let mut result = value::true_value();
        for arg in args {
            result = self.eval(arg, env)?;
            if result.is_false() {
                return Ok(result);
            }
        }
        Ok(result)
    }

    /// `(or args...)` — left-to-right, short-circuits on the first truthy
    /// value; `#f` with no arguments.
    fn sf_or(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        let mut result = value::false_value();
        for arg in args {
            result = self.eval(arg, env)?;
            if !result.is_false() {
                return Ok(result);
            }
        }
        Ok(result)
    }

    /// `(define name value)` binds in the current frame; the sugar form
    /// `(define (name params...) body)` desugars to a lambda before binding.
    fn sf_define(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        if args.len() != 2 {
            return Err(wrong_argument_count("define", args.len()));
        }

        match &args[0] {
            Value::Symbol(name) => {
                let result = self.eval(&args[1], env)?;
                env.insert(*name, result.clone());
                Ok(result)
            }
            Value::Pair(signature) => {
                let (name_form, params) = {
                    let p = signature.borrow();
                    (p.first.clone(), p.second.clone())
                };
                let name = match name_form {
                    Value::Symbol(name) => name,
                    other => {
                        return Err(Error::SyntaxError(SyntaxError::InvalidForm {
                            form: "define".to_string(),
                            reason: format!("procedure name must be a symbol, got {}", other),
                        }));
                    }
                };
                let lambda_args = [params, args[1].clone()];
                let result = self.sf_lambda(&lambda_args, env)?;
                env.insert(name, result.clone());
                Ok(result)
            }
            other => Err(Error::SyntaxError(SyntaxError::InvalidForm {
                form: "define".to_string(),
                reason: format!("first argument must be a symbol or a pair, got {}", other),
            })),
        }
    }

    /// `(set! name value)` — mutates the nearest enclosing binding; never
    /// creates one.
    fn sf_set(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        if args.len() != 2 {
            return Err(wrong_argument_count("set!", args.len()));
        }

        let name = match &args[0] {
            Value::Symbol(name) => *name,
            other => {
                return Err(Error::SyntaxError(SyntaxError::InvalidForm {
                    form: "set!".to_string(),
                    reason: format!("first argument must be a symbol, got {}", other),
                }));
            }
        };

        let result = self.eval(&args[1], env)?;
        env.set(name, result.clone())?;
        Ok(result)
    }

    /// `(eval x)` — evaluates the argument once to obtain a value, then
    /// evaluates that value itself a second time. This is how data captured
    /// via `quote` opts back into being code.
    fn sf_eval(&self, args: &[Value], env: &Env) -> Result<Value, Error> {
        if args.len() != 1 {
            return Err(wrong_argument_count("eval", args.len()));
        }
        let evaluated = self.eval(&args[0], env)?;
        self.eval(&evaluated, env)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_callable(value: &Value) -> bool {
    matches!(
        value,
        Value::Builtin(_) | Value::Closure(_) | Value::SpecialForm(_)
    )
}

fn wrong_argument_count(form: &str, count: usize) -> Error {
    Error::SyntaxError(SyntaxError::WrongArgumentCount {
        form: form.to_string(),
        count,
    })
}
