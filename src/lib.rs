//! Sprout - a minimal Scheme interpreter
//!
//! The crate implements the full pipeline that makes the language execute:
//! source text is tokenized, the reader turns the token stream into a tree of
//! mutable cons cells, and the evaluator walks that tree against a chain of
//! lexical environment frames, producing values or one of three typed errors
//! (syntax, name, runtime).
//!
//! ```scheme
//! (define (add-n n) (lambda (x) (+ x n)))
//! ((add-n 3) 4)                ; => 7
//! (define p (cons 1 2))
//! (set-car! p 9)               ; pairs are mutable, aliasing is intentional
//! (eval '(+ 2 3))              ; quoted data opts back into being code
//! ```
//!
//! ## Modules
//!
//! - `reader`: tokenization (logos) and S-expression parsing
//! - `value`: the tagged value representation and S-expression printing
//! - `env`: the mutable, parent-linked environment chain
//! - `eval`: the evaluator and the eight special forms
//! - `core`: the special-form and native-function registries
//! - `runtime`: the interpreter instance owning the global frame
//! - `repl` / `devtools`: interactive driver and AST pretty-printing

pub mod core;
pub mod devtools;
pub mod env;
pub mod error;
pub mod eval;
pub mod interner;
pub mod reader;
pub mod repl;
pub mod runtime;
pub mod value;
