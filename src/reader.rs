use logos::{Logos, Span};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{Error, ErrorWithSpan, SyntaxError};
use crate::interner;
use crate::value::{Pair, Value};

//===----------------------------------------------------------------------===//
// Token
//
// Uses the logos crate for tokenization. Unary sign folding is context
// dependent (a regex lexer cannot see the previous token), so `+`/`-` lex as
// symbols here and a post-lex pass folds them into signed constants.
//===----------------------------------------------------------------------===//

#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    // Whitespace and line comments are ignored.
    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[regex(r";[^\n]*", logos::skip)]
    // --------- Delimiters & Punct ---------
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("'")]
    Quote,
    #[token(".")]
    Dot,

    // --------- Literals ---------
    // Unsigned digit runs; an overflowing literal fails the callback and
    // surfaces as a lexing error.
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    // --------- Symbols ---------
    // `+`, `-` and `*` are always single-character symbols. A multi-character
    // symbol is any other run not containing digits, `.`, `'`, brackets,
    // `;` or whitespace.
    #[regex(r"[+*-]", |lex| lex.slice().to_owned())]
    #[regex(r"[^ \t\r\n0-9.'();+*-][^ \t\r\n0-9.'();]*", |lex| lex.slice().to_owned())]
    Symbol(String),
}

/// Displays a Token as source text, for error message formatting.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Quote => write!(f, "'"),
            Token::Dot => write!(f, "."),
            Token::Int(int) => write!(f, "{}", int),
            Token::Symbol(symbol) => write!(f, "{}", symbol),
        }
    }
}

/// A token together with its source span, for error reporting.
#[derive(Debug, PartialEq, Clone)]
pub struct TokenAST {
    token: Token,
    span: Span,
}

//===----------------------------------------------------------------------===//
// Tokenizer
//===----------------------------------------------------------------------===//

pub fn tokenize(source: &str) -> Result<Reader, ErrorWithSpan> {
    let mut lexer = Token::lexer(source);
    let mut tokens: Vec<TokenAST> = vec![];

    while let Some(token) = lexer.next() {
        match token {
            Ok(token) => tokens.push(TokenAST { token, span: lexer.span() }),
            Err(()) => {
                return Err(ErrorWithSpan::at(
                    Error::SyntaxError(SyntaxError::InvalidNumber {
                        value: lexer.slice().to_string(),
                    }),
                    lexer.span(),
                    source,
                ));
            }
        }
    }

    Ok(Reader { tokens: fold_signs(tokens), source: source.to_string(), position: 0 })
}

/// Folds a `+`/`-` symbol into the integer token that immediately follows it,
/// but only where a unary sign is syntactically possible: at the very start
/// of the stream or right after an opening bracket. Everywhere else `+` and
/// `-` stay ordinary symbols, so `(+ 1 -5)` lexes `-` and `5` separately
/// while `(-5)` lexes a negative constant.
fn fold_signs(tokens: Vec<TokenAST>) -> Vec<TokenAST> {
    let mut folded: Vec<TokenAST> = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(current) = iter.next() {
        let sign_possible =
            matches!(folded.last().map(|t| &t.token), None | Some(Token::LParen));

        if sign_possible {
            if let Token::Symbol(name) = &current.token {
                if name == "+" || name == "-" {
                    let adjacent_int = match iter.peek() {
                        Some(next) => match next.token {
                            // The digits must touch the sign, "- 5" is not a constant
                            Token::Int(n) if next.span.start == current.span.end => {
                                Some(n)
                            }
                            _ => None,
                        },
                        None => None,
                    };
                    if let Some(n) = adjacent_int {
                        let next = iter.next().expect("peeked above");
                        let value = if name == "-" { -n } else { n };
                        folded.push(TokenAST {
                            token: Token::Int(value),
                            span: current.span.start..next.span.end,
                        });
                        continue;
                    }
                }
            }
        }

        folded.push(current);
    }

    folded
}

//===----------------------------------------------------------------------===//
// Reader
//===----------------------------------------------------------------------===//

/// A single-token-lookahead cursor over the token stream. `peek` is
/// idempotent until `next` advances; both report a persistent end state once
/// the stream is exhausted.
#[derive(Debug)]
pub struct Reader {
    tokens: Vec<TokenAST>,
    source: String,
    position: usize,
}

impl Reader {
    /// Reads the current token and advances past it.
    pub fn next(&mut self) -> Result<&TokenAST, ErrorWithSpan> {
        let token = match self.tokens.get(self.position) {
            Some(t) => t,
            None => {
                return Err(ErrorWithSpan::at(
                    Error::SyntaxError(SyntaxError::UnexpectedEOF { expected: None }),
                    self.last_span(),
                    &self.source,
                ));
            }
        };

        self.position += 1;
        Ok(token)
    }

    /// Returns the current token without advancing.
    pub fn peek(&self) -> Result<&TokenAST, ErrorWithSpan> {
        match self.tokens.get(self.position) {
            Some(t) => Ok(t),
            None => Err(ErrorWithSpan::at(
                Error::SyntaxError(SyntaxError::UnexpectedEOF { expected: None }),
                self.last_span(),
                &self.source,
            )),
        }
    }

    pub fn is_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// The span of the last token, or an empty span at the end of an empty
    /// source.
    fn last_span(&self) -> Span {
        match self.tokens.last() {
            Some(t) => t.span.clone(),
            None => self.source.len()..self.source.len(),
        }
    }
}

//===----------------------------------------------------------------------===//
// Parsing
//
// expr := atom | quoted-expr | list
// list := '(' ')' | '(' expr+ ')' | '(' expr+ '.' expr ')'
//===----------------------------------------------------------------------===//

/// Reads exactly one expression, leaving the cursor on the token after it.
pub fn read_form(reader: &mut Reader) -> Result<Value, ErrorWithSpan> {
    let token_ast = reader.peek()?;
    let span = token_ast.span.clone();
    match token_ast.token.clone() {
        Token::Int(n) => {
            reader.next()?;
            Ok(Value::Int(n))
        }
        Token::Symbol(name) => {
            reader.next()?;
            Ok(Value::Symbol(interner::intern_sym(&name)))
        }
        // 'X desugars to (quote X)
        Token::Quote => {
            reader.next()?;
            let quoted = read_form(reader)?;
            Ok(Value::cons(
                Value::Symbol(interner::intern_sym("quote")),
                Value::cons(quoted, Value::Nil),
            ))
        }
        Token::LParen => read_list(reader),
        Token::RParen => Err(ErrorWithSpan::at(
            Error::SyntaxError(SyntaxError::UnexpectedToken {
                found: ")".to_string(),
                expected: "expression".to_string(),
            }),
            span,
            &reader.source,
        )),
        Token::Dot => Err(ErrorWithSpan::at(
            Error::SyntaxError(SyntaxError::UnexpectedToken {
                found: ".".to_string(),
                expected: "expression".to_string(),
            }),
            span,
            &reader.source,
        )),
    }
}

/// Reads a list form after its opening bracket: the empty list, a proper
/// list chained left-to-right, or a dotted tail where the expression after
/// the final `.` becomes the last pair's second field.
fn read_list(reader: &mut Reader) -> Result<Value, ErrorWithSpan> {
    let open_span = reader.next()?.span.clone();

    let unbalanced = |source: &str| {
        ErrorWithSpan::at(
            Error::SyntaxError(SyntaxError::UnbalancedDelimiter {
                delimiter: '(',
                position: open_span.start,
            }),
            open_span.clone(),
            source,
        )
    };

    // Empty list
    let at_close = match reader.peek() {
        Ok(t) => t.token == Token::RParen,
        Err(_) => return Err(unbalanced(&reader.source)),
    };
    if at_close {
        reader.next()?;
        return Ok(Value::Nil);
    }

    let first = read_form(reader)?;
    let head = Rc::new(RefCell::new(Pair { first, second: Value::Nil }));
    let mut last = Rc::clone(&head);

    loop {
        let token = match reader.peek() {
            Ok(t) => t.token.clone(),
            Err(_) => return Err(unbalanced(&reader.source)),
        };

        match token {
            Token::RParen => {
                reader.next()?;
                return Ok(Value::Pair(head));
            }
            Token::Dot => {
                reader.next()?;
                let tail = read_form(reader)?;
                let (closing, span) = match reader.peek() {
                    Ok(t) => (t.token.clone(), t.span.clone()),
                    Err(_) => return Err(unbalanced(&reader.source)),
                };
                if closing != Token::RParen {
                    return Err(ErrorWithSpan::at(
                        Error::SyntaxError(SyntaxError::UnexpectedToken {
                            found: closing.to_string(),
                            expected: ")".to_string(),
                        }),
                        span,
                        &reader.source,
                    ));
                }
                reader.next()?;
                last.borrow_mut().second = tail;
                return Ok(Value::Pair(head));
            }
            _ => {
                let element = read_form(reader)?;
                let cell =
                    Rc::new(RefCell::new(Pair { first: element, second: Value::Nil }));
                last.borrow_mut().second = Value::Pair(Rc::clone(&cell));
                last = cell;
            }
        }
    }
}

/// Parses exactly one top-level expression; trailing tokens are rejected.
pub fn read(source: &str) -> Result<Value, ErrorWithSpan> {
    let mut reader = tokenize(source)?;
    let value = read_form(&mut reader)?;
    if let Ok(extra) = reader.peek() {
        return Err(ErrorWithSpan::at(
            Error::SyntaxError(SyntaxError::TrailingContent {
                found: extra.token.to_string(),
            }),
            extra.span.clone(),
            source,
        ));
    }
    Ok(value)
}

/// Parses a whole sequence of top-level expressions, for file execution.
pub fn read_program(source: &str) -> Result<Vec<Value>, ErrorWithSpan> {
    let mut reader = tokenize(source)?;
    let mut forms = Vec::new();
    while !reader.is_end() {
        forms.push(read_form(&mut reader)?);
    }
    Ok(forms)
}
