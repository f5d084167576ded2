use logos::Span;
use std::fmt;

//===----------------------------------------------------------------------===//
// Error
//===----------------------------------------------------------------------===//

/// The three error kinds the interpreter can surface. No kind is ever caught
/// or retried internally; a failing sub-expression aborts the whole top-level
/// evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    SyntaxError(SyntaxError),
    NameError(String),
    RuntimeError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SyntaxError(e) => write!(f, "Syntax error: {}", e),
            Error::NameError(name) => write!(f, "Variable not found: {}", name),
            Error::RuntimeError(e) => write!(f, "Runtime error: {}", e),
        }
    }
}

//===----------------------------------------------------------------------===//
// SyntaxError
//===----------------------------------------------------------------------===//

#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxError {
    UnexpectedEOF { expected: Option<String> },
    UnexpectedToken { found: String, expected: String },
    UnbalancedDelimiter { delimiter: char, position: usize },
    InvalidNumber { value: String },
    TrailingContent { found: String },
    WrongArgumentCount { form: String, count: usize },
    InvalidForm { form: String, reason: String },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedEOF { expected } => match expected {
                Some(expected) => {
                    write!(f, "Unexpected end of input (expected: {})", expected)
                }
                None => write!(f, "Unexpected end of input"),
            },
            SyntaxError::UnexpectedToken { found, expected } => {
                write!(f, "Unexpected token: {} (expected: {})", found, expected)
            }
            SyntaxError::UnbalancedDelimiter { delimiter, position } => {
                write!(
                    f,
                    "Unbalanced delimiter: {} at position {}",
                    delimiter, position
                )
            }
            SyntaxError::InvalidNumber { value } => {
                write!(f, "Invalid number: {}", value)
            }
            SyntaxError::TrailingContent { found } => {
                write!(f, "Trailing content after expression: {}", found)
            }
            SyntaxError::WrongArgumentCount { form, count } => {
                write!(f, "{}: wrong number of arguments: {}", form, count)
            }
            SyntaxError::InvalidForm { form, reason } => {
                write!(f, "{}: {}", form, reason)
            }
        }
    }
}

//===----------------------------------------------------------------------===//
// ErrorWithSpan
//===----------------------------------------------------------------------===//

/// An error decorated with the source it came from and, when the reader
/// produced it, the span of the offending tokens. Evaluator errors carry no
/// span because the object tree does not retain source positions.
#[derive(Debug, Clone)]
pub struct ErrorWithSpan {
    pub error: Error,
    pub span: Option<Span>,
    pub source: String, // Keep original source for context
}

impl ErrorWithSpan {
    pub fn at(error: Error, span: Span, source: &str) -> Self {
        Self { error, span: Some(span), source: source.to_string() }
    }

    pub fn bare(error: Error, source: &str) -> Self {
        Self { error, span: None, source: source.to_string() }
    }

    /// Renders the error for display. With a span, the offending line is
    /// printed with a caret underline; without one, just the error message.
    pub fn format_error(&self) -> String {
        let span = match &self.span {
            Some(span) => span.clone(),
            None => return self.error.to_string(),
        };

        let start = span.start.min(self.source.len());
        let line_start =
            self.source[..start].rfind('\n').map(|pos| pos + 1).unwrap_or(0);

        let line_end = self.source[start..]
            .find('\n')
            .map(|pos| start + pos)
            .unwrap_or(self.source.len());

        let line_number = self.source[..start].matches('\n').count() + 1;
        let column = start - line_start + 1;

        let line_content = &self.source[line_start..line_end];
        let underline = " ".repeat(column - 1) + &"^".repeat(span.len().max(1));

        format!(
            "Error at ({}:{})\n{}\n{}\n{}",
            line_number, column, line_content, underline, self.error
        )
    }
}
