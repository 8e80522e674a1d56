use crate::error::{Error, Result};
use crate::language::Value;
use crate::lexer::{Lexer, Token};

// ============================================================================
// Parser
// ============================================================================

/// The symbol a quote mark expands to: `'e` reads as `(' e)`.
pub const QUOTE_MARK: &str = "'";

/// Recursive-descent reader over a token stream.
///
/// A single `Reader` can yield several top-level expressions in turn.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str) -> Self {
        Reader {
            lexer: Lexer::new(input),
        }
    }

    /// Read the next top-level expression, or `None` once only whitespace
    /// and comments remain.
    pub fn read_next(&mut self) -> Result<Option<Value>> {
        if self.lexer.at_eof() {
            return Ok(None);
        }
        let token = self.lexer.next_token()?;
        self.read_expr(token).map(Some)
    }

    fn read_expr(&mut self, token: Token<'a>) -> Result<Value> {
        match token {
            Token::LParen => {
                let mut items = Vec::new();
                loop {
                    match self.lexer.next_token()? {
                        Token::RParen => return Ok(Value::list(items)),
                        Token::Eof => return Err(Error::syntax("Unclosed parenthesis")),
                        other => items.push(self.read_expr(other)?),
                    }
                }
            }
            Token::Quote => {
                let next = self.lexer.next_token()?;
                let quoted = self.read_expr(next)?;
                Ok(Value::list(vec![Value::symbol(QUOTE_MARK), quoted]))
            }
            Token::RParen => Err(Error::syntax("Unexpected )")),
            Token::Eof => Err(Error::syntax("Unexpected end of input")),
            Token::Atom(text) => Ok(atom(text)),
        }
    }
}

/// Classify a bare atom or string literal token.
pub fn atom(token: &str) -> Value {
    match token {
        "#t" => Value::Bool(true),
        "#f" => Value::Bool(false),
        // The lexer only yields string tokens with both quotes present
        _ if token.starts_with('"') && token.len() >= 2 => {
            Value::text(&token[1..token.len() - 1])
        }
        _ => match parse_number(token) {
            Some(n) => Value::Number(n),
            None => Value::symbol(token),
        },
    }
}

// `inf`, `nan` and friends have no digits and stay symbols
fn parse_number(token: &str) -> Option<f64> {
    if !token.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok()
}

/// Read exactly one expression from `input` without evaluating it.
/// Anything after the first complete expression is ignored.
pub fn read(input: &str) -> Result<Value> {
    let mut reader = Reader::new(input);
    reader
        .read_next()?
        .ok_or_else(|| Error::syntax("Unexpected end of input"))
}

/// Read every top-level expression in `input`.
pub fn read_all(input: &str) -> Result<Vec<Value>> {
    let mut reader = Reader::new(input);
    let mut exprs = Vec::new();
    while let Some(expr) = reader.read_next()? {
        exprs.push(expr);
    }
    Ok(exprs)
}
