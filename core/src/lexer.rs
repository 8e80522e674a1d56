use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

// ============================================================================
// Lexer
// ============================================================================

/// One token: a string literal, a paren, a quote, or a bare atom.
/// Whitespace and comments are stripped before matching.
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(?:"(?s:\\.|[^\\"])*"|[()']|[^\s()'";]+)"#)
        .expect("token pattern is a valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    LParen,
    RParen,
    Quote,
    /// A bare atom or a string literal with its quotes still attached
    Atom(&'a str),
    Eof,
}

/// Splits source text into tokens, one at a time.
pub struct Lexer<'a> {
    remaining: &'a str,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer { remaining: input }
    }

    /// Is there anything other than whitespace and comments left?
    pub fn at_eof(&mut self) -> bool {
        self.skip_whitespace_and_comments();
        self.remaining.is_empty()
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.remaining = self.remaining.trim_start();
            if !self.remaining.starts_with(';') {
                break;
            }
            self.remaining = match self.remaining.find('\n') {
                Some(newline) => &self.remaining[newline + 1..],
                None => "",
            };
        }
    }

    pub fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace_and_comments();
        if self.remaining.is_empty() {
            return Ok(Token::Eof);
        }

        let Some(found) = TOKEN.find(self.remaining) else {
            return Err(if self.remaining.starts_with('"') {
                Error::syntax("Unterminated string literal")
            } else {
                let bad: String = self.remaining.chars().take(1).collect();
                Error::syntax(format!("Unexpected character: {bad}"))
            });
        };

        let text = found.as_str();
        self.remaining = &self.remaining[found.end()..];

        Ok(match text {
            "(" => Token::LParen,
            ")" => Token::RParen,
            "'" => Token::Quote,
            _ => Token::Atom(text),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token<'_>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token().unwrap();
            if token == Token::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_parens_and_atoms() {
        assert_eq!(
            tokenize("(+ 1 foo)"),
            vec![
                Token::LParen,
                Token::Atom("+"),
                Token::Atom("1"),
                Token::Atom("foo"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_quote_is_its_own_token() {
        assert_eq!(
            tokenize("'(a)"),
            vec![Token::Quote, Token::LParen, Token::Atom("a"), Token::RParen]
        );
        assert_eq!(tokenize("'x"), vec![Token::Quote, Token::Atom("x")]);
    }

    #[test]
    fn test_string_with_escaped_quote_is_one_token() {
        assert_eq!(
            tokenize(r#"("a \"b\" c" d)"#),
            vec![
                Token::LParen,
                Token::Atom(r#""a \"b\" c""#),
                Token::Atom("d"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_string_may_contain_delimiters() {
        assert_eq!(tokenize(r#""(; ')""#), vec![Token::Atom(r#""(; ')""#)]);
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            tokenize("; leading\n(a ; trailing\n b) ; done"),
            vec![
                Token::LParen,
                Token::Atom("a"),
                Token::Atom("b"),
                Token::RParen
            ]
        );
    }

    #[test]
    fn test_whitespace_only_is_eof() {
        let mut lexer = Lexer::new(" \n\t ");
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
        assert!(lexer.at_eof());
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let mut lexer = Lexer::new("\"abc");
        let err = lexer.next_token().unwrap_err();
        assert!(err.message.contains("Unterminated"));
    }

    #[test]
    fn test_atoms_stop_at_string_start() {
        assert_eq!(
            tokenize(r#"ab"c""#),
            vec![Token::Atom("ab"), Token::Atom(r#""c""#)]
        );
    }
}
