//! Tokens for the expression language (spec.md §4.1).

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t]+")]
pub enum TokenKind {
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 1)]
    Ident,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[token("!=")]
    Ne,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Tokenize an expression, returning an error message on the first unrecognized span.
pub fn tokenize(src: &str) -> Result<Vec<Token>, String> {
    let mut lexer = TokenKind::lexer(src);
    let mut out = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => out.push(Token {
                kind,
                text: lexer.slice().to_string(),
            }),
            Err(()) => return Err(format!("unexpected character at {:?}", lexer.slice())),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_mixed_expression() {
        let tokens = tokenize("x + 1 >= 2 and not y").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Ident,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::Ge,
                TokenKind::Number,
                TokenKind::And,
                TokenKind::Not,
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn distinguishes_eq_and_ne() {
        let tokens = tokenize("a != b = c").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Ne);
        assert_eq!(tokens[3].kind, TokenKind::Eq);
    }
}
