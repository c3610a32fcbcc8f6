#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum EvalError {
    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected token: {0:?}")]
    UnexpectedToken(String),

    #[error("trailing input after expression: {0:?}")]
    TrailingInput(String),

    #[error("unknown identifier: {0:?}")]
    UnknownIdentifier(String),

    #[error("type mismatch in expression")]
    TypeMismatch,

    #[error("division by zero")]
    DivisionByZero,

    #[error("bad tokens: {0}")]
    Lex(String),
}
