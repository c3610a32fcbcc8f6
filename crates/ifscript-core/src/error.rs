//! The two error kinds of spec.md §7: `ParseError` (Parser, C3) and
//! `InterpretError` (Interpreter, C4/C5). Both are non-recoverable within
//! the current fork; whether they are raised at all is gated by the
//! `strict_errors` flag on `EngineConfig` (see `ifscript-vm::config`).

use std::path::PathBuf;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("empty file: {0}")]
    EmptyFile(PathBuf),

    #[error("duplicate fork header: {0:?}")]
    DuplicateFork(String),

    #[error("zero-length fork name")]
    EmptyForkName,

    #[error("unbalanced if/endif in fork {fork:?}")]
    UnbalancedIf { fork: String },

    #[error("multiple if/endif tokens on one line in fork {fork:?}: {line:?}")]
    MultipleOnOneLine { fork: String, line: String },
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum InterpretError {
    #[error("unknown fork: {0:?}")]
    UnknownFork(String),

    #[error("missing resource: {0}")]
    MissingResource(String),

    #[error("failed to parse {context}: {source}")]
    ParseFailed {
        context: String,
        #[source]
        source: ParseError,
    },

    #[error("malformed command: {0:?}")]
    MalformedCommand(String),

    #[error("non-boolean condition result: {0:?}")]
    NonBooleanCondition(String),

    #[error("evaluator error: {0}")]
    Evaluator(String),

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}
