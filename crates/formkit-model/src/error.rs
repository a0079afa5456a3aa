use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathParseError {
    #[error("empty field path")]
    Empty,
    #[error("empty segment in field path")]
    EmptySegment,
    #[error("unclosed index bracket in field path")]
    UnclosedIndex,
    #[error("invalid array index {0:?} in field path")]
    InvalidIndex(String),
    #[error("unexpected character {0:?} in field path")]
    Unexpected(char),
}
