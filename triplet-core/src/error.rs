use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("correct index {index} out of range for {len} items")]
    CorrectIndexOutOfRange { index: usize, len: usize },

    #[error("trial has no items")]
    EmptyTrial,
}
