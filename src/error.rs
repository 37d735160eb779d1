use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SkipListError {
    #[error("max_level must be at least 1, got {0}")]
    InvalidMaxLevel(usize),
    #[error("key already exists")]
    DuplicateKey,
    #[error("key not found")]
    NotFound,
    #[error("computed node level {level} is outside 1..={max_level}")]
    InvalidLevel { level: usize, max_level: usize },
    #[error("failed to allocate node with {0} levels")]
    Allocation(usize),
}
