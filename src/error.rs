use thiserror::Error;

/// Aggregation hit a value no well-behaved producer would emit.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("`{field}` must be a finite, non-negative duration, got {value}")]
    InvalidDuration { field: &'static str, value: f64 },
}
