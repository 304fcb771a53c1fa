//! Error types.
//!
//! Dataset-level failures are [`MapError`]s and abort the run; per-row failures are
//! [`RowParseError`] values which the passes count and skip.
//! Library entry points return [`Result`], which carries a `MapError` that callers can
//! recover with `anyhow::Error::downcast_ref`.

/// Convenient wrapper around `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

#[derive(Debug, thiserror::Error)]
pub enum MapError {
  /// No row produced a usable coordinate, so no extent can be formed.
  #[error("no row of the dataset contains a usable coordinate")]
  EmptyDataset,
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
  #[error(transparent)]
  Io(#[from] std::io::Error),
}

/// Reason a single input row was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowParseError {
  #[error("row has no column {column}")]
  MissingField { column: usize },
  #[error("column {column}: {value:?} is not a coordinate")]
  InvalidCoordinate { column: usize, value: String },
  #[error("postcode field is blank")]
  MissingDistrict,
  #[error("row is not valid UTF-8")]
  InvalidUtf8,
}
