//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they touch the clock or configuration.

use thiserror::Error;

use crate::SimTime;

/// Errors produced by `mf-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("clock cannot move backwards from {now} to {requested}")]
    ClockRewind { now: SimTime, requested: SimTime },
}

/// Shorthand result type for `mf-core`.
pub type CoreResult<T> = Result<T, CoreError>;
