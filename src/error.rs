//! Application error type.
//!
//! Errors carry a process exit code so the binary can map failure classes to
//! distinct shell-visible codes:
//!
//! - `2` — input table missing, unreadable, or malformed
//! - `3` — structure identifier could not be parsed / no usable data in window
//! - `4` — upstream data inconsistency (e.g. duplicate reference dates)
//!
//! A failed FRED fetch is deliberately *not* an `AppError`: the pipeline
//! degrades to a structure-only analysis instead (see `app::pipeline`).

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Input table missing/unreadable/malformed.
    pub fn load(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// Structure identifier parse failure or nothing usable to analyze.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Upstream data inconsistency that cannot be recovered locally.
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
