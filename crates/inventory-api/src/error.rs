//! # API Errors
//!
//! The client surfaces exactly one failure kind. Network errors, 4xx and 5xx responses,
//! and undecodable bodies all become [`ApiError::FetchFailed`]; the only thing that varies
//! is which [`Operation`] failed, which decides the message shown to the user.

use std::fmt::Display;

/// The five remote operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Stats,
    Add,
    Update,
    Remove,
}

impl Operation {
    /// User-facing message for a failure of this operation.
    pub fn failure_message(self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch products",
            Operation::Stats => "Failed to fetch stats",
            Operation::Add => "Failed to add product",
            Operation::Update => "Failed to update product",
            Operation::Remove => "Failed to delete product",
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::Stats => "stats",
            Operation::Add => "add",
            Operation::Update => "update",
            Operation::Remove => "remove",
        };
        f.write_str(name)
    }
}

/// Errors returned by every [`ProductApi`](crate::ProductApi) implementation.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// The remote call did not succeed.
    #[error("{message}")]
    FetchFailed { operation: Operation, message: String },
}

impl ApiError {
    /// The failure of `operation`, with its standard message.
    pub fn fetch_failed(operation: Operation) -> Self {
        ApiError::FetchFailed {
            operation,
            message: operation.failure_message().to_string(),
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            ApiError::FetchFailed { operation, .. } => *operation,
        }
    }

    /// The human-readable message, or `fallback` when the message is blank.
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self {
            ApiError::FetchFailed { message, .. } if !message.trim().is_empty() => message,
            _ => fallback,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
