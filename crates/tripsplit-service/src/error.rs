//! # Service Error Types
//!
//! Errors raised around the engine and the API error callers receive.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in TripSplit                              │
//! │                                                                         │
//! │  RepositoryError ──┐                                                   │
//! │                    ├──► ServiceError ──► ApiError { code, message }    │
//! │  CoreError ────────┘                          │                         │
//! │                                               ▼                         │
//! │                              ErrorCode::http_status()                   │
//! │                              ├── split / validation codes → 400        │
//! │                              ├── NOT_FOUND                → 404        │
//! │                              ├── UNAVAILABLE              → 503        │
//! │                              └── UNBALANCED_LEDGER        → 500 + log  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "SPLIT_SUM_MISMATCH",
//!   "message": "Expense e1: Split amounts do not match the expense total (difference 0.01)",
//!   "details": { "expenseId": "e1", "difference": 1 }
//! }
//! ```

use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use ts_rs::TS;

use tripsplit_core::{CoreError, SplitError, ValidationError};

// =============================================================================
// Repository Error
// =============================================================================

/// Failures of the expense source collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The trip does not exist.
    #[error("Trip not found: {0}")]
    TripNotFound(String),

    /// The store could not be read.
    #[error("Expense store unavailable: {0}")]
    Unavailable(String),
}

// =============================================================================
// Service Error
// =============================================================================

/// Anything that can stop a trip from being settled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// API Error
// =============================================================================

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    SplitSumMismatch,
    PercentageSumInvalid,
    MixedSplitTypes,
    EmptySplitSet,
    NegativeAmount,
    DuplicateParticipant,
    NonPositiveTotal,
    InvalidCurrency,
    DuplicateExpense,
    ValidationError,
    NotFound,
    Unavailable,
    /// Internal consistency failure; indicates a bug upstream.
    UnbalancedLedger,
    Internal,
}

impl ErrorCode {
    /// HTTP status a transport layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCode::SplitSumMismatch
            | ErrorCode::PercentageSumInvalid
            | ErrorCode::MixedSplitTypes
            | ErrorCode::EmptySplitSet
            | ErrorCode::NegativeAmount
            | ErrorCode::DuplicateParticipant
            | ErrorCode::NonPositiveTotal
            | ErrorCode::InvalidCurrency
            | ErrorCode::DuplicateExpense
            | ErrorCode::ValidationError => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::Unavailable => 503,
            ErrorCode::UnbalancedLedger | ErrorCode::Internal => 500,
        }
    }

    /// True for 4xx codes: the caller sent something wrong.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_status())
    }
}

/// API error returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Structured extras (offending expense id, signed difference, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(type = "Record<string, unknown> | null")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    /// Shortcut for `self.code.http_status()`.
    pub fn http_status(&self) -> u16 {
        self.code.http_status()
    }
}

fn split_code(err: &SplitError) -> ErrorCode {
    match err {
        SplitError::SplitSumMismatch { .. } => ErrorCode::SplitSumMismatch,
        SplitError::PercentageSumInvalid { .. } => ErrorCode::PercentageSumInvalid,
        SplitError::MixedSplitTypes => ErrorCode::MixedSplitTypes,
        SplitError::EmptySplitSet => ErrorCode::EmptySplitSet,
        SplitError::NegativeAmount { .. } => ErrorCode::NegativeAmount,
        SplitError::DuplicateParticipant { .. } => ErrorCode::DuplicateParticipant,
        SplitError::UnbalancedLedger { .. } | SplitError::PlanDrift { .. } => {
            ErrorCode::UnbalancedLedger
        }
    }
}

fn split_details(err: &SplitError) -> Value {
    match err {
        SplitError::SplitSumMismatch { difference } => json!({ "difference": difference.minor() }),
        SplitError::PercentageSumInvalid { actual } => json!({
            "actualBps": actual.bps(),
            "actualPercentage": actual.as_percent(),
        }),
        SplitError::NegativeAmount { participant }
        | SplitError::DuplicateParticipant { participant } => {
            json!({ "participantId": participant.as_str() })
        }
        SplitError::UnbalancedLedger { credit, debit } => json!({
            "credit": credit.minor(),
            "debit": debit.minor(),
        }),
        SplitError::PlanDrift {
            participant,
            planned,
            expected,
        } => json!({
            "participantId": participant.as_str(),
            "planned": planned.minor(),
            "expected": expected.minor(),
        }),
        SplitError::MixedSplitTypes | SplitError::EmptySplitSet => json!({}),
    }
}

fn validation_code(err: &ValidationError) -> ErrorCode {
    match err {
        ValidationError::Required { .. } => ErrorCode::ValidationError,
        ValidationError::NonPositiveTotal { .. } => ErrorCode::NonPositiveTotal,
        ValidationError::InvalidCurrency { .. } => ErrorCode::InvalidCurrency,
        ValidationError::DuplicateExpense { .. } => ErrorCode::DuplicateExpense,
    }
}

fn with_expense(mut details: Value, expense_id: &str) -> Value {
    if let Value::Object(ref mut map) = details {
        map.insert("expenseId".to_string(), Value::from(expense_id));
    }
    details
}

/// Converts core errors to API errors.
///
/// `UNBALANCED_LEDGER` is logged at error level here: it never comes from
/// bad input, so someone needs to look at it.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        let api = match &err {
            CoreError::InvalidSplit { expense_id, source } => {
                ApiError::new(split_code(source), message)
                    .with_details(with_expense(split_details(source), expense_id))
            }
            CoreError::Split(source) => {
                ApiError::new(split_code(source), message).with_details(split_details(source))
            }
            CoreError::InvalidExpense { expense_id, source } => {
                ApiError::new(validation_code(source), message)
                    .with_details(json!({ "expenseId": expense_id }))
            }
            CoreError::Validation(source) => ApiError::new(validation_code(source), message),
        };

        if err.is_defect() {
            tracing::error!(code = ?api.code, "Settlement defect: {}", api.message);
        }
        api
    }
}

/// Converts repository errors to API errors.
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::TripNotFound(id) => ApiError::not_found("Trip", &id),
            RepositoryError::Unavailable(reason) => {
                tracing::error!("Expense store unavailable: {}", reason);
                ApiError::new(ErrorCode::Unavailable, "Expense store unavailable")
            }
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Repository(e) => e.into(),
            ServiceError::Core(e) => e.into(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Unit Tests
// =============================================================================
