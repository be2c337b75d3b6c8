//! # tripsplit-service: Calling Layer
//!
//! Wraps the pure engine in `tripsplit-core` with the collaborators a real
//! deployment has: an expense store, a participant directory and
//! environment configuration. A transport (HTTP handler, CLI, ...) calls
//! [`SettlementService::settle_trip`] and serializes whatever comes back.
//!
//! ## Layering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  transport (CLI / HTTP)                                                 │
//! │       │  settle_trip(trip_id)                                           │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  ★ tripsplit-service (THIS CRATE) ★                          │     │
//! │  │  service ── repository ── response ── error ── config         │     │
//! │  └───────────────────────────┬───────────────────────────────────┘     │
//! │                              ▼                                          │
//! │  tripsplit-core: split → balance → settlement                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tripsplit_core::{ExpenseInput, SplitInput};
//! use tripsplit_service::{
//!     EngineConfig, InMemoryDirectory, InMemoryExpenseRepository, SettlementService,
//! };
//!
//! let repo = InMemoryExpenseRepository::new();
//! repo.insert(ExpenseInput {
//!     id: "e1".into(),
//!     trip_id: "lisbon".into(),
//!     amount: 2500,
//!     currency: "EUR".into(),
//!     paid_by: "ana".into(),
//!     split: SplitInput::default(),
//!     description: None,
//!     category: Default::default(),
//!     incurred_at: None,
//!     deleted: false,
//! })
//! .unwrap();
//!
//! let service = SettlementService::new(repo, InMemoryDirectory::new(), EngineConfig::default());
//! let response = service.settle_trip("lisbon").unwrap();
//!
//! // No split: the payer absorbs the whole expense.
//! assert!(response.settlements.is_empty());
//! assert_eq!(response.summary.total_amount.minor(), 2500);
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod response;
pub mod service;

pub use config::{ConfigError, EngineConfig};
pub use error::{ApiError, ErrorCode, RepositoryError, ServiceError, ServiceResult};
pub use repository::{
    ExpenseRepository, InMemoryDirectory, InMemoryExpenseRepository, ParticipantDirectory,
    ParticipantProfile,
};
pub use response::{
    CurrencyBalances, CurrencyTotal, ParticipantBalanceView, SettlementResponse, SettlementView,
    TripSummary,
};
pub use service::SettlementService;
