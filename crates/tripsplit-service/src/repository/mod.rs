//! # Repository Module
//!
//! Collaborator seams the settlement service reads from.
//!
//! ## Collaborators
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Where the Engine Gets Its Data                       │
//! │                                                                         │
//! │  SettlementService::settle_trip("lisbon")                              │
//! │       │                                                                 │
//! │       ├──► ExpenseRepository::expenses_for_trip("lisbon")              │
//! │       │         └── non-deleted ExpenseInput records                   │
//! │       │                                                                 │
//! │       └──► ParticipantDirectory::display_info(&id)                     │
//! │                 └── optional name + avatar for the response            │
//! │                                                                         │
//! │  The engine never sees these traits; it only sees values.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Implementations
//!
//! - [`InMemoryExpenseRepository`] - Expense records keyed by trip
//! - [`InMemoryDirectory`] - Participant profiles keyed by id

pub mod memory;

pub use memory::{InMemoryDirectory, InMemoryExpenseRepository};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use tripsplit_core::{ExpenseInput, ParticipantId};

use crate::error::RepositoryError;

/// Source of a trip's expense records.
pub trait ExpenseRepository {
    /// All non-deleted expenses of `trip_id`, in insertion order.
    ///
    /// Unknown trips are [`RepositoryError::TripNotFound`]; a known trip with
    /// no expenses is an empty list.
    fn expenses_for_trip(&self, trip_id: &str) -> Result<Vec<ExpenseInput>, RepositoryError>;
}

/// Display information for a participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ParticipantProfile {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Lookup of participant display information.
pub trait ParticipantDirectory {
    fn display_info(&self, participant: &ParticipantId) -> Option<ParticipantProfile>;
}

impl<T: ExpenseRepository + ?Sized> ExpenseRepository for &T {
    fn expenses_for_trip(&self, trip_id: &str) -> Result<Vec<ExpenseInput>, RepositoryError> {
        (**self).expenses_for_trip(trip_id)
    }
}

impl<T: ParticipantDirectory + ?Sized> ParticipantDirectory for &T {
    fn display_info(&self, participant: &ParticipantId) -> Option<ParticipantProfile> {
        (**self).display_info(participant)
    }
}
