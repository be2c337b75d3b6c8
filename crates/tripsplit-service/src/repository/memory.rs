//! In-memory collaborators.
//!
//! ## Thread Safety
//! Both stores sit behind an `RwLock`: settlement runs only read, while
//! loading and soft-deleting take the write lock briefly.

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use tracing::debug;

use tripsplit_core::{ExpenseInput, ParticipantId};

use super::{ExpenseRepository, ParticipantDirectory, ParticipantProfile};
use crate::error::RepositoryError;

// =============================================================================
// Expenses
// =============================================================================

/// Expense records grouped by trip id.
#[derive(Debug, Default)]
pub struct InMemoryExpenseRepository {
    trips: RwLock<BTreeMap<String, Vec<ExpenseInput>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a trip with no expenses yet.
    pub fn create_trip(&self, trip_id: impl Into<String>) -> Result<(), RepositoryError> {
        self.write()?.entry(trip_id.into()).or_default();
        Ok(())
    }

    /// Appends `expense` to its trip, creating the trip if needed.
    pub fn insert(&self, expense: ExpenseInput) -> Result<(), RepositoryError> {
        debug!(expense_id = %expense.id, trip_id = %expense.trip_id, "Storing expense");
        self.write()?
            .entry(expense.trip_id.clone())
            .or_default()
            .push(expense);
        Ok(())
    }

    /// Marks an expense deleted. Returns whether it was found.
    pub fn soft_delete(&self, trip_id: &str, expense_id: &str) -> Result<bool, RepositoryError> {
        let mut trips = self.write()?;
        let Some(expenses) = trips.get_mut(trip_id) else {
            return Err(RepositoryError::TripNotFound(trip_id.to_string()));
        };
        match expenses.iter_mut().find(|e| e.id == expense_id) {
            Some(expense) => {
                expense.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Known trip ids, sorted.
    pub fn trip_ids(&self) -> Result<Vec<String>, RepositoryError> {
        Ok(self.read()?.keys().cloned().collect())
    }

    fn read(
        &self,
    ) -> Result<std::sync::RwLockReadGuard<'_, BTreeMap<String, Vec<ExpenseInput>>>, RepositoryError> {
        self.trips
            .read()
            .map_err(|_| RepositoryError::Unavailable("expense store lock poisoned".to_string()))
    }

    fn write(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, BTreeMap<String, Vec<ExpenseInput>>>, RepositoryError> {
        self.trips
            .write()
            .map_err(|_| RepositoryError::Unavailable("expense store lock poisoned".to_string()))
    }
}

impl ExpenseRepository for InMemoryExpenseRepository {
    fn expenses_for_trip(&self, trip_id: &str) -> Result<Vec<ExpenseInput>, RepositoryError> {
        let trips = self.read()?;
        let expenses = trips
            .get(trip_id)
            .ok_or_else(|| RepositoryError::TripNotFound(trip_id.to_string()))?;

        Ok(expenses.iter().filter(|e| !e.deleted).cloned().collect())
    }
}

// =============================================================================
// Directory
// =============================================================================

/// Participant profiles keyed by id.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    profiles: RwLock<HashMap<ParticipantId, ParticipantProfile>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = ParticipantProfile>) -> Self {
        let directory = Self::new();
        for profile in profiles {
            directory.upsert(profile);
        }
        directory
    }

    /// Adds or replaces a profile. A poisoned lock drops the write.
    pub fn upsert(&self, profile: ParticipantProfile) {
        if let Ok(mut profiles) = self.profiles.write() {
            profiles.insert(profile.id.clone(), profile);
        }
    }
}

impl ParticipantDirectory for InMemoryDirectory {
    fn display_info(&self, participant: &ParticipantId) -> Option<ParticipantProfile> {
        self.profiles.read().ok()?.get(participant).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: &str, trip: &str) -> ExpenseInput {
        ExpenseInput {
            id: id.to_string(),
            trip_id: trip.to_string(),
            amount: 1000,
            currency: "USD".to_string(),
            paid_by: "ana".to_string(),
            split: Default::default(),
            description: None,
            category: Default::default(),
            incurred_at: None,
            deleted: false,
        }
    }

    #[test]
    fn test_expenses_are_scoped_to_trip() {
        let repo = InMemoryExpenseRepository::new();
        repo.insert(input("e1", "lisbon")).unwrap();
        repo.insert(input("e2", "porto")).unwrap();
        repo.insert(input("e3", "lisbon")).unwrap();

        let ids: Vec<String> = repo
            .expenses_for_trip("lisbon")
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["e1", "e3"]);
        assert_eq!(repo.trip_ids().unwrap(), vec!["lisbon", "porto"]);
    }

    #[test]
    fn test_soft_deleted_expenses_are_hidden() {
        let repo = InMemoryExpenseRepository::new();
        repo.insert(input("e1", "lisbon")).unwrap();
        repo.insert(input("e2", "lisbon")).unwrap();

        assert!(repo.soft_delete("lisbon", "e1").unwrap());
        assert!(!repo.soft_delete("lisbon", "missing").unwrap());

        let remaining = repo.expenses_for_trip("lisbon").unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, "e2");
    }

    #[test]
    fn test_unknown_trip() {
        let repo = InMemoryExpenseRepository::new();
        assert_eq!(
            repo.expenses_for_trip("nowhere"),
            Err(RepositoryError::TripNotFound("nowhere".to_string()))
        );

        repo.create_trip("empty").unwrap();
        assert!(repo.expenses_for_trip("empty").unwrap().is_empty());
    }

    #[test]
    fn test_directory_lookup() {
        let directory = InMemoryDirectory::from_profiles(vec![ParticipantProfile {
            id: "ana".into(),
            name: "Ana".to_string(),
            avatar_url: None,
        }]);

        assert_eq!(directory.display_info(&"ana".into()).unwrap().name, "Ana");
        assert!(directory.display_info(&"ben".into()).is_none());
    }
}
