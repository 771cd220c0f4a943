//! In-memory activity directory
//!
//! The set of activities is fixed when the directory is built; only the
//! participant rosters change afterwards. Every record has its own lock, and
//! the membership check and roster update of a signup or removal both happen
//! while that lock is held.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::DirectoryError;
use crate::seed;

/// Activity record as exposed on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    /// Informational only, signups are not capped.
    pub max_participants: u32,
    pub participants: Vec<String>,
}

impl Activity {
    pub fn is_signed_up(&self, email: &str) -> bool {
        self.participants.iter().any(|p| p == email)
    }
}

/// Activity name to record mapping shared by all request handlers
#[derive(Debug, Clone)]
pub struct Directory {
    activities: Arc<BTreeMap<String, Mutex<Activity>>>,
}

impl Directory {
    /// Build a directory from `(name, record)` pairs.
    ///
    /// Later entries with an already used name replace earlier ones, and
    /// repeated participant emails within a record are collapsed.
    pub fn new<I>(activities: I) -> Self
    where
        I: IntoIterator<Item = (String, Activity)>,
    {
        let activities = activities
            .into_iter()
            .map(|(name, mut activity)| {
                let mut seen = HashSet::new();
                activity.participants.retain(|p| seen.insert(p.clone()));
                (name, Mutex::new(activity))
            })
            .collect();

        Self {
            activities: Arc::new(activities),
        }
    }

    /// Directory populated with the built-in catalog
    pub fn seeded() -> Self {
        Self::new(seed::activities())
    }

    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.activities.keys().map(String::as_str)
    }

    /// Snapshot of every activity, keyed by name
    pub async fn list(&self) -> BTreeMap<String, Activity> {
        let mut snapshot = BTreeMap::new();
        for (name, record) in self.activities.iter() {
            snapshot.insert(name.clone(), record.lock().await.clone());
        }
        snapshot
    }

    pub async fn get(&self, activity_name: &str) -> Option<Activity> {
        match self.activities.get(activity_name) {
            Some(record) => Some(record.lock().await.clone()),
            None => None,
        }
    }

    /// Add `email` to the roster of `activity_name`.
    pub async fn sign_up(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<String, DirectoryError> {
        let record = self.record(activity_name)?;
        let mut activity = record.lock().await;

        if activity.is_signed_up(email) {
            debug!("{} already signed up for {}", email, activity_name);
            return Err(DirectoryError::AlreadySignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        }

        activity.participants.push(email.to_string());
        info!(
            "Signed up {} for {} ({} participants)",
            email,
            activity_name,
            activity.participants.len()
        );

        Ok(format!("Signed up {} for {}", email, activity_name))
    }

    /// Remove `email` from the roster of `activity_name`.
    pub async fn unregister(
        &self,
        activity_name: &str,
        email: &str,
    ) -> Result<String, DirectoryError> {
        let record = self.record(activity_name)?;
        let mut activity = record.lock().await;

        let Some(position) = activity.participants.iter().position(|p| p == email) else {
            debug!("{} is not signed up for {}", email, activity_name);
            return Err(DirectoryError::NotSignedUp {
                activity: activity_name.to_string(),
                email: email.to_string(),
            });
        };

        activity.participants.remove(position);
        info!(
            "Unregistered {} from {} ({} participants)",
            email,
            activity_name,
            activity.participants.len()
        );

        Ok(format!("Unregistered {} from {}", email, activity_name))
    }

    fn record(&self, activity_name: &str) -> Result<&Mutex<Activity>, DirectoryError> {
        self.activities
            .get(activity_name)
            .ok_or_else(|| DirectoryError::ActivityNotFound {
                activity: activity_name.to_string(),
            })
    }
}

impl Default for Directory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster(participants: &[&str]) -> Activity {
        Activity {
            description: "Test activity".to_string(),
            schedule: "Mondays".to_string(),
            max_participants: 2,
            participants: participants.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_sign_up_appends_participant() {
        let directory = Directory::seeded();

        let message = directory
            .sign_up("Chess Club", "new@mergington.edu")
            .await
            .unwrap();

        assert_eq!(message, "Signed up new@mergington.edu for Chess Club");
        let chess = directory.get("Chess Club").await.unwrap();
        assert_eq!(chess.participants.last().unwrap(), "new@mergington.edu");
    }

    #[tokio::test]
    async fn test_duplicate_sign_up_is_rejected() {
        let directory = Directory::seeded();
        let before = directory.get("Chess Club").await.unwrap();

        let err = directory
            .sign_up("Chess Club", "michael@mergington.edu")
            .await
            .unwrap_err();

        assert!(matches!(err, DirectoryError::AlreadySignedUp { .. }));
        assert_eq!(directory.get("Chess Club").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_unknown_activity_is_not_found() {
        let directory = Directory::seeded();
        let before = directory.list().await;

        let signup = directory.sign_up("NoSuch", "x@y.com").await.unwrap_err();
        let removal = directory.unregister("NoSuch", "x@y.com").await.unwrap_err();

        assert!(matches!(signup, DirectoryError::ActivityNotFound { .. }));
        assert!(matches!(removal, DirectoryError::ActivityNotFound { .. }));
        assert_eq!(directory.list().await, before);
    }

    #[tokio::test]
    async fn test_unregister_keeps_remaining_order() {
        let directory = Directory::new(vec![(
            "Choir".to_string(),
            roster(&["a@x.com", "b@x.com", "c@x.com"]),
        )]);

        let message = directory.unregister("Choir", "b@x.com").await.unwrap();

        assert_eq!(message, "Unregistered b@x.com from Choir");
        let choir = directory.get("Choir").await.unwrap();
        assert_eq!(choir.participants, vec!["a@x.com", "c@x.com"]);
    }

    #[tokio::test]
    async fn test_unregister_non_member_is_rejected() {
        let directory = Directory::seeded();

        let err = directory
            .unregister("Chess Club", "noone@x.com")
            .await
            .unwrap_err();

        assert!(matches!(err, DirectoryError::NotSignedUp { .. }));
    }

    #[tokio::test]
    async fn test_capacity_is_not_enforced() {
        let directory = Directory::new(vec![(
            "Choir".to_string(),
            roster(&["a@x.com", "b@x.com"]),
        )]);

        directory.sign_up("Choir", "c@x.com").await.unwrap();

        let choir = directory.get("Choir").await.unwrap();
        assert_eq!(choir.participants.len(), 3);
        assert_eq!(choir.max_participants, 2);
    }

    #[tokio::test]
    async fn test_new_collapses_repeated_participants() {
        let directory = Directory::new(vec![(
            "Choir".to_string(),
            roster(&["a@x.com", "b@x.com", "a@x.com"]),
        )]);

        let choir = directory.get("Choir").await.unwrap();
        assert_eq!(choir.participants, vec!["a@x.com", "b@x.com"]);
    }

    #[tokio::test]
    async fn test_membership_round_trip() {
        let directory = Directory::seeded();
        let email = "cycle@mergington.edu";

        directory.sign_up("Art Club", email).await.unwrap();
        directory.unregister("Art Club", email).await.unwrap();
        assert!(directory.unregister("Art Club", email).await.is_err());
        directory.sign_up("Art Club", email).await.unwrap();

        assert!(directory.get("Art Club").await.unwrap().is_signed_up(email));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_duplicate_sign_ups_admit_one() {
        let directory = Directory::seeded();

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let directory = directory.clone();
                tokio::spawn(async move {
                    directory
                        .sign_up("Math Club", "racer@mergington.edu")
                        .await
                })
            })
            .collect();

        let mut admitted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                admitted += 1;
            }
        }

        assert_eq!(admitted, 1);
        let math = directory.get("Math Club").await.unwrap();
        let count = math
            .participants
            .iter()
            .filter(|p| p.as_str() == "racer@mergington.edu")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_seeded_directory_is_not_empty() {
        let directory = Directory::seeded();
        assert!(!directory.is_empty());
        assert!(directory.names().any(|name| name == "Chess Club"));
    }
}
