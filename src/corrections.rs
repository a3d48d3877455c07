use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tokio::sync::RwLock;

/// Votes a correction needs before it may be applied to the menu.
pub const APPROVAL_THRESHOLD: usize = 5;

pub type CorrectionId = u64;
pub type VoterId = String;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrectionError {
    #[error("Correction is invalid: {0}")]
    Invalid(&'static str),

    #[error("Correction needs at least {required} votes to be applied, it has {votes}")]
    NotEnoughVotes { votes: usize, required: usize },

    #[error("Correction {0} does not exist")]
    NotFound(CorrectionId),
}

/// One menu slot that corrections are filed against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuSlot {
    pub date: NaiveDate,
    pub meal: String,
}

impl MenuSlot {
    pub fn new(date: NaiveDate, meal: &str) -> Self {
        Self {
            date,
            meal: meal.trim().to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectionKind {
    Replace { original: String, new: String },
    Add { new: String },
    Remove { original: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionStatus {
    Pending,
    Applied,
}

#[derive(Debug, Clone)]
pub struct NewCorrection {
    pub slot: MenuSlot,
    pub kind: CorrectionKind,
    pub reason: String,
    pub submitted_by: VoterId,
}

#[derive(Debug, Clone)]
pub struct Correction {
    pub id: CorrectionId,
    pub slot: MenuSlot,
    pub kind: CorrectionKind,
    pub reason: String,
    pub submitted_by: VoterId,
    pub submitted_at: DateTime<Utc>,
    pub voters: BTreeSet<VoterId>,
    pub status: CorrectionStatus,
}

impl Correction {
    pub fn votes(&self) -> usize {
        self.voters.len()
    }

    pub fn has_voted(&self, voter: &str) -> bool {
        self.voters.contains(voter)
    }
}

impl NewCorrection {
    pub fn validate(&self) -> Result<(), CorrectionError> {
        match &self.kind {
            CorrectionKind::Replace { original, .. } | CorrectionKind::Remove { original }
                if is_blank(original) =>
            {
                return Err(CorrectionError::Invalid("an item to modify is required"));
            }
            CorrectionKind::Replace { new, .. } | CorrectionKind::Add { new } if is_blank(new) => {
                return Err(CorrectionError::Invalid("the new item name is required"));
            }
            _ => {}
        }

        if is_blank(&self.reason) {
            return Err(CorrectionError::Invalid("a reason is required"));
        }

        Ok(())
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Applies an approved correction to a meal's item list.
pub fn apply_correction(
    items: &[String],
    correction: &Correction,
) -> Result<Vec<String>, CorrectionError> {
    if correction.votes() < APPROVAL_THRESHOLD {
        return Err(CorrectionError::NotEnoughVotes {
            votes: correction.votes(),
            required: APPROVAL_THRESHOLD,
        });
    }

    let updated = match &correction.kind {
        CorrectionKind::Replace { original, new } => items
            .iter()
            .map(|item| if item == original { new.clone() } else { item.clone() })
            .collect(),
        CorrectionKind::Add { new } => {
            let mut updated = items.to_vec();
            if !updated.contains(new) {
                updated.push(new.clone());
            }
            updated
        }
        CorrectionKind::Remove { original } => items
            .iter()
            .filter(|item| *item != original)
            .cloned()
            .collect(),
    };

    Ok(updated)
}

#[async_trait]
pub trait CorrectionStore: Send + Sync {
    async fn submit(&self, correction: NewCorrection) -> anyhow::Result<CorrectionId>;
    async fn get(&self, id: CorrectionId) -> Option<Correction>;
    async fn list(&self, slot: &MenuSlot) -> Vec<Correction>;
    /// Adds the voter's vote, or takes it back if they already voted.
    async fn toggle_vote(&self, id: CorrectionId, voter: &str) -> anyhow::Result<Correction>;
    async fn mark_applied(&self, id: CorrectionId) -> anyhow::Result<Correction>;
}

pub struct InMemoryCorrectionStore {
    store: RwLock<(CorrectionId, HashMap<CorrectionId, Correction>)>,
}

impl InMemoryCorrectionStore {
    pub fn new() -> Self {
        InMemoryCorrectionStore {
            store: RwLock::new((0, HashMap::new())),
        }
    }
}

impl Default for InMemoryCorrectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CorrectionStore for InMemoryCorrectionStore {
    async fn submit(&self, correction: NewCorrection) -> anyhow::Result<CorrectionId> {
        correction.validate()?;

        let mut store = self.store.write().await;
        let id = store.0;
        let inserted = Correction {
            id,
            slot: correction.slot,
            kind: correction.kind,
            reason: correction.reason.trim().to_string(),
            submitted_by: correction.submitted_by,
            submitted_at: Utc::now(),
            voters: BTreeSet::new(),
            status: CorrectionStatus::Pending,
        };
        store.1.insert(id, inserted);
        store.0 += 1;

        log::info!("Stored menu correction. [correction_id = {}]", id);
        Ok(id)
    }

    async fn get(&self, id: CorrectionId) -> Option<Correction> {
        let store = self.store.read().await;
        store.1.get(&id).cloned()
    }

    async fn list(&self, slot: &MenuSlot) -> Vec<Correction> {
        let store = self.store.read().await;
        let mut corrections: Vec<_> = store
            .1
            .values()
            .filter(|c| c.slot == *slot)
            .cloned()
            .collect();
        corrections.sort_by_key(|c| c.id);
        corrections
    }

    async fn toggle_vote(&self, id: CorrectionId, voter: &str) -> anyhow::Result<Correction> {
        let mut store = self.store.write().await;
        let correction = store.1.get_mut(&id).ok_or(CorrectionError::NotFound(id))?;

        if !correction.voters.remove(voter) {
            correction.voters.insert(voter.to_string());
        }

        Ok(correction.clone())
    }

    async fn mark_applied(&self, id: CorrectionId) -> anyhow::Result<Correction> {
        let mut store = self.store.write().await;
        let correction = store.1.get_mut(&id).ok_or(CorrectionError::NotFound(id))?;

        if correction.votes() < APPROVAL_THRESHOLD {
            anyhow::bail!(CorrectionError::NotEnoughVotes {
                votes: correction.votes(),
                required: APPROVAL_THRESHOLD,
            });
        }

        correction.status = CorrectionStatus::Applied;
        Ok(correction.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot() -> MenuSlot {
        MenuSlot::new(NaiveDate::from_ymd_opt(2025, 6, 4).unwrap(), "Dinner")
    }

    fn items() -> Vec<String> {
        vec!["Rice".to_string(), "Dal".to_string(), "Aloo Fry".to_string()]
    }

    fn replace_dal() -> NewCorrection {
        NewCorrection {
            slot: slot(),
            kind: CorrectionKind::Replace {
                original: "Dal".to_string(),
                new: "Sambar".to_string(),
            },
            reason: " Served sambar today ".to_string(),
            submitted_by: "student-0".to_string(),
        }
    }

    async fn approved(store: &InMemoryCorrectionStore, correction: NewCorrection) -> Correction {
        let id = store.submit(correction).await.unwrap();
        for voter in 0..APPROVAL_THRESHOLD {
            store.toggle_vote(id, &format!("student-{voter}")).await.unwrap();
        }
        store.get(id).await.unwrap()
    }

    #[test]
    fn validation_requires_items_and_reason() {
        let mut correction = replace_dal();
        correction.reason = "   ".to_string();
        assert_eq!(
            correction.validate(),
            Err(CorrectionError::Invalid("a reason is required"))
        );

        let mut correction = replace_dal();
        correction.kind = CorrectionKind::Remove {
            original: "".to_string(),
        };
        assert!(correction.validate().is_err());

        let mut correction = replace_dal();
        correction.kind = CorrectionKind::Add {
            new: " ".to_string(),
        };
        assert!(correction.validate().is_err());

        assert!(replace_dal().validate().is_ok());
    }

    #[tokio::test]
    async fn invalid_corrections_are_not_stored() {
        let store = InMemoryCorrectionStore::new();
        let mut correction = replace_dal();
        correction.reason.clear();

        assert!(store.submit(correction).await.is_err());
        assert!(store.list(&slot()).await.is_empty());
    }

    #[tokio::test]
    async fn voting_twice_takes_the_vote_back() {
        let store = InMemoryCorrectionStore::new();
        let id = store.submit(replace_dal()).await.unwrap();

        let voted = store.toggle_vote(id, "student-1").await.unwrap();
        assert_eq!(voted.votes(), 1);
        assert!(voted.has_voted("student-1"));

        let unvoted = store.toggle_vote(id, "student-1").await.unwrap();
        assert_eq!(unvoted.votes(), 0);
    }

    #[tokio::test]
    async fn unknown_correction_cannot_be_voted() {
        let store = InMemoryCorrectionStore::new();

        assert!(store.toggle_vote(42, "student-1").await.is_err());
    }

    #[tokio::test]
    async fn list_filters_by_slot() {
        let store = InMemoryCorrectionStore::new();
        store.submit(replace_dal()).await.unwrap();
        let mut lunch = replace_dal();
        lunch.slot = MenuSlot::new(slot().date, "lunch");
        store.submit(lunch).await.unwrap();

        let dinner = store.list(&MenuSlot::new(slot().date, " DINNER ")).await;

        assert_eq!(dinner.len(), 1);
        assert_eq!(dinner[0].reason, "Served sambar today");
    }

    #[tokio::test]
    async fn correction_below_threshold_is_rejected() {
        let store = InMemoryCorrectionStore::new();
        let id = store.submit(replace_dal()).await.unwrap();
        let correction = store.toggle_vote(id, "student-1").await.unwrap();

        assert_eq!(
            apply_correction(&items(), &correction),
            Err(CorrectionError::NotEnoughVotes {
                votes: 1,
                required: APPROVAL_THRESHOLD
            })
        );
        assert!(store.mark_applied(id).await.is_err());
    }

    #[tokio::test]
    async fn approved_replace_swaps_item() {
        let store = InMemoryCorrectionStore::new();
        let correction = approved(&store, replace_dal()).await;

        let updated = apply_correction(&items(), &correction).unwrap();
        let applied = store.mark_applied(correction.id).await.unwrap();

        assert_eq!(updated, ["Rice", "Sambar", "Aloo Fry"]);
        assert_eq!(applied.status, CorrectionStatus::Applied);
    }

    #[tokio::test]
    async fn approved_add_skips_existing_items() {
        let store = InMemoryCorrectionStore::new();
        let mut add_rice = replace_dal();
        add_rice.kind = CorrectionKind::Add {
            new: "Rice".to_string(),
        };
        let mut add_curd = replace_dal();
        add_curd.kind = CorrectionKind::Add {
            new: "Curd".to_string(),
        };

        let add_rice = approved(&store, add_rice).await;
        let add_curd = approved(&store, add_curd).await;

        assert_eq!(apply_correction(&items(), &add_rice).unwrap(), items());
        assert_eq!(
            apply_correction(&items(), &add_curd).unwrap(),
            ["Rice", "Dal", "Aloo Fry", "Curd"]
        );
    }

    #[tokio::test]
    async fn approved_remove_drops_item() {
        let store = InMemoryCorrectionStore::new();
        let mut remove = replace_dal();
        remove.kind = CorrectionKind::Remove {
            original: "Aloo Fry".to_string(),
        };

        let remove = approved(&store, remove).await;

        assert_eq!(apply_correction(&items(), &remove).unwrap(), ["Rice", "Dal"]);
    }
}
