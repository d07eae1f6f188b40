//! User statistics aggregates for the stats endpoint.
//!
//! These aggregates are reconciled incrementally when meals are created,
//! edited or deleted, so reading them is a single document lookup.
//!
//! The reconciliation only sees the delta of each mutation, so two
//! approximations apply:
//! - a delete is folded into the streaks as if the deleted meal had just
//!   been appended;
//! - an edit never touches the streaks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// A meal mutation as seen by the reconciliation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealEvent {
    Created { in_diet: bool },
    Edited { was_in_diet: bool, in_diet: bool },
    Deleted { was_in_diet: bool },
}

/// Pre-computed statistics for a user.
///
/// Stored at: `user_stats/{user_id}`
///
/// Created lazily on the user's first meal and updated atomically with
/// every meal write via Firestore transactions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct UserStats {
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub user_id: Uuid,
    /// Meals created minus meals deleted
    #[serde(default)]
    pub registered_meals: u32,
    /// Meals currently flagged in-diet
    #[serde(default)]
    pub in_diet_meals: u32,
    /// Trailing run of in-diet meals
    #[serde(default)]
    pub current_streak: u32,
    /// Highest current streak ever observed
    #[serde(default)]
    pub max_streak: u32,
    #[serde(default)]
    #[cfg_attr(feature = "binding-generation", ts(type = "string | null"))]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserStats {
    /// Zero-valued stats for a user that has no meals yet.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// Return the stats that follow `event`.
    pub fn reconcile(&self, event: MealEvent) -> Self {
        let mut next = self.clone();
        next.apply(event);
        next
    }

    /// Apply `event` in place.
    pub fn apply(&mut self, event: MealEvent) {
        match event {
            MealEvent::Created { in_diet } => {
                self.registered_meals += 1;
                if in_diet {
                    self.in_diet_meals += 1;
                }
                self.advance_streaks(in_diet);
            }
            MealEvent::Deleted { was_in_diet } => {
                self.registered_meals = self.registered_meals.saturating_sub(1);
                if was_in_diet {
                    self.in_diet_meals = self.in_diet_meals.saturating_sub(1);
                }
                self.advance_streaks(was_in_diet);
            }
            MealEvent::Edited {
                was_in_diet,
                in_diet,
            } => match (was_in_diet, in_diet) {
                (false, true) => self.in_diet_meals += 1,
                (true, false) => self.in_diet_meals = self.in_diet_meals.saturating_sub(1),
                _ => {}
            },
        }
    }

    /// Fold one meal flag into the streaks.
    ///
    /// The max streak is computed from the previous current streak, so an
    /// in-diet meal on a zero record yields exactly 1, and an out-of-diet
    /// meal never moves the max.
    fn advance_streaks(&mut self, in_diet: bool) {
        if in_diet {
            let extended = self.current_streak + 1;
            self.max_streak = self.max_streak.max(extended);
            self.current_streak = extended;
        } else {
            self.current_streak = 0;
        }
    }
}
