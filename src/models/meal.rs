//! Meal model for storage and API.

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

use crate::models::stats::MealEvent;

/// Stored meal record in Firestore, also returned as-is by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(feature = "binding-generation", ts(export, export_to = "bindings/"))]
pub struct Meal {
    /// Meal ID (also used as document ID)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub id: Uuid,
    /// Owner
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub user_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Calendar day of the meal (YYYY-MM-DD)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub date: NaiveDate,
    /// Time of day of the meal (HH:MM)
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub time: MealTime,
    pub in_diet: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "binding-generation", ts(type = "string"))]
    pub updated_at: DateTime<Utc>,
}

/// Time of day, written as `HH:MM` and read from `HH:MM` or `HH:MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MealTime(pub NaiveTime);

impl MealTime {
    pub fn parse(raw: &str) -> Option<Self> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .ok()
            .map(Self)
    }
}

impl std::fmt::Display for MealTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.second() == 0 {
            write!(f, "{}", self.0.format("%H:%M"))
        } else {
            write!(f, "{}", self.0.format("%H:%M:%S"))
        }
    }
}

impl Serialize for MealTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MealTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        MealTime::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{}', expected HH:MM", raw)))
    }
}

/// Body of `POST /meals/new`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMealRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    pub date: NaiveDate,
    pub time: MealTime,
    /// Required: a missing flag is rejected, never defaulted.
    pub in_diet: bool,
}

impl CreateMealRequest {
    pub fn into_meal(self, user_id: Uuid, now: DateTime<Utc>) -> Meal {
        Meal {
            id: Uuid::new_v4(),
            user_id,
            name: self.name,
            description: self.description,
            date: self.date,
            time: self.time,
            in_diet: self.in_diet,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of `PATCH /meals/edit/{meal_id}`.
///
/// Every field is optional; an absent field leaves the stored value alone.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MealPatch {
    #[serde(default)]
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<MealTime>,
    #[serde(default)]
    pub in_diet: Option<bool>,
}

impl MealPatch {
    /// Apply the present fields to `meal`.
    ///
    /// Returns the stats event when the in-diet flag actually changed.
    pub fn apply(self, meal: &mut Meal, now: DateTime<Utc>) -> Option<MealEvent> {
        let was_in_diet = meal.in_diet;

        if let Some(name) = self.name {
            meal.name = name;
        }
        if let Some(description) = self.description {
            meal.description = Some(description);
        }
        if let Some(date) = self.date {
            meal.date = date;
        }
        if let Some(time) = self.time {
            meal.time = time;
        }
        if let Some(in_diet) = self.in_diet {
            meal.in_diet = in_diet;
        }
        meal.updated_at = now;

        (meal.in_diet != was_in_diet).then_some(MealEvent::Edited {
            was_in_diet,
            in_diet: meal.in_diet,
        })
    }
}
