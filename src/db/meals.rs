// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Meal store.
//!
//! Every meal mutation runs in one Firestore transaction together with the
//! read-modify-write of `user_stats/{user_id}`. When two requests for the
//! same user race, Firestore aborts one transaction and retries it with
//! fresh data, so no stats update is lost.

use chrono::Utc;
use uuid::Uuid;

use crate::db::{collections, FirestoreDb};
use crate::error::{AppError, Result};
use crate::models::{Meal, MealEvent, MealPatch, User, UserStats};

impl FirestoreDb {
    /// Get a meal owned by `user_id`.
    ///
    /// Meals of other users are reported as not found.
    pub async fn get_meal(&self, user_id: Uuid, meal_id: Uuid) -> Result<Meal> {
        let meal: Option<Meal> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::MEALS)
            .obj()
            .one(&meal_id.to_string())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        meal.filter(|m| m.user_id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("no meal with id -> {}", meal_id)))
    }

    /// List a user's meals, oldest first.
    pub async fn list_meals(&self, user_id: Uuid) -> Result<Vec<Meal>> {
        let owner = user_id.to_string();

        let mut meals: Vec<Meal> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::MEALS)
            .filter(move |q| q.for_all([q.field("user_id").eq(owner.clone())]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        // Sorted in memory to avoid a composite index on (user_id, date, time)
        meals.sort_by(|a, b| {
            (a.date, a.time, a.created_at).cmp(&(b.date, b.time, b.created_at))
        });

        Ok(meals)
    }

    /// Atomically store a new meal and fold it into the user's stats.
    ///
    /// The stats document is created with zero values on the user's first
    /// meal. Returns the stats as committed.
    pub async fn create_meal_atomic(&self, meal: &Meal) -> Result<UserStats> {
        let meal = meal.clone();

        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let meal = meal.clone();
                Box::pin(async move {
                    let owner: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&meal.user_id.to_string())
                        .await?;

                    if owner.is_none() {
                        return Ok(Err(AppError::NotFound(format!(
                            "no user with id -> {}",
                            meal.user_id
                        ))));
                    }

                    let current: Option<UserStats> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_STATS)
                        .obj()
                        .one(&meal.user_id.to_string())
                        .await?;

                    let mut stats = current.unwrap_or_else(|| UserStats::empty(meal.user_id));
                    stats.apply(MealEvent::Created {
                        in_diet: meal.in_diet,
                    });
                    stats.updated_at = Some(Utc::now());

                    db.fluent()
                        .update()
                        .in_col(collections::MEALS)
                        .document_id(meal.id.to_string())
                        .object(&meal)
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::USER_STATS)
                        .document_id(meal.user_id.to_string())
                        .object(&stats)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(stats))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Meal creation transaction failed: {}", e)))?;

        let stats = outcome?;

        tracing::info!(
            user_id = %meal.user_id,
            meal_id = %meal.id,
            in_diet = meal.in_diet,
            registered_meals = stats.registered_meals,
            current_streak = stats.current_streak,
            "Meal created atomically"
        );

        Ok(stats)
    }

    /// Atomically apply a partial update to a meal.
    ///
    /// Only the owner may edit. When the in-diet flag changes the stats are
    /// reconciled in the same transaction; streaks are left untouched.
    pub async fn edit_meal_atomic(
        &self,
        user_id: Uuid,
        meal_id: Uuid,
        patch: MealPatch,
    ) -> Result<Meal> {
        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                let patch = patch.clone();
                Box::pin(async move {
                    let found: Option<Meal> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::MEALS)
                        .obj()
                        .one(&meal_id.to_string())
                        .await?;

                    let mut meal = match found {
                        Some(meal) => meal,
                        None => {
                            return Ok(Err(AppError::NotFound(format!(
                                "no meal with id -> {}",
                                meal_id
                            ))))
                        }
                    };

                    if meal.user_id != user_id {
                        return Ok(Err(AppError::Forbidden(
                            "you are not allowed to edit this meal".to_string(),
                        )));
                    }

                    let now = Utc::now();
                    let event = patch.apply(&mut meal, now);

                    if let Some(event) = event {
                        let current: Option<UserStats> = db
                            .fluent()
                            .select()
                            .by_id_in(collections::USER_STATS)
                            .obj()
                            .one(&user_id.to_string())
                            .await?;

                        let mut stats = current.unwrap_or_else(|| UserStats::empty(user_id));
                        stats.apply(event);
                        stats.updated_at = Some(now);

                        db.fluent()
                            .update()
                            .in_col(collections::USER_STATS)
                            .document_id(user_id.to_string())
                            .object(&stats)
                            .add_to_transaction(transaction)?;
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::MEALS)
                        .document_id(meal_id.to_string())
                        .object(&meal)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(meal))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Meal edit transaction failed: {}", e)))?;

        let meal = outcome?;
        tracing::info!(user_id = %user_id, meal_id = %meal_id, in_diet = meal.in_diet, "Meal edited");

        Ok(meal)
    }

    /// Atomically delete a meal and fold the deletion into the stats.
    pub async fn delete_meal_atomic(&self, user_id: Uuid, meal_id: Uuid) -> Result<()> {
        let outcome = self
            .get_client()?
            .run_transaction(|db, transaction| {
                Box::pin(async move {
                    let found: Option<Meal> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::MEALS)
                        .obj()
                        .one(&meal_id.to_string())
                        .await?;

                    let meal = match found {
                        Some(meal) => meal,
                        None => {
                            return Ok(Err(AppError::NotFound(format!(
                                "no meal with id -> {}",
                                meal_id
                            ))))
                        }
                    };

                    if meal.user_id != user_id {
                        return Ok(Err(AppError::Forbidden(
                            "you are not allowed to delete this meal".to_string(),
                        )));
                    }

                    let current: Option<UserStats> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USER_STATS)
                        .obj()
                        .one(&user_id.to_string())
                        .await?;

                    if current.is_none() {
                        tracing::info!(user_id = %user_id, "No stats found, initializing with zero values");
                    }

                    let mut stats = current.unwrap_or_else(|| UserStats::empty(user_id));
                    stats.apply(MealEvent::Deleted {
                        was_in_diet: meal.in_diet,
                    });
                    stats.updated_at = Some(Utc::now());

                    db.fluent()
                        .delete()
                        .from(collections::MEALS)
                        .document_id(meal_id.to_string())
                        .add_to_transaction(transaction)?;

                    db.fluent()
                        .update()
                        .in_col(collections::USER_STATS)
                        .document_id(user_id.to_string())
                        .object(&stats)
                        .add_to_transaction(transaction)?;

                    Ok(Ok(()))
                })
            })
            .await
            .map_err(|e| AppError::Database(format!("Meal deletion transaction failed: {}", e)))?;

        outcome?;
        tracing::info!(user_id = %user_id, meal_id = %meal_id, "Meal deleted");

        Ok(())
    }
}
