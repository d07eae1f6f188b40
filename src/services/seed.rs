// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data for local development.
//!
//! Creates one user with a day of meals when the database has no users.
//! Meals go through the regular meal store so the stats stay consistent.

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::db::FirestoreDb;
use crate::error::{AppError, Result};
use crate::models::{CreateMealRequest, MealTime};
use crate::services::AuthService;

pub const DEMO_EMAIL: &str = "leo@mail.com";
pub const DEMO_NAME: &str = "Leo Messi";
pub const DEMO_PASSWORD: &str = "test122";

/// (name, description, HH:MM, in diet), all on the demo date.
const DEMO_MEALS: &[(&str, &str, (u32, u32), bool)] = &[
    ("Healthy Breakfast", "Oatmeal with fruits and honey", (8, 30), true),
    ("Fast Food Lunch", "Double cheeseburger with fries", (12, 45), false),
    ("Healthy Dinner", "Grilled chicken with salad", (19, 0), true),
    ("Late Night Snack", "Chocolate cake and ice cream", (23, 15), false),
];

fn demo_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 1, 15)
}

/// The demo meals as create requests, in insertion order.
pub fn demo_meals() -> Result<Vec<CreateMealRequest>> {
    let date = demo_date()
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Invalid demo date")))?;

    DEMO_MEALS
        .iter()
        .map(|&(name, description, (hour, minute), in_diet)| {
            let time = NaiveTime::from_hms_opt(hour, minute, 0)
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Invalid demo time")))?;
            Ok(CreateMealRequest {
                name: name.to_string(),
                description: Some(description.to_string()),
                date,
                time: MealTime(time),
                in_diet,
            })
        })
        .collect()
}

/// Seed the demo account. Returns `false` if any user already exists.
pub async fn seed_demo_data(db: &FirestoreDb, auth: &AuthService) -> Result<bool> {
    if db.has_users().await? {
        tracing::debug!("Users present, skipping demo seeding");
        return Ok(false);
    }

    let user = auth.register(DEMO_NAME, DEMO_EMAIL, DEMO_PASSWORD).await?;

    for request in demo_meals()? {
        let meal = request.into_meal(user.id, Utc::now());
        db.create_meal_atomic(&meal).await?;
    }

    tracing::info!(user_id = %user.id, email = DEMO_EMAIL, "Demo data seeded");

    Ok(true)
}
