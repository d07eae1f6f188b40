// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod meal;
pub mod refresh_token;
pub mod stats;
pub mod user;

pub use meal::{CreateMealRequest, Meal, MealPatch, MealTime};
pub use refresh_token::{RefreshToken, TokenState};
pub use stats::{MealEvent, UserStats};
pub use user::{EmailIndex, User, UserResponse};
