// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Daily Diet Tracker: meal logging with diet adherence statistics
//!
//! This crate provides the backend API for registering users, logging
//! meals and keeping each user's in-diet counters and streaks consistent
//! with their meal history.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::FirestoreDb;
use services::AuthService;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(config: Config, db: FirestoreDb) -> Self {
        let auth = AuthService::new(db.clone(), &config);
        Self { config, db, auth }
    }
}
