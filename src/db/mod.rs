// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Database layer.
//!
//! [`Store`] is the only persistence handle components see. It is passed into
//! each service at construction and dispatches to Firestore in production or
//! to the in-memory backend for local runs and tests.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

use crate::config::{Config, StoreBackend};
use crate::error::AppError;
use crate::models::{AlarmDocument, UserCredential};

/// Collection names as constants.
pub mod collections {
    /// Google credentials, keyed by email
    pub const USERS: &str = "users";
    /// Alarm settings, keyed by alarm id
    pub const ALARMS: &str = "alarms";
}

/// Document store handle (cheap to clone).
#[derive(Clone)]
pub enum Store {
    Firestore(FirestoreStore),
    Memory(MemoryStore),
}

impl Store {
    /// Connect to the backend selected in `config`.
    pub async fn connect(config: &Config) -> Result<Self, AppError> {
        match config.store_backend {
            StoreBackend::Firestore => Ok(Store::Firestore(
                FirestoreStore::new(&config.gcp_project_id, &config.firestore_database).await?,
            )),
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory store; data is lost on restart");
                Ok(Store::Memory(MemoryStore::new()))
            }
        }
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Look up the credential document for an email.
    pub async fn get_credential(&self, email: &str) -> Result<Option<UserCredential>, AppError> {
        match self {
            Store::Firestore(db) => db.get_credential(email).await,
            Store::Memory(db) => Ok(db.get_credential(email)),
        }
    }

    /// Create or fully replace the credential document for `credential.email`.
    pub async fn upsert_credential(&self, credential: &UserCredential) -> Result<(), AppError> {
        match self {
            Store::Firestore(db) => db.upsert_credential(credential).await,
            Store::Memory(db) => {
                db.upsert_credential(credential);
                Ok(())
            }
        }
    }

    /// Overwrite only `google_tokens.access_token`, leaving every other field alone.
    pub async fn set_access_token(&self, email: &str, access_token: &str) -> Result<(), AppError> {
        match self {
            Store::Firestore(db) => db.set_access_token(email, access_token).await,
            Store::Memory(db) => db.set_access_token(email, access_token),
        }
    }

    // ─── Alarm Operations ────────────────────────────────────────

    /// Find the alarm a user has set on an event, if any.
    pub async fn find_alarm_for_event(
        &self,
        email: &str,
        event_id: &str,
    ) -> Result<Option<AlarmDocument>, AppError> {
        match self {
            Store::Firestore(db) => db.find_alarm_for_event(email, event_id).await,
            Store::Memory(db) => Ok(db.find_alarm_for_event(email, event_id)),
        }
    }

    /// Write an alarm document under its own id, replacing any previous content.
    pub async fn put_alarm(&self, alarm: &AlarmDocument) -> Result<(), AppError> {
        match self {
            Store::Firestore(db) => db.put_alarm(alarm).await,
            Store::Memory(db) => {
                db.put_alarm(alarm);
                Ok(())
            }
        }
    }

    /// All alarms owned by `email`, in store order.
    pub async fn list_alarms(&self, email: &str) -> Result<Vec<AlarmDocument>, AppError> {
        match self {
            Store::Firestore(db) => db.list_alarms(email).await,
            Store::Memory(db) => Ok(db.list_alarms(email)),
        }
    }

    /// Delete the alarm with `id` if it belongs to `email`.
    ///
    /// Returns whether a document was deleted.
    pub async fn delete_alarm(&self, id: &str, email: &str) -> Result<bool, AppError> {
        match self {
            Store::Firestore(db) => db.delete_alarm(id, email).await,
            Store::Memory(db) => Ok(db.delete_alarm(id, email)),
        }
    }
}
