// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory document store.
//!
//! Mirrors the Firestore collections with one map per collection. Each
//! single-document operation is atomic; nothing spans documents.

use crate::error::AppError;
use crate::models::{AlarmDocument, UserCredential};
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Default)]
struct Collections {
    users: DashMap<String, UserCredential>,
    alarms: DashMap<String, AlarmDocument>,
    writes: AtomicUsize,
}

/// Process-local store. Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of writes so far: upserts, partial updates, puts, and deletes
    /// that removed a document.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get_credential(&self, email: &str) -> Option<UserCredential> {
        self.inner.users.get(email).map(|c| c.clone())
    }

    pub fn upsert_credential(&self, credential: &UserCredential) {
        self.record_write();
        self.inner
            .users
            .insert(credential.email.clone(), credential.clone());
    }

    pub fn set_access_token(&self, email: &str, access_token: &str) -> Result<(), AppError> {
        self.record_write();
        let mut entry = self
            .inner
            .users
            .get_mut(email)
            .ok_or_else(|| AppError::Database(format!("No credential document for {}", email)))?;

        let tokens = entry.google_tokens.as_mut().ok_or_else(|| {
            AppError::Database(format!("Credential for {} has no token bundle", email))
        })?;
        tokens.access_token = access_token.to_string();
        Ok(())
    }

    pub fn find_alarm_for_event(&self, email: &str, event_id: &str) -> Option<AlarmDocument> {
        self.inner
            .alarms
            .iter()
            .find(|a| a.email == email && a.event_id == event_id)
            .map(|a| a.value().clone())
    }

    pub fn put_alarm(&self, alarm: &AlarmDocument) {
        self.record_write();
        self.inner.alarms.insert(alarm.id.clone(), alarm.clone());
    }

    pub fn list_alarms(&self, email: &str) -> Vec<AlarmDocument> {
        self.inner
            .alarms
            .iter()
            .filter(|a| a.email == email)
            .map(|a| a.value().clone())
            .collect()
    }

    pub fn delete_alarm(&self, id: &str, email: &str) -> bool {
        let removed = self
            .inner
            .alarms
            .remove_if(id, |_, alarm| alarm.email == email)
            .is_some();
        if removed {
            self.record_write();
        }
        removed
    }
}
