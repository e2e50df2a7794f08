// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (Google credentials, keyed by email)
//! - Alarms (per-event alarm settings, keyed by alarm id)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{AlarmDocument, UserCredential};

/// Field path of the access token inside a credential document.
const ACCESS_TOKEN_FIELD: &str = "google_tokens.access_token";

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreStore {
    client: firestore::FirestoreDb,
}

impl FirestoreStore {
    /// Create a new Firestore client for `database` in `project_id`.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str, database: &str) -> Result<Self, AppError> {
        let options = firestore::FirestoreDbOptions::new(project_id.to_string())
            .with_database_id(database.to_string());

        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(options).await;
        }

        let client = firestore::FirestoreDb::with_options(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, database, "Connected to Firestore");

        Ok(Self { client })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(
        options: firestore::FirestoreDbOptions,
    ) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let project = options.google_project_id.clone();
        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = %project,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self { client })
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Get the credential document for an email.
    pub async fn get_credential(&self, email: &str) -> Result<Option<UserCredential>, AppError> {
        self.client
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(email)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace the whole credential document.
    pub async fn upsert_credential(&self, credential: &UserCredential) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&credential.email)
            .object(credential)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Update only the access token, using a field mask so the refresh token
    /// and the rest of the document stay as they are.
    pub async fn set_access_token(&self, email: &str, access_token: &str) -> Result<(), AppError> {
        let patch = serde_json::json!({
            "google_tokens": { "access_token": access_token }
        });

        let _: () = self
            .client
            .fluent()
            .update()
            .fields([ACCESS_TOKEN_FIELD])
            .in_col(collections::USERS)
            .document_id(email)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Alarm Operations ────────────────────────────────────────

    /// Find a user's alarm for one event.
    pub async fn find_alarm_for_event(
        &self,
        email: &str,
        event_id: &str,
    ) -> Result<Option<AlarmDocument>, AppError> {
        let matches: Vec<AlarmDocument> = self
            .client
            .fluent()
            .select()
            .from(collections::ALARMS)
            .filter(|q| {
                q.for_all([
                    q.field("email").eq(email),
                    q.field("event_id").eq(event_id),
                ])
            })
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(matches.into_iter().next())
    }

    /// Store an alarm under its id.
    pub async fn put_alarm(&self, alarm: &AlarmDocument) -> Result<(), AppError> {
        let _: () = self
            .client
            .fluent()
            .update()
            .in_col(collections::ALARMS)
            .document_id(&alarm.id)
            .object(alarm)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get all alarms for a user.
    pub async fn list_alarms(&self, email: &str) -> Result<Vec<AlarmDocument>, AppError> {
        self.client
            .fluent()
            .select()
            .from(collections::ALARMS)
            .filter(|q| q.for_all([q.field("email").eq(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete an alarm if it exists and belongs to `email`.
    pub async fn delete_alarm(&self, id: &str, email: &str) -> Result<bool, AppError> {
        let existing: Option<AlarmDocument> = self
            .client
            .fluent()
            .select()
            .by_id_in(collections::ALARMS)
            .obj()
            .one(id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        match existing {
            Some(alarm) if alarm.email == email => {}
            _ => return Ok(false),
        }

        self.client
            .fluent()
            .delete()
            .from(collections::ALARMS)
            .document_id(id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::debug!(alarm_id = id, "Deleted alarm document");
        Ok(true)
    }
}
