//! Session service holding one treatment ledger per analysis session
//!
//! Ledgers are never shared between sessions. Sessions live in memory only
//! and disappear when the server stops.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use shared::TreatmentLedger;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// One user's analysis session
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ledger: TreatmentLedger,
}

/// Result of confirming a treatment
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmTreatmentOutcome {
    pub date: NaiveDate,
    /// False when the date had already been confirmed
    pub newly_confirmed: bool,
    pub ledger: TreatmentLedger,
}

/// In-memory session store
#[derive(Clone, Default)]
pub struct SessionService {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session with an empty ledger
    pub async fn create_session(&self) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            ledger: TreatmentLedger::new(),
        };
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        tracing::info!("Created session {}", session.id);
        session
    }

    /// Get a snapshot of a session
    pub async fn get_session(&self, session_id: Uuid) -> AppResult<Session> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }

    /// Snapshot of the session ledger for one analysis run
    pub async fn ledger(&self, session_id: Uuid) -> AppResult<TreatmentLedger> {
        Ok(self.get_session(session_id).await?.ledger)
    }

    /// Add a treated date to the session ledger (idempotent)
    pub async fn confirm_treatment(
        &self,
        session_id: Uuid,
        date: NaiveDate,
    ) -> AppResult<ConfirmTreatmentOutcome> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound("Session".to_string()))?;

        let newly_confirmed = session.ledger.confirm_treatment(date);
        if newly_confirmed {
            tracing::info!("Session {} confirmed treatment on {}", session_id, date);
        } else {
            tracing::debug!("Session {} already had treatment on {}", session_id, date);
        }

        Ok(ConfirmTreatmentOutcome {
            date,
            newly_confirmed,
            ledger: session.ledger.clone(),
        })
    }

    /// End a session and drop its ledger
    pub async fn end_session(&self, session_id: Uuid) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|_| tracing::info!("Ended session {}", session_id))
            .ok_or_else(|| AppError::NotFound("Session".to_string()))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
