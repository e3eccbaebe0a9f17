//! Explicit session context.
//!
//! Holds the signed-in identity and the selected region in memory.
//! Authentication itself happens at the backend; this only records the
//! identity the caller presents. Invalidation points:
//! - sign-out
//! - expiry, detected on the next read
//! - signing in as someone else
//!
//! Every invalidation resets the dashboard to idle.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::{Dashboard, RegionTicket};
use crate::error::FetchError;
use crate::models::Role;

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Identity presented at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub user: SessionUser,
    pub started_at: DateTime<Utc>,
    pub region_id: Option<String>,
}

impl SessionInfo {
    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.user.expires_at.is_some_and(|exp| exp <= now)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("No active session")]
    NotSignedIn,
    #[error("Session expired")]
    Expired,
    #[error("User id must not be empty")]
    MissingUser,
    #[error("Expiry {0} is already in the past")]
    AlreadyExpired(DateTime<Utc>),
    #[error(transparent)]
    Region(#[from] FetchError),
}

// ═══════════════════════════════════════════════════════════
// SessionContext
// ═══════════════════════════════════════════════════════════

pub struct SessionContext {
    current: RwLock<Option<SessionInfo>>,
    dashboard: Arc<Dashboard>,
}

impl SessionContext {
    pub fn new(dashboard: Arc<Dashboard>) -> Self {
        Self {
            current: RwLock::new(None),
            dashboard,
        }
    }

    pub fn sign_in(&self, user: SessionUser) -> Result<SessionInfo, SessionError> {
        self.sign_in_at(user, Utc::now())
    }

    pub fn sign_in_at(&self, user: SessionUser, now: DateTime<Utc>) -> Result<SessionInfo, SessionError> {
        if user.user_id.trim().is_empty() {
            return Err(SessionError::MissingUser);
        }
        if let Some(exp) = user.expires_at.filter(|exp| *exp <= now) {
            return Err(SessionError::AlreadyExpired(exp));
        }

        let info = SessionInfo {
            session_id: Uuid::new_v4(),
            user,
            started_at: now,
            region_id: None,
        };

        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(info.clone());
        if previous.is_some() {
            self.dashboard.clear();
        }

        tracing::info!(
            session_id = %info.session_id,
            role = info.user.role.as_str(),
            "Session started"
        );
        Ok(info)
    }

    /// Active session, if any. An expired session is invalidated here.
    pub fn current(&self) -> Option<SessionInfo> {
        self.current_at(Utc::now())
    }

    pub fn current_at(&self, now: DateTime<Utc>) -> Option<SessionInfo> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|s| s.is_expired_at(now)) {
            if let Some(expired) = slot.take() {
                tracing::info!(session_id = %expired.session_id, "Session expired");
            }
            drop(slot);
            self.dashboard.clear();
            return None;
        }
        slot.clone()
    }

    /// Record the region on the session and start a new dashboard
    /// generation for it.
    pub fn select_region(&self, region_id: &str) -> Result<RegionTicket, SessionError> {
        self.select_region_at(region_id, Utc::now())
    }

    pub fn select_region_at(
        &self,
        region_id: &str,
        now: DateTime<Utc>,
    ) -> Result<RegionTicket, SessionError> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let session = slot.as_mut().ok_or(SessionError::NotSignedIn)?;
        if session.is_expired_at(now) {
            *slot = None;
            drop(slot);
            self.dashboard.clear();
            return Err(SessionError::Expired);
        }

        let ticket = self.dashboard.select_region(region_id)?;
        session.region_id = Some(ticket.region_id.clone());
        Ok(ticket)
    }

    /// Returns whether a session was active.
    pub fn sign_out(&self) -> bool {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        self.dashboard.clear();
        if let Some(session) = &previous {
            tracing::info!(session_id = %session.session_id, "Session ended");
        }
        previous.is_some()
    }
}
