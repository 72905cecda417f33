// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{StoreError, StoreResult};
use crate::store::RecordStore;

/// The signed-in user. Every store call that touches user data takes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub email: String,
}

impl Session {
    /// Looks up the profile for `email` and opens a session for it.
    pub fn sign_in(store: &dyn RecordStore, email: &str) -> StoreResult<Session> {
        let email = email.trim();
        let profile = store
            .profile_by_email(email)?
            .ok_or_else(|| StoreError::UnknownUser(email.to_string()))?;
        tracing::debug!(user_id = profile.id, "session opened");
        Ok(Session {
            user_id: profile.id,
            email: profile.email,
        })
    }
}
