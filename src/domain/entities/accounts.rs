//! # Accounts
//!
//! Platform user accounts. Every module links back to a [`User`] for
//! ownership (wallets, balances, orders) or auditing (verified by,
//! reviewed by, assigned to).

use crate::domain::entities::record::{impl_record, key};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Primary key.
    pub id: Uuid,
    /// Unique login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Can use the admin overview.
    pub is_staff: bool,
    /// Account enabled.
    pub is_active: bool,
    /// Registration time.
    pub date_joined: DateTime<Utc>,
    /// Last successful login.
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Creates an active, non-staff user.
    #[must_use]
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
            last_login: None,
        }
    }

    /// Marks the user as staff.
    #[must_use]
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Full name, falling back to the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

impl_record!(
    User,
    table = "auth_user",
    plural = "users",
    listed_by = date_joined,
    keys = |u| vec![key("username", &u.username)]
);
