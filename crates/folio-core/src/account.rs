//! Admin-panel user records.
//!
//! Users are an independent aggregate: nothing links them to the profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  User,
  Admin,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum UserStatus {
  #[default]
  Active,
  Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SubscriptionStatus {
  Active,
  Cancelled,
  Expired,
}

/// What the admin table shows about a user's plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSummary {
  pub plan:       String,
  pub status:     SubscriptionStatus,
  pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
  pub id:           String,
  pub email:        String,
  pub name:         String,
  pub role:         Role,
  pub status:       UserStatus,
  pub created_at:   DateTime<Utc>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subscription: Option<SubscriptionSummary>,
}

impl AdminUser {
  /// A new active user with a random id, created now.
  pub fn new(email: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      email: email.into(),
      name: name.into(),
      role,
      status: UserStatus::Active,
      created_at: Utc::now(),
      subscription: None,
    }
  }

  /// Plan label for the admin table; users without a subscription are on
  /// the free plan.
  pub fn plan_label(&self) -> &str {
    self
      .subscription
      .as_ref()
      .map(|s| s.plan.as_str())
      .unwrap_or("Free")
  }
}

/// Partial update for [`UserRoster::update_user`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email:        Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:         Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub role:         Option<Role>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub status:       Option<UserStatus>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub subscription: Option<SubscriptionSummary>,
}

/// The admin user list, persisted as one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserRoster {
  pub users: Vec<AdminUser>,
}

impl UserRoster {
  pub fn get(&self, id: &str) -> Option<&AdminUser> {
    self.users.iter().find(|u| u.id == id)
  }

  pub fn add_user(&mut self, user: AdminUser) { self.users.push(user); }

  /// Add `user` unless a user with the same id exists. Returns whether it
  /// was added.
  pub fn add_if_absent(&mut self, user: AdminUser) -> bool {
    if self.get(&user.id).is_some() {
      return false;
    }
    self.users.push(user);
    true
  }

  /// Merge `patch` into the matching user and return the result; `None` if
  /// no user has that id.
  pub fn update_user(&mut self, id: &str, patch: UserPatch) -> Option<&AdminUser> {
    let user = self.users.iter_mut().find(|u| u.id == id)?;
    let UserPatch {
      email,
      name,
      role,
      status,
      subscription,
    } = patch;
    if let Some(v) = email {
      user.email = v;
    }
    if let Some(v) = name {
      user.name = v;
    }
    if let Some(v) = role {
      user.role = v;
    }
    if let Some(v) = status {
      user.status = v;
    }
    if subscription.is_some() {
      user.subscription = subscription;
    }
    Some(&*user)
  }

  pub fn set_status(&mut self, id: &str, status: UserStatus) -> Option<&AdminUser> {
    self.update_user(id, UserPatch {
      status: Some(status),
      ..UserPatch::default()
    })
  }

  /// Returns whether a user was removed.
  pub fn delete_user(&mut self, id: &str) -> bool {
    let before = self.users.len();
    self.users.retain(|u| u.id != id);
    self.users.len() != before
  }
}
