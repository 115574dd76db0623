//! The profile and the Content Block Store operations.
//!
//! All four mutations are total: they never fail and never validate.
//! `contents` order is display order and survives every mutation.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::{
  Error, Result,
  block::{BlockId, BlockPatch, ContentBlock},
};

/// Accent color of a fresh profile.
pub const DEFAULT_ACCENT_COLOR: &str = "#4F46E5";

/// First path segments owned by the server's own pages and API, which a
/// public profile can never be served under.
pub const RESERVED_USERNAMES: &[&str] = &["admin", "api", "dashboard", "pricing"];

/// Visual theme of the public page.
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
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
  #[default]
  Light,
  Dark,
  Custom,
}

/// The single editable identity rendered at `/{username}`.
///
/// Missing fields in a stored document fall back to the defaults, so an old
/// or partial document always rehydrates into a complete profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
  /// Public route key.
  pub username:     String,
  pub display_name: String,
  pub bio:          String,
  /// Image data URI or URL; empty when unset.
  pub avatar:       String,
  pub theme:        Theme,
  /// Hex color string, e.g. `#4F46E5`.
  pub accent_color: String,
  pub contents:     Vec<ContentBlock>,
}

impl Default for Profile {
  fn default() -> Self {
    Self {
      username:     String::new(),
      display_name: String::new(),
      bio:          String::new(),
      avatar:       String::new(),
      theme:        Theme::default(),
      accent_color: DEFAULT_ACCENT_COLOR.to_owned(),
      contents:     Vec::new(),
    }
  }
}

/// Partial update for [`Profile::update_profile`]. There is deliberately no
/// `contents` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub username:     Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub display_name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub bio:          Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub avatar:       Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub theme:        Option<Theme>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub accent_color: Option<String>,
}

impl ProfilePatch {
  pub fn is_empty(&self) -> bool { self == &Self::default() }

  /// Reject a username that collides with a server route. Callers at the
  /// HTTP edge check this before [`Profile::update_profile`], which itself
  /// never validates.
  pub fn check_username(&self) -> Result<()> {
    match &self.username {
      Some(name) if RESERVED_USERNAMES.contains(&name.as_str()) => {
        Err(Error::ReservedUsername(name.clone()))
      }
      _ => Ok(()),
    }
  }
}

impl Profile {
  // ── Mutations ───────────────────────────────────────────────────────────

  /// Shallow-merge the supplied fields. Never touches `contents`.
  pub fn update_profile(&mut self, patch: ProfilePatch) {
    let ProfilePatch {
      username,
      display_name,
      bio,
      avatar,
      theme,
      accent_color,
    } = patch;

    if let Some(v) = username {
      self.username = v;
    }
    if let Some(v) = display_name {
      self.display_name = v;
    }
    if let Some(v) = bio {
      self.bio = v;
    }
    if let Some(v) = avatar {
      self.avatar = v;
    }
    if let Some(v) = theme {
      self.theme = v;
    }
    if let Some(v) = accent_color {
      self.accent_color = v;
    }
  }

  /// Append `block` to the end of `contents`. Identifier uniqueness is the
  /// caller's responsibility.
  pub fn add_content(&mut self, block: ContentBlock) {
    self.contents.push(block);
  }

  /// Remove every block with identifier `id`. Returns whether anything was
  /// removed; a missing identifier leaves the profile untouched.
  pub fn remove_content(&mut self, id: &BlockId) -> bool {
    let before = self.contents.len();
    self.contents.retain(|b| &b.id != id);
    self.contents.len() != before
  }

  /// Merge `patch` into the block with identifier `id`, in place. Returns
  /// whether a block matched.
  pub fn update_content(&mut self, id: &BlockId, patch: BlockPatch) -> bool {
    let mut matched = false;
    for block in self.contents.iter_mut().filter(|b| &b.id == id) {
      block.apply(patch.clone());
      matched = true;
    }
    matched
  }

  // ── Reads ───────────────────────────────────────────────────────────────

  pub fn content(&self, id: &BlockId) -> Option<&ContentBlock> {
    self.contents.iter().find(|b| &b.id == id)
  }

  /// Link blocks carrying a platform tag, in display order.
  pub fn social_links(&self) -> impl Iterator<Item = &ContentBlock> {
    self.contents.iter().filter(|b| b.platform().is_some())
  }

  /// Heading for the public page: the display name, or the username when
  /// no display name is set.
  pub fn display_title(&self) -> &str {
    if self.display_name.is_empty() {
      &self.username
    } else {
      &self.display_name
    }
  }

  /// Whether this profile is the one published at `/{username}`. A profile
  /// without a username is never published.
  pub fn is_published_as(&self, username: &str) -> bool {
    !self.username.is_empty() && self.username == username
  }
}
