//! The fixed catalogue of social networks offered by the editor.
//!
//! A social link is an ordinary `link` block whose platform tag names one of
//! these networks.

use std::str::FromStr as _;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator as _};

use crate::{
  Error, Result,
  block::{BlockBody, BlockId, ContentBlock},
};

#[derive(
  Debug,
  Clone,
  Copy,
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
pub enum SocialPlatform {
  Facebook,
  Twitter,
  Instagram,
  LinkedIn,
  YouTube,
  GitHub,
  Website,
}

impl SocialPlatform {
  pub fn display_name(self) -> &'static str {
    match self {
      Self::Facebook => "Facebook",
      Self::Twitter => "Twitter",
      Self::Instagram => "Instagram",
      Self::LinkedIn => "LinkedIn",
      Self::YouTube => "YouTube",
      Self::GitHub => "GitHub",
      Self::Website => "Website",
    }
  }

  /// Example URL shown in the editor's input.
  pub fn placeholder(self) -> &'static str {
    match self {
      Self::Facebook => "https://facebook.com/username",
      Self::Twitter => "https://twitter.com/username",
      Self::Instagram => "https://instagram.com/username",
      Self::LinkedIn => "https://linkedin.com/in/username",
      Self::YouTube => "https://youtube.com/@username",
      Self::GitHub => "https://github.com/username",
      Self::Website => "https://yourwebsite.com",
    }
  }

  /// Parse a platform id such as `"github"`.
  pub fn parse(id: &str) -> Result<Self> {
    Self::from_str(id).map_err(|_| Error::UnknownPlatform(id.to_owned()))
  }

  /// Look up the catalogue entry for a block's free-text platform tag.
  pub fn for_tag(tag: &str) -> Option<Self> {
    Self::iter().find(|p| p.to_string() == tag)
  }

  /// A link block titled with this network's name and tagged with its id.
  pub fn link_block(self, id: BlockId, url: impl Into<String>) -> Result<ContentBlock> {
    let url = url.into();
    if url.trim().is_empty() {
      return Err(Error::MissingUrl);
    }
    Ok(ContentBlock::new(id, self.display_name(), BlockBody::Link {
      url,
      platform: Some(self.to_string()),
    }))
  }
}
