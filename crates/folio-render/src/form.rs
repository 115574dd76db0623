//! The dashboard's forms: the inputs each block kind needs, and the flat
//! records browsers post back for blocks, the profile and social links.

use folio_core::{
  Error, Result,
  block::{BlockDraft, BlockId, BlockKind, BlockSettings, ContactType, ContentBlock, MAP_ZOOM_RANGE},
  profile::ProfilePatch,
  social::SocialPlatform,
};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;

use crate::escape::hex_color;

fn present(s: &str) -> Option<String> {
  let trimmed = s.trim();
  (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ─── Add block ───────────────────────────────────────────────────────────────

/// The add-block form as posted by a browser. Settings arrive as top-level
/// fields, and empty inputs arrive as empty strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftForm {
  #[serde(rename = "type")]
  pub kind:         Option<BlockKind>,
  #[serde(default)]
  pub title:        String,
  #[serde(default)]
  pub content:      String,
  #[serde(default)]
  pub image_alt:    String,
  #[serde(default)]
  pub map_zoom:     String,
  #[serde(default)]
  pub contact_type: String,
  #[serde(default)]
  pub html_height:  String,
}

impl DraftForm {
  /// The draft this form describes. Blank inputs are treated as absent and
  /// a non-numeric zoom or unknown contact type is dropped. A numeric zoom
  /// too large for any map is rejected here, since the draft cannot hold it.
  pub fn into_draft(self) -> Result<BlockDraft> {
    let map_zoom = match self.map_zoom.trim().parse::<i64>() {
      Ok(zoom) => Some(u8::try_from(zoom).map_err(|_| Error::ZoomOutOfRange(zoom))?),
      Err(_) => None,
    };
    let settings = BlockSettings {
      image_alt: present(&self.image_alt),
      map_zoom,
      contact_type: self.contact_type.trim().parse::<ContactType>().ok(),
      html_height: present(&self.html_height),
    };
    Ok(BlockDraft {
      kind: self.kind.unwrap_or(BlockKind::Link),
      title: self.title,
      content: self.content,
      platform: None,
      settings,
    })
  }
}

/// One input of the add-block form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
  pub name:        &'static str,
  pub label:       &'static str,
  /// An `<input type>`, or `textarea` / `select`.
  pub input:       &'static str,
  pub placeholder: &'static str,
  pub required:    bool,
  pub options:     Vec<String>,
  pub min:         Option<u8>,
  pub max:         Option<u8>,
}

impl Field {
  fn new(
    name: &'static str,
    label: &'static str,
    input: &'static str,
    placeholder: &'static str,
  ) -> Self {
    Self {
      name,
      label,
      input,
      placeholder,
      required: false,
      options: Vec::new(),
      min: None,
      max: None,
    }
  }

  fn required(mut self) -> Self {
    self.required = true;
    self
  }
}

/// The inputs the add-block form shows for `kind`, title first.
pub fn form_fields(kind: BlockKind) -> Vec<Field> {
  let mut fields = Vec::new();
  if kind.requires_title() {
    fields.push(Field::new("title", "Title", "text", "Enter a title").required());
  }

  match kind {
    BlockKind::Link => {
      fields.push(Field::new("content", "URL", "url", "https://example.com").required());
    }

    BlockKind::Image => {
      fields.push(
        Field::new(
          "content",
          "Image URL",
          "text",
          "https://… or a data URI from /api/uploads",
        )
        .required(),
      );
      fields.push(Field::new("imageAlt", "Alt text", "text", "Describe the image"));
    }

    BlockKind::Html => {
      fields.push(Field::new("content", "HTML Code", "textarea", "<iframe …></iframe>").required());
      fields.push(Field::new("htmlHeight", "Height", "text", "e.g., 400px"));
    }

    BlockKind::Map => {
      fields.push(
        Field::new(
          "content",
          "Google Maps Embed URL",
          "url",
          "https://www.google.com/maps/embed?pb=…",
        )
        .required(),
      );
      fields.push(Field {
        min: Some(*MAP_ZOOM_RANGE.start()),
        max: Some(*MAP_ZOOM_RANGE.end()),
        ..Field::new("mapZoom", "Zoom", "number", "14")
      });
    }

    BlockKind::Contact => {
      fields.push(Field {
        options: ContactType::iter().map(|t| t.to_string()).collect(),
        ..Field::new("contactType", "Contact Type", "select", "")
      });
      fields.push(Field::new("content", "Contact Information", "text", "+1 555 0100").required());
    }

    BlockKind::Divider => {}
  }
  fields
}

// ─── Profile ─────────────────────────────────────────────────────────────────

/// The profile editor's text fields. The form is multipart (it carries the
/// avatar file), so fields are recorded one at a time as they arrive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
  pub username:     Option<String>,
  pub display_name: Option<String>,
  pub bio:          Option<String>,
  pub theme:        Option<String>,
  pub accent_color: Option<String>,
}

impl ProfileForm {
  /// Record one posted field; unknown names are ignored.
  pub fn set(&mut self, name: &str, value: String) {
    let slot = match name {
      "username" => &mut self.username,
      "displayName" => &mut self.display_name,
      "bio" => &mut self.bio,
      "theme" => &mut self.theme,
      "accentColor" => &mut self.accent_color,
      _ => return,
    };
    *slot = Some(value);
  }

  /// The patch this form describes, with `avatar` as the new avatar if one
  /// was uploaded. An unknown theme or a malformed color is left unchanged.
  pub fn into_patch(self, avatar: Option<String>) -> ProfilePatch {
    ProfilePatch {
      username: self.username.map(|s| s.trim().to_owned()),
      display_name: self.display_name.map(|s| s.trim().to_owned()),
      bio: self.bio,
      avatar,
      theme: self.theme.and_then(|t| t.trim().parse().ok()),
      accent_color: self
        .accent_color
        .and_then(|c| hex_color(c.trim()).map(str::to_owned)),
    }
  }
}

// ─── Social links ────────────────────────────────────────────────────────────

/// The add-social-link form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocialForm {
  #[serde(default)]
  pub platform: String,
  #[serde(default)]
  pub url:      String,
}

impl SocialForm {
  pub fn into_block(self, id: BlockId) -> Result<ContentBlock> {
    SocialPlatform::parse(self.platform.trim())?.link_block(id, self.url.trim())
  }
}
