//! Content blocks: the typed entries of a profile's display sequence.
//!
//! A block is a closed sum over six kinds. Kind-specific settings only exist
//! on the matching [`BlockBody`] variant. The flat record used on the wire and
//! in storage (`{"id","type","title","content","platform","settings"}`) is
//! mapped onto the variant at the decoding boundary; settings that do not
//! apply to the block's kind are dropped there.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::{Error, Result};

/// Title given to dividers, which have no title input of their own.
pub const DIVIDER_TITLE: &str = "Divider";

/// Valid map zoom levels.
pub const MAP_ZOOM_RANGE: std::ops::RangeInclusive<u8> = 1..=20;

// ─── Identifier ──────────────────────────────────────────────────────────────

/// Identifier of a block, unique within one profile.
///
/// Opaque to the store; callers either supply their own token or use
/// [`BlockId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
  pub fn new(id: impl Into<String>) -> Self { Self(id.into()) }

  /// A fresh random identifier.
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BlockId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for BlockId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

impl From<String> for BlockId {
  fn from(s: String) -> Self { Self(s) }
}

// ─── Kind ────────────────────────────────────────────────────────────────────

/// The closed tag distinguishing block variants.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BlockKind {
  Link,
  Image,
  Html,
  Map,
  Contact,
  Divider,
}

impl BlockKind {
  /// Label shown in the editor's kind selector.
  pub fn label(self) -> &'static str {
    match self {
      Self::Link => "Link",
      Self::Image => "Image",
      Self::Html => "HTML Embed",
      Self::Map => "Map",
      Self::Contact => "Contact",
      Self::Divider => "Divider",
    }
  }

  /// Whether the creation form asks for (and requires) a title.
  pub fn requires_title(self) -> bool { !matches!(self, Self::Divider) }
}

/// How a contact block's text should be reached.
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
pub enum ContactType {
  Phone,
  Email,
  Address,
}

// ─── Flat settings ───────────────────────────────────────────────────────────

/// The flat settings record of the wire format. Each field only means
/// something for one kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSettings {
  /// `image`: alt text.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub image_alt:    Option<String>,
  /// `map`: zoom level, 1–20.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub map_zoom:     Option<u8>,
  /// `contact`: how the text is reached.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub contact_type: Option<ContactType>,
  /// `html`: render height as a CSS length, e.g. `400px`.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub html_height:  Option<String>,
}

impl BlockSettings {
  pub fn is_empty(&self) -> bool { self == &Self::default() }
}

// ─── Body ────────────────────────────────────────────────────────────────────

/// The kind-specific part of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockBody {
  Link {
    url:      String,
    /// Social-network classification, e.g. `"github"`.
    platform: Option<String>,
  },
  Image {
    /// Data URI or URL.
    src: String,
    alt: Option<String>,
  },
  Html {
    /// Raw user-supplied markup. Never trusted; see the renderer's policy.
    markup: String,
    height: Option<String>,
  },
  Map {
    /// Embed URL.
    src:  String,
    zoom: Option<u8>,
  },
  Contact {
    value:        String,
    contact_type: Option<ContactType>,
  },
  Divider,
}

impl BlockBody {
  pub fn kind(&self) -> BlockKind {
    match self {
      Self::Link { .. } => BlockKind::Link,
      Self::Image { .. } => BlockKind::Image,
      Self::Html { .. } => BlockKind::Html,
      Self::Map { .. } => BlockKind::Map,
      Self::Contact { .. } => BlockKind::Contact,
      Self::Divider => BlockKind::Divider,
    }
  }

  /// The kind-dependent payload: a URL for links and maps, image data for
  /// images, markup for HTML, free text for contacts. Empty for dividers.
  pub fn content(&self) -> &str {
    match self {
      Self::Link { url, .. } => url,
      Self::Image { src, .. } => src,
      Self::Html { markup, .. } => markup,
      Self::Map { src, .. } => src,
      Self::Contact { value, .. } => value,
      Self::Divider => "",
    }
  }

  fn content_mut(&mut self) -> Option<&mut String> {
    match self {
      Self::Link { url, .. } => Some(url),
      Self::Image { src, .. } => Some(src),
      Self::Html { markup, .. } => Some(markup),
      Self::Map { src, .. } => Some(src),
      Self::Contact { value, .. } => Some(value),
      Self::Divider => None,
    }
  }

  /// Assemble a body from the flat wire fields, keeping only what applies
  /// to `kind`.
  pub fn from_parts(
    kind: BlockKind,
    content: String,
    platform: Option<String>,
    settings: BlockSettings,
  ) -> Self {
    match kind {
      BlockKind::Link => Self::Link { url: content, platform },
      BlockKind::Image => Self::Image {
        src: content,
        alt: settings.image_alt,
      },
      BlockKind::Html => Self::Html {
        markup: content,
        height: settings.html_height,
      },
      BlockKind::Map => Self::Map {
        src:  content,
        zoom: settings.map_zoom,
      },
      BlockKind::Contact => Self::Contact {
        value:        content,
        contact_type: settings.contact_type,
      },
      BlockKind::Divider => Self::Divider,
    }
  }

  fn platform(&self) -> Option<&str> {
    match self {
      Self::Link { platform, .. } => platform.as_deref(),
      _ => None,
    }
  }

  fn settings(&self) -> BlockSettings {
    let mut settings = BlockSettings::default();
    match self {
      Self::Image { alt, .. } => settings.image_alt = alt.clone(),
      Self::Html { height, .. } => settings.html_height = height.clone(),
      Self::Map { zoom, .. } => settings.map_zoom = *zoom,
      Self::Contact { contact_type, .. } => {
        settings.contact_type = *contact_type
      }
      Self::Link { .. } | Self::Divider => {}
    }
    settings
  }
}

// ─── Block ───────────────────────────────────────────────────────────────────

/// One typed entry in a profile's display sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireBlock", into = "WireBlock")]
pub struct ContentBlock {
  pub id:    BlockId,
  /// Display label. Dividers carry [`DIVIDER_TITLE`].
  pub title: String,
  pub body:  BlockBody,
}

impl ContentBlock {
  pub fn new(id: BlockId, title: impl Into<String>, body: BlockBody) -> Self {
    Self {
      id,
      title: title.into(),
      body,
    }
  }

  pub fn divider(id: BlockId) -> Self {
    Self::new(id, DIVIDER_TITLE, BlockBody::Divider)
  }

  pub fn link(id: BlockId, title: impl Into<String>, url: impl Into<String>) -> Self {
    Self::new(id, title, BlockBody::Link {
      url:      url.into(),
      platform: None,
    })
  }

  pub fn kind(&self) -> BlockKind { self.body.kind() }

  pub fn content(&self) -> &str { self.body.content() }

  pub fn platform(&self) -> Option<&str> { self.body.platform() }

  /// Merge the supplied fields into this block.
  ///
  /// The kind never changes; patch fields that do not apply to it are
  /// ignored, as is `content` on a divider.
  pub fn apply(&mut self, patch: BlockPatch) {
    let BlockPatch {
      title,
      content,
      platform,
      settings,
    } = patch;

    if let Some(title) = title {
      self.title = title;
    }
    if let Some(content) = content
      && let Some(slot) = self.body.content_mut()
    {
      *slot = content;
    }

    match &mut self.body {
      BlockBody::Link { platform: p, .. } => {
        if platform.is_some() {
          *p = platform;
        }
      }
      BlockBody::Image { alt, .. } => {
        if settings.image_alt.is_some() {
          *alt = settings.image_alt;
        }
      }
      BlockBody::Html { height, .. } => {
        if settings.html_height.is_some() {
          *height = settings.html_height;
        }
      }
      BlockBody::Map { zoom, .. } => {
        if settings.map_zoom.is_some() {
          *zoom = settings.map_zoom;
        }
      }
      BlockBody::Contact { contact_type, .. } => {
        if settings.contact_type.is_some() {
          *contact_type = settings.contact_type;
        }
      }
      BlockBody::Divider => {}
    }
  }
}

/// The flat storage and wire shape of a [`ContentBlock`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBlock {
  id:       BlockId,
  #[serde(rename = "type")]
  kind:     BlockKind,
  #[serde(default)]
  title:    String,
  #[serde(default)]
  content:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  platform: Option<String>,
  #[serde(default, skip_serializing_if = "BlockSettings::is_empty")]
  settings: BlockSettings,
}

impl From<WireBlock> for ContentBlock {
  fn from(w: WireBlock) -> Self {
    ContentBlock {
      id:    w.id,
      title: w.title,
      body:  BlockBody::from_parts(w.kind, w.content, w.platform, w.settings),
    }
  }
}

impl From<ContentBlock> for WireBlock {
  fn from(b: ContentBlock) -> Self {
    WireBlock {
      kind:     b.kind(),
      content:  b.content().to_owned(),
      platform: b.platform().map(str::to_owned),
      settings: b.body.settings(),
      id:       b.id,
      title:    b.title,
    }
  }
}

// ─── Patch ───────────────────────────────────────────────────────────────────

/// Partial update for [`crate::profile::Profile::update_content`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title:    Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub content:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform: Option<String>,
  #[serde(default, skip_serializing_if = "BlockSettings::is_empty")]
  pub settings: BlockSettings,
}

impl BlockPatch {
  pub fn title(title: impl Into<String>) -> Self {
    Self {
      title: Some(title.into()),
      ..Self::default()
    }
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// The editor's creation form for a block, before it has an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDraft {
  #[serde(rename = "type")]
  pub kind:     BlockKind,
  #[serde(default)]
  pub title:    String,
  #[serde(default)]
  pub content:  String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform: Option<String>,
  #[serde(default, skip_serializing_if = "BlockSettings::is_empty")]
  pub settings: BlockSettings,
}

impl BlockDraft {
  pub fn new(kind: BlockKind) -> Self {
    Self {
      kind,
      title: String::new(),
      content: String::new(),
      platform: None,
      settings: BlockSettings::default(),
    }
  }

  /// Turn the form into a block with identifier `id`.
  ///
  /// Every kind but `divider` needs a non-blank title; an untitled divider
  /// is titled [`DIVIDER_TITLE`]. A map zoom outside 1–20 is rejected. The
  /// form's contact selector starts on `phone`, so an unset contact type
  /// becomes [`ContactType::Phone`].
  pub fn build(self, id: BlockId) -> Result<ContentBlock> {
    let Self {
      kind,
      title,
      content,
      platform,
      mut settings,
    } = self;

    if kind.requires_title() && title.trim().is_empty() {
      return Err(Error::MissingTitle(kind));
    }
    if kind == BlockKind::Map
      && let Some(zoom) = settings.map_zoom
      && !MAP_ZOOM_RANGE.contains(&zoom)
    {
      return Err(Error::ZoomOutOfRange(i64::from(zoom)));
    }
    if kind == BlockKind::Contact && settings.contact_type.is_none() {
      settings.contact_type = Some(ContactType::Phone);
    }

    let title = if title.is_empty() {
      DIVIDER_TITLE.to_owned()
    } else {
      title
    };
    let platform = platform.filter(|p| !p.trim().is_empty());

    Ok(ContentBlock {
      id,
      title,
      body: BlockBody::from_parts(kind, content, platform, settings),
    })
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn wire_format_matches_flat_record() {
    let block = ContentBlock::new(
      "7".into(),
      "Email me",
      BlockBody::Contact {
        value:        "a@b.com".into(),
        contact_type: Some(ContactType::Email),
      },
    );
    let value = serde_json::to_value(&block).unwrap();
    assert_eq!(
      value,
      json!({
        "id": "7",
        "type": "contact",
        "title": "Email me",
        "content": "a@b.com",
        "settings": { "contactType": "email" }
      })
    );
  }

  #[test]
  fn irrelevant_settings_are_dropped_on_decode() {
    let block: ContentBlock = serde_json::from_value(json!({
      "id": "1",
      "type": "link",
      "title": "Blog",
      "content": "https://x.com",
      "platform": "website",
      "settings": { "mapZoom": 4, "imageAlt": "nope" }
    }))
    .unwrap();

    assert_eq!(block.body, BlockBody::Link {
      url:      "https://x.com".into(),
      platform: Some("website".into()),
    });
    let back = serde_json::to_value(&block).unwrap();
    assert!(back.get("settings").is_none());
  }

  #[test]
  fn platform_is_only_kept_on_links() {
    let block: ContentBlock = serde_json::from_value(json!({
      "id": "1",
      "type": "image",
      "title": "Me",
      "content": "data:image/png;base64,AAAA",
      "platform": "github"
    }))
    .unwrap();
    assert_eq!(block.platform(), None);
  }

  #[test]
  fn apply_ignores_fields_for_other_kinds() {
    let mut block = ContentBlock::new(
      "m".into(),
      "Office",
      BlockBody::Map {
        src:  "https://maps.example/embed".into(),
        zoom: Some(3),
      },
    );
    block.apply(BlockPatch {
      platform: Some("github".into()),
      settings: BlockSettings {
        map_zoom: Some(12),
        image_alt: Some("ignored".into()),
        ..BlockSettings::default()
      },
      ..BlockPatch::default()
    });
    assert_eq!(block.body, BlockBody::Map {
      src:  "https://maps.example/embed".into(),
      zoom: Some(12),
    });
  }

  #[test]
  fn divider_ignores_content_patch() {
    let mut block = ContentBlock::divider("d".into());
    block.apply(BlockPatch {
      content: Some("text".into()),
      ..BlockPatch::default()
    });
    assert_eq!(block.content(), "");
    assert_eq!(block.body, BlockBody::Divider);
  }

  #[test]
  fn draft_requires_title_except_for_dividers() {
    let err = BlockDraft::new(BlockKind::Link)
      .build("1".into())
      .unwrap_err();
    assert!(matches!(err, Error::MissingTitle(BlockKind::Link)));

    let divider = BlockDraft::new(BlockKind::Divider).build("2".into()).unwrap();
    assert_eq!(divider.title, DIVIDER_TITLE);
    assert_eq!(divider.kind(), BlockKind::Divider);
  }

  #[test]
  fn draft_rejects_zoom_out_of_range() {
    let mut draft = BlockDraft::new(BlockKind::Map);
    draft.title = "Office".into();
    draft.settings.map_zoom = Some(21);
    assert!(matches!(
      draft.build("1".into()),
      Err(Error::ZoomOutOfRange(21))
    ));
  }

  #[test]
  fn draft_contact_defaults_to_phone() {
    let mut draft = BlockDraft::new(BlockKind::Contact);
    draft.title = "Call".into();
    draft.content = "+1 555 0100".into();
    let block = draft.build("1".into()).unwrap();
    assert_eq!(block.body, BlockBody::Contact {
      value:        "+1 555 0100".into(),
      contact_type: Some(ContactType::Phone),
    });
  }

  #[test]
  fn kind_parses_from_wire_tag() {
    use std::str::FromStr as _;
    assert_eq!(BlockKind::from_str("html").unwrap(), BlockKind::Html);
    assert_eq!(BlockKind::Divider.to_string(), "divider");
  }
}
