//! Per-kind rendering dispatch for the editor preview and the public page.
//!
//! Both entry points match exhaustively on [`BlockBody`], so a new block kind
//! does not compile until both views know how to show it.

use folio_core::block::{BlockBody, ContactType, ContentBlock};
use serde::{Deserialize, Serialize};

use crate::escape::{UrlUse, css_length, html_escape, safe_url, truncate};

/// Height of a public map embed, in pixels.
pub const MAP_HEIGHT: u32 = 450;

/// Longest URL shown in an editor preview before it is cut.
const PREVIEW_URL_CHARS: usize = 48;

/// How user-supplied markup in `html` blocks reaches the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlPolicy {
  /// Inside a sandboxed `<iframe srcdoc>`, isolated from the page.
  #[default]
  Sandboxed,
  /// Cleaned with `ammonia` and injected inline.
  Sanitized,
  /// Injected verbatim. Anyone who can edit the profile can run script on
  /// the public page; opt-in only.
  Raw,
}

impl HtmlPolicy {
  /// Markup for `markup` under this policy, in a box styled with `style`.
  fn embed(self, markup: &str, class: &str, style: &str) -> String {
    match self {
      Self::Sandboxed => format!(
        "<iframe class=\"{class}\" sandbox=\"allow-scripts allow-popups\" \
         srcdoc=\"{}\" style=\"{style}width:100%;border:0\"></iframe>",
        html_escape(markup)
      ),
      Self::Sanitized => format!(
        "<div class=\"{class}\" style=\"{style}\">{}</div>",
        ammonia::clean(markup)
      ),
      Self::Raw => format!("<div class=\"{class}\" style=\"{style}\">{markup}</div>"),
    }
  }
}

fn heading(title: &str) -> String {
  if title.is_empty() {
    String::new()
  } else {
    format!("<h3 class=\"block-title\">{}</h3>", html_escape(title))
  }
}

fn contact_label(contact_type: Option<ContactType>) -> String {
  contact_type.map(|t| t.to_string()).unwrap_or_default()
}

// ─── Public page ─────────────────────────────────────────────────────────────

/// Render a block for the public profile page.
pub fn render_public(block: &ContentBlock, policy: HtmlPolicy) -> String {
  let title = block.title.as_str();
  match &block.body {
    BlockBody::Link { url, .. } => format!(
      "<a class=\"block block-link\" href=\"{}\" target=\"_blank\" \
       rel=\"noopener noreferrer\">{}</a>",
      safe_url(url, UrlUse::Link),
      html_escape(title)
    ),

    BlockBody::Image { src, alt } => {
      let alt = alt.as_deref().unwrap_or(title);
      let caption = if title.is_empty() {
        String::new()
      } else {
        format!("<figcaption>{}</figcaption>", html_escape(title))
      };
      format!(
        "<figure class=\"block block-image\"><img src=\"{}\" alt=\"{}\" \
         style=\"width:100%\">{caption}</figure>",
        safe_url(src, UrlUse::Image),
        html_escape(alt)
      )
    }

    BlockBody::Html { markup, height } => {
      let height = height.as_deref().and_then(css_length).unwrap_or("auto");
      format!(
        "<div class=\"block block-html\">{}{}</div>",
        heading(title),
        policy.embed(markup, "html-embed", &format!("height:{height};"))
      )
    }

    BlockBody::Map { src, .. } => format!(
      "<div class=\"block block-map\">{}<iframe src=\"{}\" width=\"100%\" \
       height=\"{MAP_HEIGHT}\" style=\"border:0\" allowfullscreen \
       loading=\"lazy\" referrerpolicy=\"no-referrer-when-downgrade\">\
       </iframe></div>",
      heading(title),
      safe_url(src, UrlUse::Frame)
    ),

    BlockBody::Contact {
      value,
      contact_type,
    } => {
      let text = html_escape(value);
      let inner = match contact_type {
        Some(ContactType::Phone) => format!(
          "<a href=\"{}\">{text}</a>",
          safe_url(&format!("tel:{value}"), UrlUse::Link)
        ),
        Some(ContactType::Email) => format!(
          "<a href=\"{}\">{text}</a>",
          safe_url(&format!("mailto:{value}"), UrlUse::Link)
        ),
        Some(ContactType::Address) | None => format!("<p>{text}</p>"),
      };
      format!(
        "<div class=\"block block-contact\">{}{inner}</div>",
        heading(title)
      )
    }

    BlockBody::Divider => "<hr class=\"block-divider\">".to_string(),
  }
}

// ─── Editor preview ──────────────────────────────────────────────────────────

/// Render the compact preview shown under a block's title in the editor.
pub fn render_preview(block: &ContentBlock, policy: HtmlPolicy) -> String {
  match &block.body {
    BlockBody::Link { url, .. } => format!(
      "<p class=\"preview preview-url\" title=\"{}\">{}</p>",
      html_escape(url),
      html_escape(&truncate(url, PREVIEW_URL_CHARS))
    ),

    BlockBody::Image { src, alt } => format!(
      "<img class=\"preview preview-thumb\" src=\"{}\" alt=\"{}\" \
       style=\"max-height:5rem\">",
      safe_url(src, UrlUse::Image),
      html_escape(alt.as_deref().unwrap_or(&block.title))
    ),

    BlockBody::Html { markup, .. } => {
      policy.embed(markup, "preview preview-html", "max-height:5rem;overflow:hidden;")
    }

    BlockBody::Map { .. } => "<p class=\"preview\">Map Embed</p>".to_string(),

    BlockBody::Contact {
      value,
      contact_type,
    } => format!(
      "<p class=\"preview\">{}: {}</p>",
      contact_label(*contact_type),
      html_escape(value)
    ),

    BlockBody::Divider => "<hr class=\"preview\">".to_string(),
  }
}

/// One-line plain-text summary of a block, for terminals and logs.
pub fn summary(block: &ContentBlock) -> String {
  match &block.body {
    BlockBody::Link { url, platform } => match platform {
      Some(p) => format!("{} [{p}]", truncate(url, PREVIEW_URL_CHARS)),
      None => truncate(url, PREVIEW_URL_CHARS).into_owned(),
    },
    BlockBody::Image { src, .. } => {
      if src.starts_with("data:") {
        format!("inline image, {} bytes", src.len())
      } else {
        truncate(src, PREVIEW_URL_CHARS).into_owned()
      }
    }
    BlockBody::Html { markup, .. } => format!("{} chars of markup", markup.chars().count()),
    BlockBody::Map { .. } => "Map Embed".to_string(),
    BlockBody::Contact {
      value,
      contact_type,
    } => format!("{}: {value}", contact_label(*contact_type)),
    BlockBody::Divider => "────".to_string(),
  }
}

#[cfg(test)]
mod tests {
  use folio_core::block::{BlockBody, ContactType, ContentBlock};

  use super::*;

  fn contact(kind: Option<ContactType>, value: &str) -> ContentBlock {
    ContentBlock::new("c".into(), "Reach me", BlockBody::Contact {
      value:        value.into(),
      contact_type: kind,
    })
  }

  fn html(markup: &str, height: Option<&str>) -> ContentBlock {
    ContentBlock::new("h".into(), "Widget", BlockBody::Html {
      markup: markup.into(),
      height: height.map(str::to_owned),
    })
  }

  // ── Contact ───────────────────────────────────────────────────────────────

  #[test]
  fn email_contact_is_a_mailto_link() {
    let out = render_public(&contact(Some(ContactType::Email), "a@b.com"), HtmlPolicy::default());
    assert!(out.contains("href=\"mailto:a@b.com\""), "{out}");
    assert!(out.contains(">a@b.com</a>"), "{out}");
  }

  #[test]
  fn phone_contact_is_a_tel_link() {
    let out = render_public(&contact(Some(ContactType::Phone), "+1 555 0100"), HtmlPolicy::default());
    assert!(out.contains("href=\"tel:+1 555 0100\""), "{out}");
  }

  #[test]
  fn address_contact_is_plain_text() {
    let out = render_public(&contact(Some(ContactType::Address), "1 Main St"), HtmlPolicy::default());
    assert!(!out.contains("<a "), "{out}");
    assert!(out.contains("<p>1 Main St</p>"), "{out}");
  }

  #[test]
  fn untyped_contact_is_plain_text() {
    let out = render_public(&contact(None, "somewhere"), HtmlPolicy::default());
    assert!(!out.contains("<a "), "{out}");
  }

  #[test]
  fn contact_preview_shows_type_and_text() {
    let out = render_preview(&contact(Some(ContactType::Email), "a@b.com"), HtmlPolicy::default());
    assert_eq!(out, "<p class=\"preview\">email: a@b.com</p>");
  }

  // ── Link ──────────────────────────────────────────────────────────────────

  #[test]
  fn link_renders_anchor_with_title() {
    let block = ContentBlock::link("l".into(), "Blog & News", "https://x.com");
    let out = render_public(&block, HtmlPolicy::default());
    assert_eq!(
      out,
      "<a class=\"block block-link\" href=\"https://x.com\" target=\"_blank\" \
       rel=\"noopener noreferrer\">Blog &amp; News</a>"
    );
  }

  #[test]
  fn link_preview_truncates_long_urls() {
    let url = format!("https://example.com/{}", "a".repeat(100));
    let block = ContentBlock::link("l".into(), "Long", url.as_str());
    let out = render_preview(&block, HtmlPolicy::default());
    assert!(out.contains('…'), "{out}");
    assert!(out.contains(&format!("title=\"{url}\"")), "{out}");
  }

  // ── Image ─────────────────────────────────────────────────────────────────

  #[test]
  fn image_uses_alt_or_title() {
    let with_alt = ContentBlock::new("i".into(), "Me", BlockBody::Image {
      src: "https://img.example/me.png".into(),
      alt: Some("portrait".into()),
    });
    let out = render_public(&with_alt, HtmlPolicy::default());
    assert!(out.contains("alt=\"portrait\""), "{out}");
    assert!(out.contains("<figcaption>Me</figcaption>"), "{out}");

    let no_alt = ContentBlock::new("i".into(), "Me", BlockBody::Image {
      src: "https://img.example/me.png".into(),
      alt: None,
    });
    assert!(render_public(&no_alt, HtmlPolicy::default()).contains("alt=\"Me\""));
  }

  // ── Map ───────────────────────────────────────────────────────────────────

  #[test]
  fn map_renders_fixed_height_iframe() {
    let block = ContentBlock::new("m".into(), "Office", BlockBody::Map {
      src:  "https://maps.example/embed?q=1".into(),
      zoom: Some(10),
    });
    let out = render_public(&block, HtmlPolicy::default());
    assert!(out.contains("<iframe src=\"https://maps.example/embed?q=1\""), "{out}");
    assert!(out.contains("height=\"450\""), "{out}");
    assert_eq!(
      render_preview(&block, HtmlPolicy::default()),
      "<p class=\"preview\">Map Embed</p>"
    );
  }

  // ── Html ──────────────────────────────────────────────────────────────────

  #[test]
  fn sandboxed_html_is_isolated_in_srcdoc() {
    let out = render_public(&html("<script>x()</script>", Some("400px")), HtmlPolicy::Sandboxed);
    assert!(out.contains("sandbox="), "{out}");
    assert!(out.contains("srcdoc=\"&lt;script&gt;x()&lt;/script&gt;\""), "{out}");
    assert!(out.contains("height:400px;"), "{out}");
  }

  #[test]
  fn sanitized_html_strips_scripts() {
    let out = render_public(&html("<b>hi</b><script>x()</script>", None), HtmlPolicy::Sanitized);
    assert!(out.contains("<b>hi</b>"), "{out}");
    assert!(!out.contains("<script>"), "{out}");
    assert!(out.contains("height:auto;"), "{out}");
  }

  #[test]
  fn raw_html_is_verbatim() {
    let out = render_public(&html("<marquee>hi</marquee>", None), HtmlPolicy::Raw);
    assert!(out.contains("<marquee>hi</marquee>"), "{out}");
  }

  #[test]
  fn bad_html_height_falls_back_to_auto() {
    let out = render_public(&html("x", Some("1px;position:fixed")), HtmlPolicy::Sandboxed);
    assert!(out.contains("height:auto;"), "{out}");
  }

  // ── Divider ───────────────────────────────────────────────────────────────

  #[test]
  fn divider_is_a_rule_in_both_views() {
    let block = ContentBlock::divider("d".into());
    assert!(render_public(&block, HtmlPolicy::default()).starts_with("<hr"));
    assert!(render_preview(&block, HtmlPolicy::default()).starts_with("<hr"));
  }

  #[test]
  fn policy_reads_from_lowercase_names() {
    let p: HtmlPolicy = serde_json::from_str("\"sanitized\"").unwrap();
    assert_eq!(p, HtmlPolicy::Sanitized);
  }
}
