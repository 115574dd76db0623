//! Escaping and URL vetting for everything interpolated into markup.

use std::borrow::Cow;

/// Escape text for use in element content or a double-quoted attribute.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
    .replace('"', "&quot;")
    .replace('\'', "&#x27;")
}

/// Where a URL is going to be used; decides which schemes are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlUse {
  /// `href` of an anchor: web, mail and phone links.
  Link,
  /// `src` of an `<img>`: web URLs and inline image data.
  Image,
  /// `src` of an `<iframe>`: web URLs only.
  Frame,
}

/// Escape `url` for an attribute, or replace it with `#` when its scheme is
/// not acceptable for `usage` (e.g. `javascript:`).
pub fn safe_url(url: &str, usage: UrlUse) -> Cow<'static, str> {
  let trimmed = url.trim();
  let lower = trimmed.to_ascii_lowercase();
  let web = lower.starts_with("https://") || lower.starts_with("http://");
  let relative = trimmed.starts_with('/') && !trimmed.starts_with("//");

  let ok = match usage {
    UrlUse::Link => {
      web
        || relative
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with('#')
    }
    UrlUse::Image => web || relative || lower.starts_with("data:image/"),
    UrlUse::Frame => web,
  };

  if ok {
    Cow::Owned(html_escape(trimmed))
  } else {
    Cow::Borrowed("#")
  }
}

/// Percent-encode `s` for use as one segment of a URL path, so an id such
/// as `a/b` stays a single segment.
pub fn path_segment(s: &str) -> Cow<'_, str> { urlencoding::encode(s) }

/// A CSS length such as `400px`, `50vh` or `auto`; anything else is `None`.
pub fn css_length(value: &str) -> Option<&str> {
  let value = value.trim();
  if value.is_empty() || value.len() > 16 {
    return None;
  }
  let ok = value
    .chars()
    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '%');
  ok.then_some(value)
}

/// A hex color such as `#4F46E5`; anything else is `None`.
pub fn hex_color(value: &str) -> Option<&str> {
  let digits = value.strip_prefix('#')?;
  let ok = matches!(digits.len(), 3 | 4 | 6 | 8)
    && digits.chars().all(|c| c.is_ascii_hexdigit());
  ok.then_some(value)
}

/// Cut `s` to at most `max` characters, ending in an ellipsis when cut.
pub fn truncate(s: &str, max: usize) -> Cow<'_, str> {
  match s.char_indices().nth(max) {
    None => Cow::Borrowed(s),
    Some((end, _)) => {
      let cut = s[..end]
        .char_indices()
        .nth(max.saturating_sub(1))
        .map_or(end, |(i, _)| i);
      Cow::Owned(format!("{}…", &s[..cut]))
    }
  }
}
