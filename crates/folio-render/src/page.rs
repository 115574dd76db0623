//! Whole pages: the public profile, the not-found page, the editor
//! dashboard, pricing and the admin user table.
//!
//! Pages are Tera templates compiled into the binary. Block markup comes
//! from [`render_public`] and [`render_preview`] and is inserted unescaped;
//! everything else is escaped by Tera on the way out.

use folio_core::{
  account::{AdminUser, UserStatus},
  block::BlockKind,
  plan::{PlanType, Subscription, catalogue},
  profile::{DEFAULT_ACCENT_COLOR, Profile, Theme},
  social::SocialPlatform,
};
use serde::Serialize;
use strum::IntoEnumIterator as _;
use tera::{Context, Tera};

use crate::{
  HtmlPolicy, Result,
  block::{render_preview, render_public},
  escape::{UrlUse, hex_color, path_segment, safe_url},
  form::{Field, form_fields},
};

pub const NOT_FOUND_TITLE: &str = "Profile not found";
pub const NOT_FOUND_MESSAGE: &str = "The requested profile does not exist.";

const TEMPLATES: [(&str, &str); 6] = [
  ("base.html", include_str!("../templates/base.html")),
  ("profile.html", include_str!("../templates/profile.html")),
  ("not_found.html", include_str!("../templates/not_found.html")),
  ("dashboard.html", include_str!("../templates/dashboard.html")),
  ("pricing.html", include_str!("../templates/pricing.html")),
  ("admin_users.html", include_str!("../templates/admin_users.html")),
];

/// Everything the editor dashboard shows.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
  pub profile:      &'a Profile,
  pub subscription: &'a Subscription,
  pub policy:       HtmlPolicy,
  /// Kind selected in the add-block form.
  pub kind:         BlockKind,
  /// One-line message from the last action, e.g. a validation failure.
  pub notice:       Option<&'a str>,
}

// ─── Template views ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct BlockRow {
  path_id: String,
  title:   String,
  label:   &'static str,
  preview: String,
}

#[derive(Serialize)]
struct SocialRow {
  url:  String,
  name: String,
}

#[derive(Serialize)]
struct PlatformOption {
  id:   String,
  name: &'static str,
}

#[derive(Serialize)]
struct KindTab {
  id:      String,
  label:   &'static str,
  current: bool,
}

#[derive(Serialize)]
struct PlanCard {
  id:       String,
  name:     String,
  price:    u32,
  tagline:  String,
  features: Vec<String>,
  current:  bool,
}

#[derive(Serialize)]
struct UserRow {
  path_id: String,
  name:    String,
  email:   String,
  role:    String,
  status:  String,
  plan:    String,
  joined:  String,
  toggle:  &'static str,
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// The compiled page templates. Build once at startup and share.
pub struct Pages {
  tera: Tera,
}

impl Pages {
  pub fn new() -> Result<Self> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    Ok(Self { tera })
  }

  fn render(&self, name: &str, context: &Context) -> Result<String> {
    Ok(self.tera.render(name, context)?)
  }

  /// The page served at `/{username}`.
  pub fn public_page(&self, profile: &Profile, policy: HtmlPolicy) -> Result<String> {
    let blocks: Vec<String> = profile
      .contents
      .iter()
      .map(|b| render_public(b, policy))
      .collect();

    let mut context = page_context(&format!("theme-{}", profile.theme), accent(profile));
    context.insert("title", profile.display_title());
    context.insert("avatar", &avatar(profile));
    context.insert("bio", &profile.bio);
    context.insert("blocks", &blocks);
    self.render("profile.html", &context)
  }

  /// The page served for any username that is not published.
  pub fn not_found_page(&self) -> Result<String> {
    let mut context = page_context("theme-light", DEFAULT_ACCENT_COLOR);
    context.insert("heading", NOT_FOUND_TITLE);
    context.insert("message", NOT_FOUND_MESSAGE);
    self.render("not_found.html", &context)
  }

  pub fn dashboard_page(&self, view: Dashboard<'_>) -> Result<String> {
    let Dashboard {
      profile,
      subscription,
      policy,
      kind,
      notice,
    } = view;

    let plan = subscription.current_plan.plan();
    let remaining = match plan.limits.remaining_links(profile.contents.len()) {
      Some(n) => format!("{n} of {} blocks left", plan.limits.links.unwrap_or_default()),
      None => "Unlimited blocks".to_string(),
    };

    let blocks: Vec<BlockRow> = profile
      .contents
      .iter()
      .map(|b| BlockRow {
        path_id: path_segment(b.id.as_str()).into_owned(),
        title:   b.title.clone(),
        label:   b.kind().label(),
        preview: render_preview(b, policy),
      })
      .collect();

    let socials: Vec<SocialRow> = profile
      .social_links()
      .map(|b| SocialRow {
        url:  safe_url(b.content(), UrlUse::Link).into_owned(),
        name: b
          .platform()
          .and_then(SocialPlatform::for_tag)
          .map_or_else(|| b.title.clone(), |p| p.display_name().to_owned()),
      })
      .collect();

    let platforms: Vec<PlatformOption> = SocialPlatform::iter()
      .map(|p| PlatformOption {
        id:   p.to_string(),
        name: p.display_name(),
      })
      .collect();

    let kinds: Vec<KindTab> = BlockKind::iter()
      .map(|k| KindTab {
        id:      k.to_string(),
        label:   k.label(),
        current: k == kind,
      })
      .collect();
    let fields: Vec<Field> = form_fields(kind);
    let themes: Vec<String> = Theme::iter().map(|t| t.to_string()).collect();
    let public_path = (!profile.username.is_empty()).then(|| format!("/{}", profile.username));

    let mut context = page_context("theme-light", accent(profile));
    context.insert("notice", &notice);
    context.insert("public_path", &public_path);
    context.insert("plan_name", &plan.name);
    context.insert("remaining", &remaining);
    context.insert("username", &profile.username);
    context.insert("display_name", &profile.display_name);
    context.insert("bio", &profile.bio);
    context.insert("theme", &profile.theme.to_string());
    context.insert("themes", &themes);
    context.insert("avatar", &avatar(profile));
    context.insert("blocks", &blocks);
    context.insert("socials", &socials);
    context.insert("platforms", &platforms);
    context.insert("kinds", &kinds);
    context.insert("kind", &kind.to_string());
    context.insert("kind_label", kind.label());
    context.insert("fields", &fields);
    self.render("dashboard.html", &context)
  }

  /// Plan cards with `current` marked.
  pub fn pricing_page(&self, current: PlanType) -> Result<String> {
    let plans: Vec<PlanCard> = catalogue()
      .into_iter()
      .map(|plan| PlanCard {
        id:       plan.plan_type.to_string(),
        current:  plan.plan_type == current,
        name:     plan.name,
        price:    plan.price,
        tagline:  plan.tagline,
        features: plan.features,
      })
      .collect();

    let mut context = page_context("theme-light", DEFAULT_ACCENT_COLOR);
    context.insert("plans", &plans);
    self.render("pricing.html", &context)
  }

  /// The admin user table with suspend/activate and delete actions.
  pub fn admin_users_page(&self, users: &[AdminUser]) -> Result<String> {
    let rows: Vec<UserRow> = users
      .iter()
      .map(|u| UserRow {
        path_id: path_segment(&u.id).into_owned(),
        name:    u.name.clone(),
        email:   u.email.clone(),
        role:    u.role.to_string(),
        status:  u.status.to_string(),
        plan:    u.plan_label().to_owned(),
        joined:  u.created_at.format("%Y-%m-%d").to_string(),
        toggle:  match u.status {
          UserStatus::Active => "suspend",
          UserStatus::Suspended => "activate",
        },
      })
      .collect();
    let (active, suspended) = status_counts(users);

    let mut context = page_context("theme-light", DEFAULT_ACCENT_COLOR);
    context.insert("users", &rows);
    context.insert("total", &users.len());
    context.insert("active", &active);
    context.insert("suspended", &suspended);
    self.render("admin_users.html", &context)
  }
}

/// The variables `base.html` needs.
fn page_context(theme_class: &str, accent: &str) -> Context {
  let mut context = Context::new();
  context.insert("theme_class", theme_class);
  context.insert("accent", accent);
  context
}

fn accent(profile: &Profile) -> &str {
  hex_color(&profile.accent_color).unwrap_or(DEFAULT_ACCENT_COLOR)
}

/// The avatar `src`, already vetted and escaped.
fn avatar(profile: &Profile) -> Option<String> {
  (!profile.avatar.is_empty()).then(|| safe_url(&profile.avatar, UrlUse::Image).into_owned())
}

fn status_counts(users: &[AdminUser]) -> (usize, usize) {
  users.iter().fold((0, 0), |(active, suspended), u| match u.status {
    UserStatus::Active => (active + 1, suspended),
    UserStatus::Suspended => (active, suspended + 1),
  })
}
