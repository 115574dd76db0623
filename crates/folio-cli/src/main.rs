//! `folio`: command-line editor for a Folio profile.
//!
//! # Usage
//!
//! ```
//! folio --url http://localhost:8080 --email ada@example.com --password secret profile show
//! folio --config ~/.config/folio/config.toml block add link --title Blog --content https://x.com
//! ```

mod client;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use folio_core::{
  account::Role,
  block::{BlockDraft, BlockKind, BlockPatch, ContactType, ContentBlock},
  plan::PlanType,
  profile::{ProfilePatch, Theme},
};
use folio_render::summary;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "folio", about = "Edit a Folio profile from the terminal")]
struct Args {
  /// Path to a TOML config file (url, email, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the folio server (default: http://localhost:8080).
  #[arg(long, env = "FOLIO_URL")]
  url: Option<String>,

  /// Account email.
  #[arg(long, env = "FOLIO_EMAIL")]
  email: Option<String>,

  /// Account password (plaintext).
  #[arg(long, env = "FOLIO_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Show or edit the profile fields.
  #[command(subcommand)]
  Profile(ProfileCmd),
  /// Manage content blocks.
  #[command(subcommand)]
  Block(BlockCmd),
  /// Manage social links.
  #[command(subcommand)]
  Social(SocialCmd),
  /// Upload an image and print its data URI.
  Upload {
    file:   PathBuf,
    /// Also set the image as the profile avatar.
    #[arg(long)]
    avatar: bool,
  },
  /// Plans and the current subscription.
  #[command(subcommand)]
  Plan(PlanCmd),
  /// Administer users (admin accounts only).
  #[command(subcommand)]
  User(UserCmd),
}

#[derive(Subcommand, Debug)]
enum ProfileCmd {
  Show,
  Set {
    #[arg(long)]
    username:     Option<String>,
    #[arg(long)]
    display_name: Option<String>,
    #[arg(long)]
    bio:          Option<String>,
    #[arg(long)]
    theme:        Option<Theme>,
    #[arg(long)]
    accent_color: Option<String>,
  },
}

#[derive(Subcommand, Debug)]
enum BlockCmd {
  List,
  /// Add a block; every kind but `divider` needs `--title`.
  Add {
    kind:         BlockKind,
    #[arg(long, default_value = "")]
    title:        String,
    #[arg(long, default_value = "")]
    content:      String,
    /// Alt text for image blocks.
    #[arg(long)]
    alt:          Option<String>,
    /// Zoom level (1–20) for map blocks.
    #[arg(long)]
    zoom:         Option<u8>,
    /// phone, email or address for contact blocks.
    #[arg(long)]
    contact_type: Option<ContactType>,
    /// CSS height for html blocks, e.g. 400px.
    #[arg(long)]
    height:       Option<String>,
  },
  /// Change a block's title.
  Rename { id: String, title: String },
  Remove { id: String },
}

#[derive(Subcommand, Debug)]
enum SocialCmd {
  List,
  Add { platform: String, url: String },
}

#[derive(Subcommand, Debug)]
enum PlanCmd {
  List,
  Show,
  Choose { plan: PlanType },
}

#[derive(Subcommand, Debug)]
enum UserCmd {
  List,
  Add {
    email: String,
    name:  String,
    #[arg(long)]
    admin: bool,
  },
  Suspend { id: String },
  Activate { id: String },
  Delete { id: String },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  email:    String,
  #[serde(default)]
  password: String,
}

fn non_empty(s: &str) -> Option<String> { (!s.is_empty()).then(|| s.to_owned()) }

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| non_empty(&file_cfg.url))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    email:    args
      .email
      .or_else(|| non_empty(&file_cfg.email))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| non_empty(&file_cfg.password))
      .unwrap_or_default(),
  };
  tracing::debug!(url = %api_config.base_url, "using server");

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

fn print_blocks(blocks: &[ContentBlock]) {
  if blocks.is_empty() {
    println!("(none)");
  }
  for b in blocks {
    println!("{:<36}  {:<8}  {:<24}  {}", b.id, b.kind(), b.title, summary(b));
  }
}

async fn run(client: &ApiClient, command: Command) -> Result<()> {
  match command {
    Command::Profile(ProfileCmd::Show) => {
      let p = client.profile().await?;
      println!("username:     {}", p.username);
      println!("display name: {}", p.display_name);
      println!("bio:          {}", p.bio);
      println!("theme:        {}", p.theme);
      println!("accent color: {}", p.accent_color);
      println!("blocks:       {}", p.contents.len());
    }

    Command::Profile(ProfileCmd::Set {
      username,
      display_name,
      bio,
      theme,
      accent_color,
    }) => {
      let patch = ProfilePatch {
        username,
        display_name,
        bio,
        avatar: None,
        theme,
        accent_color,
      };
      if patch.is_empty() {
        bail!("nothing to update; pass at least one field");
      }
      let p = client.update_profile(&patch).await?;
      println!("updated profile {}", p.display_title());
    }

    Command::Block(BlockCmd::List) => print_blocks(&client.contents().await?),

    Command::Block(BlockCmd::Add {
      kind,
      title,
      content,
      alt,
      zoom,
      contact_type,
      height,
    }) => {
      let mut draft = BlockDraft::new(kind);
      draft.title = title;
      draft.content = content;
      draft.settings.image_alt = alt;
      draft.settings.map_zoom = zoom;
      draft.settings.contact_type = contact_type;
      draft.settings.html_height = height;
      let block = client.add_draft(&draft).await?;
      println!("added {} block {}", block.kind(), block.id);
    }

    Command::Block(BlockCmd::Rename { id, title }) => {
      let block = client.update_content(&id, &BlockPatch::title(title)).await?;
      println!("renamed {} to {:?}", block.id, block.title);
    }

    Command::Block(BlockCmd::Remove { id }) => {
      client.remove_content(&id).await?;
      println!("removed {id}");
    }

    Command::Social(SocialCmd::List) => print_blocks(&client.socials().await?),

    Command::Social(SocialCmd::Add { platform, url }) => {
      let block = client.add_social(&platform, &url).await?;
      println!("added {} link {}", block.title, block.id);
    }

    Command::Upload { file, avatar } => {
      let data = std::fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
      let data_uri = client.upload(content_type_for(&file), data).await?;
      if avatar {
        client
          .update_profile(&ProfilePatch {
            avatar: Some(data_uri),
            ..ProfilePatch::default()
          })
          .await?;
        println!("avatar updated");
      } else {
        println!("{data_uri}");
      }
    }

    Command::Plan(PlanCmd::List) => {
      for plan in client.plans().await? {
        println!("{:<10} ${:>3}/month  {}", plan.name, plan.price, plan.tagline);
      }
    }

    Command::Plan(PlanCmd::Show) => {
      let sub = client.subscription().await?;
      match sub.expires_at {
        Some(at) => println!("{} (renews {})", sub.current_plan, at.format("%Y-%m-%d")),
        None => println!("{}", sub.current_plan),
      }
    }

    Command::Plan(PlanCmd::Choose { plan }) => {
      let checkout = client.checkout(plan).await?;
      println!("{}", checkout.message);
      println!("current plan: {}", checkout.subscription.current_plan);
    }

    Command::User(UserCmd::List) => {
      for u in client.users().await? {
        println!(
          "{:<36}  {:<28}  {:<6}  {:<9}  {}",
          u.id,
          u.email,
          u.role,
          u.status,
          u.plan_label()
        );
      }
    }

    Command::User(UserCmd::Add { email, name, admin }) => {
      let role = if admin { Role::Admin } else { Role::User };
      let user = client.add_user(&email, &name, role).await?;
      println!("added {} ({})", user.email, user.id);
    }

    Command::User(UserCmd::Suspend { id }) => {
      let user = client.set_user_active(&id, false).await?;
      println!("{} is {}", user.email, user.status);
    }

    Command::User(UserCmd::Activate { id }) => {
      let user = client.set_user_active(&id, true).await?;
      println!("{} is {}", user.email, user.status);
    }

    Command::User(UserCmd::Delete { id }) => {
      client.delete_user(&id).await?;
      println!("deleted {id}");
    }
  }
  Ok(())
}

/// Guess an image MIME type from the file extension; the server rejects
/// anything that is not `image/*`.
fn content_type_for(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_ascii_lowercase)
    .unwrap_or_default();
  match ext.as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "svg" => "image/svg+xml",
    "avif" => "image/avif",
    _ => "application/octet-stream",
  }
}
