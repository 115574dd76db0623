//! Error types for `folio-core`.

use thiserror::Error;

use crate::block::BlockKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("{0} blocks need a title")]
  MissingTitle(BlockKind),

  #[error("map zoom must be between 1 and 20, got {0}")]
  ZoomOutOfRange(i64),

  #[error("unknown social platform: {0:?}")]
  UnknownPlatform(String),

  #[error("social link needs a URL")]
  MissingUrl,

  #[error("the username {0:?} is reserved")]
  ReservedUsername(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
