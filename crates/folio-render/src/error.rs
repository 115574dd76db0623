//! Error type for `folio-render`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("template error: {0}")]
  Template(#[from] tera::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
