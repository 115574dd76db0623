//! Encoding and decoding helpers between domain types and the text stored in
//! the `documents` table.
//!
//! Bodies are compact JSON; timestamps are RFC 3339 strings. A missing row
//! decodes to the type's default, and because the domain documents are
//! `#[serde(default)]`, a row with missing fields decodes over the defaults.

use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};

use crate::{DocumentKey, Error, Result};

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn encode_document<T: Serialize>(doc: &T) -> Result<String> {
  Ok(serde_json::to_string(doc)?)
}

pub fn decode_document<T>(key: DocumentKey, body: Option<&str>) -> Result<T>
where
  T: DeserializeOwned + Default,
{
  match body {
    None => Ok(T::default()),
    Some(body) => serde_json::from_str(body).map_err(|source| {
      Error::CorruptDocument {
        key: key.as_str(),
        source,
      }
    }),
  }
}
