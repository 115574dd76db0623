//! HTML rendering for Folio: per-kind block dispatch, the dashboard forms,
//! and the Tera pages built from them.
//!
//! Every user-supplied field is escaped on the way out, except `html` block
//! markup, which goes through the configured [`HtmlPolicy`].

pub mod block;
pub mod error;
pub mod escape;
pub mod form;
pub mod page;

pub use block::{HtmlPolicy, render_preview, render_public, summary};
pub use error::{Error, Result};
pub use page::{Dashboard, Pages};
