//! Note rewriting services.
//!
//! - `document`: block-level view of a note over pulldown-cmark
//! - `tags`: tag line detection and the publish filter
//! - `transform`: tag stripping and embed rewriting
//! - `front_matter`: article header with date preservation

pub mod document;
pub mod front_matter;
pub mod tags;
pub mod transform;

pub use document::{Block, BlockKind, Document, RawText};
pub use front_matter::FrontMatter;
pub use transform::{Transformed, Transformer};
