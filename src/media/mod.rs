//! Media item representation and file naming.

pub mod item;

pub use item::{timestamp_slug, MediaItem, MediaKind};
