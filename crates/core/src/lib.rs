//! Tubemark Core Library
//!
//! Lists a channel's latest long-form YouTube videos and splices thumbnail
//! links for them into a marked section of a README.

pub mod config;
pub mod duration;
pub mod error;
pub mod format;
pub mod lister;
pub mod readme;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use config::{ApiConfig, resolve_channel_id};
pub use duration::{ShortsRule, parse_iso8601_duration};
pub use error::{Result, TubemarkError};
pub use format::{MarkupStyle, render_videos};
pub use lister::{DetailsMode, ListOptions, list_videos, select_videos};
pub use readme::{DEFAULT_TAG, MarkerPair, SpliceOutcome, UpdateOutcome, splice, update_document};
pub use types::{Orientation, Video, VideoCandidate};
pub use youtube::{SearchOrder, YoutubeClient};
