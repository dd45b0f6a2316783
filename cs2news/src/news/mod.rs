pub mod config;
pub mod event;
pub mod markup;
pub mod media;
pub mod preview;
pub mod rules;
pub mod types;

pub use config::{AppConfig, FormatterConfig};
pub use event::{EventCard, SteamEvent};
pub use media::{MediaExtractor, extract_images};
pub use preview::preview;
pub use rules::{RulePipeline, format, format_document, format_with};
pub use types::{CarouselDescriptor, FormattedContent, VideoDescriptor};
