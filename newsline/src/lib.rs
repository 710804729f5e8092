// Library interface for newsline modules
// This allows tests and the binary to import modules

pub mod error;
pub mod feed;
pub mod loader;
pub mod partition;
pub mod render;
pub mod selection;
pub mod server;
pub mod time_range;
pub mod timeline;
pub mod timestamp;
pub mod toc;

pub use error::FeedError;
pub use timeline::{build_page, PageState, Timeline, TimelineOptions};
