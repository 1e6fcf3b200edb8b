mod counts;
mod graph;
mod media;
mod sync;

pub use counts::{cmd_counts, format_counts, pluralize};
pub use graph::{cmd_graph, cmd_search};
pub use media::cmd_media;
pub use sync::cmd_sync;
