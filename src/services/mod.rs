pub mod normalize;
pub mod sync;
pub mod task_queue;

pub use normalize::{max_characters_page, normalize_page};
pub use sync::{SyncError, SyncReport, SyncService};
pub use task_queue::{QueueHandle, TaskQueue};
