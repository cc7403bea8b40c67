mod aggregator;
mod category_service;
mod date_window;
pub mod error_handling;
mod rollover_service;
mod snapshot;
mod task_service;

pub use aggregator::TaskAggregator;
pub use category_service::CategoryService;
pub use date_window::DateWindow;
pub use error_handling::{MindFlowError, Result, UserErrorFormatter};
pub use rollover_service::RolloverService;
pub use snapshot::{DataSnapshot, SnapshotFeed, SnapshotReceiver};
pub use task_service::TaskService;
