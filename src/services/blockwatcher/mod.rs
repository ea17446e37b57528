//! Block watcher service.
//!
//! Listens for new blocks, keeps the ordered queue of blocks that are not yet
//! processed, and runs one isolated processing unit per notification:
//!
//! - `queue`: the pending-block queue and its snapshots
//! - `unit`: the per-block processing unit
//! - `dispatcher`: the task owning the queue and scheduling units

mod dispatcher;
mod error;
mod queue;
mod unit;

pub use dispatcher::{BlockMonitor, MonitorEvent, MonitorHandle, MonitorSettings};
pub use error::BlockWatcherError;
pub use queue::{PendingBlockQueue, QueueSnapshot};
pub use unit::{BlockProcessingUnit, ProcessingContext, UnitOutcome, UnitReport};
