//! The ingestion worker: schedules cycles, owns the adapter registry, the
//! store, and the classifier. Exposed as a library so integration tests
//! can drive [`TrendWorker::run_cycle`] directly.

pub mod cycle;
pub mod registry;
pub mod worker;

pub use cycle::{run_cycle, CycleStats};
pub use registry::AdapterRegistry;
pub use worker::TrendWorker;
