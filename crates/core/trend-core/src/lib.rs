//! Domain model, scoring pipeline, and storage/adapter contracts for the
//! short-video trend detector. Platform adapters, the Supabase store, and
//! the worker binary all depend on this crate; it has no knowledge of any
//! of them.

pub mod adapter;
pub mod classifier;
pub mod config;
pub mod dedup;
pub mod domain;
pub mod error;
pub mod filter;
pub mod gate;
pub mod metrics;
pub mod pipeline;
pub mod scoring;
pub mod source_url;
pub mod store;
pub mod tuning;
pub mod video;

pub use adapter::{AdapterLimits, PlatformAdapter, RetryPolicy};
pub use classifier::{PassThroughClassifier, QualityClassifier};
pub use config::TrendConfig;
pub use domain::{Source, SourceStatus, StoredVideo, Topic};
pub use error::{AdapterError, Result, TrendError};
pub use gate::{apply_quality_gate, DecisionReason, GateResult};
pub use pipeline::{run_pipeline, PipelineOutput, PipelineStats};
pub use store::{InsertOutcome, StoreError, VideoStore};
pub use tuning::TuningConfig;
pub use video::{Platform, Video};
