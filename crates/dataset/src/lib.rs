//! Dataset Builder
//!
//! Joins labeled arrival times with wavelet features extracted from each
//! recording, skipping and reporting records that cannot be processed.

mod builder;
mod dataset;
mod error;
mod labels;
mod summary;

pub use builder::{AbortHandle, BuildConfig, BuildOutput, DatasetBuilder};
pub use dataset::Dataset;
pub use error::{BuildError, DatasetError, FailureReason};
pub use labels::{LabelResolution, LabelResolver, RelativeLabel};
pub use summary::{BuildSummary, FailureKind, RecordFailure};
