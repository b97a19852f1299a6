//! Common CLI argument definitions shared by all backends.

use crate::kind::BackendKind;
use clap::Args;
use std::path::PathBuf;

/// Arguments shared by every backend.
///
/// All values are optional so they can be layered over a YAML config file;
/// anything given on the command line wins.
#[derive(Args, Clone, Debug, Default)]
pub struct CommonLoadArgs {
    /// Destination to load statements into
    #[arg(long, value_enum)]
    pub backend: Option<BackendKind>,

    /// Number of batches to generate and write
    #[arg(long, alias = "num_batches")]
    pub num_batches: Option<u64>,

    /// Number of statements per batch
    #[arg(long, alias = "batch_size")]
    pub batch_size: Option<usize>,

    /// Directory for the timing log (stdout is used if it is not writable)
    #[arg(long, alias = "log_dir")]
    pub log_dir: Option<PathBuf>,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long)]
    pub seed: Option<u64>,
}
