use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Directory the aggregation pass walks.
pub const SOURCE_DIR: &str = "src";
/// File the concatenated snapshot is written to, in the working directory.
pub const OUTPUT_FILE: &str = "combined_output.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombineConfig {
    pub source_dir: PathBuf,
    pub output_file: PathBuf,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(SOURCE_DIR),
            output_file: PathBuf::from(OUTPUT_FILE),
        }
    }
}

impl CombineConfig {
    pub fn trace_loaded(&self) {
        info!(
            source_dir = %self.source_dir.display(),
            output_file = %self.output_file.display(),
            "Loaded CombineConfig"
        );
        debug!(?self, "CombineConfig loaded (full debug)");
    }
}
