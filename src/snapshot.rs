use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::world::FrameSnapshot;

#[derive(Debug, Serialize)]
struct GenerationMeta<'a> {
    scenario: &'a str,
    generation: u64,
    written_at: DateTime<Utc>,
}

/// Writes periodic frame snapshots as JSON, one directory per generation.
/// An interval of zero disables writing entirely.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval_ticks: u64,
    scenario_name: String,
}

impl SnapshotWriter {
    pub fn new(
        output_dir: impl AsRef<Path>,
        interval_ticks: u64,
        scenario_name: impl Into<String>,
    ) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval_ticks,
            scenario_name: scenario_name.into(),
        }
    }

    pub fn maybe_write(&self, generation: u64, frame: &FrameSnapshot) -> Result<Option<PathBuf>> {
        if self.interval_ticks == 0 || frame.tick % self.interval_ticks != 0 {
            return Ok(None);
        }

        let dir = self
            .output_dir
            .join(&self.scenario_name)
            .join(format!("gen_{generation:04}"));
        let meta_path = dir.join("meta.json");
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create snapshot dir {}", dir.display()))?;
            let meta = GenerationMeta {
                scenario: &self.scenario_name,
                generation,
                written_at: Utc::now(),
            };
            fs::write(&meta_path, serde_json::to_string_pretty(&meta)?)
                .with_context(|| format!("Failed to write {}", meta_path.display()))?;
        }

        let file_path = dir.join(format!("tick_{:06}.json", frame.tick));
        let json = serde_json::to_string_pretty(frame)?;
        fs::write(&file_path, json)
            .with_context(|| format!("Failed to write snapshot {}", file_path.display()))?;
        Ok(Some(file_path))
    }
}
