//! Destinations exported PNGs are "downloaded" to

use crate::error::Result;
use crate::export::ExportArtifact;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Somewhere an export can be handed off to
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Deliver the artifact and return a human-readable location.
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String>;
}

/// Writes artifacts into a directory under their download filename
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Deliver into `dir`, creating it on first use
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(&artifact.filename);
        tokio::fs::write(&path, &artifact.png).await?;
        tracing::debug!(path = %path.display(), "Wrote export");
        Ok(path.display().to_string())
    }
}

/// Keeps delivered artifacts in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    delivered: Arc<Mutex<Vec<ExportArtifact>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first
    pub fn delivered(&self) -> Vec<ExportArtifact> {
        self.delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &ExportArtifact) -> Result<String> {
        let mut delivered = self
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        delivered.push(artifact.clone());
        Ok(format!("memory://{}/{}", delivered.len(), artifact.filename))
    }
}
