//! Preview playback
//!
//! `play` is fire-and-forget and never queues. Playing a second preview while
//! the first is still running starts a second concurrent stream; nothing is
//! stopped implicitly. Streams end on their own or through `stop`/`stop_all`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Result;
use crate::http::ApiClient;
use crate::{VibeError, VibeConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaybackId(pub u64);

impl std::fmt::Display for PlaybackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "preview-{}", self.0)
    }
}

/// Where a preview stream ends up
#[async_trait]
pub trait AudioOutput: Send + Sync {
    async fn stream(&self, id: PlaybackId, preview_url: &str) -> Result<()>;
}

/// Downloads each preview into a spool directory, one file per stream, for
/// an external player to pick up
pub struct SpoolOutput {
    http: ApiClient,
    dir: PathBuf,
}

impl SpoolOutput {
    pub fn new(http: ApiClient, dir: impl Into<PathBuf>) -> Self {
        Self {
            http,
            dir: dir.into(),
        }
    }

    pub fn from_config(config: &VibeConfig, http: ApiClient) -> Self {
        Self::new(http, &config.music.spool_dir)
    }
}

#[async_trait]
impl AudioOutput for SpoolOutput {
    async fn stream(&self, id: PlaybackId, preview_url: &str) -> Result<()> {
        let audio = self.http.fetch_bytes("preview audio", preview_url).await?;
        let spool_error = |e: std::io::Error| {
            VibeError::config(format!(
                "Cannot write preview to {}: {e}",
                self.dir.display()
            ))
        };
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(spool_error)?;
        let path = self.dir.join(format!("{id}.mp3"));
        tokio::fs::write(&path, &audio).await.map_err(spool_error)?;
        info!("Spooled {} ({} bytes) to {}", id, audio.len(), path.display());
        Ok(())
    }
}

pub struct PreviewDeck {
    output: Arc<dyn AudioOutput>,
    next_id: AtomicU64,
    streams: Mutex<HashMap<PlaybackId, JoinHandle<()>>>,
}

impl PreviewDeck {
    pub fn new(output: Arc<dyn AudioOutput>) -> Self {
        Self {
            output,
            next_id: AtomicU64::new(1),
            streams: Mutex::new(HashMap::new()),
        }
    }

    /// Start a new stream. Must be called from within a tokio runtime.
    pub fn play(&self, preview_url: &str) -> PlaybackId {
        let id = PlaybackId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let output = self.output.clone();
        let url = preview_url.to_string();

        let handle = tokio::spawn(async move {
            debug!("Starting {} from {}", id, url);
            if let Err(e) = output.stream(id, &url).await {
                warn!("Preview {} failed: {}", id, e);
            }
        });

        let mut streams = self.lock_streams();
        streams.retain(|_, stream| !stream.is_finished());
        streams.insert(id, handle);
        id
    }

    /// Number of streams still playing
    pub fn active(&self) -> usize {
        let mut streams = self.lock_streams();
        streams.retain(|_, stream| !stream.is_finished());
        streams.len()
    }

    pub fn is_playing(&self, id: PlaybackId) -> bool {
        self.lock_streams()
            .get(&id)
            .is_some_and(|stream| !stream.is_finished())
    }

    /// Stop one stream; returns false if it already ended
    pub fn stop(&self, id: PlaybackId) -> bool {
        match self.lock_streams().remove(&id) {
            Some(stream) if !stream.is_finished() => {
                stream.abort();
                true
            }
            _ => false,
        }
    }

    pub fn stop_all(&self) -> usize {
        let mut stopped = 0;
        for (_, stream) in self.lock_streams().drain() {
            if !stream.is_finished() {
                stream.abort();
                stopped += 1;
            }
        }
        stopped
    }

    fn lock_streams(&self) -> MutexGuard<'_, HashMap<PlaybackId, JoinHandle<()>>> {
        self.streams.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for PreviewDeck {
    fn drop(&mut self) {
        self.stop_all();
    }
}
