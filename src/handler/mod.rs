//! # Request Handler
//!
//! The layer between callers and the transform engine. It screens uploads by
//! filename, runs transforms on blocking worker threads with bounded
//! concurrency, and keeps finished PNGs in a [`ResultStore`] until they are
//! collected or expire.

pub mod store;

pub use store::{ResultStore, StoredResult};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::{
    error::{ImageError, Result, StylizerError},
    transform::{TransformEngine, TransformRequest},
};

/// An uploaded file
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// Client-side filename; only its extension is inspected
    pub filename: String,

    /// File contents
    pub bytes: Vec<u8>,

    /// Requested style, if any
    pub style: Option<String>,
}

impl Upload {
    pub fn new<S: Into<String>>(filename: S, bytes: Vec<u8>) -> Self {
        Self { filename: filename.into(), bytes, style: None }
    }

    pub fn with_style<S: Into<String>>(mut self, style: S) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Runs uploads through a shared engine and stores the results
pub struct RequestHandler {
    engine: Arc<TransformEngine>,
    permits: Semaphore,
    store: ResultStore,
}

impl RequestHandler {
    pub fn new(engine: TransformEngine) -> Self {
        let workers = engine.config().handler.worker_threads.max(1);
        let retention = engine.config().handler.retention_secs;

        Self {
            engine: Arc::new(engine),
            permits: Semaphore::new(workers),
            store: ResultStore::new(retention),
        }
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Transform an upload and return the id its PNG is stored under
    ///
    /// Filenames without an allowed extension are rejected with
    /// `InvalidFormat` before the bytes are looked at.
    pub async fn handle(&self, upload: Upload) -> Result<String> {
        self.check_filename(&upload.filename)?;

        let style = self.resolve_style(upload.style.as_deref());
        debug!("Accepted '{}' ({} bytes) for '{}'", upload.filename, upload.bytes.len(), style);

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| StylizerError::generic(format!("worker pool closed: {}", e)))?;

        let engine = Arc::clone(&self.engine);
        let request = TransformRequest::new(upload.bytes, upload.style);
        let image = tokio::task::spawn_blocking(move || engine.transform_request(request))
            .await
            .map_err(|e| StylizerError::generic(format!("transform worker failed: {}", e)))??;

        let id = self.store.insert(image, &style);
        info!("Stored result {} for '{}'", id, upload.filename);
        Ok(id)
    }

    /// Remove results older than the retention window
    pub fn sweep(&self) -> usize {
        self.store.sweep_expired(Utc::now())
    }

    fn check_filename(&self, filename: &str) -> Result<()> {
        if filename.trim().is_empty() {
            return Err(ImageError::InvalidFormat { reason: "no file selected".to_string() }.into());
        }

        if !self.engine.config().limits.is_allowed_filename(filename) {
            warn!("Rejected '{}': extension not allowed", filename);
            return Err(ImageError::InvalidFormat {
                reason: format!(
                    "'{}' is not one of: {}",
                    filename,
                    self.engine.config().limits.allowed_extensions.join(", ")
                ),
            }
            .into());
        }

        Ok(())
    }

    fn resolve_style(&self, style: Option<&str>) -> String {
        let registry = self.engine.registry();
        style
            .and_then(|name| registry.get_style(name))
            .map(|style| style.name().to_string())
            .unwrap_or_else(|| registry.default_style().to_string())
    }
}
