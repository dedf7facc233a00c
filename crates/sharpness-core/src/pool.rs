//! Bounded pool of reusable Stockfish sessions.

use std::path::Path;
use std::sync::{Arc, Mutex};

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, warn};

use crate::error::AnalysisError;
use crate::stockfish::StockfishEngine;

/// Hands out engine sessions under a concurrency cap. Sessions spawn
/// lazily and park in an idle list between uses; a discarded session's
/// process is killed when it drops.
#[derive(Clone)]
pub struct EnginePool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    stockfish_path: String,
    permits: Arc<Semaphore>,
    idle: Mutex<Vec<StockfishEngine>>,
}

impl EnginePool {
    pub fn new(stockfish_path: impl Into<String>, size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                stockfish_path: stockfish_path.into(),
                permits: Arc::new(Semaphore::new(size.max(1))),
                idle: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Borrow a session, waiting for a free slot and spawning a process if
    /// no idle one is parked.
    pub async fn acquire(&self) -> Result<PooledEngine, AnalysisError> {
        let permit = self
            .inner
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AnalysisError::Engine("Engine pool closed".into()))?;

        let parked = self.inner.idle.lock().ok().and_then(|mut idle| idle.pop());
        let engine = match parked {
            Some(engine) => {
                debug!("Reusing idle Stockfish session");
                engine
            }
            None => self.spawn().await?,
        };

        Ok(PooledEngine {
            engine: Some(engine),
            pool: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    async fn spawn(&self) -> Result<StockfishEngine, AnalysisError> {
        let path = &self.inner.stockfish_path;
        if !Path::new(path).exists() {
            return Err(AnalysisError::EngineUnavailable(format!(
                "Stockfish not found at {path}"
            )));
        }
        debug!(path, "Spawning Stockfish session");
        StockfishEngine::new(path).await
    }
}

/// Scoped borrow of one pooled session. Dropping the guard parks the
/// session for reuse; `discard` retires it instead, which kills the
/// process when the session drops.
pub struct PooledEngine {
    engine: Option<StockfishEngine>,
    pool: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl PooledEngine {
    pub fn engine(&mut self) -> &mut StockfishEngine {
        self.engine.as_mut().expect("session taken only by discard")
    }

    /// Retire this session instead of returning it to the pool.
    pub fn discard(mut self) {
        if self.engine.take().is_some() {
            warn!("Discarding failed Stockfish session");
        }
    }
}

impl Drop for PooledEngine {
    fn drop(&mut self) {
        if let Some(engine) = self.engine.take() {
            if let Ok(mut idle) = self.pool.idle.lock() {
                idle.push(engine);
            }
        }
    }
}
