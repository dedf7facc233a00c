//! Memoizing layer over an engine gateway.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use moka::sync::Cache;
use tracing::trace;

use crate::error::AnalysisError;
use crate::gateway::{EngineGateway, Line};
use crate::position::Position;

/// Cache key. Width is deliberately not part of the key; the stored entry
/// remembers how wide its fetch was.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct AnalysisKey {
    fen: String,
    depth: u32,
}

#[derive(Debug)]
struct CachedLines {
    width: u32,
    lines: Vec<Line>,
}

/// Hit/miss counters for the memoizer.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CacheStats {
    fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit ratio in [0, 1]; 0.0 before the first lookup.
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }
}

/// Bounded memoizer for engine analysis, keyed by canonical FEN and depth.
///
/// A request narrower than the cached entry is served by truncating it; a
/// wider request goes back to the engine and overwrites the entry.
/// Concurrent misses on the same key may each reach the engine; the last
/// insert wins, which is harmless because entries for one key only differ
/// by width.
pub struct AnalysisMemoizer<G> {
    gateway: G,
    cache: Cache<AnalysisKey, Arc<CachedLines>>,
    stats: CacheStats,
}

impl<G: EngineGateway> AnalysisMemoizer<G> {
    /// `capacity` is the maximum number of (position, depth) entries kept.
    pub fn new(gateway: G, capacity: u64) -> Self {
        Self {
            gateway,
            cache: Cache::builder().max_capacity(capacity).build(),
            stats: CacheStats::default(),
        }
    }

    /// Top lines for `position` at `depth`, at most `width` of them.
    /// Consults the cache first; semantics otherwise match
    /// [`EngineGateway::analyze`].
    pub async fn lines(
        &self,
        position: &Position,
        depth: u32,
        width: u32,
    ) -> Result<Vec<Line>, AnalysisError> {
        let key = AnalysisKey {
            fen: position.fen().to_string(),
            depth,
        };

        if let Some(entry) = self.cache.get(&key) {
            if entry.width >= width {
                self.stats.record_hit();
                trace!(fen = %key.fen, depth, "Analysis cache HIT");
                return Ok(entry.lines.iter().take(width as usize).cloned().collect());
            }
        }

        self.stats.record_miss();
        trace!(fen = %key.fen, depth, width, "Analysis cache MISS");

        let lines = self.gateway.analyze(position, depth, width).await?;
        self.cache.insert(
            key,
            Arc::new(CachedLines {
                width,
                lines: lines.clone(),
            }),
        );
        Ok(lines)
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Run pending cache maintenance so counts and evictions are visible.
    pub fn sync(&self) {
        self.cache.run_pending_tasks();
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_start_empty() {
        let stats = CacheStats::default();
        assert_eq!(stats.hits(), 0);
        assert_eq!(stats.misses(), 0);
        assert_eq!(stats.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        let stats = CacheStats::default();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hits(), 3);
        assert_eq!(stats.misses(), 1);
        assert!((stats.hit_ratio() - 0.75).abs() < 1e-9);
    }
}
