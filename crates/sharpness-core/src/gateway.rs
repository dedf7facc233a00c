//! Engine access boundary: candidate lines and the gateway trait.

use std::future::Future;

use tracing::debug;

use crate::classify::relative_score;
use crate::error::AnalysisError;
use crate::pool::EnginePool;
use crate::position::Position;
use crate::stockfish::RawLine;

/// One engine candidate line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based rank; 1 is the engine's top choice
    pub multipv: u32,
    /// Relative score in centipawns, mate folded to near `MATE_SCORE`
    pub score: i32,
    /// Principal variation in UCI notation
    pub pv: Vec<String>,
}

impl Line {
    /// The candidate move itself: first move of the variation.
    pub fn first_move(&self) -> Option<&str> {
        self.pv.first().map(String::as_str)
    }
}

/// Transport to the analysis engine. One call runs a single fixed-depth,
/// fixed-width query and returns at most `width` lines, best first.
pub trait EngineGateway: Send + Sync {
    fn analyze(
        &self,
        position: &Position,
        depth: u32,
        width: u32,
    ) -> impl Future<Output = Result<Vec<Line>, AnalysisError>> + Send;
}

/// Gateway backed by the Stockfish session pool. Each call borrows one
/// session; a session that errored mid-call is retired rather than parked.
#[derive(Clone)]
pub struct StockfishGateway {
    pool: EnginePool,
}

impl StockfishGateway {
    pub fn new(pool: EnginePool) -> Self {
        Self { pool }
    }
}

impl EngineGateway for StockfishGateway {
    async fn analyze(
        &self,
        position: &Position,
        depth: u32,
        width: u32,
    ) -> Result<Vec<Line>, AnalysisError> {
        let mut session = self.pool.acquire().await?;

        let raw = match session.engine().analyse(position.fen(), depth, width).await {
            Ok(raw) => raw,
            Err(e) => {
                session.discard();
                return Err(e);
            }
        };

        let lines = lines_from_raw(raw);
        if lines.is_empty() {
            session.discard();
            return Err(AnalysisError::Engine(format!(
                "Engine returned no usable lines at depth {depth}"
            )));
        }

        debug!(
            fen = position.fen(),
            depth,
            width,
            lines = lines.len(),
            "Engine analysis complete"
        );
        Ok(lines)
    }
}

/// Turn raw wire slots into scored lines, dropping slots the engine never
/// filled. Slot order is preserved, so ranks stay 1-based and ascending.
fn lines_from_raw(raw: Vec<RawLine>) -> Vec<Line> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(i, entry)| {
            let score = relative_score(entry.cp, entry.mate)?;
            Some(Line {
                multipv: i as u32 + 1,
                score,
                pv: entry.pv,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(cp: Option<i32>, mate: Option<i32>, pv: &[&str]) -> RawLine {
        RawLine {
            pv: pv.iter().map(|m| m.to_string()).collect(),
            cp,
            mate,
        }
    }

    #[test]
    fn test_unfilled_slots_are_dropped() {
        // A position with two legal moves analysed at width 4 leaves two
        // slots empty
        let lines = lines_from_raw(vec![
            raw(Some(120), None, &["e2e4", "e7e5"]),
            raw(Some(60), None, &["d2d4"]),
            raw(None, None, &[]),
            raw(None, None, &[]),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].multipv, 1);
        assert_eq!(lines[0].score, 120);
        assert_eq!(lines[1].multipv, 2);
        assert_eq!(lines[1].first_move(), Some("d2d4"));
    }

    #[test]
    fn test_mate_scores_fold() {
        let lines = lines_from_raw(vec![
            raw(None, Some(2), &["d8h4"]),
            raw(Some(-300), None, &["g1f3"]),
        ]);
        assert_eq!(lines[0].score, 9_998);
        assert_eq!(lines[1].score, -300);
    }

    #[test]
    fn test_empty_input_yields_no_lines() {
        assert!(lines_from_raw(vec![]).is_empty());
        assert!(lines_from_raw(vec![raw(None, None, &[])]).is_empty());
    }
}
