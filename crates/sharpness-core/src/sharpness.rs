//! Position sharpness: how punishing a position is to play.
//!
//! A position is sharp when few of its legal moves hold the evaluation and
//! the engine needs depth to see which ones do. A wide evaluation gap
//! between holding and not holding sharpens it further. The aggregator
//! resolves each candidate move's depth and partitions the candidates into
//! good and bad, then folds the three factors into one bounded score.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cache::AnalysisMemoizer;
use crate::classify::Label;
use crate::error::AnalysisError;
use crate::gateway::EngineGateway;
use crate::position::Position;
use crate::resolver::resolve_move_depth;

/// One classified candidate move in a sharpness report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMove {
    /// SAN where the move converts, raw UCI otherwise
    #[serde(rename = "move")]
    pub san: String,
    /// Relative centipawn score at the reference depth
    pub score: i32,
    /// Centipawn loss against the rank-1 line
    pub delta: i32,
    pub label: Label,
    /// First depth whose local verdict matches ground truth
    pub depth_resolved: u32,
    /// Engine rank of this line at the reference depth
    pub multipv: u32,
}

/// Aggregated sharpness for one position.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharpnessReport {
    pub score: f64,
    pub turn: &'static str,
    pub top_moves: Vec<ResolvedMove>,
}

/// Computes sharpness by sweeping memoized engine analyses across depths.
pub struct SharpnessAnalyzer<G> {
    memoizer: AnalysisMemoizer<G>,
    width: u32,
}

impl<G: EngineGateway> SharpnessAnalyzer<G> {
    /// `width` is the number of candidate lines requested per engine query.
    pub fn new(memoizer: AnalysisMemoizer<G>, width: u32) -> Self {
        Self {
            memoizer,
            width: width.max(1),
        }
    }

    pub fn memoizer(&self) -> &AnalysisMemoizer<G> {
        &self.memoizer
    }

    /// Score `position`, sweeping depths 1..=`max_depth`.
    ///
    /// A terminal position or an engine that produced unusable output
    /// yields a degraded report: score 0.0 and no moves. An engine that
    /// cannot be started at all is an error.
    pub async fn analyze(
        &self,
        position: &Position,
        max_depth: u32,
    ) -> Result<SharpnessReport, AnalysisError> {
        let num_legal_moves = position.legal_move_count();
        if num_legal_moves == 0 {
            info!(fen = position.fen(), "Terminal position, nothing to resolve");
            return Ok(Self::degraded(position));
        }

        let lines = match self.memoizer.lines(position, max_depth, self.width).await {
            Ok(lines) => lines,
            Err(e @ AnalysisError::EngineUnavailable(_)) => return Err(e),
            Err(e) => {
                warn!(error = %e, fen = position.fen(), "Engine failed, returning degraded result");
                return Ok(Self::degraded(position));
            }
        };

        let Some(top_score) = lines.first().map(|l| l.score) else {
            return Ok(Self::degraded(position));
        };

        let mut top_moves = Vec::with_capacity(lines.len());
        for line in &lines {
            let Some(uci) = line.first_move() else {
                continue;
            };

            let delta = (line.score - top_score).abs();
            let resolved =
                resolve_move_depth(&self.memoizer, position, uci, max_depth, self.width).await;
            let (depth_resolved, label) = match resolved {
                Ok(resolved) => resolved,
                Err(e @ AnalysisError::EngineUnavailable(_)) => return Err(e),
                Err(e) => {
                    warn!(error = %e, fen = position.fen(), "Engine failed mid-sweep, returning degraded result");
                    return Ok(Self::degraded(position));
                }
            };

            let san = position.san(uci);
            debug!(
                mv = %san,
                score = line.score,
                delta,
                label = %label,
                depth = depth_resolved,
                multipv = line.multipv,
                "Move classified"
            );

            top_moves.push(ResolvedMove {
                san,
                score: line.score,
                delta,
                label,
                depth_resolved,
                multipv: line.multipv,
            });
        }

        let score = self.aggregate(&top_moves, num_legal_moves, max_depth);
        Ok(SharpnessReport {
            score,
            turn: position.turn_name(),
            top_moves,
        })
    }

    fn aggregate(&self, moves: &[ResolvedMove], num_legal_moves: usize, max_depth: u32) -> f64 {
        let depths: Vec<f64> = moves.iter().map(|m| m.depth_resolved as f64).collect();
        let avg_depth = if depths.is_empty() { 1.0 } else { mean(&depths) };
        let dd = depth_difficulty(avg_depth, max_depth);

        let good_scores: Vec<f64> = moves
            .iter()
            .filter(|m| m.label.is_good())
            .map(|m| m.score as f64)
            .collect();
        let bad_scores: Vec<f64> = moves
            .iter()
            .filter(|m| !m.label.is_good())
            .map(|m| m.score as f64)
            .collect();

        let scarcity = (1.0 - good_scores.len() as f64 / num_legal_moves as f64).max(0.1);
        let dropoff = dropoff_factor(&good_scores, &bad_scores);

        let raw = scarcity * dd * dropoff;
        let score = round2(1000.0 * gated(raw, dd));

        info!(
            score,
            good_moves = good_scores.len(),
            legal_moves = num_legal_moves,
            avg_depth,
            dropoff,
            cache_hit_ratio = self.memoizer.stats().hit_ratio(),
            "Sharpness computed"
        );

        score
    }

    fn degraded(position: &Position) -> SharpnessReport {
        SharpnessReport {
            score: 0.0,
            turn: position.turn_name(),
            top_moves: Vec::new(),
        }
    }
}

/// Concave map of average resolve depth to (0, 1], floored at 0.1.
/// Early depth increases count for more than late ones.
fn depth_difficulty(avg_depth: f64, max_depth: u32) -> f64 {
    let ratio = avg_depth / max_depth as f64;
    (9.0 * ratio + 1.0).log10().max(0.1)
}

/// Severity of the evaluation gap between good and bad candidates in
/// (0, 1], floored at 0.1 and capped at 999 centipawns. Defaults to 1
/// when either side is empty.
fn dropoff_factor(good_scores: &[f64], bad_scores: &[f64]) -> f64 {
    if good_scores.is_empty() || bad_scores.is_empty() {
        return 1.0;
    }
    let dropoff_cp = (mean(good_scores) - mean(bad_scores)).min(999.0);
    (dropoff_cp / 1000.0).max(0.1)
}

/// Blend of raw and log-compressed sharpness, weighted by depth
/// difficulty: compression kicks in as positions get depth-hard.
fn gated(raw: f64, depth_difficulty: f64) -> f64 {
    let curved = (9.0 * raw + 1.0).log10();
    raw * (1.0 - depth_difficulty) + curved * depth_difficulty
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
