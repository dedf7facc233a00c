//! Depth resolution: how deep must the engine look before it judges a move
//! the way the deep search does.

use tracing::warn;

use crate::cache::AnalysisMemoizer;
use crate::classify::{classify, Label, CP_THRESHOLD};
use crate::error::AnalysisError;
use crate::gateway::{EngineGateway, Line};
use crate::position::Position;

/// Find the first depth at which the local good/bad verdict for `uci`
/// agrees with the ground-truth verdict at `max_depth`, along with the
/// ground-truth quality label.
///
/// Ground truth comes from the `max_depth` analysis: a move within
/// `CP_THRESHOLD` of the top line is good, anything worse is bad. The
/// sweep is linear from depth 1 because agreement is not monotonic; an
/// engine can land on the deep verdict at depth 3 and wander off it
/// again at depth 5. Depths where the move is missing from the lines
/// are skipped.
///
/// Returns `max_depth + 1` with `Label::Unknown` when the move is absent
/// at the reference depth, and `max_depth + 1` with the real label when
/// no swept depth agrees.
pub async fn resolve_move_depth<G: EngineGateway>(
    memoizer: &AnalysisMemoizer<G>,
    position: &Position,
    uci: &str,
    max_depth: u32,
    width: u32,
) -> Result<(u32, Label), AnalysisError> {
    let reference = memoizer.lines(position, max_depth, width).await?;
    let reference_top = top_score(&reference)?;

    let Some(target) = reference.iter().find(|l| l.first_move() == Some(uci)) else {
        warn!(mv = uci, depth = max_depth, "Move not found at reference depth");
        return Ok((max_depth + 1, Label::Unknown));
    };

    let ground_truth_delta = (target.score - reference_top).abs();
    let is_good = ground_truth_delta <= CP_THRESHOLD;
    let label = classify(ground_truth_delta);

    for depth in 1..=max_depth {
        let lines = memoizer.lines(position, depth, width).await?;
        let local_top = top_score(&lines)?;

        let Some(line) = lines.iter().find(|l| l.first_move() == Some(uci)) else {
            continue;
        };

        let local_delta = (line.score - local_top).abs();
        if (local_delta <= CP_THRESHOLD) == is_good {
            return Ok((depth, label));
        }
    }

    Ok((max_depth + 1, label))
}

fn top_score(lines: &[Line]) -> Result<i32, AnalysisError> {
    lines
        .first()
        .map(|l| l.score)
        .ok_or_else(|| AnalysisError::Engine("Analysis returned no lines".into()))
}
