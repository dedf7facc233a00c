use axum::{extract::Query, Extension, Json};
use serde::{Deserialize, Serialize};

use sharpness_core::{Color, EngineGateway, Position, StockfishGateway};

use crate::config::Config;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct EvalQuery {
    pub fen: String,
    pub depth: Option<u32>,
}

#[derive(Serialize)]
pub struct EvalResponse {
    /// Evaluation in pawns from white's perspective
    pub eval: Option<f64>,
    pub turn: &'static str,
}

/// GET /api/eval?fen=...&depth=...
/// Single-line evaluation of a position. Goes straight to the engine,
/// bypassing the analysis cache.
pub async fn get_eval(
    Extension(gateway): Extension<StockfishGateway>,
    Extension(config): Extension<Config>,
    Query(q): Query<EvalQuery>,
) -> Result<Json<EvalResponse>, AppError> {
    let position = Position::from_fen(&q.fen)?;
    let depth = q.depth.unwrap_or(config.max_depth).clamp(1, config.max_depth);

    let lines = gateway.analyze(&position, depth, 1).await?;
    let eval = lines.first().map(|line| {
        let white_cp = if position.turn() == Color::Black {
            -line.score
        } else {
            line.score
        };
        f64::from(white_cp) / 100.0
    });

    Ok(Json(EvalResponse {
        eval,
        turn: position.turn_name(),
    }))
}
