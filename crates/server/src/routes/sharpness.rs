use axum::{extract::Query, Extension, Json};
use serde::Deserialize;

use sharpness_core::{Position, SharpnessReport};

use crate::config::Config;
use crate::error::AppError;
use crate::SharedAnalyzer;

#[derive(Deserialize)]
pub struct SharpnessQuery {
    pub fen: String,
    pub depth: Option<u32>,
}

/// GET /api/sharpness?fen=...&depth=...
/// Sharpness score plus the classified top candidate moves. Depth defaults
/// to the configured maximum and is clamped to it.
pub async fn get_sharpness(
    Extension(analyzer): Extension<SharedAnalyzer>,
    Extension(config): Extension<Config>,
    Query(q): Query<SharpnessQuery>,
) -> Result<Json<SharpnessReport>, AppError> {
    let position = Position::from_fen(&q.fen)?;
    let depth = q.depth.unwrap_or(config.max_depth).clamp(1, config.max_depth);

    let report = analyzer.analyze(&position, depth).await?;
    Ok(Json(report))
}
