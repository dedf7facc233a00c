pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use sharpness_core::{SharpnessAnalyzer, StockfishGateway};

/// Shared analyzer handed to routes via Extension.
pub type SharedAnalyzer = Arc<SharpnessAnalyzer<StockfishGateway>>;
