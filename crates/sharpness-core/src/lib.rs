//! Chess position sharpness analysis.
//!
//! Scores how difficult a position is to play correctly by querying
//! Stockfish at increasing depths and measuring how quickly each candidate
//! move's good/bad classification settles on the deep-search verdict.
//! The score rises when good moves are scarce and when their verdicts
//! settle late; a steep evaluation dropoff from the good moves to the rest
//! pushes it up further.

pub mod cache;
pub mod classify;
pub mod error;
pub mod gateway;
pub mod pool;
pub mod position;
pub mod resolver;
pub mod sharpness;
pub mod stockfish;

pub use shakmaty::Color;

pub use cache::{AnalysisMemoizer, CacheStats};
pub use classify::{classify, relative_score, Label, CP_THRESHOLD, MATE_SCORE};
pub use error::AnalysisError;
pub use gateway::{EngineGateway, Line, StockfishGateway};
pub use pool::{EnginePool, PooledEngine};
pub use position::Position;
pub use resolver::resolve_move_depth;
pub use sharpness::{ResolvedMove, SharpnessAnalyzer, SharpnessReport};
pub use stockfish::StockfishEngine;
