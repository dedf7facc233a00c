//! Shared fixtures: scripted engine gateways and positions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use sharpness_core::{AnalysisError, EngineGateway, Line, Position};

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

pub fn start_position() -> Position {
    Position::from_fen(START_FEN).unwrap()
}

/// Build a single-move line. Scripts list lines best-first, so `multipv`
/// should match the list position.
pub fn line(multipv: u32, uci: &str, score: i32) -> Line {
    Line {
        multipv,
        score,
        pv: vec![uci.to_string()],
    }
}

/// Gateway that replays scripted lines per depth and counts invocations.
/// Depths without a script produce an engine error, like a session that
/// died mid-call.
pub struct MockGateway {
    responses: HashMap<u32, Vec<Line>>,
    pub calls: Arc<AtomicU32>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Script the lines returned at one depth.
    pub fn with_depth(mut self, depth: u32, lines: Vec<Line>) -> Self {
        self.responses.insert(depth, lines);
        self
    }

    /// Script identical lines for every depth in 1..=max_depth.
    pub fn uniform(max_depth: u32, lines: Vec<Line>) -> Self {
        let mut gateway = Self::new();
        for depth in 1..=max_depth {
            gateway.responses.insert(depth, lines.clone());
        }
        gateway
    }
}

impl EngineGateway for MockGateway {
    async fn analyze(
        &self,
        _position: &Position,
        depth: u32,
        width: u32,
    ) -> Result<Vec<Line>, AnalysisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.get(&depth) {
            Some(lines) => Ok(lines.iter().take(width as usize).cloned().collect()),
            None => Err(AnalysisError::Engine(format!(
                "No scripted lines at depth {depth}"
            ))),
        }
    }
}
