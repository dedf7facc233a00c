//! Move quality classification: pure functions over centipawn scores,
//! no engine or board dependencies.

use serde::Serialize;

/// Centipawn loss at or below which a move still counts as good.
pub const CP_THRESHOLD: i32 = 50;

/// Magnitude used when folding forced-mate scores into centipawns.
pub const MATE_SCORE: i32 = 10_000;

const INACCURACY_THRESHOLD: i32 = 100;
const MISTAKE_THRESHOLD: i32 = 300;
const BLUNDER_THRESHOLD: i32 = 999;

/// Quality tier for a candidate move, by increasing severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Label {
    Best,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
    MassiveBlunder,
    /// The move never appeared in the engine's lines at the reference depth.
    Unknown,
}

impl Label {
    /// Good side of the good/bad split used for depth resolution.
    pub fn is_good(self) -> bool {
        matches!(self, Label::Best | Label::Good)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Label::Best => "BEST",
            Label::Good => "GOOD",
            Label::Inaccuracy => "INACCURACY",
            Label::Mistake => "MISTAKE",
            Label::Blunder => "BLUNDER",
            Label::MassiveBlunder => "MASSIVE_BLUNDER",
            Label::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a move by its centipawn loss against the engine's top line.
/// Every tier includes its upper bound.
pub fn classify(delta: i32) -> Label {
    if delta == 0 {
        Label::Best
    } else if delta <= CP_THRESHOLD {
        Label::Good
    } else if delta <= INACCURACY_THRESHOLD {
        Label::Inaccuracy
    } else if delta <= MISTAKE_THRESHOLD {
        Label::Mistake
    } else if delta <= BLUNDER_THRESHOLD {
        Label::Blunder
    } else {
        Label::MassiveBlunder
    }
}

/// Fold an engine score into a single relative centipawn value, mate
/// taking precedence: mate in n becomes `MATE_SCORE - n` for the side to
/// move, `-MATE_SCORE - n` when the side to move is getting mated.
pub fn relative_score(cp: Option<i32>, mate: Option<i32>) -> Option<i32> {
    match (mate, cp) {
        (Some(n), _) if n > 0 => Some(MATE_SCORE - n),
        (Some(n), _) => Some(-MATE_SCORE - n),
        (None, Some(cp)) => Some(cp),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(0), Label::Best);
        assert_eq!(classify(1), Label::Good);
        assert_eq!(classify(50), Label::Good);
        assert_eq!(classify(51), Label::Inaccuracy);
        assert_eq!(classify(100), Label::Inaccuracy);
        assert_eq!(classify(101), Label::Mistake);
        assert_eq!(classify(300), Label::Mistake);
        assert_eq!(classify(301), Label::Blunder);
        assert_eq!(classify(999), Label::Blunder);
        assert_eq!(classify(1000), Label::MassiveBlunder);
        assert_eq!(classify(9_999), Label::MassiveBlunder);
    }

    #[test]
    fn test_is_good_split() {
        assert!(Label::Best.is_good());
        assert!(Label::Good.is_good());
        assert!(!Label::Inaccuracy.is_good());
        assert!(!Label::Mistake.is_good());
        assert!(!Label::Blunder.is_good());
        assert!(!Label::MassiveBlunder.is_good());
        assert!(!Label::Unknown.is_good());
    }

    #[test]
    fn test_relative_score_cp_only() {
        assert_eq!(relative_score(Some(35), None), Some(35));
        assert_eq!(relative_score(Some(-120), None), Some(-120));
        assert_eq!(relative_score(None, None), None);
    }

    #[test]
    fn test_relative_score_mate_folding() {
        // Mating in 1 is worth more than mating in 3
        assert_eq!(relative_score(None, Some(1)), Some(9_999));
        assert_eq!(relative_score(None, Some(3)), Some(9_997));
        // Getting mated: worse the sooner it lands
        assert_eq!(relative_score(None, Some(-1)), Some(-9_999));
        assert_eq!(relative_score(None, Some(-3)), Some(-9_997));
        assert_eq!(relative_score(None, Some(0)), Some(-10_000));
    }

    #[test]
    fn test_relative_score_mate_precedence() {
        // Mate wins over a stale cp value on the same line
        assert_eq!(relative_score(Some(250), Some(2)), Some(9_998));
        assert_eq!(relative_score(Some(250), Some(-2)), Some(-9_998));
    }

    #[test]
    fn test_label_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_value(Label::MassiveBlunder).unwrap(),
            serde_json::json!("MASSIVE_BLUNDER")
        );
        assert_eq!(serde_json::to_value(Label::Best).unwrap(), serde_json::json!("BEST"));
        assert_eq!(serde_json::to_value(Label::Unknown).unwrap(), serde_json::json!("UNKNOWN"));
    }
}
