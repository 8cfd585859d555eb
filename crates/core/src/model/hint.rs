use serde::{Deserialize, Serialize};
use std::fmt;

/// Named pedagogical technique a hint walks the player through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintStrategy {
    MakingTens,
    PlaceValue,
    CountingOn,
    Doubles,
    CountingBack,
    CountingUp,
    NumberBonds,
    SkipCounting,
    RepeatedAddition,
    KnownFacts,
    Doubling,
    Array,
    FairSharing,
    Grouping,
    InverseMultiplication,
    RepeatedSubtraction,
}

impl HintStrategy {
    /// Stable tag, e.g. `making-tens`.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            HintStrategy::MakingTens => "making-tens",
            HintStrategy::PlaceValue => "place-value",
            HintStrategy::CountingOn => "counting-on",
            HintStrategy::Doubles => "doubles",
            HintStrategy::CountingBack => "counting-back",
            HintStrategy::CountingUp => "counting-up",
            HintStrategy::NumberBonds => "number-bonds",
            HintStrategy::SkipCounting => "skip-counting",
            HintStrategy::RepeatedAddition => "repeated-addition",
            HintStrategy::KnownFacts => "known-facts",
            HintStrategy::Doubling => "doubling",
            HintStrategy::Array => "array",
            HintStrategy::FairSharing => "fair-sharing",
            HintStrategy::Grouping => "grouping",
            HintStrategy::InverseMultiplication => "inverse-multiplication",
            HintStrategy::RepeatedSubtraction => "repeated-subtraction",
        }
    }

    /// Human-readable title, e.g. `Making Tens`.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            HintStrategy::MakingTens => "Making Tens",
            HintStrategy::PlaceValue => "Place Value",
            HintStrategy::CountingOn => "Counting On",
            HintStrategy::Doubles => "Doubles",
            HintStrategy::CountingBack => "Counting Back",
            HintStrategy::CountingUp => "Counting Up",
            HintStrategy::NumberBonds => "Number Bonds",
            HintStrategy::SkipCounting => "Skip Counting",
            HintStrategy::RepeatedAddition => "Repeated Addition",
            HintStrategy::KnownFacts => "Known Facts",
            HintStrategy::Doubling => "Doubling",
            HintStrategy::Array => "Array",
            HintStrategy::FairSharing => "Fair Sharing",
            HintStrategy::Grouping => "Grouping",
            HintStrategy::InverseMultiplication => "Inverse Multiplication",
            HintStrategy::RepeatedSubtraction => "Repeated Subtraction",
        }
    }
}

impl fmt::Display for HintStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub strategy: HintStrategy,
    pub message: String,
}

impl Hint {
    #[must_use]
    pub fn new(strategy: HintStrategy, message: impl Into<String>) -> Self {
        Self {
            strategy,
            message: message.into(),
        }
    }

    /// Generic advice used when no operator-specific strategy applies.
    #[must_use]
    pub fn fallback() -> Self {
        Self::new(
            HintStrategy::PlaceValue,
            "Break the problem into smaller parts!",
        )
    }
}
