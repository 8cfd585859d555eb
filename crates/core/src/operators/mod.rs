//! Operator rules and the registry the problem generator draws from.
//!
//! Each rule owns its per-difficulty operand ranges and knows how to produce
//! the numeric part of a problem. The registry is assembled at startup and
//! then shared read-only.

use rand::{Rng, RngCore};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::model::{Difficulty, Operator, ProblemData};

mod addition;
mod division;
mod multiplication;
mod subtraction;

pub use addition::Addition;
pub use division::Division;
pub use multiplication::Multiplication;
pub use subtraction::Subtraction;

//
// ─── RANGES & CONSTRAINTS ──────────────────────────────────────────────────────
//

/// Inclusive integer range operands are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperandRange {
    pub min: i64,
    pub max: i64,
}

impl OperandRange {
    /// Builds a range; bounds given in the wrong order are swapped.
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Draws a value uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.min..=self.max)
    }

    #[must_use]
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Optional generation constraints for one difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OperatorConstraints {
    /// Permit fractional answers (hard division).
    pub allow_decimals: bool,
    /// Chance in `[0, 1]` of producing a fractional answer when allowed.
    pub decimal_probability: f64,
    /// Swap operands so the answer is never negative (easy/medium subtraction).
    pub ensure_non_negative: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyConfig {
    pub operand1: OperandRange,
    pub operand2: OperandRange,
    pub constraints: Option<OperatorConstraints>,
}

impl DifficultyConfig {
    #[must_use]
    pub const fn new(operand1: OperandRange, operand2: OperandRange) -> Self {
        Self {
            operand1,
            operand2,
            constraints: None,
        }
    }

    #[must_use]
    pub const fn with_constraints(mut self, constraints: OperatorConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    /// Constraints for this difficulty, or the permissive defaults.
    #[must_use]
    pub fn constraints(&self) -> OperatorConstraints {
        self.constraints.unwrap_or_default()
    }
}

/// One `DifficultyConfig` per difficulty level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTable {
    pub easy: DifficultyConfig,
    pub medium: DifficultyConfig,
    pub hard: DifficultyConfig,
}

impl DifficultyTable {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyConfig {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

//
// ─── RULE CONTRACT ─────────────────────────────────────────────────────────────
//

/// Generation rule for one operator symbol.
pub trait OperatorRule: Send + Sync {
    /// Symbol this rule is registered under.
    fn symbol(&self) -> Operator;

    /// Human-readable name, e.g. `Addition`.
    fn label(&self) -> &str;

    /// Symbol shown to players on operator toggles.
    fn display_symbol(&self) -> &str;

    fn difficulties(&self) -> &DifficultyTable;

    fn config(&self, difficulty: Difficulty) -> &DifficultyConfig {
        self.difficulties().get(difficulty)
    }

    /// Produce the numeric fields of a problem. Id and decoration are attached
    /// by the generator.
    fn generate(&self, difficulty: Difficulty, rng: &mut dyn RngCore) -> ProblemData;
}

//
// ─── REGISTRY ──────────────────────────────────────────────────────────────────
//

/// Lookup table from operator symbol to its generation rule.
#[derive(Clone, Default)]
pub struct OperatorRegistry {
    rules: HashMap<Operator, Arc<dyn OperatorRule>>,
}

impl OperatorRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the four built-in rules.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Addition::default());
        registry.register(Subtraction::default());
        registry.register(Multiplication::default());
        registry.register(Division::default());
        registry
    }

    /// Add a rule, replacing any rule already registered for its symbol.
    ///
    /// Returns the replaced rule, if any.
    pub fn register<R>(&mut self, rule: R) -> Option<Arc<dyn OperatorRule>>
    where
        R: OperatorRule + 'static,
    {
        self.rules.insert(rule.symbol(), Arc::new(rule))
    }

    #[must_use]
    pub fn get(&self, symbol: Operator) -> Option<&dyn OperatorRule> {
        self.rules.get(&symbol).map(|rule| &**rule)
    }

    #[must_use]
    pub fn contains(&self, symbol: Operator) -> bool {
        self.rules.contains_key(&symbol)
    }

    /// All registered rules, in canonical operator order.
    #[must_use]
    pub fn list(&self) -> Vec<&dyn OperatorRule> {
        Operator::ALL
            .iter()
            .filter_map(|op| self.get(*op))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.list().iter().map(|rule| rule.symbol()))
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    pub(crate) fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    /// Fixed rule used to check overwrite semantics.
    struct AlwaysSeven {
        difficulties: DifficultyTable,
    }

    impl AlwaysSeven {
        fn new() -> Self {
            let config = DifficultyConfig::new(OperandRange::new(3, 3), OperandRange::new(4, 4));
            Self {
                difficulties: DifficultyTable {
                    easy: config,
                    medium: config,
                    hard: config,
                },
            }
        }
    }

    impl OperatorRule for AlwaysSeven {
        fn symbol(&self) -> Operator {
            Operator::Add
        }

        fn label(&self) -> &str {
            "Sevens"
        }

        fn display_symbol(&self) -> &str {
            "7"
        }

        fn difficulties(&self) -> &DifficultyTable {
            &self.difficulties
        }

        fn generate(&self, difficulty: Difficulty, _rng: &mut dyn RngCore) -> ProblemData {
            ProblemData {
                operand1: 3,
                operand2: 4,
                operator: Operator::Add,
                answer: 7.0,
                difficulty,
            }
        }
    }

    #[test]
    fn builtin_registers_all_four() {
        let registry = OperatorRegistry::builtin();
        assert_eq!(registry.len(), 4);
        let labels: Vec<&str> = registry.list().iter().map(|rule| rule.label()).collect();
        assert_eq!(
            labels,
            ["Addition", "Subtraction", "Multiplication", "Division"]
        );
    }

    #[test]
    fn empty_registry_reports_not_found() {
        let registry = OperatorRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get(Operator::Divide).is_none());
    }

    #[test]
    fn register_overwrites_by_symbol() {
        let mut registry = OperatorRegistry::builtin();
        let replaced = registry.register(AlwaysSeven::new());
        assert_eq!(replaced.map(|rule| rule.label().to_owned()).as_deref(), Some("Addition"));
        assert_eq!(registry.len(), 4);

        let rule = registry.get(Operator::Add).unwrap();
        let data = rule.generate(Difficulty::Hard, &mut seeded(1));
        assert_eq!(data.answer, 7.0);
    }

    #[test]
    fn operand_range_normalizes_and_samples_inclusively() {
        let range = OperandRange::new(5, 2);
        assert_eq!(range, OperandRange { min: 2, max: 5 });

        let mut rng = seeded(9);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..200 {
            let v = range.sample(&mut rng);
            assert!(range.contains(v));
            seen_min |= v == 2;
            seen_max |= v == 5;
        }
        assert!(seen_min && seen_max);
    }
}
