//! MCTS configuration parameters.

use std::time::Duration;

use thiserror::Error;

/// Default exploration weight, 1 / sqrt(2).
pub const DEFAULT_EXPLORATION: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Configuration errors, reported before any tree work starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Cannot have both a time limit and an iteration limit")]
    ConflictingBudget,

    #[error("Must have either a time limit or an iteration limit")]
    MissingBudget,

    #[error("Iteration limit must be at least one")]
    ZeroIterations,

    #[error("Exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),
}

/// Stopping criterion for one search call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchBudget {
    /// Keep running rounds until this much wall-clock time has passed.
    Deadline(Duration),
    /// Run exactly this many rounds.
    Iterations(u32),
}

impl SearchBudget {
    /// Build a budget from optional limits; exactly one must be set.
    pub fn from_limits(
        time_limit: Option<Duration>,
        iteration_limit: Option<u32>,
    ) -> Result<Self, ConfigError> {
        match (time_limit, iteration_limit) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingBudget),
            (None, None) => Err(ConfigError::MissingBudget),
            (Some(limit), None) => Ok(SearchBudget::Deadline(limit)),
            (None, Some(n)) => Self::iterations(n),
        }
    }

    /// Iteration budget; zero is rejected.
    pub fn iterations(n: u32) -> Result<Self, ConfigError> {
        if n < 1 {
            return Err(ConfigError::ZeroIterations);
        }
        Ok(SearchBudget::Iterations(n))
    }

    /// Wall-clock budget.
    pub fn deadline(limit: Duration) -> Self {
        SearchBudget::Deadline(limit)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self {
            SearchBudget::Iterations(0) => Err(ConfigError::ZeroIterations),
            _ => Ok(()),
        }
    }
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct MctsConfig {
    /// When to stop running rounds.
    pub budget: SearchBudget,

    /// Weight of the exploration term in best-child selection.
    /// Zero ranks children purely by mean reward.
    pub exploration_constant: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            budget: SearchBudget::Deadline(Duration::from_secs(1)),
            exploration_constant: DEFAULT_EXPLORATION,
        }
    }
}

impl MctsConfig {
    /// Create a config with the given budget and the default exploration weight.
    pub fn new(budget: SearchBudget) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self::new(SearchBudget::Iterations(50))
    }

    /// Builder pattern: set the budget.
    pub fn with_budget(mut self, budget: SearchBudget) -> Self {
        self.budget = budget;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Check the config before a search allocates anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.budget.validate()?;
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(ConfigError::InvalidExploration(self.exploration_constant));
        }
        Ok(())
    }
}
