//! `go` argument parsing and per-move time budgeting.

use std::time::Duration;

use anyhow::{anyhow, Result};
use engine_core::Side;
use mcts::{ConfigError, SearchBudget};

/// Limits carried by one `go` command. Missing keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub movetime: Option<u64>,
    pub nodes: Option<u32>,
    pub wtime: Option<u64>,
    pub btime: Option<u64>,
    pub winc: Option<u64>,
    pub binc: Option<u64>,
}

impl GoParams {
    /// Parse the tokens following `go`.
    ///
    /// Recognised keys take the next token as their value; anything else
    /// (`infinite`, `movestogo 30`, ...) is skipped. A recognised key with a
    /// missing or non-numeric value fails the whole command.
    pub fn parse(args: &[&str]) -> Result<Self> {
        let mut params = GoParams::default();
        let mut tokens = args.iter();

        while let Some(&key) = tokens.next() {
            let slot = match key {
                "movetime" => &mut params.movetime,
                "wtime" => &mut params.wtime,
                "btime" => &mut params.btime,
                "winc" => &mut params.winc,
                "binc" => &mut params.binc,
                "nodes" => {
                    let value = tokens
                        .next()
                        .ok_or_else(|| anyhow!("'nodes' needs a value"))?;
                    params.nodes = Some(
                        value
                            .parse()
                            .map_err(|_| anyhow!("invalid node count '{}'", value))?,
                    );
                    continue;
                }
                _ => continue,
            };
            let value = tokens
                .next()
                .ok_or_else(|| anyhow!("'{}' needs a value", key))?;
            *slot = Some(parse_millis(key, value)?);
        }

        Ok(params)
    }

    fn clock(&self, side: Side) -> (Option<u64>, u64) {
        match side {
            Side::First => (self.wtime, self.winc.unwrap_or(0)),
            Side::Second => (self.btime, self.binc.unwrap_or(0)),
        }
    }
}

/// Milliseconds; GUIs occasionally send a negative clock once flagged.
fn parse_millis(key: &str, value: &str) -> Result<u64> {
    let millis: i64 = value
        .parse()
        .map_err(|_| anyhow!("invalid {} value '{}'", key, value))?;
    Ok(millis.max(0) as u64)
}

/// Turns `go` limits into a search budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeControl {
    /// Fraction of the remaining clock spent on one move.
    pub divisor: u64,
    /// Floor applied to every time budget.
    pub min_time: Duration,
    /// Increments credited up front when the clock is comfortably above them.
    pub increment_bonus: u64,
    /// Budget for a `go` without limits.
    pub default_movetime: Duration,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self {
            divisor: 25,
            min_time: Duration::from_millis(100),
            increment_bonus: 5,
            default_movetime: Duration::from_millis(1000),
        }
    }
}

impl TimeControl {
    /// Pick the budget for `side`.
    ///
    /// Precedence: `nodes`, then `movetime`, then the side's own clock, then
    /// the default move time.
    pub fn budget(&self, params: &GoParams, side: Side) -> Result<SearchBudget, ConfigError> {
        if let Some(nodes) = params.nodes {
            return SearchBudget::iterations(nodes);
        }
        if let Some(movetime) = params.movetime {
            return Ok(SearchBudget::Deadline(self.floor(Duration::from_millis(movetime))));
        }
        if let (Some(time), increment) = params.clock(side) {
            return Ok(SearchBudget::Deadline(self.clock_budget(time, increment)));
        }
        Ok(SearchBudget::Deadline(self.default_movetime))
    }

    /// Share of the clock for one move.
    ///
    /// With clock `t` and increment `i`, the effective clock is `t + k*i`
    /// when `t > k*i` (k = `increment_bonus`) and `t + i` otherwise; the
    /// budget is that divided by `divisor`, floored at `min_time`.
    pub fn clock_budget(&self, time_ms: u64, increment_ms: u64) -> Duration {
        let bonus = self.increment_bonus.saturating_mul(increment_ms);
        let effective = if time_ms > bonus {
            time_ms.saturating_add(bonus)
        } else {
            time_ms.saturating_add(increment_ms)
        };
        let share = effective / self.divisor.max(1);
        self.floor(Duration::from_millis(share))
    }

    fn floor(&self, budget: Duration) -> Duration {
        budget.max(self.min_time)
    }
}
