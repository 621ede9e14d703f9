//! Configuration, clock, content, reducer, and tick orchestration for the
//! Lineage simulation.
//!
//! This crate wires the rules from `lineage-family` and `lineage-events`
//! into a playable loop: a [`reducer::reduce`] entry point for presentation
//! layers, and a tick cycle plus headless runner for batch runs.
//!
//! # Modules
//!
//! - [`advance`] -- Per-character ageing: birthdays, phase hooks, tuition,
//!   frailty.
//! - [`cashflow`] -- Monthly salaries, business profit, asset income, loan
//!   repayment.
//! - [`clock`] -- Tick counter and calendar stepping.
//! - [`commerce`] -- Buying assets and businesses, staffing, upgrades.
//! - [`config`] -- Configuration loading from `lineage-config.yaml`.
//! - [`content`] -- The built-in content catalog and YAML catalog loading.
//! - [`decision`] -- [`ChoiceSource`] trait and stock implementations.
//! - [`pending`] -- Opening and resolving pending choices.
//! - [`reducer`] -- [`GameAction`] and [`reduce`].
//! - [`runner`] -- [`Simulation`] and [`RunSummary`].
//! - [`tick`] -- The tick cycle.
//!
//! [`ChoiceSource`]: decision::ChoiceSource
//! [`GameAction`]: reducer::GameAction
//! [`reduce`]: reducer::reduce
//! [`Simulation`]: runner::Simulation
//! [`RunSummary`]: runner::RunSummary

pub mod advance;
pub mod cashflow;
pub mod clock;
pub mod commerce;
pub mod config;
pub mod content;
pub mod context;
pub mod decision;
pub mod error;
pub mod pending;
pub mod reducer;
pub mod runner;
pub mod tick;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, SimulationConfig};
pub use context::CoreContext;
pub use error::CoreError;
pub use reducer::{GameAction, reduce};
pub use runner::{RunSummary, RunnerError, Simulation, new_game};
pub use tick::{TickError, TickSummary, run_tick};
