//! Headless simulation runner.
//!
//! [`Simulation`] owns everything a run needs: the state, the clock, a
//! seeded RNG, the catalog, and a [`ChoiceSource`]. [`Simulation::run_years`]
//! loops [`run_tick`] until the horizon or game over and returns a
//! [`RunSummary`].
//!
//! [`run_tick`]: crate::tick::run_tick

use lineage_events::ActionRegistry;
use lineage_family::family::latest_generation;
use lineage_family::lifecycle::create_initial_character;
use lineage_types::{Catalog, DAYS_PER_YEAR, GameOverReason, GameState, LogEntry, SimDate};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tracing::{info, warn};

use crate::clock::{ClockError, SimClock};
use crate::config::SimulationConfig;
use crate::context::CoreContext;
use crate::decision::ChoiceSource;
use crate::error::CoreError;
use crate::reducer::{GameAction, reduce};
use crate::tick::{self, TickError, TickSummary};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },

    /// The clock could not be built from the configuration.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Totals over a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Ticks executed.
    pub ticks: u64,
    /// Children born.
    pub births: u32,
    /// Characters who died.
    pub deaths: u32,
    /// Marriages.
    pub marriages: u32,
    /// Family fund at the end.
    pub final_fund: i64,
    /// Highest generation ever reached.
    pub generations: u32,
    /// Living characters at the end.
    pub living: usize,
    /// Why the game ended, if it did.
    pub game_over: Option<GameOverReason>,
}

/// A fresh game: one newborn founder on the first day of the start year.
pub fn new_game(config: &SimulationConfig, catalog: &Catalog, rng: &mut dyn RngCore) -> GameState {
    let date = SimDate::start_of_year(config.world.start_year);
    let language = config.world.language;
    let mut state = GameState::new(date, config.world.starting_fund, language);
    let founder =
        create_initial_character(date, language, &catalog.avatar, &config.lifecycle, rng);
    info!(
        character_id = %founder.id,
        name = %founder.full_name(),
        year = date.year,
        fund = state.family_fund,
        "new game"
    );
    state.record(
        LogEntry::new(date, Some(founder.id), "log.life.born").with_param("name", founder.full_name()),
    );
    state.characters.insert(founder.id, founder);
    state
}

/// A running game and everything needed to step it.
pub struct Simulation {
    state: GameState,
    clock: SimClock,
    rng: StdRng,
    catalog: Catalog,
    registry: ActionRegistry,
    config: SimulationConfig,
    source: Box<dyn ChoiceSource>,
}

impl Simulation {
    /// Start a new game seeded from `config.world.seed`.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Clock`] if the time configuration is invalid.
    pub fn new(
        config: SimulationConfig,
        catalog: Catalog,
        source: Box<dyn ChoiceSource>,
    ) -> Result<Self, RunnerError> {
        let mut rng = StdRng::seed_from_u64(config.world.seed);
        let state = new_game(&config, &catalog, &mut rng);
        let clock = SimClock::new(&config.time)?;
        Ok(Self::resume(state, clock, rng, config, catalog, source))
    }

    /// Continue from an existing state and clock.
    pub fn resume(
        state: GameState,
        clock: SimClock,
        rng: StdRng,
        config: SimulationConfig,
        catalog: Catalog,
        source: Box<dyn ChoiceSource>,
    ) -> Self {
        Self {
            state,
            clock,
            rng,
            catalog,
            registry: ActionRegistry::standard(),
            config,
            source,
        }
    }

    /// The current state.
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// The clock.
    pub const fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// The catalog.
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Apply a caller action. On error the state is unchanged.
    ///
    /// # Errors
    ///
    /// Whatever [`reduce`] rejects.
    pub fn apply(&mut self, action: &GameAction) -> Result<(), CoreError> {
        let ctx = CoreContext {
            catalog: &self.catalog,
            registry: &self.registry,
            lifecycle: &self.config.lifecycle,
            economy: &self.config.economy,
        };
        self.state = reduce(&self.state, &ctx, action, &mut self.rng)?;
        Ok(())
    }

    /// Run one tick.
    ///
    /// # Errors
    ///
    /// See [`tick::run_tick`].
    pub fn run_tick(&mut self) -> Result<TickSummary, TickError> {
        let ctx = CoreContext {
            catalog: &self.catalog,
            registry: &self.registry,
            lifecycle: &self.config.lifecycle,
            economy: &self.config.economy,
        };
        let (next, summary) = tick::run_tick(
            &self.state,
            &mut self.clock,
            &ctx,
            &self.config.events,
            self.source.as_mut(),
            &mut self.rng,
        )?;
        self.state = next;
        Ok(summary)
    }

    /// Run up to `years` simulated years, stopping early on game over.
    ///
    /// # Errors
    ///
    /// Propagates tick failures other than game over.
    pub fn run_years(&mut self, years: u32) -> Result<RunSummary, RunnerError> {
        let days = u64::from(years).saturating_mul(u64::from(DAYS_PER_YEAR));
        let per_tick = u64::from(self.clock.days_per_tick().max(1));
        let target = days.div_ceil(per_tick);
        let mut summary = RunSummary {
            ticks: 0,
            births: 0,
            deaths: 0,
            marriages: 0,
            final_fund: self.state.family_fund,
            generations: 0,
            living: 0,
            game_over: self.state.game_over_reason,
        };
        info!(years, ticks = target, seed = self.config.world.seed, "run started");

        while summary.ticks < target && summary.game_over.is_none() {
            let tick = self.run_tick()?;
            summary.ticks = summary.ticks.saturating_add(1);
            summary.births = summary.births.saturating_add(tick.births);
            summary.deaths = summary.deaths.saturating_add(tick.deaths);
            summary.marriages = summary.marriages.saturating_add(tick.marriages);
            summary.game_over = tick.game_over;
            if tick.date.day == 1 {
                info!(
                    year = tick.date.year,
                    living = self.state.living().count(),
                    fund = self.state.family_fund,
                    "new year"
                );
            }
        }

        summary.final_fund = self.state.family_fund;
        summary.living = self.state.living().count();
        summary.generations = latest_generation(&self.state.characters);
        if let Some(reason) = summary.game_over {
            warn!(?reason, tick = self.clock.tick(), "run ended early");
        }
        log_run_end(&summary);
        Ok(summary)
    }
}

/// Log a finished run.
pub fn log_run_end(summary: &RunSummary) {
    info!(
        ticks = summary.ticks,
        births = summary.births,
        deaths = summary.deaths,
        marriages = summary.marriages,
        final_fund = summary.final_fund,
        generations = summary.generations,
        living = summary.living,
        game_over = ?summary.game_over,
        "run finished"
    );
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use lineage_types::{AssetId, LifePhase};

    use super::*;
    use crate::decision::{DeferredChoiceSource, FirstChoiceSource};
    use crate::testing::catalog;

    fn config(seed: u64) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.world.seed = seed;
        config
    }

    #[test]
    fn new_game_starts_with_a_newborn_founder() {
        let config = config(1);
        let mut rng = StdRng::seed_from_u64(1);
        let state = new_game(&config, &catalog(), &mut rng);
        assert_eq!(state.characters.len(), 1);
        let founder = state.characters.values().next().unwrap();
        assert!(founder.is_player_character);
        assert_eq!(founder.phase, LifePhase::Newborn);
        assert_eq!(founder.generation, 1);
        assert_eq!(state.family_fund, config.world.starting_fund);
        assert_eq!(state.date, SimDate::start_of_year(config.world.start_year));
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn one_year_is_twelve_monthly_ticks() {
        let mut sim =
            Simulation::new(config(2), catalog(), Box::new(FirstChoiceSource)).unwrap();
        let summary = sim.run_years(1).unwrap();
        assert_eq!(summary.ticks, 12);
        assert_eq!(sim.clock().tick(), 12);
        assert_eq!(sim.state().date, SimDate::start_of_year(1961));
        let founder = sim.state().characters.values().next().unwrap();
        assert_eq!(founder.age, 1);
    }

    #[test]
    fn same_seed_same_run() {
        let run = |seed| {
            let mut sim =
                Simulation::new(config(seed), catalog(), Box::new(FirstChoiceSource)).unwrap();
            let summary = sim.run_years(30).unwrap();
            (summary, sim.state().clone())
        };
        let (a, state_a) = run(7);
        let (b, state_b) = run(7);
        assert_eq!(a, b);
        assert_eq!(state_a, state_b);
    }

    #[test]
    fn actions_apply_between_ticks() {
        let mut sim =
            Simulation::new(config(3), catalog(), Box::new(DeferredChoiceSource)).unwrap();
        let before = sim.state().family_fund;
        sim.apply(&GameAction::PurchaseAsset {
            asset_id: AssetId::new("bicycle"),
        })
        .unwrap();
        assert_eq!(sim.state().family_fund, before - 300);
        assert_eq!(sim.state().assets.len(), 1);

        let err = sim.apply(&GameAction::PurchaseAsset {
            asset_id: AssetId::new("beach_house"),
        });
        assert!(err.is_err());
        assert_eq!(sim.state().assets.len(), 1);
    }
}
