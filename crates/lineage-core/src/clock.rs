//! Simulation clock for the Lineage simulation.
//!
//! The clock counts ticks and steps the calendar date by a fixed number of
//! days per tick. Month and year boundaries are derived from the dates on
//! either side of a step, never stored.
//!
//! All arithmetic is checked; the tick counter refuses to wrap.

use lineage_types::SimDate;

use crate::config::TimeConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid time configuration (e.g. zero days per tick).
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// One step of the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateAdvance {
    /// Date before the step.
    pub from: SimDate,
    /// Date after the step.
    pub to: SimDate,
    /// Days elapsed.
    pub days: u32,
    /// Month boundaries crossed.
    pub months_elapsed: u32,
    /// Whether a new year started.
    pub new_year: bool,
}

/// Tick counter plus the fixed day step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimClock {
    /// Ticks completed.
    tick: u64,
    /// Days per tick (at least 1).
    days_per_tick: u32,
}

impl SimClock {
    /// Create a clock at tick 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_tick` is 0.
    pub fn new(config: &TimeConfig) -> Result<Self, ClockError> {
        Self::from_parts(0, config.days_per_tick)
    }

    /// Create a clock from explicit parameters (state restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if `days_per_tick` is 0.
    pub fn from_parts(tick: u64, days_per_tick: u32) -> Result<Self, ClockError> {
        if days_per_tick == 0 {
            return Err(ClockError::InvalidConfig {
                reason: "days_per_tick must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            tick,
            days_per_tick,
        })
    }

    /// Advance one tick from `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self, date: SimDate) -> Result<DateAdvance, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let to = date.add_days(self.days_per_tick);
        let months = to.month_ordinal().saturating_sub(date.month_ordinal()).max(0);
        Ok(DateAdvance {
            from: date,
            to,
            days: self.days_per_tick,
            months_elapsed: u32::try_from(months).unwrap_or(u32::MAX),
            new_year: to.year > date.year,
        })
    }

    /// Ticks completed.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Days advanced per tick.
    pub const fn days_per_tick(&self) -> u32 {
        self.days_per_tick
    }
}
