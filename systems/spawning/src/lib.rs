#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use std::time::Duration;

use frost_defence_core::{Command, Event, GridCell, SessionState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_interval: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence and seed.
    #[must_use]
    pub const fn new(spawn_interval: Duration, rng_seed: u64) -> Self {
        Self {
            spawn_interval,
            rng_seed,
        }
    }
}

/// Pure system that emits one spawn command per elapsed interval.
///
/// The first enemy appears once a full interval has elapsed.
#[derive(Debug)]
pub struct Spawning {
    spawn_interval: Duration,
    accumulator: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_interval: config.spawn_interval,
            accumulator: Duration::ZERO,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and the current entrances to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        session: SessionState,
        entrances: &[GridCell],
        out: &mut Vec<Command>,
    ) {
        if session != SessionState::Running {
            self.accumulator = Duration::ZERO;
            return;
        }

        if self.spawn_interval.is_zero() || entrances.is_empty() {
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }

        if accumulated.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        for _ in 0..self.take_due_spawns() {
            let entrance = entrances[self.rng.gen_range(0..entrances.len())];
            tracing::debug!(x = entrance.x(), z = entrance.z(), "enemy spawn queued");
            out.push(Command::SpawnEnemy { entrance });
        }
    }

    /// Number of whole intervals held in the accumulator, which keeps only
    /// the remainder.
    fn take_due_spawns(&mut self) -> u32 {
        let due = self
            .accumulator
            .as_nanos()
            .checked_div(self.spawn_interval.as_nanos())
            .map_or(0, |due| u32::try_from(due).unwrap_or(u32::MAX));
        let spent = self.spawn_interval.checked_mul(due).unwrap_or(self.accumulator);
        self.accumulator = self.accumulator.saturating_sub(spent);
        due
    }
}
