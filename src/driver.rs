//! Fixed-phase tick driver.
//!
//! One tick: poll one key, measure `dt`, run the simulation step, compose a
//! frame, hand it to the sink, then sleep out the rest of the tick interval.
//! The clock is injected so tests can drive the loop with synthetic `dt`.

use std::thread;
use std::time::{Duration, Instant};

use tracing::info;

use crate::compute::{self, StepOutcome};
use crate::frame::FrameSink;
use crate::input::InputSource;
use crate::render;
use crate::world::GameWorld;

// ── Clocks ───────────────────────────────────────────────────────────────────

/// Source of elapsed time between ticks.
pub trait Clock {
    /// Seconds since the previous call (or since creation on the first call).
    fn delta(&mut self) -> f64;
}

/// Wall-clock time from `Instant`.
#[derive(Debug)]
pub struct MonotonicClock {
    last: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn delta(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f64();
        self.last = now;
        dt
    }
}

/// Reports the same `dt` every tick.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub dt: f64,
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f64 {
        self.dt
    }
}

// ── Driver ───────────────────────────────────────────────────────────────────

pub struct TickDriver<C> {
    clock: C,
    /// Minimum wall time per tick; zero disables sleeping.
    interval: Duration,
    ticks: u64,
}

impl<C: Clock> TickDriver<C> {
    pub fn new(clock: C, interval: Duration) -> Self {
        Self {
            clock,
            interval,
            ticks: 0,
        }
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run exactly one tick.
    pub fn tick<I, S>(
        &mut self,
        world: &mut GameWorld,
        input: &mut I,
        sink: &mut S,
    ) -> Result<StepOutcome, S::Error>
    where
        I: InputSource,
        S: FrameSink,
    {
        let key = input.poll_key();
        let dt = self.clock.delta();
        let outcome = compute::step(world, key, dt);

        let mut frame = render::compose(world);
        frame.alert = outcome.alert;
        sink.present(&frame)?;

        self.ticks += 1;
        Ok(outcome)
    }

    /// Tick until the world stops running or `max_ticks` is reached.  The
    /// quit flag is checked at the top of each tick.
    pub fn run<I, S>(
        &mut self,
        world: &mut GameWorld,
        input: &mut I,
        sink: &mut S,
        max_ticks: Option<u64>,
    ) -> Result<u64, S::Error>
    where
        I: InputSource,
        S: FrameSink,
    {
        let start = self.ticks;
        while world.running && max_ticks.map_or(true, |max| self.ticks - start < max) {
            let tick_start = Instant::now();
            self.tick(world, input, sink)?;

            let elapsed = tick_start.elapsed();
            if elapsed < self.interval {
                thread::sleep(self.interval - elapsed);
            }
        }
        info!(ticks = self.ticks - start, "tick loop finished");
        Ok(self.ticks - start)
    }
}
