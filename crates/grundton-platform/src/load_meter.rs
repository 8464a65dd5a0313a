//! Processing load measurement.
//!
//! The real-time pipeline brackets every block with
//! [`LoadMeter::on_block_start`] and [`LoadMeter::on_block_end`]. Load is the
//! time spent divided by the block's real-time budget (`block_size /
//! sample_rate`); 1.0 means the deadline was exactly met.

/// Block-bracketed load meter.
pub trait LoadMeter {
    /// Mark the start of a block.
    fn on_block_start(&mut self);
    /// Mark the end of the block started last.
    fn on_block_end(&mut self);
    /// Smoothed average load (fraction of the deadline).
    fn average_load(&self) -> f32;
    /// Lowest single-block load seen since the last reset.
    fn min_load(&self) -> f32;
    /// Highest single-block load seen since the last reset.
    fn max_load(&self) -> f32;
    /// Forget all measurements.
    fn reset(&mut self);
}

/// Monotonic tick source.
pub trait Clock {
    /// Current tick count.
    fn now(&self) -> u64;
    /// Ticks per second.
    fn ticks_per_second(&self) -> u64;
}

/// Averaging time of the smoothed load, in seconds.
const SMOOTHING_SECONDS: f32 = 1.0;

/// [`LoadMeter`] over any [`Clock`].
///
/// The average is a one-pole smoothing of per-block loads with a time
/// constant of about one second of blocks.
#[derive(Debug, Clone)]
pub struct BlockLoadMeter<C: Clock> {
    clock: C,
    budget_ticks: f32,
    smoothing: f32,
    started_at: Option<u64>,
    average: f32,
    min: f32,
    max: f32,
    primed: bool,
}

impl<C: Clock> BlockLoadMeter<C> {
    /// Meter for blocks of `block_size` frames at `sample_rate`.
    pub fn new(clock: C, sample_rate: f32, block_size: usize) -> Self {
        let block_seconds = block_size.max(1) as f32 / sample_rate.max(1.0);
        let blocks_per_second = 1.0 / block_seconds;
        Self {
            budget_ticks: block_seconds * clock.ticks_per_second() as f32,
            clock,
            smoothing: 1.0 / (SMOOTHING_SECONDS * blocks_per_second).max(1.0),
            started_at: None,
            average: 0.0,
            min: 0.0,
            max: 0.0,
            primed: false,
        }
    }

    /// Clock in use.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn record(&mut self, load: f32) {
        if self.primed {
            self.average += self.smoothing * (load - self.average);
            self.min = self.min.min(load);
            self.max = self.max.max(load);
        } else {
            self.average = load;
            self.min = load;
            self.max = load;
            self.primed = true;
        }
    }
}

impl<C: Clock> LoadMeter for BlockLoadMeter<C> {
    fn on_block_start(&mut self) {
        self.started_at = Some(self.clock.now());
    }

    fn on_block_end(&mut self) {
        let Some(start) = self.started_at.take() else {
            return;
        };
        let elapsed = self.clock.now().saturating_sub(start) as f32;
        if self.budget_ticks > 0.0 {
            self.record(elapsed / self.budget_ticks);
        }
    }

    fn average_load(&self) -> f32 {
        self.average
    }

    fn min_load(&self) -> f32 {
        self.min
    }

    fn max_load(&self) -> f32 {
        self.max
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.average = 0.0;
        self.min = 0.0;
        self.max = 0.0;
        self.primed = false;
    }
}

/// Wall clock in nanoseconds.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct StdClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Clock starting now.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for StdClock {
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn ticks_per_second(&self) -> u64 {
        1_000_000_000
    }
}
