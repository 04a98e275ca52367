/// One tick of a fixed-spacing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    /// Tick index, starting at 0.
    pub index: usize,
    /// Simulation time of this tick (s).
    pub time_s: f64,
}

/// A simulation clock that hands out a fixed number of evenly spaced ticks.
///
/// Offline runs use it in place of the wall clock so results do not
/// depend on how fast the machine is.
///
/// # Examples
///
/// ```
/// use grid_twin::sim::clock::Clock;
///
/// let mut clock = Clock::new(3, 0.5);
/// let mut times = Vec::new();
///
/// clock.run(|tick| times.push(tick.time_s));
/// assert_eq!(times, vec![0.0, 0.5, 1.0]);
/// ```
pub struct Clock {
    /// Index of the next tick
    current: usize,
    /// Total ticks to hand out
    total: usize,
    /// Spacing between ticks (s)
    dt_secs: f64,
}

impl Clock {
    /// Creates a clock with `total` ticks spaced `dt_secs` apart.
    pub fn new(total: usize, dt_secs: f64) -> Self {
        Self {
            current: 0,
            total,
            dt_secs,
        }
    }

    /// Advances the clock by one tick.
    ///
    /// # Returns
    ///
    /// * `Some(tick)` - The tick that was just reached
    /// * `None` - If every tick has been handed out
    pub fn tick(&mut self) -> Option<Tick> {
        if self.current >= self.total {
            return None;
        }
        let index = self.current;
        self.current += 1;
        Some(Tick {
            index,
            time_s: index as f64 * self.dt_secs,
        })
    }

    /// Calls `f` for each remaining tick.
    pub fn run(&mut self, mut f: impl FnMut(Tick)) {
        while let Some(tick) = self.tick() {
            f(tick);
        }
    }

    /// Ticks not yet handed out.
    pub fn remaining(&self) -> usize {
        self.total - self.current
    }
}
