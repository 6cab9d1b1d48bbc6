use crate::dynamics::state::State;

/// Receives every accepted sample of a run, synchronously and in strictly
/// increasing time order. The engine waits for `on_step` to return.
///
/// Closures `FnMut(f64, &State)` implement this directly.
pub trait Observer {
    fn on_step(&mut self, t: f64, state: &State);
}

/// Observer that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline]
    fn on_step(&mut self, _t: f64, _state: &State) {}
}

impl<F> Observer for F
where
    F: FnMut(f64, &State),
{
    #[inline]
    fn on_step(&mut self, t: f64, state: &State) {
        self(t, state)
    }
}

/// Logs a progress line every `interval` seconds of simulated time.
#[derive(Debug, Clone)]
pub struct ProgressLogger {
    interval: f64,
    next: f64,
}

impl ProgressLogger {
    pub fn new(interval: f64) -> Self {
        Self { interval, next: interval }
    }
}

impl Observer for ProgressLogger {
    fn on_step(&mut self, t: f64, state: &State) {
        if t + 1e-9 >= self.next {
            log::info!(
                "t={:>6.2}s  x={:>8.1}m  y={:>7.1}m  V={:>6.1}m/s",
                t,
                state.pos.x,
                state.pos.y,
                state.speed()
            );
            while self.next <= t + 1e-9 {
                self.next += self.interval;
            }
        }
    }
}
