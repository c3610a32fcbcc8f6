//! A real-time [`Clock`] backed by `std::time::Instant`, for the terminal
//! driver loop. Tests and embedders use `ifscript_vm::ManualClock`
//! instead (spec.md §5: the engine itself never starts an OS timer).

use std::time::Instant;

use ifscript_vm::Clock;

pub struct WallClock {
    started: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}
