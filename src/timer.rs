use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct Timer {
    start_time: Instant,
}

impl Timer {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        Instant::now().duration_since(self.start_time)
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
