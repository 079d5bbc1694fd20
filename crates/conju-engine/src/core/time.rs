/// One-shot countdown driven by frame deltas.
/// Used to auto-dismiss wrong-answer feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Countdown {
    /// Seconds left; `None` when idle.
    remaining: Option<f32>,
}

impl Countdown {
    pub fn new() -> Self {
        Self { remaining: None }
    }

    /// (Re)start the countdown. A non-positive duration never fires.
    pub fn start(&mut self, seconds: f32) {
        self.remaining = (seconds > 0.0).then_some(seconds);
    }

    pub fn cancel(&mut self) {
        self.remaining = None;
    }

    /// Advance by `dt` seconds. Returns true exactly once, on expiry.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(left) = self.remaining else {
            return false;
        };
        let left = left - dt.max(0.0);
        if left <= 0.0 {
            self.remaining = None;
            true
        } else {
            self.remaining = Some(left);
            false
        }
    }

    pub fn is_running(&self) -> bool {
        self.remaining.is_some()
    }

    /// Seconds left, 0 when idle.
    pub fn remaining(&self) -> f32 {
        self.remaining.unwrap_or(0.0)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
