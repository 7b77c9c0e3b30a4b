//! Per-ability cooldown timer, counted in completed turns.

/// Errors raised by cooldown bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CooldownError {
    /// The timer was reduced while already at zero. The countdown runs once
    /// per completed turn; a second reduction in the same turn (or one after
    /// the timer elapsed) means the caller's turn accounting is broken.
    #[error("cooldown reduced below zero")]
    AlreadyElapsed,
}

/// Countdown gating re-use of an ability.
///
/// Zero means ready. The timer never goes negative: reducing an elapsed
/// timer fails fast instead of being silently repaired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownTimer {
    remaining: u32,
}

impl CooldownTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Starts (or restarts) the countdown.
    pub fn start(&mut self, length: u32) {
        self.remaining = length;
    }

    /// Counts down one completed turn.
    ///
    /// # Errors
    ///
    /// Returns [`CooldownError::AlreadyElapsed`] if the timer is already at
    /// zero.
    pub fn reduce(&mut self) -> Result<(), CooldownError> {
        if self.remaining == 0 {
            return Err(CooldownError::AlreadyElapsed);
        }
        self.remaining -= 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_returns_to_ready() {
        let length = 3;
        let mut timer = CooldownTimer::new();
        timer.start(length);
        assert!(!timer.is_ready());

        for _ in 0..length {
            timer.reduce().unwrap();
        }
        assert!(timer.is_ready());
    }

    #[test]
    fn extra_reduction_fails_fast() {
        let mut timer = CooldownTimer::new();
        timer.start(2);
        timer.reduce().unwrap();
        timer.reduce().unwrap();
        assert_eq!(timer.reduce(), Err(CooldownError::AlreadyElapsed));
        // The failed reduction leaves the timer untouched.
        assert!(timer.is_ready());
    }

    #[test]
    fn restart_overwrites_remaining() {
        let mut timer = CooldownTimer::new();
        timer.start(5);
        timer.reduce().unwrap();
        timer.start(2);
        assert_eq!(timer.remaining(), 2);
    }
}
