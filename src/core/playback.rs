//! Playback speed and the timer that drives automatic stepping.
//!
//! The store itself only knows how to advance one commit
//! ([`RepositoryStore::next_commit`]). [`PlaybackTicker`] is the external clock
//! that calls it every `tick_interval / play_speed`.

use crate::core::{
    error::Result,
    provider::RepositoryProvider,
    state::StoreState,
    store::RepositoryStore,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Commits stepped per tick interval: one of 1, 2, 4, 8, 16, 32.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PlaySpeed(u32);

impl PlaySpeed {
    pub const MIN: PlaySpeed = PlaySpeed(1);
    pub const MAX: PlaySpeed = PlaySpeed(32);

    /// Accepts only the powers of two in `1..=32`.
    pub fn new(speed: u32) -> Option<Self> {
        (speed.is_power_of_two() && speed <= Self::MAX.0).then_some(Self(speed))
    }

    /// Largest valid speed not above `speed` (at least 1).
    pub fn clamped(speed: u32) -> Self {
        let speed = speed.clamp(Self::MIN.0, Self::MAX.0);
        Self(1 << (31 - speed.leading_zeros()))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Double the speed, wrapping back to 1 after 32.
    pub fn next(self) -> Self {
        if self.0 < Self::MAX.0 {
            Self(self.0 * 2)
        } else {
            Self::MIN
        }
    }

    /// Delay between two steps for a base tick interval.
    pub fn step_interval(self, tick_interval: Duration) -> Duration {
        tick_interval / self.0
    }
}

impl Default for PlaySpeed {
    fn default() -> Self {
        Self(4)
    }
}

impl TryFrom<u32> for PlaySpeed {
    type Error = String;

    fn try_from(speed: u32) -> std::result::Result<Self, Self::Error> {
        Self::new(speed).ok_or_else(|| format!("invalid play speed {speed}"))
    }
}

impl From<PlaySpeed> for u32 {
    fn from(speed: PlaySpeed) -> Self {
        speed.0
    }
}

impl std::fmt::Display for PlaySpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x", self.0)
    }
}

/// Timer collaborator that keeps calling `next_commit` while the store is playing.
pub struct PlaybackTicker<'a, P: RepositoryProvider> {
    store: &'a RepositoryStore<P>,
    tick_interval: Duration,
}

impl<'a, P: RepositoryProvider> PlaybackTicker<'a, P> {
    pub fn new(store: &'a RepositoryStore<P>, tick_interval: Duration) -> Self {
        Self {
            store,
            tick_interval,
        }
    }

    /// Start playback and run until the store stops playing.
    ///
    /// `on_step` sees the snapshot after every step and returns `false` to
    /// pause playback early. The speed is re-read before every sleep, so
    /// `set_play_speed` takes effect on the next step. A failed step pauses
    /// the store before its error is returned.
    pub async fn run<F>(&self, mut on_step: F) -> Result<()>
    where
        F: FnMut(&StoreState) -> bool,
    {
        self.step().await?;
        loop {
            let snapshot = self.store.snapshot();
            if !snapshot.is_playing {
                log::debug!("Playback stopped at commit {}", snapshot.current_commit_index);
                return Ok(());
            }
            if !on_step(&snapshot) {
                self.store.pause();
                return Ok(());
            }
            tokio::time::sleep(snapshot.play_speed.step_interval(self.tick_interval)).await;
            if !self.store.read(|state| state.is_playing) {
                return Ok(());
            }
            self.step().await?;
        }
    }

    async fn step(&self) -> Result<()> {
        self.wait_for_pending_page().await;
        let result = self.store.next_commit().await;
        if let Err(e) = &result {
            log::warn!("Playback step failed: {e}");
            self.store.pause();
        }
        result
    }

    /// `next_commit` skips its step while a page is in flight; wait it out
    /// so the step lands on the freshly loaded commit.
    async fn wait_for_pending_page(&self) {
        let mut receiver = self.store.subscribe();
        if receiver.borrow().is_fetching_commits {
            log::debug!("Playback waiting for the next page");
        }
        let _ = receiver.wait_for(|state| !state.is_fetching_commits).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_cycles_through_powers_of_two() {
        let mut speed = PlaySpeed::MIN;
        let mut seen = vec![speed.get()];
        for _ in 0..6 {
            speed = speed.next();
            seen.push(speed.get());
        }
        assert_eq!(seen, vec![1, 2, 4, 8, 16, 32, 1]);
    }

    #[test]
    fn test_new_rejects_other_values() {
        assert!(PlaySpeed::new(0).is_none());
        assert!(PlaySpeed::new(3).is_none());
        assert!(PlaySpeed::new(64).is_none());
        assert_eq!(PlaySpeed::new(16).map(PlaySpeed::get), Some(16));
    }

    #[test]
    fn test_clamped_rounds_down_to_valid_speed() {
        assert_eq!(PlaySpeed::clamped(0).get(), 1);
        assert_eq!(PlaySpeed::clamped(5).get(), 4);
        assert_eq!(PlaySpeed::clamped(100).get(), 32);
    }

    #[test]
    fn test_step_interval_divides_tick() {
        let speed = PlaySpeed::new(4).unwrap();
        assert_eq!(
            speed.step_interval(Duration::from_millis(1000)),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_serde_rejects_invalid_speed() {
        assert!(serde_json::from_str::<PlaySpeed>("6").is_err());
        assert_eq!(serde_json::from_str::<PlaySpeed>("8").unwrap().get(), 8);
    }
}
