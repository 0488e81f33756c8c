//! Virtual clock for scenario replay
//!
//! Supports two pacings:
//! - Instant (speed 0): ticks are processed as fast as possible
//! - Paced (speed > 0): sleeps between ticks, 1.0 = realtime

use chrono::NaiveDateTime;
use std::time::Duration;

/// Maps scenario time onto wall-clock pacing
#[derive(Debug)]
pub struct VirtualClock {
    /// Scenario start (game time)
    fight_start: NaiveDateTime,

    /// Current simulated game time
    current_game_time: NaiveDateTime,

    /// Speed multiplier (1.0 = realtime, 0.0 = instant, 10.0 = 10x speed)
    speed_multiplier: f32,
}

impl VirtualClock {
    pub fn new(fight_start: NaiveDateTime, speed_multiplier: f32) -> Self {
        Self {
            fight_start,
            current_game_time: fight_start,
            speed_multiplier: speed_multiplier.max(0.0),
        }
    }

    pub fn instant(fight_start: NaiveDateTime) -> Self {
        Self::new(fight_start, 0.0)
    }

    pub fn realtime(fight_start: NaiveDateTime) -> Self {
        Self::new(fight_start, 1.0)
    }

    /// Advance to a game timestamp, sleeping when paced. Going backwards only
    /// moves the clock.
    pub fn advance_to(&mut self, game_time: NaiveDateTime) {
        if self.speed_multiplier > 0.0 && game_time > self.current_game_time {
            let delta_ms = (game_time - self.current_game_time).num_milliseconds().max(0) as f32;
            let sleep_ms = (delta_ms / self.speed_multiplier) as u64;
            if sleep_ms > 0 {
                std::thread::sleep(Duration::from_millis(sleep_ms));
            }
        }
        self.current_game_time = game_time;
    }

    /// Seconds since the scenario started
    pub fn elapsed_secs(&self) -> f32 {
        (self.current_game_time - self.fight_start).num_milliseconds() as f32 / 1000.0
    }

    pub fn current_game_time(&self) -> NaiveDateTime {
        self.current_game_time
    }

    pub fn fight_start(&self) -> NaiveDateTime {
        self.fight_start
    }

    pub fn is_instant_mode(&self) -> bool {
        self.speed_multiplier == 0.0
    }

    pub fn speed(&self) -> f32 {
        self.speed_multiplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_time(hour: u32, min: u32, sec: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_milli_opt(hour, min, sec, ms)
            .unwrap()
    }

    #[test]
    fn test_elapsed() {
        let start = make_time(12, 0, 0, 0);
        let mut clock = VirtualClock::instant(start);

        assert_eq!(clock.elapsed_secs(), 0.0);

        clock.advance_to(make_time(12, 0, 30, 0));
        assert_eq!(clock.elapsed_secs(), 30.0);

        clock.advance_to(make_time(12, 1, 15, 500));
        assert!((clock.elapsed_secs() - 75.5).abs() < 0.001);
        assert_eq!(clock.fight_start(), start);
    }

    #[test]
    fn test_instant_mode() {
        let clock = VirtualClock::instant(make_time(12, 0, 0, 0));
        assert!(clock.is_instant_mode());
        assert_eq!(clock.speed(), 0.0);
    }

    #[test]
    fn test_realtime_mode() {
        let clock = VirtualClock::realtime(make_time(12, 0, 0, 0));
        assert!(!clock.is_instant_mode());
        assert_eq!(clock.speed(), 1.0);
    }

    #[test]
    fn test_negative_speed_is_instant() {
        let clock = VirtualClock::new(make_time(12, 0, 0, 0), -3.0);
        assert!(clock.is_instant_mode());
    }
}
