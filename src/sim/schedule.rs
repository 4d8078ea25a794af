//! Tick-counted one-shot timers
//!
//! Stands in for "run this after N ms" callbacks. Each entry counts down once
//! per simulation tick and fires when it reaches zero.

use serde::{Deserialize, Serialize};

use crate::ms_to_ticks;

/// Something the session does once a delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Spawn the next star
    SpawnStar,
    /// Reveal the Play Again control
    ShowReplayControl,
    /// Fade out the celebration banner
    EndCelebrationBanner,
    /// Stop the celebration music once the banner has faded
    EndCelebrationMusic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Timer {
    ticks_left: u32,
    action: ScheduledAction,
}

/// Pending timers in the order they were scheduled
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    timers: Vec<Timer>,
}

impl Schedule {
    /// Schedule `action` to fire after `ms` milliseconds of simulated time
    pub fn after_ms(&mut self, ms: u32, action: ScheduledAction) {
        self.after_ticks(ms_to_ticks(ms), action);
    }

    pub fn after_ticks(&mut self, ticks: u32, action: ScheduledAction) {
        self.timers.push(Timer {
            ticks_left: ticks.max(1),
            action,
        });
    }

    /// Drop every pending `action`. Returns how many were dropped.
    pub fn cancel(&mut self, action: ScheduledAction) -> usize {
        let before = self.timers.len();
        self.timers.retain(|t| t.action != action);
        before - self.timers.len()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    /// Count down one tick and return the actions that are now due
    pub fn advance(&mut self) -> Vec<ScheduledAction> {
        let mut due = Vec::new();
        for timer in &mut self.timers {
            timer.ticks_left -= 1;
            if timer.ticks_left == 0 {
                due.push(timer.action);
            }
        }
        self.timers.retain(|t| t.ticks_left > 0);
        due
    }

    pub fn is_pending(&self, action: ScheduledAction) -> bool {
        self.timers.iter().any(|t| t.action == action)
    }

    /// Number of pending entries for `action`
    pub fn pending_count(&self, action: ScheduledAction) -> usize {
        self.timers.iter().filter(|t| t.action == action).count()
    }

    /// Ticks until the next `action` fires
    pub fn ticks_until(&self, action: ScheduledAction) -> Option<u32> {
        self.timers
            .iter()
            .filter(|t| t.action == action)
            .map(|t| t.ticks_left)
            .min()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_exact_ticks() {
        let mut schedule = Schedule::default();
        schedule.after_ticks(3, ScheduledAction::SpawnStar);
        assert!(schedule.advance().is_empty());
        assert!(schedule.advance().is_empty());
        assert_eq!(schedule.advance(), vec![ScheduledAction::SpawnStar]);
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_ms_delay_converts_to_ticks() {
        let mut schedule = Schedule::default();
        schedule.after_ms(300, ScheduledAction::SpawnStar);
        assert_eq!(schedule.ticks_until(ScheduledAction::SpawnStar), Some(36));
    }

    #[test]
    fn test_zero_delay_fires_next_tick() {
        let mut schedule = Schedule::default();
        schedule.after_ticks(0, ScheduledAction::ShowReplayControl);
        assert_eq!(schedule.advance(), vec![ScheduledAction::ShowReplayControl]);
    }

    #[test]
    fn test_cancel_only_matching() {
        let mut schedule = Schedule::default();
        schedule.after_ticks(5, ScheduledAction::SpawnStar);
        schedule.after_ticks(5, ScheduledAction::ShowReplayControl);
        assert_eq!(schedule.cancel(ScheduledAction::SpawnStar), 1);
        assert!(!schedule.is_pending(ScheduledAction::SpawnStar));
        assert!(schedule.is_pending(ScheduledAction::ShowReplayControl));
    }

    #[test]
    fn test_due_actions_keep_schedule_order() {
        let mut schedule = Schedule::default();
        schedule.after_ticks(2, ScheduledAction::EndCelebrationBanner);
        schedule.after_ticks(2, ScheduledAction::ShowReplayControl);
        schedule.advance();
        assert_eq!(
            schedule.advance(),
            vec![
                ScheduledAction::EndCelebrationBanner,
                ScheduledAction::ShowReplayControl
            ]
        );
    }
}
