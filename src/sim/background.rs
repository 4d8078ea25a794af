//! Endless horizontal background scroll
//!
//! Two copies of the background image sit side by side. Both slide left every
//! tick; a copy that leaves the screen is moved to the right edge of the other,
//! so the pair always stays adjacent.

use serde::{Deserialize, Serialize};

use crate::consts::{BG_SCROLL_SPEED, SCREEN_WIDTH};

/// One copy of the background image
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundStrip {
    /// Left edge in screen space
    pub x: f32,
}

/// Pair of background strips sharing a width
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackgroundScroller {
    pub strips: [BackgroundStrip; 2],
    /// Scaled width of the background image
    pub width: f32,
    /// Scroll speed in pixels/s
    pub speed: f32,
}

impl Default for BackgroundScroller {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, BG_SCROLL_SPEED)
    }
}

impl BackgroundScroller {
    pub fn new(width: f32, speed: f32) -> Self {
        Self {
            strips: [BackgroundStrip { x: 0.0 }, BackgroundStrip { x: width }],
            width,
            speed,
        }
    }

    /// Slide both strips left and wrap any strip that has left the screen
    pub fn advance(&mut self, dt: f32) {
        let step = self.speed * dt;
        for strip in &mut self.strips {
            strip.x -= step;
        }

        // A step longer than one image skips whole widths at once
        let left = self.strips[0].x.min(self.strips[1].x);
        if self.width > 0.0 && left <= -2.0 * self.width {
            let skipped = ((-left / self.width).floor() - 1.0) * self.width;
            for strip in &mut self.strips {
                strip.x += skipped;
            }
        }

        if self.strips[0].x <= -self.width {
            self.strips[0].x = self.strips[1].x + self.width;
        }
        if self.strips[1].x <= -self.width {
            self.strips[1].x = self.strips[0].x + self.width;
        }
    }

    /// Horizontal distance between the two strips (always `width`)
    pub fn separation(&self) -> f32 {
        (self.strips[0].x - self.strips[1].x).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_start_adjacent() {
        let bg = BackgroundScroller::new(800.0, 30.0);
        assert_eq!(bg.strips[0].x, 0.0);
        assert_eq!(bg.strips[1].x, 800.0);
    }

    #[test]
    fn test_advance_moves_left() {
        let mut bg = BackgroundScroller::new(800.0, 30.0);
        bg.advance(1.0);
        assert!((bg.strips[0].x + 30.0).abs() < 0.001);
        assert!((bg.strips[1].x - 770.0).abs() < 0.001);
    }

    #[test]
    fn test_wraps_first_strip_behind_second() {
        let mut bg = BackgroundScroller::new(100.0, 10.0);
        // 10 seconds moves strip 0 exactly to -width
        for _ in 0..10 {
            bg.advance(1.0);
        }
        assert!((bg.strips[1].x - 0.0).abs() < 0.001);
        assert!((bg.strips[0].x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_wraps_second_strip() {
        let mut bg = BackgroundScroller::new(100.0, 10.0);
        for _ in 0..20 {
            bg.advance(1.0);
        }
        // Back to the starting layout, roles of the strips restored
        assert!((bg.strips[0].x - 0.0).abs() < 0.001);
        assert!((bg.strips[1].x - 100.0).abs() < 0.001);
    }

    #[test]
    fn test_step_longer_than_width_stays_on_screen() {
        let mut bg = BackgroundScroller::new(1000.0, 500_000.0);
        for _ in 0..10 {
            bg.advance(crate::consts::SIM_DT);
            let left = bg.strips[0].x.min(bg.strips[1].x);
            assert!(left > -1000.0 && left <= 0.0, "left strip at {}", left);
            assert!((bg.separation() - 1000.0).abs() < 0.5);
        }
    }

    proptest! {
        #[test]
        fn prop_strips_stay_adjacent(
            width in 200.0f32..2000.0,
            speed in 1.0f32..500.0,
            steps in 1usize..5000,
        ) {
            let mut bg = BackgroundScroller::new(width, speed);
            for _ in 0..steps {
                bg.advance(crate::consts::SIM_DT);
                let left = bg.strips[0].x.min(bg.strips[1].x);
                prop_assert!(left > -width - 0.5);
                prop_assert!(left <= 0.5);
            }
            // f32 rounding drifts slightly between wraps
            prop_assert!((bg.separation() - width).abs() < 0.5);
        }
    }
}
