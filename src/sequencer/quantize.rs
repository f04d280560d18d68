// Quantize - Snap positions to a musical grid
//
// Grid points are multiples of `grid_ticks`; with swing, every second grid
// point is delayed by up to half a grid step.

use super::timeline::{Position, TICKS_PER_QUARTER};
use serde::{Deserialize, Serialize};

/// Options for snapping object positions to the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantizeOptions {
    /// Grid step in ticks
    pub grid_ticks: f64,
    /// Snap start positions
    pub adjust_start: bool,
    /// Snap end positions
    pub adjust_end: bool,
    /// How far to move towards the grid point (0-100%)
    pub amount: f64,
    /// Delay applied to every second grid point (0-100%)
    pub swing: f64,
}

impl QuantizeOptions {
    /// Quantize to the given grid with full strength and no swing
    pub fn new(grid_ticks: f64) -> Self {
        Self {
            grid_ticks,
            ..Self::default()
        }
    }

    /// Sixteenth-note grid
    pub fn sixteenth() -> Self {
        Self::new(TICKS_PER_QUARTER / 4.0)
    }

    pub fn is_valid(&self) -> bool {
        self.grid_ticks > 0.0
            && (0.0..=100.0).contains(&self.amount)
            && (0.0..=100.0).contains(&self.swing)
    }

    fn grid_point(&self, index: i64) -> f64 {
        let base = index as f64 * self.grid_ticks;
        if index % 2 != 0 {
            base + self.grid_ticks / 2.0 * (self.swing / 100.0)
        } else {
            base
        }
    }

    /// Snaps `pos` towards the closest grid point and returns the number of
    /// ticks it was moved by.
    pub fn quantize_position(&self, pos: &mut Position) -> f64 {
        let index = (pos.ticks / self.grid_ticks).floor() as i64;

        // Swing can push a grid point past `pos`, so look one step around
        let closest = [index - 1, index, index + 1]
            .into_iter()
            .map(|i| self.grid_point(i))
            .min_by(|a, b| {
                (a - pos.ticks)
                    .abs()
                    .partial_cmp(&(b - pos.ticks).abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(pos.ticks);

        let delta = (closest - pos.ticks) * (self.amount / 100.0);
        pos.add_ticks(delta);
        delta
    }
}

impl Default for QuantizeOptions {
    fn default() -> Self {
        Self {
            grid_ticks: TICKS_PER_QUARTER,
            adjust_start: true,
            adjust_end: false,
            amount: 100.0,
            swing: 0.0,
        }
    }
}
