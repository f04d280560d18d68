// Timeline - Musical time representation
// Positions are stored in ticks; frames and bars are derived on demand

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticks per quarter note (PPQN), standard MIDI resolution
pub const TICKS_PER_QUARTER: f64 = 480.0;

/// Time signature (numerator/denominator)
/// Example: 4/4 time = TimeSignature { numerator: 4, denominator: 4 }
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: u8,   // Beats per bar (typically 3, 4, 5, 6, 7)
    pub denominator: u8, // Note value (4 = quarter note, 8 = eighth note)
}

impl TimeSignature {
    /// Creates a new time signature
    pub fn new(numerator: u8, denominator: u8) -> Self {
        assert!(numerator > 0, "Time signature numerator must be > 0");
        assert!(
            denominator.is_power_of_two(),
            "Time signature denominator must be power of 2"
        );
        Self {
            numerator,
            denominator,
        }
    }

    /// Common 4/4 time signature
    pub fn four_four() -> Self {
        Self::new(4, 4)
    }

    /// Common 3/4 time signature (waltz)
    pub fn three_four() -> Self {
        Self::new(3, 4)
    }

    /// Number of beats per bar
    pub fn beats_per_bar(&self) -> f64 {
        self.numerator as f64
    }

    /// Length of one bar in ticks
    pub fn ticks_per_bar(&self) -> f64 {
        self.beats_per_bar() * TICKS_PER_QUARTER
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::four_four()
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Tempo in BPM (Beats Per Minute)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tempo {
    bpm: f64,
}

impl Tempo {
    pub const MIN_BPM: f64 = 20.0;
    pub const MAX_BPM: f64 = 999.0;

    /// Creates a new tempo
    /// BPM must be in range [20.0, 999.0]
    pub fn new(bpm: f64) -> Self {
        assert!(
            (Self::MIN_BPM..=Self::MAX_BPM).contains(&bpm),
            "BPM must be between 20 and 999"
        );
        Self { bpm }
    }

    /// Get BPM value
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Duration of one beat in seconds
    pub fn beat_duration_seconds(&self) -> f64 {
        60.0 / self.bpm
    }

    /// Duration of one beat in samples at given sample rate
    pub fn beat_duration_samples(&self, sample_rate: f64) -> f64 {
        self.beat_duration_seconds() * sample_rate
    }

    /// Number of audio frames covered by one tick
    pub fn frames_per_tick(&self, sample_rate: f64) -> f64 {
        self.beat_duration_samples(sample_rate) / TICKS_PER_QUARTER
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(120.0)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} BPM", self.bpm)
    }
}

/// Position on the timeline, or inside a region when used for child objects.
///
/// Ticks are `f64`; stretching produces fractional positions.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Position {
    pub ticks: f64,
}

impl Position {
    /// Tolerance used when comparing positions produced by arithmetic
    pub const EPSILON: f64 = 1e-6;

    pub const fn from_ticks(ticks: f64) -> Self {
        Self { ticks }
    }

    /// Zero position
    pub const fn zero() -> Self {
        Self { ticks: 0.0 }
    }

    /// Start of the given 1-based bar
    pub fn from_bars(bar: u32, time_signature: &TimeSignature) -> Self {
        Self::from_ticks(bar.saturating_sub(1) as f64 * time_signature.ticks_per_bar())
    }

    /// Frame offset of this position
    pub fn to_frames(&self, sample_rate: f64, tempo: &Tempo) -> i64 {
        (self.ticks * tempo.frames_per_tick(sample_rate)).round() as i64
    }

    pub fn add_ticks(&mut self, ticks: f64) {
        self.ticks += ticks;
    }

    /// Returns a copy moved by `ticks`
    pub fn offset(self, ticks: f64) -> Self {
        Self::from_ticks(self.ticks + ticks)
    }

    /// Signed distance from `self` to `other` in ticks
    pub fn ticks_to(&self, other: &Position) -> f64 {
        other.ticks - self.ticks
    }

    /// 1-based bar containing this position
    pub fn bar(&self, time_signature: &TimeSignature) -> u32 {
        (self.ticks.max(0.0) / time_signature.ticks_per_bar()).floor() as u32 + 1
    }

    /// Approximate equality within [`Position::EPSILON`]
    pub fn approx_eq(&self, other: &Position) -> bool {
        (self.ticks - other.ticks).abs() < Self::EPSILON
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bar {} ({:.3} ticks)",
            self.bar(&TimeSignature::four_four()),
            self.ticks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_signature() {
        let ts = TimeSignature::four_four();
        assert_eq!(ts.numerator, 4);
        assert_eq!(ts.denominator, 4);
        assert_eq!(ts.beats_per_bar(), 4.0);
        assert_eq!(ts.ticks_per_bar(), 1920.0);
        assert_eq!(ts.to_string(), "4/4");
    }

    #[test]
    fn test_tempo() {
        let tempo = Tempo::new(120.0);
        assert_eq!(tempo.bpm(), 120.0);
        assert_eq!(tempo.beat_duration_seconds(), 0.5);

        // At 120 BPM, one beat = 0.5s
        // At 48000 Hz, one beat = 24000 samples, one tick = 50 frames
        assert_eq!(tempo.beat_duration_samples(48000.0), 24000.0);
        assert_eq!(tempo.frames_per_tick(48000.0), 50.0);
    }

    #[test]
    #[should_panic(expected = "BPM must be between 20 and 999")]
    fn test_tempo_out_of_range() {
        Tempo::new(5.0);
    }

    #[test]
    fn test_position_from_bars() {
        let ts = TimeSignature::four_four();
        assert_eq!(Position::from_bars(1, &ts).ticks, 0.0);
        assert_eq!(Position::from_bars(2, &ts).ticks, 1920.0);
        assert_eq!(Position::from_bars(5, &ts).bar(&ts), 5);

        let ts_34 = TimeSignature::three_four();
        assert_eq!(Position::from_bars(2, &ts_34).ticks, 1440.0);
    }

    #[test]
    fn test_position_frames() {
        let tempo = Tempo::new(120.0);
        let pos = Position::from_ticks(480.0);
        assert_eq!(pos.to_frames(48000.0, &tempo), 24000);
    }

    #[test]
    fn test_position_arithmetic_is_reversible() {
        let mut pos = Position::from_ticks(1920.0);
        pos.add_ticks(333.0);
        pos.add_ticks(-333.0);
        assert_eq!(pos.ticks, 1920.0);
        assert_eq!(pos.ticks_to(&Position::from_ticks(3840.0)), 1920.0);
        assert_eq!(pos.to_string(), "bar 2 (1920.000 ticks)");
    }
}
