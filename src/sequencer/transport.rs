// Transport - Tempo, meter and song-length bookkeeping for the arranger
// The arranger only needs the musical grid and the number of visible bars

use super::timeline::{Position, Tempo, TimeSignature};

/// Default song length in bars
pub const DEFAULT_TOTAL_BARS: u32 = 128;

/// Bars kept free after the last object
pub const BARS_END_BUFFER: u32 = 4;

/// Musical context used to convert between ticks, bars and frames
#[derive(Debug, Clone, PartialEq)]
pub struct Transport {
    pub time_signature: TimeSignature,
    pub tempo: Tempo,
    pub sample_rate: f64,
    total_bars: u32,
}

impl Transport {
    pub fn new(time_signature: TimeSignature, tempo: Tempo, sample_rate: f64) -> Self {
        Self {
            time_signature,
            tempo,
            sample_rate,
            total_bars: DEFAULT_TOTAL_BARS,
        }
    }

    /// Number of bars shown on the timeline
    pub fn total_bars(&self) -> u32 {
        self.total_bars
    }

    /// Set the song length; never shrinks below [`DEFAULT_TOTAL_BARS`]
    ///
    /// Returns true if the value changed.
    pub fn update_total_bars(&mut self, total_bars: u32) -> bool {
        let total_bars = total_bars.max(DEFAULT_TOTAL_BARS);
        if self.total_bars == total_bars {
            return false;
        }
        log::debug!("total bars {} -> {}", self.total_bars, total_bars);
        self.total_bars = total_bars;
        true
    }

    /// Grow the song length so that every given end position stays clear of
    /// the last bars. Used after objects were created or moved.
    pub fn recalculate_total_bars<I>(&mut self, ends: I) -> bool
    where
        I: IntoIterator<Item = Position>,
    {
        let mut total_bars = self.total_bars;
        for end in ends {
            let bars = end.bar(&self.time_signature);
            if bars > total_bars.saturating_sub(3) {
                total_bars = bars + BARS_END_BUFFER;
            }
        }
        self.update_total_bars(total_bars)
    }

    /// Audio frames covered by one tick at the current tempo
    pub fn frames_per_tick(&self) -> f64 {
        self.tempo.frames_per_tick(self.sample_rate)
    }

    /// Converts a tick distance into a frame count
    pub fn ticks_to_frames(&self, ticks: f64) -> i64 {
        Position::from_ticks(ticks).to_frames(self.sample_rate, &self.tempo)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(TimeSignature::default(), Tempo::default(), 48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_total_bars() {
        let transport = Transport::default();
        assert_eq!(transport.total_bars(), DEFAULT_TOTAL_BARS);
        assert_eq!(transport.frames_per_tick(), 50.0);
    }

    #[test]
    fn test_total_bars_grow_near_the_end() {
        let mut transport = Transport::default();
        let ts = transport.time_signature;

        // Far from the end: nothing changes
        assert!(!transport.recalculate_total_bars([Position::from_bars(10, &ts)]));

        // Inside the last three bars: extend with the buffer
        assert!(transport.recalculate_total_bars([Position::from_bars(127, &ts)]));
        assert_eq!(transport.total_bars(), 127 + BARS_END_BUFFER);
    }

    #[test]
    fn test_total_bars_never_below_default() {
        let mut transport = Transport::default();
        assert!(!transport.update_total_bars(4));
        assert_eq!(transport.total_bars(), DEFAULT_TOTAL_BARS);
    }

    #[test]
    fn test_ticks_to_frames() {
        let transport = Transport::default();
        assert_eq!(transport.ticks_to_frames(1920.0), 96000);
    }
}
