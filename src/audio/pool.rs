// Audio pool - In-memory clips referenced by audio regions
//
// Regions never own sample data. They point into the pool by ClipId, so
// duplicating a region duplicates the clip and splitting one shares it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Index of a clip in the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClipId(pub usize);

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "clip #{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PoolError {
    #[error("Audio clip not found: {0}")]
    ClipNotFound(ClipId),

    #[error("Frame range {start}..{end} outside of {clip} ({frames} frames)")]
    RangeOutOfBounds {
        clip: ClipId,
        start: usize,
        end: usize,
        frames: usize,
    },

    #[error("Channel count mismatch: clip has {expected}, got {found}")]
    ChannelMismatch { expected: usize, found: usize },
}

/// Deinterleaved audio data
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub name: String,
    pub sample_rate: u32,
    /// One buffer per channel, all of equal length
    pub channels: Vec<Vec<f32>>,
}

impl AudioClip {
    pub fn new(name: impl Into<String>, sample_rate: u32, channels: Vec<Vec<f32>>) -> Self {
        Self {
            name: name.into(),
            sample_rate,
            channels,
        }
    }

    pub fn num_frames(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }
}

/// Collection of clips used by the project
#[derive(Debug, Default, Clone)]
pub struct AudioPool {
    clips: Vec<Option<AudioClip>>,
}

impl AudioPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a clip and return its id
    pub fn add_clip(&mut self, clip: AudioClip) -> ClipId {
        self.clips.push(Some(clip));
        ClipId(self.clips.len() - 1)
    }

    pub fn get(&self, id: ClipId) -> Result<&AudioClip, PoolError> {
        self.clips
            .get(id.0)
            .and_then(|c| c.as_ref())
            .ok_or(PoolError::ClipNotFound(id))
    }

    pub fn get_mut(&mut self, id: ClipId) -> Result<&mut AudioClip, PoolError> {
        self.clips
            .get_mut(id.0)
            .and_then(|c| c.as_mut())
            .ok_or(PoolError::ClipNotFound(id))
    }

    /// Copy a clip under a new id
    pub fn duplicate_clip(&mut self, id: ClipId) -> Result<ClipId, PoolError> {
        let mut clip = self.get(id)?.clone();
        clip.name = format!("{} (copy)", clip.name);
        log::debug!("duplicating {}", id);
        Ok(self.add_clip(clip))
    }

    /// Drop a clip; ids of other clips stay valid
    pub fn remove_clip(&mut self, id: ClipId) -> Result<AudioClip, PoolError> {
        self.clips
            .get_mut(id.0)
            .and_then(|c| c.take())
            .ok_or(PoolError::ClipNotFound(id))
    }

    pub fn len(&self) -> usize {
        self.clips.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of the frames in `range`, per channel
    pub fn read_frames(&self, id: ClipId, range: Range<usize>) -> Result<Vec<Vec<f32>>, PoolError> {
        let clip = self.get(id)?;
        check_range(id, clip, &range)?;
        Ok(clip
            .channels
            .iter()
            .map(|ch| ch[range.clone()].to_vec())
            .collect())
    }

    /// Overwrite frames starting at `start`
    pub fn write_frames(
        &mut self,
        id: ClipId,
        start: usize,
        frames: &[Vec<f32>],
    ) -> Result<(), PoolError> {
        let clip = self.get_mut(id)?;
        if frames.len() != clip.num_channels() {
            return Err(PoolError::ChannelMismatch {
                expected: clip.num_channels(),
                found: frames.len(),
            });
        }
        let len = frames.first().map(|c| c.len()).unwrap_or(0);
        check_range(id, clip, &(start..start + len))?;
        for (dst, src) in clip.channels.iter_mut().zip(frames) {
            dst[start..start + len].copy_from_slice(src);
        }
        Ok(())
    }
}

fn check_range(id: ClipId, clip: &AudioClip, range: &Range<usize>) -> Result<(), PoolError> {
    if range.start > range.end || range.end > clip.num_frames() {
        return Err(PoolError::RangeOutOfBounds {
            clip: id,
            start: range.start,
            end: range.end,
            frames: clip.num_frames(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stereo_ramp(frames: usize) -> AudioClip {
        let ramp: Vec<f32> = (0..frames).map(|i| i as f32 / frames as f32).collect();
        AudioClip::new("ramp", 48000, vec![ramp.clone(), ramp])
    }

    #[test]
    fn test_add_and_duplicate() {
        let mut pool = AudioPool::new();
        let id = pool.add_clip(stereo_ramp(64));
        let copy = pool.duplicate_clip(id).unwrap();

        assert_ne!(id, copy);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(copy).unwrap().channels, pool.get(id).unwrap().channels);
        assert_eq!(pool.get(copy).unwrap().name, "ramp (copy)");
    }

    #[test]
    fn test_read_write_frames() {
        let mut pool = AudioPool::new();
        let id = pool.add_clip(stereo_ramp(8));

        pool.write_frames(id, 2, &[vec![1.0, 1.0], vec![-1.0, -1.0]])
            .unwrap();
        let frames = pool.read_frames(id, 1..4).unwrap();
        assert_eq!(frames[0], vec![0.125, 1.0, 1.0]);
        assert_eq!(frames[1], vec![0.125, -1.0, -1.0]);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut pool = AudioPool::new();
        let id = pool.add_clip(stereo_ramp(8));
        assert!(matches!(
            pool.read_frames(id, 4..16),
            Err(PoolError::RangeOutOfBounds { .. })
        ));
        assert_eq!(
            pool.write_frames(id, 0, &[vec![0.0]]),
            Err(PoolError::ChannelMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_removed_clip_keeps_other_ids() {
        let mut pool = AudioPool::new();
        let a = pool.add_clip(stereo_ramp(4));
        let b = pool.add_clip(stereo_ramp(4));
        pool.remove_clip(a).unwrap();
        assert!(pool.get(b).is_ok());
        assert_eq!(pool.get(a), Err(PoolError::ClipNotFound(a)));
    }
}
