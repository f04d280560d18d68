// Editor functions - One-shot transforms offered by the MIDI, automation and
// audio editors. They operate on a selection clone; the edit action then
// copies the result back into the project.

use crate::arranger::object::ArrangerObject;
use crate::arranger::selections::{ArrangerSelections, SelectionsError, SelectionsKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MidiFunction {
    /// Mirror note order in time across the selection span
    FlipHorizontal,
    /// Mirror pitches around the center of the selection's pitch range
    FlipVertical,
    /// Extend every note up to the start of the next one
    Legato,
    /// Shorten every note to three quarters of its length
    Portato,
    /// Shorten every note to a quarter of its length
    Staccato,
    /// Ramp velocities from `from` to `to` in time order
    Crescendo { from: u8, to: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutomationFunction {
    FlipHorizontal,
    FlipVertical,
    /// Make every segment linear
    Flatten,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioFunction {
    Invert,
    Reverse,
    NormalizePeak,
    LinearFadeIn,
    LinearFadeOut,
}

fn ensure_kind(sel: &ArrangerSelections, kind: SelectionsKind) -> Result<(), SelectionsError> {
    if sel.kind() != kind {
        return Err(SelectionsError::WrongDomain {
            kind,
            object: match sel.kind() {
                SelectionsKind::Timeline => "timeline object",
                SelectionsKind::Midi => "MIDI note",
                SelectionsKind::Chord => "chord object",
                SelectionsKind::Automation => "automation point",
                SelectionsKind::Audio => "audio range",
            },
        });
    }
    Ok(())
}

/// Member indices ordered by start position
fn time_order(sel: &ArrangerSelections) -> Vec<usize> {
    let objs = sel.objects();
    let mut order: Vec<usize> = (0..objs.len()).collect();
    order.sort_by(|&a, &b| {
        objs[a]
            .pos()
            .ticks
            .partial_cmp(&objs[b].pos().ticks)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    order
}

impl MidiFunction {
    pub fn apply(&self, sel: &mut ArrangerSelections) -> Result<(), SelectionsError> {
        ensure_kind(sel, SelectionsKind::Midi)?;
        if sel.len() == 0 {
            return Ok(());
        }
        let order = time_order(sel);
        let start = sel.objects()[order[0]].pos().ticks;
        let end = sel
            .objects()
            .iter()
            .filter_map(|o| o.end_pos())
            .map(|p| p.ticks)
            .fold(start, f64::max);
        let (min_pitch, max_pitch) = sel
            .objects()
            .iter()
            .filter_map(|o| match o {
                ArrangerObject::MidiNote(n) => Some(n.pitch),
                _ => None,
            })
            .fold((u8::MAX, 0u8), |(lo, hi), p| (lo.min(p), hi.max(p)));
        let next_starts: Vec<Option<f64>> = {
            let objs = sel.objects();
            let mut next = vec![None; objs.len()];
            for w in order.windows(2) {
                next[w[0]] = Some(objs[w[1]].pos().ticks);
            }
            next
        };
        let count = sel.len();
        let rank: Vec<usize> = {
            let mut rank = vec![0; count];
            for (r, &i) in order.iter().enumerate() {
                rank[i] = r;
            }
            rank
        };

        for (i, obj) in sel.objects_mut().iter_mut().enumerate() {
            let ArrangerObject::MidiNote(n) = obj else {
                continue;
            };
            let length = n.end_pos.ticks - n.base.pos.ticks;
            match *self {
                MidiFunction::FlipHorizontal => {
                    let new_start = start + (end - n.end_pos.ticks);
                    n.base.pos.ticks = new_start;
                    n.end_pos.ticks = new_start + length;
                }
                MidiFunction::FlipVertical => {
                    n.pitch = (min_pitch as u16 + max_pitch as u16 - n.pitch as u16) as u8;
                }
                MidiFunction::Legato => {
                    if let Some(next) = next_starts[i] {
                        if next > n.base.pos.ticks {
                            n.end_pos.ticks = next;
                        }
                    }
                }
                MidiFunction::Portato => n.end_pos.ticks = n.base.pos.ticks + length * 0.75,
                MidiFunction::Staccato => n.end_pos.ticks = n.base.pos.ticks + length * 0.25,
                MidiFunction::Crescendo { from, to } => {
                    let t = if count > 1 {
                        rank[i] as f64 / (count - 1) as f64
                    } else {
                        0.0
                    };
                    let vel = from as f64 + (to as f64 - from as f64) * t;
                    n.velocity = vel.round().clamp(1.0, 127.0) as u8;
                }
            }
        }
        Ok(())
    }
}

impl AutomationFunction {
    pub fn apply(&self, sel: &mut ArrangerSelections) -> Result<(), SelectionsError> {
        ensure_kind(sel, SelectionsKind::Automation)?;
        if sel.len() == 0 {
            return Ok(());
        }
        let (first, last) = sel
            .objects()
            .iter()
            .map(|o| o.pos().ticks)
            .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)));

        for obj in sel.objects_mut() {
            let ArrangerObject::AutomationPoint(ap) = obj else {
                continue;
            };
            match self {
                AutomationFunction::FlipHorizontal => {
                    ap.base.pos.ticks = first + (last - ap.base.pos.ticks);
                }
                AutomationFunction::FlipVertical => {
                    ap.normalized_val = 1.0 - ap.normalized_val;
                    ap.curve.curviness = -ap.curve.curviness;
                }
                AutomationFunction::Flatten => ap.curve.curviness = 0.0,
            }
        }
        Ok(())
    }
}

impl AudioFunction {
    /// Transforms deinterleaved frames in place
    pub fn apply(&self, channels: &mut [Vec<f32>]) {
        match self {
            AudioFunction::Invert => {
                for s in channels.iter_mut().flatten() {
                    *s = -*s;
                }
            }
            AudioFunction::Reverse => {
                for ch in channels.iter_mut() {
                    ch.reverse();
                }
            }
            AudioFunction::NormalizePeak => {
                // Peak is taken across all channels so the stereo image is kept
                let peak = channels
                    .iter()
                    .flatten()
                    .fold(0.0f32, |acc, s| acc.max(s.abs()));
                if peak > f32::EPSILON {
                    let gain = 1.0 / peak;
                    for s in channels.iter_mut().flatten() {
                        *s *= gain;
                    }
                }
            }
            AudioFunction::LinearFadeIn | AudioFunction::LinearFadeOut => {
                let fade_in = *self == AudioFunction::LinearFadeIn;
                for ch in channels.iter_mut() {
                    let n = ch.len();
                    if n == 0 {
                        continue;
                    }
                    let denom = (n.max(2) - 1) as f32;
                    for (i, s) in ch.iter_mut().enumerate() {
                        let t = i as f32 / denom;
                        *s *= if fade_in { t } else { 1.0 - t };
                    }
                }
            }
        }
    }
}
