// Tracks - Containers of regions, automation tracks, scales and markers

use crate::arranger::identifier::{RegionKind, TrackKey};
use crate::arranger::object::{Marker, ScaleObject};
use crate::arranger::region::{LinkGroupId, Region};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Instrument,
    Midi,
    Audio,
    Chord,
    Marker,
    Bus,
}

impl TrackKind {
    /// Kind of regions the track's lanes hold, if it has lanes
    pub fn lane_region_kind(&self) -> Option<RegionKind> {
        match self {
            TrackKind::Instrument | TrackKind::Midi => Some(RegionKind::Midi),
            TrackKind::Audio => Some(RegionKind::Audio),
            _ => None,
        }
    }
}

/// Automatable port, addressed by owning track and port index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortIdentifier {
    pub track: TrackKey,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationTrack {
    pub port: PortIdentifier,
    pub visible: bool,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLane {
    pub name: String,
    pub regions: Vec<Region>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub key: TrackKey,
    pub name: String,
    pub kind: TrackKind,
    pub visible: bool,
    pub lanes_visible: bool,
    pub lanes: Vec<TrackLane>,
    pub automation_tracks: Vec<AutomationTrack>,
    /// Chord track only
    pub chord_regions: Vec<Region>,
    /// Chord track only
    pub scales: Vec<ScaleObject>,
    /// Marker track only
    pub markers: Vec<Marker>,
}

impl Track {
    pub fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        let mut track = Self {
            key: TrackKey::new(),
            name: name.into(),
            kind,
            visible: true,
            lanes_visible: false,
            lanes: Vec::new(),
            automation_tracks: Vec::new(),
            chord_regions: Vec::new(),
            scales: Vec::new(),
            markers: Vec::new(),
        };
        if kind.lane_region_kind().is_some() {
            track.lanes.push(TrackLane {
                name: "Lane 1".to_string(),
                regions: Vec::new(),
            });
        }
        track
    }

    /// Adds an automation track for the given port index; returns its index
    pub fn add_automation_track(&mut self, port_index: usize) -> usize {
        self.automation_tracks.push(AutomationTrack {
            port: PortIdentifier {
                track: self.key,
                index: port_index,
            },
            visible: true,
            regions: Vec::new(),
        });
        self.automation_tracks.len() - 1
    }

    /// Makes sure lane `pos` exists and is followed by one more lane
    pub fn create_missing_lanes(&mut self, pos: usize) {
        while self.lanes.len() < pos + 2 {
            let n = self.lanes.len() + 1;
            self.lanes.push(TrackLane {
                name: format!("Lane {}", n),
                regions: Vec::new(),
            });
        }
    }

    /// Drops trailing empty lanes, keeping exactly one empty lane at the end
    pub fn remove_empty_last_lanes(&mut self) {
        while self.lanes.len() > 1 {
            let n = self.lanes.len();
            if self.lanes[n - 1].regions.is_empty() && self.lanes[n - 2].regions.is_empty() {
                self.lanes.pop();
            } else {
                break;
            }
        }
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.lanes
            .iter()
            .flat_map(|l| l.regions.iter())
            .chain(self.automation_tracks.iter().flat_map(|at| at.regions.iter()))
            .chain(self.chord_regions.iter())
    }

    pub fn regions_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.lanes
            .iter_mut()
            .flat_map(|l| l.regions.iter_mut())
            .chain(
                self.automation_tracks
                    .iter_mut()
                    .flat_map(|at| at.regions.iter_mut()),
            )
            .chain(self.chord_regions.iter_mut())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracklist {
    pub tracks: Vec<Track>,
}

impl Tracklist {
    pub fn add_track(&mut self, track: Track) -> TrackKey {
        let key = track.key;
        self.tracks.push(track);
        key
    }

    pub fn track(&self, key: &TrackKey) -> Option<&Track> {
        self.tracks.iter().find(|t| t.key == *key)
    }

    pub fn track_mut(&mut self, key: &TrackKey) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.key == *key)
    }

    pub fn track_index(&self, key: &TrackKey) -> Option<usize> {
        self.tracks.iter().position(|t| t.key == *key)
    }

    /// Visible track `delta` visible tracks away from `key`; hidden tracks
    /// are skipped.
    pub fn visible_track_after_delta(&self, key: &TrackKey, delta: i32) -> Option<TrackKey> {
        let start = self.track_index(key)?;
        if delta == 0 {
            return Some(*key);
        }
        let step: isize = if delta > 0 { 1 } else { -1 };
        let mut remaining = delta.unsigned_abs();
        let mut idx = start as isize;
        while remaining > 0 {
            idx += step;
            let track = self.tracks.get(usize::try_from(idx).ok()?)?;
            if track.visible {
                remaining -= 1;
            }
        }
        Some(self.tracks[idx as usize].key)
    }

    pub fn chord_track(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == TrackKind::Chord)
    }

    pub fn chord_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.kind == TrackKind::Chord)
    }

    pub fn marker_track(&self) -> Option<&Track> {
        self.tracks.iter().find(|t| t.kind == TrackKind::Marker)
    }

    pub fn marker_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.kind == TrackKind::Marker)
    }

    /// Track key and automation track index automating `port`
    pub fn automation_track_for_port(&self, port: &PortIdentifier) -> Option<(TrackKey, usize)> {
        self.tracks.iter().find_map(|t| {
            t.automation_tracks
                .iter()
                .position(|at| at.port == *port)
                .map(|at_idx| (t.key, at_idx))
        })
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.tracks.iter().flat_map(|t| t.regions())
    }

    pub fn regions_mut(&mut self) -> impl Iterator<Item = &mut Region> {
        self.tracks.iter_mut().flat_map(|t| t.regions_mut())
    }

    /// Regions that belong to the given link group
    pub fn regions_in_group(&self, group: LinkGroupId) -> impl Iterator<Item = &Region> {
        self.regions().filter(move |r| r.link_group == Some(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_track_has_one_empty_lane() {
        let track = Track::new("Piano", TrackKind::Instrument);
        assert_eq!(track.lanes.len(), 1);
        let bus = Track::new("Bus", TrackKind::Bus);
        assert!(bus.lanes.is_empty());
    }

    #[test]
    fn test_lane_bookkeeping() {
        let mut track = Track::new("Piano", TrackKind::Instrument);
        track.create_missing_lanes(3);
        assert_eq!(track.lanes.len(), 5);

        track.remove_empty_last_lanes();
        assert_eq!(track.lanes.len(), 1);
    }

    #[test]
    fn test_visible_track_after_delta_skips_hidden() {
        let mut tracklist = Tracklist::default();
        let a = tracklist.add_track(Track::new("A", TrackKind::Midi));
        let mut hidden = Track::new("B", TrackKind::Midi);
        hidden.visible = false;
        tracklist.add_track(hidden);
        let c = tracklist.add_track(Track::new("C", TrackKind::Midi));

        assert_eq!(tracklist.visible_track_after_delta(&a, 1), Some(c));
        assert_eq!(tracklist.visible_track_after_delta(&c, -1), Some(a));
        assert_eq!(tracklist.visible_track_after_delta(&c, 1), None);
        assert_eq!(tracklist.visible_track_after_delta(&a, 0), Some(a));
    }

    #[test]
    fn test_automation_track_for_port() {
        let mut tracklist = Tracklist::default();
        let mut track = Track::new("Synth", TrackKind::Instrument);
        track.add_automation_track(0);
        let at = track.add_automation_track(4);
        let port = track.automation_tracks[at].port;
        let key = tracklist.add_track(track);

        assert_eq!(tracklist.automation_track_for_port(&port), Some((key, 1)));
    }
}
