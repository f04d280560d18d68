// Integration test: Undoing a random edit history restores the project
//
// Applies a seeded random sequence of edits (moves in time, across tracks and
// lanes, resizes, pitch shifts, splits, merges, quantizes, deletes,
// duplicates and links), then undoes everything and compares every object
// with the starting state.

use mymusic_arranger::arranger::{
    ArrangerObject, ArrangerSelections, ChildIdentifier, MidiNote, ObjectId, Region,
    RegionIdentifier, RegionKind, SelectionsKind,
};
use mymusic_arranger::project::{InsertMode, Project, TrackKind};
use mymusic_arranger::{
    ArrangerSelectionsAction, CommandManager, DawState, Deltas, EventQueue, Position,
    QuantizeOptions, ResizeType, Router, Transport,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const STEPS: usize = 200;

fn build_state() -> DawState {
    let (mut events, _consumer) = EventQueue::with_capacity(16);
    events.set_export_mode(true);
    let mut project = Project::new(Transport::default());
    for name in ["Lead", "Pad"] {
        let track = project.add_track(name, TrackKind::Instrument);
        for i in 0..3 {
            let rid = RegionIdentifier::lane(RegionKind::Midi, track, 0, 0);
            let start = i as f64 * 3840.0;
            let region = Region::new(
                rid,
                Position::from_ticks(start),
                Position::from_ticks(start + 1920.0),
                format!("{} {}", name, i),
            );
            let id = project
                .insert_object(ArrangerObject::Region(region), InsertMode::Append)
                .unwrap();
            let rid = *id.as_region().unwrap();
            for n in 0..4u8 {
                let note_start = n as f64 * 480.0;
                let note = MidiNote::new(
                    ChildIdentifier::new(rid, 0),
                    Position::from_ticks(note_start),
                    Position::from_ticks(note_start + 240.0),
                    60 + n * 2,
                    100,
                );
                project
                    .insert_object(ArrangerObject::MidiNote(note), InsertMode::Append)
                    .unwrap();
            }
        }
    }
    DawState::new(project, Box::new(Router::new()), events)
}

fn regions(state: &DawState) -> Vec<ArrangerObject> {
    state
        .project
        .all_objects()
        .into_iter()
        .filter(|o| o.as_region().is_some())
        .collect()
}

fn pick(state: &DawState, rng: &mut StdRng) -> Option<ArrangerObject> {
    let regions = regions(state);
    if regions.is_empty() {
        return None;
    }
    Some(regions[rng.gen_range(0..regions.len())].clone())
}

fn notes_of(obj: &ArrangerObject) -> Option<ArrangerSelections> {
    let notes: Vec<ArrangerObject> = obj
        .as_region()?
        .notes()
        .iter()
        .cloned()
        .map(ArrangerObject::MidiNote)
        .collect();
    if notes.is_empty() {
        return None;
    }
    ArrangerSelections::from_objects(SelectionsKind::Midi, notes).ok()
}

/// Two regions sharing `obj`'s lane, if there are any
fn merge_pair(state: &DawState, obj: &ArrangerObject) -> Option<ArrangerSelections> {
    let rid = obj.as_region()?.id;
    let partner = regions(state).into_iter().find(|o| {
        o.as_region()
            .is_some_and(|r| r.id != rid && r.id.same_container(&rid))
    })?;
    ArrangerSelections::from_objects(SelectionsKind::Timeline, [obj.clone(), partner]).ok()
}

fn random_action(state: &mut DawState, rng: &mut StdRng) -> Option<ArrangerSelectionsAction> {
    let obj = pick(state, rng)?;
    let id: ObjectId = obj.id();
    let start = obj.pos().ticks;
    let length = obj.length_ticks()?;
    let sel = ArrangerSelections::from_objects(SelectionsKind::Timeline, [obj.clone()]).ok()?;

    let action = match rng.gen_range(0..12) {
        0 => {
            // Never move before the song start
            let steps = rng.gen_range(-(start / 480.0) as i32..=4);
            ArrangerSelectionsAction::new_move(
                &state.project,
                sel,
                false,
                Deltas::ticks(steps as f64 * 480.0),
                None,
            )
        }
        1 => ArrangerSelectionsAction::new_resize(
            sel,
            None,
            ResizeType::R,
            rng.gen_range(1..=4) as f64 * 240.0,
            false,
        ),
        2 if length > 480.0 => ArrangerSelectionsAction::new_resize(
            sel,
            None,
            ResizeType::L,
            rng.gen_range(1.0..length / 2.0).floor(),
            false,
        ),
        3 => {
            let notes = notes_of(&obj)?;
            let deltas = Deltas {
                pitch: rng.gen_range(-5..=5),
                ..Deltas::default()
            };
            ArrangerSelectionsAction::new_move(&state.project, notes, false, deltas, None)
        }
        4 if length > 480.0 => {
            let at = (start + rng.gen_range(240.0..length - 240.0)).floor();
            ArrangerSelectionsAction::new_split(sel, Position::from_ticks(at))
        }
        5 if regions(state).len() > 1 => ArrangerSelectionsAction::new_delete(sel),
        6 => {
            // Invalid track or lane deltas are rejected up front
            let deltas = Deltas {
                tracks: rng.gen_range(-1..=1),
                lanes: rng.gen_range(-1..=2),
                ..Deltas::default()
            };
            ArrangerSelectionsAction::new_move(&state.project, sel, false, deltas, None)
        }
        7 => ArrangerSelectionsAction::new_duplicate(
            &state.project,
            sel,
            false,
            Deltas::ticks(rng.gen_range(1..=8) as f64 * 480.0),
            None,
        ),
        8 => ArrangerSelectionsAction::new_link(
            &state.project,
            sel,
            false,
            Deltas::ticks(rng.gen_range(1..=4) as f64 * 1920.0),
            None,
        ),
        9 => {
            let pair = merge_pair(state, &obj)?;
            ArrangerSelectionsAction::new_merge(&mut state.project, pair)
        }
        10 => ArrangerSelectionsAction::new_quantize(notes_of(&obj)?, QuantizeOptions::default()),
        _ => return None,
    };
    log::debug!("step on {:?}", id);
    action.ok()
}

fn run_history(seed: u64) {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = build_state();
    let mut manager = CommandManager::with_capacity(STEPS);
    let initial = state.project.all_objects();

    let mut applied = 0;
    for _ in 0..STEPS {
        if let Some(action) = random_action(&mut state, &mut rng) {
            manager.execute(Box::new(action), &mut state).unwrap();
            state.project.verify().unwrap();
            applied += 1;
        }
    }
    assert!(applied > 0, "no step applied for seed {}", seed);
    let edited = state.project.all_objects();

    while manager.can_undo() {
        manager.undo(&mut state).unwrap();
    }
    state.project.verify().unwrap();
    assert_eq!(state.project.all_objects(), initial, "seed {}", seed);

    while manager.can_redo() {
        manager.redo(&mut state).unwrap();
    }
    assert_eq!(state.project.all_objects(), edited, "seed {}", seed);
}

#[test]
fn test_random_history_undoes_cleanly() {
    for seed in [1, 7, 42, 1234] {
        run_history(seed);
    }
}

#[test]
#[ignore]
fn test_random_history_long() {
    // Run with: cargo test --test undo_properties -- --ignored
    for seed in 0..200 {
        run_history(seed);
    }
}
