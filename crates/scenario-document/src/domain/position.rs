//! Positions inside a scenario and the id→position index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ids::BeatId;
use super::model::Scenario;

/// A `{sceneIndex, beatIndex}` pair addressing one beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub scene_index: usize,
    pub beat_index: usize,
}

impl Position {
    /// First beat of the first scene.
    pub const START: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(scene_index: usize, beat_index: usize) -> Self {
        Self {
            scene_index,
            beat_index,
        }
    }
}

/// Index built once per loaded document: beat id → position, plus the beat
/// count of every scene.
///
/// Duplicate beat ids resolve to their first occurrence in scene-then-beat
/// order.
#[derive(Debug, Clone, Default)]
pub struct BeatIndex {
    positions: HashMap<BeatId, Position>,
    scene_lengths: Vec<usize>,
}

impl BeatIndex {
    /// Indexes every beat of `scenario`.
    #[must_use]
    pub fn build(scenario: &Scenario) -> Self {
        let mut positions = HashMap::with_capacity(scenario.total_beats());
        for (scene_index, scene) in scenario.scenes.iter().enumerate() {
            for (beat_index, beat) in scene.beats.iter().enumerate() {
                positions
                    .entry(beat.id.clone())
                    .or_insert(Position::new(scene_index, beat_index));
            }
        }
        Self {
            positions,
            scene_lengths: scenario.scenes.iter().map(|s| s.beats.len()).collect(),
        }
    }

    /// Position of the beat with `beat_id`.
    #[must_use]
    pub fn position_of(&self, beat_id: &BeatId) -> Option<Position> {
        self.positions.get(beat_id).copied()
    }

    #[must_use]
    pub fn contains(&self, beat_id: &BeatId) -> bool {
        self.positions.contains_key(beat_id)
    }

    /// Number of beats in scene `scene_index`, or `None` past the last scene.
    #[must_use]
    pub fn scene_len(&self, scene_index: usize) -> Option<usize> {
        self.scene_lengths.get(scene_index).copied()
    }

    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.scene_lengths.len()
    }

    #[must_use]
    pub fn total_beats(&self) -> usize {
        self.scene_lengths.iter().sum()
    }

    /// Returns `true` if `position` addresses an existing beat.
    #[must_use]
    pub fn is_valid(&self, position: Position) -> bool {
        self.scene_len(position.scene_index)
            .is_some_and(|len| position.beat_index < len)
    }
}
