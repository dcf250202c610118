//! Entity definitions for a scenario document.
//!
//! The serialized form is plain nested records: a scenario owns its scenes, a
//! scene owns its beats (`contents` on the wire) and a beat owns its responses.

use serde::{Deserialize, Serialize};

use super::ids::{BeatId, ResponseId, SceneId};

/// Avatar mood labels shown alongside a beat or as a reaction to a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarExpression {
    /// Resting face.
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Surprised,
    Confused,
    Thinking,
    Concerned,
}

impl AvatarExpression {
    /// The wire label, e.g. `"thinking"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Happy => "happy",
            Self::Sad => "sad",
            Self::Angry => "angry",
            Self::Surprised => "surprised",
            Self::Confused => "confused",
            Self::Thinking => "thinking",
            Self::Concerned => "concerned",
        }
    }
}

/// Routing action carried by a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NextAction {
    /// Next beat in the scene, falling through to the next scene.
    #[default]
    NextContent,
    /// First beat of the next scene.
    NextScene,
    /// The beat named by `nextContentId`, anywhere in the scenario.
    SpecificContent,
    /// Terminate playback.
    EndScenario,
}

/// A learner-selectable choice attached to a beat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    /// Unique within the owning beat.
    pub id: ResponseId,
    /// Text shown on the choice button.
    pub text: String,
    /// Avatar mood displayed while the choice is held during feedback.
    #[serde(default)]
    pub avatar_reaction: AvatarExpression,
    /// Where playback goes after this choice.
    #[serde(default)]
    pub next_action: NextAction,
    /// Jump target; only meaningful for [`NextAction::SpecificContent`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_content_id: Option<BeatId>,
}

impl Response {
    /// Returns the jump target if this response is a `specific-content` jump.
    #[must_use]
    pub fn jump_target(&self) -> Option<&BeatId> {
        match self.next_action {
            NextAction::SpecificContent => self.next_content_id.as_ref(),
            _ => None,
        }
    }
}

/// A single narrative content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Beat {
    /// Unique across the whole scenario.
    pub id: BeatId,
    /// Author-facing label, e.g. `"2.3"`.
    pub title: String,
    /// Text shown to the learner.
    pub heading: String,
    #[serde(default)]
    pub avatar_expression: AvatarExpression,
    /// Optional beat-level image URL, stored verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub responses: Vec<Response>,
    /// Position within the owning scene. Derived.
    #[serde(default)]
    pub order: usize,
}

impl Beat {
    /// Looks up a response by id.
    #[must_use]
    pub fn response(&self, response_id: &ResponseId) -> Option<&Response> {
        self.responses.iter().find(|r| &r.id == response_id)
    }

    pub(crate) fn response_mut(&mut self, response_id: &ResponseId) -> Option<&mut Response> {
        self.responses.iter_mut().find(|r| &r.id == response_id)
    }

    /// Appends a response.
    pub fn push_response(&mut self, response: Response) {
        self.responses.push(response);
    }

    /// Removes a response. Refuses to remove the last one so the beat stays
    /// answerable. Returns whether a response was removed.
    pub fn remove_response(&mut self, response_id: &ResponseId) -> bool {
        if self.responses.len() <= 1 {
            return false;
        }
        let before = self.responses.len();
        self.responses.retain(|r| &r.id != response_id);
        self.responses.len() != before
    }

    /// Applies `update` to the response with `response_id`, if present.
    pub fn update_response(
        &mut self,
        response_id: &ResponseId,
        update: impl FnOnce(&mut Response),
    ) -> bool {
        match self.response_mut(response_id) {
            Some(response) => {
                update(response);
                true
            }
            None => false,
        }
    }
}

/// An ordered group of beats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Unique among scenes.
    pub id: SceneId,
    pub title: String,
    /// Position within the scenario. Derived.
    #[serde(default)]
    pub order: usize,
    /// Beats in presentation order.
    #[serde(rename = "contents", default)]
    pub beats: Vec<Beat>,
    /// Editor-only collapse state.
    #[serde(default = "default_expanded")]
    pub expanded: bool,
}

fn default_expanded() -> bool {
    true
}

impl Scene {
    /// Looks up a beat by id.
    #[must_use]
    pub fn beat(&self, beat_id: &BeatId) -> Option<&Beat> {
        self.beats.iter().find(|b| &b.id == beat_id)
    }

    /// Appends a beat and renumbers.
    pub fn push_beat(&mut self, beat: Beat) {
        self.beats.push(beat);
        self.renumber_beats();
    }

    /// Removes a beat and renumbers. Refuses to remove the last beat of the
    /// scene. Returns whether a beat was removed.
    pub fn remove_beat(&mut self, beat_id: &BeatId) -> bool {
        if self.beats.len() <= 1 {
            return false;
        }
        let before = self.beats.len();
        self.beats.retain(|b| &b.id != beat_id);
        let removed = self.beats.len() != before;
        if removed {
            self.renumber_beats();
        }
        removed
    }

    /// Moves a beat to `to_index` (clamped to the end) and renumbers.
    pub fn move_beat(&mut self, beat_id: &BeatId, to_index: usize) -> bool {
        let Some(from) = self.beats.iter().position(|b| &b.id == beat_id) else {
            return false;
        };
        let beat = self.beats.remove(from);
        let to = to_index.min(self.beats.len());
        self.beats.insert(to, beat);
        self.renumber_beats();
        true
    }

    /// Rewrites every beat `order` to its index.
    pub fn renumber_beats(&mut self) {
        for (index, beat) in self.beats.iter_mut().enumerate() {
            beat.order = index;
        }
    }
}

/// Root aggregate: the full branching-narrative document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Opaque media URL.
    #[serde(default)]
    pub background_image: String,
    /// Opaque media URL.
    #[serde(default)]
    pub avatar_image: String,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

impl Scenario {
    /// Creates an empty scenario with the given title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Looks up a scene by id.
    #[must_use]
    pub fn scene(&self, scene_id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|s| &s.id == scene_id)
    }

    /// Looks up a scene by id for mutation.
    pub fn scene_mut(&mut self, scene_id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| &s.id == scene_id)
    }

    /// Looks up a beat anywhere in the scenario.
    #[must_use]
    pub fn beat(&self, beat_id: &BeatId) -> Option<&Beat> {
        self.scenes.iter().find_map(|s| s.beat(beat_id))
    }

    /// Looks up a beat anywhere in the scenario for mutation.
    pub fn beat_mut(&mut self, beat_id: &BeatId) -> Option<&mut Beat> {
        self.scenes
            .iter_mut()
            .flat_map(|s| s.beats.iter_mut())
            .find(|b| &b.id == beat_id)
    }

    /// Returns `true` if any scene holds a beat with this id.
    #[must_use]
    pub fn contains_beat(&self, beat_id: &BeatId) -> bool {
        self.beat(beat_id).is_some()
    }

    /// Number of beats across all scenes.
    #[must_use]
    pub fn total_beats(&self) -> usize {
        self.scenes.iter().map(|s| s.beats.len()).sum()
    }

    /// All beats in scene-then-beat order.
    pub fn beats_in_order(&self) -> impl Iterator<Item = &Beat> {
        self.scenes.iter().flat_map(|s| s.beats.iter())
    }

    /// Appends a scene and renumbers.
    pub fn push_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
        self.renumber_scenes();
    }

    /// Removes a scene with all of its beats and renumbers. Returns the
    /// removed scene, if any.
    pub fn remove_scene(&mut self, scene_id: &SceneId) -> Option<Scene> {
        let index = self.scenes.iter().position(|s| &s.id == scene_id)?;
        let removed = self.scenes.remove(index);
        self.renumber_scenes();
        Some(removed)
    }

    /// Moves a scene to `to_index` (clamped to the end) and renumbers.
    pub fn move_scene(&mut self, scene_id: &SceneId, to_index: usize) -> bool {
        let Some(from) = self.scenes.iter().position(|s| &s.id == scene_id) else {
            return false;
        };
        let scene = self.scenes.remove(from);
        let to = to_index.min(self.scenes.len());
        self.scenes.insert(to, scene);
        self.renumber_scenes();
        true
    }

    /// Rewrites every scene and beat `order` to its index.
    pub fn renumber_scenes(&mut self) {
        for (index, scene) in self.scenes.iter_mut().enumerate() {
            scene.order = index;
            scene.renumber_beats();
        }
    }

    /// Points every response that jumps to one of `removed` at
    /// `end-scenario` instead. Returns the number of responses rewritten.
    pub fn detach_jumps_to(&mut self, removed: &[BeatId]) -> usize {
        let mut rewritten = 0;
        for response in self
            .scenes
            .iter_mut()
            .flat_map(|s| s.beats.iter_mut())
            .flat_map(|b| b.responses.iter_mut())
        {
            let dangling = response
                .jump_target()
                .is_some_and(|target| removed.contains(target));
            if dangling {
                response.next_action = NextAction::EndScenario;
                response.next_content_id = None;
                rewritten += 1;
            }
        }
        rewritten
    }
}
