//! Construction helpers that hand out fresh entities.
//!
//! Each helper looks at the container the entity is about to join so titles
//! and `order` come out right once the caller pushes it.

use scenario_core::id::IdGenerator;

use super::ids::{BeatId, ResponseId, SceneId};
use super::model::{AvatarExpression, Beat, NextAction, Response, Scenario, Scene};

/// Placeholder heading of a freshly created beat.
pub const DEFAULT_HEADING: &str = "New content";

/// Creates a response for `beat` that continues to the next content.
#[must_use]
pub fn create_response(beat: &Beat, ids: &mut dyn IdGenerator) -> Response {
    Response {
        id: ResponseId::new(ids.next_id()),
        text: format!("Response {}", beat.responses.len() + 1),
        avatar_reaction: AvatarExpression::Neutral,
        next_action: NextAction::NextContent,
        next_content_id: None,
    }
}

/// Creates the next beat of `scene`, titled `"<scene number>.<beat number>"`
/// with one default response.
#[must_use]
pub fn create_beat(scene: &Scene, ids: &mut dyn IdGenerator) -> Beat {
    let mut beat = Beat {
        id: BeatId::new(ids.next_id()),
        title: format!("{}.{}", scene.order + 1, scene.beats.len() + 1),
        heading: DEFAULT_HEADING.to_owned(),
        avatar_expression: AvatarExpression::Neutral,
        image: None,
        responses: Vec::new(),
        order: scene.beats.len(),
    };
    let response = create_response(&beat, ids);
    beat.push_response(response);
    beat
}

/// Creates the next scene of `scenario` holding one default beat.
#[must_use]
pub fn create_scene(scenario: &Scenario, ids: &mut dyn IdGenerator) -> Scene {
    let order = scenario.scenes.len();
    let mut scene = Scene {
        id: SceneId::new(ids.next_id()),
        title: format!("Scene {}", order + 1),
        order,
        beats: Vec::new(),
        expanded: true,
    };
    let beat = create_beat(&scene, ids);
    scene.push_beat(beat);
    scene
}

impl Scenario {
    /// A playable starting point: one scene, one beat, one response.
    #[must_use]
    pub fn starter(title: impl Into<String>, ids: &mut dyn IdGenerator) -> Self {
        let mut scenario = Self::new(title);
        let scene = create_scene(&scenario, ids);
        scenario.push_scene(scene);
        scenario
    }
}
