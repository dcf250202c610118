//! Structural edits over a scenario document.
//!
//! Every operation takes the document by value and hands back the edited
//! document. Unknown ids and edits that would break a structural rule (last
//! beat of a scene, last response of a beat) leave the document unchanged.

use scenario_core::id::IdGenerator;
use scenario_document::domain::factory::{create_beat, create_response, create_scene};
use scenario_document::domain::ids::{BeatId, ResponseId, SceneId};
use scenario_document::domain::model::Scenario;
use tracing::{debug, warn};

use super::patches::{BeatPatch, ResponsePatch, ScenarioPatch};

/// Rewrites jumps into beats that no longer exist anywhere in the document.
fn detach_removed(document: &mut Scenario, removed: Vec<BeatId>) {
    let gone: Vec<BeatId> = removed
        .into_iter()
        .filter(|id| !document.contains_beat(id))
        .collect();
    let rewritten = document.detach_jumps_to(&gone);
    if rewritten > 0 {
        debug!(rewritten, "jumps into removed beats now end the scenario");
    }
}

/// Appends a scene holding one default beat.
#[must_use]
pub fn add_scene(mut document: Scenario, ids: &mut dyn IdGenerator) -> Scenario {
    let scene = create_scene(&document, ids);
    debug!(scene_id = %scene.id, "scene added");
    document.push_scene(scene);
    document
}

/// Removes a scene and every beat it holds.
#[must_use]
pub fn remove_scene(mut document: Scenario, scene_id: &SceneId) -> Scenario {
    match document.remove_scene(scene_id) {
        Some(scene) => {
            debug!(%scene_id, beats = scene.beats.len(), "scene removed");
            detach_removed(&mut document, scene.beats.into_iter().map(|b| b.id).collect());
        }
        None => warn!(%scene_id, "remove_scene ignored: unknown scene"),
    }
    document
}

#[must_use]
pub fn rename_scene(mut document: Scenario, scene_id: &SceneId, title: &str) -> Scenario {
    match document.scene_mut(scene_id) {
        Some(scene) => title.clone_into(&mut scene.title),
        None => warn!(%scene_id, "rename_scene ignored: unknown scene"),
    }
    document
}

/// Moves a scene to `to_index`, clamped to the end of the list.
#[must_use]
pub fn move_scene(mut document: Scenario, scene_id: &SceneId, to_index: usize) -> Scenario {
    if !document.move_scene(scene_id, to_index) {
        warn!(%scene_id, "move_scene ignored: unknown scene");
    }
    document
}

/// Flips the editor-only collapse flag of a scene.
#[must_use]
pub fn toggle_scene_expanded(mut document: Scenario, scene_id: &SceneId) -> Scenario {
    match document.scene_mut(scene_id) {
        Some(scene) => scene.expanded = !scene.expanded,
        None => warn!(%scene_id, "toggle_scene_expanded ignored: unknown scene"),
    }
    document
}

/// Appends a beat titled `"<scene number>.<beat number>"` to the scene.
#[must_use]
pub fn add_beat(mut document: Scenario, scene_id: &SceneId, ids: &mut dyn IdGenerator) -> Scenario {
    match document.scene_mut(scene_id) {
        Some(scene) => {
            let beat = create_beat(scene, ids);
            debug!(%scene_id, beat_id = %beat.id, "beat added");
            scene.push_beat(beat);
        }
        None => warn!(%scene_id, "add_beat ignored: unknown scene"),
    }
    document
}

/// Removes a beat from its scene. The last beat of a scene stays.
#[must_use]
pub fn remove_beat(mut document: Scenario, scene_id: &SceneId, beat_id: &BeatId) -> Scenario {
    let removed = document
        .scene_mut(scene_id)
        .is_some_and(|scene| scene.remove_beat(beat_id));
    if removed {
        debug!(%scene_id, %beat_id, "beat removed");
        detach_removed(&mut document, vec![beat_id.clone()]);
    } else {
        warn!(%scene_id, %beat_id, "remove_beat ignored: unknown beat or last beat of scene");
    }
    document
}

/// Moves a beat within its scene to `to_index`, clamped to the end.
#[must_use]
pub fn move_beat(
    mut document: Scenario,
    scene_id: &SceneId,
    beat_id: &BeatId,
    to_index: usize,
) -> Scenario {
    let moved = document
        .scene_mut(scene_id)
        .is_some_and(|scene| scene.move_beat(beat_id, to_index));
    if !moved {
        warn!(%scene_id, %beat_id, "move_beat ignored: unknown scene or beat");
    }
    document
}

/// Shallow-merges `patch` into the beat.
#[must_use]
pub fn update_beat(mut document: Scenario, beat_id: &BeatId, patch: &BeatPatch) -> Scenario {
    match document.beat_mut(beat_id) {
        Some(beat) => patch.apply_to(beat),
        None => warn!(%beat_id, "update_beat ignored: unknown beat"),
    }
    document
}

/// Appends a default `next-content` response to the beat.
#[must_use]
pub fn add_response(
    mut document: Scenario,
    beat_id: &BeatId,
    ids: &mut dyn IdGenerator,
) -> Scenario {
    match document.beat_mut(beat_id) {
        Some(beat) => {
            let response = create_response(beat, ids);
            debug!(%beat_id, response_id = %response.id, "response added");
            beat.push_response(response);
        }
        None => warn!(%beat_id, "add_response ignored: unknown beat"),
    }
    document
}

/// Shallow-merges `patch` into the response.
#[must_use]
pub fn update_response(
    mut document: Scenario,
    beat_id: &BeatId,
    response_id: &ResponseId,
    patch: &ResponsePatch,
) -> Scenario {
    let updated = document
        .beat_mut(beat_id)
        .is_some_and(|beat| beat.update_response(response_id, |r| patch.apply_to(r)));
    if !updated {
        warn!(%beat_id, %response_id, "update_response ignored: unknown beat or response");
    }
    document
}

/// Removes a response. The last response of a beat stays.
#[must_use]
pub fn remove_response(
    mut document: Scenario,
    beat_id: &BeatId,
    response_id: &ResponseId,
) -> Scenario {
    let removed = document
        .beat_mut(beat_id)
        .is_some_and(|beat| beat.remove_response(response_id));
    if !removed {
        warn!(
            %beat_id,
            %response_id,
            "remove_response ignored: unknown response or last response of beat"
        );
    }
    document
}

/// Shallow-merges `patch` into the scenario's own fields.
#[must_use]
pub fn update_scenario(mut document: Scenario, patch: &ScenarioPatch) -> Scenario {
    patch.apply_to(&mut document);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_document::domain::model::{AvatarExpression, NextAction};
    use scenario_document::domain::validation::is_playable;
    use scenario_test_support::SequenceIds;

    fn two_scene_document(ids: &mut SequenceIds) -> Scenario {
        let document = add_scene(Scenario::new("Feedback conversation"), ids);
        add_scene(document, ids)
    }

    #[test]
    fn test_add_scene_appends_scene_with_one_beat() {
        // Arrange
        let mut ids = SequenceIds::new("id");

        // Act
        let document = two_scene_document(&mut ids);

        // Assert
        assert_eq!(document.scenes.len(), 2);
        assert_eq!(document.scenes[1].order, 1);
        assert_eq!(document.scenes[1].beats.len(), 1);
        assert_eq!(document.scenes[1].beats[0].title, "2.1");
    }

    #[test]
    fn test_add_beat_auto_increments_title() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_id = document.scenes[1].id.clone();

        let document = add_beat(document, &scene_id, &mut ids);
        let document = add_beat(document, &scene_id, &mut ids);

        let titles: Vec<&str> = document.scenes[1].beats.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["2.1", "2.2", "2.3"]);
        let orders: Vec<usize> = document.scenes[1].beats.iter().map(|b| b.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_unknown_ids_are_no_ops() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let before = document.clone();
        let ghost_scene = SceneId::from("ghost");
        let ghost_beat = BeatId::from("ghost");
        let ghost_response = ResponseId::from("ghost");

        let document = remove_scene(document, &ghost_scene);
        let document = add_beat(document, &ghost_scene, &mut ids);
        let document = remove_beat(document, &ghost_scene, &ghost_beat);
        let document = update_beat(document, &ghost_beat, &BeatPatch::default());
        let document = add_response(document, &ghost_beat, &mut ids);
        let patch = ResponsePatch::default();
        let document = update_response(document, &ghost_beat, &ghost_response, &patch);
        let document = remove_response(document, &ghost_beat, &ghost_response);
        let document = toggle_scene_expanded(document, &ghost_scene);
        let document = move_scene(document, &ghost_scene, 0);

        assert_eq!(document, before);
    }

    #[test]
    fn test_remove_last_beat_of_scene_is_no_op() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_id = document.scenes[0].id.clone();
        let beat_id = document.scenes[0].beats[0].id.clone();

        let document = remove_beat(document, &scene_id, &beat_id);

        assert_eq!(document.scenes[0].beats.len(), 1);
    }

    #[test]
    fn test_remove_beat_rewrites_jumps_into_it() {
        // Arrange
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let second_scene = document.scenes[1].id.clone();
        let document = add_beat(document, &second_scene, &mut ids);
        let target = document.scenes[1].beats[1].id.clone();
        let source = document.scenes[0].beats[0].id.clone();
        let response = document.scenes[0].beats[0].responses[0].id.clone();
        let document = update_response(
            document,
            &source,
            &response,
            &ResponsePatch {
                next_content_id: Some(target.clone()),
                ..ResponsePatch::default()
            },
        );

        // Act
        let document = remove_beat(document, &second_scene, &target);

        // Assert
        let rewritten = &document.scenes[0].beats[0].responses[0];
        assert_eq!(rewritten.next_action, NextAction::EndScenario);
        assert!(rewritten.next_content_id.is_none());
    }

    #[test]
    fn test_remove_scene_rewrites_jumps_into_its_beats() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let doomed_scene = document.scenes[1].id.clone();
        let target = document.scenes[1].beats[0].id.clone();
        let source = document.scenes[0].beats[0].id.clone();
        let response = document.scenes[0].beats[0].responses[0].id.clone();
        let document = update_response(
            document,
            &source,
            &response,
            &ResponsePatch {
                next_action: Some(NextAction::SpecificContent),
                next_content_id: Some(target),
                ..ResponsePatch::default()
            },
        );

        let document = remove_scene(document, &doomed_scene);

        assert_eq!(document.scenes.len(), 1);
        assert_eq!(
            document.scenes[0].beats[0].responses[0].next_action,
            NextAction::EndScenario
        );
    }

    #[test]
    fn test_removing_every_scene_leaves_unplayable_document() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_ids: Vec<SceneId> = document.scenes.iter().map(|s| s.id.clone()).collect();

        let document = scene_ids
            .iter()
            .fold(document, |doc, scene_id| remove_scene(doc, scene_id));

        assert!(document.scenes.is_empty());
        assert!(!is_playable(&document));
    }

    #[test]
    fn test_remove_scene_renumbers_remaining() {
        let mut ids = SequenceIds::new("id");
        let document = add_scene(two_scene_document(&mut ids), &mut ids);
        let first = document.scenes[0].id.clone();

        let document = remove_scene(document, &first);

        let orders: Vec<usize> = document.scenes.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1]);
    }

    #[test]
    fn test_update_beat_merges_only_given_fields() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let beat_id = document.scenes[0].beats[0].id.clone();
        let title_before = document.scenes[0].beats[0].title.clone();

        let document = update_beat(
            document,
            &beat_id,
            &BeatPatch {
                heading: Some("How do you open the meeting?".into()),
                avatar_expression: Some(AvatarExpression::Concerned),
                ..BeatPatch::default()
            },
        );

        let beat = &document.scenes[0].beats[0];
        assert_eq!(beat.heading, "How do you open the meeting?");
        assert_eq!(beat.avatar_expression, AvatarExpression::Concerned);
        assert_eq!(beat.title, title_before);
    }

    #[test]
    fn test_response_lifecycle() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let beat_id = document.scenes[0].beats[0].id.clone();
        let first_response = document.scenes[0].beats[0].responses[0].id.clone();

        let document = add_response(document, &beat_id, &mut ids);
        assert_eq!(document.scenes[0].beats[0].responses.len(), 2);

        let document = remove_response(document, &beat_id, &first_response);
        assert_eq!(document.scenes[0].beats[0].responses.len(), 1);

        let last = document.scenes[0].beats[0].responses[0].id.clone();
        let document = remove_response(document, &beat_id, &last);
        assert_eq!(document.scenes[0].beats[0].responses.len(), 1);
    }

    #[test]
    fn test_toggle_scene_expanded_flips_flag() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_id = document.scenes[0].id.clone();

        let document = toggle_scene_expanded(document, &scene_id);
        assert!(!document.scenes[0].expanded);

        let document = toggle_scene_expanded(document, &scene_id);
        assert!(document.scenes[0].expanded);
    }

    #[test]
    fn test_move_beat_reorders_within_scene() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_id = document.scenes[0].id.clone();
        let document = add_beat(document, &scene_id, &mut ids);
        let last = document.scenes[0].beats[1].id.clone();

        let document = move_beat(document, &scene_id, &last, 0);

        assert_eq!(document.scenes[0].beats[0].id, last);
        assert_eq!(document.scenes[0].beats[0].order, 0);
        assert_eq!(document.scenes[0].beats[1].order, 1);
    }

    #[test]
    fn test_rename_scene_and_update_scenario() {
        let mut ids = SequenceIds::new("id");
        let document = two_scene_document(&mut ids);
        let scene_id = document.scenes[0].id.clone();

        let document = rename_scene(document, &scene_id, "Opening");
        let document = update_scenario(
            document,
            &ScenarioPatch {
                description: Some("Practice giving feedback".into()),
                ..ScenarioPatch::default()
            },
        );

        assert_eq!(document.scenes[0].title, "Opening");
        assert_eq!(document.title, "Feedback conversation");
        assert_eq!(document.description, "Practice giving feedback");
    }
}
