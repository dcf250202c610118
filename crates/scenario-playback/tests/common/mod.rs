//! Shared fixtures for playback integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use scenario_core::clock::Clock;
use scenario_document::domain::ids::{BeatId, ResponseId};
use scenario_document::domain::model::{
    AvatarExpression, Beat, NextAction, Response, Scenario, Scene,
};
use scenario_playback::application::feedback::PlaybackMessage;
use scenario_playback::application::player::{PlaybackConfig, PlaybackShell, Rejected};
use scenario_playback::domain::navigation::Cursor;
use scenario_test_support::FixedClock;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

/// Feedback pause used by tests that let the timer run.
pub const QUICK: Duration = Duration::from_millis(5);

/// Upper bound on waiting for a feedback message.
pub const PATIENCE: Duration = Duration::from_secs(2);

pub fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::standard())
}

pub fn response(id: &str, action: NextAction, target: Option<&str>) -> Response {
    Response {
        id: ResponseId::from(id),
        text: format!("choose {id}"),
        avatar_reaction: AvatarExpression::Neutral,
        next_action: action,
        next_content_id: target.map(BeatId::from),
    }
}

/// A beat whose only response is `next-content`.
pub fn beat(id: &str) -> Beat {
    beat_with(id, vec![response("next", NextAction::NextContent, None)])
}

pub fn beat_with(id: &str, responses: Vec<Response>) -> Beat {
    Beat {
        id: BeatId::from(id),
        title: id.to_owned(),
        heading: format!("Heading of {id}"),
        avatar_expression: AvatarExpression::Neutral,
        image: None,
        responses,
        order: 0,
    }
}

pub fn scene(id: &str, beats: Vec<Beat>) -> Scene {
    let mut scene = Scene {
        id: id.into(),
        title: id.to_owned(),
        order: 0,
        beats,
        expanded: true,
    };
    scene.renumber_beats();
    scene
}

pub fn document(scenes: Vec<Scene>) -> Scenario {
    let mut document = Scenario::new("Integration");
    for scene in scenes {
        document.push_scene(scene);
    }
    document
}

/// Scenes `[{B1}, {B2, B3}]`, every response `next-content`.
pub fn two_scene_document() -> Scenario {
    document(vec![
        scene("S1", vec![beat("B1")]),
        scene("S2", vec![beat("B2"), beat("B3")]),
    ])
}

/// Starts a shell with the given feedback pause.
pub fn start(
    document: Scenario,
    interval: Duration,
) -> Result<(PlaybackShell, UnboundedReceiver<PlaybackMessage>), Rejected> {
    let (tx, rx) = unbounded_channel();
    let config = PlaybackConfig {
        feedback_interval: interval,
    };
    PlaybackShell::start(document, config, fixed_clock(), tx).map(|shell| (shell, rx))
}

/// Id of the beat under the cursor.
pub fn current_beat_id(shell: &PlaybackShell) -> Option<String> {
    shell
        .current_view()
        .beat
        .map(|beat| beat.beat_id.to_string())
}

/// Selects `response_id`, waits for the feedback pause, and applies it.
pub async fn choose(
    shell: &mut PlaybackShell,
    messages: &mut UnboundedReceiver<PlaybackMessage>,
    response_id: &str,
) -> Cursor {
    shell
        .select_response(&ResponseId::from(response_id))
        .expect("response should be selectable");
    let message = tokio::time::timeout(PATIENCE, messages.recv())
        .await
        .expect("feedback pause should elapse")
        .expect("channel should stay open");
    shell
        .handle(message)
        .expect("transition should succeed")
        .expect("message should be current")
}
