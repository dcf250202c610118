//! Partial updates applied by the `update*` operations.
//!
//! A `None` field leaves the current value alone.

use scenario_document::domain::ids::BeatId;
use scenario_document::domain::model::{AvatarExpression, Beat, NextAction, Response, Scenario};
use serde::Deserialize;

/// Partial update of the scenario's own fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub background_image: Option<String>,
    pub avatar_image: Option<String>,
}

impl ScenarioPatch {
    pub(crate) fn apply_to(&self, scenario: &mut Scenario) {
        if let Some(title) = &self.title {
            scenario.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            scenario.description.clone_from(description);
        }
        if let Some(url) = &self.background_image {
            scenario.background_image.clone_from(url);
        }
        if let Some(url) = &self.avatar_image {
            scenario.avatar_image.clone_from(url);
        }
    }
}

/// Partial update of a beat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BeatPatch {
    pub title: Option<String>,
    pub heading: Option<String>,
    pub avatar_expression: Option<AvatarExpression>,
    /// `Some(None)` clears the image.
    pub image: Option<Option<String>>,
}

impl BeatPatch {
    pub(crate) fn apply_to(&self, beat: &mut Beat) {
        if let Some(title) = &self.title {
            beat.title.clone_from(title);
        }
        if let Some(heading) = &self.heading {
            beat.heading.clone_from(heading);
        }
        if let Some(expression) = self.avatar_expression {
            beat.avatar_expression = expression;
        }
        if let Some(image) = &self.image {
            beat.image.clone_from(image);
        }
    }
}

/// Partial update of a response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponsePatch {
    pub text: Option<String>,
    pub avatar_reaction: Option<AvatarExpression>,
    pub next_action: Option<NextAction>,
    /// Picking a target without an action implies `specific-content`.
    pub next_content_id: Option<BeatId>,
}

impl ResponsePatch {
    pub(crate) fn apply_to(&self, response: &mut Response) {
        if let Some(text) = &self.text {
            response.text.clone_from(text);
        }
        if let Some(reaction) = self.avatar_reaction {
            response.avatar_reaction = reaction;
        }
        match (self.next_action, &self.next_content_id) {
            (Some(action), target) => {
                response.next_action = action;
                if target.is_some() {
                    response.next_content_id.clone_from(target);
                }
            }
            (None, Some(target)) => {
                response.next_action = NextAction::SpecificContent;
                response.next_content_id = Some(target.clone());
            }
            (None, None) => {}
        }
        if response.next_action != NextAction::SpecificContent {
            response.next_content_id = None;
        }
    }
}
