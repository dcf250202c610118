//! Terminal rendering of playback views.

use std::fmt::Write as _;

use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use scenario_playback::application::query_handlers::PlaybackView;

const BAR_WIDTH: usize = 20;

/// Flattens a Markdown beat heading to plain terminal text.
///
/// Inline markup is dropped, list items get a bullet, and blank lines are
/// removed.
#[must_use]
pub fn markdown_to_plain_text(markdown: &str) -> String {
    let mut out = String::new();
    for event in Parser::new(markdown) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::Start(Tag::Item) => out.push_str("• "),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => out.push('\n'),
            _ => {}
        }
    }
    out.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// `[#####---------------]  25%`
#[must_use]
pub fn progress_bar(percent: u8) -> String {
    let percent = usize::from(percent.min(100));
    let filled = percent * BAR_WIDTH / 100;
    format!(
        "[{}{}] {percent:>3}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled)
    )
}

/// Renders the screen for `view`.
#[must_use]
pub fn render_view(view: &PlaybackView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", view.title);
    let _ = writeln!(out, "{}", progress_bar(view.progress_percent));

    let Some(beat) = &view.beat else {
        let _ = writeln!(out);
        let _ = writeln!(out, "Scenario complete.");
        return out;
    };

    let _ = writeln!(out);
    let _ = writeln!(out, "[{}] ({})", beat.title, beat.avatar_expression.label());
    if let Some(image) = &beat.image {
        let _ = writeln!(out, "image: {image}");
    }
    let _ = writeln!(out, "{}", markdown_to_plain_text(&beat.heading));
    let _ = writeln!(out);
    for (number, response) in beat.responses.iter().enumerate() {
        let marker = if beat.selected_response_id.as_ref() == Some(&response.response_id) {
            '>'
        } else {
            ' '
        };
        let _ = writeln!(out, "{marker} {}) {}", number + 1, response.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_document::domain::ids::{BeatId, ResponseId};
    use scenario_document::domain::model::AvatarExpression;
    use scenario_document::domain::position::Position;
    use scenario_playback::application::query_handlers::{BeatView, ResponseView};
    use scenario_playback::domain::navigation::Cursor;

    fn view(beat: Option<BeatView>) -> PlaybackView {
        PlaybackView {
            title: "Difficult Conversations".to_owned(),
            background_image: String::new(),
            avatar_image: String::new(),
            cursor: beat
                .as_ref()
                .map_or(Cursor::Complete, |_| Cursor::At(Position::START)),
            complete: beat.is_none(),
            beat,
            progress: 0.5,
            progress_percent: 50,
            awaiting_feedback: false,
        }
    }

    fn beat_view(selected: Option<&str>) -> BeatView {
        BeatView {
            beat_id: BeatId::from("b1"),
            title: "1.1".to_owned(),
            heading: "Your colleague **interrupts** you.".to_owned(),
            image: None,
            avatar_expression: AvatarExpression::Concerned,
            responses: vec![
                ResponseView {
                    response_id: ResponseId::from("r1"),
                    text: "Pause and listen".to_owned(),
                },
                ResponseView {
                    response_id: ResponseId::from("r2"),
                    text: "Keep talking".to_owned(),
                },
            ],
            selected_response_id: selected.map(ResponseId::from),
        }
    }

    #[test]
    fn test_markdown_inline_markup_is_dropped() {
        let text = markdown_to_plain_text("# Welcome\n\nYou are *late* for `standup`.");

        assert_eq!(text, "Welcome\nYou are late for standup.");
    }

    #[test]
    fn test_markdown_lists_get_bullets() {
        let text = markdown_to_plain_text("Options:\n\n- stay\n- leave");

        assert_eq!(text, "Options:\n• stay\n• leave");
    }

    #[test]
    fn test_progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), format!("[{}]   0%", "-".repeat(20)));
        assert_eq!(progress_bar(50), format!("[{}{}]  50%", "#".repeat(10), "-".repeat(10)));
        assert_eq!(progress_bar(100), format!("[{}] 100%", "#".repeat(20)));
    }

    #[test]
    fn test_render_view_numbers_responses() {
        let screen = render_view(&view(Some(beat_view(None))));

        assert!(screen.contains("== Difficult Conversations =="));
        assert!(screen.contains("[1.1] (concerned)"));
        assert!(screen.contains("Your colleague interrupts you."));
        assert!(screen.contains("  1) Pause and listen"));
        assert!(screen.contains("  2) Keep talking"));
    }

    #[test]
    fn test_render_view_marks_selected_response() {
        let screen = render_view(&view(Some(beat_view(Some("r2")))));

        assert!(screen.contains("> 2) Keep talking"));
        assert!(screen.contains("  1) Pause and listen"));
    }

    #[test]
    fn test_render_complete_view() {
        let screen = render_view(&view(None));

        assert!(screen.contains("Scenario complete."));
    }
}
