//! Interactive terminal playback.
//!
//! The loop reads learner input line by line and waits on the playback
//! message channel whenever a feedback pause is running.

use std::io::Write;

use scenario_document::domain::ids::ResponseId;
use scenario_document::domain::model::Scenario;
use scenario_playback::application::feedback::PlaybackMessage;
use scenario_playback::application::player::PlaybackShell;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use crate::error::AppError;
use crate::render::render_view;

/// What a line of learner input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Choice(usize),
    Quit,
    Invalid,
}

fn parse_choice(line: &str, choices: usize) -> Input {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=choices).contains(&n) => Input::Choice(n - 1),
        _ => Input::Invalid,
    }
}

fn wants_again(line: &str) -> bool {
    matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Drains the events the session recorded and logs them. Returns how many
/// were drained.
fn publish_events(shell: &mut PlaybackShell) -> usize {
    let events = shell.drain_events();
    for event in &events {
        debug!(
            event_type = event.kind.event_type(),
            sequence_number = event.metadata.sequence_number,
            "playback event"
        );
    }
    events.len()
}

/// Waits out the running feedback pause, applies the transition, and
/// publishes the resulting events.
async fn await_feedback(
    shell: &mut PlaybackShell,
    messages: &mut UnboundedReceiver<PlaybackMessage>,
) -> Result<(), AppError> {
    while shell.is_awaiting_feedback() {
        let Some(message) = messages.recv().await else {
            break;
        };
        if shell.handle(message)?.is_none() {
            debug!("ignored stale playback message");
        }
    }
    publish_events(shell);
    Ok(())
}

/// Plays `shell` until the learner quits or declines a replay, then hands the
/// document back.
///
/// # Errors
///
/// Returns `AppError::Io` if the terminal cannot be read or written and
/// `AppError::Domain` if playback fails.
pub async fn play<R, W>(
    mut shell: PlaybackShell,
    mut messages: UnboundedReceiver<PlaybackMessage>,
    input: R,
    mut output: W,
) -> Result<Scenario, AppError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    publish_events(&mut shell);

    loop {
        let view = shell.current_view();
        write!(output, "{}", render_view(&view))?;

        if view.complete {
            write!(output, "Play again? [y/N] ")?;
            output.flush()?;
            match lines.next_line().await? {
                Some(line) if wants_again(&line) => {
                    shell.restart()?;
                    publish_events(&mut shell);
                    writeln!(output)?;
                    continue;
                }
                _ => break,
            }
        }

        let responses: Vec<ResponseId> = view
            .beat
            .map(|beat| beat.responses.into_iter().map(|r| r.response_id).collect())
            .unwrap_or_default();
        write!(output, "Choose 1-{} (q to quit): ", responses.len())?;
        output.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let index = match parse_choice(&line, responses.len()) {
            Input::Choice(index) => index,
            Input::Quit => break,
            Input::Invalid => {
                writeln!(output, "Please enter a number between 1 and {}.", responses.len())?;
                continue;
            }
        };

        shell.select_response(&responses[index])?;
        write!(output, "{}", render_view(&shell.current_view()))?;
        output.flush()?;

        await_feedback(&mut shell, &mut messages).await?;
        writeln!(output)?;
    }

    writeln!(output)?;
    Ok(shell.close())
}
