//! The `scenario` subcommands.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use scenario_authoring::application::command_handlers::{
    handle_attach_media, handle_save_scenario,
};
use scenario_authoring::domain::commands::{AttachMedia, MediaTarget, SaveScenario};
use scenario_core::clock::{Clock, SystemClock};
use scenario_core::id::TimestampIdGenerator;
use scenario_core::media::MediaFile;
use scenario_document::domain::ids::BeatId;
use scenario_document::domain::model::Scenario;
use scenario_document::domain::validation::{
    beats_without_responses, check_playable, is_playable, validate_jump_targets,
};
use scenario_playback::application::player::PlaybackShell;
use tokio::io::BufReader;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::media::{FileUrlMediaResolver, content_type_for};
use crate::store::{FileDocumentRepository, read_scenario};
use crate::terminal;

pub const USAGE: &str = "\
usage:
  scenario play <file>
  scenario validate <file>
  scenario new <file> [title]
  scenario attach <file> <background|avatar|beat=<beat-id>> <image>";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    Play { path: PathBuf },
    Validate { path: PathBuf },
    New { path: PathBuf, title: String },
    Attach {
        path: PathBuf,
        target: MediaTarget,
        image: PathBuf,
    },
}

fn parse_target(raw: &str) -> Result<MediaTarget, AppError> {
    match raw {
        "background" => Ok(MediaTarget::Background),
        "avatar" => Ok(MediaTarget::Avatar),
        _ => raw
            .strip_prefix("beat=")
            .filter(|id| !id.is_empty())
            .map(|id| MediaTarget::BeatImage(BeatId::from(id)))
            .ok_or_else(|| AppError::Usage(format!("unknown media target `{raw}`"))),
    }
}

impl CliCommand {
    /// Parses the arguments after the program name.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Usage` for an unknown subcommand or missing
    /// arguments.
    pub fn parse<I>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = String>,
    {
        let args: Vec<String> = args.into_iter().collect();
        let missing = |what: &str| AppError::Usage(format!("missing {what}"));
        let path = || args.get(1).map(PathBuf::from).ok_or_else(|| missing("<file>"));

        match args.first().map(String::as_str) {
            Some("play") => Ok(Self::Play { path: path()? }),
            Some("validate") => Ok(Self::Validate { path: path()? }),
            Some("new") => {
                let title = if args.len() > 2 {
                    args[2..].join(" ")
                } else {
                    "Untitled scenario".to_owned()
                };
                Ok(Self::New {
                    path: path()?,
                    title,
                })
            }
            Some("attach") => {
                let path = path()?;
                let target = parse_target(args.get(2).ok_or_else(|| missing("<target>"))?)?;
                let image = args
                    .get(3)
                    .map(PathBuf::from)
                    .ok_or_else(|| missing("<image>"))?;
                Ok(Self::Attach {
                    path,
                    target,
                    image,
                })
            }
            Some(other) => Err(AppError::Usage(format!("unknown command `{other}`"))),
            None => Err(missing("command")),
        }
    }
}

/// Runs a parsed command against the real terminal.
///
/// # Errors
///
/// Returns whatever the subcommand fails with.
pub async fn run(command: CliCommand, config: &AppConfig) -> Result<(), AppError> {
    let mut stdout = std::io::stdout();
    match command {
        CliCommand::Play { path } => play(&path, config).await,
        CliCommand::Validate { path } => validate(&path, &mut stdout).await,
        CliCommand::New { path, title } => scaffold(&path, &title, &mut stdout).await,
        CliCommand::Attach {
            path,
            target,
            image,
        } => attach(&path, target, &image, &mut stdout).await,
    }
}

async fn play(path: &Path, config: &AppConfig) -> Result<(), AppError> {
    let document = read_scenario(path).await?;
    let (tx, rx) = unbounded_channel();
    let shell = PlaybackShell::start(document, config.playback(), Arc::new(SystemClock), tx)
        .map_err(|rejected| AppError::Domain(rejected.error))?;

    let stdin = BufReader::new(tokio::io::stdin());
    terminal::play(shell, rx, stdin, std::io::stdout()).await?;
    Ok(())
}

/// Prints a playability report for the scenario at `path`.
///
/// # Errors
///
/// Returns `AppError::Domain` with the first problem if the scenario cannot
/// be played.
pub async fn validate(path: &Path, out: &mut impl Write) -> Result<(), AppError> {
    let document = read_scenario(path).await?;
    writeln!(out, "{}: {}", path.display(), document.title)?;
    writeln!(
        out,
        "  scenes: {}, beats: {}",
        document.scenes.len(),
        document.total_beats()
    )?;
    writeln!(out, "  playable: {}", if is_playable(&document) { "yes" } else { "no" })?;
    for beat_id in beats_without_responses(&document) {
        writeln!(out, "  beat without responses: {beat_id}")?;
    }
    for jump in validate_jump_targets(&document) {
        writeln!(
            out,
            "  dangling jump: beat {} response {} -> {}",
            jump.beat_id,
            jump.response_id,
            jump.target.as_ref().map_or("<unset>", BeatId::as_str)
        )?;
    }
    check_playable(&document)?;
    writeln!(out, "  ok")?;
    Ok(())
}

/// Writes a starter scenario (one scene, one beat, one response) to `path`.
///
/// # Errors
///
/// Returns `AppError::Usage` if `path` already exists, or the save error.
pub async fn scaffold(path: &Path, title: &str, out: &mut impl Write) -> Result<(), AppError> {
    if tokio::fs::try_exists(path).await? {
        return Err(AppError::Usage(format!(
            "{} already exists; refusing to overwrite",
            path.display()
        )));
    }
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let mut ids = TimestampIdGenerator::new(Arc::clone(&clock));
    let document = Scenario::starter(title, &mut ids);

    let receipt = save(&document, path, clock.as_ref()).await?;
    writeln!(out, "created {} ({})", path.display(), receipt)?;
    Ok(())
}

/// Copies `image` next to the scenario and stores its URL on `target`.
///
/// # Errors
///
/// Returns `AppError::Io` if the image cannot be read and `AppError::Domain`
/// if the target beat does not exist or the save fails.
pub async fn attach(
    path: &Path,
    target: MediaTarget,
    image: &Path,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let mut document = read_scenario(path).await?;
    let bytes = tokio::fs::read(image).await?;
    let file_name = image
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let command = AttachMedia {
        correlation_id: Uuid::new_v4(),
        target,
        file: MediaFile {
            file_name,
            content_type: content_type_for(image).to_owned(),
            bytes,
        },
    };

    let resolver = FileUrlMediaResolver::beside(path);
    let url = handle_attach_media(&mut document, &command, &resolver).await?;
    save(&document, path, &SystemClock).await?;
    writeln!(out, "attached {url}")?;
    Ok(())
}

async fn save(document: &Scenario, path: &Path, clock: &dyn Clock) -> Result<String, AppError> {
    let repo = FileDocumentRepository::new(path);
    let command = SaveScenario {
        correlation_id: Uuid::new_v4(),
        document_id: Uuid::new_v4(),
    };
    let receipt = handle_save_scenario(document, &command, clock, &repo).await?;
    info!(path = %path.display(), version_hash = %receipt.version_hash, "scenario file saved");
    Ok(receipt.version_hash)
}
