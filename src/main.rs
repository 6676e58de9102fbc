//! Application entry point — swiftread.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Parse command-line flags (validated here, before the engine sees them).
//! 3. Load [`AppConfig`] from disk (returns default on first run).
//! 4. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 5. Load the text through a [`PlainTextSource`] and tokenize it.
//! 6. Spawn the playback runner and the stdin command forwarder.
//! 7. Print playback events until the document is finished or the user
//!    quits.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use swiftread::{
    config::AppConfig,
    document::Document,
    pace::{format_hms, PaceController},
    playback::{PlaybackCommand, PlaybackEvent, PlaybackRunner, PlaybackSession},
    progress::{ProgressStore, SavedProgress},
    source::{PlainTextSource, TextSource},
};

const USAGE: &str = "\
Usage: swiftread [OPTIONS] <FILE>

Plays the text of FILE back one chunk of words at a time.

Options:
  --wpm <N>        reading speed in words per minute (default 200)
  --chunk <N>      words shown per step (default 1)
  --from-line <N>  start from the given 1-based line
  --resume         continue from the last saved position
  -h, --help       print this help

Commands while reading (one per line on stdin):
  start | r        begin or resume playback
  pause | p        halt playback, keeping the position
  speed <N>        change the reading speed
  chunk <N>        change the words shown per step
  line <N>         jump to the start of a line
  quit | q         save the position and exit
";

// ---------------------------------------------------------------------------
// Command-line arguments
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct CliArgs {
    file: PathBuf,
    wpm: Option<f64>,
    chunk: Option<usize>,
    from_line: Option<usize>,
    resume: bool,
}

impl CliArgs {
    /// Parse flags, rejecting invalid pace values before they can reach the
    /// engine.
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut file = None;
        let mut wpm = None;
        let mut chunk = None;
        let mut from_line = None;
        let mut resume = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--wpm" => {
                    let value = args.next().context("--wpm needs a value")?;
                    wpm = Some(
                        value
                            .parse::<f64>()
                            .ok()
                            .filter(|v| v.is_finite() && *v > 0.0)
                            .with_context(|| {
                                format!("--wpm needs a positive number, got {value:?}")
                            })?,
                    );
                }
                "--chunk" => {
                    let value = args.next().context("--chunk needs a value")?;
                    chunk = Some(
                        value
                            .parse::<usize>()
                            .ok()
                            .filter(|v| *v > 0)
                            .with_context(|| {
                                format!("--chunk needs a positive integer, got {value:?}")
                            })?,
                    );
                }
                "--from-line" => {
                    let value = args.next().context("--from-line needs a value")?;
                    from_line = Some(value.parse::<usize>().with_context(|| {
                        format!("--from-line needs a line number, got {value:?}")
                    })?);
                }
                "--resume" => resume = true,
                other if other.starts_with('-') => bail!("unknown option: {other}"),
                other => {
                    if file.is_some() {
                        bail!("unexpected extra argument: {other}");
                    }
                    file = Some(PathBuf::from(other));
                }
            }
        }

        Ok(Self {
            file: file.context("missing input file")?,
            wpm,
            chunk,
            from_line,
            resume,
        })
    }
}

// ---------------------------------------------------------------------------
// Interactive commands
// ---------------------------------------------------------------------------

enum Input {
    Playback(PlaybackCommand),
    Quit,
}

/// Parse one stdin line. `None` means the line was not a recognised command;
/// the prior playback settings stay untouched, matching how the boundary
/// rejects unparsable entry before it reaches the engine.
fn parse_command(line: &str) -> Option<Input> {
    let mut parts = line.split_whitespace();
    let verb = parts.next()?;
    let arg = parts.next();
    if parts.next().is_some() {
        return None;
    }
    let input = match (verb, arg) {
        ("start" | "resume" | "r", None) => Input::Playback(PlaybackCommand::Start),
        ("pause" | "p", None) => Input::Playback(PlaybackCommand::Pause),
        ("speed", Some(value)) => {
            Input::Playback(PlaybackCommand::SetSpeed(value.parse().ok()?))
        }
        ("chunk", Some(value)) => {
            Input::Playback(PlaybackCommand::SetChunkSize(value.parse().ok()?))
        }
        ("line", Some(value)) => {
            Input::Playback(PlaybackCommand::SeekToLine(value.parse().ok()?))
        }
        ("quit" | "q", None) => Input::Quit,
        _ => return None,
    };
    Some(input)
}

/// Forward stdin commands to the playback runner until the user quits or
/// stdin closes. Dropping the sender on exit lets the runner wind down.
async fn forward_stdin(commands: mpsc::Sender<PlaybackCommand>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match parse_command(trimmed) {
            Some(Input::Playback(command)) => {
                if commands.send(command).await.is_err() {
                    break;
                }
            }
            Some(Input::Quit) => {
                // Pause first so the position is reported and saved.
                let _ = commands.send(PlaybackCommand::Pause).await;
                break;
            }
            None => eprintln!("unrecognised command: {trimmed}"),
        }
    }
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // 2. Command-line flags
    let raw: Vec<String> = std::env::args().skip(1).collect();
    if raw.iter().any(|a| a == "-h" || a == "--help") {
        print!("{USAGE}");
        return Ok(());
    }
    let args = match CliArgs::parse(raw.into_iter()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    // 3. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("failed to load settings ({e}); using defaults");
        AppConfig::default()
    });

    // 4. Tokio runtime (2 worker threads — runner + stdin forwarder)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    let result = rt.block_on(run(args, config));
    // The stdin forwarder may still be mid-read on the blocking pool; do not
    // wait for it.
    rt.shutdown_background();
    result
}

async fn run(args: CliArgs, config: AppConfig) -> Result<()> {
    // 5. Text loading happens entirely at this boundary; the engine is only
    //    ever handed already-validated text.
    let source = PlainTextSource::new(&args.file);
    let text = source.load()?;
    let document = Document::tokenize(&text);
    log::info!(
        "loaded {} words across {} lines from {}",
        document.word_count(),
        document.line_count(),
        args.file.display()
    );

    let store = ProgressStore::new();
    let saved = if args.resume {
        match store.load() {
            Ok(Some(saved)) => Some(saved),
            Ok(None) => {
                log::info!("no saved progress to resume; starting from the top");
                None
            }
            Err(e) => {
                log::warn!("could not read saved progress ({e}); starting from the top");
                None
            }
        }
    } else {
        None
    };

    // Pace precedence: flag, then saved progress, then settings file.
    let mut speed_wpm = args
        .wpm
        .or(saved.as_ref().map(|s| s.speed_wpm))
        .unwrap_or(config.pace.speed_wpm);
    let mut chunk_size = args
        .chunk
        .or(saved.as_ref().map(|s| s.chunk_size))
        .unwrap_or(config.pace.chunk_size);
    let pace = PaceController::new(speed_wpm, chunk_size).unwrap_or_else(|e| {
        log::warn!("invalid pace in settings ({e}); using defaults");
        let pace = PaceController::default();
        speed_wpm = pace.speed_wpm();
        chunk_size = pace.chunk_size();
        pace
    });

    // 6. Playback runner + stdin forwarder
    let session = PlaybackSession::new(document, pace);
    let (command_tx, command_rx) = mpsc::channel::<PlaybackCommand>(16);
    let (event_tx, mut event_rx) = mpsc::channel::<PlaybackEvent>(32);
    tokio::spawn(PlaybackRunner::new(session, event_tx).run(command_rx));

    if let Some(saved) = &saved {
        command_tx
            .send(PlaybackCommand::SeekToWord(saved.word_offset))
            .await
            .context("playback runner stopped")?;
    } else if let Some(line) = args.from_line {
        command_tx
            .send(PlaybackCommand::SeekToLine(line))
            .await
            .context("playback runner stopped")?;
    }
    command_tx
        .send(PlaybackCommand::Start)
        .await
        .context("playback runner stopped")?;

    tokio::spawn(forward_stdin(command_tx));

    // 7. Event loop
    while let Some(event) = event_rx.recv().await {
        match event {
            PlaybackEvent::Started => {
                println!("{:-^60}", " reading ");
            }
            PlaybackEvent::Chunk { text, progress } => {
                println!("{text:^60}");
                let mut status = Vec::new();
                if config.reader.show_progress {
                    status.push(format!("{:.0}%", progress.percent));
                }
                if config.reader.show_remaining_time {
                    let remaining = progress
                        .remaining_secs
                        .map(format_hms)
                        .unwrap_or_else(|| "N/A".into());
                    status.push(format!("remaining {remaining}"));
                }
                if !status.is_empty() {
                    println!("{:^60}", status.join("   "));
                }
            }
            PlaybackEvent::Paused { word_offset } => {
                println!("{:-^60}", format!(" paused at word {word_offset} "));
                if config.reader.save_progress {
                    let progress = SavedProgress {
                        word_offset,
                        speed_wpm,
                        chunk_size,
                    };
                    if let Err(e) = store.save(&progress) {
                        log::warn!("could not save progress: {e}");
                    }
                }
            }
            PlaybackEvent::EstimateChanged {
                speed_wpm: new_speed,
                chunk_size: new_chunk,
                total_secs,
                progress,
            } => {
                speed_wpm = new_speed;
                chunk_size = new_chunk;
                let total = total_secs.map(format_hms).unwrap_or_else(|| "N/A".into());
                let remaining = progress
                    .remaining_secs
                    .map(format_hms)
                    .unwrap_or_else(|| "N/A".into());
                println!(
                    "{:^60}",
                    format!(
                        "{new_speed:.0} wpm, {new_chunk}/step — total {total}, remaining {remaining}"
                    )
                );
            }
            PlaybackEvent::Finished => {
                println!("{:^60}", "End of document");
                if config.reader.save_progress {
                    if let Err(e) = store.clear() {
                        log::warn!("could not clear saved progress: {e}");
                    }
                }
                break;
            }
            PlaybackEvent::Error { message } => {
                eprintln!("error: {message}");
            }
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
