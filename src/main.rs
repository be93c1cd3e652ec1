use anyhow::{Context, Result};
use clap::Parser;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use pinscribe_annotate::PinyinLookup;
use pinscribe_core::{AppConfig, EngineSignal, TranscriptState, UiCommand};
use pinscribe_engine::{EngineRegistry, SessionController};
use pinscribe_transcript::TranscriptAggregator;

/// Most recent warnings kept in the UI status line.
const MAX_WARNINGS: usize = 5;

#[derive(Parser)]
#[command(name = "pinscribe", about = "Live transcription with pinyin annotation")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {:?}", path))?,
        None => AppConfig::default(),
    };

    // Set up TUI log buffer and layered tracing subscriber
    let log_buffer = Arc::new(Mutex::new(VecDeque::<String>::new()));
    let tui_log_layer =
        pinscribe_tui::TuiLogLayer::new(Arc::clone(&log_buffer), config.general.log_buffer_lines);

    let env_filter =
        EnvFilter::try_new(&config.general.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::Registry::default()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(tui_log_layer);

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    tracing::info!("pinscribe starting");

    let engine_name = config.recognition.engine.clone();
    let language = config.recognition.language.clone();
    let grace = Duration::from_millis(config.recognition.restart_grace_ms);

    let (signal_tx, mut signal_rx) = tokio::sync::mpsc::unbounded_channel::<EngineSignal>();

    // An unavailable engine is surfaced, not fatal: the UI still runs and
    // reports the condition on every start attempt.
    let registry = EngineRegistry::new();
    let mut controller = match registry.create(&engine_name) {
        Ok(mut engine) => {
            tracing::info!("recognition engine '{}' ready", engine_name);
            engine.set_signal_sender(signal_tx.clone());
            Some(SessionController::new(engine, language.clone(), grace))
        }
        Err(error) => {
            tracing::error!("{error}");
            None
        }
    };

    // Set up TUI communication channels
    let (state_tx, state_rx) = tokio::sync::watch::channel(TranscriptState {
        language: language.clone(),
        ..Default::default()
    });
    let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<UiCommand>();

    // Spawn the event loop: engine signals and UI commands feed one
    // aggregator, serialized, with a state broadcast after every mutation.
    tokio::spawn(async move {
        let lookup = PinyinLookup::new();
        let mut aggregator = TranscriptAggregator::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut fallback_language = language;

        loop {
            tokio::select! {
                signal = signal_rx.recv() => match signal {
                    Some(EngineSignal::Started) => {
                        if let Some(controller) = controller.as_mut() {
                            controller.on_session_started();
                        }
                        tracing::info!("recognition session started");
                    }
                    Some(EngineSignal::Event(event)) => {
                        aggregator.apply(&event, &lookup);
                    }
                    Some(EngineSignal::Ended) => {
                        if let Some(controller) = controller.as_mut() {
                            controller.on_session_ended();
                        }
                        aggregator.discard_current();
                        tracing::info!("recognition session ended");
                    }
                    Some(EngineSignal::Error { reason }) => {
                        if let Some(controller) = controller.as_mut() {
                            controller.on_session_error(&reason);
                        }
                        aggregator.discard_current();
                        push_warning(&mut warnings, format!("engine error: {reason}"));
                    }
                    None => break,
                },
                cmd = cmd_rx.recv() => match cmd {
                    Some(UiCommand::ToggleRecording) => match controller.as_mut() {
                        Some(controller) => {
                            let result = if controller.is_running() {
                                controller.stop().await
                            } else {
                                warnings.clear();
                                controller.start().await
                            };
                            if let Err(error) = result {
                                tracing::warn!("{error}");
                                push_warning(&mut warnings, error.to_string());
                            }
                        }
                        None => {
                            push_warning(
                                &mut warnings,
                                format!("recognition engine '{engine_name}' unavailable"),
                            );
                        }
                    },
                    Some(UiCommand::Reset) => {
                        aggregator.reset();
                        tracing::info!("transcript cleared");
                    }
                    Some(UiCommand::SwitchLanguage(locale)) => {
                        tracing::info!(locale = %locale, "switching language");
                        fallback_language = locale.clone();
                        if let Some(controller) = controller.as_mut() {
                            if let Err(error) = controller.switch_language(locale).await {
                                tracing::warn!("{error}");
                                push_warning(&mut warnings, error.to_string());
                            }
                        }
                    }
                    Some(UiCommand::Quit) | None => break,
                },
            }

            let mut state = aggregator.snapshot();
            state.is_recording = controller
                .as_ref()
                .map(|c| c.is_running())
                .unwrap_or(false);
            state.language = controller
                .as_ref()
                .map(|c| c.locale().to_string())
                .unwrap_or_else(|| fallback_language.clone());
            state.warnings = warnings.clone();
            if state_tx.send(state).is_err() {
                break; // TUI closed
            }
        }

        if let Some(controller) = controller.as_mut() {
            let _ = controller.stop().await;
        }
    });

    tracing::info!("TUI active — press 'q' to quit");

    // Run TUI (blocks until user quits)
    let theme = pinscribe_tui::Theme::from_name(&config.display.theme);
    pinscribe_tui::run(state_rx, cmd_tx, log_buffer, config.display.max_entries, theme)
        .await
        .context("TUI error")?;

    tracing::info!("shutting down");

    Ok(())
}

fn push_warning(warnings: &mut Vec<String>, warning: String) {
    tracing::warn!("{warning}");
    if warnings.len() >= MAX_WARNINGS {
        warnings.remove(0);
    }
    warnings.push(warning);
}
