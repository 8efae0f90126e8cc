//! Application entry point — live-proofread.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the proofreader ([`ApiProofreader`]) and the injection sink.
//! 5. Start the auto-correct controller and its correction worker.
//! 6. Spawn the keyboard listener thread.
//! 7. Block on the event stream until Ctrl+C.

use std::sync::Arc;

use live_proofread::{
    autocorrect::{start, AutocorrectEvent, AutocorrectOptions},
    config::{new_shared_config, AppConfig},
    hotkey::{parse_key, KeyboardListener},
    inject::sink_from_config,
    llm::{ApiProofreader, Proofreader},
};

fn log_event(event: &AutocorrectEvent) {
    match event {
        AutocorrectEvent::Toggled { enabled } => {
            log::info!("status: auto-correct {}", if *enabled { "enabled" } else { "disabled" });
        }
        AutocorrectEvent::Flushed { text } => {
            log::debug!("status: proofreading {} chars", text.chars().count());
        }
        AutocorrectEvent::Corrected {
            original,
            corrected,
        } => {
            log::info!("status: corrected {original:?} -> {corrected:?}");
        }
        AutocorrectEvent::Skipped { reason, .. } => {
            log::debug!("status: left as typed ({})", reason.label());
        }
        AutocorrectEvent::Discarded { .. } => {
            log::debug!("status: correction dropped after mode change");
        }
        AutocorrectEvent::Failed { message, .. } => {
            log::warn!("status: correction failed: {message}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("live-proofread starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e:#}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (timers + proofreading; emission uses the blocking pool)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    // 4. Collaborators
    let proofreader: Arc<dyn Proofreader> = Arc::new(ApiProofreader::from_config(&config.llm));
    let sink = sink_from_config(&config.inject);
    let options = AutocorrectOptions::from_config(&config);

    let toggle_key = parse_key(&config.hotkey.toggle_key).unwrap_or_else(|| {
        log::warn!(
            "Unknown toggle key {:?}; falling back to F8",
            config.hotkey.toggle_key
        );
        rdev::Key::F8
    });
    let start_enabled = config.autocorrect.start_enabled;

    // 5. Controller + correction worker
    let shared = new_shared_config(config);
    let (autocorrect, mut events) = start(&options, shared, proofreader, sink, rt.handle());
    if start_enabled {
        autocorrect.set_enabled(true);
    }

    // 6. Keyboard listener thread
    let _listener = KeyboardListener::start(autocorrect.clone(), toggle_key)?;
    log::info!("Press {toggle_key:?} to toggle auto-correct mode");

    // 7. Event loop
    rt.block_on(async move {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => log_event(&event),
                    None => break,
                },
                _ = tokio::signal::ctrl_c() => {
                    log::info!("Ctrl+C received, shutting down");
                    break;
                }
            }
        }
    });

    Ok(())
}
