//! Dedicated OS-thread keyboard listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`KeyboardListener`] owns that thread and a stop flag; dropping it sets
//! the flag so the callback silently ignores further events.
//!
//! Every key press is routed to the [`AutoCorrect`] controller: the toggle
//! hotkey flips the mode, everything else goes through
//! [`KeyInput::from_rdev`].  The listener only observes; key events always
//! reach the focused application unmodified.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself will remain
//! blocked in the rdev event loop until the process exits.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::autocorrect::{AutoCorrect, KeyInput};

// ---------------------------------------------------------------------------
// KeyboardListener
// ---------------------------------------------------------------------------

/// Handle to a running keyboard listener thread.
///
/// Construct one with [`KeyboardListener::start`].  Drop it to stop
/// forwarding events.
pub struct KeyboardListener {
    stop: Arc<AtomicBool>,
    /// Never joined: `rdev::listen` does not return.
    _thread: std::thread::JoinHandle<()>,
}

impl KeyboardListener {
    /// Spawn the listener thread.
    ///
    /// * `controller` — receives every key press.
    /// * `toggle_key` — switches auto-correct mode instead of being captured.
    ///   Use [`crate::hotkey::parse_key`] to obtain it from a config string.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the OS refuses to create the thread.
    pub fn start(controller: AutoCorrect, toggle_key: rdev::Key) -> std::io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("keyboard-listener".into())
            .spawn(move || {
                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }
                    route_event(&controller, toggle_key, &event);
                });

                if let Err(e) = result {
                    log::error!("keyboard-listener: rdev::listen exited with error: {:?}", e);
                }
            })?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for KeyboardListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

/// Forward one raw event.  Releases, mouse and wheel events are ignored.
pub(crate) fn route_event(controller: &AutoCorrect, toggle_key: rdev::Key, event: &rdev::Event) {
    let rdev::EventType::KeyPress(key) = event.event_type else {
        return;
    };

    if key == toggle_key {
        controller.toggle();
        return;
    }

    controller.on_key(KeyInput::from_rdev(key, event.name.as_deref()));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
