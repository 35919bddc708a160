/// Galaxy3D Engine - global settings, logger and event hub access
///
/// The device layer reads a handful of engine-wide values (fullscreen request,
/// command line) that other subsystems may change at runtime from the console.
/// They live here in thread-safe static storage, next to the global logger.

use std::cell::RefCell;
use std::rc::Weak;
use std::sync::{OnceLock, RwLock};
use std::time::SystemTime;
use crate::config::command_line_has_flag;
use crate::error::{Error, Result, FATAL_HARDWARE_MESSAGE};
use crate::events::app_events::{self, AppActivationListener, AppEvent, Subscription};
use crate::log::{DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

/// Engine-wide settings
static SETTINGS: OnceLock<RwLock<Settings>> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

/// Engine-wide settings read by the device layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Exclusive fullscreen requested by the user
    pub fullscreen: bool,

    /// Raw command line the engine was started with
    pub command_line: String,
}

fn settings_lock() -> &'static RwLock<Settings> {
    SETTINGS.get_or_init(|| RwLock::new(Settings::default()))
}

fn logger_lock() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger)))
}

// ===== PUBLIC API =====

/// Engine singleton facade
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_hw::galaxy3d::Engine;
///
/// Engine::initialize()?;
/// Engine::set_command_line("-no_dx11_2");
/// Engine::set_fullscreen(true);
/// # Ok::<(), galaxy_3d_hw::galaxy3d::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Initialize the engine globals
    ///
    /// Idempotent. Settings and logger are also created lazily on first use.
    pub fn initialize() -> Result<()> {
        settings_lock();
        logger_lock();
        Ok(())
    }

    /// Restore settings to their defaults
    pub fn shutdown() {
        if let Ok(mut settings) = settings_lock().write() {
            *settings = Settings::default();
        }
    }

    // ===== SETTINGS API =====

    /// Snapshot of the current settings
    pub fn settings() -> Settings {
        settings_lock()
            .read()
            .map(|settings| settings.clone())
            .unwrap_or_default()
    }

    /// Whether exclusive fullscreen is currently requested
    pub fn fullscreen() -> bool {
        settings_lock()
            .read()
            .map(|settings| settings.fullscreen)
            .unwrap_or(false)
    }

    /// Request (or cancel) exclusive fullscreen
    ///
    /// Takes effect on the next device reset.
    pub fn set_fullscreen(fullscreen: bool) {
        if let Ok(mut settings) = settings_lock().write() {
            settings.fullscreen = fullscreen;
        }
    }

    /// Record the command line the engine was started with
    pub fn set_command_line(command_line: impl Into<String>) {
        if let Ok(mut settings) = settings_lock().write() {
            settings.command_line = command_line.into();
        }
    }

    /// Whether the engine command line contains `flag`
    pub fn has_command_line_flag(flag: &str) -> bool {
        settings_lock()
            .read()
            .map(|settings| command_line_has_flag(&settings.command_line, flag))
            .unwrap_or(false)
    }

    // ===== APPLICATION EVENTS API =====

    /// Register a listener for application activate/deactivate notifications
    ///
    /// The returned guard unregisters the listener when dropped.
    pub fn subscribe_app_events(listener: Weak<RefCell<dyn AppActivationListener>>) -> Subscription {
        app_events::subscribe(listener)
    }

    /// Publish an application focus transition (called by the window-event dispatcher)
    ///
    /// Returns the number of listeners notified.
    pub fn dispatch_app_event(event: AppEvent) -> usize {
        Self::log(LogSeverity::Debug, "galaxy3d::Engine", format!("App event: {:?}", event));
        app_events::dispatch(event)
    }

    // ===== FATAL ERRORS =====

    /// Report an unrecoverable error and terminate the process
    ///
    /// Used when the engine cannot render anything at all (no adapter, no device).
    pub fn fatal_exit(error: &Error) -> ! {
        Self::log_detailed(
            LogSeverity::Error,
            "galaxy3d::Engine",
            format!("{}\n{}", FATAL_HARDWARE_MESSAGE, error),
            file!(),
            line!(),
        );
        eprintln!("{}", FATAL_HARDWARE_MESSAGE);
        std::process::exit(1)
    }

    // ===== LOGGING API =====

    /// Set a custom logger
    pub fn set_logger<L: Logger + 'static>(logger: L) {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(logger);
        }
    }

    /// Reset logger to default (DefaultLogger)
    pub fn reset_logger() {
        if let Ok(mut lock) = logger_lock().write() {
            *lock = Box::new(DefaultLogger);
        }
    }

    /// Internal logging method (for simple logs without file:line)
    ///
    /// Used by macros like engine_info!, engine_warn!, etc.
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: None,
                line: None,
            });
        }
    }

    /// Internal logging method with file:line information (for ERROR logs)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        if let Ok(lock) = logger_lock().read() {
            lock.log(&LogEntry {
                severity,
                timestamp: SystemTime::now(),
                source: source.to_string(),
                message,
                file: Some(file),
                line: Some(line),
            });
        }
    }

    /// Reset globals for testing (only available in test builds)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
        Self::reset_logger();
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
