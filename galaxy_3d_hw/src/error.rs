//! Error types for the Galaxy3D hardware layer
//!
//! This module defines the error types used by device creation, swap chain
//! management, view creation and the native backends.

use std::fmt;

/// Result type for Galaxy3D hardware operations
pub type Result<T> = std::result::Result<T, Error>;

/// Message shown to the user when the graphics hardware cannot be brought up
pub const FATAL_HARDWARE_MESSAGE: &str =
    "Failed to initialize graphics hardware.\nPlease try to restart the game.";

/// Galaxy3D hardware layer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (D3D11, DXGI, etc.)
    BackendError(String),

    /// Initialization failed (driver factory, engine subsystems)
    InitializationFailed(String),

    /// No adapter could be enumerated
    NoAdapter,

    /// Device creation failed on every feature level attempt
    DeviceCreationFailed(String),

    /// The platform layer could not supply a native window handle
    WindowHandleUnavailable(String),

    /// The legacy swap chain path failed (the modern path already fell back)
    SwapChainCreationFailed(String),

    /// Render-target or depth-stencil view creation failed
    ViewCreationFailed(String),

    /// Operation requires a device that has not been created yet
    DeviceNotCreated,
}

impl Error {
    /// Whether this error leaves the engine without anything to render with
    ///
    /// Fatal errors are reported with [`FATAL_HARDWARE_MESSAGE`] and end the process.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::InitializationFailed(_)
                | Error::NoAdapter
                | Error::DeviceCreationFailed(_)
                | Error::SwapChainCreationFailed(_)
                | Error::ViewCreationFailed(_)
        )
    }

    /// Whether this error is an engine assertion (programming/platform contract violation)
    pub fn is_assertion(&self) -> bool {
        matches!(self, Error::WindowHandleUnavailable(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::NoAdapter => write!(f, "No graphics adapter found"),
            Error::DeviceCreationFailed(msg) => write!(f, "Device creation failed: {}", msg),
            Error::WindowHandleUnavailable(msg) => write!(f, "Window handle unavailable: {}", msg),
            Error::SwapChainCreationFailed(msg) => write!(f, "Swap chain creation failed: {}", msg),
            Error::ViewCreationFailed(msg) => write!(f, "View creation failed: {}", msg),
            Error::DeviceNotCreated => write!(f, "Device not created"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
