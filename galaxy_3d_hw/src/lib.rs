/*!
# Galaxy 3D Hardware Layer

GPU device and presentation surface lifecycle for the Galaxy 3D engine.

This crate owns the platform-agnostic part of the device layer: adapter
enumeration, device creation with feature-level negotiation, swap chain
creation and reset, render-target/depth-stencil views, and the reaction to
application focus changes. The native driver is reached through the traits in
[`galaxy3d::hw::native`]; a backend crate (Direct3D 11) implements them.

## Architecture

- **Hw**: orchestrator owning every native object, released in reverse order
- **DriverObjects / DeviceHandle**: driver factory, adapter, device, context
- **SwapChainManager**: per-window and legacy creation paths, reset
- **ViewBuilder**: render-target and depth-stencil views
- **Caps**: adapter and format capability registry
- **Engine**: global settings, logger and application event hub
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod events;
pub mod hw;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, Result, FATAL_HARDWARE_MESSAGE};

    // Engine singleton
    pub use crate::engine::{Engine, Settings};

    // Device layer configuration
    pub use crate::config::Config;

    // Logging sub-module (types only, macros are exported at the crate root)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Application events sub-module
    pub mod events {
        pub use crate::events::*;
    }

    // Hardware sub-module with the device layer types
    pub mod hw {
        pub use crate::hw::*;
    }
}

// Re-export window crates so backends and applications agree on versions
pub use raw_window_handle;
pub use winit;
