/// Device layer configuration
///
/// `Config` is fixed for the lifetime of one `Hw` instance. Engine-wide values
/// that can change at runtime (fullscreen, command line) live in
/// [`Settings`](crate::engine::Settings) instead.

/// Command-line flag disabling the per-window-handle swap chain path
pub const NO_MODERN_SWAP_CHAIN_FLAG: &str = "-no_dx11_2";

/// Command-line flag forcing the reference (software) driver
pub const FORCE_REFERENCE_DEVICE_FLAG: &str = "-gpu_ref";

/// Command-line flag requesting the driver debug layer
pub const DEBUG_LAYER_FLAG: &str = "-dxdebug";

/// Command-line flag enabling the experimental flip presentation model
pub const FLIP_MODEL_FLAG: &str = "-flip_model";

/// Device layer configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Create the device on the reference rasterizer instead of the hardware adapter
    pub force_reference_device: bool,

    /// Request the driver debug layer at device creation
    pub enable_debug_layer: bool,

    /// Use flip-discard presentation on the modern swap chain path.
    ///
    /// Experimental: tearing glitches were observed in windowed mode with
    /// vsync enabled. Discard presentation is the validated default.
    pub experimental_flip_model: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            force_reference_device: false,
            enable_debug_layer: cfg!(debug_assertions),
            experimental_flip_model: false,
        }
    }
}

impl Config {
    /// Build a configuration from the engine command line
    ///
    /// Unknown arguments are ignored; flags are matched as whole words.
    pub fn from_command_line(command_line: &str) -> Self {
        let has = |flag: &str| command_line_has_flag(command_line, flag);
        Self {
            force_reference_device: has(FORCE_REFERENCE_DEVICE_FLAG),
            enable_debug_layer: cfg!(debug_assertions) || has(DEBUG_LAYER_FLAG),
            experimental_flip_model: has(FLIP_MODEL_FLAG),
        }
    }
}

/// Whether `flag` appears as a whole argument in `command_line`
pub fn command_line_has_flag(command_line: &str, flag: &str) -> bool {
    command_line.split_whitespace().any(|arg| arg.eq_ignore_ascii_case(flag))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
