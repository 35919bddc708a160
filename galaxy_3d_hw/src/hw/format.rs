/// Pixel formats and format selection
///
/// `Format` is the driver-level pixel format; `TextureFormat` is the engine's
/// own enumeration exposed to the renderer through the capability registry.

use bitflags::bitflags;
use crate::hw::native::Device;

/// Driver-level pixel format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(non_camel_case_types)]
pub enum Format {
    /// No format / no supported candidate
    Unknown,

    // Color formats
    R8G8B8A8_UNORM,
    R8G8B8A8_UNORM_SRGB,
    B8G8R8A8_UNORM,
    R10G10B10A2_UNORM,
    R16G16B16A16_FLOAT,

    // Depth-stencil formats
    D32_FLOAT_S8X24_UINT,
    D24_UNORM_S8_UINT,
    D32_FLOAT,
    D16_UNORM,
}

/// Engine texture format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    #[default]
    Unknown,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    B8G8R8A8_UNORM,
    A2B10G10R10_UNORM,
    R16G16B16A16_SFLOAT,
    D32_SFLOAT_S8_UINT,
    D24_UNORM_S8_UINT,
    D32_SFLOAT,
    D16_UNORM,
}

bitflags! {
    /// Capabilities a device reports for a format
    ///
    /// Bit values follow the driver's format-support mask so backends can
    /// convert with `from_bits_truncate`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FormatSupport: u32 {
        const TEXTURE2D = 0x20;
        const SHADER_SAMPLE = 0x200;
        const RENDER_TARGET = 0x4000;
        const BLENDABLE = 0x8000;
        const DEPTH_STENCIL = 0x10000;
        /// Usable as a display (back-buffer) format
        const DISPLAY = 0x80000;
        const MULTISAMPLE_RENDERTARGET = 0x200000;
    }
}

/// Back-buffer format preference
///
/// Wider formats were tried and dropped: 16-bit float output is not needed,
/// and screenshots cannot be saved from 10-bit buffers.
pub const BACK_BUFFER_FORMATS: [Format; 1] = [Format::R8G8B8A8_UNORM];

/// Depth-stencil format preference, highest precision first
pub const DEPTH_STENCIL_FORMATS: [Format; 4] = [
    Format::D32_FLOAT_S8X24_UINT,
    Format::D24_UNORM_S8_UINT,
    Format::D32_FLOAT,
    Format::D16_UNORM,
];

impl Format {
    /// Convert to the engine texture format
    pub fn to_texture_format(self) -> TextureFormat {
        match self {
            Format::Unknown => TextureFormat::Unknown,
            Format::R8G8B8A8_UNORM => TextureFormat::R8G8B8A8_UNORM,
            Format::R8G8B8A8_UNORM_SRGB => TextureFormat::R8G8B8A8_SRGB,
            Format::B8G8R8A8_UNORM => TextureFormat::B8G8R8A8_UNORM,
            Format::R10G10B10A2_UNORM => TextureFormat::A2B10G10R10_UNORM,
            Format::R16G16B16A16_FLOAT => TextureFormat::R16G16B16A16_SFLOAT,
            Format::D32_FLOAT_S8X24_UINT => TextureFormat::D32_SFLOAT_S8_UINT,
            Format::D24_UNORM_S8_UINT => TextureFormat::D24_UNORM_S8_UINT,
            Format::D32_FLOAT => TextureFormat::D32_SFLOAT,
            Format::D16_UNORM => TextureFormat::D16_UNORM,
        }
    }

    /// Whether this is a depth (or depth-stencil) format
    pub fn is_depth(self) -> bool {
        matches!(
            self,
            Format::D32_FLOAT_S8X24_UINT | Format::D24_UNORM_S8_UINT | Format::D32_FLOAT | Format::D16_UNORM
        )
    }

    /// Whether this format carries a stencil component
    pub fn has_stencil(self) -> bool {
        matches!(self, Format::D32_FLOAT_S8X24_UINT | Format::D24_UNORM_S8_UINT)
    }
}

/// Whether `device` supports `format` with every capability in `required`
///
/// A failed query counts as unsupported.
pub fn check_format_support(device: &dyn Device, format: Format, required: FormatSupport) -> bool {
    device
        .check_format_support(format)
        .map(|supported| supported.contains(required))
        .unwrap_or(false)
}

/// First format of `candidates` supporting `required`, or `Format::Unknown`
///
/// Candidates are tried in the caller's priority order against the given
/// device instance; results are never cached.
pub fn select_format(device: &dyn Device, required: FormatSupport, candidates: &[Format]) -> Format {
    candidates
        .iter()
        .copied()
        .find(|&format| check_format_support(device, format, required))
        .unwrap_or(Format::Unknown)
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
