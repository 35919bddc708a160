/// Descriptor types shared by the device layer and the native backends
///
/// These mirror the driver-level structures closely enough that a backend can
/// translate them field by field.

use bitflags::bitflags;
use crate::hw::format::Format;

// ===== DEVICE =====

/// Named tier of guaranteed GPU capability
///
/// Ordered: a higher level guarantees everything a lower one does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FeatureLevel {
    Level10_0,
    Level10_1,
    Level11_0,
    Level11_1,
}

impl FeatureLevel {
    /// First level guaranteeing compute shaders
    pub const COMPUTE_SHADER_THRESHOLD: FeatureLevel = FeatureLevel::Level11_0;

    /// Candidate levels for device creation, highest first
    pub const CANDIDATES: [FeatureLevel; 4] = [
        FeatureLevel::Level11_1,
        FeatureLevel::Level11_0,
        FeatureLevel::Level10_1,
        FeatureLevel::Level10_0,
    ];

    /// Human-readable version ("11_1", "10_0", ...)
    pub fn name(&self) -> &'static str {
        match self {
            FeatureLevel::Level10_0 => "10_0",
            FeatureLevel::Level10_1 => "10_1",
            FeatureLevel::Level11_0 => "11_0",
            FeatureLevel::Level11_1 => "11_1",
        }
    }
}

/// Which driver implementation backs the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverType {
    /// The enumerated hardware adapter
    Hardware,
    /// Software reference rasterizer
    Reference,
}

bitflags! {
    /// Device creation flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DeviceCreateFlags: u32 {
        /// Request the driver debug layer
        const DEBUG = 0x2;
    }
}

/// Static description of a GPU adapter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdapterInfo {
    /// PCI vendor id
    pub vendor_id: u32,
    /// PCI device id
    pub device_id: u32,
    /// Dedicated video memory in bytes
    pub dedicated_video_memory: u64,
    /// Adapter description reported by the driver
    pub name: String,
}

/// Platform-native window identifier (HWND on Windows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NativeWindow(pub isize);

// ===== SURFACE =====

/// Multisample settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleDesc {
    pub count: u32,
    pub quality: u32,
}

impl Default for SampleDesc {
    fn default() -> Self {
        Self { count: 1, quality: 0 }
    }
}

/// How presented buffers are handed to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapEffect {
    /// Contents discarded after present (validated default)
    Discard,
    /// Contents preserved, bit-block transfer model
    Sequential,
    /// Flip model, contents preserved
    FlipSequential,
    /// Flip model, contents discarded
    FlipDiscard,
}

impl SwapEffect {
    /// Whether buffers are shared with the compositor (flip presentation model)
    pub fn is_flip(&self) -> bool {
        matches!(self, SwapEffect::FlipSequential | SwapEffect::FlipDiscard)
    }
}

/// Back-buffer scaling when the buffer size differs from the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scaling {
    Stretch,
    None,
    AspectRatioStretch,
}

bitflags! {
    /// Swap chain behavior flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SwapChainFlags: u32 {
        /// Allow display mode switches when going fullscreen
        const ALLOW_MODE_SWITCH = 0x2;
        /// Expose a frame-latency waitable object (flip model only)
        const FRAME_LATENCY_WAITABLE_OBJECT = 0x40;
    }
}

/// Display mode targeted by the swap chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDesc {
    pub width: u32,
    pub height: u32,
    pub format: Format,
}

/// Full description of the presentation surface
///
/// Width, height and the windowed flag change on reset; the other fields are
/// fixed when the swap chain is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub buffer_count: u32,
    pub windowed: bool,
    pub sample: SampleDesc,
    pub swap_effect: SwapEffect,
    pub output_window: NativeWindow,
    pub flags: SwapChainFlags,
}

impl SurfaceDescriptor {
    /// Display mode matching this surface
    pub fn mode(&self) -> ModeDesc {
        ModeDesc {
            width: self.width,
            height: self.height,
            format: self.format,
        }
    }
}

/// Surface description for the per-window-handle creation path
///
/// The output window and windowed flag are passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapChainDesc1 {
    pub width: u32,
    pub height: u32,
    pub format: Format,
    pub buffer_count: u32,
    pub sample: SampleDesc,
    pub swap_effect: SwapEffect,
    pub scaling: Scaling,
    pub flags: SwapChainFlags,
}

/// Fullscreen sub-descriptor for the per-window-handle creation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullscreenDesc {
    pub windowed: bool,
}

// ===== TEXTURES AND VIEWS =====

bitflags! {
    /// Pipeline stages a texture can be bound to
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BindFlags: u32 {
        const SHADER_RESOURCE = 0x8;
        const RENDER_TARGET = 0x20;
        const DEPTH_STENCIL = 0x40;
    }
}

/// Expected CPU/GPU access pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Default,
    Immutable,
    Dynamic,
    Staging,
}

/// Description of a 2D texture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2DDesc {
    pub width: u32,
    pub height: u32,
    pub mip_levels: u32,
    pub array_size: u32,
    pub format: Format,
    pub sample: SampleDesc,
    pub usage: Usage,
    pub bind_flags: BindFlags,
}

/// Resource dimension seen through a depth-stencil view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DsvDimension {
    Texture2D,
    Texture2DMs,
}

impl DsvDimension {
    /// Dimension matching a sample count
    pub fn for_sample_count(count: u32) -> Self {
        if count > 1 {
            DsvDimension::Texture2DMs
        } else {
            DsvDimension::Texture2D
        }
    }
}

/// Description of a depth-stencil view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthStencilViewDesc {
    pub format: Format,
    pub dimension: DsvDimension,
    pub mip_slice: u32,
}
