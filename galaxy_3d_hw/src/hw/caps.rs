/// Capability registry
///
/// Static facts about the selected adapter and the formats chosen for the
/// presentation surface. Filled in by the device layer during device creation
/// and view building; read-only for the rest of the renderer.

use crate::hw::format::{Format, TextureFormat};
use crate::hw::types::{AdapterInfo, DriverType, FeatureLevel};

/// Capability registry for the current device
#[derive(Debug, Clone, Default)]
pub struct Caps {
    /// PCI vendor id of the adapter
    pub id_vendor: u32,
    /// PCI device id of the adapter
    pub id_device: u32,
    /// Dedicated video memory in bytes
    pub dedicated_video_memory: u64,
    /// Adapter description
    pub adapter_name: String,

    /// Back-buffer format
    pub target_format: TextureFormat,
    /// Depth-stencil format of the base depth buffer
    pub depth_format: TextureFormat,

    /// Negotiated feature level, `None` before device creation
    pub feature_level: Option<FeatureLevel>,
    /// Driver type the device runs on, `None` before device creation
    pub driver_type: Option<DriverType>,
    /// Compute shaders (with raw and structured buffers) are available
    pub compute_shaders_supported: bool,

    /// Create devices on the reference rasterizer
    pub force_reference_device: bool,
}

impl Caps {
    /// Store adapter identification
    pub fn record(&mut self, adapter: &AdapterInfo) {
        self.id_vendor = adapter.vendor_id;
        self.id_device = adapter.device_id;
        self.dedicated_video_memory = adapter.dedicated_video_memory;
        self.adapter_name = adapter.name.clone();
    }

    /// Store the chosen color and depth formats
    pub fn record_formats(&mut self, color: Format, depth: Format) {
        self.record_target_format(color);
        self.depth_format = depth.to_texture_format();
    }

    /// Store the chosen back-buffer format
    pub fn record_target_format(&mut self, color: Format) {
        self.target_format = color.to_texture_format();
    }

    /// Store the outcome of device creation
    pub fn record_device(&mut self, driver_type: DriverType, feature_level: FeatureLevel, compute_shaders: bool) {
        self.driver_type = Some(driver_type);
        self.feature_level = Some(feature_level);
        self.compute_shaders_supported = compute_shaders;
    }

    /// Dedicated video memory in megabytes
    pub fn dedicated_video_memory_mb(&self) -> u64 {
        self.dedicated_video_memory / (1024 * 1024)
    }
}

#[cfg(test)]
#[path = "caps_tests.rs"]
mod tests;
