/// Native driver seam
///
/// The device layer talks to the graphics driver only through these traits.
/// One backend crate implements them (Direct3D 11 on Windows); tests use the
/// in-crate mock. Every object is owned through a `Box`: dropping the box
/// releases the native handle, so release order is controlled by the owner.
///
/// Objects created by one backend are only ever handed back to that same
/// backend, which recovers its concrete types through `as_any`.

use std::any::Any;
use crate::error::Result;
use crate::hw::format::{Format, FormatSupport};
use crate::hw::types::{
    AdapterInfo, DepthStencilViewDesc, DeviceCreateFlags, DriverType, FeatureLevel,
    FullscreenDesc, ModeDesc, NativeWindow, SurfaceDescriptor, SwapChainDesc1,
    SwapChainFlags, Texture2DDesc,
};

/// Backend entry point, selected when the engine is built
pub trait GraphicsApi {
    /// Backend name for diagnostics ("d3d11", "mock", ...)
    fn name(&self) -> &'static str;

    /// Create the driver factory object
    fn create_factory(&self) -> Result<Box<dyn Factory>>;
}

/// Driver factory: adapter enumeration and legacy swap chain creation
pub trait Factory {
    /// Enumerate the adapter at `index`, `Ok(None)` if there is none
    fn enum_adapter(&self, index: u32) -> Result<Option<Box<dyn Adapter>>>;

    /// Create a swap chain from a full surface description (legacy path)
    fn create_swap_chain(
        &self,
        device: &dyn Device,
        desc: &SurfaceDescriptor,
    ) -> Result<Box<dyn SwapChain>>;
}

/// Extended factory exposing the per-window-handle swap chain path
pub trait ExtendedFactory {
    /// Create a swap chain bound to `window`
    ///
    /// `fullscreen` is `None` for a windowed swap chain.
    fn create_swap_chain_for_window(
        &self,
        device: &dyn Device,
        window: NativeWindow,
        desc: &SwapChainDesc1,
        fullscreen: Option<&FullscreenDesc>,
    ) -> Result<Box<dyn SwapChain>>;
}

/// Logical device and immediate context returned by [`Adapter::create_device`]
pub struct CreatedDevice {
    pub device: Box<dyn Device>,
    pub context: Box<dyn DeviceContext>,
    pub feature_level: FeatureLevel,
}

/// Physical or virtual GPU
pub trait Adapter {
    /// Vendor/device ids, memory and description
    fn info(&self) -> Result<AdapterInfo>;

    /// Extended factory owning this adapter, `None` when the platform lacks it
    fn extended_factory(&self) -> Option<Box<dyn ExtendedFactory>>;

    /// Create a logical device, negotiating the first supported level of `feature_levels`
    fn create_device(
        &self,
        driver_type: DriverType,
        flags: DeviceCreateFlags,
        feature_levels: &[FeatureLevel],
    ) -> Result<CreatedDevice>;
}

/// Logical GPU device
pub trait Device {
    fn as_any(&self) -> &dyn Any;

    /// Capabilities of `format` on this device
    fn check_format_support(&self, format: Format) -> Result<FormatSupport>;

    /// Legacy capability probe: compute shaders with raw/structured buffers on 4.x hardware
    fn legacy_compute_shader_support(&self) -> bool;

    /// Create a render-target view over the whole of `resource`
    fn create_render_target_view(&self, resource: &dyn Texture2D) -> Result<Box<dyn RenderTargetView>>;

    /// Create a 2D texture without initial data
    fn create_texture_2d(&self, desc: &Texture2DDesc) -> Result<Box<dyn Texture2D>>;

    /// Create a depth-stencil view over `resource`
    fn create_depth_stencil_view(
        &self,
        resource: &dyn Texture2D,
        desc: &DepthStencilViewDesc,
    ) -> Result<Box<dyn DepthStencilView>>;
}

/// Immediate command context
pub trait DeviceContext {
    fn as_any(&self) -> &dyn Any;
}

/// Presentation surface
pub trait SwapChain {
    fn as_any(&self) -> &dyn Any;

    /// Current surface description as reported by the driver
    fn desc(&self) -> Result<SurfaceDescriptor>;

    /// Enter or leave exclusive fullscreen
    fn set_fullscreen_state(&self, fullscreen: bool) -> Result<()>;

    /// Resize the output target (window or display mode)
    fn resize_target(&self, mode: &ModeDesc) -> Result<()>;

    /// Reallocate the back buffers. No view may reference them during the call.
    fn resize_buffers(
        &self,
        buffer_count: u32,
        width: u32,
        height: u32,
        format: Format,
        flags: SwapChainFlags,
    ) -> Result<()>;

    /// Back buffer at `index`
    fn buffer(&self, index: u32) -> Result<Box<dyn Texture2D>>;

    /// Frame-latency waitable object, when the swap chain exposes one
    fn frame_latency_waiter(&self) -> Option<Box<dyn FrameLatencyWaiter>>;
}

/// 2D texture resource
pub trait Texture2D {
    fn as_any(&self) -> &dyn Any;

    fn desc(&self) -> Texture2DDesc;
}

/// Render-target binding
pub trait RenderTargetView {
    fn as_any(&self) -> &dyn Any;
}

/// Depth-stencil binding
pub trait DepthStencilView {
    fn as_any(&self) -> &dyn Any;

    fn desc(&self) -> DepthStencilViewDesc;
}

/// Frame pacing handle signalled when the swap chain can accept a new frame
pub trait FrameLatencyWaiter {
    /// Block until signalled or `timeout_ms` elapses; true if signalled
    fn wait(&self, timeout_ms: u32) -> bool;
}
