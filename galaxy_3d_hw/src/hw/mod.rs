/// Graphics hardware layer: device, swap chain and views

pub mod types;
pub mod format;
pub mod caps;
pub mod native;
pub mod window;
pub mod device_factory;
pub mod swap_chain;
pub mod views;
pub mod activation;
mod hw;

#[cfg(test)]
pub mod mock_native;

pub use caps::Caps;
pub use device_factory::{DeviceHandle, DriverObjects};
pub use format::{
    check_format_support, select_format, Format, FormatSupport, TextureFormat,
    BACK_BUFFER_FORMATS, DEPTH_STENCIL_FORMATS,
};
pub use hw::Hw;
pub use native::{
    Adapter, CreatedDevice, DepthStencilView, Device, DeviceContext, ExtendedFactory, Factory,
    FrameLatencyWaiter, GraphicsApi, RenderTargetView, SwapChain, Texture2D,
};
pub use swap_chain::{SurfaceRequest, SwapChainManager, SwapChainStrategy};
pub use types::*;
pub use views::{ViewBuilder, ViewPair, ViewPairInfo};
pub use window::{native_window, SurfaceWindow};
