/// DXGI swap chain and frame-latency waitable object

use std::any::Any;
use galaxy_3d_hw::galaxy3d::hw::{
    Format, FrameLatencyWaiter, ModeDesc, NativeWindow, SurfaceDescriptor, SwapChain,
    SwapChainFlags, Texture2D,
};
use galaxy_3d_hw::galaxy3d::Result;
use galaxy_3d_hw::{engine_debug, engine_err, engine_warn};
use windows::core::Interface;
use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, WAIT_OBJECT_0};
use windows::Win32::Graphics::Direct3D11::ID3D11Texture2D;
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_MODE_DESC, DXGI_MODE_SCALING_UNSPECIFIED, DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
    DXGI_RATIONAL,
};
use windows::Win32::Graphics::Dxgi::{IDXGIOutput, IDXGISwapChain, IDXGISwapChain2};
use windows::Win32::System::Threading::WaitForSingleObject;
use crate::d3d11_format::{
    format_from_dxgi, format_to_dxgi, sample_from_dxgi, swap_chain_flags_to_dxgi,
    swap_effect_from_dxgi,
};
use crate::d3d11_texture::D3d11Texture2D;

const SOURCE: &str = "galaxy3d::d3d11::swap_chain";

/// IDXGISwapChain wrapper
///
/// The DXGI 1.3 interface is queried once at creation; it only serves the
/// frame-latency waitable object.
pub struct D3d11SwapChain {
    swap_chain2: Option<IDXGISwapChain2>,
    swap_chain: IDXGISwapChain,
}

impl D3d11SwapChain {
    pub(crate) fn new(swap_chain: IDXGISwapChain) -> Self {
        let swap_chain2 = swap_chain.cast::<IDXGISwapChain2>().ok();
        Self {
            swap_chain2,
            swap_chain,
        }
    }

    pub fn raw(&self) -> &IDXGISwapChain {
        &self.swap_chain
    }
}

impl SwapChain for D3d11SwapChain {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> Result<SurfaceDescriptor> {
        let desc = unsafe { self.swap_chain.GetDesc() }
            .map_err(|e| engine_err!(SOURCE, "IDXGISwapChain::GetDesc failed: {:?}", e))?;

        Ok(SurfaceDescriptor {
            width: desc.BufferDesc.Width,
            height: desc.BufferDesc.Height,
            format: format_from_dxgi(desc.BufferDesc.Format),
            buffer_count: desc.BufferCount,
            windowed: desc.Windowed.as_bool(),
            sample: sample_from_dxgi(desc.SampleDesc),
            swap_effect: swap_effect_from_dxgi(desc.SwapEffect),
            output_window: NativeWindow(desc.OutputWindow.0 as isize),
            flags: SwapChainFlags::from_bits_truncate(desc.Flags),
        })
    }

    fn set_fullscreen_state(&self, fullscreen: bool) -> Result<()> {
        unsafe { self.swap_chain.SetFullscreenState(BOOL::from(fullscreen), None::<&IDXGIOutput>) }
            .map_err(|e| engine_err!(SOURCE, "SetFullscreenState({}) failed: {:?}", fullscreen, e))
    }

    fn resize_target(&self, mode: &ModeDesc) -> Result<()> {
        let native_mode = DXGI_MODE_DESC {
            Width: mode.width,
            Height: mode.height,
            RefreshRate: DXGI_RATIONAL { Numerator: 0, Denominator: 1 },
            Format: format_to_dxgi(mode.format),
            ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
            Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
        };
        unsafe { self.swap_chain.ResizeTarget(&native_mode) }
            .map_err(|e| engine_err!(SOURCE, "ResizeTarget {}x{} failed: {:?}", mode.width, mode.height, e))
    }

    fn resize_buffers(
        &self,
        buffer_count: u32,
        width: u32,
        height: u32,
        format: Format,
        flags: SwapChainFlags,
    ) -> Result<()> {
        unsafe {
            self.swap_chain.ResizeBuffers(
                buffer_count,
                width,
                height,
                format_to_dxgi(format),
                swap_chain_flags_to_dxgi(flags),
            )
        }
        .map_err(|e| engine_err!(SOURCE, "ResizeBuffers {}x{} failed: {:?}", width, height, e))
    }

    fn buffer(&self, index: u32) -> Result<Box<dyn Texture2D>> {
        let texture: ID3D11Texture2D = unsafe { self.swap_chain.GetBuffer(index) }
            .map_err(|e| engine_err!(SOURCE, "GetBuffer({}) failed: {:?}", index, e))?;
        Ok(Box::new(D3d11Texture2D::new(texture)))
    }

    fn frame_latency_waiter(&self) -> Option<Box<dyn FrameLatencyWaiter>> {
        let swap_chain2 = self.swap_chain2.as_ref()?;
        let handle = unsafe { swap_chain2.GetFrameLatencyWaitableObject() };
        if handle.is_invalid() {
            engine_debug!(SOURCE, "No frame-latency waitable object");
            return None;
        }
        Some(Box::new(D3d11FrameLatencyWaiter { handle }))
    }
}

/// Owned frame-latency waitable handle, closed on drop
pub struct D3d11FrameLatencyWaiter {
    handle: HANDLE,
}

impl FrameLatencyWaiter for D3d11FrameLatencyWaiter {
    fn wait(&self, timeout_ms: u32) -> bool {
        unsafe { WaitForSingleObject(self.handle, timeout_ms) == WAIT_OBJECT_0 }
    }
}

impl Drop for D3d11FrameLatencyWaiter {
    fn drop(&mut self) {
        if let Err(e) = unsafe { CloseHandle(self.handle) } {
            engine_warn!(SOURCE, "CloseHandle on frame-latency waiter failed: {:?}", e);
        }
    }
}
