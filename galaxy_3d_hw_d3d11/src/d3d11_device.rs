/// Direct3D 11 device and immediate context

use std::any::Any;
use std::ffi::c_void;
use galaxy_3d_hw::galaxy3d::hw::{
    DepthStencilView, DepthStencilViewDesc, Device, DeviceContext, Format, FormatSupport,
    RenderTargetView, Texture2D, Texture2DDesc,
};
use galaxy_3d_hw::galaxy3d::{Error, Result};
use galaxy_3d_hw::{engine_debug, engine_err};
use windows::core::Interface;
use windows::Win32::Graphics::Dxgi::IDXGIDevice;
use windows::Win32::Graphics::Direct3D11::{
    ID3D11DepthStencilView, ID3D11Device, ID3D11Device3, ID3D11DeviceContext, ID3D11RenderTargetView,
    ID3D11Texture2D, D3D11_DEPTH_STENCIL_VIEW_DESC, D3D11_DEPTH_STENCIL_VIEW_DESC_0,
    D3D11_FEATURE_D3D10_X_HARDWARE_OPTIONS, D3D11_FEATURE_DATA_D3D10_X_HARDWARE_OPTIONS,
    D3D11_TEX2D_DSV, D3D11_TEXTURE2D_DESC,
};
use crate::d3d11_format::{
    dsv_dimension_to_d3d11, format_support_from_d3d11, format_to_dxgi, sample_to_dxgi,
    usage_to_d3d11,
};
use crate::d3d11_texture::{D3d11DepthStencilView, D3d11RenderTargetView, D3d11Texture2D};

const SOURCE: &str = "galaxy3d::d3d11::device";

/// ID3D11Device wrapper
///
/// The 11.3 interface is queried once; it is released before the base device.
pub struct D3d11Device {
    device3: Option<ID3D11Device3>,
    device: ID3D11Device,
}

impl D3d11Device {
    pub(crate) fn new(device: ID3D11Device) -> Self {
        let device3 = match device.cast::<ID3D11Device3>() {
            Ok(device3) => Some(device3),
            Err(e) => {
                engine_debug!(SOURCE, "ID3D11Device3 unavailable: {:?}", e);
                None
            }
        };
        Self { device3, device }
    }

    /// Recover the D3D11 device from a device layer handle
    pub(crate) fn downcast(device: &dyn Device) -> Result<&D3d11Device> {
        device
            .as_any()
            .downcast_ref::<D3d11Device>()
            .ok_or_else(|| engine_err!(SOURCE, "Device was not created by the d3d11 backend"))
    }

    pub fn raw(&self) -> &ID3D11Device {
        &self.device
    }

    /// DXGI factory that owns this device's adapter
    ///
    /// DXGI only accepts swap chains from this factory. A device created
    /// without an explicit adapter (reference driver) gets a factory of its own.
    pub fn dxgi_factory<T: Interface>(&self) -> windows::core::Result<T> {
        let dxgi_device: IDXGIDevice = self.device.cast()?;
        unsafe { dxgi_device.GetAdapter()?.GetParent::<T>() }
    }

    /// Direct3D 11.3 device interface, when the runtime provides it
    pub fn raw3(&self) -> Option<&ID3D11Device3> {
        self.device3.as_ref()
    }
}

impl Device for D3d11Device {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn check_format_support(&self, format: Format) -> Result<FormatSupport> {
        // Unsupported formats are reported as E_FAIL during normal selection
        match unsafe { self.device.CheckFormatSupport(format_to_dxgi(format)) } {
            Ok(mask) => Ok(format_support_from_d3d11(mask)),
            Err(e) => {
                engine_debug!(SOURCE, "CheckFormatSupport({:?}) failed: {:?}", format, e);
                Err(Error::BackendError(format!("CheckFormatSupport({:?}) failed: {:?}", format, e)))
            }
        }
    }

    fn legacy_compute_shader_support(&self) -> bool {
        let mut options = D3D11_FEATURE_DATA_D3D10_X_HARDWARE_OPTIONS::default();
        let result = unsafe {
            self.device.CheckFeatureSupport(
                D3D11_FEATURE_D3D10_X_HARDWARE_OPTIONS,
                &mut options as *mut _ as *mut c_void,
                std::mem::size_of::<D3D11_FEATURE_DATA_D3D10_X_HARDWARE_OPTIONS>() as u32,
            )
        };
        match result {
            Ok(()) => options.ComputeShaders_Plus_RawAndStructuredBuffers_Via_Shader_4_x.as_bool(),
            Err(e) => {
                engine_debug!(SOURCE, "D3D10_X_HARDWARE_OPTIONS query failed: {:?}", e);
                false
            }
        }
    }

    fn create_render_target_view(&self, resource: &dyn Texture2D) -> Result<Box<dyn RenderTargetView>> {
        let texture = D3d11Texture2D::downcast(resource)?;

        let mut view: Option<ID3D11RenderTargetView> = None;
        unsafe { self.device.CreateRenderTargetView(texture.raw(), None, Some(&mut view)) }
            .map_err(|e| engine_err!(SOURCE, "CreateRenderTargetView failed: {:?}", e))?;
        let view = view.ok_or_else(|| engine_err!(SOURCE, "CreateRenderTargetView returned no view"))?;

        Ok(Box::new(D3d11RenderTargetView::new(view)))
    }

    fn create_texture_2d(&self, desc: &Texture2DDesc) -> Result<Box<dyn Texture2D>> {
        let native_desc = D3D11_TEXTURE2D_DESC {
            Width: desc.width,
            Height: desc.height,
            MipLevels: desc.mip_levels,
            ArraySize: desc.array_size,
            Format: format_to_dxgi(desc.format),
            SampleDesc: sample_to_dxgi(desc.sample),
            Usage: usage_to_d3d11(desc.usage),
            BindFlags: desc.bind_flags.bits(),
            CPUAccessFlags: 0,
            MiscFlags: 0,
        };

        let mut texture: Option<ID3D11Texture2D> = None;
        unsafe { self.device.CreateTexture2D(&native_desc, None, Some(&mut texture)) }
            .map_err(|e| {
                engine_err!(SOURCE, "CreateTexture2D {}x{} {:?} failed: {:?}", desc.width, desc.height, desc.format, e)
            })?;
        let texture = texture.ok_or_else(|| engine_err!(SOURCE, "CreateTexture2D returned no texture"))?;

        Ok(Box::new(D3d11Texture2D::new(texture)))
    }

    fn create_depth_stencil_view(
        &self,
        resource: &dyn Texture2D,
        desc: &DepthStencilViewDesc,
    ) -> Result<Box<dyn DepthStencilView>> {
        let texture = D3d11Texture2D::downcast(resource)?;

        // The multisampled variant of the union carries no data
        let native_desc = D3D11_DEPTH_STENCIL_VIEW_DESC {
            Format: format_to_dxgi(desc.format),
            ViewDimension: dsv_dimension_to_d3d11(desc.dimension),
            Flags: 0,
            Anonymous: D3D11_DEPTH_STENCIL_VIEW_DESC_0 {
                Texture2D: D3D11_TEX2D_DSV { MipSlice: desc.mip_slice },
            },
        };

        let mut view: Option<ID3D11DepthStencilView> = None;
        unsafe {
            self.device
                .CreateDepthStencilView(texture.raw(), Some(&native_desc), Some(&mut view))
        }
        .map_err(|e| engine_err!(SOURCE, "CreateDepthStencilView failed: {:?}", e))?;
        let view = view.ok_or_else(|| engine_err!(SOURCE, "CreateDepthStencilView returned no view"))?;

        Ok(Box::new(D3d11DepthStencilView::new(view)))
    }
}

/// ID3D11DeviceContext wrapper (immediate context)
pub struct D3d11Context {
    pub(crate) context: ID3D11DeviceContext,
}

impl D3d11Context {
    pub fn raw(&self) -> &ID3D11DeviceContext {
        &self.context
    }
}

impl DeviceContext for D3d11Context {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
#[path = "d3d11_device_tests.rs"]
mod tests;
