/// Direct3D 11 textures and views

use std::any::Any;
use galaxy_3d_hw::galaxy3d::hw::{
    BindFlags, DepthStencilView, DepthStencilViewDesc, RenderTargetView, Texture2D,
    Texture2DDesc,
};
use galaxy_3d_hw::galaxy3d::Result;
use galaxy_3d_hw::engine_err;
use windows::Win32::Graphics::Direct3D11::{
    ID3D11DepthStencilView, ID3D11RenderTargetView, ID3D11Texture2D,
    D3D11_DEPTH_STENCIL_VIEW_DESC, D3D11_TEXTURE2D_DESC,
};
use crate::d3d11_format::{
    dsv_dimension_from_d3d11, format_from_dxgi, sample_from_dxgi, usage_from_d3d11,
};

const SOURCE: &str = "galaxy3d::d3d11::texture";

// ===== TEXTURE =====

/// ID3D11Texture2D wrapper (back buffers and depth buffers)
pub struct D3d11Texture2D {
    texture: ID3D11Texture2D,
}

impl D3d11Texture2D {
    pub(crate) fn new(texture: ID3D11Texture2D) -> Self {
        Self { texture }
    }

    pub(crate) fn downcast(texture: &dyn Texture2D) -> Result<&D3d11Texture2D> {
        texture
            .as_any()
            .downcast_ref::<D3d11Texture2D>()
            .ok_or_else(|| engine_err!(SOURCE, "Texture was not created by the d3d11 backend"))
    }

    pub fn raw(&self) -> &ID3D11Texture2D {
        &self.texture
    }
}

impl Texture2D for D3d11Texture2D {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> Texture2DDesc {
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { self.texture.GetDesc(&mut desc) };

        Texture2DDesc {
            width: desc.Width,
            height: desc.Height,
            mip_levels: desc.MipLevels,
            array_size: desc.ArraySize,
            format: format_from_dxgi(desc.Format),
            sample: sample_from_dxgi(desc.SampleDesc),
            usage: usage_from_d3d11(desc.Usage),
            bind_flags: BindFlags::from_bits_truncate(desc.BindFlags),
        }
    }
}

// ===== VIEWS =====

/// ID3D11RenderTargetView wrapper
pub struct D3d11RenderTargetView {
    view: ID3D11RenderTargetView,
}

impl D3d11RenderTargetView {
    pub(crate) fn new(view: ID3D11RenderTargetView) -> Self {
        Self { view }
    }

    pub fn raw(&self) -> &ID3D11RenderTargetView {
        &self.view
    }
}

impl RenderTargetView for D3d11RenderTargetView {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// ID3D11DepthStencilView wrapper
pub struct D3d11DepthStencilView {
    view: ID3D11DepthStencilView,
}

impl D3d11DepthStencilView {
    pub(crate) fn new(view: ID3D11DepthStencilView) -> Self {
        Self { view }
    }

    pub fn raw(&self) -> &ID3D11DepthStencilView {
        &self.view
    }
}

impl DepthStencilView for D3d11DepthStencilView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> DepthStencilViewDesc {
        let mut desc = D3D11_DEPTH_STENCIL_VIEW_DESC::default();
        unsafe { self.view.GetDesc(&mut desc) };

        DepthStencilViewDesc {
            format: format_from_dxgi(desc.Format),
            dimension: dsv_dimension_from_d3d11(desc.ViewDimension),
            mip_slice: unsafe { desc.Anonymous.Texture2D.MipSlice },
        }
    }
}
