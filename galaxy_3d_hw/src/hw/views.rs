/// View builder
///
/// Owns the render-target view over back buffer 0 and the depth-stencil view
/// of the matching depth buffer. Exactly one pair is alive at a time: the old
/// pair is released before a new one is built, and before the swap chain
/// resizes its buffers.

use crate::error::{Error, Result};
use crate::hw::caps::Caps;
use crate::hw::format::{select_format, Format, FormatSupport, DEPTH_STENCIL_FORMATS};
use crate::hw::native::{DepthStencilView, Device, RenderTargetView, SwapChain};
use crate::hw::types::{
    BindFlags, DepthStencilViewDesc, DsvDimension, SampleDesc, Texture2DDesc, Usage,
};
use crate::{engine_debug, engine_trace_release};

const SOURCE: &str = "galaxy3d::hw::views";

/// Structural description of a view pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPairInfo {
    pub width: u32,
    pub height: u32,
    pub color_format: Format,
    pub depth_format: Format,
    pub sample: SampleDesc,
    pub depth_dimension: DsvDimension,
}

/// Render-target view + depth-stencil view bound to the current back buffer
pub struct ViewPair {
    depth_stencil: Box<dyn DepthStencilView>,
    render_target: Box<dyn RenderTargetView>,
    info: ViewPairInfo,
}

impl ViewPair {
    pub fn render_target(&self) -> &dyn RenderTargetView {
        self.render_target.as_ref()
    }

    pub fn depth_stencil(&self) -> &dyn DepthStencilView {
        self.depth_stencil.as_ref()
    }

    pub fn info(&self) -> &ViewPairInfo {
        &self.info
    }
}

/// Holder of the live view pair
#[derive(Default)]
pub struct ViewBuilder {
    pair: Option<ViewPair>,
}

impl ViewBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view pair, `None` before the first build or after a release
    pub fn pair(&self) -> Option<&ViewPair> {
        self.pair.as_ref()
    }

    /// Release the depth-stencil view, then the render-target view
    pub fn release(&mut self) {
        if let Some(ViewPair { depth_stencil, render_target, .. }) = self.pair.take() {
            engine_trace_release!(SOURCE, "depth-stencil view");
            drop(depth_stencil);
            engine_trace_release!(SOURCE, "render-target view");
            drop(render_target);
        }
    }

    /// Rebuild both views against the current back buffer
    ///
    /// Any previous pair is released first. The depth format is selected anew
    /// on every call and recorded in `caps` together with the back-buffer format.
    pub fn update_views(
        &mut self,
        device: &dyn Device,
        swap_chain: &dyn SwapChain,
        caps: &mut Caps,
    ) -> Result<()> {
        self.release();

        let back_buffer = swap_chain
            .buffer(0)
            .map_err(|e| Error::ViewCreationFailed(format!("back buffer: {}", e)))?;
        let back_desc = back_buffer.desc();
        let render_target = device
            .create_render_target_view(back_buffer.as_ref())
            .map_err(|e| Error::ViewCreationFailed(format!("render target view: {}", e)))?;
        engine_trace_release!(SOURCE, "back buffer");
        drop(back_buffer);

        let depth_format = select_format(device, FormatSupport::DEPTH_STENCIL, &DEPTH_STENCIL_FORMATS);
        if depth_format == Format::Unknown {
            return Err(Error::ViewCreationFailed("no supported depth-stencil format".to_string()));
        }

        let depth_desc = Texture2DDesc {
            width: back_desc.width,
            height: back_desc.height,
            mip_levels: 1,
            array_size: 1,
            format: depth_format,
            sample: back_desc.sample,
            usage: Usage::Default,
            bind_flags: BindFlags::DEPTH_STENCIL,
        };
        let depth_texture = device
            .create_texture_2d(&depth_desc)
            .map_err(|e| Error::ViewCreationFailed(format!("depth texture: {}", e)))?;

        let view_desc = DepthStencilViewDesc {
            format: depth_format,
            dimension: DsvDimension::for_sample_count(back_desc.sample.count),
            mip_slice: 0,
        };
        let depth_stencil = device
            .create_depth_stencil_view(depth_texture.as_ref(), &view_desc)
            .map_err(|e| Error::ViewCreationFailed(format!("depth-stencil view: {}", e)))?;
        engine_trace_release!(SOURCE, "depth texture");
        drop(depth_texture);

        caps.record_formats(back_desc.format, depth_format);

        let info = ViewPairInfo {
            width: back_desc.width,
            height: back_desc.height,
            color_format: back_desc.format,
            depth_format,
            sample: back_desc.sample,
            depth_dimension: view_desc.dimension,
        };
        engine_debug!(SOURCE, "Views built: {}x{} color {:?} depth {:?}",
            info.width, info.height, info.color_format, info.depth_format);

        self.pair = Some(ViewPair {
            depth_stencil,
            render_target,
            info,
        });
        Ok(())
    }
}

#[cfg(test)]
#[path = "views_tests.rs"]
mod tests;
