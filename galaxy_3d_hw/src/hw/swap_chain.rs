/// Swap chain manager
///
/// Creates the presentation surface through one of two paths, first success
/// wins:
///
/// - **Per-window** (modern): swap chain created from the extended factory for
///   a window handle. Skipped when disabled on the command line; any failure
///   falls back silently.
/// - **Legacy**: swap chain created from a full surface descriptor against the
///   base factory. Its failure is fatal.
///
/// The manager also resizes the surface and reports whether the flip
/// presentation model is active.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hw::caps::Caps;
use crate::hw::device_factory::DriverObjects;
use crate::hw::format::{select_format, Format, FormatSupport, BACK_BUFFER_FORMATS};
use crate::hw::native::{Device, FrameLatencyWaiter, SwapChain};
use crate::hw::types::{
    FullscreenDesc, NativeWindow, SampleDesc, Scaling, SurfaceDescriptor, SwapChainDesc1,
    SwapChainFlags, SwapEffect,
};
use crate::hw::views::ViewBuilder;
use crate::{engine_debug, engine_info, engine_trace_release, engine_warn};

const SOURCE: &str = "galaxy3d::hw::swap_chain";

/// Which creation path produced the swap chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapChainStrategy {
    PerWindow,
    Legacy,
}

/// Parameters of the surface to create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceRequest {
    pub window: NativeWindow,
    pub width: u32,
    pub height: u32,
    /// Exclusive fullscreen requested
    pub fullscreen: bool,
    /// Per-window path disabled on the command line
    pub per_window_disabled: bool,
}

/// Owner of the presentation surface
///
/// Fields are declared in release order.
pub struct SwapChainManager {
    frame_latency_waiter: Option<Box<dyn FrameLatencyWaiter>>,
    swap_chain: Box<dyn SwapChain>,
    desc: SurfaceDescriptor,
    strategy: SwapChainStrategy,
}

impl SwapChainManager {
    /// Create the swap chain for `request`
    ///
    /// The back-buffer format is selected on `device` and recorded in `caps`.
    pub fn create(
        device: &dyn Device,
        drivers: &mut DriverObjects,
        request: &SurfaceRequest,
        config: &Config,
        caps: &mut Caps,
    ) -> Result<Self> {
        let format = select_format(device, FormatSupport::DISPLAY, &BACK_BUFFER_FORMATS);
        if format == Format::Unknown {
            engine_warn!(SOURCE, "No preferred back-buffer format is reported as displayable");
        }
        caps.record_target_format(format);

        if request.per_window_disabled {
            engine_info!(SOURCE, "Per-window swap chain disabled on the command line");
        } else if let Some(manager) = Self::create_per_window(device, drivers, request, config, format) {
            return Ok(manager);
        }

        Self::create_legacy(device, drivers, request, format)
    }

    /// Per-window path; `None` means "fall back to the legacy path"
    fn create_per_window(
        device: &dyn Device,
        drivers: &mut DriverObjects,
        request: &SurfaceRequest,
        config: &Config,
        format: Format,
    ) -> Option<Self> {
        let extended_factory = drivers.extended_factory()?;

        // The waitable object only exists on flip-model swap chains
        let (swap_effect, buffer_count, flags) = if config.experimental_flip_model {
            engine_warn!(SOURCE, "Experimental flip presentation model enabled");
            (
                SwapEffect::FlipDiscard,
                2,
                SwapChainFlags::ALLOW_MODE_SWITCH | SwapChainFlags::FRAME_LATENCY_WAITABLE_OBJECT,
            )
        } else {
            (SwapEffect::Discard, 1, SwapChainFlags::ALLOW_MODE_SWITCH)
        };

        let desc = SwapChainDesc1 {
            width: request.width,
            height: request.height,
            format,
            buffer_count,
            sample: SampleDesc::default(),
            swap_effect,
            scaling: Scaling::Stretch,
            flags,
        };
        let fullscreen = FullscreenDesc { windowed: !request.fullscreen };
        let fullscreen = request.fullscreen.then_some(&fullscreen);

        let swap_chain = match extended_factory.create_swap_chain_for_window(
            device,
            request.window,
            &desc,
            fullscreen,
        ) {
            Ok(swap_chain) => swap_chain,
            Err(e) => {
                engine_debug!(SOURCE, "Per-window swap chain unavailable ({}), using the legacy path", e);
                return None;
            }
        };

        // Read the effective description back so both paths expose the same data
        let surface = match swap_chain.desc() {
            Ok(surface) => surface,
            Err(e) => {
                engine_debug!(SOURCE, "Per-window swap chain description unavailable ({}), using the legacy path", e);
                engine_trace_release!(SOURCE, "swap chain");
                return None;
            }
        };

        let frame_latency_waiter = if surface.flags.contains(SwapChainFlags::FRAME_LATENCY_WAITABLE_OBJECT) {
            swap_chain.frame_latency_waiter()
        } else {
            None
        };
        engine_info!(SOURCE, "Swap chain created (per-window): {}x{} {:?}, frame latency waiter {}",
            surface.width, surface.height, surface.swap_effect,
            if frame_latency_waiter.is_some() { "available" } else { "unavailable" });

        Some(Self {
            frame_latency_waiter,
            swap_chain,
            desc: surface,
            strategy: SwapChainStrategy::PerWindow,
        })
    }

    fn create_legacy(
        device: &dyn Device,
        drivers: &DriverObjects,
        request: &SurfaceRequest,
        format: Format,
    ) -> Result<Self> {
        let desc = SurfaceDescriptor {
            width: request.width,
            height: request.height,
            format,
            buffer_count: 1,
            windowed: !request.fullscreen,
            sample: SampleDesc::default(),
            swap_effect: SwapEffect::Discard,
            output_window: request.window,
            flags: SwapChainFlags::ALLOW_MODE_SWITCH,
        };

        let swap_chain = drivers
            .factory()
            .create_swap_chain(device, &desc)
            .map_err(|e| Error::SwapChainCreationFailed(e.to_string()))?;

        engine_info!(SOURCE, "Swap chain created (legacy): {}x{} {}",
            desc.width, desc.height, if desc.windowed { "windowed" } else { "fullscreen" });

        Ok(Self {
            frame_latency_waiter: None,
            swap_chain,
            desc,
            strategy: SwapChainStrategy::Legacy,
        })
    }

    pub fn swap_chain(&self) -> &dyn SwapChain {
        self.swap_chain.as_ref()
    }

    pub fn desc(&self) -> &SurfaceDescriptor {
        &self.desc
    }

    pub fn strategy(&self) -> SwapChainStrategy {
        self.strategy
    }

    /// Whether the surface is in exclusive fullscreen
    pub fn is_fullscreen(&self) -> bool {
        !self.desc.windowed
    }

    /// Whether presentation uses one of the flip variants
    pub fn using_flip_presentation_model(&self) -> bool {
        self.desc.swap_effect.is_flip()
    }

    /// Frame-latency waitable object, when the swap chain exposes one
    pub fn frame_latency_waiter(&self) -> Option<&dyn FrameLatencyWaiter> {
        self.frame_latency_waiter.as_deref()
    }

    /// Resize the surface and rebuild the views
    ///
    /// The surface goes windowed when `fullscreen` is off. The views are
    /// released before the back buffers are resized. A failed fullscreen
    /// switch leaves the surface description untouched.
    pub fn reset(
        &mut self,
        device: &dyn Device,
        views: &mut ViewBuilder,
        caps: &mut Caps,
        width: u32,
        height: u32,
        fullscreen: bool,
    ) -> Result<()> {
        // The cached state follows the driver only once the switch succeeded
        self.swap_chain.set_fullscreen_state(fullscreen)?;
        self.desc.windowed = !fullscreen;

        self.desc.width = width;
        self.desc.height = height;
        self.swap_chain.resize_target(&self.desc.mode())?;

        views.release();
        self.swap_chain.resize_buffers(
            self.desc.buffer_count,
            width,
            height,
            self.desc.format,
            self.desc.flags,
        )?;

        engine_debug!(SOURCE, "Surface reset to {}x{} {}",
            width, height, if fullscreen { "fullscreen" } else { "windowed" });

        views.update_views(device, self.swap_chain.as_ref(), caps)
    }

    /// Leave exclusive fullscreen and release the swap chain
    pub fn release(self) {
        let Self { frame_latency_waiter, swap_chain, desc, .. } = self;

        if !desc.windowed {
            if let Err(e) = swap_chain.set_fullscreen_state(false) {
                engine_warn!(SOURCE, "Failed to leave fullscreen before release: {}", e);
            }
        }
        if let Some(waiter) = frame_latency_waiter {
            engine_trace_release!(SOURCE, "frame latency waiter");
            drop(waiter);
        }
        engine_trace_release!(SOURCE, "swap chain");
        drop(swap_chain);
    }
}

#[cfg(test)]
#[path = "swap_chain_tests.rs"]
mod tests;
