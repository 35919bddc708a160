/// Device layer orchestrator
///
/// `Hw` ties the pieces together: it opens the driver, creates the device,
/// the swap chain and the views, resets them on resolution or fullscreen
/// changes, reacts to application activation, and tears everything down in
/// reverse dependency order.
///
/// `Hw` lives on the render thread behind `Rc<RefCell<..>>` so that the
/// application event hub can reach it.

use std::cell::RefCell;
use std::rc::Rc;
use crate::config::{Config, NO_MODERN_SWAP_CHAIN_FLAG};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::events::{AppActivationListener, Subscription};
use crate::hw::activation;
use crate::hw::caps::Caps;
use crate::hw::device_factory::{log_adapter, DeviceHandle, DriverObjects};
use crate::hw::native::{
    DepthStencilView, Device, DeviceContext, FrameLatencyWaiter, GraphicsApi, RenderTargetView,
};
use crate::hw::swap_chain::{SurfaceRequest, SwapChainManager, SwapChainStrategy};
use crate::hw::types::SurfaceDescriptor;
use crate::hw::views::{ViewBuilder, ViewPairInfo};
use crate::hw::window::{native_window, SurfaceWindow};
use crate::{engine_error, engine_info, engine_trace_release};

const SOURCE: &str = "galaxy3d::hw";

/// Device layer
///
/// Fields holding native objects are declared in release order.
pub struct Hw {
    views: ViewBuilder,
    swap_chain: Option<SwapChainManager>,
    device: Option<DeviceHandle>,
    drivers: Option<DriverObjects>,
    window: Option<Rc<dyn SurfaceWindow>>,
    caps: Caps,
    config: Config,
    api: Box<dyn GraphicsApi>,
    subscription: Option<Subscription>,
}

impl Hw {
    /// Create the device layer and register it for application events
    ///
    /// No native object is created until [`Hw::create_device`].
    pub fn new(api: Box<dyn GraphicsApi>, config: Config) -> Rc<RefCell<Hw>> {
        let mut caps = Caps::default();
        caps.force_reference_device = config.force_reference_device;

        let hw = Rc::new(RefCell::new(Hw {
            views: ViewBuilder::new(),
            swap_chain: None,
            device: None,
            drivers: None,
            window: None,
            caps,
            config,
            api,
            subscription: None,
        }));

        let listener: Rc<RefCell<dyn AppActivationListener>> = hw.clone();
        let subscription = Engine::subscribe_app_events(Rc::downgrade(&listener));
        hw.borrow_mut().subscription = Some(subscription);
        hw
    }

    // ===== LIFECYCLE =====

    /// Create device, swap chain and views for `window`
    ///
    /// An existing device is destroyed first. On failure everything created so
    /// far is released again and the error is returned; see
    /// [`Hw::create_device_or_exit`] for the engine's failure policy.
    pub fn create_device(&mut self, window: Rc<dyn SurfaceWindow>) -> Result<()> {
        self.destroy_device();

        let result = self.try_create_device(window);
        if result.is_err() {
            self.destroy_device();
        }
        result
    }

    fn try_create_device(&mut self, window: Rc<dyn SurfaceWindow>) -> Result<()> {
        engine_info!(SOURCE, "Creating device ({} backend)", self.api.name());

        let drivers = self.drivers.insert(DriverObjects::open(self.api.as_ref())?);
        let adapter_info = drivers.adapter().info()?;
        log_adapter(&adapter_info);
        self.caps.record(&adapter_info);

        let device = self.device.insert(DeviceHandle::create(drivers.adapter(), &self.config)?);
        self.caps.record_device(
            device.driver_type(),
            device.feature_level(),
            device.compute_shaders_supported(),
        );

        let native = native_window(window.as_ref())?;
        let (width, height) = window.surface_size();
        let request = SurfaceRequest {
            window: native,
            width,
            height,
            fullscreen: Engine::fullscreen(),
            per_window_disabled: Engine::has_command_line_flag(NO_MODERN_SWAP_CHAIN_FLAG),
        };
        self.window = Some(window);

        let swap_chain = self.swap_chain.insert(SwapChainManager::create(
            device.device(),
            drivers,
            &request,
            &self.config,
            &mut self.caps,
        )?);

        self.views.update_views(device.device(), swap_chain.swap_chain(), &mut self.caps)
    }

    /// [`Hw::create_device`] with the engine's failure policy applied
    ///
    /// Assertion-class errors panic with the platform error; every other
    /// failure terminates the process with the hardware failure message.
    pub fn create_device_or_exit(&mut self, window: Rc<dyn SurfaceWindow>) {
        if let Err(error) = self.create_device(window) {
            apply_failure_policy(error);
        }
    }

    /// Resize the surface and rebuild the views
    ///
    /// The fullscreen state follows the engine setting. Callers must not use
    /// the device while a reset is in progress.
    pub fn reset(&mut self, width: u32, height: u32) -> Result<()> {
        let (Some(device), Some(swap_chain)) = (self.device.as_ref(), self.swap_chain.as_mut()) else {
            return Err(Error::DeviceNotCreated);
        };

        engine_info!(SOURCE, "Reset to {}x{}", width, height);
        swap_chain.reset(
            device.device(),
            &mut self.views,
            &mut self.caps,
            width,
            height,
            Engine::fullscreen(),
        )
    }

    /// [`Hw::reset`] with the engine's failure policy applied
    pub fn reset_or_exit(&mut self, width: u32, height: u32) {
        if let Err(error) = self.reset(width, height) {
            apply_failure_policy(error);
        }
    }

    /// Release every native object in reverse dependency order
    ///
    /// Views, swap chain (leaving fullscreen first), context, device, adapter,
    /// extended factory, factory. Safe to call when nothing was created.
    pub fn destroy_device(&mut self) {
        if self.drivers.is_none() {
            return;
        }
        engine_info!(SOURCE, "Destroying device");

        self.views.release();
        if let Some(swap_chain) = self.swap_chain.take() {
            swap_chain.release();
        }
        if let Some(device) = self.device.take() {
            device.release();
        }
        if let Some(drivers) = self.drivers.take() {
            drivers.release();
        }
        if self.window.take().is_some() {
            engine_trace_release!(SOURCE, "window");
        }
    }

    // ===== ACCESSORS =====

    /// Whether a device currently exists
    pub fn is_created(&self) -> bool {
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&dyn Device> {
        self.device.as_ref().map(|device| device.device())
    }

    pub fn context(&self) -> Option<&dyn DeviceContext> {
        self.device.as_ref().map(|device| device.context())
    }

    pub fn render_target_view(&self) -> Option<&dyn RenderTargetView> {
        self.views.pair().map(|pair| pair.render_target())
    }

    pub fn depth_stencil_view(&self) -> Option<&dyn DepthStencilView> {
        self.views.pair().map(|pair| pair.depth_stencil())
    }

    /// Dimensions and formats of the live view pair
    pub fn view_info(&self) -> Option<ViewPairInfo> {
        self.views.pair().map(|pair| *pair.info())
    }

    pub fn caps(&self) -> &Caps {
        &self.caps
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn surface_descriptor(&self) -> Option<&SurfaceDescriptor> {
        self.swap_chain.as_ref().map(|swap_chain| swap_chain.desc())
    }

    pub fn swap_chain_strategy(&self) -> Option<SwapChainStrategy> {
        self.swap_chain.as_ref().map(|swap_chain| swap_chain.strategy())
    }

    /// Whether presentation uses a flip model (false without a swap chain)
    pub fn using_flip_presentation_model(&self) -> bool {
        self.swap_chain
            .as_ref()
            .map(|swap_chain| swap_chain.using_flip_presentation_model())
            .unwrap_or(false)
    }

    /// Frame-latency waitable object for frame pacing, when available
    pub fn frame_latency_waiter(&self) -> Option<&dyn FrameLatencyWaiter> {
        self.swap_chain.as_ref().and_then(|swap_chain| swap_chain.frame_latency_waiter())
    }
}

impl AppActivationListener for Hw {
    fn on_app_activate(&mut self) {
        if let (Some(swap_chain), Some(window)) = (&self.swap_chain, &self.window) {
            activation::on_app_activate(swap_chain, window.as_ref(), Engine::fullscreen());
        }
    }

    fn on_app_deactivate(&mut self) {
        if let (Some(swap_chain), Some(window)) = (&self.swap_chain, &self.window) {
            activation::on_app_deactivate(swap_chain, window.as_ref());
        }
    }
}

impl Drop for Hw {
    fn drop(&mut self) {
        self.destroy_device();
    }
}

fn apply_failure_policy(error: Error) -> ! {
    if error.is_assertion() {
        engine_error!(SOURCE, "{}", error);
        panic!("{}", error);
    }
    Engine::fatal_exit(&error)
}

#[cfg(test)]
#[path = "hw_tests.rs"]
mod tests;
