/// Mock native backend for unit tests (no GPU required)
///
/// Every mock object shares one journal recording the native calls it
/// receives and the releases its handles perform, in order. Tests use it for
/// call-count and ordering assertions.
///
/// The mock swap chain behaves like the real one where the device layer relies
/// on it: back buffers cannot be resized while a view or texture still
/// references them.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::num::NonZeroIsize;
use std::rc::Rc;
use raw_window_handle::{
    HandleError, HasWindowHandle, RawWindowHandle, Win32WindowHandle, WindowHandle,
};
use rustc_hash::FxHashMap;
use crate::error::Result;
use crate::engine_bail;
use crate::hw::format::{Format, FormatSupport, DEPTH_STENCIL_FORMATS};
use crate::hw::native::{
    Adapter, CreatedDevice, Device, DeviceContext, DepthStencilView, ExtendedFactory, Factory,
    FrameLatencyWaiter, GraphicsApi, RenderTargetView, SwapChain, Texture2D,
};
use crate::hw::types::{
    AdapterInfo, BindFlags, DepthStencilViewDesc, DeviceCreateFlags, DriverType, FeatureLevel,
    FullscreenDesc, ModeDesc, NativeWindow, SurfaceDescriptor, SwapChainDesc1,
    SwapChainFlags, Texture2DDesc, Usage,
};
use crate::hw::window::SurfaceWindow;

// ============================================================================
// Journal
// ============================================================================

/// One entry of the mock journal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEvent {
    /// A native call with a short description of its arguments
    Call(&'static str, String),
    /// A native handle was released
    Release(&'static str),
}

/// Shared record of native activity
#[derive(Debug, Default)]
pub struct Journal {
    pub events: Vec<MockEvent>,
    /// Back-buffer references held by textures and views
    pub back_buffer_refs: u32,
    /// Live presentation surface, if any
    pub surface: Option<MockSurfaceState>,
}

pub type SharedJournal = Rc<RefCell<Journal>>;

impl Journal {
    pub fn new_shared() -> SharedJournal {
        Rc::new(RefCell::new(Journal::default()))
    }

    fn call(&mut self, name: &'static str, detail: impl Into<String>) {
        self.events.push(MockEvent::Call(name, detail.into()));
    }

    fn release(&mut self, name: &'static str) {
        self.events.push(MockEvent::Release(name));
    }

    /// Number of calls named `name`
    pub fn calls(&self, name: &str) -> usize {
        self.events
            .iter()
            .filter(|event| matches!(event, MockEvent::Call(call, _) if *call == name))
            .count()
    }

    /// Argument descriptions of every call named `name`, in order
    pub fn call_details(&self, name: &str) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|event| match event {
                MockEvent::Call(call, detail) if *call == name => Some(detail.clone()),
                _ => None,
            })
            .collect()
    }

    /// Released handle names, in release order
    pub fn releases(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|event| match event {
                MockEvent::Release(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Index of the first event equal to `event`
    pub fn position(&self, event: &MockEvent) -> Option<usize> {
        self.events.iter().position(|e| e == event)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// State of the mock presentation surface
#[derive(Debug, Clone)]
pub struct MockSurfaceState {
    pub desc: SurfaceDescriptor,
    pub fullscreen: bool,
}

// ============================================================================
// Behavior
// ============================================================================

/// Knobs controlling how the mock driver responds
#[derive(Debug, Clone)]
pub struct MockBehavior {
    pub adapter_info: Option<AdapterInfo>,
    /// Highest feature level the mock device accepts
    pub max_feature_level: FeatureLevel,
    /// Reject device creation when the full candidate list is requested
    pub fail_full_level_list: bool,
    pub has_extended_factory: bool,
    pub fail_modern_swap_chain: bool,
    pub fail_legacy_swap_chain: bool,
    /// Reject every fullscreen transition on the swap chain
    pub fail_fullscreen_toggle: bool,
    pub has_frame_latency_waiter: bool,
    pub legacy_compute_shaders: bool,
    pub fail_render_target_view: bool,
    pub format_support: FxHashMap<Format, FormatSupport>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        let mut format_support = FxHashMap::default();
        format_support.insert(
            Format::R8G8B8A8_UNORM,
            FormatSupport::TEXTURE2D | FormatSupport::RENDER_TARGET | FormatSupport::DISPLAY,
        );
        for format in DEPTH_STENCIL_FORMATS {
            format_support.insert(format, FormatSupport::TEXTURE2D | FormatSupport::DEPTH_STENCIL);
        }

        Self {
            adapter_info: Some(AdapterInfo {
                vendor_id: 0x10DE,
                device_id: 0x1C82,
                dedicated_video_memory: 4 * 1024 * 1024 * 1024,
                name: "Mock Adapter".to_string(),
            }),
            max_feature_level: FeatureLevel::Level11_1,
            fail_full_level_list: false,
            has_extended_factory: true,
            fail_modern_swap_chain: false,
            fail_legacy_swap_chain: false,
            fail_fullscreen_toggle: false,
            has_frame_latency_waiter: true,
            legacy_compute_shaders: false,
            fail_render_target_view: false,
            format_support,
        }
    }
}

impl MockBehavior {
    /// Legacy swap chain path only (no extended factory)
    pub fn legacy_only() -> Self {
        Self {
            has_extended_factory: false,
            has_frame_latency_waiter: false,
            ..Self::default()
        }
    }

    /// Replace the support mask of `format`
    pub fn with_support(mut self, format: Format, support: FormatSupport) -> Self {
        self.format_support.insert(format, support);
        self
    }
}

// ============================================================================
// Mock Graphics API
// ============================================================================

pub struct MockApi {
    pub journal: SharedJournal,
    pub behavior: Rc<MockBehavior>,
}

impl MockApi {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            journal: Journal::new_shared(),
            behavior: Rc::new(behavior),
        }
    }
}

impl GraphicsApi for MockApi {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn create_factory(&self) -> Result<Box<dyn Factory>> {
        self.journal.borrow_mut().call("create_factory", "");
        Ok(Box::new(MockFactory {
            journal: self.journal.clone(),
            behavior: self.behavior.clone(),
        }))
    }
}

// ============================================================================
// Mock Factory / Extended Factory
// ============================================================================

pub struct MockFactory {
    journal: SharedJournal,
    behavior: Rc<MockBehavior>,
}

impl Factory for MockFactory {
    fn enum_adapter(&self, index: u32) -> Result<Option<Box<dyn Adapter>>> {
        self.journal.borrow_mut().call("enum_adapter", index.to_string());
        if index > 0 || self.behavior.adapter_info.is_none() {
            return Ok(None);
        }
        Ok(Some(Box::new(MockAdapter {
            journal: self.journal.clone(),
            behavior: self.behavior.clone(),
        })))
    }

    fn create_swap_chain(
        &self,
        _device: &dyn Device,
        desc: &SurfaceDescriptor,
    ) -> Result<Box<dyn SwapChain>> {
        self.journal.borrow_mut().call(
            "create_swap_chain",
            format!("{}x{} windowed={}", desc.width, desc.height, desc.windowed),
        );
        if self.behavior.fail_legacy_swap_chain {
            engine_bail!("galaxy3d::mock", "legacy swap chain creation rejected");
        }
        Ok(MockSwapChain::create(&self.journal, &self.behavior, desc.clone()))
    }
}

impl Drop for MockFactory {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("factory");
    }
}

pub struct MockExtendedFactory {
    journal: SharedJournal,
    behavior: Rc<MockBehavior>,
}

impl ExtendedFactory for MockExtendedFactory {
    fn create_swap_chain_for_window(
        &self,
        _device: &dyn Device,
        window: NativeWindow,
        desc: &SwapChainDesc1,
        fullscreen: Option<&FullscreenDesc>,
    ) -> Result<Box<dyn SwapChain>> {
        let windowed = fullscreen.map(|fs| fs.windowed).unwrap_or(true);
        self.journal.borrow_mut().call(
            "create_swap_chain_for_window",
            format!("{}x{} windowed={}", desc.width, desc.height, windowed),
        );
        if self.behavior.fail_modern_swap_chain {
            engine_bail!("galaxy3d::mock", "per-window swap chain creation rejected");
        }
        let surface = SurfaceDescriptor {
            width: desc.width,
            height: desc.height,
            format: desc.format,
            buffer_count: desc.buffer_count,
            windowed,
            sample: desc.sample,
            swap_effect: desc.swap_effect,
            output_window: window,
            flags: desc.flags,
        };
        Ok(MockSwapChain::create(&self.journal, &self.behavior, surface))
    }
}

impl Drop for MockExtendedFactory {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("extended_factory");
    }
}

// ============================================================================
// Mock Adapter
// ============================================================================

pub struct MockAdapter {
    journal: SharedJournal,
    behavior: Rc<MockBehavior>,
}

impl Adapter for MockAdapter {
    fn info(&self) -> Result<AdapterInfo> {
        match &self.behavior.adapter_info {
            Some(info) => Ok(info.clone()),
            None => engine_bail!("galaxy3d::mock", "adapter has no description"),
        }
    }

    fn extended_factory(&self) -> Option<Box<dyn ExtendedFactory>> {
        self.journal.borrow_mut().call("extended_factory", "");
        if !self.behavior.has_extended_factory {
            return None;
        }
        Some(Box::new(MockExtendedFactory {
            journal: self.journal.clone(),
            behavior: self.behavior.clone(),
        }))
    }

    fn create_device(
        &self,
        driver_type: DriverType,
        flags: DeviceCreateFlags,
        feature_levels: &[FeatureLevel],
    ) -> Result<CreatedDevice> {
        let names: Vec<&str> = feature_levels.iter().map(|level| level.name()).collect();
        self.journal.borrow_mut().call(
            "create_device",
            format!("{:?} {:?} [{}]", driver_type, flags, names.join(",")),
        );

        if self.behavior.fail_full_level_list && feature_levels.len() == FeatureLevel::CANDIDATES.len() {
            engine_bail!("galaxy3d::mock", "runtime does not know feature level {}", names[0]);
        }
        let Some(&feature_level) = feature_levels
            .iter()
            .find(|&&level| level <= self.behavior.max_feature_level)
        else {
            engine_bail!("galaxy3d::mock", "no supported feature level in [{}]", names.join(","));
        };

        Ok(CreatedDevice {
            device: Box::new(MockDevice::new(self.journal.clone(), self.behavior.clone())),
            context: Box::new(MockContext { journal: self.journal.clone() }),
            feature_level,
        })
    }
}

impl Drop for MockAdapter {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("adapter");
    }
}

// ============================================================================
// Mock Device / Context
// ============================================================================

pub struct MockDevice {
    journal: SharedJournal,
    behavior: Rc<MockBehavior>,
}

impl MockDevice {
    pub fn new(journal: SharedJournal, behavior: Rc<MockBehavior>) -> Self {
        Self { journal, behavior }
    }
}

impl Device for MockDevice {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn check_format_support(&self, format: Format) -> Result<FormatSupport> {
        self.journal.borrow_mut().call("check_format_support", format!("{:?}", format));
        Ok(self
            .behavior
            .format_support
            .get(&format)
            .copied()
            .unwrap_or(FormatSupport::empty()))
    }

    fn legacy_compute_shader_support(&self) -> bool {
        self.journal.borrow_mut().call("legacy_compute_shader_support", "");
        self.behavior.legacy_compute_shaders
    }

    fn create_render_target_view(&self, resource: &dyn Texture2D) -> Result<Box<dyn RenderTargetView>> {
        self.journal.borrow_mut().call("create_render_target_view", "");
        if self.behavior.fail_render_target_view {
            engine_bail!("galaxy3d::mock", "render target view rejected");
        }
        let on_back_buffer = resource
            .as_any()
            .downcast_ref::<MockTexture2D>()
            .map(|texture| texture.back_buffer)
            .unwrap_or(false);
        if on_back_buffer {
            self.journal.borrow_mut().back_buffer_refs += 1;
        }
        Ok(Box::new(MockRenderTargetView {
            journal: self.journal.clone(),
            on_back_buffer,
        }))
    }

    fn create_texture_2d(&self, desc: &Texture2DDesc) -> Result<Box<dyn Texture2D>> {
        self.journal.borrow_mut().call(
            "create_texture_2d",
            format!("{}x{} {:?}", desc.width, desc.height, desc.format),
        );
        Ok(Box::new(MockTexture2D {
            journal: self.journal.clone(),
            desc: desc.clone(),
            back_buffer: false,
        }))
    }

    fn create_depth_stencil_view(
        &self,
        _resource: &dyn Texture2D,
        desc: &DepthStencilViewDesc,
    ) -> Result<Box<dyn DepthStencilView>> {
        self.journal.borrow_mut().call("create_depth_stencil_view", format!("{:?}", desc.format));
        Ok(Box::new(MockDepthStencilView {
            journal: self.journal.clone(),
            desc: *desc,
        }))
    }
}

impl Drop for MockDevice {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("device");
    }
}

pub struct MockContext {
    journal: SharedJournal,
}

impl DeviceContext for MockContext {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockContext {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("context");
    }
}

// ============================================================================
// Mock Swap Chain
// ============================================================================

pub struct MockSwapChain {
    journal: SharedJournal,
    behavior: Rc<MockBehavior>,
}

impl MockSwapChain {
    fn create(
        journal: &SharedJournal,
        behavior: &Rc<MockBehavior>,
        desc: SurfaceDescriptor,
    ) -> Box<dyn SwapChain> {
        let fullscreen = !desc.windowed;
        journal.borrow_mut().surface = Some(MockSurfaceState { desc, fullscreen });
        Box::new(MockSwapChain {
            journal: journal.clone(),
            behavior: behavior.clone(),
        })
    }
}

impl SwapChain for MockSwapChain {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> Result<SurfaceDescriptor> {
        match &self.journal.borrow().surface {
            Some(surface) => Ok(surface.desc.clone()),
            None => engine_bail!("galaxy3d::mock", "surface is gone"),
        }
    }

    fn set_fullscreen_state(&self, fullscreen: bool) -> Result<()> {
        let mut journal = self.journal.borrow_mut();
        journal.call("set_fullscreen_state", fullscreen.to_string());
        if self.behavior.fail_fullscreen_toggle {
            engine_bail!("galaxy3d::mock", "fullscreen transition rejected");
        }
        if let Some(surface) = journal.surface.as_mut() {
            surface.fullscreen = fullscreen;
            surface.desc.windowed = !fullscreen;
        }
        Ok(())
    }

    fn resize_target(&self, mode: &ModeDesc) -> Result<()> {
        self.journal
            .borrow_mut()
            .call("resize_target", format!("{}x{}", mode.width, mode.height));
        Ok(())
    }

    fn resize_buffers(
        &self,
        buffer_count: u32,
        width: u32,
        height: u32,
        format: Format,
        _flags: SwapChainFlags,
    ) -> Result<()> {
        let mut journal = self.journal.borrow_mut();
        journal.call("resize_buffers", format!("{}x{}", width, height));
        if journal.back_buffer_refs > 0 {
            engine_bail!("galaxy3d::mock",
                "{} references to the back buffers are still alive", journal.back_buffer_refs);
        }
        if let Some(surface) = journal.surface.as_mut() {
            if buffer_count > 0 {
                surface.desc.buffer_count = buffer_count;
            }
            if width > 0 && height > 0 {
                surface.desc.width = width;
                surface.desc.height = height;
            }
            if format != Format::Unknown {
                surface.desc.format = format;
            }
        }
        Ok(())
    }

    fn buffer(&self, index: u32) -> Result<Box<dyn Texture2D>> {
        let mut journal = self.journal.borrow_mut();
        journal.call("buffer", index.to_string());
        let Some(surface) = journal.surface.as_ref() else {
            engine_bail!("galaxy3d::mock", "surface is gone");
        };
        let desc = Texture2DDesc {
            width: surface.desc.width,
            height: surface.desc.height,
            mip_levels: 1,
            array_size: 1,
            format: surface.desc.format,
            sample: surface.desc.sample,
            usage: Usage::Default,
            bind_flags: BindFlags::RENDER_TARGET,
        };
        journal.back_buffer_refs += 1;
        Ok(Box::new(MockTexture2D {
            journal: self.journal.clone(),
            desc,
            back_buffer: true,
        }))
    }

    fn frame_latency_waiter(&self) -> Option<Box<dyn FrameLatencyWaiter>> {
        let mut journal = self.journal.borrow_mut();
        journal.call("frame_latency_waiter", "");
        // Like the driver, only swap chains created with the waitable flag expose one
        let flagged = journal
            .surface
            .as_ref()
            .is_some_and(|surface| surface.desc.flags.contains(SwapChainFlags::FRAME_LATENCY_WAITABLE_OBJECT));
        if !self.behavior.has_frame_latency_waiter || !flagged {
            return None;
        }
        Some(Box::new(MockWaiter { journal: self.journal.clone() }))
    }
}

impl Drop for MockSwapChain {
    fn drop(&mut self) {
        let mut journal = self.journal.borrow_mut();
        journal.surface = None;
        journal.release("swap_chain");
    }
}

pub struct MockWaiter {
    journal: SharedJournal,
}

impl FrameLatencyWaiter for MockWaiter {
    fn wait(&self, timeout_ms: u32) -> bool {
        self.journal.borrow_mut().call("wait", timeout_ms.to_string());
        true
    }
}

impl Drop for MockWaiter {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("frame_latency_waiter");
    }
}

// ============================================================================
// Mock Textures / Views
// ============================================================================

pub struct MockTexture2D {
    journal: SharedJournal,
    desc: Texture2DDesc,
    back_buffer: bool,
}

impl Texture2D for MockTexture2D {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> Texture2DDesc {
        self.desc.clone()
    }
}

impl Drop for MockTexture2D {
    fn drop(&mut self) {
        let mut journal = self.journal.borrow_mut();
        if self.back_buffer {
            journal.back_buffer_refs -= 1;
            journal.release("back_buffer");
        } else {
            journal.release("texture_2d");
        }
    }
}

pub struct MockRenderTargetView {
    journal: SharedJournal,
    on_back_buffer: bool,
}

impl RenderTargetView for MockRenderTargetView {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for MockRenderTargetView {
    fn drop(&mut self) {
        let mut journal = self.journal.borrow_mut();
        if self.on_back_buffer {
            journal.back_buffer_refs -= 1;
        }
        journal.release("render_target_view");
    }
}

pub struct MockDepthStencilView {
    journal: SharedJournal,
    desc: DepthStencilViewDesc,
}

impl DepthStencilView for MockDepthStencilView {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn desc(&self) -> DepthStencilViewDesc {
        self.desc
    }
}

impl Drop for MockDepthStencilView {
    fn drop(&mut self) {
        self.journal.borrow_mut().release("depth_stencil_view");
    }
}

// ============================================================================
// Mock Window
// ============================================================================

/// Window exposing a Win32 handle and recording minimize/restore requests
pub struct MockWindow {
    pub hwnd: isize,
    pub handle_available: bool,
    pub size: Cell<(u32, u32)>,
    pub minimize_requests: RefCell<Vec<bool>>,
}

impl MockWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            hwnd: 0x1234,
            handle_available: true,
            size: Cell::new((width, height)),
            minimize_requests: RefCell::new(Vec::new()),
        }
    }

    /// Window whose platform layer refuses to hand out a handle
    pub fn without_handle() -> Self {
        Self {
            handle_available: false,
            ..Self::new(800, 600)
        }
    }
}

impl HasWindowHandle for MockWindow {
    fn window_handle(&self) -> std::result::Result<WindowHandle<'_>, HandleError> {
        if !self.handle_available {
            return Err(HandleError::Unavailable);
        }
        let hwnd = NonZeroIsize::new(self.hwnd).ok_or(HandleError::Unavailable)?;
        let raw = RawWindowHandle::Win32(Win32WindowHandle::new(hwnd));
        // SAFETY: the HWND is a fake value that is never dereferenced
        Ok(unsafe { WindowHandle::borrow_raw(raw) })
    }
}

impl SurfaceWindow for MockWindow {
    fn surface_size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn set_minimized(&self, minimized: bool) {
        self.minimize_requests.borrow_mut().push(minimized);
    }
}
