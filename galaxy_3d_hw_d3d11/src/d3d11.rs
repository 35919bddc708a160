/// Direct3D 11 backend entry point: DXGI factory and adapters

use galaxy_3d_hw::galaxy3d::hw::{
    Adapter, AdapterInfo, CreatedDevice, Device, DeviceCreateFlags, DriverType, ExtendedFactory,
    Factory, FeatureLevel, FullscreenDesc, GraphicsApi, NativeWindow, SurfaceDescriptor,
    SwapChain, SwapChainDesc1,
};
use galaxy_3d_hw::galaxy3d::{Error, Result};
use galaxy_3d_hw::{engine_debug, engine_err};
use windows::core::Interface;
use windows::Win32::Foundation::{BOOL, HWND};
use windows::Win32::Graphics::Direct3D::{
    D3D_DRIVER_TYPE_REFERENCE, D3D_DRIVER_TYPE_UNKNOWN, D3D_FEATURE_LEVEL,
};
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, D3D11_CREATE_DEVICE_DEBUG,
    D3D11_CREATE_DEVICE_FLAG, D3D11_SDK_VERSION,
};
use windows::Win32::Graphics::Dxgi::Common::{
    DXGI_ALPHA_MODE_UNSPECIFIED, DXGI_MODE_DESC, DXGI_MODE_SCALING_UNSPECIFIED, DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
    DXGI_RATIONAL,
};
use windows::Win32::Graphics::Dxgi::{
    CreateDXGIFactory1, IDXGIAdapter, IDXGIAdapter1, IDXGIFactory1, IDXGIFactory2,
    DXGI_ERROR_NOT_FOUND, DXGI_SWAP_CHAIN_DESC, DXGI_SWAP_CHAIN_DESC1,
    DXGI_SWAP_CHAIN_FULLSCREEN_DESC, DXGI_USAGE_RENDER_TARGET_OUTPUT,
};
use crate::d3d11_device::{D3d11Context, D3d11Device};
use crate::d3d11_format::{
    feature_level_from_d3d, feature_level_to_d3d, format_to_dxgi, sample_to_dxgi,
    scaling_to_dxgi, swap_effect_to_dxgi,
};
use crate::d3d11_swap_chain::D3d11SwapChain;

const SOURCE: &str = "galaxy3d::d3d11";

/// Direct3D 11 graphics API
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_hw::galaxy3d::{Config, hw::Hw};
/// use galaxy_3d_hw_d3d11::D3d11Api;
///
/// let hw = Hw::new(Box::new(D3d11Api), Config::default());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct D3d11Api;

impl GraphicsApi for D3d11Api {
    fn name(&self) -> &'static str {
        "d3d11"
    }

    fn create_factory(&self) -> Result<Box<dyn Factory>> {
        let factory: IDXGIFactory1 = unsafe { CreateDXGIFactory1() }
            .map_err(|e| engine_err!(SOURCE, "CreateDXGIFactory1 failed: {:?}", e))?;
        Ok(Box::new(D3d11Factory { factory }))
    }
}

// ===== FACTORY =====

/// DXGI factory
pub struct D3d11Factory {
    factory: IDXGIFactory1,
}

impl Factory for D3d11Factory {
    fn enum_adapter(&self, index: u32) -> Result<Option<Box<dyn Adapter>>> {
        match unsafe { self.factory.EnumAdapters1(index) } {
            Ok(adapter) => Ok(Some(Box::new(D3d11Adapter { adapter }))),
            Err(e) if e.code() == DXGI_ERROR_NOT_FOUND => Ok(None),
            Err(e) => Err(engine_err!(SOURCE, "EnumAdapters1({}) failed: {:?}", index, e)),
        }
    }

    fn create_swap_chain(
        &self,
        device: &dyn Device,
        desc: &SurfaceDescriptor,
    ) -> Result<Box<dyn SwapChain>> {
        let device = D3d11Device::downcast(device)?;

        let native_desc = DXGI_SWAP_CHAIN_DESC {
            BufferDesc: DXGI_MODE_DESC {
                Width: desc.width,
                Height: desc.height,
                RefreshRate: DXGI_RATIONAL { Numerator: 0, Denominator: 1 },
                Format: format_to_dxgi(desc.format),
                ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
                Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
            },
            SampleDesc: sample_to_dxgi(desc.sample),
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            OutputWindow: hwnd(desc.output_window),
            Windowed: BOOL::from(desc.windowed),
            SwapEffect: swap_effect_to_dxgi(desc.swap_effect),
            Flags: desc.flags.bits(),
        };

        let factory = swap_chain_factory(&self.factory, device);
        let mut swap_chain = None;
        unsafe { factory.CreateSwapChain(device.raw(), &native_desc, &mut swap_chain) }
            .ok()
            .map_err(|e| engine_err!(SOURCE, "CreateSwapChain failed: {:?}", e))?;
        let swap_chain = swap_chain
            .ok_or_else(|| engine_err!(SOURCE, "CreateSwapChain returned no swap chain"))?;

        Ok(Box::new(D3d11SwapChain::new(swap_chain)))
    }
}

// ===== EXTENDED FACTORY =====

/// DXGI 1.2 factory owning the adapter
pub struct D3d11ExtendedFactory {
    factory: IDXGIFactory2,
}

impl ExtendedFactory for D3d11ExtendedFactory {
    fn create_swap_chain_for_window(
        &self,
        device: &dyn Device,
        window: NativeWindow,
        desc: &SwapChainDesc1,
        fullscreen: Option<&FullscreenDesc>,
    ) -> Result<Box<dyn SwapChain>> {
        let device = D3d11Device::downcast(device)?;

        let native_desc = DXGI_SWAP_CHAIN_DESC1 {
            Width: desc.width,
            Height: desc.height,
            Format: format_to_dxgi(desc.format),
            Stereo: BOOL::from(false),
            SampleDesc: sample_to_dxgi(desc.sample),
            BufferUsage: DXGI_USAGE_RENDER_TARGET_OUTPUT,
            BufferCount: desc.buffer_count,
            Scaling: scaling_to_dxgi(desc.scaling),
            SwapEffect: swap_effect_to_dxgi(desc.swap_effect),
            AlphaMode: DXGI_ALPHA_MODE_UNSPECIFIED,
            Flags: desc.flags.bits(),
        };
        let fullscreen_desc = fullscreen.map(|fullscreen| DXGI_SWAP_CHAIN_FULLSCREEN_DESC {
            RefreshRate: DXGI_RATIONAL { Numerator: 0, Denominator: 1 },
            ScanlineOrdering: DXGI_MODE_SCANLINE_ORDER_UNSPECIFIED,
            Scaling: DXGI_MODE_SCALING_UNSPECIFIED,
            Windowed: BOOL::from(fullscreen.windowed),
        });

        let factory = swap_chain_factory(&self.factory, device);
        let swap_chain = unsafe {
            factory.CreateSwapChainForHwnd(
                device.raw(),
                hwnd(window),
                &native_desc,
                fullscreen_desc.as_ref().map(|desc| desc as *const _),
                None,
            )
        }
        .map_err(|e| Error::BackendError(format!("CreateSwapChainForHwnd failed: {:?}", e)))?;

        let swap_chain = swap_chain
            .cast()
            .map_err(|e| Error::BackendError(format!("IDXGISwapChain query failed: {:?}", e)))?;
        Ok(Box::new(D3d11SwapChain::new(swap_chain)))
    }
}

// ===== ADAPTER =====

/// DXGI adapter
pub struct D3d11Adapter {
    adapter: IDXGIAdapter1,
}

impl D3d11Adapter {
    pub fn raw(&self) -> &IDXGIAdapter1 {
        &self.adapter
    }
}

impl Adapter for D3d11Adapter {
    fn info(&self) -> Result<AdapterInfo> {
        let desc = unsafe { self.adapter.GetDesc1() }
            .map_err(|e| engine_err!(SOURCE, "IDXGIAdapter1::GetDesc1 failed: {:?}", e))?;

        let name_len = desc.Description.iter().position(|&c| c == 0).unwrap_or(desc.Description.len());
        Ok(AdapterInfo {
            vendor_id: desc.VendorId,
            device_id: desc.DeviceId,
            dedicated_video_memory: desc.DedicatedVideoMemory as u64,
            name: String::from_utf16_lossy(&desc.Description[..name_len]),
        })
    }

    fn extended_factory(&self) -> Option<Box<dyn ExtendedFactory>> {
        match unsafe { self.adapter.GetParent::<IDXGIFactory2>() } {
            Ok(factory) => Some(Box::new(D3d11ExtendedFactory { factory })),
            Err(e) => {
                engine_debug!(SOURCE, "IDXGIFactory2 unavailable: {:?}", e);
                None
            }
        }
    }

    fn create_device(
        &self,
        driver_type: DriverType,
        flags: DeviceCreateFlags,
        feature_levels: &[FeatureLevel],
    ) -> Result<CreatedDevice> {
        let levels: Vec<D3D_FEATURE_LEVEL> = feature_levels.iter().copied().map(feature_level_to_d3d).collect();

        let mut native_flags = D3D11_CREATE_DEVICE_FLAG(0);
        if flags.contains(DeviceCreateFlags::DEBUG) || cfg!(feature = "d3d11-debug-layer") {
            native_flags |= D3D11_CREATE_DEVICE_DEBUG;
        }

        let mut device: Option<ID3D11Device> = None;
        let mut context: Option<ID3D11DeviceContext> = None;
        let mut level = D3D_FEATURE_LEVEL::default();

        // An explicit adapter requires the UNKNOWN driver type; the reference
        // rasterizer is created without one
        let result = unsafe {
            match driver_type {
                DriverType::Hardware => {
                    let adapter: IDXGIAdapter = self
                        .adapter
                        .cast()
                        .map_err(|e| engine_err!(SOURCE, "IDXGIAdapter query failed: {:?}", e))?;
                    D3D11CreateDevice(
                        &adapter,
                        D3D_DRIVER_TYPE_UNKNOWN,
                        None,
                        native_flags,
                        Some(levels.as_slice()),
                        D3D11_SDK_VERSION,
                        Some(&mut device),
                        Some(&mut level),
                        Some(&mut context),
                    )
                }
                DriverType::Reference => D3D11CreateDevice(
                    None,
                    D3D_DRIVER_TYPE_REFERENCE,
                    None,
                    native_flags,
                    Some(levels.as_slice()),
                    D3D11_SDK_VERSION,
                    Some(&mut device),
                    Some(&mut level),
                    Some(&mut context),
                ),
            }
        };
        result.map_err(|e| Error::DeviceCreationFailed(format!("D3D11CreateDevice failed: {:?}", e)))?;

        let (Some(device), Some(context)) = (device, context) else {
            return Err(Error::DeviceCreationFailed("D3D11CreateDevice returned no device".to_string()));
        };
        let feature_level = feature_level_from_d3d(level).ok_or_else(|| {
            Error::DeviceCreationFailed(format!("unexpected feature level {:#x}", level.0))
        })?;

        Ok(CreatedDevice {
            device: Box::new(D3d11Device::new(device)),
            context: Box::new(D3d11Context { context }),
            feature_level,
        })
    }
}

/// Factory to create swap chains for `device` with
///
/// The device's own factory wins over `enumerated`; they differ when the
/// device was created without an explicit adapter.
pub(crate) fn swap_chain_factory<T: Interface + Clone>(enumerated: &T, device: &D3d11Device) -> T {
    match device.dxgi_factory::<T>() {
        Ok(factory) => factory,
        Err(e) => {
            engine_debug!(SOURCE, "Device factory unavailable ({:?}), using the enumerated one", e);
            enumerated.clone()
        }
    }
}

pub(crate) fn hwnd(window: NativeWindow) -> HWND {
    HWND(window.0 as *mut std::ffi::c_void)
}

#[cfg(test)]
#[path = "d3d11_tests.rs"]
mod tests;
