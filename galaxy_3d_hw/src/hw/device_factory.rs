/// Device factory
///
/// Opens the driver (factory + first adapter) and creates the logical device
/// and its immediate context, negotiating the feature level from a descending
/// candidate list with a single step-down retry.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hw::native::{
    Adapter, CreatedDevice, Device, DeviceContext, ExtendedFactory, Factory, GraphicsApi,
};
use crate::hw::types::{AdapterInfo, DeviceCreateFlags, DriverType, FeatureLevel};
use crate::{engine_info, engine_trace_release, engine_warn};

const SOURCE: &str = "galaxy3d::hw::device";

// ===== DRIVER OBJECTS =====

/// Driver factory and the adapter the device runs on
///
/// Fields are declared in release order.
pub struct DriverObjects {
    adapter: Box<dyn Adapter>,
    extended_factory: Option<Box<dyn ExtendedFactory>>,
    extended_factory_queried: bool,
    factory: Box<dyn Factory>,
}

impl DriverObjects {
    /// Create the driver factory and enumerate adapter 0
    ///
    /// Only the first adapter is considered; there is no multi-GPU selection.
    pub fn open(api: &dyn GraphicsApi) -> Result<Self> {
        let factory = api
            .create_factory()
            .map_err(|e| Error::InitializationFailed(format!("{} factory: {}", api.name(), e)))?;

        let adapter = factory
            .enum_adapter(0)
            .map_err(|e| Error::InitializationFailed(format!("adapter enumeration: {}", e)))?
            .ok_or(Error::NoAdapter)?;

        Ok(Self {
            adapter,
            extended_factory: None,
            extended_factory_queried: false,
            factory,
        })
    }

    pub fn factory(&self) -> &dyn Factory {
        self.factory.as_ref()
    }

    pub fn adapter(&self) -> &dyn Adapter {
        self.adapter.as_ref()
    }

    /// Extended factory owning the adapter, queried once and kept until release
    pub fn extended_factory(&mut self) -> Option<&dyn ExtendedFactory> {
        if !self.extended_factory_queried {
            self.extended_factory = self.adapter.extended_factory();
            self.extended_factory_queried = true;
        }
        self.extended_factory.as_deref()
    }

    /// Release adapter, extended factory and factory, in that order
    pub fn release(self) {
        let Self { adapter, extended_factory, factory, .. } = self;

        engine_trace_release!(SOURCE, "adapter");
        drop(adapter);
        if let Some(extended_factory) = extended_factory {
            engine_trace_release!(SOURCE, "extended factory");
            drop(extended_factory);
        }
        engine_trace_release!(SOURCE, "factory");
        drop(factory);
    }
}

// ===== DEVICE HANDLE =====

/// Logical device and immediate context
///
/// Exclusively owned by the device layer; the rest of the renderer borrows the
/// device and context through it. Fields are declared in release order.
pub struct DeviceHandle {
    context: Box<dyn DeviceContext>,
    device: Box<dyn Device>,
    feature_level: FeatureLevel,
    driver_type: DriverType,
    compute_shaders_supported: bool,
}

impl DeviceHandle {
    /// Create the device on `adapter`
    ///
    /// The full candidate list is tried first. On failure one retry is made
    /// without the highest level (older runtimes reject levels they do not
    /// know); a second failure is final.
    pub fn create(adapter: &dyn Adapter, config: &Config) -> Result<Self> {
        let driver_type = if config.force_reference_device {
            engine_warn!(SOURCE, "Creating the device on the reference rasterizer");
            DriverType::Reference
        } else {
            DriverType::Hardware
        };

        let flags = if config.enable_debug_layer {
            DeviceCreateFlags::DEBUG
        } else {
            DeviceCreateFlags::empty()
        };

        let created = create_with_fallback(adapter, driver_type, flags, &FeatureLevel::CANDIDATES)?;
        Ok(Self::from_created(created, driver_type))
    }

    fn from_created(created: CreatedDevice, driver_type: DriverType) -> Self {
        let CreatedDevice { device, context, feature_level } = created;

        let compute_shaders_supported = feature_level >= FeatureLevel::COMPUTE_SHADER_THRESHOLD
            || device.legacy_compute_shader_support();

        engine_info!(SOURCE, "Device created: feature level {} ({:?}), compute shaders {}",
            feature_level.name(), driver_type,
            if compute_shaders_supported { "available" } else { "unavailable" });

        Self {
            context,
            device,
            feature_level,
            driver_type,
            compute_shaders_supported,
        }
    }

    pub fn device(&self) -> &dyn Device {
        self.device.as_ref()
    }

    pub fn context(&self) -> &dyn DeviceContext {
        self.context.as_ref()
    }

    pub fn feature_level(&self) -> FeatureLevel {
        self.feature_level
    }

    pub fn driver_type(&self) -> DriverType {
        self.driver_type
    }

    /// Compute shaders with raw and structured buffers are available
    pub fn compute_shaders_supported(&self) -> bool {
        self.compute_shaders_supported
    }

    /// Release the context, then the device
    pub fn release(self) {
        let Self { context, device, .. } = self;

        engine_trace_release!(SOURCE, "device context");
        drop(context);
        engine_trace_release!(SOURCE, "device");
        drop(device);
    }
}

/// Create a device from `levels`, retrying once without the first entry
pub fn create_with_fallback(
    adapter: &dyn Adapter,
    driver_type: DriverType,
    flags: DeviceCreateFlags,
    levels: &[FeatureLevel],
) -> Result<CreatedDevice> {
    let Some((highest, lower)) = levels.split_first() else {
        return Err(Error::DeviceCreationFailed("no candidate feature level".to_string()));
    };

    match adapter.create_device(driver_type, flags, levels) {
        Ok(created) => Ok(created),
        Err(first_error) => {
            engine_warn!(SOURCE, "Device creation failed ({}), retrying without feature level {}",
                first_error, highest.name());

            if lower.is_empty() {
                return Err(Error::DeviceCreationFailed(first_error.to_string()));
            }
            adapter
                .create_device(driver_type, flags, lower)
                .map_err(|e| Error::DeviceCreationFailed(e.to_string()))
        }
    }
}

/// Write the adapter identification to the diagnostic log
pub fn log_adapter(info: &AdapterInfo) {
    engine_info!(SOURCE, "* GPU [vendor:{:X}]-[device:{:X}]: {}",
        info.vendor_id, info.device_id, info.name);
    engine_info!(SOURCE, "*   Texture memory: {} M",
        info.dedicated_video_memory / (1024 * 1024));
}

#[cfg(test)]
#[path = "device_factory_tests.rs"]
mod tests;
