//! Physical device identification.

use ash::vk;
use std::ffi::CStr;

/// GPU vendor identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GpuVendor {
    Nvidia,
    Amd,
    Intel,
    Apple,
    Arm,
    Qualcomm,
    Other(u32),
}

impl GpuVendor {
    /// Identify vendor from PCI vendor ID.
    pub const fn from_vendor_id(id: u32) -> Self {
        match id {
            0x10DE => Self::Nvidia,
            0x1002 => Self::Amd,
            0x8086 => Self::Intel,
            0x106B => Self::Apple,
            0x13B5 => Self::Arm,
            0x5143 => Self::Qualcomm,
            other => Self::Other(other),
        }
    }
}

/// What the selected physical device reports about itself.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Device name
    pub name: String,
    /// GPU vendor
    pub vendor: GpuVendor,
    /// Discrete, integrated, virtual, CPU...
    pub device_type: vk::PhysicalDeviceType,
    /// Vulkan API version
    pub api_version: u32,
    /// Driver version
    pub driver_version: u32,
}

impl DeviceInfo {
    /// Query a physical device.
    ///
    /// # Safety
    /// The instance and physical device must be valid.
    pub unsafe fn query(instance: &ash::Instance, physical_device: vk::PhysicalDevice) -> Self {
        // SAFETY: caller guarantees both handles are valid
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        Self::from_properties(&properties)
    }

    /// Build from already fetched properties.
    pub fn from_properties(properties: &vk::PhysicalDeviceProperties) -> Self {
        let name = CStr::from_bytes_until_nul(bytes_of(&properties.device_name))
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            vendor: GpuVendor::from_vendor_id(properties.vendor_id),
            device_type: properties.device_type,
            api_version: properties.api_version,
            driver_version: properties.driver_version,
        }
    }

    /// Get a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "{} ({:?}, {:?}) - Vulkan {}.{}.{}",
            self.name,
            self.vendor,
            self.device_type,
            vk::api_version_major(self.api_version),
            vk::api_version_minor(self.api_version),
            vk::api_version_patch(self.api_version),
        )
    }
}

fn bytes_of(chars: &[std::ffi::c_char]) -> &[u8] {
    // SAFETY: c_char and u8 have the same size and alignment
    unsafe { std::slice::from_raw_parts(chars.as_ptr().cast::<u8>(), chars.len()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn properties(name: &str, vendor_id: u32) -> vk::PhysicalDeviceProperties {
        let mut properties = vk::PhysicalDeviceProperties {
            vendor_id,
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            api_version: vk::make_api_version(0, 1, 3, 250),
            ..Default::default()
        };
        for (dst, &src) in properties.device_name.iter_mut().zip(name.as_bytes()) {
            *dst = src as std::ffi::c_char;
        }
        properties
    }

    #[test]
    fn vendor_identification() {
        assert_eq!(GpuVendor::from_vendor_id(0x10DE), GpuVendor::Nvidia);
        assert_eq!(GpuVendor::from_vendor_id(0x1002), GpuVendor::Amd);
        assert_eq!(GpuVendor::from_vendor_id(0x8086), GpuVendor::Intel);
        assert_eq!(GpuVendor::from_vendor_id(0x5143), GpuVendor::Qualcomm);
        assert_eq!(GpuVendor::from_vendor_id(0x1234), GpuVendor::Other(0x1234));
    }

    #[test]
    fn info_from_properties() {
        let info = DeviceInfo::from_properties(&properties("Test GPU", 0x10DE));
        assert_eq!(info.name, "Test GPU");
        assert_eq!(info.vendor, GpuVendor::Nvidia);
        assert_eq!(
            info.summary(),
            "Test GPU (Nvidia, DISCRETE_GPU) - Vulkan 1.3.250"
        );
    }
}
