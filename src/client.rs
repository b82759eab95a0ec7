use tracing::{debug, warn};

use crate::device::Device;
use crate::error::ClientError;
use crate::platform;
use crate::transport::LinuxI2cTransport;
use crate::verbosity::Verbosity;

const MAX_I2C_BUS: u32 = 16;

/// Owns every successfully opened [`Device`] on the system and offers
/// lookup by EDID fingerprint.
///
/// Grounded on `LibddcClient` in `libddc-client.c`: a one-shot cold-plug
/// probe populates the device list, after which `get_devices`/
/// `get_device_by_edid` just read it back.
#[derive(Default)]
pub struct Client {
    devices: Vec<Device<LinuxI2cTransport>>,
    has_coldplug: bool,
    verbosity: Verbosity,
}

impl Client {
    /// Creates an empty client. No I/O happens until [`Client::get_devices`]
    /// or [`Client::get_device_by_edid`] is called.
    pub fn new() -> Self {
        Client::default()
    }

    /// Sets the logging detail propagated to every [`Device`] opened from
    /// here on.
    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    /// Probes `/dev/i2c-0` through `/dev/i2c-15` in order, stopping at the
    /// first path that does not exist, and retains a [`Device`] for every
    /// one that opens successfully. A no-op after the first call.
    ///
    /// Grounded on `libddc_client_ensure_coldplug`: the kernel-module
    /// precondition check happens once up front, a failed `open()` on an
    /// individual node is logged and the node is skipped (not fatal), and
    /// the whole probe fails only if not a single device was retained.
    pub fn ensure_coldplug(&mut self) -> Result<(), ClientError> {
        if self.has_coldplug {
            return Ok(());
        }

        if !platform::kernel_module_loaded() {
            return Err(ClientError::KernelModuleAbsent);
        }

        for index in 0..MAX_I2C_BUS {
            let path = format!("/dev/i2c-{index}");
            if !std::path::Path::new(&path).exists() {
                break;
            }

            match Device::open_with(
                &path,
                crate::device::I2C_ADDRESS_DDC_CI,
                crate::device::I2C_ADDRESS_EDID,
                self.verbosity,
            ) {
                Ok(device) => {
                    if self.verbosity.overview() {
                        debug!(%path, "opened DDC/CI device");
                    }
                    self.devices.push(device);
                }
                Err(err) => {
                    if self.verbosity.overview() {
                        warn!(%path, error = %err, "failed to open candidate i2c device, skipping");
                    }
                }
            }
        }

        if self.devices.is_empty() {
            return Err(ClientError::NoDevices);
        }

        self.has_coldplug = true;
        Ok(())
    }

    /// Triggers the cold-plug probe if it hasn't run yet, then returns
    /// every retained device.
    pub fn get_devices(&mut self) -> Result<&[Device<LinuxI2cTransport>], ClientError> {
        self.ensure_coldplug()?;
        Ok(&self.devices)
    }

    /// Triggers the cold-plug probe if it hasn't run yet, then returns the
    /// device whose EDID MD5 fingerprint matches `edid_md5_hex`, or
    /// [`ClientError::NotFound`].
    pub fn get_device_by_edid(
        &mut self,
        edid_md5_hex: &str,
    ) -> Result<&mut Device<LinuxI2cTransport>, ClientError> {
        self.ensure_coldplug()?;
        self.devices
            .iter_mut()
            .find(|device| device.edid().map(|edid| edid.md5_hex() == edid_md5_hex).unwrap_or(false))
            .ok_or_else(|| ClientError::NotFound(edid_md5_hex.to_string()))
    }

    /// Closes every retained device in insertion order, matching
    /// `libddc_client_close`. Stops at the first failure.
    pub fn close(&mut self) -> Result<(), ClientError> {
        for device in &mut self.devices {
            device.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_client_has_no_devices_until_probed() {
        let client = Client::new();
        assert!(!client.has_coldplug);
        assert!(client.devices.is_empty());
    }
}
