use std::io;
use std::path::Path;

const I2C_DEV_SRCVERSION: &str = "/sys/module/i2c_dev/srcversion";

/// Whether the `i2c-dev` kernel module appears to be loaded.
///
/// Matches `libddc_client_ensure_coldplug`'s and `libddc_device_open`'s
/// precondition check: both independently stat this sysfs file before
/// trusting any `/dev/i2c-*` node.
pub(crate) fn kernel_module_loaded() -> bool {
    Path::new(I2C_DEV_SRCVERSION).exists()
}

pub(crate) fn check_kernel_module_loaded() -> io::Result<()> {
    if kernel_module_loaded() {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "the i2c-dev kernel module is not loaded (try `modprobe i2c-dev`)",
        ))
    }
}
