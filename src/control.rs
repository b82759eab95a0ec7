use crate::device::Device;
use crate::error::ControlError;
use crate::transport::DdcTransport;

/// One VCP opcode bound to a [`Device`], carrying the set of discrete
/// values the capability string advertised as permitted for it (empty
/// means any value in the control's range is accepted).
///
/// A `Control` owns no transport state of its own — every operation takes
/// the owning `Device` explicitly and routes through it, mirroring
/// `libddc_control_request`/`_set`/`_reset`/`_run`, which all take the
/// parent `LibddcDevice *` as an argument rather than holding one.
#[derive(Clone, Debug)]
pub struct Control {
    opcode: u8,
    allowed: Vec<u16>,
}

impl Control {
    pub(crate) fn new(opcode: u8, allowed: Vec<u16>) -> Self {
        Control { opcode, allowed }
    }

    /// The VCP opcode this control addresses.
    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    /// The discrete values the capability string allows, or an empty
    /// slice if any value in range is accepted.
    pub fn allowed_values(&self) -> &[u16] {
        &self.allowed
    }

    /// Returns `true` if `value` is acceptable for [`Control::set`].
    pub fn is_value_allowed(&self, value: u16) -> bool {
        self.allowed.is_empty() || self.allowed.contains(&value)
    }

    /// Sends a VCP feature request (`0x01`) and returns `(value, maximum)`
    /// from the reply. Grounded on `libddc_control_request`.
    pub fn request<T: DdcTransport>(&self, device: &mut Device<T>) -> Result<(u16, u16), ControlError> {
        device.vcp_request(self.opcode)
    }

    /// Sends a VCP feature set (`0x03`) with `value`, after checking it
    /// against [`Control::allowed_values`]. Grounded on
    /// `libddc_control_set`.
    pub fn set<T: DdcTransport>(&self, device: &mut Device<T>, value: u16) -> Result<(), ControlError> {
        if !self.is_value_allowed(value) {
            return Err(ControlError::InvalidValue {
                value,
                allowed: self.allowed.clone(),
            });
        }
        device.vcp_set(self.opcode, value)?;
        Ok(())
    }

    /// Sends a VCP feature reset (`0x09`). Grounded on
    /// `libddc_control_reset`.
    pub fn reset<T: DdcTransport>(&self, device: &mut Device<T>) -> Result<(), ControlError> {
        device.vcp_reset(self.opcode)?;
        Ok(())
    }

    /// Sends the opcode as a bare, single-byte DDC/CI-framed write.
    /// Grounded on `libddc_control_run`, which delegates to
    /// `libddc_device_write` with a one-byte payload rather than
    /// bypassing the wire framing.
    pub fn run<T: DdcTransport>(&self, device: &mut Device<T>) -> Result<(), ControlError> {
        device.vcp_run(self.opcode)?;
        Ok(())
    }
}
