use std::io;

use thiserror::Error;

/// Errors surfaced by [`crate::Client`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// `/sys/module/i2c_dev/srcversion` is absent, so the `i2c-dev` kernel
    /// module is not loaded and no `/dev/i2c-*` nodes can be trusted.
    #[error("the i2c-dev kernel module is not loaded (try `modprobe i2c-dev`)")]
    KernelModuleAbsent,

    /// Cold-plug probing opened zero devices.
    #[error("no DDC/CI capable devices were found")]
    NoDevices,

    /// No currently known device's EDID fingerprint matched.
    #[error("no device found with EDID fingerprint {0}")]
    NotFound(String),

    /// A per-device operation failed.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Errors surfaced by [`crate::Device`].
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The underlying I2C transport failed.
    #[error("i2c transaction failed")]
    Io(#[from] io::Error),

    /// The 128-byte EDID block at `offset` failed header or length
    /// validation.
    #[error("EDID block at i2c address {0:#04x} failed validation")]
    BadEdid(u16),

    /// The capability-string retry budget was exhausted before a complete
    /// reply was assembled.
    #[error("exhausted retry budget reading capability string at offset {0}")]
    CapabilityReadFailed(u16),

    /// The assembled capability string could not be parsed.
    #[error("failed to parse capability string: {0}")]
    CapabilityParseFailed(String),

    /// A DDC/CI reply violated the wire protocol in a way unrelated to
    /// capability retrieval (bad source address, bad checksum, short
    /// reply, ...).
    #[error("DDC/CI protocol violation: {0}")]
    Protocol(String),
}

/// Errors surfaced by [`crate::Control`].
#[derive(Debug, Error)]
pub enum ControlError {
    /// A DDC/CI reply to a control request violated the wire protocol.
    #[error("DDC/CI protocol violation: {0}")]
    Protocol(String),

    /// The display replied that this opcode is not supported
    /// (`supported == 0x01` in the VCP reply).
    #[error("VCP opcode {0:#04x} is not supported by this display")]
    Unsupported(u8),

    /// `value` is not one of the discrete values the capability string
    /// advertised for this control.
    #[error("{value} is not an allowed value for this control; permitted values: {allowed:?}")]
    InvalidValue {
        /// The value that was rejected.
        value: u16,
        /// The values the capability string actually allows.
        allowed: Vec<u16>,
    },

    /// The underlying device operation failed.
    #[error(transparent)]
    Device(#[from] DeviceError),
}

impl From<ControlError> for DeviceError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::Device(err) => err,
            other => DeviceError::Protocol(other.to_string()),
        }
    }
}
