#![deny(missing_docs)]
#![doc(html_root_url = "http://arcnmx.github.io/ddc-rs/")]

//! Control displays using the DDC/CI protocol over Linux I2C character
//! devices.
//!
//! Three pieces compose, leaves first: [`Device`] owns one I2C file
//! descriptor and implements DDC/CI framing, timing, EDID retrieval, and
//! capability-string parsing; [`Control`] represents one VCP opcode bound
//! to a `Device`; [`Client`] enumerates `/dev/i2c-*` nodes, probes each
//! for a valid EDID, and offers lookup by EDID fingerprint.
//!
//! # Example
//!
//! ```rust,no_run
//! use ddc_ci_core::Client;
//!
//! let mut client = Client::new();
//! for device in client.get_devices().unwrap() {
//!     println!("{:?}", device.edid().map(|e| e.pnp_id()));
//!     for control in device.controls() {
//!         println!("  vcp {:#04x}", control.opcode());
//!     }
//! }
//! ```

mod caps;
mod client;
mod control;
mod delay;
mod device;
mod edid;
mod error;
#[cfg(feature = "udev")]
mod enumerate;
mod opcodes;
mod platform;
mod transport;
mod verbosity;

pub use caps::DeviceKind;
pub use client::Client;
pub use control::Control;
pub use device::{Device, I2C_ADDRESS_DDC_CI, I2C_ADDRESS_EDID};
pub use edid::Edid;
#[cfg(feature = "udev")]
pub use enumerate::Enumerator;
pub use error::{ClientError, ControlError, DeviceError};
pub use opcodes::label as opcode_label;
pub use transport::DdcTransport;
pub use verbosity::Verbosity;
