//! Prints a device's raw capability string and parsed control table.
//!
//! Usage: `cargo run --example caps -- /dev/i2c-4`

use std::env::args;

use ddc_ci_core::Device;

fn main() {
    let path = args().nth(1).expect("argument: i2c device path");

    let mut device = Device::open(&path).expect("failed to open i2c device");
    let controls = device.ensure_controls().expect("failed to read capabilities");

    println!("type:  {:?}", device.kind());
    println!("model: {}", device.model().unwrap_or("?"));
    for control in controls {
        let label = ddc_ci_core::opcode_label(control.opcode()).unwrap_or("?");
        println!("  {:#04x}  {label}  allowed={:?}", control.opcode(), control.allowed_values());
    }
}
