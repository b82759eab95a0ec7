//! Reads the MCCS version and current input source over DDC/CI.
//!
//! Usage: `cargo run --example vcp -- /dev/i2c-4`

use std::env::args;

use ddc_ci_core::Device;

fn main() {
    let path = args().nth(1).expect("argument: i2c device path");

    let mut device = Device::open(&path).expect("failed to open i2c device");
    device.ensure_controls().expect("failed to read capabilities");

    if let Some(mccs_version) = device.control(0xdf).cloned() {
        let (_, maximum) = mccs_version.request(&mut device).expect("failed to read VCP value");
        println!("MCCS version is {maximum:04x}");
    } else {
        println!("MCCS version (0xdf) not advertised by this display");
    }

    if let Some(input) = device.control(0x60).cloned() {
        let (value, maximum) = input.request(&mut device).expect("failed to read VCP value");
        println!("input is {value} (max {maximum})");
    } else {
        println!("input source (0x60) not advertised by this display");
    }
}
