//! Prints a device's EDID identity (PNP ID and MD5 fingerprint).
//!
//! Usage: `cargo run --example edid -- /dev/i2c-4`, or with no argument to
//! probe every device udev knows about (requires the `udev` feature).

use std::env::args;
use std::path::Path;

use ddc_ci_core::Device;

fn edid<P: AsRef<Path>>(path: P) {
    let path = path.as_ref();
    println!("Opening {}", path.display());

    match Device::open(path) {
        Ok(device) => {
            let edid = device.edid().expect("open() always populates the EDID");
            println!("PNP ID: {}", edid.pnp_id());
            println!("MD5:    {}", edid.md5_hex());
        }
        Err(err) => println!("Failure: {err}"),
    }
}

fn main() {
    let path = args().nth(1);

    match path {
        Some(path) => edid(path),
        #[cfg(feature = "udev")]
        None => ddc_ci_core::Enumerator::new()
            .expect("failed to enumerate DDC devices")
            .for_each(|p| edid(p)),
        #[cfg(not(feature = "udev"))]
        None => panic!("argument: i2c device path"),
    }
}
