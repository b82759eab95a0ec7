//! ddcctl — print and change a display's VCP values over DDC/CI.
//!
//! Thin external-collaborator CLI (spec.md §1 — "a CLI that prints a
//! device's values" is explicitly out of the core engine's scope).
//! Grounded on `ratbagctl-rs`'s `clap`-derive shape; unlike the engine
//! library, the binary is free to use `anyhow` for top-level error context.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use ddc_ci_core::{Client, Device, Verbosity};

/// ddcctl — inspect and control DDC/CI displays.
#[derive(Parser)]
#[command(name = "ddcctl", version, about)]
struct Cli {
    /// I2C device node to operate on, e.g. /dev/i2c-4. Omit to act on
    /// every enumerated device (only meaningful for `list`/`caps`).
    #[arg(long, global = true)]
    device: Option<String>,

    /// DDC/CI bus address override.
    #[arg(long, default_value_t = ddc_ci_core::I2C_ADDRESS_DDC_CI, global = true)]
    ddc_address: u8,

    /// EDID EEPROM address override.
    #[arg(long, default_value_t = ddc_ci_core::I2C_ADDRESS_EDID, global = true)]
    edid_address: u8,

    /// Verbosity: "overview" or "protocol" for increasingly detailed
    /// tracing output (in addition to whatever RUST_LOG already enables).
    #[arg(long, value_enum, default_value_t = VerbosityArg::None)]
    verbose: VerbosityArg,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Copy, Clone, clap::ValueEnum)]
enum VerbosityArg {
    None,
    Overview,
    Protocol,
}

impl From<VerbosityArg> for Verbosity {
    fn from(v: VerbosityArg) -> Self {
        match v {
            VerbosityArg::None => Verbosity::None,
            VerbosityArg::Overview => Verbosity::Overview,
            VerbosityArg::Protocol => Verbosity::Protocol,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List every enumerated display and its EDID identity.
    List,
    /// Print the raw capability string and parsed control table.
    Caps,
    /// Get a VCP control's current value and maximum.
    Get {
        /// VCP opcode in hex, e.g. 10 for brightness.
        opcode: String,
    },
    /// Set a VCP control's value.
    Set {
        /// VCP opcode in hex, e.g. 10 for brightness.
        opcode: String,
        /// New value.
        value: u16,
    },
    /// Reset a VCP control to its factory default.
    Reset {
        /// VCP opcode in hex, e.g. 10 for brightness.
        opcode: String,
    },
    /// Run the save-current-settings control and wait for EEPROM commit.
    Save,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let verbosity: Verbosity = cli.verbose.into();

    match &cli.command {
        Commands::List => cmd_list(verbosity),
        Commands::Caps => with_device(&cli, verbosity, cmd_caps),
        Commands::Get { opcode } => {
            let opcode = parse_opcode(opcode)?;
            with_device(&cli, verbosity, |device| cmd_get(device, opcode))
        }
        Commands::Set { opcode, value } => {
            let opcode = parse_opcode(opcode)?;
            let value = *value;
            with_device(&cli, verbosity, |device| cmd_set(device, opcode, value))
        }
        Commands::Reset { opcode } => {
            let opcode = parse_opcode(opcode)?;
            with_device(&cli, verbosity, |device| cmd_reset(device, opcode))
        }
        Commands::Save => with_device(&cli, verbosity, cmd_save),
    }
}

fn parse_opcode(s: &str) -> Result<u8> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
        .with_context(|| format!("'{s}' is not a valid hex VCP opcode"))
}

fn with_device(cli: &Cli, verbosity: Verbosity, f: impl FnOnce(&mut Device) -> Result<()>) -> Result<()> {
    let path = cli
        .device
        .as_deref()
        .context("this command requires --device /dev/i2c-N")?;
    let mut device = Device::open_with(path, cli.ddc_address, cli.edid_address, verbosity)
        .with_context(|| format!("failed to open {path}"))?;
    let result = f(&mut device);
    device.close().context("failed to close device cleanly")?;
    result
}

fn cmd_list(verbosity: Verbosity) -> Result<()> {
    let mut client = Client::new();
    client.set_verbosity(verbosity);
    let devices = client
        .get_devices()
        .context("failed to enumerate DDC/CI devices")?;
    for device in devices {
        let edid = device.edid();
        println!(
            "{:<14} {:<8} {}",
            edid.map(|e| e.pnp_id()).unwrap_or_else(|| "?".to_string()),
            format!("{:?}", device.kind()),
            device.model().unwrap_or("(no model)"),
        );
    }
    Ok(())
}

fn cmd_caps(device: &mut Device) -> Result<()> {
    let controls = device.ensure_controls().context("failed to read capabilities")?;
    println!("type:  {:?}", device.kind());
    println!("model: {}", device.model().unwrap_or("?"));
    for control in controls {
        let label = ddc_ci_core::opcode_label(control.opcode()).unwrap_or("?");
        if control.allowed_values().is_empty() {
            println!("  {:#04x}  {label}", control.opcode());
        } else {
            println!("  {:#04x}  {label}  allowed={:?}", control.opcode(), control.allowed_values());
        }
    }
    Ok(())
}

fn cmd_get(device: &mut Device, opcode: u8) -> Result<()> {
    device.ensure_controls().context("failed to read capabilities")?;
    let control = device
        .control(opcode)
        .cloned()
        .with_context(|| format!("display does not advertise VCP opcode {opcode:#04x}"))?;
    let (value, maximum) = control.request(device).context("failed to read VCP value")?;
    println!("{value} (max {maximum})");
    Ok(())
}

fn cmd_set(device: &mut Device, opcode: u8, value: u16) -> Result<()> {
    device.ensure_controls().context("failed to read capabilities")?;
    let control = device
        .control(opcode)
        .cloned()
        .with_context(|| format!("display does not advertise VCP opcode {opcode:#04x}"))?;
    control.set(device, value).context("failed to set VCP value")?;
    Ok(())
}

fn cmd_reset(device: &mut Device, opcode: u8) -> Result<()> {
    device.ensure_controls().context("failed to read capabilities")?;
    let control = device
        .control(opcode)
        .cloned()
        .with_context(|| format!("display does not advertise VCP opcode {opcode:#04x}"))?;
    control.reset(device).context("failed to reset VCP value")?;
    Ok(())
}

fn cmd_save(device: &mut Device) -> Result<()> {
    device.save().context("failed to save current settings")?;
    Ok(())
}
