/// How much detail a [`crate::Client`]/[`crate::Device`] emits through
/// `tracing` while it works.
///
/// This stands in for `libddc`'s old `g_debug`/`g_warning`-driven verbose
/// flag: instead of a bespoke print function, each level gates a
/// `tracing` level, so a caller gets the same detail back by setting
/// `RUST_LOG` rather than threading a verbosity argument through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// No lifecycle logging beyond `tracing`'s default (`warn!`/`error!`).
    #[default]
    None,
    /// High-level lifecycle events: device open/close, capability chunk
    /// progress, startup handshake outcome.
    Overview,
    /// Everything `Overview` logs, plus a hex dump of every raw I2C
    /// buffer sent or received.
    Protocol,
}

impl Verbosity {
    /// True at `Overview` or above.
    pub fn overview(self) -> bool {
        self >= Verbosity::Overview
    }

    /// True at `Protocol`.
    pub fn protocol(self) -> bool {
        self >= Verbosity::Protocol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        assert!(Verbosity::None < Verbosity::Overview);
        assert!(Verbosity::Overview < Verbosity::Protocol);
        assert!(Verbosity::Protocol.overview());
        assert!(Verbosity::Protocol.protocol());
        assert!(!Verbosity::None.overview());
    }
}
