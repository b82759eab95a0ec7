//! VCP opcode to human-readable label lookup.
//!
//! Out of the DDC/CI framing engine's scope per spec.md §1(d) ("a simple
//! opcode→label lookup"): a convenience table for printing, not consulted
//! by anything in [`crate::device`] or [`crate::control`].

/// Looks up the conventional MCCS name for a VCP opcode, or `None` for an
/// opcode this table doesn't recognize (manufacturer-specific codes,
/// mostly).
pub fn label(opcode: u8) -> Option<&'static str> {
    TABLE.iter().find(|(code, _)| *code == opcode).map(|(_, name)| *name)
}

const TABLE: &[(u8, &str)] = &[
    (0x02, "New Control Value"),
    (0x03, "Soft Controls"),
    (0x04, "Restore Factory Defaults"),
    (0x05, "Restore Factory Brightness/Contrast Defaults"),
    (0x06, "Restore Factory Geometry Defaults"),
    (0x08, "Restore Color Defaults"),
    (0x0b, "Color Temperature Increment"),
    (0x0c, "Color Temperature Request"),
    (0x0e, "Clock"),
    (0x10, "Brightness"),
    (0x12, "Contrast"),
    (0x14, "Select Color Preset"),
    (0x16, "Video Gain (Red)"),
    (0x18, "Video Gain (Green)"),
    (0x1a, "Video Gain (Blue)"),
    (0x1e, "Auto Setup"),
    (0x20, "Horizontal Position"),
    (0x22, "Horizontal Size"),
    (0x24, "Horizontal Pincushion"),
    (0x26, "Horizontal Pincushion Balance"),
    (0x28, "Horizontal Convergence R/B"),
    (0x2a, "Horizontal Linearity"),
    (0x2c, "Horizontal Linearity Balance"),
    (0x30, "Vertical Position"),
    (0x32, "Vertical Size"),
    (0x34, "Vertical Pincushion"),
    (0x36, "Vertical Pincushion Balance"),
    (0x3a, "Vertical Linearity"),
    (0x3c, "Vertical Linearity Balance"),
    (0x3e, "Clock Phase"),
    (0x40, "Horizontal Parallelogram"),
    (0x41, "Vertical Parallelogram"),
    (0x42, "Horizontal Keystone"),
    (0x43, "Vertical Keystone"),
    (0x44, "Rotation"),
    (0x46, "Top Corner Flare"),
    (0x48, "Top Corner Hook"),
    (0x4a, "Bottom Corner Flare"),
    (0x4c, "Bottom Corner Hook"),
    (0x52, "Active Control"),
    (0x54, "Performance Preservation"),
    (0x56, "Horizontal Moire"),
    (0x58, "Vertical Moire"),
    (0x59, "6 Axis Saturation: Red"),
    (0x5a, "6 Axis Saturation: Yellow"),
    (0x5b, "6 Axis Saturation: Green"),
    (0x5c, "6 Axis Saturation: Cyan"),
    (0x5d, "6 Axis Saturation: Blue"),
    (0x5e, "6 Axis Saturation: Magenta"),
    (0x60, "Input Source"),
    (0x62, "Audio Speaker Volume"),
    (0x63, "Speaker Select"),
    (0x64, "Audio Microphone Volume"),
    (0x66, "Ambient Light Sensor"),
    (0x6c, "Video Black Level (Red)"),
    (0x6e, "Video Black Level (Green)"),
    (0x70, "Video Black Level (Blue)"),
    (0x72, "Gamma"),
    (0x73, "LUT Size"),
    (0x74, "Single Point LUT Operation"),
    (0x75, "Block LUT Operation"),
    (0x76, "Remote Procedure Call"),
    (0x78, "Display Identification Operation"),
    (0x7e, "Adjust Focal Length"),
    (0x82, "Horizontal Mirror"),
    (0x84, "Vertical Mirror"),
    (0x86, "Display Scaling"),
    (0x87, "Sharpness"),
    (0x88, "Velocity Scan Modulation"),
    (0x8a, "Color Saturation"),
    (0x8c, "TV Sharpness"),
    (0x8d, "TV Audio Mute"),
    (0x8e, "TV Contrast"),
    (0x90, "Hue"),
    (0x92, "TV Black Level"),
    (0x9a, "Window Position (Top Left X)"),
    (0x9b, "Window Position (Top Left Y)"),
    (0x9c, "Window Position (Bottom Right X)"),
    (0x9d, "Window Position (Bottom Right Y)"),
    (0x9e, "Window Control On/Off"),
    (0x9f, "Window Background"),
    (0xa2, "Auto Setup On/Off"),
    (0xac, "Horizontal Frequency"),
    (0xae, "Vertical Frequency"),
    (0xb0, "Settings"),
    (0xb2, "Flat Panel Sub-Pixel Layout"),
    (0xb4, "Source Timing Mode"),
    (0xb6, "Display Technology Type"),
    (0xc0, "Display Usage Time"),
    (0xc6, "Application Enable Key"),
    (0xc8, "Display Controller Type"),
    (0xc9, "Display Firmware Level"),
    (0xca, "OSD / Button Control"),
    (0xcc, "OSD Language"),
    (0xd6, "Power Mode"),
    (0xd7, "Auxiliary Power Output"),
    (0xda, "Scan Mode"),
    (0xdb, "Image Mode"),
    (0xdc, "Display Mode"),
    (0xde, "Scratch Pad"),
    (0xdf, "VCP Version"),
    (0xf5, "Application Report"),
    (0xf7, "Command Presence"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_opcode_resolves() {
        assert_eq!(label(0x10), Some("Brightness"));
        assert_eq!(label(0x60), Some("Input Source"));
    }

    #[test]
    fn unknown_opcode_is_none() {
        assert_eq!(label(0x01), None);
    }
}
