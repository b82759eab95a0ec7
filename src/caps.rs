//! Parser for the DDC/CI capability string: a nested, parenthesized
//! `key(value)` grammar assembled from the `0xf3`/`0xe3` capability
//! request/reply chunks.
//!
//! Grounded on `libddc_device_parse_caps` and
//! `libddc_device_set_device_property` in `libddc-device.c`, reworked as a
//! small scan over `&str` instead of the original's in-place
//! null-terminator splitting.

/// The kind of display a capability string's `type` field describes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DeviceKind {
    /// `type(lcd)`.
    Lcd,
    /// `type(crt)`.
    Crt,
    /// Any other value, or a capability string with no `type` field.
    #[default]
    Unknown,
}

/// One VCP opcode advertised by a capability string, with the discrete
/// values it permits (empty meaning any value in the control's range is
/// allowed).
#[derive(Clone, Debug)]
pub struct ControlSpec {
    pub opcode: u8,
    pub allowed: Vec<u16>,
}

/// The parsed fields of a capability string that this crate cares about.
/// Unrecognized top-level keys (`prot`, `cmds`, vendor-specific fields,
/// ...) are silently ignored, matching the original's behavior.
#[derive(Clone, Debug, Default)]
pub struct Capabilities {
    pub kind: DeviceKind,
    pub model: Option<String>,
    pub controls: Vec<ControlSpec>,
}

/// Parses a raw capability string (including its enclosing `(...)`) into
/// [`Capabilities`].
pub fn parse(raw: &[u8]) -> Result<Capabilities, String> {
    let text = std::str::from_utf8(raw).map_err(|e| format!("capability string is not UTF-8: {e}"))?;
    let fields = top_level_fields(text)?;

    let mut result = Capabilities::default();
    for (key, value) in fields {
        match key {
            "type" => {
                result.kind = match value.trim() {
                    "lcd" => DeviceKind::Lcd,
                    "crt" => DeviceKind::Crt,
                    _ => DeviceKind::Unknown,
                };
            }
            "model" => result.model = Some(value.trim().to_string()),
            "vcp" => result.controls = parse_vcp(value)?,
            _ => {}
        }
    }
    Ok(result)
}

/// Splits a `(key(value)key(value)...)` string into its top-level
/// `(key, value)` pairs, tracking paren depth so a nested value like
/// `vcp(10 12 60(1 2 3))` is captured whole rather than split early.
fn top_level_fields(input: &str) -> Result<Vec<(&str, &str)>, String> {
    let bytes = input.as_bytes();
    if bytes.first() != Some(&b'(') {
        return Err("capability string must start with '('".to_string());
    }

    let mut fields = Vec::new();
    let mut depth: u32 = 0;
    let mut key_start = 1usize;
    let mut value_start = 0usize;

    for (i, &b) in bytes.iter().enumerate().skip(1) {
        match b {
            b'(' => {
                if depth == 0 {
                    value_start = i + 1;
                }
                depth += 1;
            }
            b')' => {
                if depth == 0 {
                    // Stray closing paren (typically the outer wrapper's
                    // own terminator) — nothing open to close.
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    let key = &input[key_start..value_start - 1];
                    let value = &input[value_start..i];
                    fields.push((key, value));
                    key_start = i + 1;
                }
            }
            _ => {}
        }
    }
    Ok(fields)
}

/// Parses a `vcp` field's value: whitespace-separated entries, each either
/// a bare hex opcode (`10`) or an opcode with an allowed-value list
/// (`60(1 3 11)`).
fn parse_vcp(value: &str) -> Result<Vec<ControlSpec>, String> {
    let bytes = value.as_bytes();
    let n = bytes.len();
    let mut entries = Vec::new();
    let mut i = 0;

    while i < n {
        while i < n && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= n {
            break;
        }

        let code_start = i;
        while i < n && bytes[i] != b'(' && !bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let code_str = &value[code_start..i];
        let opcode = u8::from_str_radix(code_str, 16)
            .map_err(|_| format!("invalid VCP opcode {code_str:?} in capability string"))?;

        let mut allowed = Vec::new();
        if i < n && bytes[i] == b'(' {
            let values_start = i + 1;
            let mut depth = 1u32;
            i += 1;
            while i < n && depth > 0 {
                match bytes[i] {
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ => {}
                }
                if depth > 0 {
                    i += 1;
                }
            }
            let values_str = &value[values_start..i];
            i += 1; // consume the closing ')'
            for tok in values_str.split_whitespace() {
                let v: u16 = tok
                    .parse()
                    .map_err(|_| format!("invalid VCP value {tok:?} for opcode {opcode:#04x}"))?;
                allowed.push(v);
            }
        }

        entries.push(ControlSpec { opcode, allowed });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_fields() {
        let caps = parse(b"(prot(monitor)type(lcd)model(ACME 2000)vcp(10 12 14))").unwrap();
        assert_eq!(caps.kind, DeviceKind::Lcd);
        assert_eq!(caps.model.as_deref(), Some("ACME 2000"));
        let opcodes: Vec<u8> = caps.controls.iter().map(|c| c.opcode).collect();
        assert_eq!(opcodes, vec![0x10, 0x12, 0x14]);
        assert!(caps.controls.iter().all(|c| c.allowed.is_empty()));
    }

    #[test]
    fn parses_nested_allowed_values() {
        let caps = parse(b"(type(lcd)vcp(10 60(1 3 11) 12))").unwrap();
        let sixty = caps.controls.iter().find(|c| c.opcode == 0x60).unwrap();
        assert_eq!(sixty.allowed, vec![1, 3, 11]);
        let ten = caps.controls.iter().find(|c| c.opcode == 0x10).unwrap();
        assert!(ten.allowed.is_empty());
    }

    #[test]
    fn ignores_unknown_fields() {
        let caps = parse(b"(prot(monitor)cmds(01 02 03)type(crt)vcp(10))").unwrap();
        assert_eq!(caps.kind, DeviceKind::Crt);
    }

    #[test]
    fn rejects_missing_leading_paren() {
        assert!(parse(b"type(lcd)vcp(10)").is_err());
    }
}
