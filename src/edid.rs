use md5::{Digest, Md5};

/// Size of the EDID block read from i2c address `0x50`.
pub const EDID_LEN: usize = 128;

/// The fixed 8-byte EDID header every valid block starts with.
pub const EDID_HEADER: [u8; 8] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00];

/// A validated 128-byte EDID block read from a display.
///
/// Grounded on `libddc_device_ensure_edid`: header check, MD5 fingerprint
/// over the whole block, and the PNP ID packed into bytes 8-11.
#[derive(Clone)]
pub struct Edid {
    bytes: [u8; EDID_LEN],
}

impl Edid {
    /// Validates `bytes` as an EDID block, returning `None` if the header
    /// signature doesn't match.
    pub fn parse(bytes: [u8; EDID_LEN]) -> Option<Self> {
        if bytes[..EDID_HEADER.len()] == EDID_HEADER {
            Some(Edid { bytes })
        } else {
            None
        }
    }

    /// The raw 128-byte block.
    pub fn bytes(&self) -> &[u8; EDID_LEN] {
        &self.bytes
    }

    /// MD5 fingerprint of the whole block, as lowercase hex. Used by
    /// [`crate::Client::get_device_by_edid`] to identify a display
    /// independent of which `/dev/i2c-N` it happens to be on.
    pub fn md5_hex(&self) -> String {
        let digest = Md5::digest(self.bytes);
        digest.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// The manufacturer PNP ID, e.g. `"SAM0D4E"` for a Samsung panel.
    ///
    /// Three letters are packed 5 bits each across bytes 8-9, then the
    /// product code (bytes 10-11) is appended as two hex bytes in
    /// high-byte-last order: `sprintf("%c%c%c%02X%02X", l1, l2, l3,
    /// edid[11], edid[10])` in the original source.
    pub fn pnp_id(&self) -> String {
        let b8 = self.bytes[8];
        let b9 = self.bytes[9];
        let l1 = ((b8 >> 2) & 0x1f) + b'A' - 1;
        let l2 = (((b8 & 0x3) << 3) | (b9 >> 5)) + b'A' - 1;
        let l3 = (b9 & 0x1f) + b'A' - 1;
        format!(
            "{}{}{}{:02X}{:02X}",
            l1 as char, l2 as char, l3 as char, self.bytes[11], self.bytes[10]
        )
    }
}

impl std::fmt::Debug for Edid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Edid")
            .field("pnp_id", &self.pnp_id())
            .field("md5", &self.md5_hex())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_with(b8: u8, b9: u8, b10: u8, b11: u8) -> [u8; EDID_LEN] {
        let mut bytes = [0u8; EDID_LEN];
        bytes[..8].copy_from_slice(&EDID_HEADER);
        bytes[8] = b8;
        bytes[9] = b9;
        bytes[10] = b10;
        bytes[11] = b11;
        bytes
    }

    #[test]
    fn rejects_bad_header() {
        let mut bytes = [0u8; EDID_LEN];
        bytes[0] = 0x01;
        assert!(Edid::parse(bytes).is_none());
    }

    #[test]
    fn accepts_valid_header() {
        let edid = Edid::parse(block_with(0, 0, 0, 0)).unwrap();
        assert_eq!(edid.bytes()[..8], EDID_HEADER);
    }

    #[test]
    fn pnp_id_samsung() {
        // "SAM" packs as: S=19 A=1 M=13 (1-indexed letters)
        // l1 = (b8>>2)&0x1f = 19 -> b8 bits 7..2 hold 19 -> b8 = 19<<2 = 0x4c (plus low 2 bits feed l2)
        // l2 = ((b8&3)<<3)|(b9>>5) = 1 -> choose b8 low2=0, b9>>5=1 -> b9 top3 bits = 0b001
        // l3 = b9&0x1f = 13
        let b8 = 19u8 << 2;
        let b9 = (0b001u8 << 5) | 13;
        let edid = Edid::parse(block_with(b8, b9, 0x4e, 0x0d)).unwrap();
        let pnp = edid.pnp_id();
        assert_eq!(&pnp[..3], "SAM");
        assert_eq!(&pnp[3..], "0D4E");
    }

    #[test]
    fn md5_is_deterministic() {
        let edid = Edid::parse(block_with(1, 2, 3, 4)).unwrap();
        assert_eq!(edid.md5_hex(), edid.clone().md5_hex());
        assert_eq!(edid.md5_hex().len(), 32);
    }
}
