//! NSO executable header and text segment extraction

use sha2::{Digest, Sha256};

use super::PatchError;

/// Size of the NSO header in bytes
pub const HEADER_SIZE: usize = 0x100;

const MAGIC: &[u8; 4] = b"NSO0";

/// Header flag bits for the text segment
pub mod flags {
    pub const TEXT_COMPRESS: u32 = 1 << 0;
    pub const TEXT_HASH: u32 = 1 << 3;
}

/// Location of a segment in the file and in memory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SegmentHeader {
    pub file_off: u32,
    pub memory_off: u32,
    pub size: u32,
}

/// Parsed NSO header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsoHeader {
    pub version: u32,
    pub flags: u32,
    pub text: SegmentHeader,
    pub module_name_off: u32,
    pub rodata: SegmentHeader,
    pub module_name_size: u32,
    pub data: SegmentHeader,
    pub bss_size: u32,
    pub build_id: [u8; 0x20],
    pub text_compressed_size: u32,
    pub rodata_compressed_size: u32,
    pub data_compressed_size: u32,
    pub text_hash: [u8; 0x20],
    pub rodata_hash: [u8; 0x20],
    pub data_hash: [u8; 0x20],
}

impl NsoHeader {
    /// Parse the header at the start of an NSO image
    pub fn parse(bytes: &[u8]) -> Result<Self, PatchError> {
        if bytes.len() < HEADER_SIZE {
            return Err(PatchError::Truncated {
                what: "header",
                needed: HEADER_SIZE,
                available: bytes.len(),
            });
        }
        if &bytes[..4] != MAGIC {
            return Err(PatchError::BadMagic([bytes[0], bytes[1], bytes[2], bytes[3]]));
        }

        let u32_at = |off: usize| u32::from_le_bytes([bytes[off], bytes[off + 1], bytes[off + 2], bytes[off + 3]]);
        let segment_at = |off: usize| SegmentHeader {
            file_off: u32_at(off),
            memory_off: u32_at(off + 4),
            size: u32_at(off + 8),
        };
        let hash_at = |off: usize| {
            let mut hash = [0u8; 0x20];
            hash.copy_from_slice(&bytes[off..off + 0x20]);
            hash
        };

        Ok(Self {
            version: u32_at(0x04),
            flags: u32_at(0x0C),
            text: segment_at(0x10),
            module_name_off: u32_at(0x1C),
            rodata: segment_at(0x20),
            module_name_size: u32_at(0x2C),
            data: segment_at(0x30),
            bss_size: u32_at(0x3C),
            build_id: hash_at(0x40),
            text_compressed_size: u32_at(0x60),
            rodata_compressed_size: u32_at(0x64),
            data_compressed_size: u32_at(0x68),
            text_hash: hash_at(0xA0),
            rodata_hash: hash_at(0xC0),
            data_hash: hash_at(0xE0),
        })
    }

    /// Build id as lowercase hex, with trailing zero bytes dropped
    pub fn build_id_hex(&self) -> String {
        let len = self
            .build_id
            .iter()
            .rposition(|&b| b != 0)
            .map_or(0, |last| last + 1);

        self.build_id[..len].iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Read the module name, if the image carries one
    pub fn module_name(&self, image: &[u8]) -> Option<String> {
        if self.module_name_size <= 1 {
            return None;
        }

        let start = self.module_name_off as usize;
        let end = start.checked_add(self.module_name_size as usize)?;
        let raw = image.get(start..end)?;
        let name = String::from_utf8_lossy(raw);
        Some(name.trim_matches('\0').to_string())
    }

    /// Extract the text segment, decompressing and verifying it as flagged
    pub fn text_segment(&self, image: &[u8]) -> Result<Vec<u8>, PatchError> {
        let start = self.text.file_off as usize;
        let stored_size = if self.flags & flags::TEXT_COMPRESS != 0 {
            self.text_compressed_size as usize
        } else {
            self.text.size as usize
        };

        let raw = start
            .checked_add(stored_size)
            .and_then(|end| image.get(start..end))
            .ok_or(PatchError::Truncated {
                what: "text segment",
                needed: start.saturating_add(stored_size),
                available: image.len(),
            })?;

        let text = if self.flags & flags::TEXT_COMPRESS != 0 {
            lz4_flex::block::decompress(raw, self.text.size as usize)
                .map_err(|e| PatchError::Decompress(e.to_string()))?
        } else {
            raw.to_vec()
        };

        if text.len() != self.text.size as usize {
            return Err(PatchError::SizeMismatch {
                expected: self.text.size as usize,
                actual: text.len(),
            });
        }

        if self.flags & flags::TEXT_HASH != 0 {
            let digest = Sha256::digest(&text);
            if digest.as_slice() != &self.text_hash[..] {
                return Err(PatchError::HashMismatch);
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build an NSO image around a text segment
    pub(crate) fn build_image(text: &[u8], compress: bool, hash: bool, build_id: &[u8]) -> Vec<u8> {
        let stored = if compress {
            lz4_flex::block::compress(text)
        } else {
            text.to_vec()
        };

        let name = b"main\0";
        let name_off = HEADER_SIZE as u32;
        let text_off = name_off + name.len() as u32;

        let mut flag_bits = 0;
        if compress {
            flag_bits |= flags::TEXT_COMPRESS;
        }
        if hash {
            flag_bits |= flags::TEXT_HASH;
        }

        let mut header = vec![0u8; HEADER_SIZE];
        let mut put = |off: usize, value: u32| header[off..off + 4].copy_from_slice(&value.to_le_bytes());
        put(0x0C, flag_bits);
        put(0x10, text_off);
        put(0x18, text.len() as u32);
        put(0x1C, name_off);
        put(0x2C, name.len() as u32);
        put(0x60, stored.len() as u32);
        header[..4].copy_from_slice(MAGIC);
        header[0x40..0x40 + build_id.len()].copy_from_slice(build_id);
        header[0xA0..0xC0].copy_from_slice(&Sha256::digest(text));

        let mut image = header;
        image.extend_from_slice(name);
        image.extend_from_slice(&stored);
        image
    }

    #[test]
    fn test_parse_header() {
        let image = build_image(&[0u8; 16], false, false, &[0xAB, 0xCD]);
        let header = NsoHeader::parse(&image).unwrap();

        assert_eq!(header.text.file_off, 0x105);
        assert_eq!(header.text.size, 16);
        assert_eq!(header.build_id_hex(), "abcd");
        assert_eq!(header.module_name(&image).as_deref(), Some("main"));
    }

    #[test]
    fn test_build_id_keeps_inner_zeros() {
        let image = build_image(&[0u8; 4], false, false, &[0x01, 0x00, 0x02, 0x00]);
        let header = NsoHeader::parse(&image).unwrap();

        assert_eq!(header.build_id_hex(), "010002");
    }

    #[test]
    fn test_bad_magic() {
        let mut image = build_image(&[0u8; 4], false, false, &[1]);
        image[0] = b'X';

        assert!(matches!(NsoHeader::parse(&image), Err(PatchError::BadMagic(_))));
    }

    #[test]
    fn test_short_header() {
        assert!(matches!(
            NsoHeader::parse(&[0u8; 0x20]),
            Err(PatchError::Truncated { what: "header", .. })
        ));
    }

    #[test]
    fn test_compressed_text() {
        let text: Vec<u8> = (0..256u32).flat_map(|i| (i % 7).to_le_bytes()).collect();
        let image = build_image(&text, true, true, &[1]);
        let header = NsoHeader::parse(&image).unwrap();

        assert_eq!(header.text_segment(&image).unwrap(), text);
    }

    #[test]
    fn test_hash_mismatch() {
        let text = vec![0x11u8; 64];
        let mut image = build_image(&text, false, true, &[1]);
        let last = image.len() - 1;
        image[last] ^= 0xFF;

        let header = NsoHeader::parse(&image).unwrap();
        assert!(matches!(header.text_segment(&image), Err(PatchError::HashMismatch)));
    }

    #[test]
    fn test_truncated_text() {
        let image = build_image(&[0u8; 64], false, false, &[1]);
        let header = NsoHeader::parse(&image).unwrap();

        let short = &image[..image.len() - 8];
        assert!(matches!(
            header.text_segment(short),
            Err(PatchError::Truncated { what: "text segment", .. })
        ));
    }
}
