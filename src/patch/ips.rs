//! IPS patch encoding

use super::PatchError;

const HEADER: &[u8] = b"PATCH";
const FOOTER: &[u8] = b"EOF";

/// Largest offset a record can address (24 bits)
pub const MAX_OFFSET: u32 = 0x00FF_FFFF;

/// A single patch record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpsRecord {
    pub offset: u32,
    pub data: Vec<u8>,
}

/// An IPS patch: a list of byte replacements at file offsets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IpsPatch {
    records: Vec<IpsRecord>,
}

impl IpsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a record (builder pattern)
    pub fn with_record(mut self, offset: u32, data: impl Into<Vec<u8>>) -> Result<Self, PatchError> {
        let data = data.into();
        if offset > MAX_OFFSET {
            return Err(PatchError::OffsetOutOfRange(offset as usize));
        }
        if data.is_empty() || data.len() > u16::MAX as usize {
            return Err(PatchError::RecordSize(data.len()));
        }

        self.records.push(IpsRecord { offset, data });
        Ok(self)
    }

    pub fn records(&self) -> &[IpsRecord] {
        &self.records
    }

    /// Serialize the patch
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = HEADER.to_vec();
        for record in &self.records {
            out.extend_from_slice(&record.offset.to_be_bytes()[1..]);
            out.extend_from_slice(&(record.data.len() as u16).to_be_bytes());
            out.extend_from_slice(&record.data);
        }
        out.extend_from_slice(FOOTER);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_record() {
        let patch = IpsPatch::new()
            .with_record(0x0123_45, vec![0x01, 0x40, 0x20, 0x1E])
            .unwrap();

        let mut expected = b"PATCH".to_vec();
        expected.extend_from_slice(&[0x01, 0x23, 0x45, 0x00, 0x04, 0x01, 0x40, 0x20, 0x1E]);
        expected.extend_from_slice(b"EOF");
        assert_eq!(patch.to_bytes(), expected);
    }

    #[test]
    fn test_empty_patch() {
        assert_eq!(IpsPatch::new().to_bytes(), b"PATCHEOF".to_vec());
    }

    #[test]
    fn test_offset_out_of_range() {
        let result = IpsPatch::new().with_record(0x0100_0000, vec![0]);
        assert!(matches!(result, Err(PatchError::OffsetOutOfRange(0x0100_0000))));
    }

    #[test]
    fn test_record_size() {
        assert!(IpsPatch::new().with_record(0, Vec::new()).is_err());
        assert!(IpsPatch::new().with_record(0, vec![0u8; 0x1_0000]).is_err());
    }
}
