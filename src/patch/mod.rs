//! Firmware patch lifting the master volume clamp
//!
//! Stock audio firmware clamps the master volume to `[0, 1]`, which makes
//! every slider position above unity sound the same. The patch replaces
//! the clamping `fcsel` with `fmov s1, s0` and is emitted as an IPS file
//! named after the module's build id.

mod arm64;
mod ips;
mod nso;

pub use arm64::{decode, find_clamp, FpReg, FpWidth, Instruction};
pub use ips::{IpsPatch, IpsRecord};
pub use nso::{NsoHeader, SegmentHeader, HEADER_SIZE};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// `fmov s1, s0`, little-endian
pub const CLAMP_REPLACEMENT: [u8; 4] = [0x01, 0x40, 0x20, 0x1E];

/// Errors from building the clamp patch
#[derive(Debug, Error)]
pub enum PatchError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{what} is truncated: need {needed} bytes, have {available}")]
    Truncated {
        what: &'static str,
        needed: usize,
        available: usize,
    },

    #[error("not an NSO image (magic {0:02x?})")]
    BadMagic([u8; 4]),

    #[error("text segment failed to decompress: {0}")]
    Decompress(String),

    #[error("text segment is {actual} bytes, header says {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("text segment hash does not match the header")]
    HashMismatch,

    #[error("volume clamp not found, or found more than once")]
    ClampNotFound,

    #[error("offset {0:#x} does not fit in an IPS record")]
    OffsetOutOfRange(usize),

    #[error("IPS record of {0} bytes is not allowed")]
    RecordSize(usize),
}

/// A located clamp and the patch removing it
#[derive(Debug, Clone)]
pub struct ClampPatch {
    pub build_id: String,
    pub module_name: Option<String>,
    /// Offset of the clamp inside the decompressed text segment
    pub text_offset: usize,
    pub patch: IpsPatch,
}

impl ClampPatch {
    /// File name the patch loader expects
    pub fn file_name(&self) -> String {
        format!("{}.ips", self.build_id)
    }
}

/// Locate the clamp in an NSO image and build the patch
pub fn patch_image(image: &[u8]) -> Result<ClampPatch, PatchError> {
    let header = NsoHeader::parse(image)?;
    let text = header.text_segment(image)?;
    let text_offset = find_clamp(&text).ok_or(PatchError::ClampNotFound)?;

    // Patch offsets count from the start of the uncompressed image,
    // header included
    let offset = text_offset + HEADER_SIZE;
    let offset = u32::try_from(offset).map_err(|_| PatchError::OffsetOutOfRange(offset))?;
    let patch = IpsPatch::new().with_record(offset, CLAMP_REPLACEMENT.to_vec())?;

    Ok(ClampPatch {
        build_id: header.build_id_hex(),
        module_name: header.module_name(image),
        text_offset,
        patch,
    })
}

/// Read an NSO file and write its clamp patch
///
/// The patch goes into `out_dir`, or next to the input when `None`.
/// Returns the patch and the path it was written to.
pub fn write_patch(input: &Path, out_dir: Option<&Path>) -> Result<(ClampPatch, PathBuf), PatchError> {
    let image = fs::read(input).map_err(|source| PatchError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let clamp = patch_image(&image)?;
    log::debug!(
        "clamp at text offset {:#x} in build {}",
        clamp.text_offset,
        clamp.build_id
    );

    let dir = match out_dir {
        Some(dir) => dir.to_path_buf(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let dest = dir.join(clamp.file_name());

    fs::write(&dest, clamp.patch.to_bytes()).map_err(|source| PatchError::Io {
        path: dest.clone(),
        source,
    })?;

    Ok((clamp, dest))
}
