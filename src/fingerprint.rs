//! First-MiB content fingerprint
//!
//! Archives hold many multi-gigabyte files, so identity checks hash only a fixed
//! prefix of each file. The digest is MD5 so that fingerprints agree with those
//! already recorded for files in existing archives.

use crate::data_source::CfSource;
use crate::dataset::CfDataset;
use crate::errors::Result;
use md5::{Digest, Md5};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Number of leading bytes covered by the fingerprint
pub const FINGERPRINT_PREFIX_LEN: u64 = 1 << 20;

/// MD5 digest of a file prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentDigest(pub [u8; 16]);

impl ContentDigest {
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering
    pub fn to_hex(&self) -> String {
        let mut hex = String::with_capacity(32);
        for byte in self.0.iter() {
            hex.push_str(&format!("{byte:02x}"));
        }
        hex
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hashes the first [`FINGERPRINT_PREFIX_LEN`] bytes of the file at `path`, or the
/// whole file if it is shorter.
pub fn digest_file_prefix<P: AsRef<Path>>(path: P) -> Result<ContentDigest> {
    let path = path.as_ref();
    let mut prefix = Vec::with_capacity(FINGERPRINT_PREFIX_LEN as usize);
    File::open(path)?
        .take(FINGERPRINT_PREFIX_LEN)
        .read_to_end(&mut prefix)?;
    debug!(path = %path.display(), bytes = prefix.len(), "hashed file prefix");
    Ok(ContentDigest(Md5::digest(&prefix).into()))
}

impl<D: CfSource> CfDataset<D> {
    /// Digest of the first MiB of the file backing this dataset
    pub fn first_mib_digest(&self) -> Result<ContentDigest> {
        digest_file_prefix(self.source().file_path()?)
    }
}
