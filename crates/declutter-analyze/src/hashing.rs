//! Streaming content fingerprints.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use blake3::Hasher;

use declutter_core::{Fingerprint, ScanError};

/// Read chunk size for hashing. Bounds memory use regardless of file size.
pub const HASH_CHUNK_SIZE: usize = 64 * 1024;

/// Compute the BLAKE3 fingerprint of a file's full byte stream.
///
/// The file is read in [`HASH_CHUNK_SIZE`] chunks; arbitrarily large files
/// never get loaded into memory at once. Fails if the file cannot be
/// opened or a read fails mid-stream.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, ScanError> {
    let mut file = File::open(path).map_err(|e| ScanError::io(path, e))?;
    let mut hasher = Hasher::new();
    let mut buffer = vec![0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| ScanError::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(Fingerprint::new(*hasher.finalize().as_bytes()))
}
