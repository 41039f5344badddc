//! Utility functions for smart75.

use std::fs;
use std::path::Path;

use crate::error::{Result, Smart75Error};

/// Maximum record file size that can be read into memory (4 MB).
///
/// A challenge record is bounded by 75 daily logs per cycle and should be a
/// few kilobytes; anything near this limit is not a record we wrote.
pub const MAX_RECORD_SIZE: u64 = 4 * 1024 * 1024;

/// Read a file into a string with size limit protection.
///
/// Returns an error if the file exceeds `MAX_RECORD_SIZE` or cannot be read.
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| Smart75Error::storage(path, e))?;

    let size = metadata.len();
    if size > MAX_RECORD_SIZE {
        return Err(Smart75Error::serde(format!(
            "record file {} is too large ({} bytes, max {} bytes)",
            path.display(),
            size,
            MAX_RECORD_SIZE
        )));
    }

    fs::read_to_string(path).map_err(|e| Smart75Error::storage(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_read_to_string_limited_success() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("record.json");
        fs::write(&path, "{}").unwrap();

        let content = read_to_string_limited(&path).unwrap();
        assert_eq!(content, "{}");
    }

    #[test]
    fn test_read_to_string_limited_nonexistent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.json");

        assert!(read_to_string_limited(&path).is_err());
    }

    #[test]
    fn test_read_to_string_limited_too_large() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("huge.json");

        let mut file = fs::File::create(&path).unwrap();
        let chunk = vec![b'x'; 1024 * 1024];
        for _ in 0..5 {
            file.write_all(&chunk).unwrap();
        }

        let err = read_to_string_limited(&path).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }
}
