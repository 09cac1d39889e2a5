use std::fs;
use std::path::Path;

use chatheat_core::{HeatmapError, MAX_UPLOAD_BYTES};

/// Uploads must be `.json` files.
pub fn check_file_name(path: &Path) -> Result<(), HeatmapError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if !file_name.ends_with(".json") {
        return Err(HeatmapError::InvalidFileType { file_name });
    }
    Ok(())
}

pub fn check_file_size(size: u64) -> Result<(), HeatmapError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(HeatmapError::FileTooLarge { size });
    }
    Ok(())
}

/// Validate and read an export file as UTF-8 text.
pub fn read_upload(path: &Path) -> Result<String, HeatmapError> {
    check_file_name(path)?;

    let metadata = fs::metadata(path).map_err(HeatmapError::Upload)?;
    check_file_size(metadata.len())?;

    let payload = fs::read_to_string(path).map_err(HeatmapError::Upload)?;
    tracing::debug!(path = %path.display(), bytes = payload.len(), "read export file");
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatheat_core::ErrorCode;
    use tempfile::TempDir;

    #[test]
    fn test_check_file_name() {
        assert!(check_file_name(Path::new("/tmp/conversations.json")).is_ok());

        let err = check_file_name(Path::new("/tmp/conversations.zip")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFileType);
        assert!(matches!(
            err,
            HeatmapError::InvalidFileType { ref file_name } if file_name == "conversations.zip"
        ));

        assert!(check_file_name(Path::new("/")).is_err());
    }

    #[test]
    fn test_check_file_size_limit() {
        assert!(check_file_size(MAX_UPLOAD_BYTES).is_ok());
        let err = check_file_size(MAX_UPLOAD_BYTES + 1).unwrap_err();
        assert_eq!(err.to_string(), "File size should be less than 10MB");
    }

    #[test]
    fn test_read_upload_returns_contents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conversations.json");
        fs::write(&path, "[]").unwrap();

        assert_eq!(read_upload(&path).unwrap(), "[]");
    }

    #[test]
    fn test_read_upload_missing_file_is_upload_error() {
        let tmp = TempDir::new().unwrap();
        let err = read_upload(&tmp.path().join("missing.json")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UploadError);
        assert_eq!(err.to_string(), "Error reading file");
    }

    #[test]
    fn test_read_upload_checks_name_before_reading() {
        let tmp = TempDir::new().unwrap();
        let err = read_upload(&tmp.path().join("missing.txt")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFileType);
    }

    #[test]
    fn test_read_upload_rejects_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("conversations.json");
        fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_upload(&path).unwrap_err();
        assert_eq!(err.code(), ErrorCode::UploadError);
    }
}
