use std::path::{Path, PathBuf};

use bininfo_core::DecodeError;
use esp_bininfo::{
    exit_code_for, file_metadata, load_image, load_scan_config, resolve_image_path, sha256_file,
    CliError, DEFAULT_IMAGE_PATH,
};
use tempfile::tempdir;

#[test]
fn sha256_file_matches_reference_digests() {
    let tmp = tempdir().expect("tempdir");
    let abc = tmp.path().join("abc.bin");
    std::fs::write(&abc, b"abc").unwrap();
    assert_eq!(
        sha256_file(&abc).unwrap(),
        "BA7816BF8F01CFEA414140DE5DAE2223B00361A396177A9CB410FF61F20015AD"
    );

    let empty = tmp.path().join("empty.bin");
    std::fs::write(&empty, b"").unwrap();
    assert_eq!(
        sha256_file(&empty).unwrap(),
        "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
    );
}

#[test]
fn sha256_file_streams_files_larger_than_buffer() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("big.bin");
    // One million 'a' bytes, a standard SHA-256 test vector.
    std::fs::write(&path, vec![b'a'; 1_000_000]).unwrap();
    assert_eq!(
        sha256_file(&path).unwrap(),
        "CDC76E5C9914FB9281A1C7E284D73E67F1809A48A497200E046D39CCC7112CD0"
    );
}

#[test]
fn resolve_image_path_defaults_to_build_output() {
    assert_eq!(resolve_image_path(None), PathBuf::from(DEFAULT_IMAGE_PATH));
    assert_eq!(resolve_image_path(Some(Path::new("x/fw.bin"))), PathBuf::from("x/fw.bin"));
}

#[test]
fn load_image_reports_missing_file_with_exit_code_2() {
    let tmp = tempdir().expect("tempdir");
    let err = load_image(&tmp.path().join("missing.bin")).unwrap_err();
    assert!(matches!(err.downcast_ref::<CliError>(), Some(CliError::NotFound(_))));
    assert_eq!(exit_code_for(&err), 2);
}

#[test]
fn decode_errors_map_to_exit_code_1() {
    let err: anyhow::Error = CliError::from(DecodeError::NoSegments).into();
    assert_eq!(exit_code_for(&err), 1);
    assert_eq!(err.to_string(), "segments decoding failed");
    assert_eq!(format!("{err:#}"), "segments decoding failed: No segments found in app image");

    let other = anyhow::anyhow!("disk on fire");
    assert_eq!(exit_code_for(&other), 1);
}

#[test]
fn file_metadata_reports_size_and_mtime() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("fw.bin");
    std::fs::write(&path, [0u8; 42]).unwrap();

    let meta = file_metadata(&path).unwrap();
    assert_eq!(meta.size, 42);
    assert_eq!(meta.path, path.display().to_string());
    let modified = meta.modified.expect("mtime");
    assert!(chrono::DateTime::parse_from_rfc3339(&modified).is_ok());
}

#[test]
fn load_scan_config_defaults_without_file() {
    let config = load_scan_config(None).unwrap();
    assert_eq!(config, bininfo_core::ScanConfig::default());
}
