//! Configuration Error Context Tests

use std::io;
use std::path::Path;

use edi_domain::error::{Error, Result};
use edi_infrastructure::config::AppConfig;
use edi_infrastructure::error_ext::{ConfigFileContext, ExtractContext};
use figment::Figment;
use figment::providers::{Format, Toml};

#[test]
fn test_io_failure_names_file_and_action() {
    let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");

    let result: Result<()> = Err(io_error).config_file_context("write", Path::new("/etc/edi.toml"));

    match result {
        Err(Error::Io { message, source }) => {
            assert_eq!(message, "Failed to write configuration file /etc/edi.toml");
            assert!(source.is_some());
        }
        other => panic!("Expected Io error, got {other:?}"),
    }
}

#[test]
fn test_extraction_failure_names_key() {
    let result: Result<AppConfig> = Figment::new()
        .merge(Toml::string("[logging]\njson_format = 3\n"))
        .extract()
        .extract_context(None);

    let err = result.unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
    assert!(err.to_string().contains("`logging.json_format`"));
}

#[test]
fn test_ok_passes_through() {
    let ok: std::result::Result<u8, io::Error> = Ok(7);
    assert_eq!(ok.config_file_context("read", Path::new("edi.toml")).unwrap(), 7);
}
