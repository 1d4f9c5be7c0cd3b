//! Error context extension tests

use mgw_domain::error::Error;
use mgw_infrastructure::error_ext::ErrorContext;

fn io_failure() -> std::result::Result<(), std::io::Error> {
    Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))
}

#[test]
fn test_context_wraps_as_infrastructure() {
    let err = io_failure().context("Reading manifest").unwrap_err();
    match err {
        Error::Infrastructure { message, source } => {
            assert!(message.starts_with("Reading manifest"));
            assert!(message.contains("gone"));
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_with_context_is_lazy() {
    let ok: std::result::Result<u8, std::io::Error> = Ok(1);
    let value = ok
        .with_context(|| -> String { panic!("context must not be built on success") })
        .unwrap();
    assert_eq!(value, 1);
}

#[test]
fn test_config_context_wraps_as_configuration() {
    let err = io_failure().config_context("Loading config").unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}
