//! Unit tests for domain error types

use mgw_domain::Error;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("task 42");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "task 42"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_invalid_argument_error() {
    let error = Error::invalid_argument("title is empty");
    assert_eq!(error.to_string(), "Invalid argument: title is empty");
}

#[test]
fn test_database_error_display() {
    let error = Error::database("disk full");
    assert!(error.to_string().contains("disk full"));
}

#[test]
fn test_configuration_with_source_keeps_source() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let error = Error::configuration_with_source("cannot read config", io);
    assert!(std::error::Error::source(&error).is_some());
}
