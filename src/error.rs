#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the static API generator."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! `non_shorthand_field_patterns` is allowed for the code generated by
//! [`masterror::Error`].
//!
//! Configuration variants abort a run before any artifact is produced. Every
//! other variant raised by a generator is scoped to that invocation and ends up
//! in the run report.

use std::path::{Path, PathBuf};

/// Unified error type returned by the configuration loader, the generators and
/// the CLI.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Returned when the configuration violates invariants or lacks a key a
    /// requested generator needs.
    #[error("invalid configuration: {message}")]
    Config {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps I/O errors that occur while reading the configuration file.
    #[error("failed to read configuration from {path:?}: {source}")]
    ConfigIo {
        /// Location of the configuration file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps JSON decoding errors of the configuration document.
    #[error("failed to parse configuration: {source}")]
    ConfigParse {
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// Upstream API answered with a non-success status code.
    #[error("upstream request for {resource} failed with status {status}: {message}")]
    Upstream {
        /// Route or identifier of the requested resource.
        resource: String,
        /// HTTP status code returned by the API.
        status:   u16,
        /// Message carried in the response body.
        message:  String
    },
    /// Upstream API could not be reached or returned an unreadable payload.
    #[error("upstream request for {resource} failed: {message}")]
    UpstreamPayload {
        /// Route or identifier of the requested resource.
        resource: String,
        /// Description of the transport or decoding failure.
        message:  String
    },
    /// Wraps I/O errors that occur while reading or writing artifacts.
    #[error("failed to access artifact at {path:?}: {source}")]
    Io {
        /// Location of the artifact.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// An existing artifact could not be decoded as JSON.
    #[error("failed to decode artifact at {path:?}: {source}")]
    Decode {
        /// Location of the artifact.
        path:   PathBuf,
        /// Source decoding error from serde_json.
        source: serde_json::Error
    },
    /// An artifact or the configuration could not be encoded as JSON.
    #[error("failed to serialize artifact: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    },
    /// The GitHub client could not be built.
    #[error("service error: {message}")]
    Service {
        /// Reason reported by the client builder.
        message: String
    },
    /// A spawned generation task panicked or was cancelled.
    #[error("generation task aborted: {message}")]
    Task {
        /// Description reported by the runtime.
        message: String
    }
}

impl Error {
    /// Constructs a configuration error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn config<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Config {
            message: message.into()
        }
    }

    /// Constructs a service error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the service error.
    pub fn service<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Service {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// This method is primarily intended for CLI contexts where the variant
    /// name does not add value to end users. The returned string matches the
    /// [`std::fmt::Display`] implementation.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Task {
            message: error.to_string()
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the artifact that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::ConfigIo`] variant capturing the failing path and
/// source.
pub fn config_io_error(path: &Path, source: std::io::Error) -> Error {
    Error::ConfigIo {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn config_constructor_populates_message() {
        let error = Error::config("something went wrong");
        match error {
            Error::Config {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected config error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::config("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/static/team.json");
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_json_conversion_maps_to_serialize_variant() {
        let invalid = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let mapped: Error = invalid.into();
        assert!(matches!(mapped, Error::Serialize { .. }));
    }

    #[test]
    fn upstream_error_reports_status_and_message() {
        let error = Error::Upstream {
            resource: "/orgs/acme/members".to_owned(),
            status:   404,
            message:  "Not Found".to_owned()
        };
        assert_eq!(
            error.to_string(),
            "upstream request for /orgs/acme/members failed with status 404: Not Found"
        );
    }

    #[tokio::test]
    async fn panicked_task_maps_to_task_variant() {
        let joined: Result<(), tokio::task::JoinError> =
            tokio::spawn(async { panic!("generator blew up") }).await;
        let error: Error = joined.unwrap_err().into();
        match error {
            Error::Task {
                message
            } => assert!(message.contains("panicked")),
            other => panic!("expected task error, got {other:?}")
        }
    }
}
