#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the resolver crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free while still
//! exposing a thoroughly documented error surface for library consumers.

use std::{
    fmt,
    path::{Path, PathBuf}
};

use serde::Serialize;

/// Single validation finding attached to a profile field.
///
/// The `field_path` addresses the offending value using dotted segments and
/// bracketed sequence indices, for example
/// `presets[0].options.blog.routeBasePath`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Location of the offending field inside the profile.
    pub field_path: String,
    /// Human readable explanation of the problem.
    pub reason:     String
}

impl Diagnostic {
    /// Creates a diagnostic for the provided field path.
    pub fn new<P, R>(field_path: P, reason: R) -> Self
    where
        P: Into<String>,
        R: Into<String>
    {
        Self {
            field_path: field_path.into(),
            reason:     reason.into()
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_path, self.reason)
    }
}

/// Ordered collection of diagnostics reported for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    /// Returns the diagnostics as a slice in discovery order.
    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    /// Returns the diagnostic reported for `field_path`, if any.
    pub fn find(&self, field_path: &str) -> Option<&Diagnostic> {
        self.0.iter().find(|diagnostic| diagnostic.field_path == field_path)
    }

    /// Consumes the collection and returns the underlying vector.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.0
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, diagnostic) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

/// Unified error type returned by the resolver, the document loader and CLI.
///
/// The first three variants form the resolution taxonomy: schema problems,
/// incompatible preset contributions and unusable deployment hosts. The
/// remaining variants are produced only while loading profile documents or
/// writing resolved output.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// A field is missing, mistyped, or an unknown preset/option key is used.
    #[error("invalid profile: {diagnostics}")]
    Schema {
        /// Field-level findings in discovery order.
        diagnostics: Diagnostics
    },
    /// Two option sources contribute incompatible values at one key path.
    #[error("conflicting values for option '{path}': {existing} from '{first}' cannot merge with {incoming} from '{second}'")]
    MergeConflict {
        /// Dotted key path where the conflict was detected.
        path:     String,
        /// Shape of the value already merged.
        existing: &'static str,
        /// Source that contributed the merged value.
        first:    String,
        /// Shape of the value being merged.
        incoming: &'static str,
        /// Source that contributed the incoming value.
        second:   String
    },
    /// The deployment host cannot be used as an absolute site URL.
    #[error("cannot resolve site url from host '{host}': {reason}")]
    UrlResolution {
        /// Host exactly as supplied by the profile.
        host:   String,
        /// Human readable explanation of the failure.
        reason: String
    },
    /// Wraps I/O errors that occur while reading profile documents.
    #[error("failed to read profiles from {path:?}: {source}")]
    Io {
        /// Location of the profiles document.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("failed to parse profiles: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when a profiles document violates invariants.
    #[error("invalid profiles document: {message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    },
    /// Wraps serialization errors when writing resolved output.
    #[error("failed to serialize resolved configuration: {source}")]
    Serialize {
        /// Underlying serialization error.
        source: serde_json::Error
    }
}

impl Error {
    /// Constructs a validation error from the provided displayable value.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Constructs a schema error holding a single diagnostic.
    ///
    /// # Parameters
    ///
    /// * `field_path` - Location of the offending field.
    /// * `reason` - Human-readable description of the problem.
    pub fn schema<P, R>(field_path: P, reason: R) -> Self
    where
        P: Into<String>,
        R: Into<String>
    {
        Self::Schema {
            diagnostics: Diagnostics(vec![Diagnostic::new(field_path, reason)])
        }
    }

    /// Returns the schema diagnostics carried by the error, if any.
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Self::Schema {
                diagnostics
            } => Some(diagnostics),
            _ => None
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

impl From<Diagnostics> for Error {
    fn from(diagnostics: Diagnostics) -> Self {
        Self::Schema {
            diagnostics
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Serialize {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the profiles document that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

#[cfg(test)]
mod tests {
    use super::{Diagnostic, Diagnostics, Error};

    #[test]
    fn validation_constructor_populates_message() {
        let error = Error::validation("something went wrong");
        match error {
            Error::Validation {
                ref message
            } => {
                assert_eq!(message, "something went wrong");
            }
            other => panic!("expected validation error, got {other:?}")
        }
    }

    #[test]
    fn to_display_string_matches_display() {
        let error = Error::validation("display me");
        assert_eq!(error.to_string(), error.to_display_string());
    }

    #[test]
    fn schema_constructor_exposes_single_diagnostic() {
        let error = Error::schema("locales", "must list at least one locale");
        let diagnostics = error.diagnostics().expect("expected schema diagnostics");
        assert_eq!(diagnostics.as_slice(), &[Diagnostic::new(
            "locales",
            "must list at least one locale"
        )]);
    }

    #[test]
    fn schema_display_joins_diagnostics() {
        let diagnostics = Diagnostics::from(vec![
            Diagnostic::new("title", "cannot be empty"),
            Diagnostic::new("host", "must be an absolute URL"),
        ]);
        let error = Error::from(diagnostics);
        assert_eq!(
            error.to_string(),
            "invalid profile: title: cannot be empty; host: must be an absolute URL"
        );
    }

    #[test]
    fn diagnostics_keep_discovery_order() {
        let diagnostics = Diagnostics::from(vec![
            Diagnostic::new("locales[1]", "duplicate locale 'en'"),
            Diagnostic::new("basePath", "must start and end with '/'"),
        ]);
        assert_eq!(
            diagnostics.find("basePath").map(|diagnostic| diagnostic.reason.as_str()),
            Some("must start and end with '/'")
        );

        let paths: Vec<String> = diagnostics
            .into_vec()
            .into_iter()
            .map(|diagnostic| diagnostic.field_path)
            .collect();
        assert_eq!(paths, vec!["locales[1]", "basePath"]);
    }

    #[test]
    fn io_error_helper_wraps_path_and_source() {
        let path = std::path::Path::new("/tmp/profiles.yaml");
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = super::io_error(path, io_error);

        match error {
            Error::Io {
                path: ref stored_path,
                ref source
            } => {
                assert_eq!(stored_path, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}")
        }
    }

    #[test]
    fn serde_yaml_conversion_maps_to_parse_variant() {
        let error = serde_yaml::from_str::<usize>("not-a-number").unwrap_err();
        let mapped: Error = error.into();
        assert!(matches!(mapped, Error::Parse { .. }));
    }

    #[test]
    fn merge_conflict_display_names_both_sources() {
        let error = Error::MergeConflict {
            path:     "theme.customCss".to_owned(),
            existing: "sequence",
            first:    "classic".to_owned(),
            incoming: "scalar",
            second:   "custom".to_owned()
        };
        assert_eq!(
            error.to_string(),
            "conflicting values for option 'theme.customCss': sequence from 'classic' cannot \
             merge with scalar from 'custom'"
        );
    }
}
