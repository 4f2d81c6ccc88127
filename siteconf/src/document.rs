//! Loading of named profiles from YAML documents.
//!
//! The resolver itself only accepts in-memory profiles. These helpers play
//! the part of the configuration loader for the command-line driver and for
//! tests that prefer writing profiles as YAML.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{self, Error},
    profile::Profile,
};

/// Document containing all deployment profiles of one site, keyed by name.
///
/// # Examples
///
/// ```
/// use siteconf::parse_profiles;
///
/// let yaml = r#"
/// profiles:
///   en:
///     title: Field Notes
///     tagline: I write code
///     faviconPath: img/favicon.ico
///     host: https://notes.example.org
///     basePath: /
///     organizationName: notes
///     projectName: blog
///     locales: [en]
/// "#;
/// let document = parse_profiles(yaml,)?;
/// assert_eq!(document.profiles.len(), 1);
/// # Ok::<(), siteconf::Error>(())
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
#[serde(deny_unknown_fields)]
pub struct ProfilesDocument
{
    /// Profiles keyed by deployment target name.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile,>,
}

/// Loads profiles from the provided YAML file path.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, the YAML cannot be
/// deserialized, or the document holds no profile.
pub fn load_profiles(path: &Path,) -> Result<ProfilesDocument, Error,>
{
    debug!("Reading profiles from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_profiles(&contents,)
}

/// Parses profiles from the provided YAML document string.
///
/// # Errors
///
/// Propagates [`Error::Parse`](Error::Parse) when the YAML cannot be decoded
/// and [`Error::Validation`](Error::Validation) when the document is empty or
/// a profile name is blank.
pub fn parse_profiles(contents: &str,) -> Result<ProfilesDocument, Error,>
{
    let document: ProfilesDocument = serde_yaml::from_str(contents,)?;
    if document.profiles.is_empty() {
        return Err(Error::validation("document must include at least one profile",),);
    }
    if document.profiles.keys().any(|name| name.trim().is_empty(),) {
        return Err(Error::validation("profile names cannot be empty",),);
    }
    debug!("Parsed {} profiles", document.profiles.len());
    Ok(document,)
}
