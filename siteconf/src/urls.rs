// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Deployment URL resolution.
//!
//! Every generated link is derived from the two values computed here, so the
//! slash handling is deliberately strict: the canonical base path always
//! starts and ends with `/`, and the absolute site URL never contains a
//! doubled slash at the join between host and base path.

use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::error::Error;

/// Absolute site URL and canonical base path of one deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentUrls
{
    /// Host followed by the canonical base path.
    pub absolute_site_url:   String,
    /// Base path starting and ending with `/`.
    pub canonical_base_path: String,
}

/// Resolves the absolute site URL and canonical base path.
///
/// `organization_name` and `project_name` identify the deployment in logs.
///
/// # Errors
///
/// Returns [`Error::UrlResolution`](Error::UrlResolution) when `host` is not
/// an absolute `http`/`https` URL.
///
/// # Examples
///
/// ```
/// use siteconf::resolve_urls;
///
/// let urls = resolve_urls("https://example.org/", "blog", "example", "blog",)?;
/// assert_eq!(urls.canonical_base_path, "/blog/");
/// assert_eq!(urls.absolute_site_url, "https://example.org/blog/");
///
/// let urls = resolve_urls("https://example.org", "/", "example", "site",)?;
/// assert_eq!(urls.absolute_site_url, "https://example.org");
/// # Ok::<(), siteconf::Error>(())
/// ```
pub fn resolve_urls(
    host: &str,
    base_path: &str,
    organization_name: &str,
    project_name: &str,
) -> Result<DeploymentUrls, Error,>
{
    parse_host(host,).map_err(|reason| Error::UrlResolution {
        host: host.to_owned(),
        reason,
    },)?;

    let canonical_base_path = canonical_base_path(base_path,);
    let trimmed_host = host.trim().trim_end_matches('/',);
    let absolute_site_url = if canonical_base_path == "/" {
        trimmed_host.to_owned()
    } else {
        format!("{trimmed_host}{canonical_base_path}")
    };

    debug!(
        organization = organization_name,
        project = project_name,
        url = %absolute_site_url,
        "resolved deployment urls"
    );

    Ok(DeploymentUrls {
        absolute_site_url,
        canonical_base_path,
    },)
}

/// Normalizes a base path so that it starts and ends with `/`.
///
/// Empty segments collapse, so `""`, `"/"` and `"//"` all yield `/`.
pub fn canonical_base_path(base_path: &str,) -> String
{
    let segments: Vec<&str,> =
        base_path.split('/',).map(str::trim,).filter(|segment| !segment.is_empty(),).collect();
    if segments.is_empty() {
        "/".to_owned()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

/// Parses a host as an absolute `http`/`https` URL.
///
/// # Errors
///
/// Returns a human readable reason when the host is unusable as site origin.
pub fn parse_host(host: &str,) -> Result<Url, String,>
{
    let trimmed = host.trim();
    if trimmed.is_empty() {
        return Err("host cannot be empty".to_owned(),);
    }
    let url = Url::parse(trimmed,).map_err(|error| format!("not an absolute URL: {error}"),)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}', expected http or https", url.scheme()),);
    }
    if url.host_str().is_none_or(str::is_empty,) {
        return Err("URL has no host".to_owned(),);
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("host must not carry a query or fragment".to_owned(),);
    }
    Ok(url,)
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{canonical_base_path, parse_host, resolve_urls};
    use crate::error::Error;

    #[test]
    fn root_base_path_yields_bare_host()
    {
        let urls = resolve_urls("https://example.org", "/", "example", "site",)
            .expect("expected urls to resolve",);
        assert_eq!(urls.absolute_site_url, "https://example.org");
        assert_eq!(urls.canonical_base_path, "/");
    }

    #[test]
    fn relative_base_path_is_canonicalized()
    {
        let urls = resolve_urls("https://example.org/", "blog", "example", "blog",)
            .expect("expected urls to resolve",);
        assert_eq!(urls.canonical_base_path, "/blog/");
        assert_eq!(urls.absolute_site_url, "https://example.org/blog/");
    }

    #[test]
    fn trailing_host_slash_is_removed_for_root_base()
    {
        let urls = resolve_urls("https://jcyuyi.github.io/", "/", "jcyuyi", "blog",)
            .expect("expected urls to resolve",);
        assert_eq!(urls.absolute_site_url, "https://jcyuyi.github.io");
    }

    #[test]
    fn nested_base_path_collapses_empty_segments()
    {
        assert_eq!(canonical_base_path("//docs//v2/"), "/docs/v2/");
        assert_eq!(canonical_base_path(""), "/");
        assert_eq!(canonical_base_path(" / "), "/");
    }

    #[test]
    fn invalid_host_is_reported()
    {
        let error = resolve_urls("example.org", "/", "example", "site",)
            .expect_err("expected url failure",);
        match error {
            Error::UrlResolution {
                host,
                reason,
            } => {
                assert_eq!(host, "example.org");
                assert!(reason.starts_with("not an absolute URL"));
            }
            other => panic!("expected url resolution error, got {other:?}"),
        }
    }

    #[test]
    fn parse_host_rejects_unusable_origins()
    {
        assert!(parse_host("ftp://example.org",).is_err());
        assert!(parse_host("https://example.org/?preview=1",).is_err());
        assert!(parse_host("   ",).is_err());
        assert!(parse_host("https://example.org:8080",).is_ok());
    }

    proptest! {
        #[test]
        fn canonical_base_path_is_slash_delimited(input in "[a-z/ ]{0,24}") {
            let canonical = canonical_base_path(&input);
            prop_assert!(canonical.starts_with('/'));
            prop_assert!(canonical.ends_with('/'));
            prop_assert!(!canonical.contains("//"));
            prop_assert_eq!(canonical_base_path(&canonical), canonical.clone());
        }

        #[test]
        fn site_url_never_doubles_slashes(segment in "[a-z]{1,8}", slash in any::<bool>()) {
            let host = if slash { "https://example.org/" } else { "https://example.org" };
            let urls = resolve_urls(host, &segment, "example", "site").expect("valid host");
            prop_assert_eq!(urls.absolute_site_url, format!("https://example.org/{segment}/"));
        }
    }
}
