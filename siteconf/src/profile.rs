//! Profile types describing one deployment variant of a site.
//!
//! The types in this module mirror the structured data handed to the resolver
//! by configuration loaders. Field names follow the camelCase convention of
//! site configuration files while snake_case aliases are accepted so that
//! hand-written YAML remains forgiving. Option bags stay loosely typed here;
//! their shape is checked against the preset schema registry during
//! validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Nested option bag contributed by a preset reference.
pub type OptionBag = Map<String, Value,>;

/// Theme overrides keyed by theme field path, such as `footer.style`.
pub type ThemeOverrides = BTreeMap<String, Value,>;

/// One deployment-specific configuration input to the resolver.
///
/// # Examples
///
/// ```
/// use siteconf::Profile;
///
/// let yaml = r#"
/// title: Field Notes
/// tagline: I write code
/// faviconPath: img/favicon.ico
/// host: https://notes.example.org
/// basePath: /blog/
/// organizationName: notes
/// projectName: blog
/// locales: [en]
/// "#;
/// let profile: Profile = serde_yaml::from_str(yaml,).expect("valid profile",);
/// assert_eq!(profile.locales, vec!["en".to_owned()]);
/// assert!(profile.presets.is_empty());
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Profile
{
    /// Site title shown in the browser tab and used as navbar fallback.
    pub title: String,

    /// Short site description.
    pub tagline: String,

    /// Path of the favicon relative to the static directory.
    #[serde(alias = "favicon", alias = "favicon_path")]
    pub favicon_path: String,

    /// Production host of the site, for example `https://example.org`.
    #[serde(alias = "url")]
    pub host: String,

    /// Path under which the site is served, delimited by `/`.
    #[serde(alias = "baseUrl", alias = "base_path")]
    pub base_path: String,

    /// Account or organization that owns the deployment repository.
    #[serde(alias = "organization_name")]
    pub organization_name: String,

    /// Repository name of the deployment.
    #[serde(alias = "project_name")]
    pub project_name: String,

    /// Locale tags served by the site; the first entry is the default locale.
    pub locales: Vec<String,>,

    /// Ordered preset references contributing option defaults.
    #[serde(default)]
    pub presets: Vec<PresetRef,>,

    /// Profile-level theme overrides that win over preset contributions.
    #[serde(default, alias = "theme_overrides")]
    pub theme_overrides: ThemeOverrides,

    /// Reaction to broken links detected while rendering pages.
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "on_broken_links")]
    pub on_broken_links: Option<BrokenLinkPolicy,>,

    /// Reaction to broken links detected inside markdown sources.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "on_broken_markdown_links"
    )]
    pub on_broken_markdown_links: Option<BrokenLinkPolicy,>,
}

impl Profile
{
    /// Returns the default locale, which is the first declared locale.
    pub fn default_locale(&self,) -> Option<&str,>
    {
        self.locales.first().map(String::as_str,)
    }
}

/// Reference to a preset by name together with its options bag.
///
/// Option keys may be nested objects or dotted paths; `blog.routeBasePath`
/// and `{ blog: { routeBasePath } }` address the same option.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq,)]
#[serde(deny_unknown_fields)]
pub struct PresetRef
{
    /// Name registered in the preset schema registry.
    pub name: String,

    /// Options supplied to the preset.
    #[serde(default)]
    pub options: OptionBag,
}

impl PresetRef
{
    /// Creates a preset reference from a name and an options value.
    ///
    /// Non-object values produce an empty options bag.
    pub fn new<N,>(name: N, options: Value,) -> Self
    where
        N: Into<String,>,
    {
        let options = match options {
            Value::Object(map,) => map,
            _ => OptionBag::new(),
        };
        Self {
            name: name.into(),
            options,
        }
    }
}

/// Reaction applied when the renderer finds a broken link.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash,)]
#[serde(rename_all = "snake_case")]
pub enum BrokenLinkPolicy
{
    /// Silently ignore the broken link.
    Ignore,
    /// Record the broken link in build logs.
    Log,
    /// Emit a warning without failing the build.
    Warn,
    /// Fail the build.
    Throw,
}
