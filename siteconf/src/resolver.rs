//! Orchestration of the resolution pipeline.
//!
//! A profile flows through validation, normalization, preset merging, theme
//! composition and URL resolution, in that order. Validation failures stop
//! the pipeline before anything is derived, so callers receive either a
//! complete configuration or an error, never a partially resolved site.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    error::Error,
    merger::{MergedOptions, OptionMerger},
    normalizer::{BASELINE_SOURCE, normalize},
    profile::{BrokenLinkPolicy, OptionBag, Profile},
    registry::PresetRegistry,
    theme::{ThemeConfig, compose},
    urls::resolve_urls,
    validator::Validator,
};

/// Final, immutable configuration of one deployment.
///
/// Instances are only produced by [`ConfigResolver::resolve`]; any change
/// requires resolving the source profile again.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSiteConfig
{
    title:                    String,
    tagline:                  String,
    favicon_path:             String,
    organization_name:        String,
    project_name:             String,
    absolute_site_url:        String,
    canonical_base_path:      String,
    locales:                  Vec<String,>,
    default_locale:           String,
    on_broken_links:          BrokenLinkPolicy,
    on_broken_markdown_links: BrokenLinkPolicy,
    presets:                  Vec<String,>,
    preset_options:           BTreeMap<String, OptionBag,>,
    options:                  MergedOptions,
    theme:                    ThemeConfig,
}

impl ResolvedSiteConfig
{
    /// Site title.
    pub fn title(&self,) -> &str
    {
        &self.title
    }

    /// Site tagline.
    pub fn tagline(&self,) -> &str
    {
        &self.tagline
    }

    /// Favicon path.
    pub fn favicon_path(&self,) -> &str
    {
        &self.favicon_path
    }

    /// Organization owning the deployment.
    pub fn organization_name(&self,) -> &str
    {
        &self.organization_name
    }

    /// Project name of the deployment.
    pub fn project_name(&self,) -> &str
    {
        &self.project_name
    }

    /// Host followed by the canonical base path.
    pub fn absolute_site_url(&self,) -> &str
    {
        &self.absolute_site_url
    }

    /// Base path starting and ending with `/`.
    pub fn canonical_base_path(&self,) -> &str
    {
        &self.canonical_base_path
    }

    /// Locale tags in declaration order.
    pub fn locales(&self,) -> &[String]
    {
        &self.locales
    }

    /// Locale served at the site root.
    pub fn default_locale(&self,) -> &str
    {
        &self.default_locale
    }

    /// Reaction to broken page links.
    pub fn on_broken_links(&self,) -> BrokenLinkPolicy
    {
        self.on_broken_links
    }

    /// Reaction to broken markdown links.
    pub fn on_broken_markdown_links(&self,) -> BrokenLinkPolicy
    {
        self.on_broken_markdown_links
    }

    /// Preset names in declaration order.
    pub fn presets(&self,) -> &[String]
    {
        &self.presets
    }

    /// Merged option bags keyed by the preset that contributed them.
    pub fn preset_options(&self,) -> &BTreeMap<String, OptionBag,>
    {
        &self.preset_options
    }

    /// All merged options, baseline defaults included.
    pub fn options(&self,) -> &MergedOptions
    {
        &self.options
    }

    /// Resolved presentation settings.
    pub fn theme(&self,) -> &ThemeConfig
    {
        &self.theme
    }

    /// Returns the URL the given locale is served at.
    ///
    /// The default locale lives at the site URL; every other locale lives in
    /// a sub-directory named after its tag. Returns `None` for undeclared
    /// locales.
    pub fn locale_url(&self, tag: &str,) -> Option<String,>
    {
        if tag == self.default_locale {
            return Some(self.absolute_site_url.clone(),);
        }
        if !self.locales.iter().any(|locale| locale == tag,) {
            return None;
        }
        let root = self.absolute_site_url.trim_end_matches('/',);
        Some(format!("{root}/{tag}/"),)
    }
}

/// Resolver owning the preset schema registry used for every profile.
///
/// # Examples
///
/// ```
/// use siteconf::{ConfigResolver, Profile};
///
/// let profile: Profile = serde_yaml::from_str(
///     "title: Notes\ntagline: ''\nfaviconPath: favicon.ico\nhost: https://example.org/\n\
///      basePath: /notes/\norganizationName: example\nprojectName: notes\nlocales: [en]\n",
/// )
/// .unwrap();
/// let resolved = ConfigResolver::default().resolve(&profile,)?;
/// assert_eq!(resolved.absolute_site_url(), "https://example.org/notes/");
/// assert_eq!(resolved.theme().navbar.title, "Notes");
/// # Ok::<(), siteconf::Error>(())
/// ```
#[derive(Debug, Clone,)]
pub struct ConfigResolver
{
    registry: PresetRegistry,
}

impl Default for ConfigResolver
{
    fn default() -> Self
    {
        Self::new(PresetRegistry::standard(),)
    }
}

impl ConfigResolver
{
    /// Creates a resolver backed by `registry`.
    pub fn new(registry: PresetRegistry,) -> Self
    {
        Self {
            registry,
        }
    }

    /// Registry used to validate preset references.
    pub fn registry(&self,) -> &PresetRegistry
    {
        &self.registry
    }

    /// Resolves one profile into its final configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`](Error::Schema) when validation fails, which
    /// includes an unusable host reported at `host`, and
    /// [`Error::MergeConflict`](Error::MergeConflict) when presets contribute
    /// incompatible values.
    pub fn resolve(&self, profile: &Profile,) -> Result<ResolvedSiteConfig, Error,>
    {
        Validator::new(&self.registry,).validate(profile,).into_result()?;
        debug!(title = %profile.title, "profile passed validation");

        let normalized = normalize(profile,);
        let profile = normalized.profile();

        let options = profile
            .presets
            .iter()
            .try_fold(
                OptionMerger::new().layer(BASELINE_SOURCE, normalized.baseline(),)?,
                |merger, preset| merger.layer(&preset.name, &preset.options,),
            )?
            .finish();
        debug!(presets = profile.presets.len(), options = options.len(), "merged preset options");

        let theme = compose(&options, &profile.title, &profile.theme_overrides,)?;

        let urls = resolve_urls(
            &profile.host,
            &profile.base_path,
            &profile.organization_name,
            &profile.project_name,
        )?;

        let default_locale = profile.default_locale().unwrap_or_default().to_owned();
        info!(url = %urls.absolute_site_url, locale = %default_locale, "resolved site configuration");

        Ok(ResolvedSiteConfig {
            title: profile.title.clone(),
            tagline: profile.tagline.clone(),
            favicon_path: profile.favicon_path.clone(),
            organization_name: profile.organization_name.clone(),
            project_name: profile.project_name.clone(),
            absolute_site_url: urls.absolute_site_url,
            canonical_base_path: urls.canonical_base_path,
            locales: profile.locales.clone(),
            default_locale,
            on_broken_links: profile.on_broken_links.unwrap_or(BrokenLinkPolicy::Throw,),
            on_broken_markdown_links: profile.on_broken_markdown_links.unwrap_or(BrokenLinkPolicy::Warn,),
            presets: profile.presets.iter().map(|preset| preset.name.clone(),).collect(),
            preset_options: options.by_source(&[BASELINE_SOURCE],),
            options,
            theme,
        },)
    }

    /// Resolves named profiles in parallel.
    ///
    /// Each profile is resolved independently; a failure is reported under
    /// its name without affecting the others.
    pub fn resolve_all(
        &self,
        profiles: &BTreeMap<String, Profile,>,
    ) -> BTreeMap<String, Result<ResolvedSiteConfig, Error,>,>
    {
        profiles
            .par_iter()
            .map(|(name, profile,)| {
                let span = tracing::info_span!("profile", name = %name);
                let _entered = span.enter();
                (name.clone(), self.resolve(profile,),)
            },)
            .collect()
    }
}
