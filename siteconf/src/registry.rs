// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Immutable registry of known presets and the options they accept.
//!
//! The registry is constructed once, before any profile is resolved, and is
//! only read afterwards. Resolvers own their registry, so tests can inject a
//! purpose-built one instead of the standard preset set.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::{
    key_path::KeyPath,
    theme::{LinkGroup, NavItem},
};

/// Preset bundling content plugins, analytics and stylesheets.
pub const PRESET_CLASSIC: &str = "classic";
/// Preset contributing navbar, footer and social card defaults.
pub const PRESET_THEME_CLASSIC: &str = "theme-classic";
/// Preset contributing syntax highlighting defaults.
pub const PRESET_PRISM: &str = "prism";
/// Standalone analytics preset overlapping the classic bundle.
pub const PRESET_GTAG: &str = "gtag";

/// Allowed policies for `blog.blogSidebarCount`.
pub const SIDEBAR_COUNT_POLICIES: &[&str] = &["paginated", "all"];
/// Allowed footer styles.
pub const FOOTER_STYLES: &[&str] = &["light", "dark"];

/// Value kind an option must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum OptionKind
{
    /// Non-empty string.
    String,
    /// Boolean flag.
    Bool,
    /// Non-negative integer.
    Integer,
    /// One of the listed strings.
    Choice(&'static [&'static str],),
    /// Ordered sequence of non-empty strings.
    Strings,
    /// Ordered sequence of navbar items.
    NavItems,
    /// Ordered sequence of footer link groups.
    LinkGroups,
}

impl OptionKind
{
    /// Returns `true` for kinds whose values are ordered sequences.
    pub fn is_sequence(self,) -> bool
    {
        matches!(self, Self::Strings | Self::NavItems | Self::LinkGroups)
    }

    /// Checks that `value` conforms to the kind.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason when the value does not conform.
    pub fn check(self, value: &Value,) -> Result<(), String,>
    {
        match self {
            Self::String => match value.as_str() {
                Some(text,) if !text.trim().is_empty() => Ok((),),
                Some(_,) => Err("must not be empty".to_owned(),),
                None => Err("expected a string".to_owned(),),
            },
            Self::Bool => {
                if value.is_boolean() {
                    Ok((),)
                } else {
                    Err("expected a boolean".to_owned(),)
                }
            }
            Self::Integer => {
                if value.is_u64() {
                    Ok((),)
                } else {
                    Err("expected a non-negative integer".to_owned(),)
                }
            }
            Self::Choice(allowed,) => match value.as_str() {
                Some(text,) if allowed.contains(&text,) => Ok((),),
                _ => Err(format!("expected one of: {}", allowed.join(", "))),
            },
            Self::Strings => {
                let items =
                    value.as_array().ok_or_else(|| "expected a sequence of strings".to_owned(),)?;
                for (index, item,) in items.iter().enumerate() {
                    match item.as_str() {
                        Some(text,) if !text.trim().is_empty() => {}
                        _ => return Err(format!("item {index} must be a non-empty string")),
                    }
                }
                Ok((),)
            }
            Self::NavItems => {
                let items: Vec<NavItem,> = serde_json::from_value(value.clone(),)
                    .map_err(|error| format!("expected a sequence of navbar items: {error}"),)?;
                items.iter().try_for_each(NavItem::check,)
            }
            Self::LinkGroups => {
                let groups: Vec<LinkGroup,> = serde_json::from_value(value.clone(),)
                    .map_err(|error| format!("expected a sequence of link groups: {error}"),)?;
                groups.iter().try_for_each(LinkGroup::check,)
            }
        }
    }
}

/// Declared option schema of a single preset.
///
/// # Examples
///
/// ```
/// use siteconf::{KeyPath, OptionKind, PresetSchema};
///
/// let schema = PresetSchema::new("search",)
///     .option("search.indexName", OptionKind::String,)
///     .option("search.contextual", OptionKind::Bool,);
/// assert_eq!(schema.kind_of(&KeyPath::parse("search.indexName",)), Some(OptionKind::String));
/// ```
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct PresetSchema
{
    name:    String,
    options: BTreeMap<KeyPath, OptionKind,>,
}

impl PresetSchema
{
    /// Creates an empty schema for the named preset.
    pub fn new<N,>(name: N,) -> Self
    where
        N: Into<String,>,
    {
        Self {
            name:    name.into(),
            options: BTreeMap::new(),
        }
    }

    /// Declares an option accepted by the preset.
    pub fn option(mut self, path: &str, kind: OptionKind,) -> Self
    {
        self.options.insert(KeyPath::parse(path,), kind,);
        self
    }

    /// Name under which the preset is registered.
    pub fn name(&self,) -> &str
    {
        &self.name
    }

    /// Returns the declared kind of the option at `path`.
    pub fn kind_of(&self, path: &KeyPath,) -> Option<OptionKind,>
    {
        self.options.get(path,).copied()
    }

    /// Iterates over declared options in path order.
    pub fn options(&self,) -> impl Iterator<Item = (&KeyPath, OptionKind,),> + '_
    {
        self.options.iter().map(|(path, kind,)| (path, *kind,),)
    }
}

/// Read-only lookup table of preset schemas keyed by preset name.
#[derive(Debug, Clone, Default, PartialEq, Eq,)]
pub struct PresetRegistry
{
    presets: BTreeMap<String, PresetSchema,>,
}

impl PresetRegistry
{
    /// Creates an empty registry.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Adds a preset schema, replacing any schema registered under the same
    /// name.
    pub fn with(mut self, schema: PresetSchema,) -> Self
    {
        self.presets.insert(schema.name.clone(), schema,);
        self
    }

    /// Looks up the schema of the named preset.
    pub fn get(&self, name: &str,) -> Option<&PresetSchema,>
    {
        self.presets.get(name,)
    }

    /// Iterates over registered preset names in sorted order.
    pub fn names(&self,) -> impl Iterator<Item = &str,> + '_
    {
        self.presets.keys().map(String::as_str,)
    }

    /// Builds the registry of presets shipped with the crate.
    pub fn standard() -> Self
    {
        Self::new().with(classic(),).with(theme_classic(),).with(prism(),).with(gtag(),)
    }
}

fn classic() -> PresetSchema
{
    PresetSchema::new(PRESET_CLASSIC,)
        .option("docs", OptionKind::Bool,)
        .option("docs.enabled", OptionKind::Bool,)
        .option("docs.routeBasePath", OptionKind::String,)
        .option("docs.sidebarPath", OptionKind::String,)
        .option("docs.editUrl", OptionKind::String,)
        .option("blog", OptionKind::Bool,)
        .option("blog.enabled", OptionKind::Bool,)
        .option("blog.routeBasePath", OptionKind::String,)
        .option("blog.blogSidebarTitle", OptionKind::String,)
        .option("blog.blogSidebarCount", OptionKind::Choice(SIDEBAR_COUNT_POLICIES,),)
        .option("blog.postsPerPage", OptionKind::Integer,)
        .option("blog.editUrl", OptionKind::String,)
        .option("blog.showReadingTime", OptionKind::Bool,)
        .option("gtag.trackingID", OptionKind::String,)
        .option("gtag.anonymizeIP", OptionKind::Bool,)
        .option("theme.customCss", OptionKind::Strings,)
}

fn theme_classic() -> PresetSchema
{
    PresetSchema::new(PRESET_THEME_CLASSIC,)
        .option("navbar.title", OptionKind::String,)
        .option("navbar.logo.alt", OptionKind::String,)
        .option("navbar.logo.src", OptionKind::String,)
        .option("navbar.items", OptionKind::NavItems,)
        .option("footer.style", OptionKind::Choice(FOOTER_STYLES,),)
        .option("footer.links", OptionKind::LinkGroups,)
        .option("footer.copyright", OptionKind::String,)
        .option("image", OptionKind::String,)
}

fn prism() -> PresetSchema
{
    PresetSchema::new(PRESET_PRISM,)
        .option("prism.theme", OptionKind::String,)
        .option("prism.darkTheme", OptionKind::String,)
        .option("prism.additionalLanguages", OptionKind::Strings,)
}

fn gtag() -> PresetSchema
{
    PresetSchema::new(PRESET_GTAG,)
        .option("gtag.trackingID", OptionKind::String,)
        .option("gtag.anonymizeIP", OptionKind::Bool,)
}
