//! Resolver turning deployment profiles into canonical site configurations.
//!
//! A site is often deployed several times with small variations: another
//! locale, another base path, different analytics or theming. Each variation
//! is described by a [`Profile`]. The [`ConfigResolver`] validates a profile
//! against the [`PresetRegistry`], normalizes it, merges its presets, composes
//! the [`ThemeConfig`] and resolves deployment URLs, producing one immutable
//! [`ResolvedSiteConfig`] that downstream rendering consumes. Resolution is
//! pure; independent profiles can be resolved in parallel with
//! [`ConfigResolver::resolve_all`].

mod document;
mod error;
#[cfg(test)]
mod fixtures;
mod key_path;
mod merger;
mod normalizer;
mod profile;
mod registry;
mod resolver;
mod theme;
mod urls;
mod validator;

pub use document::{ProfilesDocument, load_profiles, parse_profiles};
pub use error::{Diagnostic, Diagnostics, Error, io_error};
pub use key_path::{KeyPath, Shape};
pub use merger::{MergedEntry, MergedOptions, OptionMerger, merge};
pub use normalizer::{BASELINE_SOURCE, NormalizedProfile, normalize};
pub use profile::{BrokenLinkPolicy, OptionBag, PresetRef, Profile, ThemeOverrides};
pub use registry::{
    FOOTER_STYLES, OptionKind, PRESET_CLASSIC, PRESET_GTAG, PRESET_PRISM, PRESET_THEME_CLASSIC,
    PresetRegistry, PresetSchema, SIDEBAR_COUNT_POLICIES,
};
pub use resolver::{ConfigResolver, ResolvedSiteConfig};
pub use theme::{
    CodeHighlighting, Footer, FooterLink, FooterStyle, LinkGroup, Logo, NavItem, NavItemPosition,
    Navbar, ThemeConfig, ThemeField, compose,
};
pub use urls::{DeploymentUrls, canonical_base_path, resolve_urls};
pub use validator::{Validation, Validator};
