//! Schema validation of a single profile prior to normalization and merge.
//!
//! Validation is a pure check: it never changes the profile and collects
//! every finding in one pass so authors can fix all problems at once. Values
//! are judged after trimming surrounding whitespace, which is exactly what
//! the normalizer removes later.

use std::{
    collections::HashSet,
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    error::{Diagnostic, Diagnostics, Error},
    key_path::{KeyPath, flatten},
    normalizer::BASELINE_SOURCE,
    profile::{PresetRef, Profile},
    registry::PresetRegistry,
    theme::ThemeField,
    urls::parse_host,
};

/// Primary language subtag followed by optional script/region/variant subtags.
static LOCALE_TAG: LazyLock<Regex,> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(?:-[A-Za-z0-9]{2,8})*$",).expect("locale pattern is valid",)
},);

/// Outcome of validating a profile.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub enum Validation
{
    /// The profile satisfies the schema.
    Ok,
    /// The profile violates the schema; findings are in discovery order.
    Invalid(Vec<Diagnostic,>,),
}

impl Validation
{
    /// Returns `true` when no diagnostic was reported.
    pub fn is_ok(&self,) -> bool
    {
        matches!(self, Self::Ok)
    }

    /// Returns the reported diagnostics; empty for valid profiles.
    pub fn diagnostics(&self,) -> &[Diagnostic]
    {
        match self {
            Self::Ok => &[],
            Self::Invalid(diagnostics,) => diagnostics,
        }
    }

    /// Converts the outcome into a result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`](Error::Schema) carrying every diagnostic when
    /// the profile is invalid.
    pub fn into_result(self,) -> Result<(), Error,>
    {
        match self {
            Self::Ok => Ok((),),
            Self::Invalid(diagnostics,) => Err(Error::from(Diagnostics::from(diagnostics,),),),
        }
    }
}

/// Validator bound to a preset schema registry.
#[derive(Debug, Clone, Copy,)]
pub struct Validator<'registry,>
{
    registry: &'registry PresetRegistry,
}

impl<'registry,> Validator<'registry,>
{
    /// Creates a validator that resolves preset names against `registry`.
    pub fn new(registry: &'registry PresetRegistry,) -> Self
    {
        Self {
            registry,
        }
    }

    /// Validates every field of `profile`.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteconf::{PresetRegistry, Profile, Validator};
    ///
    /// let profile: Profile = serde_yaml::from_str(
    ///     "title: Notes\ntagline: ''\nfaviconPath: favicon.ico\nhost: https://example.org\n\
    ///      basePath: /\norganizationName: example\nprojectName: notes\nlocales: []\n",
    /// )
    /// .unwrap();
    /// let registry = PresetRegistry::standard();
    /// let validation = Validator::new(&registry,).validate(&profile,);
    /// assert_eq!(validation.diagnostics()[0].field_path, "locales");
    /// ```
    pub fn validate(&self, profile: &Profile,) -> Validation
    {
        let mut diagnostics = Vec::new();

        require_text(&profile.title, "title", &mut diagnostics,);
        require_text(&profile.favicon_path, "faviconPath", &mut diagnostics,);
        require_identifier(&profile.organization_name, "organizationName", &mut diagnostics,);
        require_identifier(&profile.project_name, "projectName", &mut diagnostics,);

        if let Err(reason,) = parse_host(&profile.host,) {
            diagnostics.push(Diagnostic::new("host", reason,),);
        }
        if let Err(reason,) = check_base_path(&profile.base_path,) {
            diagnostics.push(Diagnostic::new("basePath", reason,),);
        }

        check_locales(&profile.locales, &mut diagnostics,);

        for (index, preset,) in profile.presets.iter().enumerate() {
            self.check_preset(index, preset, &mut diagnostics,);
        }
        check_logo_alt(&profile.presets, &mut diagnostics,);

        for (key, value,) in &profile.theme_overrides {
            let field_path = format!("themeOverrides.{key}");
            match ThemeField::from_path(key,) {
                Some(field,) => {
                    if let Err(reason,) = field.check(value,) {
                        diagnostics.push(Diagnostic::new(field_path, reason,),);
                    }
                }
                None => diagnostics.push(Diagnostic::new(field_path, "unknown theme field",),),
            }
        }

        if diagnostics.is_empty() { Validation::Ok } else { Validation::Invalid(diagnostics,) }
    }

    fn check_preset(&self, index: usize, preset: &PresetRef, diagnostics: &mut Vec<Diagnostic,>,)
    {
        let name = preset.name.trim();
        if name == BASELINE_SOURCE {
            diagnostics.push(Diagnostic::new(
                format!("presets[{index}].name"),
                format!("preset name '{BASELINE_SOURCE}' is reserved for built-in defaults"),
            ),);
            return;
        }
        let Some(schema,) = self.registry.get(name,) else {
            let known: Vec<&str,> = self.registry.names().collect();
            diagnostics.push(Diagnostic::new(
                format!("presets[{index}].name"),
                format!("unknown preset '{name}', expected one of: {}", known.join(", ")),
            ),);
            return;
        };

        let mut seen = HashSet::new();
        for (path, value,) in flatten(&preset.options,) {
            let field_path = format!("presets[{index}].options.{path}");
            if !seen.insert(path.clone(),) {
                diagnostics.push(Diagnostic::new(field_path, "option is set more than once",),);
                continue;
            }
            match schema.kind_of(&path,) {
                Some(kind,) => {
                    if let Err(reason,) = kind.check(value,) {
                        diagnostics.push(Diagnostic::new(field_path, reason,),);
                    }
                }
                None => diagnostics.push(Diagnostic::new(
                    field_path,
                    format!("unknown option for preset '{name}'"),
                ),),
            }
        }
    }
}

/// Logo alt text only takes effect together with a logo image, which any
/// preset of the profile may supply.
fn check_logo_alt(presets: &[PresetRef], diagnostics: &mut Vec<Diagnostic,>,)
{
    let alt = KeyPath::parse("navbar.logo.alt",);
    let src = KeyPath::parse("navbar.logo.src",);

    let mut first_alt = None;
    let mut has_src = false;
    for (index, preset,) in presets.iter().enumerate() {
        for (path, _,) in flatten(&preset.options,) {
            if path == src {
                has_src = true;
            } else if path == alt && first_alt.is_none() {
                first_alt = Some(index,);
            }
        }
    }

    if let (Some(index,), false,) = (first_alt, has_src,) {
        diagnostics.push(Diagnostic::new(
            format!("presets[{index}].options.navbar.logo.alt"),
            "logo alt text requires navbar.logo.src",
        ),);
    }
}

fn require_text(value: &str, field: &str, diagnostics: &mut Vec<Diagnostic,>,)
{
    if value.trim().is_empty() {
        diagnostics.push(Diagnostic::new(field, "cannot be empty",),);
    }
}

fn require_identifier(value: &str, field: &str, diagnostics: &mut Vec<Diagnostic,>,)
{
    let trimmed = value.trim();
    if trimmed.is_empty() {
        diagnostics.push(Diagnostic::new(field, "cannot be empty",),);
    } else if trimmed.chars().any(char::is_whitespace,) {
        diagnostics.push(Diagnostic::new(field, "cannot contain whitespace",),);
    }
}

fn check_base_path(base_path: &str,) -> Result<(), String,>
{
    let trimmed = base_path.trim();
    if !trimmed.starts_with('/',) || !trimmed.ends_with('/',) {
        return Err("must start and end with '/'".to_owned(),);
    }
    if trimmed.contains("//",) {
        return Err("must not contain empty segments".to_owned(),);
    }
    if trimmed.chars().any(|ch| ch.is_whitespace() || matches!(ch, '?' | '#'),) {
        return Err("must not contain whitespace, '?' or '#'".to_owned(),);
    }
    Ok((),)
}

fn check_locales(locales: &[String], diagnostics: &mut Vec<Diagnostic,>,)
{
    if locales.is_empty() {
        diagnostics.push(Diagnostic::new("locales", "must list at least one locale",),);
        return;
    }

    let mut seen = HashSet::with_capacity(locales.len(),);
    for (index, locale,) in locales.iter().enumerate() {
        let tag = locale.trim();
        if !LOCALE_TAG.is_match(tag,) {
            diagnostics.push(Diagnostic::new(
                format!("locales[{index}]"),
                format!("'{tag}' is not a valid locale tag"),
            ),);
        } else if !seen.insert(tag.to_ascii_lowercase(),) {
            diagnostics.push(Diagnostic::new(
                format!("locales[{index}]"),
                format!("duplicate locale '{tag}'"),
            ),);
        }
    }
}
