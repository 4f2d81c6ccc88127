//! Presentation settings composed from merged preset options.
//!
//! Composition happens in two explicit passes. The first pass reads the
//! merged preset options and fills every theme field, falling back to crate
//! defaults. The second pass applies the profile's theme overrides, which are
//! authored closest to the deployment and therefore always have final say.
//! Optional visual fields that end up unset are `None` and serialize as
//! `null`, keeping "no logo" distinct from "logo with empty path".

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::Error,
    merger::MergedOptions,
    profile::ThemeOverrides,
    registry::{FOOTER_STYLES, OptionKind},
};

/// Light syntax highlighting theme used when no preset selects one.
const DEFAULT_CODE_THEME: &str = "github";
/// Dark syntax highlighting theme used when no preset selects one.
const DEFAULT_DARK_CODE_THEME: &str = "dracula";
/// Placeholder substituted with the build year in copyright templates.
const YEAR_PLACEHOLDER: &str = "{year}";

/// Resolved presentation settings consumed by theme renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct ThemeConfig
{
    /// Top navigation bar.
    pub navbar:                 Navbar,
    /// Page footer.
    pub footer:                 Footer,
    /// Syntax highlighting themes and extra languages.
    pub code_highlighting:      CodeHighlighting,
    /// Image used for social media cards, when configured.
    pub social_card_image_path: Option<String,>,
}

/// Navigation bar settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct Navbar
{
    /// Title displayed next to the logo.
    pub title: String,
    /// Logo image, absent when the site has none.
    pub logo:  Option<Logo,>,
    /// Ordered navigation entries.
    pub items: Vec<NavItem,>,
}

/// Logo image shown in the navbar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Logo
{
    /// Alternative text for assistive technology.
    pub alt_text: String,
    /// Image path relative to the static directory.
    pub path:     String,
}

impl Logo
{
    fn check(&self,) -> Result<(), String,>
    {
        if self.path.trim().is_empty() {
            return Err("logo path must not be empty".to_owned(),);
        }
        Ok((),)
    }
}

/// Navbar entry linking either to a site route or to an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct NavItem
{
    /// Visible link text.
    pub label:    String,
    /// Site-internal route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to:       Option<String,>,
    /// External URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href:     Option<String,>,
    /// Side of the navbar the entry is placed on.
    #[serde(default)]
    pub position: NavItemPosition,
}

impl NavItem
{
    /// Checks that the item has a label and exactly one link target.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason describing the first problem found.
    pub fn check(&self,) -> Result<(), String,>
    {
        check_link(&self.label, self.to.as_deref(), self.href.as_deref(),)
    }
}

/// Placement of a navbar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum NavItemPosition
{
    /// Leading side of the navbar.
    #[default]
    Left,
    /// Trailing side of the navbar.
    Right,
}

/// Footer settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct Footer
{
    /// Color scheme of the footer.
    pub style:     FooterStyle,
    /// Ordered groups of footer links.
    pub links:     Vec<LinkGroup,>,
    /// Copyright template; `{year}` is replaced by the build year.
    pub copyright: Option<String,>,
}

impl Footer
{
    /// Renders the copyright notice for the given year.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteconf::{Footer, FooterStyle};
    ///
    /// let footer = Footer {
    ///     style:     FooterStyle::Dark,
    ///     links:     Vec::new(),
    ///     copyright: Some("Copyright © {year} Field Notes".to_owned(),),
    /// };
    /// assert_eq!(footer.render_copyright(2025,).as_deref(), Some("Copyright © 2025 Field Notes"));
    /// ```
    pub fn render_copyright(&self, year: i32,) -> Option<String,>
    {
        self.copyright.as_ref().map(|template| template.replace(YEAR_PLACEHOLDER, &year.to_string(),),)
    }
}

/// Color scheme of the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "snake_case")]
pub enum FooterStyle
{
    /// Light background.
    Light,
    /// Dark background.
    #[default]
    Dark,
}

/// Titled group of footer links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct LinkGroup
{
    /// Optional group heading.
    #[serde(default)]
    pub title: Option<String,>,
    /// Links listed under the heading.
    #[serde(default)]
    pub items: Vec<FooterLink,>,
}

impl LinkGroup
{
    /// Checks every link of the group.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason naming the first invalid link.
    pub fn check(&self,) -> Result<(), String,>
    {
        for (index, link,) in self.items.iter().enumerate() {
            check_link(&link.label, link.to.as_deref(), link.href.as_deref(),)
                .map_err(|reason| format!("link {index}: {reason}"),)?;
        }
        Ok((),)
    }
}

/// Footer link pointing either to a site route or to an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(deny_unknown_fields)]
pub struct FooterLink
{
    /// Visible link text.
    pub label: String,
    /// Site-internal route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to:    Option<String,>,
    /// External URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href:  Option<String,>,
}

/// Syntax highlighting settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct CodeHighlighting
{
    /// Theme identifier used in light mode.
    pub theme:                String,
    /// Theme identifier used in dark mode.
    pub dark_theme:           String,
    /// Languages loaded in addition to the default set.
    pub additional_languages: Vec<String,>,
}

fn check_link(label: &str, to: Option<&str,>, href: Option<&str,>,) -> Result<(), String,>
{
    if label.trim().is_empty() {
        return Err("label must not be empty".to_owned(),);
    }
    match (to, href,) {
        (Some(_,), Some(_,),) => Err("set either `to` or `href`, not both".to_owned(),),
        (None, None,) => Err("one of `to` or `href` is required".to_owned(),),
        (Some(target,), None,) | (None, Some(target,),) if target.trim().is_empty() => {
            Err("link target must not be empty".to_owned(),)
        }
        _ => Ok((),),
    }
}

/// Theme fields that a profile may override, in application order.
///
/// Coarse fields come before the fine-grained fields nested below them so
/// that `navbar.logo` is replaced before `navbar.logo.path` adjusts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash,)]
pub enum ThemeField
{
    /// `navbar.title`
    NavbarTitle,
    /// `navbar.logo`; `null` removes the logo.
    NavbarLogo,
    /// `navbar.logo.path`; creates a logo when none exists.
    NavbarLogoPath,
    /// `navbar.logo.altText`
    NavbarLogoAltText,
    /// `navbar.items`
    NavbarItems,
    /// `footer.style`
    FooterStyle,
    /// `footer.links`
    FooterLinks,
    /// `footer.copyright`; `null` removes the notice.
    FooterCopyright,
    /// `codeHighlighting.theme`
    CodeTheme,
    /// `codeHighlighting.darkTheme`
    CodeDarkTheme,
    /// `codeHighlighting.additionalLanguages`
    CodeAdditionalLanguages,
    /// `socialCardImagePath`; `null` removes the image.
    SocialCardImagePath,
}

impl ThemeField
{
    /// Every overridable field in application order.
    pub const ALL: [Self; 12] = [
        Self::NavbarTitle,
        Self::NavbarLogo,
        Self::NavbarLogoPath,
        Self::NavbarLogoAltText,
        Self::NavbarItems,
        Self::FooterStyle,
        Self::FooterLinks,
        Self::FooterCopyright,
        Self::CodeTheme,
        Self::CodeDarkTheme,
        Self::CodeAdditionalLanguages,
        Self::SocialCardImagePath,
    ];

    /// Dotted path used as override key.
    pub fn path(self,) -> &'static str
    {
        match self {
            Self::NavbarTitle => "navbar.title",
            Self::NavbarLogo => "navbar.logo",
            Self::NavbarLogoPath => "navbar.logo.path",
            Self::NavbarLogoAltText => "navbar.logo.altText",
            Self::NavbarItems => "navbar.items",
            Self::FooterStyle => "footer.style",
            Self::FooterLinks => "footer.links",
            Self::FooterCopyright => "footer.copyright",
            Self::CodeTheme => "codeHighlighting.theme",
            Self::CodeDarkTheme => "codeHighlighting.darkTheme",
            Self::CodeAdditionalLanguages => "codeHighlighting.additionalLanguages",
            Self::SocialCardImagePath => "socialCardImagePath",
        }
    }

    /// Looks up the field addressed by an override key.
    pub fn from_path(path: &str,) -> Option<Self,>
    {
        let path = path.trim();
        Self::ALL.into_iter().find(|field| field.path() == path,)
    }

    /// Checks that `value` can be assigned to the field.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason when the value has the wrong shape.
    pub fn check(self, value: &Value,) -> Result<(), String,>
    {
        match self {
            Self::NavbarTitle
            | Self::NavbarLogoPath
            | Self::NavbarLogoAltText
            | Self::CodeTheme
            | Self::CodeDarkTheme => OptionKind::String.check(value,),
            Self::NavbarLogo => {
                if value.is_null() {
                    return Ok((),);
                }
                decode_value::<Logo,>(value,)?.check()
            }
            Self::NavbarItems => OptionKind::NavItems.check(value,),
            Self::FooterStyle => OptionKind::Choice(FOOTER_STYLES,).check(value,),
            Self::FooterLinks => OptionKind::LinkGroups.check(value,),
            Self::FooterCopyright | Self::SocialCardImagePath => {
                if value.is_null() {
                    return Ok((),);
                }
                OptionKind::String.check(value,)
            }
            Self::CodeAdditionalLanguages => OptionKind::Strings.check(value,),
        }
    }

    fn apply(self, theme: &mut ThemeConfig, value: &Value,) -> Result<(), String,>
    {
        self.check(value,)?;
        match self {
            Self::NavbarTitle => theme.navbar.title = text(value,),
            Self::NavbarLogo => theme.navbar.logo = decode_value(value,)?,
            Self::NavbarLogoPath => match theme.navbar.logo.as_mut() {
                Some(logo,) => logo.path = text(value,),
                None => {
                    theme.navbar.logo = Some(Logo {
                        alt_text: theme.navbar.title.clone(),
                        path:     text(value,),
                    },);
                }
            },
            Self::NavbarLogoAltText => {
                let logo = theme
                    .navbar
                    .logo
                    .as_mut()
                    .ok_or_else(|| "navbar has no logo to describe".to_owned(),)?;
                logo.alt_text = text(value,);
            }
            Self::NavbarItems => theme.navbar.items = decode_value(value,)?,
            Self::FooterStyle => theme.footer.style = decode_value(value,)?,
            Self::FooterLinks => theme.footer.links = decode_value(value,)?,
            Self::FooterCopyright => theme.footer.copyright = optional_text(value,),
            Self::CodeTheme => theme.code_highlighting.theme = text(value,),
            Self::CodeDarkTheme => theme.code_highlighting.dark_theme = text(value,),
            Self::CodeAdditionalLanguages => {
                theme.code_highlighting.additional_languages = decode_value(value,)?;
            }
            Self::SocialCardImagePath => theme.social_card_image_path = optional_text(value,),
        }
        Ok((),)
    }
}

/// Composes the theme from merged options and applies profile overrides.
///
/// `site_title` is used as the navbar title when no preset supplies one.
///
/// # Errors
///
/// Returns [`Error::Schema`](Error::Schema) when a merged option or an
/// override cannot be decoded into its theme field, when an override key does
/// not address a known field, or when an override refines a logo that does
/// not exist.
pub fn compose(
    options: &MergedOptions,
    site_title: &str,
    overrides: &ThemeOverrides,
) -> Result<ThemeConfig, Error,>
{
    let mut theme = compose_from_options(options, site_title,)?;
    apply_overrides(&mut theme, overrides,)?;
    Ok(theme,)
}

fn compose_from_options(options: &MergedOptions, site_title: &str,) -> Result<ThemeConfig, Error,>
{
    let title = option::<String,>(options, "navbar.title",)?
        .map_or_else(|| site_title.trim().to_owned(), |value| value.trim().to_owned(),);

    let logo = option::<String,>(options, "navbar.logo.src",)?.map(|path| Logo {
        alt_text: options
            .get("navbar.logo.alt",)
            .and_then(Value::as_str,)
            .map_or_else(|| title.clone(), str::to_owned,),
        path,
    },);

    let navbar = Navbar {
        title,
        logo,
        items: option(options, "navbar.items",)?.unwrap_or_default(),
    };

    let footer = Footer {
        style:     option(options, "footer.style",)?.unwrap_or_default(),
        links:     option(options, "footer.links",)?.unwrap_or_default(),
        copyright: option(options, "footer.copyright",)?,
    };

    let code_highlighting = CodeHighlighting {
        theme:                option(options, "prism.theme",)?
            .unwrap_or_else(|| DEFAULT_CODE_THEME.to_owned(),),
        dark_theme:           option(options, "prism.darkTheme",)?
            .unwrap_or_else(|| DEFAULT_DARK_CODE_THEME.to_owned(),),
        additional_languages: option(options, "prism.additionalLanguages",)?.unwrap_or_default(),
    };

    Ok(ThemeConfig {
        navbar,
        footer,
        code_highlighting,
        social_card_image_path: option(options, "image",)?,
    },)
}

fn apply_overrides(theme: &mut ThemeConfig, overrides: &ThemeOverrides,) -> Result<(), Error,>
{
    if let Some(unknown,) = overrides.keys().find(|key| ThemeField::from_path(key,).is_none(),) {
        return Err(Error::schema(
            format!("themeOverrides.{unknown}"),
            "unknown theme field",
        ),);
    }

    for field in ThemeField::ALL {
        let Some(value,) = overrides.iter().find_map(|(key, value,)| {
            (ThemeField::from_path(key,) == Some(field,)).then_some(value,)
        },) else {
            continue;
        };
        debug!(field = field.path(), "applying theme override");
        field
            .apply(theme, value,)
            .map_err(|reason| Error::schema(format!("themeOverrides.{}", field.path()), reason,),)?;
    }

    Ok((),)
}

fn option<T,>(options: &MergedOptions, path: &str,) -> Result<Option<T,>, Error,>
where
    T: DeserializeOwned,
{
    options
        .get(path,)
        .map(|value| {
            decode_value(value,).map_err(|reason| Error::schema(format!("options.{path}"), reason,),)
        },)
        .transpose()
}

fn decode_value<T,>(value: &Value,) -> Result<T, String,>
where
    T: DeserializeOwned,
{
    serde_json::from_value(value.clone(),).map_err(|error| error.to_string(),)
}

fn text(value: &Value,) -> String
{
    value.as_str().map(str::trim,).unwrap_or_default().to_owned()
}

fn optional_text(value: &Value,) -> Option<String,>
{
    value.as_str().map(|text| text.trim().to_owned(),)
}
