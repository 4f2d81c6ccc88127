//! Shared profiles used across unit tests.

use serde_json::json;

use crate::profile::{PresetRef, Profile, ThemeOverrides};

/// Single-locale blog served from a project sub-path.
pub(crate) fn blog_profile() -> Profile
{
    Profile {
        title:                    "Field Notes".to_owned(),
        tagline:                  "I write code".to_owned(),
        favicon_path:             "img/favicon.ico".to_owned(),
        host:                     "https://notes.example.org/".to_owned(),
        base_path:                "/blog/".to_owned(),
        organization_name:        "notes".to_owned(),
        project_name:             "blog".to_owned(),
        locales:                  vec!["en".to_owned()],
        presets:                  vec![
            PresetRef::new(
                "classic",
                json!({ "docs": { "enabled": false }, "blog": { "routeBasePath": "/" } }),
            ),
            PresetRef::new(
                "theme-classic",
                json!({
                    "navbar": { "logo": { "alt": "Field Notes Logo", "src": "img/logo.svg" } },
                    "footer": { "copyright": "Copyright © {year} CC0. Field Notes." },
                    "image": "img/social-card.jpg"
                }),
            ),
            PresetRef::new("prism", json!({ "prism": { "theme": "github", "darkTheme": "dracula" } }),),
        ],
        theme_overrides:          ThemeOverrides::new(),
        on_broken_links:          None,
        on_broken_markdown_links: None,
    }
}
