//! Transformation logic that gives every profile a uniform shape.
//!
//! Normalization trims user-supplied text, fills optional policy fields and
//! derives the baseline option layer that is merged underneath all presets.
//! It never invents values for required fields; those are the validator's
//! concern. The process is deterministic and idempotent.

use serde_json::json;

use crate::profile::{BrokenLinkPolicy, OptionBag, PresetRef, Profile};

/// Name of the baseline option source merged before any preset.
pub const BASELINE_SOURCE: &str = "defaults";

/// Policy applied to broken page links when none is configured.
const DEFAULT_ON_BROKEN_LINKS: BrokenLinkPolicy = BrokenLinkPolicy::Throw;
/// Policy applied to broken markdown links when none is configured.
const DEFAULT_ON_BROKEN_MARKDOWN_LINKS: BrokenLinkPolicy = BrokenLinkPolicy::Warn;
const DEFAULT_FOOTER_STYLE: &str = "dark";
const DEFAULT_BLOG_SIDEBAR_COUNT: &str = "paginated";

/// Profile with uniform shape, ready to be merged.
#[derive(Debug, Clone, PartialEq,)]
pub struct NormalizedProfile
{
    profile:  Profile,
    baseline: OptionBag,
}

impl NormalizedProfile
{
    /// Normalized profile fields.
    pub fn profile(&self,) -> &Profile
    {
        &self.profile
    }

    /// Lowest-precedence options merged underneath every preset.
    pub fn baseline(&self,) -> &OptionBag
    {
        &self.baseline
    }

    /// Returns the normalized profile, discarding the baseline layer.
    pub fn into_profile(self,) -> Profile
    {
        self.profile
    }
}

impl From<NormalizedProfile,> for Profile
{
    fn from(normalized: NormalizedProfile,) -> Self
    {
        normalized.profile
    }
}

/// Normalizes `profile` into a uniform shape.
///
/// # Examples
///
/// ```
/// use siteconf::{BrokenLinkPolicy, Profile, normalize};
///
/// let profile: Profile = serde_yaml::from_str(
///     "title: ' Notes '\ntagline: ''\nfaviconPath: favicon.ico\nhost: https://example.org\n\
///      basePath: /\norganizationName: example\nprojectName: notes\nlocales: [en]\n",
/// )
/// .unwrap();
/// let normalized = normalize(&profile,);
/// assert_eq!(normalized.profile().title, "Notes");
/// assert_eq!(normalized.profile().on_broken_links, Some(BrokenLinkPolicy::Throw));
/// assert_eq!(normalized.baseline()["footer"]["style"], "dark");
/// ```
pub fn normalize(profile: &Profile,) -> NormalizedProfile
{
    let normalized = Profile {
        title:                    trimmed(&profile.title,),
        tagline:                  trimmed(&profile.tagline,),
        favicon_path:             trimmed(&profile.favicon_path,),
        host:                     trimmed(&profile.host,),
        base_path:                trimmed(&profile.base_path,),
        organization_name:        trimmed(&profile.organization_name,),
        project_name:             trimmed(&profile.project_name,),
        locales:                  profile.locales.iter().map(|locale| trimmed(locale,),).collect(),
        presets:                  profile
            .presets
            .iter()
            .map(|preset| PresetRef {
                name:    trimmed(&preset.name,),
                options: preset.options.clone(),
            },)
            .collect(),
        theme_overrides:          profile
            .theme_overrides
            .iter()
            .map(|(key, value,)| (trimmed(key,), value.clone(),),)
            .collect(),
        on_broken_links:          Some(profile.on_broken_links.unwrap_or(DEFAULT_ON_BROKEN_LINKS,),),
        on_broken_markdown_links: Some(
            profile.on_broken_markdown_links.unwrap_or(DEFAULT_ON_BROKEN_MARKDOWN_LINKS,),
        ),
    };

    NormalizedProfile {
        profile:  normalized,
        baseline: baseline_options(),
    }
}

/// Structural defaults shared by every profile.
///
/// Sequences start empty so presets can only append, the footer defaults to
/// the dark style and the blog sidebar is paginated unless a preset selects
/// `all`.
fn baseline_options() -> OptionBag
{
    let baseline = json!({
        "navbar": { "items": [] },
        "footer": { "style": DEFAULT_FOOTER_STYLE, "links": [] },
        "blog": { "blogSidebarCount": DEFAULT_BLOG_SIDEBAR_COUNT },
    });
    match baseline {
        serde_json::Value::Object(map,) => map,
        _ => OptionBag::new(),
    }
}

fn trimmed(input: &str,) -> String
{
    input.trim().to_owned()
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;
    use serde_json::json;

    use super::{BASELINE_SOURCE, normalize};
    use crate::{
        fixtures,
        merger::OptionMerger,
        profile::{BrokenLinkPolicy, PresetRef, Profile},
    };

    #[test]
    fn fills_policy_defaults()
    {
        let normalized = normalize(&fixtures::blog_profile(),);
        assert_eq!(normalized.profile().on_broken_links, Some(BrokenLinkPolicy::Throw));
        assert_eq!(normalized.profile().on_broken_markdown_links, Some(BrokenLinkPolicy::Warn));
    }

    #[test]
    fn keeps_explicit_policies()
    {
        let mut profile = fixtures::blog_profile();
        profile.on_broken_links = Some(BrokenLinkPolicy::Log,);
        profile.on_broken_markdown_links = Some(BrokenLinkPolicy::Throw,);

        let normalized = normalize(&profile,);
        assert_eq!(normalized.profile().on_broken_links, Some(BrokenLinkPolicy::Log));
        assert_eq!(normalized.profile().on_broken_markdown_links, Some(BrokenLinkPolicy::Throw));
    }

    #[test]
    fn baseline_holds_structural_defaults()
    {
        let normalized = normalize(&fixtures::blog_profile(),);
        let baseline = serde_json::Value::Object(normalized.baseline().clone(),);
        assert_eq!(
            baseline,
            json!({
                "navbar": { "items": [] },
                "footer": { "style": "dark", "links": [] },
                "blog": { "blogSidebarCount": "paginated" }
            })
        );
    }

    #[test]
    fn explicit_sidebar_count_overrides_baseline()
    {
        let normalized = normalize(&fixtures::blog_profile(),);
        let preset = PresetRef::new("classic", json!({ "blog": { "blogSidebarCount": "all" } }),);

        let merged = OptionMerger::new()
            .layer(BASELINE_SOURCE, normalized.baseline(),)
            .and_then(|merger| merger.layer(&preset.name, &preset.options,),)
            .expect("expected merge",)
            .finish();
        assert_eq!(merged.get("blog.blogSidebarCount"), Some(&json!("all")));
    }

    #[test]
    fn trims_text_without_inventing_required_values()
    {
        let mut profile = fixtures::blog_profile();
        profile.title = "   ".to_owned();
        profile.host = " https://notes.example.org ".to_owned();
        profile.locales = vec![" en ".to_owned()];
        profile.presets[0].name = " classic ".to_owned();
        profile.theme_overrides.insert(" footer.style ".to_owned(), json!("light"),);

        let normalized = normalize(&profile,);
        let normalized = normalized.profile();
        assert_eq!(normalized.title, "");
        assert_eq!(normalized.host, "https://notes.example.org");
        assert_eq!(normalized.locales, vec!["en"]);
        assert_eq!(normalized.presets[0].name, "classic");
        assert_eq!(normalized.theme_overrides["footer.style"], json!("light"));
    }

    #[test]
    fn converts_into_plain_profile()
    {
        let mut source = fixtures::blog_profile();
        source.tagline = " I write code ".to_owned();

        let profile: Profile = normalize(&source,).into();
        assert_eq!(profile.tagline, "I write code");
        assert_eq!(profile, normalize(&source,).into_profile());
    }

    fn padded(value: &str, left: usize, right: usize,) -> String
    {
        format!("{}{value}{}", " ".repeat(left), " ".repeat(right))
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(
            left in 0usize..3,
            right in 0usize..3,
            links in prop::option::of(prop_oneof![
                Just(BrokenLinkPolicy::Ignore),
                Just(BrokenLinkPolicy::Log),
                Just(BrokenLinkPolicy::Warn),
                Just(BrokenLinkPolicy::Throw),
            ]),
        ) {
            let mut profile: Profile = fixtures::blog_profile();
            profile.title = padded(&profile.title, left, right);
            profile.base_path = padded(&profile.base_path, right, left);
            profile.locales = vec![padded("en", left, right), padded("zh-Hans", right, left)];
            profile.on_broken_links = links;

            let once = normalize(&profile);
            let twice = normalize(once.profile());
            prop_assert_eq!(once, twice);
        }
    }
}
