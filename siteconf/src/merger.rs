//! Ordered merge of option bags contributed by presets.
//!
//! Sources are merged in declaration order. A scalar written by a later
//! source replaces the earlier value. Sequences are additive: the incoming
//! items are appended and any item already present, compared by deep value
//! equality, keeps its first position. A key path that is a scalar in one
//! source and a sequence in another, or a leaf in one source and a parent of
//! further options in another, is reported as a conflict instead of being
//! coerced.

use std::{
    collections::BTreeMap,
    ops::Bound::{Excluded, Unbounded},
};

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::Error,
    key_path::{KeyPath, Shape, flatten},
    profile::{OptionBag, PresetRef},
};

/// Merged value of one key path together with the source that last wrote it.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct MergedEntry
{
    /// Merged value.
    pub value:  Value,
    /// Name of the source that contributed the value; for sequences, the
    /// last source that appended to it.
    pub source: String,
}

/// Flat result of merging option sources.
///
/// Serializes as the nested option tree.
#[derive(Debug, Clone, PartialEq, Eq, Default,)]
pub struct MergedOptions
{
    entries: BTreeMap<KeyPath, MergedEntry,>,
}

impl MergedOptions
{
    /// Returns the merged value at the dotted `path`.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde_json::json;
    /// use siteconf::{PresetRef, merge};
    ///
    /// let merged = merge(&[
    ///     PresetRef::new("classic", json!({ "blog": { "routeBasePath": "/blog" } }),),
    ///     PresetRef::new("custom", json!({ "blog": { "routeBasePath": "/" } }),),
    /// ],)?;
    /// assert_eq!(merged.get("blog.routeBasePath",), Some(&json!("/")));
    /// # Ok::<(), siteconf::Error>(())
    /// ```
    pub fn get(&self, path: &str,) -> Option<&Value,>
    {
        self.entry(&KeyPath::parse(path,),).map(|entry| &entry.value,)
    }

    /// Returns the merged entry at `path`, including its source.
    pub fn entry(&self, path: &KeyPath,) -> Option<&MergedEntry,>
    {
        self.entries.get(path,)
    }

    /// Iterates over merged entries in key path order.
    pub fn iter(&self,) -> impl Iterator<Item = (&KeyPath, &MergedEntry,),> + '_
    {
        self.entries.iter()
    }

    /// Number of merged key paths.
    pub fn len(&self,) -> usize
    {
        self.entries.len()
    }

    /// Returns `true` when no option was merged.
    pub fn is_empty(&self,) -> bool
    {
        self.entries.is_empty()
    }

    /// Rebuilds the nested option tree.
    pub fn to_tree(&self,) -> OptionBag
    {
        build_tree(self.entries.iter().map(|(path, entry,)| (path, &entry.value,),),)
    }

    /// Groups merged values by the source that contributed them.
    ///
    /// Each group is a nested option bag. Sources listed in `excluded` are
    /// left out.
    pub fn by_source(&self, excluded: &[&str],) -> BTreeMap<String, OptionBag,>
    {
        let mut grouped: BTreeMap<&str, Vec<(&KeyPath, &Value,),>,> = BTreeMap::new();
        for (path, entry,) in &self.entries {
            if excluded.contains(&entry.source.as_str(),) {
                continue;
            }
            grouped.entry(entry.source.as_str(),).or_default().push((path, &entry.value,),);
        }

        grouped
            .into_iter()
            .map(|(source, leaves,)| (source.to_owned(), build_tree(leaves.into_iter(),),),)
            .collect()
    }
}

impl Serialize for MergedOptions
{
    fn serialize<S,>(&self, serializer: S,) -> Result<S::Ok, S::Error,>
    where
        S: Serializer,
    {
        self.to_tree().serialize(serializer,)
    }
}

fn build_tree<'a,>(leaves: impl Iterator<Item = (&'a KeyPath, &'a Value,),>,) -> OptionBag
{
    let mut root = Map::new();
    'leaves: for (path, value,) in leaves {
        let Some((last, parents,),) = path.segments().split_last() else {
            continue;
        };
        let mut node = &mut root;
        for segment in parents {
            let child = node
                .entry(segment.clone(),)
                .or_insert_with(|| Value::Object(Map::new(),),);
            // Merged entries never nest under another leaf.
            let Some(next,) = child.as_object_mut() else {
                continue 'leaves;
            };
            node = next;
        }
        node.insert(last.clone(), value.clone(),);
    }
    root
}

/// Incremental merger folding option sources in declaration order.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use siteconf::OptionMerger;
///
/// let base = json!({ "theme": { "customCss": ["base.css"] } });
/// let extra = json!({ "theme": { "customCss": ["extra.css", "base.css"] } });
/// let merged = OptionMerger::new()
///     .layer("classic", base.as_object().unwrap(),)?
///     .layer("branding", extra.as_object().unwrap(),)?
///     .finish();
/// assert_eq!(merged.get("theme.customCss",), Some(&json!(["base.css", "extra.css"])));
/// # Ok::<(), siteconf::Error>(())
/// ```
#[derive(Debug, Default,)]
pub struct OptionMerger
{
    entries: BTreeMap<KeyPath, MergedEntry,>,
}

impl OptionMerger
{
    /// Creates a merger without any source.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Merges the options contributed by `source` on top of earlier sources.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MergeConflict`](Error::MergeConflict) when a key path
    /// is written with incompatible shapes.
    pub fn layer(mut self, source: &str, bag: &OptionBag,) -> Result<Self, Error,>
    {
        for (path, value,) in flatten(bag,) {
            self.insert(source, path, value,)?;
        }
        debug!(source, merged = self.entries.len(), "merged option source");
        Ok(self,)
    }

    /// Finishes merging and returns the merged options.
    pub fn finish(self,) -> MergedOptions
    {
        MergedOptions {
            entries: self.entries,
        }
    }

    fn insert(&mut self, source: &str, path: KeyPath, value: &Value,) -> Result<(), Error,>
    {
        self.check_nesting(source, &path, value,)?;

        let Some(existing,) = self.entries.get_mut(&path,) else {
            self.entries.insert(
                path,
                MergedEntry {
                    value:  dedup(value,),
                    source: source.to_owned(),
                },
            );
            return Ok((),);
        };

        match (&mut existing.value, value,) {
            (Value::Array(items,), Value::Array(incoming,),) => {
                append_unique(items, incoming,);
            }
            (current, incoming,)
                if Shape::of(current,) == Shape::Scalar && Shape::of(incoming,) == Shape::Scalar =>
            {
                *current = incoming.clone();
            }
            (current, incoming,) => {
                return Err(Error::MergeConflict {
                    path:     path.to_string(),
                    existing: Shape::of(current,).label(),
                    first:    existing.source.clone(),
                    incoming: Shape::of(incoming,).label(),
                    second:   source.to_owned(),
                },);
            }
        }
        existing.source = source.to_owned();
        Ok((),)
    }

    /// Rejects leaves that would nest under, or contain, another leaf.
    fn check_nesting(&self, source: &str, path: &KeyPath, value: &Value,) -> Result<(), Error,>
    {
        let segments = path.segments();
        for length in 1..segments.len() {
            let ancestor = KeyPath::parse(&segments[..length].join(".",),);
            if let Some(entry,) = self.entries.get(&ancestor,) {
                return Err(Error::MergeConflict {
                    path:     ancestor.to_string(),
                    existing: Shape::of(&entry.value,).label(),
                    first:    entry.source.clone(),
                    incoming: Shape::Object.label(),
                    second:   source.to_owned(),
                },);
            }
        }

        let descendant = self
            .entries
            .range((Excluded(path.clone(),), Unbounded,),)
            .next()
            .filter(|(candidate, _,)| path.is_strict_prefix_of(candidate,),);
        if let Some((_, entry,),) = descendant {
            return Err(Error::MergeConflict {
                path:     path.to_string(),
                existing: Shape::Object.label(),
                first:    entry.source.clone(),
                incoming: Shape::of(value,).label(),
                second:   source.to_owned(),
            },);
        }

        Ok((),)
    }
}

/// Merges preset references in declaration order.
///
/// Each reference is merged as a source named after its preset.
///
/// # Errors
///
/// Returns [`Error::MergeConflict`](Error::MergeConflict) when two references
/// contribute incompatible shapes at the same key path.
pub fn merge(presets: &[PresetRef],) -> Result<MergedOptions, Error,>
{
    presets
        .iter()
        .try_fold(OptionMerger::new(), |merger, preset| merger.layer(&preset.name, &preset.options,),)
        .map(OptionMerger::finish,)
}

fn dedup(value: &Value,) -> Value
{
    match value {
        Value::Array(items,) => {
            let mut unique = Vec::with_capacity(items.len(),);
            append_unique(&mut unique, items,);
            Value::Array(unique,)
        }
        other => other.clone(),
    }
}

fn append_unique(target: &mut Vec<Value,>, incoming: &[Value],)
{
    for item in incoming {
        if !target.contains(item,) {
            target.push(item.clone(),);
        }
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::{OptionMerger, merge};
    use crate::{error::Error, profile::PresetRef};

    fn preset(name: &str, options: Value,) -> PresetRef
    {
        PresetRef::new(name, options,)
    }

    #[test]
    fn later_scalar_wins()
    {
        let merged = merge(&[
            preset("classic", json!({ "gtag": { "trackingID": "G-OLD", "anonymizeIP": true } }),),
            preset("gtag", json!({ "gtag": { "trackingID": "G-NEW" } }),),
        ],)
        .expect("expected merge",);

        assert_eq!(merged.get("gtag.trackingID"), Some(&json!("G-NEW")));
        assert_eq!(merged.get("gtag.anonymizeIP"), Some(&json!(true)));
    }

    #[test]
    fn sequences_concatenate_without_duplicates()
    {
        let merged = merge(&[
            preset("a", json!({ "theme": { "customCss": ["x", "y"] } }),),
            preset("b", json!({ "theme": { "customCss": ["y", "z"] } }),),
        ],)
        .expect("expected merge",);

        assert_eq!(merged.get("theme.customCss"), Some(&json!(["x", "y", "z"])));
    }

    #[test]
    fn duplicates_within_one_source_keep_first_position()
    {
        let merged = merge(&[preset("a", json!({ "prism": { "additionalLanguages": ["rust", "toml", "rust"] } }),)],)
            .expect("expected merge",);

        assert_eq!(merged.get("prism.additionalLanguages"), Some(&json!(["rust", "toml"])));
    }

    #[test]
    fn object_items_are_compared_by_value()
    {
        let merged = merge(&[
            preset("a", json!({ "navbar": { "items": [{ "label": "Blog", "to": "/" }] } }),),
            preset("b", json!({ "navbar": { "items": [{ "to": "/", "label": "Blog" }, { "label": "Tags", "to": "/tags" }] } }),),
        ],)
        .expect("expected merge",);

        assert_eq!(
            merged.get("navbar.items"),
            Some(&json!([{ "label": "Blog", "to": "/" }, { "label": "Tags", "to": "/tags" }]))
        );
    }

    #[test]
    fn scalar_and_sequence_conflict()
    {
        let error = merge(&[
            preset("classic", json!({ "theme": { "customCss": ["a.css"] } }),),
            preset("custom", json!({ "theme": { "customCss": "b.css" } }),),
        ],)
        .expect_err("expected conflict",);

        match error {
            Error::MergeConflict {
                path,
                existing,
                first,
                incoming,
                second,
            } => {
                assert_eq!(path, "theme.customCss");
                assert_eq!(existing, "sequence");
                assert_eq!(first, "classic");
                assert_eq!(incoming, "scalar");
                assert_eq!(second, "custom");
            }
            other => panic!("expected merge conflict, got {other:?}"),
        }
    }

    #[test]
    fn leaf_and_parent_conflict_in_both_orders()
    {
        let error = merge(&[
            preset("a", json!({ "navbar": { "logo": "img/logo.svg" } }),),
            preset("b", json!({ "navbar": { "logo": { "src": "img/logo.svg" } } }),),
        ],)
        .expect_err("expected conflict",);
        assert!(matches!(error, Error::MergeConflict { ref path, .. } if path == "navbar.logo"));

        let error = merge(&[
            preset("a", json!({ "navbar.logo.src": "img/logo.svg" }),),
            preset("b", json!({ "navbar": { "logo": "img/logo.svg" } }),),
        ],)
        .expect_err("expected conflict",);
        assert!(matches!(error, Error::MergeConflict { ref path, .. } if path == "navbar.logo"));
    }

    #[test]
    fn entries_remember_last_source()
    {
        let merged = OptionMerger::new()
            .layer("defaults", json!({ "footer": { "style": "dark", "links": [] } }).as_object().expect("object",),)
            .and_then(|merger| {
                merger.layer("theme-classic", json!({ "footer": { "style": "light" } }).as_object().expect("object",),)
            },)
            .expect("expected merge",)
            .finish();

        let by_source = merged.by_source(&["defaults"],);
        assert_eq!(by_source.len(), 1);
        assert_eq!(Value::Object(by_source["theme-classic"].clone()), json!({ "footer": { "style": "light" } }));
        assert_eq!(
            serde_json::to_value(&merged,).expect("expected serialization",),
            json!({ "footer": { "style": "light", "links": [] } })
        );
    }

    fn option_bag() -> impl Strategy<Value = Value,>
    {
        prop::collection::btree_map("[a-z]{1,6}", prop_oneof![
            any::<bool>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
            prop::collection::vec("[a-z]{1,4}", 0..4).prop_map(Value::from),
        ], 0..6)
        .prop_map(|entries| Value::Object(entries.into_iter().collect()),)
    }

    proptest! {
        #[test]
        fn disjoint_sources_commute(left in option_bag(), right in option_bag()) {
            let left = json!({ "left": left });
            let right = json!({ "right": right });

            let forward = merge(&[preset("a", left.clone()), preset("b", right.clone())]).expect("disjoint merge");
            let backward = merge(&[preset("b", right), preset("a", left)]).expect("disjoint merge");
            prop_assert_eq!(forward.to_tree(), backward.to_tree());
        }

        #[test]
        fn overlapping_scalar_takes_last(first in "[a-z]{1,8}", second in "[a-z]{1,8}") {
            let merged = merge(&[
                preset("a", json!({ "blog": { "editUrl": first } })),
                preset("b", json!({ "blog": { "editUrl": second.clone() } })),
            ]).expect("scalar merge");
            prop_assert_eq!(merged.get("blog.editUrl"), Some(&Value::from(second)));
        }
    }
}
