//! Dotted addresses of option leaves inside nested option bags.

use std::fmt;

use serde_json::Value;

use crate::profile::OptionBag;

/// Segmented address of a configuration field, such as `blog.routeBasePath`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash,)]
pub struct KeyPath(Vec<String,>,);

impl KeyPath
{
    /// Parses a dotted path, ignoring empty segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use siteconf::KeyPath;
    ///
    /// let path = KeyPath::parse("blog.routeBasePath",);
    /// assert_eq!(path.segments(), ["blog", "routeBasePath"]);
    /// assert_eq!(path.to_string(), "blog.routeBasePath");
    /// ```
    pub fn parse(dotted: &str,) -> Self
    {
        Self(
            dotted
                .split('.',)
                .map(str::trim,)
                .filter(|segment| !segment.is_empty(),)
                .map(str::to_owned,)
                .collect(),
        )
    }

    /// Returns the path segments in order.
    pub fn segments(&self,) -> &[String]
    {
        &self.0
    }

    /// Returns `true` when `self` is a strict prefix of `other`.
    pub fn is_strict_prefix_of(&self, other: &Self,) -> bool
    {
        other.0.len() > self.0.len() && other.0.starts_with(&self.0,)
    }

    fn join(&self, key: &str,) -> Self
    {
        let mut segments = self.0.clone();
        segments.extend(Self::parse(key,).0,);
        Self(segments,)
    }
}

impl fmt::Display for KeyPath
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(&self.0.join(".",),)
    }
}

/// Coarse shape of an option value used to detect merge conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq,)]
pub enum Shape
{
    /// Strings, numbers, booleans and null.
    Scalar,
    /// Ordered sequences.
    Sequence,
    /// Objects that contain further options.
    Object,
}

impl Shape
{
    /// Classifies a JSON value.
    pub fn of(value: &Value,) -> Self
    {
        match value {
            Value::Array(_,) => Self::Sequence,
            Value::Object(_,) => Self::Object,
            _ => Self::Scalar,
        }
    }

    /// Lowercase label used in diagnostics.
    pub fn label(self,) -> &'static str
    {
        match self {
            Self::Scalar => "scalar",
            Self::Sequence => "sequence",
            Self::Object => "object",
        }
    }
}

/// Flattens an option bag into `(path, leaf)` pairs.
///
/// Objects are descended into; every other value, sequences included, is a
/// leaf. Keys containing dots are split, so dotted and nested spellings of the
/// same option yield the same path. Empty objects produce no leaves.
pub fn flatten(bag: &OptionBag,) -> Vec<(KeyPath, &Value,),>
{
    let mut leaves = Vec::new();
    collect_leaves(&KeyPath(Vec::new(),), bag, &mut leaves,);
    leaves
}

fn collect_leaves<'bag,>(
    prefix: &KeyPath,
    bag: &'bag OptionBag,
    leaves: &mut Vec<(KeyPath, &'bag Value,),>,
)
{
    for (key, value,) in bag {
        let path = prefix.join(key,);
        match value {
            Value::Object(nested,) => collect_leaves(&path, nested, leaves,),
            _ => leaves.push((path, value,),),
        }
    }
}
