// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

//! Contains [`Tags`], the key-value labels attached to every metric emitted by a [`Client`].
//!
//! [`Client`]: crate::Client

use std::{
    collections::{BTreeMap, HashMap, btree_map},
    fmt,
};

/// A set of `key:value` labels.
///
/// Keys are unique and kept sorted, so the [`Display`](fmt::Display) rendering is canonical: the same
/// pairs always render the same way regardless of the order they were inserted in.
///
/// ```
/// # use tally_core::Tags;
/// let a = Tags::from([("region", "eu"), ("az", "eu-1a")]);
/// let b = Tags::from([("az", "eu-1a"), ("region", "eu")]);
/// assert_eq!(a.to_string(), "map[az:eu-1a region:eu]");
/// assert_eq!(a.to_string(), b.to_string());
/// assert_eq!(Tags::new().to_string(), "map[]");
/// ```
///
/// A client never mutates the tags it holds. Scoping a client with
/// [`Client::with_tags`](crate::Client::with_tags) builds a new set with [`Tags::merged`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Tags(BTreeMap<String, String>);

impl Tags {
    /// Create an empty tag set.
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `key:value`, replacing any previous value for `key`. Returns `self` for chaining.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add `key:value`, returning the value previously stored under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Return the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Number of tags in the set.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the set has no tags.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tags in key order.
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.0.iter())
    }

    /// Return a new set containing the tags of `self` overlaid with the tags of `other`.
    ///
    /// On a key collision the value from `other` wins. Neither input is modified.
    ///
    /// ```
    /// # use tally_core::Tags;
    /// let base = Tags::from([("tag1", "value1"), ("tag2", "value2")]);
    /// let merged = base.merged(&Tags::from([("tag1", "override")]));
    /// assert_eq!(merged.to_string(), "map[tag1:override tag2:value2]");
    /// assert_eq!(base.get("tag1"), Some("value1"));
    /// ```
    pub fn merged(&self, other: &Tags) -> Tags {
        if other.is_empty() {
            return self.clone();
        }
        let mut merged = self.0.clone();
        merged.extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Tags(merged)
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("map[")?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{key}:{value}")?;
        }
        f.write_str("]")
    }
}

/// Iterator over the `(key, value)` pairs of a [`Tags`], in key order.
#[derive(Clone, Debug)]
pub struct Iter<'a>(btree_map::Iter<'a, String, String>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a Tags {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Tags {
    type Item = (String, String);
    type IntoIter = btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Tags(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Tags {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.0
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Tags {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Tags {
    fn from(value: BTreeMap<String, String>) -> Self {
        Tags(value)
    }
}

impl From<HashMap<String, String>> for Tags {
    fn from(value: HashMap<String, String>) -> Self {
        value.into_iter().collect()
    }
}
