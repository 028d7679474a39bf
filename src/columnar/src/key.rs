// Copyright Materialize, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The placeholder segment used for replies that carry no natural key.
const PLACEHOLDER: &str = "NA";

/// An identifier naming one logical result set within a reply.
///
/// Keys are written as `<item>:<category>`, e.g. `AAPL/1Min/OHLCV:series`.
/// Neither segment may be empty or contain a colon. Equality, ordering, and
/// hashing are by exact string pair, so a `DatasetKey` can serve directly as
/// a map key.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct DatasetKey {
    item: String,
    category: String,
}

impl DatasetKey {
    /// Constructs a key from its two segments.
    pub fn new<S1, S2>(item: S1, category: S2) -> DatasetKey
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        DatasetKey {
            item: item.into(),
            category: category.into(),
        }
    }

    /// The sentinel key (`NA:NA`) under which replies with no natural key are
    /// filed.
    pub fn sentinel() -> DatasetKey {
        DatasetKey::new(PLACEHOLDER, PLACEHOLDER)
    }

    /// Reports whether this is the sentinel key.
    pub fn is_sentinel(&self) -> bool {
        self.item == PLACEHOLDER && self.category == PLACEHOLDER
    }

    /// The primary identifier segment.
    pub fn item(&self) -> &str {
        &self.item
    }

    /// The secondary qualifier segment.
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for DatasetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item, self.category)
    }
}

impl FromStr for DatasetKey {
    type Err = ParseDatasetKeyError;

    fn from_str(s: &str) -> Result<DatasetKey, ParseDatasetKeyError> {
        let (item, category) = s
            .split_once(':')
            .ok_or_else(|| ParseDatasetKeyError(s.into()))?;
        if item.is_empty() || category.is_empty() || category.contains(':') {
            return Err(ParseDatasetKeyError(s.into()));
        }
        Ok(DatasetKey::new(item, category))
    }
}

/// An error indicating that a string is not of the form `<item>:<category>`.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("malformed dataset key: {0:?}")]
pub struct ParseDatasetKeyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_segments() {
        let key: DatasetKey = "AAPL/1Min/OHLCV:series".parse().unwrap();
        assert_eq!(key.item(), "AAPL/1Min/OHLCV");
        assert_eq!(key.category(), "series");
        assert_eq!(key.to_string(), "AAPL/1Min/OHLCV:series");
    }

    #[test]
    fn sentinel_round_trips() {
        let key: DatasetKey = "NA:NA".parse().unwrap();
        assert_eq!(key, DatasetKey::sentinel());
        assert!(key.is_sentinel());
        assert!(!DatasetKey::new("NA", "series").is_sentinel());
    }

    #[test]
    fn rejects_malformed_keys() {
        for s in ["", "nocolon", ":category", "item:", "a:b:c"] {
            assert_eq!(
                s.parse::<DatasetKey>(),
                Err(ParseDatasetKeyError(s.into())),
                "{s:?} should not parse",
            );
        }
    }
}
