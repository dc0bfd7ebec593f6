//! Scale points and the symbol alphabets they are drawn from.

use crate::{BatchError, BatchResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One problem size: a replica count paired with a data-item count.
///
/// Serialized as a two-element array so settings files can list points as
/// `scales = [[2, 2], [2, 3]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct ScalePoint {
    pub replicas: usize,
    pub data: usize,
}

impl ScalePoint {
    pub const fn new(replicas: usize, data: usize) -> Self {
        Self { replicas, data }
    }
}

impl From<(usize, usize)> for ScalePoint {
    fn from((replicas, data): (usize, usize)) -> Self {
        Self { replicas, data }
    }
}

impl From<ScalePoint> for (usize, usize) {
    fn from(point: ScalePoint) -> Self {
        (point.replicas, point.data)
    }
}

impl fmt::Display for ScalePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.replicas, self.data)
    }
}

/// The scale points run by default
pub fn default_scales() -> Vec<ScalePoint> {
    [
        (2, 2), (2, 3), (2, 4), (2, 5),
        (3, 2), (3, 3), (3, 4),
        (4, 2), (4, 3), (4, 4),
    ]
    .into_iter()
    .map(ScalePoint::from)
    .collect()
}

/// Canonical replica and data symbols; experiments use prefixes of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    pub replicas: Vec<String>,
    pub data: Vec<String>,
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            replicas: ["r1", "r2", "r3", "r4", "r5"].map(String::from).to_vec(),
            data: ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
        }
    }
}

impl Alphabet {
    /// Take the first `replicas` and first `data` symbols for a scale point
    pub fn slice(&self, point: ScalePoint) -> BatchResult<SymbolSets> {
        if point.replicas == 0 || point.data == 0 {
            return Err(BatchError::InvalidSettings(format!(
                "scale point {} must have at least one replica and one data item",
                point
            )));
        }
        let replicas = self.replicas.get(..point.replicas).ok_or_else(|| {
            BatchError::InvalidSettings(format!(
                "scale point {} needs {} replica symbols, only {} defined",
                point,
                point.replicas,
                self.replicas.len()
            ))
        })?;
        let data = self.data.get(..point.data).ok_or_else(|| {
            BatchError::InvalidSettings(format!(
                "scale point {} needs {} data symbols, only {} defined",
                point,
                point.data,
                self.data.len()
            ))
        })?;

        Ok(SymbolSets {
            replicas: replicas.to_vec(),
            data: data.to_vec(),
        })
    }
}

/// Replica and data symbols for one experiment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSets {
    pub replicas: Vec<String>,
    pub data: Vec<String>,
}

impl SymbolSets {
    /// `r1, r2`
    pub fn replica_list(&self) -> String {
        self.replicas.join(", ")
    }

    /// `a, b, c`
    pub fn data_list(&self) -> String {
        self.data.join(", ")
    }
}

/// `"s"` unless the count is exactly one
pub fn plural_suffix(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slice_takes_prefixes() {
        let sets = Alphabet::default().slice(ScalePoint::new(2, 3)).unwrap();
        assert_eq!(sets.replicas, vec!["r1", "r2"]);
        assert_eq!(sets.data, vec!["a", "b", "c"]);
        assert_eq!(sets.replica_list(), "r1, r2");
        assert_eq!(sets.data_list(), "a, b, c");
    }

    #[test]
    fn test_slice_rejects_out_of_range_points() {
        let alphabet = Alphabet::default();
        assert!(alphabet.slice(ScalePoint::new(6, 1)).is_err());
        assert!(alphabet.slice(ScalePoint::new(1, 6)).is_err());
        assert!(alphabet.slice(ScalePoint::new(0, 1)).is_err());
    }

    #[test]
    fn test_display_and_pluralization() {
        assert_eq!(ScalePoint::new(2, 3).to_string(), "(2, 3)");
        assert_eq!(plural_suffix(1), "");
        assert_eq!(plural_suffix(2), "s");
    }

    #[test]
    fn test_default_scales_order() {
        let scales = default_scales();
        assert_eq!(scales.len(), 10);
        assert_eq!(scales[0], ScalePoint::new(2, 2));
        assert_eq!(scales[9], ScalePoint::new(4, 4));
    }

    proptest! {
        #[test]
        fn prop_slice_lengths_match_and_are_prefixes(r in 1usize..=5, d in 1usize..=5) {
            let alphabet = Alphabet::default();
            let sets = alphabet.slice(ScalePoint::new(r, d)).unwrap();
            prop_assert_eq!(sets.replicas.len(), r);
            prop_assert_eq!(sets.data.len(), d);
            prop_assert_eq!(&sets.replicas[..], &alphabet.replicas[..r]);
            prop_assert_eq!(&sets.data[..], &alphabet.data[..d]);
        }
    }
}
