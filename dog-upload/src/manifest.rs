use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::PartResult;

/// Reasons a set of part results cannot form a manifest
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("part {0} reported more than once")]
    Duplicate(u32),

    #[error("part {0} is missing")]
    Missing(u32),

    #[error("part {part_number} is outside 1..={expected}")]
    Unexpected { part_number: u32, expected: u32 },
}

/// Ordered `(part number, etag)` list submitted to finalize a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CompletionManifest {
    parts: Vec<PartResult>,
}

impl CompletionManifest {
    /// Build a manifest from results in arbitrary completion order.
    ///
    /// The part numbers must be exactly `1..=expected_parts`.
    pub fn build<I>(results: I, expected_parts: u32) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = PartResult>,
    {
        let mut by_number = BTreeMap::new();
        for result in results {
            if result.part_number == 0 || result.part_number > expected_parts {
                return Err(ManifestError::Unexpected {
                    part_number: result.part_number,
                    expected: expected_parts,
                });
            }
            let part_number = result.part_number;
            if by_number.insert(part_number, result).is_some() {
                return Err(ManifestError::Duplicate(part_number));
            }
        }

        if let Some(missing) = (1..=expected_parts).find(|n| !by_number.contains_key(n)) {
            return Err(ManifestError::Missing(missing));
        }

        Ok(Self {
            parts: by_number.into_values().collect(),
        })
    }

    pub fn parts(&self) -> &[PartResult] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<PartResult> {
        self.parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: u32) -> PartResult {
        PartResult {
            part_number: n,
            etag: format!("etag-{n}"),
        }
    }

    #[test]
    fn sorts_out_of_order_results() {
        let manifest = CompletionManifest::build(vec![result(3), result(1), result(2)], 3).unwrap();
        let numbers: Vec<u32> = manifest.parts().iter().map(|p| p.part_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(manifest.parts()[0].etag, "etag-1");
    }

    #[test]
    fn rejects_gaps_and_duplicates() {
        assert_eq!(
            CompletionManifest::build(vec![result(1), result(3)], 3),
            Err(ManifestError::Missing(2))
        );
        assert_eq!(
            CompletionManifest::build(vec![result(1), result(1)], 2),
            Err(ManifestError::Duplicate(1))
        );
        assert_eq!(
            CompletionManifest::build(vec![result(4)], 3),
            Err(ManifestError::Unexpected {
                part_number: 4,
                expected: 3
            })
        );
    }

    #[test]
    fn serializes_as_plain_list() {
        let manifest = CompletionManifest::build(vec![result(1)], 1).unwrap();
        assert_eq!(
            serde_json::to_value(&manifest).unwrap(),
            serde_json::json!([{"PartNumber": 1, "ETag": "etag-1"}])
        );
    }
}
