//! Dense indexing of seed labels
//!
//! Label values in the input volume are sparse (any positive i8). Vote counts
//! are stored per dense index 0..num_labels, so each distinct label is mapped
//! to a slot in a small table.

use crate::error::{GrowError, GrowResult};

/// Lookup table between positive label values and dense indices
#[derive(Debug, Clone)]
pub struct LabelIndexer {
    /// Dense index -> label value, in discovery order
    labels: Vec<i8>,
    /// Label value (1..=127) -> dense index
    slots: [Option<usize>; 128],
}

impl LabelIndexer {
    /// Scan `labels` in ascending flat index and assign dense indices in
    /// order of first appearance.
    pub fn build(labels: &[i8]) -> GrowResult<Self> {
        let mut indexer = LabelIndexer {
            labels: Vec::new(),
            slots: [None; 128],
        };

        for &label in labels {
            if label > 0 && indexer.slots[label as usize].is_none() {
                indexer.slots[label as usize] = Some(indexer.labels.len());
                indexer.labels.push(label);
            }
        }

        if indexer.labels.is_empty() {
            return Err(GrowError::EmptyInput);
        }

        Ok(indexer)
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }

    /// Dense index of a label value, `None` if non-positive or never seen
    #[inline]
    pub fn index_of(&self, label: i8) -> Option<usize> {
        if label > 0 {
            self.slots[label as usize]
        } else {
            None
        }
    }

    /// Label value stored at a dense index
    #[inline]
    pub fn label_of(&self, index: usize) -> i8 {
        self.labels[index]
    }

    /// All label values in dense-index order
    pub fn labels(&self) -> &[i8] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_order() {
        let volume = [-1, 0, 7, 3, 7, 0, 120, 3, -5];
        let indexer = LabelIndexer::build(&volume).unwrap();

        assert_eq!(indexer.num_labels(), 3);
        assert_eq!(indexer.labels(), &[7, 3, 120]);
        assert_eq!(indexer.index_of(7), Some(0));
        assert_eq!(indexer.index_of(3), Some(1));
        assert_eq!(indexer.index_of(120), Some(2));
        assert_eq!(indexer.label_of(2), 120);
    }

    #[test]
    fn test_unknown_and_non_positive_labels() {
        let indexer = LabelIndexer::build(&[0, 2, 0]).unwrap();
        assert_eq!(indexer.index_of(5), None);
        assert_eq!(indexer.index_of(0), None);
        assert_eq!(indexer.index_of(-2), None);
    }

    #[test]
    fn test_empty_input() {
        let result = LabelIndexer::build(&[0, -1, 0, -128]);
        assert!(matches!(result, Err(GrowError::EmptyInput)));
    }
}
