use std::collections::btree_set::{self, BTreeSet};

use crate::error::Error;

/// Script opcode that marks an output as provably unspendable.
const OP_RETURN: u8 = 0x6a;

/// The deduplicated set of byte strings a filter is built from.
///
/// Elements are compared by raw content. Iteration is in byte order, though
/// the encoder's output does not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementSet {
    elements: BTreeSet<Vec<u8>>,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses hex-encoded elements, deduplicating by decoded content.
    pub fn from_hex<I, S>(items: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for (index, item) in items.into_iter().enumerate() {
            let bytes = hex::decode(item.as_ref().trim())
                .map_err(|source| Error::InvalidElement { index, source })?;
            set.insert(bytes);
        }
        Ok(set)
    }

    /// Adds an element. Returns `false` if it was already present.
    pub fn insert(&mut self, element: impl Into<Vec<u8>>) -> bool {
        self.elements.insert(element.into())
    }

    /// Adds a block output's scriptPubKey under the BIP158 basic filter rules:
    /// empty scripts and OP_RETURN outputs are skipped.
    pub fn insert_output_script(&mut self, script: &[u8]) -> bool {
        match script.first() {
            None | Some(&OP_RETURN) => false,
            Some(_) => self.insert(script),
        }
    }

    /// Adds the scriptPubKey spent by a block input. Empty scripts are skipped.
    pub fn insert_spent_script(&mut self, script: &[u8]) -> bool {
        !script.is_empty() && self.insert(script)
    }

    pub fn contains(&self, element: &[u8]) -> bool {
        self.elements.contains(element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.elements.iter().map(Vec::as_slice)
    }
}

impl<E: Into<Vec<u8>>> FromIterator<E> for ElementSet {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        Self {
            elements: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<E: Into<Vec<u8>>> Extend<E> for ElementSet {
    fn extend<T: IntoIterator<Item = E>>(&mut self, iter: T) {
        self.elements.extend(iter.into_iter().map(Into::into));
    }
}

impl IntoIterator for ElementSet {
    type Item = Vec<u8>;
    type IntoIter = btree_set::IntoIter<Vec<u8>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}
