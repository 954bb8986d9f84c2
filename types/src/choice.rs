//! Fixed-width ballot choice labels.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ballot choice label, stored as a zero-padded 32-byte word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChoiceLabel([u8; 32]);

impl ChoiceLabel {
    pub const WIDTH: usize = 32;

    /// Build a label from UTF-8 text of at most 32 bytes.
    pub fn new(text: &str) -> Result<Self, TypesError> {
        let bytes = text.as_bytes();
        if bytes.len() > Self::WIDTH {
            return Err(TypesError::LabelTooLong(bytes.len()));
        }
        let mut word = [0u8; 32];
        word[..bytes.len()].copy_from_slice(bytes);
        Ok(Self(word))
    }

    pub fn from_bytes(word: [u8; 32]) -> Self {
        Self(word)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// The label text with trailing zero padding removed (lossy for non-UTF-8 words).
    pub fn text(&self) -> String {
        let end = self.0.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
        String::from_utf8_lossy(&self.0[..end]).into_owned()
    }
}

impl fmt::Debug for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChoiceLabel({:?})", self.text())
    }
}

impl fmt::Display for ChoiceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
