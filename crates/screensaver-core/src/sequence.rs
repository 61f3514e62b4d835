//! Ordered, never-empty list of colors driving gradient stops or a cycle
//! palette.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A color sequence that always holds at least one color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct ColorSequence {
    colors: Vec<String>,
}

/// Returned when building a sequence from an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a color sequence needs at least one color")]
pub struct EmptySequence;

impl TryFrom<Vec<String>> for ColorSequence {
    type Error = EmptySequence;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        if colors.is_empty() {
            Err(EmptySequence)
        } else {
            Ok(Self { colors })
        }
    }
}

impl From<ColorSequence> for Vec<String> {
    fn from(sequence: ColorSequence) -> Self {
        sequence.colors
    }
}

impl ColorSequence {
    /// Sequence holding a single color.
    #[must_use]
    pub fn single(color: impl Into<String>) -> Self {
        Self {
            colors: vec![color.into()],
        }
    }

    /// Build from any list of colors.
    ///
    /// # Errors
    ///
    /// Returns [`EmptySequence`] if the list is empty.
    pub fn from_colors<I, S>(colors: I) -> Result<Self, EmptySequence>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::try_from(colors.into_iter().map(Into::into).collect::<Vec<_>>())
    }

    /// Number of colors (always at least 1).
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Colors in order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.colors
    }

    /// Color at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    /// Iterate over the colors.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }

    /// Replace the color at `index`. Returns false if out of bounds.
    pub fn set(&mut self, index: usize, color: impl Into<String>) -> bool {
        match self.colors.get_mut(index) {
            Some(slot) => {
                *slot = color.into();
                true
            }
            None => false,
        }
    }

    /// Append a color.
    pub fn push(&mut self, color: impl Into<String>) {
        self.colors.push(color.into());
    }

    /// Insert a color at `index` (clamped to the end).
    pub fn insert(&mut self, index: usize, color: impl Into<String>) {
        let index = index.min(self.colors.len());
        self.colors.insert(index, color.into());
    }

    /// Remove the color at `index`.
    ///
    /// Rejected (returns `None`) when it would empty the sequence or the index
    /// is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if self.colors.len() <= 1 || index >= self.colors.len() {
            return None;
        }
        Some(self.colors.remove(index))
    }

    /// Swap `index` with its predecessor. No-op at index 0.
    pub fn move_up(&mut self, index: usize) -> bool {
        if index == 0 || index >= self.colors.len() {
            return false;
        }
        self.colors.swap(index - 1, index);
        true
    }

    /// Swap `index` with its successor. No-op at the last index.
    pub fn move_down(&mut self, index: usize) -> bool {
        if index >= self.colors.len().saturating_sub(1) {
            return false;
        }
        self.colors.swap(index, index + 1);
        true
    }

    /// Evenly distributed gradient stops, as `(color, percent)` pairs.
    ///
    /// A single color yields two stops so the gradient is still well formed.
    #[must_use]
    pub fn stops(&self) -> Vec<(&str, f64)> {
        if let [only] = self.colors.as_slice() {
            return vec![(only.as_str(), 0.0), (only.as_str(), 100.0)];
        }
        let last = (self.colors.len() - 1) as f64;
        self.colors
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i as f64 * 100.0 / last))
            .collect()
    }
}

/// Random color with a uniform hue in `[0, 360)` and fixed saturation and
/// lightness, written as `hsl(...)`.
#[must_use]
pub fn random_hsl(rng: &mut fastrand::Rng, saturation: u8, lightness: u8) -> String {
    let hue = rng.u16(0..360);
    format!("hsl({hue}, {saturation}%, {lightness}%)")
}
