//! Color sequence editing shared by the gradient and cycle widgets.
//!
//! Every mutation is persisted immediately under `screensaver-<kind>-colors`;
//! structural ones (count or order) also notify the observer so the settings
//! panel can be rebuilt.

use crate::widget::ColorObserver;
use screensaver_core::{is_valid_css_color, random_hsl, ColorSequence, ParameterStore, WidgetKind};
use std::ops::RangeInclusive;
use std::rc::Rc;

/// Saturation and lightness used for generated colors.
#[derive(Debug, Clone)]
pub(crate) enum Generated {
    /// Same saturation and lightness every time
    Fixed { saturation: u8, lightness: u8 },
    /// Drawn uniformly from the ranges
    Random {
        saturation: RangeInclusive<u8>,
        lightness: RangeInclusive<u8>,
    },
}

pub(crate) struct Palette {
    kind: WidgetKind,
    colors: ColorSequence,
    store: Rc<ParameterStore>,
    observer: Option<ColorObserver>,
    rng: fastrand::Rng,
    generated: Generated,
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Palette")
            .field("kind", &self.kind)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl Palette {
    /// Load the stored sequence of `kind`, falling back to `default`.
    pub(crate) fn load(
        kind: WidgetKind,
        store: Rc<ParameterStore>,
        default: &ColorSequence,
        observer: Option<ColorObserver>,
        rng: fastrand::Rng,
        generated: Generated,
    ) -> Self {
        let colors = store.get_color_sequence(kind.as_str(), default);
        Self {
            kind,
            colors,
            store,
            observer,
            rng,
            generated,
        }
    }

    pub(crate) const fn colors(&self) -> &ColorSequence {
        &self.colors
    }

    pub(crate) fn len(&self) -> usize {
        self.colors.len()
    }

    /// Replace one color. Invalid colors or indices are ignored.
    pub(crate) fn update(&mut self, index: usize, color: &str) -> bool {
        if !is_valid_css_color(color) {
            log::warn!("{}: ignoring invalid color {color:?}", self.kind);
            return false;
        }
        if !self.colors.set(index, color.trim()) {
            return false;
        }
        self.persist();
        true
    }

    /// Append `color`, or a generated one.
    pub(crate) fn add(&mut self, color: Option<&str>) -> bool {
        let color = match color {
            Some(c) if is_valid_css_color(c) => c.trim().to_string(),
            Some(c) => {
                log::warn!("{}: ignoring invalid color {c:?}", self.kind);
                return false;
            }
            None => self.generate(),
        };
        self.colors.push(color);
        self.structure_changed();
        true
    }

    /// Insert a copy of `index` right after it.
    pub(crate) fn duplicate(&mut self, index: usize) -> bool {
        let Some(color) = self.colors.get(index).map(str::to_string) else {
            return false;
        };
        self.colors.insert(index + 1, color);
        self.structure_changed();
        true
    }

    /// Remove `index`; `None` if rejected.
    pub(crate) fn remove(&mut self, index: usize) -> Option<String> {
        let removed = self.colors.remove(index)?;
        self.structure_changed();
        Some(removed)
    }

    pub(crate) fn move_up(&mut self, index: usize) -> bool {
        let moved = self.colors.move_up(index);
        if moved {
            self.structure_changed();
        }
        moved
    }

    pub(crate) fn move_down(&mut self, index: usize) -> bool {
        let moved = self.colors.move_down(index);
        if moved {
            self.structure_changed();
        }
        moved
    }

    fn generate(&mut self) -> String {
        let (saturation, lightness) = match &self.generated {
            Generated::Fixed {
                saturation,
                lightness,
            } => (*saturation, *lightness),
            Generated::Random {
                saturation,
                lightness,
            } => (
                self.rng.u8(saturation.clone()),
                self.rng.u8(lightness.clone()),
            ),
        };
        random_hsl(&mut self.rng, saturation, lightness)
    }

    fn persist(&self) {
        self.store
            .set_color_sequence(self.kind.as_str(), &self.colors);
    }

    fn structure_changed(&mut self) {
        self.persist();
        if let Some(observer) = self.observer.as_mut() {
            observer(self.kind, &self.colors);
        }
    }
}
