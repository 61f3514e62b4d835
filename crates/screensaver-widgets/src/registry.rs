//! Widget registry: kind → schema and constructor.

use crate::capability::ColorSpace;
use crate::widget::{AnimatedWidget, WidgetContext};
use crate::{color_cycle, conic_gradient, linear_gradient, solid_color};
use crate::{ColorCycle, ConicGradient, LinearGradient, SolidColor};
use screensaver_core::{Bounds, ColorSequence, Defaults, ParamDescriptor, ParameterStore, WidgetKind};
use std::rc::Rc;

/// Builds a live widget from its context.
pub type WidgetConstructor = fn(WidgetContext) -> Box<dyn AnimatedWidget>;

/// One `colorN` descriptor per color, defaulting to the current value.
#[must_use]
pub fn color_descriptors(colors: &ColorSequence) -> Vec<ParamDescriptor> {
    colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            ParamDescriptor::color(format!("color{}", i + 1), format!("Color {}", i + 1), color)
        })
        .collect()
}

/// Global rotation and scale.
#[must_use]
pub fn transform_descriptors() -> Vec<ParamDescriptor> {
    vec![
        ParamDescriptor::range("rotation", "Rotation", Bounds::new(-180.0, 180.0, 1.0), 0.0),
        ParamDescriptor::range("scale", "Scale", Bounds::new(0.1, 3.0, 0.1), 1.0),
    ]
}

/// Direction and color blending shared by the gradients.
#[must_use]
pub fn gradient_descriptors() -> Vec<ParamDescriptor> {
    vec![
        ParamDescriptor::switch("reverse", "Reverse", false),
        ParamDescriptor::choice(
            "colorSpace",
            "Color space",
            ColorSpace::options(),
            ColorSpace::Oklab.as_str(),
        ),
    ]
}

/// Maps every [`WidgetKind`] to its schema and constructor.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    defaults: Rc<Defaults>,
}

impl Registry {
    /// Registry using `defaults` for every kind.
    #[must_use]
    pub const fn new(defaults: Rc<Defaults>) -> Self {
        Self { defaults }
    }

    /// Shared defaults.
    #[must_use]
    pub fn defaults(&self) -> Rc<Defaults> {
        Rc::clone(&self.defaults)
    }

    /// Kinds in registration order.
    #[must_use]
    pub fn kinds(&self) -> &'static [WidgetKind] {
        &WidgetKind::ALL
    }

    /// Schema of `kind`, with one color descriptor per stored color.
    #[must_use]
    pub fn describe(&self, kind: WidgetKind, store: &ParameterStore) -> Vec<ParamDescriptor> {
        let defaults = &self.defaults;
        let colors = || store.get_color_sequence(kind.as_str(), &defaults.palette(kind));
        match kind {
            WidgetKind::LinearGradient => linear_gradient::schema(defaults, &colors()),
            WidgetKind::ConicGradient => conic_gradient::schema(defaults, &colors()),
            WidgetKind::ColorCycle => color_cycle::schema(defaults, &colors()),
            WidgetKind::SolidColor => {
                solid_color::schema(&SolidColor::stored_color(store, defaults))
            }
        }
    }

    /// Constructor of `kind`.
    #[must_use]
    pub fn resolve(&self, kind: WidgetKind) -> WidgetConstructor {
        match kind {
            WidgetKind::LinearGradient => LinearGradient::create,
            WidgetKind::ConicGradient => ConicGradient::create,
            WidgetKind::ColorCycle => ColorCycle::create,
            WidgetKind::SolidColor => SolidColor::create,
        }
    }

    /// Build a widget of `kind`. The context's defaults are replaced by the
    /// registry's.
    #[must_use]
    pub fn create(&self, kind: WidgetKind, mut ctx: WidgetContext) -> Box<dyn AnimatedWidget> {
        ctx.defaults = Rc::clone(&self.defaults);
        log::debug!("creating {kind} widget");
        (self.resolve(kind))(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screensaver_core::ParamKind;

    fn names(schema: &[ParamDescriptor]) -> Vec<&str> {
        schema.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn test_every_kind_constructs_its_own_widget() {
        let registry = Registry::default();
        let store = Rc::new(ParameterStore::in_memory());
        for &kind in registry.kinds() {
            let ctx = WidgetContext::new(Rc::clone(&store), registry.defaults());
            assert_eq!(registry.create(kind, ctx).kind(), kind);
        }
    }

    #[test]
    fn test_linear_schema_order() {
        let registry = Registry::default();
        let store = ParameterStore::in_memory();
        let schema = registry.describe(WidgetKind::LinearGradient, &store);
        assert_eq!(
            names(&schema),
            vec![
                "speed", "angle", "offsetX", "offsetY", "rotation", "scale", "reverse",
                "colorSpace", "color1", "color2", "color3", "color4"
            ]
        );
    }

    #[test]
    fn test_color_descriptors_follow_stored_sequence() {
        let registry = Registry::default();
        let store = ParameterStore::in_memory();
        let colors = ColorSequence::from_colors(["#111111", "#222222"]).unwrap();
        store.set_color_sequence("conic-gradient", &colors);
        let schema = registry.describe(WidgetKind::ConicGradient, &store);
        let color_params: Vec<_> = schema.iter().filter(|d| d.kind == ParamKind::Color).collect();
        assert_eq!(color_params.len(), 2);
        assert_eq!(color_params[1].name, "color2");
        assert_eq!(color_params[1].label, "Color 2");
        assert_eq!(color_params[1].color_index(), Some(1));
        assert_eq!(color_params[1].default.as_text(), Some("#222222"));
    }

    #[test]
    fn test_cycle_and_solid_schemas() {
        let registry = Registry::default();
        let store = ParameterStore::in_memory();
        let cycle = registry.describe(WidgetKind::ColorCycle, &store);
        assert_eq!(
            names(&cycle),
            vec!["speed", "transition", "reverse", "color1", "color2", "color3"]
        );
        assert_eq!(cycle[1].kind, ParamKind::ButtonGroup);
        let solid = registry.describe(WidgetKind::SolidColor, &store);
        assert_eq!(names(&solid), vec!["color"]);
        assert_eq!(solid[0].color_index(), None);
    }
}
