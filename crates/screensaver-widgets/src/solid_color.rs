//! Static single-color background. Never starts a loop.

use crate::capability::ColorAdjustable;
use crate::style::StyleBinding;
use crate::widget::{AnimatedWidget, Phase, Surface, WidgetContext};
use screensaver_core::{
    is_valid_css_color, Defaults, LoopToken, ParamDescriptor, ParameterStore, Size, WidgetKind,
};
use std::rc::Rc;

const KIND: WidgetKind = WidgetKind::SolidColor;

/// Parameter schema: a single `color` entry showing `current`.
#[must_use]
pub fn schema(current: &str) -> Vec<ParamDescriptor> {
    vec![ParamDescriptor::color("color", "Color", current)]
}

/// Solid color widget.
#[derive(Debug)]
pub struct SolidColor {
    color: String,
    store: Rc<ParameterStore>,
    surface: Surface,
}

impl SolidColor {
    /// Color stored for this kind, or the configured default.
    #[must_use]
    pub fn stored_color(store: &ParameterStore, defaults: &Defaults) -> String {
        let stored = store.get(KIND.as_str(), "color", &defaults.solid_color.color);
        if is_valid_css_color(&stored) {
            stored
        } else {
            log::warn!("{KIND}: stored color {stored:?} is invalid, using default");
            defaults.solid_color.color.clone()
        }
    }

    /// Build from the stored color.
    #[must_use]
    pub fn new(ctx: WidgetContext) -> Self {
        let color = ctx
            .attributes
            .get("color")
            .filter(|c| is_valid_css_color(c))
            .map_or_else(
                || Self::stored_color(&ctx.store, &ctx.defaults),
                str::to_string,
            );
        let mut widget = Self {
            color,
            store: ctx.store,
            surface: Surface::new(0.0, 1.0),
        };
        widget.render();
        widget
    }

    /// Constructor registered for this kind.
    #[must_use]
    pub fn create(ctx: WidgetContext) -> Box<dyn AnimatedWidget> {
        Box::new(Self::new(ctx))
    }

    fn render(&mut self) {
        if self.surface.is_live() {
            self.surface.style.set("background-color", self.color.clone());
        }
    }
}

impl AnimatedWidget for SolidColor {
    fn kind(&self) -> WidgetKind {
        KIND
    }

    fn phase(&self) -> Phase {
        self.surface.phase()
    }

    fn attach(&mut self, viewport: Size) {
        self.surface.attach(KIND, viewport);
    }

    fn stop(&mut self) {
        self.surface.stop(KIND);
    }

    fn resize(&mut self, viewport: Size) {
        self.surface.resize(viewport);
    }

    fn loop_token(&self) -> Option<LoopToken> {
        None
    }

    fn tick(&mut self, _token: LoopToken, _now_ms: f64) {}

    fn style(&self) -> &StyleBinding {
        &self.surface.style
    }

    fn as_color(&mut self) -> Option<&mut dyn ColorAdjustable> {
        Some(self)
    }
}

impl ColorAdjustable for SolidColor {
    fn color(&self) -> &str {
        &self.color
    }

    fn update_color(&mut self, color: &str) {
        if !is_valid_css_color(color) {
            log::warn!("{KIND}: ignoring invalid color {color:?}");
            return;
        }
        self.color = color.trim().to_string();
        self.store.set(KIND.as_str(), "color", &self.color);
        self.render();
    }
}
