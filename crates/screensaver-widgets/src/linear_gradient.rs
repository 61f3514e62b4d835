//! Linear gradient drifting across an oversized background.
//!
//! The gradient is painted at 200% of the container and its
//! `background-position` slides through `[0, 200)` percent, wrapping, so the
//! stops appear to flow in the gradient's direction.

use crate::capability::{
    clamp_to, AngleAdjustable, ColorSequenceEditable, ColorSpace, ColorSpaceAdjustable,
    ColorSpaceSetting, OffsetAdjustable, SpeedAdjustable, TransformAdjustable, SPEED_RANGE,
};
use crate::palette::{Generated, Palette};
use crate::registry::{color_descriptors, gradient_descriptors, transform_descriptors};
use crate::style::{css_number, gradient_stops, StyleBinding};
use crate::widget::{AnimatedWidget, Attributes, Phase, ResolvedParams, Surface, WidgetContext};
use screensaver_core::{
    wrap, Bounds, ColorSequence, Defaults, LoopToken, ParamDescriptor, Size, WidgetKind,
};

const KIND: WidgetKind = WidgetKind::LinearGradient;
/// Period of the background offset, in percent.
pub const OFFSET_PERIOD: f64 = 200.0;

/// Parameter schema.
#[must_use]
pub fn schema(defaults: &Defaults, colors: &ColorSequence) -> Vec<ParamDescriptor> {
    let d = &defaults.linear_gradient;
    let mut schema = vec![
        ParamDescriptor::range("speed", "Speed", Bounds::new(0.0, 10.0, 0.5), d.speed),
        ParamDescriptor::range("angle", "Angle", Bounds::new(0.0, 360.0, 1.0), d.angle),
        ParamDescriptor::range(
            "offsetX",
            "Horizontal offset",
            Bounds::new(-100.0, 100.0, 1.0),
            0.0,
        ),
        ParamDescriptor::range(
            "offsetY",
            "Vertical offset",
            Bounds::new(-100.0, 100.0, 1.0),
            0.0,
        ),
    ];
    schema.extend(transform_descriptors());
    schema.extend(gradient_descriptors());
    schema.extend(color_descriptors(colors));
    schema
}

/// Configuration resolved once from the instance attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientConfig {
    /// Speed setting (0 disables the drift)
    pub speed: f64,
    /// Gradient direction in degrees
    pub angle: f64,
    /// Static horizontal shift in percent
    pub offset_x: f64,
    /// Static vertical shift in percent
    pub offset_y: f64,
    /// Global rotation in degrees
    pub rotation: f64,
    /// Global scale factor
    pub scale: f64,
    /// Drift backwards
    pub reverse: bool,
    /// Color blending
    pub color_space: ColorSpaceSetting,
    /// Drift in percent per second per speed unit
    pub offset_rate: f64,
}

impl LinearGradientConfig {
    /// Merge `attributes` with the schema defaults.
    #[must_use]
    pub fn resolve(attributes: &Attributes, defaults: &Defaults) -> Self {
        let schema = schema(defaults, &defaults.palette(KIND));
        let p = ResolvedParams::resolve(&schema, attributes);
        Self {
            speed: p.number("speed", defaults.linear_gradient.speed),
            angle: p.number("angle", defaults.linear_gradient.angle),
            offset_x: p.number("offsetX", 0.0),
            offset_y: p.number("offsetY", 0.0),
            rotation: p.number("rotation", 0.0),
            scale: p.number("scale", 1.0),
            reverse: p.flag("reverse"),
            color_space: ColorSpaceSetting {
                chosen: p.text("colorSpace").and_then(|s| s.parse().ok()),
                enabled: p.enabled("colorSpace"),
            },
            offset_rate: defaults.linear_gradient.offset_rate,
        }
    }
}

/// Live values, mutated by ticks and update calls.
#[derive(Debug, Clone)]
struct LiveState {
    speed: f64,
    angle: f64,
    offset_x: f64,
    offset_y: f64,
    reverse: bool,
    color_space: ColorSpaceSetting,
    /// Animated drift in `[0, 200)`
    offset: f64,
}

/// Linear gradient widget.
#[derive(Debug)]
pub struct LinearGradient {
    config: LinearGradientConfig,
    state: LiveState,
    palette: Palette,
    surface: Surface,
}

impl LinearGradient {
    /// Build from a resolved configuration; colors are loaded from the store.
    #[must_use]
    pub fn new(config: LinearGradientConfig, ctx: WidgetContext) -> Self {
        let palette = Palette::load(
            KIND,
            ctx.store,
            &ctx.defaults.palette(KIND),
            ctx.observer,
            ctx.rng,
            Generated::Random {
                saturation: 60..=100,
                lightness: 40..=60,
            },
        );
        let state = LiveState {
            speed: clamp_to(config.speed, SPEED_RANGE),
            angle: wrap(config.angle, 360.0),
            offset_x: config.offset_x,
            offset_y: config.offset_y,
            reverse: config.reverse,
            color_space: config.color_space,
            offset: 0.0,
        };
        let mut widget = Self {
            surface: Surface::new(config.rotation, config.scale),
            config,
            state,
            palette,
        };
        widget.render_gradient();
        widget.render_position();
        widget
    }

    /// Constructor registered for this kind.
    #[must_use]
    pub fn create(ctx: WidgetContext) -> Box<dyn AnimatedWidget> {
        let config = LinearGradientConfig::resolve(&ctx.attributes, &ctx.defaults);
        Box::new(Self::new(config, ctx))
    }

    /// Configuration the instance was created with.
    #[must_use]
    pub const fn config(&self) -> &LinearGradientConfig {
        &self.config
    }

    /// Current animated drift in `[0, 200)` percent.
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.state.offset
    }

    fn wants_loop(&self) -> bool {
        self.state.speed > 0.0
    }

    fn render_gradient(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let image = format!(
            "linear-gradient({}deg{}, {})",
            css_number(self.state.angle),
            self.state.color_space.interpolation(),
            gradient_stops(self.palette.colors())
        );
        self.surface.style.set("background-image", image);
        self.surface.style.set("background-size", "200% 200%");
    }

    fn render_position(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let x = wrap(self.state.offset + self.state.offset_x, OFFSET_PERIOD);
        let y = wrap(self.state.offset + self.state.offset_y, OFFSET_PERIOD);
        self.surface.style.set(
            "background-position",
            format!("{}% {}%", css_number(x), css_number(y)),
        );
    }
}

impl AnimatedWidget for LinearGradient {
    fn kind(&self) -> WidgetKind {
        KIND
    }

    fn phase(&self) -> Phase {
        self.surface.phase()
    }

    fn attach(&mut self, viewport: Size) {
        if self.surface.attach(KIND, viewport) {
            let wanted = self.wants_loop();
            self.surface.sync_loop(wanted);
        }
    }

    fn stop(&mut self) {
        self.surface.stop(KIND);
    }

    fn resize(&mut self, viewport: Size) {
        self.surface.resize(viewport);
    }

    fn loop_token(&self) -> Option<LoopToken> {
        self.surface.token()
    }

    fn tick(&mut self, token: LoopToken, now_ms: f64) {
        let Some(elapsed_ms) = self.surface.advance(token, now_ms) else {
            return;
        };
        let direction = if self.state.reverse { -1.0 } else { 1.0 };
        let delta = direction * self.state.speed * self.config.offset_rate * elapsed_ms / 1000.0;
        self.state.offset = wrap(self.state.offset + delta, OFFSET_PERIOD);
        self.render_position();
    }

    fn style(&self) -> &StyleBinding {
        &self.surface.style
    }

    fn as_speed(&mut self) -> Option<&mut dyn SpeedAdjustable> {
        Some(self)
    }

    fn as_angle(&mut self) -> Option<&mut dyn AngleAdjustable> {
        Some(self)
    }

    fn as_offset(&mut self) -> Option<&mut dyn OffsetAdjustable> {
        Some(self)
    }

    fn as_transform(&mut self) -> Option<&mut dyn TransformAdjustable> {
        Some(self)
    }

    fn as_color_space(&mut self) -> Option<&mut dyn ColorSpaceAdjustable> {
        Some(self)
    }

    fn as_color_sequence(&mut self) -> Option<&mut dyn ColorSequenceEditable> {
        Some(self)
    }
}

impl SpeedAdjustable for LinearGradient {
    fn speed(&self) -> f64 {
        self.state.speed
    }

    fn update_speed(&mut self, speed: f64) {
        self.state.speed = clamp_to(speed, SPEED_RANGE);
        let wanted = self.wants_loop();
        self.surface.sync_loop(wanted);
    }

    fn update_reverse(&mut self, reverse: bool) {
        self.state.reverse = reverse;
    }
}

impl AngleAdjustable for LinearGradient {
    fn update_angle(&mut self, degrees: f64) {
        self.state.angle = clamp_to(degrees, (0.0, 360.0));
        self.render_gradient();
    }
}

impl OffsetAdjustable for LinearGradient {
    fn update_offset_x(&mut self, percent: f64) {
        self.state.offset_x = clamp_to(percent, (-100.0, 100.0));
        self.render_position();
    }

    fn update_offset_y(&mut self, percent: f64) {
        self.state.offset_y = clamp_to(percent, (-100.0, 100.0));
        self.render_position();
    }
}

impl TransformAdjustable for LinearGradient {
    fn global_rotation(&self) -> f64 {
        self.surface.rotation()
    }

    fn global_scale(&self) -> f64 {
        self.surface.scale()
    }

    fn update_global_rotation(&mut self, degrees: f64) {
        self.surface.set_rotation(degrees);
    }

    fn update_global_scale(&mut self, factor: f64) {
        self.surface.set_scale(factor);
    }
}

impl ColorSpaceAdjustable for LinearGradient {
    fn update_color_space(&mut self, space: Option<ColorSpace>) {
        self.state.color_space.chosen = space;
        self.render_gradient();
    }

    fn set_color_space_enabled(&mut self, enabled: bool) {
        self.state.color_space.enabled = enabled;
        self.render_gradient();
    }

    fn effective_color_space(&self) -> Option<ColorSpace> {
        self.state.color_space.effective()
    }
}

impl ColorSequenceEditable for LinearGradient {
    fn colors(&self) -> &ColorSequence {
        self.palette.colors()
    }

    fn update_color(&mut self, index: usize, color: &str) {
        if self.palette.update(index, color) {
            self.render_gradient();
        }
    }

    fn add_color(&mut self, color: Option<&str>) {
        if self.palette.add(color) {
            self.render_gradient();
        }
    }

    fn duplicate_color(&mut self, index: usize) {
        if self.palette.duplicate(index) {
            self.render_gradient();
        }
    }

    fn remove_color(&mut self, index: usize) {
        if self.palette.remove(index).is_some() {
            self.render_gradient();
        }
    }

    fn move_color_up(&mut self, index: usize) {
        if self.palette.move_up(index) {
            self.render_gradient();
        }
    }

    fn move_color_down(&mut self, index: usize) {
        if self.palette.move_down(index) {
            self.render_gradient();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use screensaver_core::ParameterStore;
    use std::rc::Rc;

    fn widget(attributes: Attributes) -> (LinearGradient, Rc<ParameterStore>) {
        let store = Rc::new(ParameterStore::in_memory());
        let defaults = Rc::new(Defaults::default());
        let ctx = WidgetContext::new(Rc::clone(&store), Rc::clone(&defaults))
            .attributes(attributes)
            .seed(3);
        let config = LinearGradientConfig::resolve(&ctx.attributes, &defaults);
        (LinearGradient::new(config, ctx), store)
    }

    #[test]
    fn test_config_from_attributes() {
        let attrs = Attributes::new()
            .with("speed", "4")
            .with("angle", "45")
            .with("scale", "12")
            .with("colorSpace", "oklch")
            .with("colorSpace_enabled", "true");
        let (w, _) = widget(attrs);
        let c = w.config();
        assert_eq!(c.speed, 4.0);
        assert_eq!(c.angle, 45.0);
        assert_eq!(c.scale, 3.0);
        assert_eq!(c.color_space.effective(), Some(ColorSpace::Oklch));
    }

    #[test]
    fn test_initial_style_uses_default_palette() {
        let (w, _) = widget(Attributes::new());
        assert_eq!(
            w.style().get("background-image"),
            Some("linear-gradient(90deg, #ff0000 0%, #0000ff 33.333%, #00ff00 66.667%, #ffff00 100%)")
        );
        assert_eq!(w.style().get("background-position"), Some("0% 0%"));
    }

    #[test]
    fn test_drift_advances_and_wraps() {
        let (mut w, _) = widget(Attributes::new().with("speed", "10"));
        w.attach(Size::new(800.0, 600.0));
        let token = w.loop_token().unwrap();
        w.tick(token, 0.0);
        // 10 speed * 5 %/s = 50 % per second
        w.tick(token, 1000.0);
        assert!((w.offset() - 50.0).abs() < 1e-9);
        w.tick(token, 5000.0);
        assert!((w.offset() - 50.0).abs() < 1e-9);
        assert_eq!(w.style().get("background-position"), Some("50% 50%"));
    }

    #[test]
    fn test_reverse_wraps_below_zero() {
        let (mut w, _) = widget(Attributes::new().with("speed", "2").with("reverse", "true"));
        w.attach(Size::new(100.0, 100.0));
        let token = w.loop_token().unwrap();
        w.tick(token, 0.0);
        w.tick(token, 1000.0);
        assert!((w.offset() - 190.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_speed_never_starts() {
        let (mut w, _) = widget(Attributes::new().with("speed", "0"));
        w.attach(Size::new(100.0, 100.0));
        assert_eq!(w.phase(), Phase::Running);
        assert!(!w.is_animating());
    }

    #[test]
    fn test_color_space_toggle() {
        let (mut w, _) = widget(Attributes::new());
        w.update_color_space(Some(ColorSpace::Hsl));
        assert!(!w.style().get("background-image").unwrap().contains(" in "));
        w.set_color_space_enabled(true);
        assert!(w
            .style()
            .get("background-image")
            .unwrap()
            .starts_with("linear-gradient(90deg in hsl, "));
    }

    #[test]
    fn test_transform_rewrites_cover_box() {
        let (mut w, _) = widget(Attributes::new());
        w.attach(Size::new(800.0, 600.0));
        assert_eq!(w.style().get("width"), Some("800px"));
        w.update_global_scale(2.0);
        assert_eq!(w.style().get("width"), Some("1600px"));
        assert_eq!(w.style().get("left"), Some("-400px"));
        w.update_global_rotation(-90.0);
        assert_eq!(w.style().get("width"), Some("1200px"));
        assert_eq!(w.style().get("transform"), Some("rotate(-90deg)"));
    }

    #[test]
    fn test_color_count_change_redistributes_stops() {
        let (mut w, store) = widget(Attributes::new());
        w.remove_color(3);
        w.remove_color(2);
        assert_eq!(
            w.style().get("background-image"),
            Some("linear-gradient(90deg, #ff0000 0%, #0000ff 100%)")
        );
        assert_eq!(
            store.get_raw("screensaver-linear-gradient-colors").as_deref(),
            Some(r##"["#ff0000","#0000ff"]"##)
        );
    }

    #[test]
    fn test_stop_detaches_output() {
        let (mut w, _) = widget(Attributes::new());
        w.attach(Size::new(100.0, 100.0));
        let token = w.loop_token().unwrap();
        w.stop();
        w.tick(token, 10.0);
        w.update_angle(10.0);
        assert!(w.style().is_empty());
        assert_eq!(w.phase(), Phase::Stopped);
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_period(
            speed in 0.0f64..10.0,
            reverse in any::<bool>(),
            steps in proptest::collection::vec(0.0f64..5000.0, 1..20),
        ) {
            let attrs = Attributes::new()
                .with("speed", speed.to_string())
                .with("reverse", reverse.to_string());
            let (mut w, _) = widget(attrs);
            w.attach(Size::new(320.0, 200.0));
            let mut now = 0.0;
            if let Some(token) = w.loop_token() {
                for step in steps {
                    now += step;
                    w.tick(token, now);
                    prop_assert!((0.0..OFFSET_PERIOD).contains(&w.offset()));
                }
            }
        }
    }
}
