//! Background color stepping through a palette at a fixed interval.

use crate::capability::{
    clamp_to, ColorSequenceEditable, SpeedAdjustable, Transition, TransitionAdjustable,
    SPEED_RANGE,
};
use crate::palette::{Generated, Palette};
use crate::registry::color_descriptors;
use crate::style::StyleBinding;
use crate::widget::{AnimatedWidget, Attributes, Phase, ResolvedParams, Surface, WidgetContext};
use screensaver_core::{
    Bounds, ColorSequence, Defaults, LoopToken, ParamDescriptor, Size, StepTimer, WidgetKind,
};

const KIND: WidgetKind = WidgetKind::ColorCycle;

/// Parameter schema.
#[must_use]
pub fn schema(defaults: &Defaults, colors: &ColorSequence) -> Vec<ParamDescriptor> {
    let mut schema = vec![
        ParamDescriptor::range(
            "speed",
            "Speed",
            Bounds::new(1.0, 10.0, 1.0),
            defaults.color_cycle.speed,
        ),
        ParamDescriptor::button_group(
            "transition",
            "Transition",
            Transition::options(),
            Transition::default().as_str(),
        ),
        ParamDescriptor::switch("reverse", "Reverse", false),
    ];
    schema.extend(color_descriptors(colors));
    schema
}

/// Configuration resolved once from the instance attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorCycleConfig {
    /// Speed setting; the step interval is `base_duration_ms / speed`
    pub speed: f64,
    /// Fade between steps
    pub transition: Transition,
    /// Walk the palette backwards
    pub reverse: bool,
    /// Step interval at speed 1
    pub base_duration_ms: f64,
}

impl ColorCycleConfig {
    /// Merge `attributes` with the schema defaults.
    #[must_use]
    pub fn resolve(attributes: &Attributes, defaults: &Defaults) -> Self {
        let schema = schema(defaults, &defaults.palette(KIND));
        let p = ResolvedParams::resolve(&schema, attributes);
        Self {
            speed: p.number("speed", defaults.color_cycle.speed),
            transition: p
                .text("transition")
                .and_then(|t| t.parse().ok())
                .unwrap_or_default(),
            reverse: p.flag("reverse"),
            base_duration_ms: defaults.color_cycle.base_duration_ms,
        }
    }
}

/// Color cycle widget.
#[derive(Debug)]
pub struct ColorCycle {
    config: ColorCycleConfig,
    speed: f64,
    transition: Transition,
    reverse: bool,
    cursor: usize,
    timer: StepTimer,
    palette: Palette,
    surface: Surface,
}

impl ColorCycle {
    /// Build from a resolved configuration.
    #[must_use]
    pub fn new(config: ColorCycleConfig, ctx: WidgetContext) -> Self {
        let cycle = &ctx.defaults.color_cycle;
        let generated = Generated::Fixed {
            saturation: cycle.saturation,
            lightness: cycle.lightness,
        };
        let palette = Palette::load(
            KIND,
            ctx.store,
            &ctx.defaults.palette(KIND),
            ctx.observer,
            ctx.rng,
            generated,
        );
        let mut widget = Self {
            speed: clamp_to(config.speed, SPEED_RANGE),
            transition: config.transition,
            reverse: config.reverse,
            cursor: 0,
            timer: StepTimer::new(),
            surface: Surface::new(0.0, 1.0),
            config,
            palette,
        };
        widget.render();
        widget
    }

    /// Constructor registered for this kind.
    #[must_use]
    pub fn create(ctx: WidgetContext) -> Box<dyn AnimatedWidget> {
        let config = ColorCycleConfig::resolve(&ctx.attributes, &ctx.defaults);
        Box::new(Self::new(config, ctx))
    }

    /// Configuration the instance was created with.
    #[must_use]
    pub const fn config(&self) -> &ColorCycleConfig {
        &self.config
    }

    /// Index of the color currently shown.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Milliseconds between steps; infinite while stopped.
    #[must_use]
    pub fn interval_ms(&self) -> f64 {
        if self.speed > 0.0 {
            self.config.base_duration_ms / self.speed
        } else {
            f64::INFINITY
        }
    }

    fn wants_loop(&self) -> bool {
        self.speed > 0.0 && self.palette.len() > 1
    }

    /// Start or stop the loop only when its wanted state changed, so a
    /// running cycle keeps its token across palette edits.
    fn refresh_loop(&mut self) {
        let wanted = self.wants_loop();
        if wanted != self.surface.token().is_some() {
            self.timer.reset();
            self.surface.sync_loop(wanted);
        }
    }

    /// Keep the cursor on the color it showed after `a` and `b` swapped.
    fn follow_swap(&mut self, a: usize, b: usize) {
        if self.cursor == a {
            self.cursor = b;
        } else if self.cursor == b {
            self.cursor = a;
        }
        self.render();
    }

    fn step(&mut self) {
        let len = self.palette.len();
        self.cursor = if self.reverse {
            (self.cursor + len - 1) % len
        } else {
            (self.cursor + 1) % len
        };
        self.render();
    }

    fn render(&mut self) {
        if !self.surface.is_live() {
            return;
        }
        let color = self
            .palette
            .colors()
            .get(self.cursor)
            .unwrap_or_default()
            .to_string();
        let transition = if self.speed > 0.0 {
            self.transition.css(self.interval_ms() / 1000.0)
        } else {
            Transition::Instant.css(0.0)
        };
        self.surface.style.set("background-color", color);
        self.surface.style.set("transition", transition);
    }
}

impl AnimatedWidget for ColorCycle {
    fn kind(&self) -> WidgetKind {
        KIND
    }

    fn phase(&self) -> Phase {
        self.surface.phase()
    }

    fn attach(&mut self, viewport: Size) {
        if self.surface.attach(KIND, viewport) {
            self.refresh_loop();
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
        let interval = self.interval_ms();
        if self.timer.advance(elapsed_ms, interval) {
            self.step();
        }
    }

    fn style(&self) -> &StyleBinding {
        &self.surface.style
    }

    fn as_speed(&mut self) -> Option<&mut dyn SpeedAdjustable> {
        Some(self)
    }

    fn as_color_sequence(&mut self) -> Option<&mut dyn ColorSequenceEditable> {
        Some(self)
    }

    fn as_transition(&mut self) -> Option<&mut dyn TransitionAdjustable> {
        Some(self)
    }
}

impl SpeedAdjustable for ColorCycle {
    fn speed(&self) -> f64 {
        self.speed
    }

    fn update_speed(&mut self, speed: f64) {
        self.speed = clamp_to(speed, SPEED_RANGE);
        self.timer.reset();
        let wanted = self.wants_loop();
        self.surface.sync_loop(wanted);
        self.render();
    }

    fn update_reverse(&mut self, reverse: bool) {
        self.reverse = reverse;
    }
}

impl TransitionAdjustable for ColorCycle {
    fn update_transition(&mut self, transition: Transition) {
        self.transition = transition;
        self.render();
    }
}

impl ColorSequenceEditable for ColorCycle {
    fn colors(&self) -> &ColorSequence {
        self.palette.colors()
    }

    fn update_color(&mut self, index: usize, color: &str) {
        if self.palette.update(index, color) && index == self.cursor {
            self.render();
        }
    }

    fn add_color(&mut self, color: Option<&str>) {
        if self.palette.add(color) {
            self.refresh_loop();
        }
    }

    fn duplicate_color(&mut self, index: usize) {
        if self.palette.duplicate(index) {
            if index < self.cursor {
                self.cursor += 1;
            }
            self.refresh_loop();
        }
    }

    fn remove_color(&mut self, index: usize) {
        if self.palette.remove(index).is_none() {
            return;
        }
        if index <= self.cursor {
            self.cursor = self.cursor.saturating_sub(1);
        }
        self.cursor = self.cursor.min(self.palette.len() - 1);
        self.refresh_loop();
        self.render();
    }

    fn move_color_up(&mut self, index: usize) {
        if self.palette.move_up(index) {
            self.follow_swap(index - 1, index);
        }
    }

    fn move_color_down(&mut self, index: usize) {
        if self.palette.move_down(index) {
            self.follow_swap(index, index + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screensaver_core::ParameterStore;
    use std::rc::Rc;

    fn widget(attributes: Attributes) -> ColorCycle {
        let store = Rc::new(ParameterStore::in_memory());
        let defaults = Rc::new(Defaults::default());
        let ctx = WidgetContext::new(store, Rc::clone(&defaults))
            .attributes(attributes)
            .seed(9);
        ColorCycle::new(ColorCycleConfig::resolve(&ctx.attributes, &defaults), ctx)
    }

    fn running(attributes: Attributes) -> (ColorCycle, LoopToken) {
        let mut w = widget(attributes);
        w.attach(Size::new(100.0, 100.0));
        let token = w.loop_token().unwrap();
        w.tick(token, 0.0);
        (w, token)
    }

    #[test]
    fn test_interval_is_inverse_of_speed() {
        let w = widget(Attributes::new().with("speed", "4"));
        assert_eq!(w.interval_ms(), 1000.0);
        assert_eq!(
            w.style().get("transition"),
            Some("background-color 1s ease-in-out")
        );
        assert_eq!(w.style().get("background-color"), Some("#ff0000"));
    }

    #[test]
    fn test_steps_wrap_around() {
        let (mut w, token) = running(Attributes::new().with("speed", "4"));
        w.tick(token, 999.0);
        assert_eq!(w.cursor(), 0);
        w.tick(token, 1000.0);
        assert_eq!(w.cursor(), 1);
        w.tick(token, 2000.0);
        w.tick(token, 3000.0);
        assert_eq!(w.cursor(), 0);
        assert_eq!(w.style().get("background-color"), Some("#ff0000"));
    }

    #[test]
    fn test_reverse_walks_backwards() {
        let (mut w, token) = running(Attributes::new().with("speed", "10").with("reverse", "true"));
        w.tick(token, 400.0);
        assert_eq!(w.cursor(), 2);
        assert_eq!(w.style().get("background-color"), Some("#80ff00"));
    }

    #[test]
    fn test_remove_at_or_before_cursor_clamps_down() {
        let (mut w, token) = running(Attributes::new().with("speed", "10"));
        w.tick(token, 400.0);
        w.tick(token, 800.0);
        assert_eq!(w.cursor(), 2);
        w.remove_color(2);
        assert_eq!(w.cursor(), 1);
        w.remove_color(0);
        assert_eq!(w.cursor(), 0);
        assert_eq!(w.style().get("background-color"), Some("#ffff00"));
    }

    #[test]
    fn test_remove_after_cursor_keeps_it() {
        let (mut w, token) = running(Attributes::new().with("speed", "10"));
        w.tick(token, 400.0);
        w.remove_color(2);
        assert_eq!(w.cursor(), 1);
    }

    #[test]
    fn test_single_color_does_not_loop() {
        let (mut w, _) = running(Attributes::new());
        w.remove_color(2);
        assert!(w.is_animating());
        w.remove_color(1);
        assert!(!w.is_animating());
        w.remove_color(0);
        assert_eq!(w.colors().len(), 1);
        w.add_color(Some("#0000ff"));
        assert!(w.is_animating());
    }

    #[test]
    fn test_moved_color_stays_on_screen() {
        let (mut w, token) = running(Attributes::new().with("speed", "10"));
        w.tick(token, 400.0);
        assert_eq!(w.cursor(), 1);
        w.move_color_up(1);
        assert_eq!(w.cursor(), 0);
        assert_eq!(w.style().get("background-color"), Some("#ffff00"));
        w.move_color_down(0);
        assert_eq!(w.cursor(), 1);
        w.move_color_down(1);
        assert_eq!(w.cursor(), 2);
        assert_eq!(w.style().get("background-color"), Some("#ffff00"));
        // swapping two other colors leaves the cursor alone
        w.move_color_up(1);
        assert_eq!(w.cursor(), 2);
        w.move_color_down(usize::MAX);
        assert_eq!(w.cursor(), 2);
    }

    #[test]
    fn test_zero_speed_halts_cycle() {
        let (mut w, token) = running(Attributes::new().with("speed", "10"));
        w.tick(token, 400.0);
        assert_eq!(w.cursor(), 1);

        w.update_speed(0.0);
        assert!(!w.is_animating());
        assert_eq!(w.interval_ms(), f64::INFINITY);
        assert_eq!(w.style().get("transition"), Some("none"));
        w.tick(token, 5000.0);
        assert_eq!(w.cursor(), 1);

        w.update_speed(10.0);
        let resumed = w.loop_token().unwrap();
        assert_ne!(resumed, token);
        w.tick(resumed, 6000.0);
        w.tick(resumed, 6400.0);
        assert_eq!(w.cursor(), 2);
    }

    #[test]
    fn test_palette_edit_keeps_loop_token() {
        let (mut w, token) = running(Attributes::new());
        w.add_color(None);
        assert_eq!(w.loop_token(), Some(token));
        assert!(w.colors().get(3).unwrap().ends_with(", 70%, 50%)"));
    }

    #[test]
    fn test_transition_choice() {
        let mut w = widget(Attributes::new().with("transition", "instant"));
        assert_eq!(w.config().transition, Transition::Instant);
        assert_eq!(w.style().get("transition"), Some("none"));
        w.update_transition(Transition::Linear);
        assert_eq!(
            w.style().get("transition"),
            Some("background-color 0.8s linear")
        );
    }
}
