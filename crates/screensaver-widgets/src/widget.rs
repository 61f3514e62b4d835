//! The animated widget contract and the pieces every kind shares.

use crate::capability::{
    clamp_to, AngleAdjustable, ColorAdjustable, ColorSequenceEditable, ColorSpaceAdjustable,
    OffsetAdjustable, SpeedAdjustable, TransformAdjustable, TransitionAdjustable, ROTATION_RANGE,
    SCALE_RANGE,
};
use crate::style::{write_cover, StyleBinding};
use screensaver_core::{
    ColorSequence, Defaults, FrameLoop, LoopToken, ParamDescriptor, ParamKind, ParamValue,
    ParameterStore, Size, WidgetKind,
};
use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

/// Lifecycle of a widget instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Constructed but not yet on screen.
    Unattached,
    /// On screen; the loop runs if the kind animates and speed is non-zero.
    Running,
    /// Loop cancelled and output detached. Terminal.
    Stopped,
}

/// Called after every structural change (add, remove, reorder) to a widget's
/// color sequence.
pub type ColorObserver = Box<dyn FnMut(WidgetKind, &ColorSequence)>;

/// A live, stateful screensaver instance.
pub trait AnimatedWidget {
    /// Kind of this widget.
    fn kind(&self) -> WidgetKind;

    /// Current lifecycle phase.
    fn phase(&self) -> Phase;

    /// Put the widget on a viewport of `viewport` size and start animating.
    ///
    /// Only valid from [`Phase::Unattached`]; ignored otherwise.
    fn attach(&mut self, viewport: Size);

    /// Cancel the loop and detach the output. Idempotent.
    fn stop(&mut self);

    /// The viewport changed size.
    fn resize(&mut self, viewport: Size);

    /// Token to pass to the next [`tick`](Self::tick), if animating.
    fn loop_token(&self) -> Option<LoopToken>;

    /// Advance time-driven state to `now_ms`. Stale tokens are ignored.
    fn tick(&mut self, token: LoopToken, now_ms: f64);

    /// Properties the host must apply to the background element.
    fn style(&self) -> &StyleBinding;

    /// Whether the animation loop is currently running.
    fn is_animating(&self) -> bool {
        self.loop_token().is_some()
    }

    /// Speed capability.
    fn as_speed(&mut self) -> Option<&mut dyn SpeedAdjustable> {
        None
    }

    /// Angle capability.
    fn as_angle(&mut self) -> Option<&mut dyn AngleAdjustable> {
        None
    }

    /// Offset capability.
    fn as_offset(&mut self) -> Option<&mut dyn OffsetAdjustable> {
        None
    }

    /// Rotation and scale capability.
    fn as_transform(&mut self) -> Option<&mut dyn TransformAdjustable> {
        None
    }

    /// Color space capability.
    fn as_color_space(&mut self) -> Option<&mut dyn ColorSpaceAdjustable> {
        None
    }

    /// Color sequence capability.
    fn as_color_sequence(&mut self) -> Option<&mut dyn ColorSequenceEditable> {
        None
    }

    /// Single color capability.
    fn as_color(&mut self) -> Option<&mut dyn ColorAdjustable> {
        None
    }

    /// Transition capability.
    fn as_transition(&mut self) -> Option<&mut dyn TransitionAdjustable> {
        None
    }
}

/// `data-*` attributes a widget is instantiated with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: BTreeMap<String, String>,
}

impl Attributes {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attribute name for a parameter.
    #[must_use]
    pub fn attribute_name(param: &str) -> String {
        format!("data-{param}")
    }

    /// Set the attribute for `param`.
    pub fn set(&mut self, param: &str, value: impl Into<String>) {
        self.values.insert(Self::attribute_name(param), value.into());
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, param: &str, value: impl Into<String>) -> Self {
        self.set(param, value);
        self
    }

    /// Value of the attribute for `param`.
    #[must_use]
    pub fn get(&self, param: &str) -> Option<&str> {
        self.values
            .get(&Self::attribute_name(param))
            .map(String::as_str)
    }

    /// Iterate over `(attribute, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything a constructor needs.
pub struct WidgetContext {
    /// Shared parameter store; widgets persist their own color sequence
    pub store: Rc<ParameterStore>,
    /// Defaults and tuning
    pub defaults: Rc<Defaults>,
    /// `data-*` attributes for non-color parameters
    pub attributes: Attributes,
    /// Structural color change observer
    pub observer: Option<ColorObserver>,
    /// Source for generated colors
    pub rng: fastrand::Rng,
}

impl WidgetContext {
    /// Context with no attributes and no observer.
    #[must_use]
    pub fn new(store: Rc<ParameterStore>, defaults: Rc<Defaults>) -> Self {
        Self {
            store,
            defaults,
            attributes: Attributes::new(),
            observer: None,
            rng: fastrand::Rng::new(),
        }
    }

    /// Set the attributes.
    #[must_use]
    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the observer.
    #[must_use]
    pub fn observer(mut self, observer: ColorObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Use a seeded generator for reproducible colors.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.rng = fastrand::Rng::with_seed(seed);
        self
    }
}

impl std::fmt::Debug for WidgetContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetContext")
            .field("attributes", &self.attributes)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

/// Attribute values resolved through a schema: parsed, clamped, defaulted.
#[derive(Debug, Clone, Default)]
pub struct ResolvedParams {
    values: HashMap<String, ParamValue>,
    enabled: HashMap<String, bool>,
}

impl ResolvedParams {
    /// Resolve every non-color descriptor against `attributes`.
    ///
    /// Single-choice parameters also pick up their `<name>_enabled` attribute,
    /// which defaults to off.
    #[must_use]
    pub fn resolve(schema: &[ParamDescriptor], attributes: &Attributes) -> Self {
        let mut resolved = Self::default();
        for descriptor in schema.iter().filter(|d| d.kind != ParamKind::Color) {
            let value = descriptor.resolve(attributes.get(&descriptor.name));
            if descriptor.kind == ParamKind::SingleChoice {
                let enabled = attributes
                    .get(&format!("{}_enabled", descriptor.name))
                    .and_then(|v| v.parse::<bool>().ok())
                    .unwrap_or(false);
                resolved.enabled.insert(descriptor.name.clone(), enabled);
            }
            resolved.values.insert(descriptor.name.clone(), value);
        }
        resolved
    }

    /// Numeric value of `name`, or `fallback`.
    #[must_use]
    pub fn number(&self, name: &str, fallback: f64) -> f64 {
        self.values
            .get(name)
            .and_then(ParamValue::as_number)
            .unwrap_or(fallback)
    }

    /// Boolean value of `name`, or `false`.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        self.values
            .get(name)
            .and_then(ParamValue::as_bool)
            .unwrap_or(false)
    }

    /// Text value of `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(ParamValue::as_text)
    }

    /// Enable toggle of a single-choice parameter.
    #[must_use]
    pub fn enabled(&self, name: &str) -> bool {
        self.enabled.get(name).copied().unwrap_or(false)
    }
}

/// Lifecycle, loop and output shared by every widget kind.
#[derive(Debug)]
pub(crate) struct Surface {
    phase: Phase,
    frames: FrameLoop,
    pub(crate) style: StyleBinding,
    viewport: Size,
    rotation: f64,
    scale: f64,
}

impl Surface {
    pub(crate) fn new(rotation: f64, scale: f64) -> Self {
        Self {
            phase: Phase::Unattached,
            frames: FrameLoop::new(),
            style: StyleBinding::new(),
            viewport: Size::ZERO,
            rotation: clamp_to(rotation, ROTATION_RANGE),
            scale: clamp_to(scale, SCALE_RANGE),
        }
    }

    pub(crate) const fn phase(&self) -> Phase {
        self.phase
    }

    /// Move to `Running`. Returns false when not attachable.
    pub(crate) fn attach(&mut self, kind: WidgetKind, viewport: Size) -> bool {
        if self.phase != Phase::Unattached {
            log::debug!("{kind}: attach ignored in phase {:?}", self.phase);
            return false;
        }
        self.phase = Phase::Running;
        self.viewport = viewport;
        self.write_cover();
        log::debug!("{kind}: attached to {}x{}", viewport.width, viewport.height);
        true
    }

    pub(crate) fn stop(&mut self, kind: WidgetKind) {
        self.frames.stop();
        if self.phase != Phase::Stopped {
            log::debug!("{kind}: stopped");
        }
        self.phase = Phase::Stopped;
        self.style.clear();
    }

    /// Whether the output may still be written to.
    pub(crate) fn is_live(&self) -> bool {
        self.phase != Phase::Stopped
    }

    /// Start or restart the loop when running and `wanted`; stop it otherwise.
    pub(crate) fn sync_loop(&mut self, wanted: bool) {
        if self.phase == Phase::Running && wanted {
            self.frames.start();
        } else {
            self.frames.stop();
        }
    }

    pub(crate) const fn token(&self) -> Option<LoopToken> {
        self.frames.token()
    }

    pub(crate) fn advance(&mut self, token: LoopToken, now_ms: f64) -> Option<f64> {
        if self.phase != Phase::Running {
            return None;
        }
        self.frames.advance(token, now_ms)
    }

    pub(crate) fn resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        if self.phase == Phase::Running {
            self.write_cover();
        }
    }

    pub(crate) const fn rotation(&self) -> f64 {
        self.rotation
    }

    pub(crate) const fn scale(&self) -> f64 {
        self.scale
    }

    pub(crate) fn set_rotation(&mut self, degrees: f64) {
        self.rotation = clamp_to(degrees, ROTATION_RANGE);
        if self.phase == Phase::Running {
            self.write_cover();
        }
    }

    pub(crate) fn set_scale(&mut self, factor: f64) {
        self.scale = clamp_to(factor, SCALE_RANGE);
        if self.phase == Phase::Running {
            self.write_cover();
        }
    }

    fn write_cover(&mut self) {
        write_cover(&mut self.style, self.viewport, self.rotation, self.scale);
    }
}
