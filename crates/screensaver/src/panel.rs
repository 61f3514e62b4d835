//! Settings panel: a serializable control model built from a widget schema,
//! and the edit events the host sends back.
//!
//! The model is rendered by the host page in a fixed order: numeric ranges,
//! choice groups, switches, then colors. Every edit is persisted before it is
//! pushed to the widget. Structural color edits (add, duplicate, delete,
//! reorder) change the schema itself, so the owner rebuilds the whole panel
//! afterwards.

use screensaver_core::{
    Bounds, ChoiceOption, ParamDescriptor, ParamKind, ParamValue, ParameterStore, WidgetKind,
};
use screensaver_widgets::{apply_enabled, apply_param, css_number, AnimatedWidget, Registry};
use serde::{Deserialize, Serialize};

/// Paired slider and number input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeControl {
    pub name: String,
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    /// Text shown in the number input
    pub input: String,
    pub enabled: bool,
}

/// How a choice group is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceStyle {
    /// Radio group with an enable toggle
    Radio,
    /// Row of buttons, always in effect
    Buttons,
}

/// Single-choice or button-group control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceControl {
    pub name: String,
    pub label: String,
    pub style: ChoiceStyle,
    pub options: Vec<ChoiceOption>,
    pub selected: String,
    /// Enable toggle state; only radio groups have one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toggle: Option<bool>,
    pub enabled: bool,
}

/// Boolean switch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SwitchControl {
    pub name: String,
    pub label: String,
    pub on: bool,
    pub enabled: bool,
}

/// One row of the color list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRow {
    pub index: usize,
    pub name: String,
    pub label: String,
    pub value: String,
    pub can_delete: bool,
    pub can_move_up: bool,
    pub can_move_down: bool,
    pub enabled: bool,
}

/// Control group, in render order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "group", rename_all = "snake_case")]
pub enum PanelGroup {
    Ranges { controls: Vec<RangeControl> },
    Choices { controls: Vec<ChoiceControl> },
    Switches { controls: Vec<SwitchControl> },
    /// Editable color sequence; the add button is always shown
    Colors { rows: Vec<ColorRow> },
    /// Lone `color` parameter rendered inline
    InlineColor { row: ColorRow },
}

/// Everything the host needs to draw the panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelModel {
    pub kind: WidgetKind,
    pub title: String,
    pub groups: Vec<PanelGroup>,
}

impl PanelModel {
    /// Serialize for the host page.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    fn range_mut(&mut self, name: &str) -> Option<&mut RangeControl> {
        self.groups.iter_mut().find_map(|g| match g {
            PanelGroup::Ranges { controls } => controls.iter_mut().find(|c| c.name == name),
            _ => None,
        })
    }

    fn choice_mut(&mut self, name: &str) -> Option<&mut ChoiceControl> {
        self.groups.iter_mut().find_map(|g| match g {
            PanelGroup::Choices { controls } => controls.iter_mut().find(|c| c.name == name),
            _ => None,
        })
    }

    fn switch_mut(&mut self, name: &str) -> Option<&mut SwitchControl> {
        self.groups.iter_mut().find_map(|g| match g {
            PanelGroup::Switches { controls } => controls.iter_mut().find(|c| c.name == name),
            _ => None,
        })
    }

    fn color_mut(&mut self, name: &str) -> Option<&mut ColorRow> {
        self.groups.iter_mut().find_map(|g| match g {
            PanelGroup::Colors { rows } => rows.iter_mut().find(|r| r.name == name),
            PanelGroup::InlineColor { row } => (row.name == name).then_some(row),
            _ => None,
        })
    }
}

/// Edit sent by the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PanelEvent {
    RangeSlid { name: String, value: f64 },
    /// Raw text from the number input
    RangeTyped { name: String, text: String },
    ChoiceSelected { name: String, value: String },
    ChoiceToggled { name: String, enabled: bool },
    SwitchToggled { name: String, on: bool },
    ColorPicked { name: String, value: String },
    ColorAdded,
    ColorDuplicated { index: usize },
    ColorDeleted { index: usize },
    ColorMovedUp { index: usize },
    ColorMovedDown { index: usize },
}

/// Result of handling one [`PanelEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelOutcome {
    /// Persisted and pushed to the widget
    Applied,
    /// Input rejected; the control shows its previous value again
    Reverted,
    /// Unknown or disabled control, or unsupported by the widget
    Ignored,
    /// The color list changed and the panel was rebuilt
    Rebuilt,
}

/// Panel for one widget kind.
#[derive(Debug, Clone)]
pub struct SettingsPanel {
    kind: WidgetKind,
    descriptors: Vec<ParamDescriptor>,
    model: PanelModel,
}

impl SettingsPanel {
    /// Build the panel of `kind` from its current schema and stored values.
    #[must_use]
    pub fn build(kind: WidgetKind, registry: &Registry, store: &ParameterStore) -> Self {
        Self::from_descriptors(kind, registry.describe(kind, store), store)
    }

    /// Build from an explicit descriptor list.
    #[must_use]
    pub fn from_descriptors(
        kind: WidgetKind,
        descriptors: Vec<ParamDescriptor>,
        store: &ParameterStore,
    ) -> Self {
        let model = build_model(kind, &descriptors, store);
        log::debug!("{kind}: panel built with {} parameters", descriptors.len());
        Self {
            kind,
            descriptors,
            model,
        }
    }

    /// Kind this panel edits.
    #[must_use]
    pub const fn kind(&self) -> WidgetKind {
        self.kind
    }

    /// Current control model.
    #[must_use]
    pub const fn model(&self) -> &PanelModel {
        &self.model
    }

    /// Descriptors the panel was built from.
    #[must_use]
    pub fn descriptors(&self) -> &[ParamDescriptor] {
        &self.descriptors
    }

    fn descriptor(&self, name: &str, kinds: &[ParamKind]) -> Option<&ParamDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name == name && kinds.contains(&d.kind))
            .filter(|d| {
                if !d.enabled {
                    log::debug!("{}: {name} is disabled", self.kind);
                }
                d.enabled
            })
    }

    /// Persist `event` and push it to `widget`.
    ///
    /// Structural color edits return [`PanelOutcome::Applied`] as well; the
    /// caller decides whether to rebuild.
    pub fn handle(
        &mut self,
        event: &PanelEvent,
        store: &ParameterStore,
        widget: &mut dyn AnimatedWidget,
    ) -> PanelOutcome {
        let kind = self.kind;
        match event {
            PanelEvent::RangeSlid { name, value } => {
                self.apply_range(name, ParamValue::Number(*value), store, widget)
            }
            PanelEvent::RangeTyped { name, text } => match text.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    self.apply_range(name, ParamValue::Number(value), store, widget)
                }
                _ => {
                    log::debug!("{kind}: {name} input {text:?} is not a number");
                    self.revert_range(name)
                }
            },
            PanelEvent::ChoiceSelected { name, value } => {
                let kinds = [ParamKind::SingleChoice, ParamKind::ButtonGroup];
                let Some(value) = self
                    .descriptor(name, &kinds)
                    .and_then(|d| d.normalize(&ParamValue::Text(value.clone())))
                else {
                    return PanelOutcome::Ignored;
                };
                store.set(kind.as_str(), name, &value.to_string());
                apply_param(widget, name, &value);
                if let (Some(control), Some(text)) = (self.model.choice_mut(name), value.as_text())
                {
                    control.selected = text.to_string();
                }
                PanelOutcome::Applied
            }
            PanelEvent::ChoiceToggled { name, enabled } => {
                if self.descriptor(name, &[ParamKind::SingleChoice]).is_none() {
                    return PanelOutcome::Ignored;
                }
                store.set_enabled(kind.as_str(), name, *enabled);
                apply_enabled(widget, name, *enabled);
                if let Some(control) = self.model.choice_mut(name) {
                    control.toggle = Some(*enabled);
                }
                PanelOutcome::Applied
            }
            PanelEvent::SwitchToggled { name, on } => {
                if self.descriptor(name, &[ParamKind::BooleanSwitch]).is_none() {
                    return PanelOutcome::Ignored;
                }
                let value = ParamValue::Bool(*on);
                store.set(kind.as_str(), name, &value.to_string());
                apply_param(widget, name, &value);
                if let Some(control) = self.model.switch_mut(name) {
                    control.on = *on;
                }
                PanelOutcome::Applied
            }
            PanelEvent::ColorPicked { name, value } => {
                let Some(descriptor) = self.descriptor(name, &[ParamKind::Color]) else {
                    return PanelOutcome::Ignored;
                };
                let Some(value) = descriptor.normalize(&ParamValue::Text(value.clone())) else {
                    log::warn!("{kind}: rejected color {value:?} for {name}");
                    return PanelOutcome::Reverted;
                };
                // color parameters are persisted by the widget itself
                if !apply_param(widget, name, &value) {
                    return PanelOutcome::Ignored;
                }
                if let (Some(row), Some(text)) = (self.model.color_mut(name), value.as_text()) {
                    row.value = text.to_string();
                }
                PanelOutcome::Applied
            }
            PanelEvent::ColorAdded => self.edit_sequence(widget, |w| w.add_color(None)),
            PanelEvent::ColorDuplicated { index } => {
                self.edit_sequence(widget, |w| w.duplicate_color(*index))
            }
            PanelEvent::ColorDeleted { index } => {
                self.edit_sequence(widget, |w| w.remove_color(*index))
            }
            PanelEvent::ColorMovedUp { index } => {
                self.edit_sequence(widget, |w| w.move_color_up(*index))
            }
            PanelEvent::ColorMovedDown { index } => {
                self.edit_sequence(widget, |w| w.move_color_down(*index))
            }
        }
    }

    fn apply_range(
        &mut self,
        name: &str,
        value: ParamValue,
        store: &ParameterStore,
        widget: &mut dyn AnimatedWidget,
    ) -> PanelOutcome {
        let Some(value) = self
            .descriptor(name, &[ParamKind::NumericRange])
            .and_then(|d| d.normalize(&value))
        else {
            return PanelOutcome::Ignored;
        };
        store.set(self.kind.as_str(), name, &value.to_string());
        apply_param(widget, name, &value);
        if let (Some(control), Some(number)) = (self.model.range_mut(name), value.as_number()) {
            control.value = number;
            control.input = css_number(number);
        }
        PanelOutcome::Applied
    }

    fn revert_range(&mut self, name: &str) -> PanelOutcome {
        match self.model.range_mut(name) {
            Some(control) => {
                control.input = css_number(control.value);
                PanelOutcome::Reverted
            }
            None => PanelOutcome::Ignored,
        }
    }

    fn edit_sequence(
        &self,
        widget: &mut dyn AnimatedWidget,
        edit: impl FnOnce(&mut dyn screensaver_widgets::ColorSequenceEditable),
    ) -> PanelOutcome {
        let editable = self
            .descriptors
            .iter()
            .any(|d| d.enabled && d.color_index().is_some());
        match widget.as_color_sequence() {
            Some(sequence) if editable => {
                edit(sequence);
                PanelOutcome::Applied
            }
            _ => {
                log::debug!("{}: color list is not editable", self.kind);
                PanelOutcome::Ignored
            }
        }
    }
}

fn build_model(kind: WidgetKind, descriptors: &[ParamDescriptor], store: &ParameterStore) -> PanelModel {
    let stored = |d: &ParamDescriptor| {
        let raw = store.get(kind.as_str(), &d.name, &d.default.to_string());
        d.resolve(Some(raw.as_str()))
    };

    let mut ranges = Vec::new();
    let mut choices = Vec::new();
    let mut switches = Vec::new();
    let mut color_params = Vec::new();
    for d in descriptors {
        match d.kind {
            ParamKind::NumericRange => {
                let value = stored(d).as_number().unwrap_or_default();
                let bounds = d.bounds.unwrap_or_else(|| Bounds::new(value, value, 0.0));
                ranges.push(RangeControl {
                    name: d.name.clone(),
                    label: d.label.clone(),
                    min: bounds.min,
                    max: bounds.max,
                    step: bounds.step,
                    value,
                    input: css_number(value),
                    enabled: d.enabled,
                });
            }
            ParamKind::SingleChoice | ParamKind::ButtonGroup => {
                let radio = d.kind == ParamKind::SingleChoice;
                choices.push(ChoiceControl {
                    name: d.name.clone(),
                    label: d.label.clone(),
                    style: if radio {
                        ChoiceStyle::Radio
                    } else {
                        ChoiceStyle::Buttons
                    },
                    options: d.options.clone(),
                    selected: stored(d).to_string(),
                    toggle: radio.then(|| store.get_enabled(kind.as_str(), &d.name, false)),
                    enabled: d.enabled,
                });
            }
            ParamKind::BooleanSwitch => switches.push(SwitchControl {
                name: d.name.clone(),
                label: d.label.clone(),
                on: stored(d).as_bool().unwrap_or(false),
                enabled: d.enabled,
            }),
            ParamKind::Color => color_params.push(d),
        }
    }

    let mut groups = Vec::new();
    if !ranges.is_empty() {
        groups.push(PanelGroup::Ranges { controls: ranges });
    }
    if !choices.is_empty() {
        groups.push(PanelGroup::Choices { controls: choices });
    }
    if !switches.is_empty() {
        groups.push(PanelGroup::Switches { controls: switches });
    }
    if let Some(group) = color_group(&color_params) {
        groups.push(group);
    }

    PanelModel {
        kind,
        title: kind.title().to_string(),
        groups,
    }
}

fn color_group(params: &[&ParamDescriptor]) -> Option<PanelGroup> {
    let row = |index: usize, d: &ParamDescriptor, count: usize| ColorRow {
        index,
        name: d.name.clone(),
        label: d.label.clone(),
        value: d.default.to_string(),
        can_delete: d.enabled && count > 1,
        can_move_up: d.enabled && index > 0,
        can_move_down: d.enabled && index + 1 < count,
        enabled: d.enabled,
    };
    match params {
        [] => None,
        [single] if single.color_index().is_none() => Some(PanelGroup::InlineColor {
            row: ColorRow {
                can_delete: false,
                can_move_up: false,
                can_move_down: false,
                ..row(0, *single, 1)
            },
        }),
        _ => {
            let count = params.len();
            let rows = params
                .iter()
                .enumerate()
                .map(|(i, d)| row(i, *d, count))
                .collect();
            Some(PanelGroup::Colors { rows })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use screensaver_core::Defaults;
    use screensaver_widgets::{ColorSpace, WidgetContext};
    use std::rc::Rc;

    fn setup(kind: WidgetKind) -> (SettingsPanel, Rc<ParameterStore>, Box<dyn AnimatedWidget>) {
        let store = Rc::new(ParameterStore::in_memory());
        let registry = Registry::default();
        let widget = registry.create(
            kind,
            WidgetContext::new(Rc::clone(&store), registry.defaults()),
        );
        (SettingsPanel::build(kind, &registry, &store), store, widget)
    }

    fn group_names(model: &PanelModel) -> Vec<&'static str> {
        model
            .groups
            .iter()
            .map(|g| match g {
                PanelGroup::Ranges { .. } => "ranges",
                PanelGroup::Choices { .. } => "choices",
                PanelGroup::Switches { .. } => "switches",
                PanelGroup::Colors { .. } => "colors",
                PanelGroup::InlineColor { .. } => "inline",
            })
            .collect()
    }

    fn colors(model: &PanelModel) -> &[ColorRow] {
        model
            .groups
            .iter()
            .find_map(|g| match g {
                PanelGroup::Colors { rows } => Some(rows.as_slice()),
                _ => None,
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_groups_in_fixed_order() {
        let (panel, _, _) = setup(WidgetKind::LinearGradient);
        assert_eq!(
            group_names(panel.model()),
            vec!["ranges", "choices", "switches", "colors"]
        );
        let (solid, _, _) = setup(WidgetKind::SolidColor);
        assert_eq!(group_names(solid.model()), vec!["inline"]);
    }

    #[test]
    fn test_slider_persists_and_applies() {
        let (mut panel, store, mut widget) = setup(WidgetKind::LinearGradient);
        let event = PanelEvent::RangeSlid {
            name: "angle".into(),
            value: 45.4,
        };
        assert_eq!(panel.handle(&event, &store, widget.as_mut()), PanelOutcome::Applied);
        assert_eq!(
            store.get_raw("screensaver-linear-gradient-angle").as_deref(),
            Some("45")
        );
        assert!(widget
            .style()
            .get("background-image")
            .unwrap()
            .starts_with("linear-gradient(45deg"));
        let rebuilt = SettingsPanel::build(WidgetKind::LinearGradient, &Registry::default(), &store);
        assert_eq!(rebuilt.model(), panel.model());
    }

    #[test]
    fn test_non_numeric_input_reverts() {
        let (mut panel, store, mut widget) = setup(WidgetKind::ConicGradient);
        let event = PanelEvent::RangeTyped {
            name: "speed".into(),
            text: "fast".into(),
        };
        assert_eq!(panel.handle(&event, &store, widget.as_mut()), PanelOutcome::Reverted);
        assert_eq!(store.get_raw("screensaver-conic-gradient-speed"), None);
        let typed = PanelEvent::RangeTyped {
            name: "speed".into(),
            text: " 99 ".into(),
        };
        assert_eq!(panel.handle(&typed, &store, widget.as_mut()), PanelOutcome::Applied);
        assert_eq!(
            store.get_raw("screensaver-conic-gradient-speed").as_deref(),
            Some("10")
        );
    }

    #[test]
    fn test_choice_toggle_keeps_selection() {
        let (mut panel, store, mut widget) = setup(WidgetKind::LinearGradient);
        let select = PanelEvent::ChoiceSelected {
            name: "colorSpace".into(),
            value: "hsl".into(),
        };
        let on = PanelEvent::ChoiceToggled {
            name: "colorSpace".into(),
            enabled: true,
        };
        let off = PanelEvent::ChoiceToggled {
            name: "colorSpace".into(),
            enabled: false,
        };
        panel.handle(&select, &store, widget.as_mut());
        panel.handle(&on, &store, widget.as_mut());
        assert_eq!(
            widget.as_color_space().unwrap().effective_color_space(),
            Some(ColorSpace::Hsl)
        );
        panel.handle(&off, &store, widget.as_mut());
        assert_eq!(widget.as_color_space().unwrap().effective_color_space(), None);
        assert_eq!(
            store.get_raw("screensaver-linear-gradient-colorSpace").as_deref(),
            Some("hsl")
        );
        assert_eq!(
            store
                .get_raw("screensaver-linear-gradient-colorSpace_enabled")
                .as_deref(),
            Some("false")
        );
    }

    #[test]
    fn test_unknown_choice_value_ignored() {
        let (mut panel, store, mut widget) = setup(WidgetKind::ColorCycle);
        let event = PanelEvent::ChoiceSelected {
            name: "transition".into(),
            value: "wipe".into(),
        };
        assert_eq!(panel.handle(&event, &store, widget.as_mut()), PanelOutcome::Ignored);
    }

    #[test]
    fn test_delete_disabled_on_last_row() {
        let store = ParameterStore::in_memory();
        let descriptors = vec![ParamDescriptor::color("color1", "Color 1", "#ffffff")];
        let panel = SettingsPanel::from_descriptors(WidgetKind::ColorCycle, descriptors, &store);
        let rows = colors(panel.model());
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].can_delete);
        assert!(!rows[0].can_move_up && !rows[0].can_move_down);
    }

    #[test]
    fn test_disabled_descriptor_shown_but_ignored() {
        let store = ParameterStore::in_memory();
        let descriptors = vec![
            ParamDescriptor::range("speed", "Speed", Bounds::new(0.0, 10.0, 1.0), 5.0).disabled(),
        ];
        let mut panel =
            SettingsPanel::from_descriptors(WidgetKind::ConicGradient, descriptors, &store);
        let registry = Registry::default();
        let mut widget = registry.create(
            WidgetKind::ConicGradient,
            WidgetContext::new(Rc::new(ParameterStore::in_memory()), registry.defaults()),
        );
        match &panel.model().groups[0] {
            PanelGroup::Ranges { controls } => assert!(!controls[0].enabled),
            other => panic!("unexpected group {other:?}"),
        }
        let event = PanelEvent::RangeSlid {
            name: "speed".into(),
            value: 1.0,
        };
        assert_eq!(panel.handle(&event, &store, widget.as_mut()), PanelOutcome::Ignored);
        assert_eq!(store.get_raw("screensaver-conic-gradient-speed"), None);
    }

    #[test]
    fn test_color_pick_validates() {
        let (mut panel, store, mut widget) = setup(WidgetKind::ColorCycle);
        let bad = PanelEvent::ColorPicked {
            name: "color1".into(),
            value: "#12".into(),
        };
        assert_eq!(panel.handle(&bad, &store, widget.as_mut()), PanelOutcome::Reverted);
        let good = PanelEvent::ColorPicked {
            name: "color1".into(),
            value: "#123456".into(),
        };
        assert_eq!(panel.handle(&good, &store, widget.as_mut()), PanelOutcome::Applied);
        assert_eq!(colors(panel.model())[0].value, "#123456");
        assert_eq!(
            store.get_raw("screensaver-color-cycle-colors").as_deref(),
            Some(r##"["#123456","#ffff00","#80ff00"]"##)
        );
    }

    #[test]
    fn test_events_deserialize_from_host_json() {
        let event: PanelEvent =
            serde_json::from_str(r#"{"event":"range_slid","name":"speed","value":3}"#).unwrap();
        assert_eq!(
            event,
            PanelEvent::RangeSlid {
                name: "speed".into(),
                value: 3.0
            }
        );
        let add: PanelEvent = serde_json::from_str(r#"{"event":"color_added"}"#).unwrap();
        assert_eq!(add, PanelEvent::ColorAdded);
        let (panel, _, _) = setup(WidgetKind::SolidColor);
        assert!(panel.model().to_json().contains(r#""group":"inline_color""#));
    }

    #[test]
    fn test_defaults_shown_without_stored_values() {
        let store = ParameterStore::in_memory();
        let defaults = Rc::new(Defaults::default());
        let panel = SettingsPanel::build(WidgetKind::ColorCycle, &Registry::new(defaults), &store);
        let PanelGroup::Ranges { controls } = &panel.model().groups[0] else {
            panic!("ranges first");
        };
        assert_eq!(controls[0].value, 5.0);
        assert_eq!(controls[0].input, "5");
    }
}
