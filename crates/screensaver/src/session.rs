//! Session controller: owns the single active widget and its settings panel.

use crate::brightness::Brightness;
use crate::panel::{PanelEvent, PanelModel, PanelOutcome, SettingsPanel};
use screensaver_core::store::SELECTED_KEY;
use screensaver_core::{
    Defaults, LoopToken, ParamKind, ParameterStore, Size, UnknownKind, WidgetKind,
};
use screensaver_widgets::{AnimatedWidget, Attributes, ColorObserver, Registry, WidgetContext};
use std::cell::Cell;
use std::rc::Rc;
use thiserror::Error;

/// Errors from session entry points that take untrusted identifiers.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identifier names no registered kind.
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
}

/// Drives which screensaver is shown.
///
/// At most one widget is live at any time: switching stops the previous one
/// before the next is attached.
pub struct Session {
    store: Rc<ParameterStore>,
    registry: Registry,
    viewport: Option<Size>,
    active: Option<Box<dyn AnimatedWidget>>,
    panel: Option<SettingsPanel>,
    needs_rebuild: Rc<Cell<bool>>,
    brightness: Brightness,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("active", &self.active_kind())
            .field("viewport", &self.viewport)
            .field("brightness", &self.brightness)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Session over `store`, with nothing selected yet.
    #[must_use]
    pub fn new(store: Rc<ParameterStore>, defaults: Rc<Defaults>) -> Self {
        let brightness = Brightness::load(&store);
        Self {
            store,
            registry: Registry::new(defaults),
            viewport: None,
            active: None,
            panel: None,
            needs_rebuild: Rc::new(Cell::new(false)),
            brightness,
        }
    }

    /// Shared parameter store.
    #[must_use]
    pub const fn store(&self) -> &Rc<ParameterStore> {
        &self.store
    }

    /// Widget registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Persisted selection, or the linear gradient.
    #[must_use]
    pub fn selected_kind(&self) -> WidgetKind {
        match self.store.get_raw(SELECTED_KEY) {
            Some(id) => id.parse().unwrap_or_else(|e| {
                log::warn!("{e}; falling back to {}", WidgetKind::default());
                WidgetKind::default()
            }),
            None => WidgetKind::default(),
        }
    }

    /// Show the persisted selection (or the default). Repeatable.
    pub fn bootstrap(&mut self) -> WidgetKind {
        let kind = self.selected_kind();
        log::info!("bootstrapping with {kind}");
        self.switch_to(kind);
        kind
    }

    /// Make `kind` the active screensaver.
    ///
    /// Stops the current widget, instantiates the new one with its stored
    /// parameters, attaches it if a viewport is known, rebuilds the panel and
    /// persists the selection. Returns the previous widget, already stopped.
    pub fn switch_to(&mut self, kind: WidgetKind) -> Option<Box<dyn AnimatedWidget>> {
        let previous = self.active.take().map(|mut widget| {
            widget.stop();
            widget
        });

        let ctx = WidgetContext::new(Rc::clone(&self.store), self.registry.defaults())
            .attributes(self.attributes(kind))
            .observer(self.observer());
        let mut widget = self.registry.create(kind, ctx);
        if let Some(viewport) = self.viewport {
            widget.attach(viewport);
        }
        self.active = Some(widget);
        self.needs_rebuild.set(false);
        self.rebuild_panel();
        self.store.set_raw(SELECTED_KEY, kind.as_str());
        log::info!("switched to {kind}");
        previous
    }

    /// [`switch_to`](Self::switch_to) by identifier.
    pub fn switch_to_id(
        &mut self,
        id: &str,
    ) -> Result<Option<Box<dyn AnimatedWidget>>, SessionError> {
        let kind = id.parse::<WidgetKind>()?;
        Ok(self.switch_to(kind))
    }

    /// Record the viewport size, attaching the active widget on first call.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
        if let Some(widget) = self.active.as_mut() {
            match widget.phase() {
                screensaver_widgets::Phase::Unattached => widget.attach(viewport),
                _ => widget.resize(viewport),
            }
        }
    }

    /// Kind of the active widget.
    #[must_use]
    pub fn active_kind(&self) -> Option<WidgetKind> {
        self.active.as_ref().map(|w| w.kind())
    }

    /// Active widget.
    #[must_use]
    pub fn active(&self) -> Option<&dyn AnimatedWidget> {
        self.active.as_deref()
    }

    /// Active widget, mutably.
    pub fn active_mut(&mut self) -> Option<&mut (dyn AnimatedWidget + 'static)> {
        self.active.as_deref_mut()
    }

    /// Panel of the active widget.
    #[must_use]
    pub fn panel(&self) -> Option<&PanelModel> {
        self.panel.as_ref().map(SettingsPanel::model)
    }

    /// Apply a panel edit to the store and the active widget.
    pub fn dispatch(&mut self, event: &PanelEvent) -> PanelOutcome {
        let (Some(panel), Some(widget)) = (self.panel.as_mut(), self.active.as_deref_mut()) else {
            log::debug!("panel event before bootstrap ignored");
            return PanelOutcome::Ignored;
        };
        let outcome = panel.handle(event, &self.store, widget);
        if self.needs_rebuild.replace(false) {
            self.rebuild_panel();
            return PanelOutcome::Rebuilt;
        }
        outcome
    }

    /// Token for the next frame, if the active widget animates.
    #[must_use]
    pub fn loop_token(&self) -> Option<LoopToken> {
        self.active.as_ref().and_then(|w| w.loop_token())
    }

    /// Forward a frame to the active widget.
    pub fn tick(&mut self, token: LoopToken, now_ms: f64) {
        if let Some(widget) = self.active.as_mut() {
            widget.tick(token, now_ms);
        }
    }

    /// Brightness adjustment.
    #[must_use]
    pub const fn brightness(&self) -> &Brightness {
        &self.brightness
    }

    /// Set and persist the brightness value.
    pub fn set_brightness(&mut self, value: f64) {
        self.brightness.set_value(&self.store, value);
    }

    /// Set and persist the brightness switch.
    pub fn set_brightness_enabled(&mut self, enabled: bool) {
        self.brightness.set_enabled(&self.store, enabled);
    }

    /// `data-*` attributes for every non-color parameter of `kind`.
    fn attributes(&self, kind: WidgetKind) -> Attributes {
        let mut attributes = Attributes::new();
        for descriptor in self.registry.describe(kind, &self.store) {
            if descriptor.kind == ParamKind::Color {
                continue;
            }
            let value = self
                .store
                .get(kind.as_str(), &descriptor.name, &descriptor.default.to_string());
            attributes.set(&descriptor.name, value);
            if descriptor.kind == ParamKind::SingleChoice {
                let enabled = self.store.get_enabled(kind.as_str(), &descriptor.name, false);
                attributes.set(&format!("{}_enabled", descriptor.name), enabled.to_string());
            }
        }
        attributes
    }

    fn observer(&self) -> ColorObserver {
        let flag = Rc::clone(&self.needs_rebuild);
        Box::new(move |kind, colors| {
            log::debug!("{kind}: color list now has {} entries", colors.len());
            flag.set(true);
        })
    }

    fn rebuild_panel(&mut self) {
        self.panel = self
            .active_kind()
            .map(|kind| SettingsPanel::build(kind, &self.registry, &self.store));
    }
}
