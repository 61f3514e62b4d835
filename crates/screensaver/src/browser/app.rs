//! WASM application entry point.

use super::storage::LocalStorage;
use crate::panel::{PanelEvent, PanelOutcome};
use crate::session::Session;
use screensaver_core::{Defaults, LoopToken, ParameterStore, Size, WidgetKind};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlElement};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Page state shared between the exported methods and the frame callback.
struct Runtime {
    session: Session,
    element: HtmlElement,
    /// Properties written on the previous frame
    applied: Vec<String>,
    /// Generation of the loop the pending frame was requested for
    scheduled: Option<u64>,
}

impl Runtime {
    fn apply_style(&mut self) {
        let css = self.element.style();
        let Some(widget) = self.session.active() else {
            return;
        };
        let binding = widget.style();
        for stale in self.applied.iter().filter(|name| binding.get(name).is_none()) {
            css.remove_property(stale).ok();
        }
        for (name, value) in binding.iter() {
            css.set_property(name, value).ok();
        }
        css.set_property("filter", &self.session.brightness().filter())
            .ok();
        self.applied = binding.iter().map(|(name, _)| name.to_string()).collect();
    }
}

/// Screensaver page controller.
#[wasm_bindgen]
pub struct ScreensaverApp {
    runtime: Rc<RefCell<Runtime>>,
    frame: FrameCallback,
    resize_callback: Option<Closure<dyn FnMut()>>,
    panel_callback: Option<js_sys::Function>,
}

#[wasm_bindgen]
impl ScreensaverApp {
    /// Bind to the background element `element_id`.
    ///
    /// `defaults_yaml` optionally overrides the built-in defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(element_id: &str, defaults_yaml: Option<String>) -> Result<ScreensaverApp, JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Debug).ok();

        let defaults = match defaults_yaml {
            Some(yaml) => Defaults::from_yaml(&yaml).map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => Defaults::default(),
        };

        let element = window()
            .ok_or("No window")?
            .document()
            .ok_or("No document")?
            .get_element_by_id(element_id)
            .ok_or_else(|| format!("Element '{element_id}' not found"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| "Element is not an HTML element")?;

        let store = Rc::new(ParameterStore::new(LocalStorage));
        let runtime = Runtime {
            session: Session::new(store, Rc::new(defaults)),
            element,
            applied: Vec::new(),
            scheduled: None,
        };

        let app = Self {
            runtime: Rc::new(RefCell::new(runtime)),
            frame: Rc::new(RefCell::new(None)),
            resize_callback: None,
            panel_callback: None,
        };
        app.install_frame_callback();
        Ok(app)
    }

    /// Show the persisted screensaver and start animating.
    pub fn start(&mut self) {
        {
            let mut rt = self.runtime.borrow_mut();
            rt.session.bootstrap();
            if let Some(size) = viewport() {
                rt.session.set_viewport(size);
            }
            rt.apply_style();
        }
        self.listen_for_resize();
        self.schedule();
        self.notify_panel();
    }

    /// Register a handler that receives the panel JSON whenever the panel
    /// is rebuilt (kind switch or color list change).
    pub fn on_panel_changed(&mut self, callback: js_sys::Function) {
        self.panel_callback = Some(callback);
    }

    /// Switch to the screensaver `kind`.
    pub fn select(&mut self, kind: &str) -> Result<(), JsValue> {
        {
            let mut rt = self.runtime.borrow_mut();
            rt.session
                .switch_to_id(kind)
                .map_err(|e| JsValue::from_str(&e.to_string()))?;
            rt.apply_style();
        }
        self.schedule();
        self.notify_panel();
        Ok(())
    }

    /// Active kind identifier.
    pub fn active_kind(&self) -> Option<String> {
        self.runtime
            .borrow()
            .session
            .active_kind()
            .map(|k| k.as_str().to_string())
    }

    /// Every kind as `[{"id": ..., "title": ...}]`.
    pub fn kinds_json() -> String {
        let kinds: Vec<_> = WidgetKind::ALL
            .iter()
            .map(|k| serde_json::json!({ "id": k.as_str(), "title": k.title() }))
            .collect();
        serde_json::to_string(&kinds).unwrap_or_default()
    }

    /// Settings panel model of the active kind.
    pub fn panel_json(&self) -> String {
        self.runtime
            .borrow()
            .session
            .panel()
            .map(|p| p.to_json())
            .unwrap_or_default()
    }

    /// Apply a panel event given as JSON; returns the outcome as JSON.
    pub fn dispatch_json(&mut self, json: &str) -> Result<String, JsValue> {
        let event: PanelEvent = serde_json::from_str(json)
            .map_err(|e| JsValue::from_str(&format!("JSON parse error: {e}")))?;
        let outcome = {
            let mut rt = self.runtime.borrow_mut();
            let outcome = rt.session.dispatch(&event);
            rt.apply_style();
            outcome
        };
        self.schedule();
        if outcome == PanelOutcome::Rebuilt {
            self.notify_panel();
        }
        serde_json::to_string(&outcome).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set the brightness adjustment in percent.
    pub fn set_brightness(&mut self, value: f64) {
        let mut rt = self.runtime.borrow_mut();
        rt.session.set_brightness(value);
        rt.apply_style();
    }

    /// Toggle the brightness adjustment.
    pub fn set_brightness_enabled(&mut self, enabled: bool) {
        let mut rt = self.runtime.borrow_mut();
        rt.session.set_brightness_enabled(enabled);
        rt.apply_style();
    }

    /// Current brightness as `{"value": ..., "enabled": ...}`.
    pub fn brightness_json(&self) -> String {
        serde_json::to_string(self.runtime.borrow().session.brightness()).unwrap_or_default()
    }
}

impl ScreensaverApp {
    fn notify_panel(&self) {
        if let Some(callback) = &self.panel_callback {
            call_panel_callback(callback, &self.panel_json());
        }
    }

    fn install_frame_callback(&self) {
        let runtime = Rc::clone(&self.runtime);
        let frame = Rc::clone(&self.frame);
        let callback = Closure::new(move |now_ms: f64| {
            let next = {
                let mut rt = runtime.borrow_mut();
                if let Some(generation) = rt.scheduled.take() {
                    // stale generations are dropped by the widget
                    rt.session.tick(LoopToken::from_generation(generation), now_ms);
                    rt.apply_style();
                }
                rt.session.loop_token()
            };
            if let Some(token) = next {
                request_frame(&runtime, &frame, token);
            }
        });
        *self.frame.borrow_mut() = Some(callback);
    }

    /// Request a frame if the active widget animates and none is pending.
    fn schedule(&self) {
        let token = {
            let rt = self.runtime.borrow();
            if rt.scheduled.is_some() {
                return;
            }
            rt.session.loop_token()
        };
        if let Some(token) = token {
            request_frame(&self.runtime, &self.frame, token);
        }
    }

    fn listen_for_resize(&mut self) {
        let Some(win) = window() else {
            return;
        };
        let runtime = Rc::clone(&self.runtime);
        let cb = Closure::new(move || {
            let mut rt = runtime.borrow_mut();
            if let Some(size) = viewport() {
                rt.session.set_viewport(size);
                rt.apply_style();
            }
        });
        win.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())
            .ok();
        self.resize_callback = Some(cb);
    }
}

fn request_frame(runtime: &Rc<RefCell<Runtime>>, frame: &FrameCallback, token: LoopToken) {
    let Some(win) = window() else {
        return;
    };
    let frame = frame.borrow();
    let Some(callback) = frame.as_ref() else {
        return;
    };
    if win
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .is_ok()
    {
        runtime.borrow_mut().scheduled = Some(token.generation());
    }
}

/// Hand the panel JSON to the host. Returns false if the callback threw.
fn call_panel_callback(callback: &js_sys::Function, json: &str) -> bool {
    match callback.call1(&JsValue::NULL, &JsValue::from_str(json)) {
        Ok(_) => true,
        Err(e) => {
            log::warn!("panel callback threw: {e:?}");
            false
        }
    }
}

fn viewport() -> Option<Size> {
    let win = window()?;
    let width = win.inner_width().ok()?.as_f64()?;
    let height = win.inner_height().ok()?.as_f64()?;
    Some(Size::new(width, height))
}
