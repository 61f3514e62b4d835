//! Screensaver: animated page backgrounds with a persisted settings panel.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { ScreensaverApp } from './screensaver.js';
//!
//! async function main() {
//!     await init();
//!     const app = new ScreensaverApp('background');
//!     app.start();
//!     renderPanel(JSON.parse(app.panel_json()));
//!     // on every control edit:
//!     app.dispatch_json('{"event":"range_slid","name":"speed","value":4}');
//! }
//! ```
//!
//! # Native Usage
//!
//! ```
//! use screensaver::{PanelEvent, Session};
//! use screensaver::core::{Defaults, ParameterStore, Size};
//! use std::rc::Rc;
//!
//! let mut session = Session::new(Rc::new(ParameterStore::in_memory()), Rc::new(Defaults::default()));
//! session.bootstrap();
//! session.set_viewport(Size::new(1280.0, 720.0));
//! session.dispatch(&PanelEvent::RangeSlid { name: "speed".into(), value: 4.0 });
//! assert!(session.loop_token().is_some());
//! ```

pub use screensaver_core as core;
pub use screensaver_widgets as widgets;

mod brightness;
pub mod panel;
mod session;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use brightness::{Brightness, BRIGHTNESS_RANGE};
pub use panel::{PanelEvent, PanelGroup, PanelModel, PanelOutcome, SettingsPanel};
pub use session::{Session, SessionError};

#[cfg(target_arch = "wasm32")]
pub use browser::ScreensaverApp;
