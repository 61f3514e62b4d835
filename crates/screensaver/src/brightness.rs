//! Page-wide brightness adjustment applied on top of every widget.

use screensaver_core::store::{BRIGHTNESS_SWITCH_KEY, BRIGHTNESS_VALUE_KEY};
use screensaver_core::ParameterStore;
use serde::Serialize;

/// Adjustment bounds, in percent.
pub const BRIGHTNESS_RANGE: (i32, i32) = (-100, 100);

/// Brightness value and its enable switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Brightness {
    /// Adjustment in percent, `-100..=100`
    pub value: i32,
    /// Whether the adjustment is applied
    pub enabled: bool,
}

impl Brightness {
    /// Read the persisted state; missing or malformed values use the defaults.
    #[must_use]
    pub fn load(store: &ParameterStore) -> Self {
        let value = store
            .get_raw(BRIGHTNESS_VALUE_KEY)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map_or(0, clamp_value);
        let enabled = store
            .get_raw(BRIGHTNESS_SWITCH_KEY)
            .is_some_and(|v| v == "true");
        Self { value, enabled }
    }

    /// Set and persist the value.
    pub fn set_value(&mut self, store: &ParameterStore, value: f64) {
        self.value = clamp_value(value);
        store.set_raw(BRIGHTNESS_VALUE_KEY, &self.value.to_string());
    }

    /// Set and persist the switch.
    pub fn set_enabled(&mut self, store: &ParameterStore, enabled: bool) {
        self.enabled = enabled;
        store.set_raw(BRIGHTNESS_SWITCH_KEY, if enabled { "true" } else { "false" });
    }

    /// CSS `filter` value for the background element.
    #[must_use]
    pub fn filter(&self) -> String {
        if !self.enabled || self.value == 0 {
            return "none".to_string();
        }
        let factor = 1.0 + f64::from(self.value) / 100.0;
        format!("brightness({})", screensaver_widgets::css_number(factor))
    }
}

fn clamp_value(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let (lo, hi) = BRIGHTNESS_RANGE;
    value.round().clamp(f64::from(lo), f64::from(hi)) as i32
}
