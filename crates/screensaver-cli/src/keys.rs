//! Storage key listing for a screensaver kind.

use screensaver_core::store::{colors_key, enabled_key, param_key};
use screensaver_core::{Defaults, ParamKind, ParameterStore, WidgetKind};
use screensaver_widgets::Registry;
use std::rc::Rc;

/// Every storage key `kind` reads, paired with the value used when the key
/// is absent.
pub(crate) fn storage_keys(kind: WidgetKind, defaults: &Defaults) -> Vec<(String, String)> {
    let registry = Registry::new(Rc::new(defaults.clone()));
    let store = ParameterStore::in_memory();
    let id = kind.as_str();

    let mut keys = Vec::new();
    let mut colors_listed = false;
    for descriptor in registry.describe(kind, &store) {
        if descriptor.color_index().is_some() {
            if !colors_listed {
                let palette = serde_json::to_string(&defaults.palette(kind)).unwrap_or_default();
                keys.push((colors_key(id), palette));
                colors_listed = true;
            }
            continue;
        }
        keys.push((param_key(id, &descriptor.name), descriptor.default.to_string()));
        if descriptor.kind == ParamKind::SingleChoice {
            keys.push((enabled_key(id, &descriptor.name), "false".to_string()));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(keys: &'a [(String, String)], key: &str) -> Option<&'a str> {
        keys.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_linear_keys() {
        let keys = storage_keys(WidgetKind::LinearGradient, &Defaults::default());
        assert_eq!(keys[0].0, "screensaver-linear-gradient-speed");
        assert_eq!(lookup(&keys, "screensaver-linear-gradient-angle"), Some("90"));
        assert_eq!(
            lookup(&keys, "screensaver-linear-gradient-colorSpace"),
            Some("oklab")
        );
        assert_eq!(
            lookup(&keys, "screensaver-linear-gradient-colorSpace_enabled"),
            Some("false")
        );
        assert_eq!(
            lookup(&keys, "screensaver-linear-gradient-colors"),
            Some(r##"["#ff0000","#0000ff","#00ff00","#ffff00"]"##)
        );
        assert!(keys.iter().all(|(k, _)| !k.contains("color1")));
    }

    #[test]
    fn test_solid_color_key() {
        let keys = storage_keys(WidgetKind::SolidColor, &Defaults::default());
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].0, "screensaver-solid-color-color");
    }

    #[test]
    fn test_overridden_defaults_listed() {
        let defaults = Defaults::from_yaml("color-cycle:\n  speed: 4\n").unwrap();
        let keys = storage_keys(WidgetKind::ColorCycle, &defaults);
        assert_eq!(lookup(&keys, "screensaver-color-cycle-speed"), Some("4"));
        assert_eq!(
            lookup(&keys, "screensaver-color-cycle-transition"),
            Some("smooth")
        );
    }
}
