//! Configuration layering and deep merging

use serde_json::{Map, Value};

use crate::json::PackageJson;
use crate::overrides::SelectedOverride;

/// Merge `overlay` over `base`, right-biased.
///
/// Objects merge key by key, recursively. For any other pair the overlay
/// value wins, arrays included. Keys only in `base` survive untouched.
pub fn deep_merge(base: Value, overlay: Value) -> Value {
    let mut merged = base;
    deep_merge_into(&mut merged, overlay);
    merged
}

/// In-place form of [`deep_merge`]
pub fn deep_merge_into(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge_into(base_value, overlay_value),
                    None => {
                        base_map.insert(key, overlay_value);
                    },
                }
            }
        },
        (base, overlay) => *base = overlay,
    }
}

/// Layering of builder options from their two homes
pub struct ConfigLayering;

impl ConfigLayering {
    /// Builder options: the manifest's `staticSiteBuilderConfig` block with
    /// the selected override laid over it key by key (no recursion).
    pub fn builder_options(
        manifest: Option<&PackageJson>,
        selected: &SelectedOverride,
    ) -> Map<String, Value> {
        let mut options = manifest
            .and_then(|pkg| pkg.static_site_builder_config.clone())
            .unwrap_or_default();

        for (key, value) in selected.as_map() {
            options.insert(key.clone(), value.clone());
        }

        options
    }
}
