use serde_json::Value;

/// Recursively merge `overlay` into `base`.
///
/// Objects merge key by key. Any other overlay value, arrays included, replaces what was
/// there.
pub fn deep_merge(base: &mut Value, overlay: Value) {
  match (base, overlay) {
    (Value::Object(base_map), Value::Object(overlay_map)) => {
      for (key, value) in overlay_map {
        match base_map.get_mut(&key) {
          Some(existing) => deep_merge(existing, value),
          None => {
            base_map.insert(key, value);
          }
        }
      }
    }
    (slot, value) => *slot = value,
  }
}
