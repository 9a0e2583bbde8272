//! Process-wide property store.
//!
//! Properties are consulted before environment variables when a placeholder
//! name is resolved. Each lookup takes the read lock on its own, so a
//! resolve call running while another thread writes may see some names
//! before the write and some after.

use std::sync::RwLock;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

lazy_static! {
    static ref PROPERTIES: RwLock<FxHashMap<String, String>> = RwLock::new(FxHashMap::default());
}

/// Sets a property, returning the previous value.
pub fn set_property(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    let mut props = PROPERTIES.write().unwrap_or_else(|e| e.into_inner());
    props.insert(key.into(), value.into())
}

/// Returns the current value of a property.
pub fn get_property(key: &str) -> Option<String> {
    let props = PROPERTIES.read().unwrap_or_else(|e| e.into_inner());
    props.get(key).cloned()
}

/// Removes a property, returning its value.
pub fn remove_property(key: &str) -> Option<String> {
    let mut props = PROPERTIES.write().unwrap_or_else(|e| e.into_inner());
    props.remove(key)
}
