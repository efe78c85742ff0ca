#![forbid(unsafe_code)]

//! Live gesture preferences.
//!
//! The settings UI writes rarely; the gesture loop reads at every episode.
//! [`PreferenceStore`] keeps the current [`GesturePreferences`] behind an
//! [`ArcSwap`] so reads never block writers and always see a complete value.
//! Clones share the same underlying value.

use std::sync::Arc;

use arc_swap::ArcSwap;
use gestura_core::GesturePreferences;

/// Shared, wait-free readable preferences.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<ArcSwap<GesturePreferences>>,
}

impl PreferenceStore {
    pub fn new(preferences: GesturePreferences) -> Self {
        Self {
            inner: Arc::new(ArcSwap::from_pointee(preferences)),
        }
    }

    /// Snapshot of the current preferences.
    #[inline]
    pub fn load(&self) -> GesturePreferences {
        **self.inner.load()
    }

    /// Replace the preferences. Takes effect from the next classification.
    pub fn store(&self, preferences: GesturePreferences) {
        tracing::debug!(?preferences, "gesture preferences updated");
        self.inner.store(Arc::new(preferences));
    }

    /// Atomically apply `f` to the current preferences.
    pub fn update(&self, f: impl Fn(&mut GesturePreferences)) {
        let previous = self.inner.rcu(|current| {
            let mut next = **current;
            f(&mut next);
            next
        });
        tracing::debug!(?previous, current = ?self.load(), "gesture preferences updated");
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new(GesturePreferences::default())
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("PreferenceStore").field(&self.load()).finish()
    }
}
