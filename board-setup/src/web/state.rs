//! Application state for the web layer.

use std::sync::Arc;

/// Shared application state.
///
/// Holds the collaborators every flow needs. A fresh flow is built per
/// request around borrowed references to these.
pub struct AppState<R, T, E> {
    /// Rail data client used for validation
    pub rail: Arc<R>,

    /// Last accepted API token
    pub tokens: Arc<T>,

    /// Configuration entries
    pub entries: Arc<E>,
}

impl<R, T, E> AppState<R, T, E> {
    /// Create a new app state.
    pub fn new(rail: R, tokens: T, entries: E) -> Self {
        Self {
            rail: Arc::new(rail),
            tokens: Arc::new(tokens),
            entries: Arc::new(entries),
        }
    }
}

// derive(Clone) would require R, T, E: Clone.
impl<R, T, E> Clone for AppState<R, T, E> {
    fn clone(&self) -> Self {
        Self {
            rail: Arc::clone(&self.rail),
            tokens: Arc::clone(&self.tokens),
            entries: Arc::clone(&self.entries),
        }
    }
}
