//! Tri-state view of a remote collection and the request generation that
//! guards it.

use crate::error::Error;

/// State of a remote collection as seen by a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Loaded(Vec<T>),
    Failed(Error),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> Resource<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Loaded items, empty in any other state.
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Loaded(items) => items,
            _ => &[],
        }
    }
}

impl<T> From<crate::Result<Vec<T>>> for Resource<T> {
    fn from(result: crate::Result<Vec<T>>) -> Self {
        match result {
            Ok(items) => Self::Loaded(items),
            Err(e) => Self::Failed(e),
        }
    }
}

/// Identifies one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Monotonic request counter. Only the most recently issued token is current.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: u64,
}

impl Generation {
    /// Issue a fresh token, making every earlier one stale.
    pub const fn issue(&mut self) -> RequestToken {
        self.current = self.current.wrapping_add(1);
        RequestToken(self.current)
    }

    #[must_use]
    pub const fn is_current(&self, token: RequestToken) -> bool {
        self.current == token.0
    }

    /// Make every issued token stale.
    pub const fn invalidate(&mut self) {
        self.current = self.current.wrapping_add(1);
    }
}

/// Whether a response was applied to the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    Stale,
}

/// A `Resource` together with the generation that guards writes to it.
#[derive(Debug, Clone)]
pub struct ResourceSlot<T> {
    state: Resource<T>,
    generation: Generation,
}

impl<T> Default for ResourceSlot<T> {
    fn default() -> Self {
        Self {
            state: Resource::Loading,
            generation: Generation::default(),
        }
    }
}

impl<T> ResourceSlot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request. A failed view goes back to `Loading`; a loaded view
    /// keeps showing its data until the response lands.
    pub fn begin(&mut self) -> RequestToken {
        if !matches!(self.state, Resource::Loaded(_)) {
            self.state = Resource::Loading;
        }
        self.generation.issue()
    }

    /// Apply a response if `token` is still current.
    pub fn apply(&mut self, token: RequestToken, result: crate::Result<Vec<T>>) -> Applied {
        if !self.generation.is_current(token) {
            return Applied::Stale;
        }
        self.state = Resource::from(result);
        Applied::Current
    }

    /// Make every in-flight request stale.
    pub const fn invalidate(&mut self) {
        self.generation.invalidate();
    }

    #[must_use]
    pub const fn state(&self) -> &Resource<T> {
        &self.state
    }
}
