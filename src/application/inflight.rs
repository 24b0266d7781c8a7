//! Per-action in-flight tracking for the post list controller.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Load,
    Add,
    Delete,
    Edit,
    Update,
    Search,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InFlightError {
    #[error("{kind} already in progress")]
    AlreadyRunning { kind: ActionKind },
}

/// Tracks which action kinds currently have a request outstanding. When
/// disabled every acquire succeeds and duplicate actions run side by side.
#[derive(Clone, Default)]
pub struct InFlightActions {
    enabled: bool,
    running: Arc<DashMap<ActionKind, ()>>,
}

impl InFlightActions {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            running: Arc::new(DashMap::new()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn acquire(&self, kind: ActionKind) -> Result<ActionGuard, InFlightError> {
        use dashmap::mapref::entry::Entry;

        if !self.enabled {
            return Ok(ActionGuard {
                kind,
                running: None,
            });
        }

        match self.running.entry(kind) {
            Entry::Vacant(vacant) => {
                vacant.insert(());
                Ok(ActionGuard {
                    kind,
                    running: Some(Arc::clone(&self.running)),
                })
            }
            Entry::Occupied(_) => Err(InFlightError::AlreadyRunning { kind }),
        }
    }
}

pub struct ActionGuard {
    kind: ActionKind,
    running: Option<Arc<DashMap<ActionKind, ()>>>,
}

impl Drop for ActionGuard {
    fn drop(&mut self) {
        if let Some(running) = &self.running {
            running.remove(&self.kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enabled_guard_refuses_duplicate_kind_until_dropped() {
        let actions = InFlightActions::new(true);
        let guard = actions.acquire(ActionKind::Load).expect("first acquire");

        assert_eq!(
            actions.acquire(ActionKind::Load).err(),
            Some(InFlightError::AlreadyRunning {
                kind: ActionKind::Load
            })
        );
        assert!(actions.acquire(ActionKind::Add).is_ok());

        drop(guard);
        assert!(actions.acquire(ActionKind::Load).is_ok());
    }

    #[test]
    fn disabled_guard_never_refuses() {
        let actions = InFlightActions::disabled();
        let _first = actions.acquire(ActionKind::Update).expect("first");
        let _second = actions.acquire(ActionKind::Update).expect("second");
        assert!(actions.acquire(ActionKind::Update).is_ok());
    }
}
