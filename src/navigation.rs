use std::sync::Arc;

use itertools::Itertools;

use crate::error::SiteError;

pub type RoutePath = str;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub path: Arc<RoutePath>,
    pub label: Arc<str>,
}

impl RouteEntry {
    pub fn new<P, L>(path: P, label: L) -> Self
    where
        P: Into<Arc<RoutePath>>,
        L: Into<Arc<str>>,
    {
        Self {
            path: path.into(),
            label: label.into(),
        }
    }
}

/// Pages in navigation order. Paths are unique, and the sequence never changes once built.
#[derive(Debug, Clone, Default)]
pub struct RouteSequence {
    entries: Vec<RouteEntry>,
}

impl RouteSequence {
    /// # Errors
    /// Returns [`SiteError::DuplicatePath`] if two entries share a path
    pub fn new(entries: Vec<RouteEntry>) -> Result<Self, SiteError> {
        if let Some(path) = entries.iter().map(|entry| &entry.path).duplicates().next() {
            return Err(SiteError::DuplicatePath(path.to_string()));
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn position(&self, path: &RoutePath) -> Option<usize> {
        self.entries.iter().position(|entry| &*entry.path == path)
    }

    pub fn get(&self, path: &RoutePath) -> Option<&RouteEntry> {
        self.position(path).map(|index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Neighbors<T> {
    pub previous: Option<T>,
    pub next: Option<T>,
}

impl<T> Neighbors<T> {
    pub const fn none() -> Self {
        Self {
            previous: None,
            next: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.previous.is_none() && self.next.is_none()
    }
}

/// Finds the entries around `current_path`. An unknown path has no neighbors.
pub fn neighbor_entries<'sequence>(
    current_path: &RoutePath,
    sequence: &'sequence RouteSequence,
) -> Neighbors<&'sequence RouteEntry> {
    let entries = sequence.entries();
    match sequence.position(current_path) {
        None => Neighbors::none(),
        Some(index) => Neighbors {
            previous: index.checked_sub(1).map(|previous| &entries[previous]),
            next: entries.get(index + 1),
        },
    }
}

pub fn prev_next(current_path: &RoutePath, sequence: &RouteSequence) -> Neighbors<Arc<RoutePath>> {
    let Neighbors { previous, next } = neighbor_entries(current_path, sequence);
    Neighbors {
        previous: previous.map(|entry| entry.path.clone()),
        next: next.map(|entry| entry.path.clone()),
    }
}
