//! Markers attached to classes, members and parameters
//!
//! A marker is any `'static` Rust value; its type is its [`MarkerKind`]. The engine
//! only ever compares kinds, the payload is kept so callers can read annotation data
//! back (a route template, an order, ...).

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a marker type
#[derive(Clone, Copy)]
pub struct MarkerKind {
    id: TypeId,
    name: &'static str,
}

impl MarkerKind {
    /// Kind of marker type `M`
    pub fn of<M: Any>() -> Self {
        Self {
            id: TypeId::of::<M>(),
            name: std::any::type_name::<M>(),
        }
    }

    /// Fully qualified marker type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Marker type name without its module path
    pub fn short_name(&self) -> &'static str {
        self.name.rsplit("::").next().unwrap_or(self.name)
    }
}

impl PartialEq for MarkerKind {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for MarkerKind {}

impl Hash for MarkerKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MarkerKind({})", self.short_name())
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A marker value
#[derive(Clone)]
pub struct Marker {
    kind: MarkerKind,
    payload: Arc<dyn Any + Send + Sync>,
}

impl Marker {
    /// Wrap a marker value
    pub fn new<M: Any + Send + Sync>(marker: M) -> Self {
        Self {
            kind: MarkerKind::of::<M>(),
            payload: Arc::new(marker),
        }
    }

    /// The injection marker
    pub fn inject() -> Self {
        Self::new(Inject)
    }

    /// Marker kind
    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    /// Whether this marker is of type `M`
    pub fn is<M: Any>(&self) -> bool {
        self.kind == MarkerKind::of::<M>()
    }

    /// Whether this is the injection marker
    pub fn is_inject(&self) -> bool {
        self.is::<Inject>()
    }

    /// Borrow the marker payload
    pub fn downcast_ref<M: Any>(&self) -> Option<&M> {
        self.payload.downcast_ref::<M>()
    }
}

impl fmt::Debug for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#[{}]", self.kind.short_name())
    }
}

/// Marks a field or property as an injection target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inject;

/// Marker lookup over a list of markers
pub trait MarkerSet {
    /// Whether any marker is of the given kind
    fn has_kind(&self, kind: MarkerKind) -> bool;

    /// First marker of type `M`
    fn find<M: Any>(&self) -> Option<&M>;

    /// Every marker of type `M`
    fn find_all<M: Any>(&self) -> Vec<&M>;
}

impl MarkerSet for [Marker] {
    fn has_kind(&self, kind: MarkerKind) -> bool {
        self.iter().any(|marker| marker.kind() == kind)
    }

    fn find<M: Any>(&self) -> Option<&M> {
        self.iter().find_map(Marker::downcast_ref::<M>)
    }

    fn find_all<M: Any>(&self) -> Vec<&M> {
        self.iter().filter_map(Marker::downcast_ref::<M>).collect()
    }
}
