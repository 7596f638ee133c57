use once_cell::sync::Lazy;
use std::fmt;
use std::sync::Arc;

/// Name of the marker attached to every event logged by [`crate::event::EventLogger`].
pub const EVENT_MARKER_NAME: &str = "EVENT";

/// Marker tagging event log calls.
pub static EVENT: Lazy<Arc<Marker>> = Lazy::new(|| Arc::new(Marker::new(EVENT_MARKER_NAME)));

/// A named tag that enriches a log call.
///
/// Markers may reference other markers; [`Marker::contains`] searches the
/// whole reference graph, so a backend can filter on a broad marker and still
/// see calls tagged with a more specific one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    name: String,
    references: Vec<Arc<Marker>>,
}

impl Marker {
    pub fn new(name: impl Into<String>) -> Self {
        Marker {
            name: name.into(),
            references: Vec::new(),
        }
    }

    /// Add a reference to another marker. Adding a marker already referenced
    /// by name is a no-op.
    pub fn with_reference(mut self, reference: Arc<Marker>) -> Self {
        if !self.references.iter().any(|r| r.name == reference.name) {
            self.references.push(reference);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn references(&self) -> &[Arc<Marker>] {
        &self.references
    }

    pub fn has_references(&self) -> bool {
        !self.references.is_empty()
    }

    /// Is this marker, or any marker it references, called `name`?
    pub fn contains(&self, name: &str) -> bool {
        self.name == name || self.references.iter().any(|r| r.contains(name))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.has_references() {
            f.write_str(" [ ")?;
            for (i, reference) in self.references.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", reference)?;
            }
            f.write_str(" ]")?;
        }
        Ok(())
    }
}
