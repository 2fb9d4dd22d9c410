//! Topic naming
//!
//! Topics are derived from the entity and the kind of event:
//! `<entity>Created`, `<entity>Updated`, `<entity>Deleted` and
//! `<entity>Count`.

use crate::store::Collection;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
    Count,
}

impl EventKind {
    pub const ALL: [EventKind; 4] = [
        EventKind::Created,
        EventKind::Updated,
        EventKind::Deleted,
        EventKind::Count,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Created => "Created",
            EventKind::Updated => "Updated",
            EventKind::Deleted => "Deleted",
            EventKind::Count => "Count",
        }
    }
}

pub fn topic_name(collection: Collection, kind: EventKind) -> String {
    format!("{}{}", collection.entity(), kind.as_str())
}

/// Resolve a subscription field such as `postCreated` into its parts.
pub fn parse_field(field: &str) -> Option<(Collection, EventKind)> {
    Collection::ALL.into_iter().find_map(|collection| {
        let rest = field.strip_prefix(collection.entity())?;
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == rest)
            .map(|kind| (collection, kind))
    })
}
