//! Entity trait: remote-owned records identified by a short name.

/// A record owned by a collaborator and identified by a unique key.
///
/// Keys are unique within their collaborator; the bot never persists the
/// records themselves, it only uses the key to address them.
pub trait Entity {
    /// Returns the key that identifies this record within its collaborator.
    fn key(&self) -> &str;
}
