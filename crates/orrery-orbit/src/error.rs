use crate::BodyId;

/// Errors raised while assembling a [`SolarSystem`](crate::SolarSystem).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrbitError {
    /// A body named a parent that has not been added yet.
    #[error("body '{body}' references unknown parent {parent:?}")]
    UnknownParent { body: String, parent: BodyId },

    /// A shell was anchored on a body that does not exist.
    #[error("atmosphere shell references unknown anchor {anchor:?}")]
    UnknownAnchor { anchor: BodyId },
}
