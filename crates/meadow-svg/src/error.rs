use crate::shape::ShapeId;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("shape {0} is not a group")]
    NotAGroup(ShapeId),
    #[error("shape {0} does not belong to this scene")]
    UnknownShape(ShapeId),
    #[error("adding {child} to group {group} would make the group contain itself")]
    Cycle { group: ShapeId, child: ShapeId },
}
