use thiserror::Error;

use crate::types::PartId;

/// Errors raised by engine calls that take part handles
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("{0} does not exist in this world")]
    UnknownPart(PartId),

    #[error("{joint} joint references {part}, which does not exist in this world")]
    UnknownJointPart { joint: &'static str, part: PartId },
}
