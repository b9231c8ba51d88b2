// ABOUTME: Errors reported by the layout engine.
// ABOUTME: Unknown ids are not errors; duplicates, broken invariants and host failures are.

use crate::host::HostError;
use crate::node::ContentId;

#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Content {0} is already in the layout")]
    DuplicateContent(ContentId),

    #[error("Layout invariant violated: {0}")]
    Invariant(String),

    #[error("Host hook failed: {0}")]
    Host(#[from] HostError),
}
