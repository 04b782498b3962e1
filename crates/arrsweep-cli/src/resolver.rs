//! Correlates a catalog item with the tracked request for the same title.

use std::fmt::{self, Display, Formatter};

/// A request-tracker entry reduced to what the workflows need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackedRequest {
    pub(crate) id: i64,
    pub(crate) external_id: i64,
    pub(crate) title: String,
}

/// No tracked request carries the external identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotFound {
    pub(crate) external_id: i64,
}

impl Display for NotFound {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "no tracked request found for external id {}",
            self.external_id
        )
    }
}

impl std::error::Error for NotFound {}

/// First request whose external identifier equals `external_id`, in fetch
/// order.
pub(crate) fn resolve(
    external_id: i64,
    requests: &[TrackedRequest],
) -> Result<&TrackedRequest, NotFound> {
    requests
        .iter()
        .find(|request| request.external_id == external_id)
        .ok_or(NotFound { external_id })
}
