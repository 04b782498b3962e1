//! Command handlers and the service adapters that feed the workflows.

pub(crate) mod movies;
pub(crate) mod requests;
pub(crate) mod series;
