//! Command handlers for the lexiscan binary.

pub(crate) mod scan;
