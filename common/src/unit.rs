//! Marker types.

/// Marker type describing an entity creation.
#[derive(Clone, Copy, Debug)]
pub struct Creation;

/// Marker type describing the moment a value was fetched from its source.
#[derive(Clone, Copy, Debug)]
pub struct Fetch;
