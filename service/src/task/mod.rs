//! Background [`Task`]s definitions.

mod background;
pub mod evict_stale_listings;

pub use common::Handler as Task;

pub use self::{
    background::{Background, Failure},
    evict_stale_listings::EvictStaleListings,
};
