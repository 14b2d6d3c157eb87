//! Wire models mirrored from the Anytype API.
//!
//! # Design
//! These types are snapshots of server state; the SDK never mutates them
//! locally and performs no consistency checks. Polymorphic shapes (icons,
//! property values, property links, filter values) are tagged enums
//! resolved at the serde boundary.

pub mod entities;
pub mod enums;
pub mod filter;
pub mod icon;
pub mod pagination;
pub mod property;
pub mod requests;

pub use entities::*;
pub use enums::*;
pub use filter::*;
pub use icon::Icon;
pub use pagination::{PaginatedResponse, PaginationMeta};
pub use property::*;
pub use requests::*;
