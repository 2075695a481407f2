//! SQL helpers: partial-update SET clauses, list filters, typed bind values.

pub mod filter;
pub mod params;
mod partial;
pub use filter::WhereBuf;
pub use params::*;
pub use partial::*;
