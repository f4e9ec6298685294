//! Data types for the table engine.

mod column;
mod filter;
mod row;
mod span;
mod view_state;

pub use column::*;
pub use filter::*;
pub use row::*;
pub use span::*;
pub use view_state::*;
