//! Model catalog: static alias, provider-id and default tables.

pub mod default;
pub mod load;
pub mod types;

pub use load::*;
pub use types::*;
