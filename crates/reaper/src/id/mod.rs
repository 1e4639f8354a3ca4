mod error;
mod object_id;
mod set;

pub use error::*;
pub use object_id::*;
pub use set::*;
