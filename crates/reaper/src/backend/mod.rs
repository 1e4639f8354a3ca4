mod error;
mod interface;
mod local;
mod memory;

pub use error::*;
pub use interface::*;
pub use local::*;
pub use memory::*;
