#![doc = include_str!("../README.md")]

mod backend;
mod delete;
mod error;
mod handle;
mod id;
mod printer;
mod progress;

pub use crate::backend::*;
pub use crate::delete::*;
pub use crate::error::*;
pub use crate::handle::*;
pub use crate::id::*;
pub use crate::printer::*;
pub use crate::progress::*;

pub use tokio_util::sync::CancellationToken;
