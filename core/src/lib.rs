#![no_std]

extern crate alloc;

pub use cell::*;
pub use command::*;
pub use difficulty::*;
pub use error::*;
pub use grid::*;
pub use session::*;
pub use types::*;

mod cell;
mod command;
mod difficulty;
mod error;
mod grid;
mod session;
mod types;
