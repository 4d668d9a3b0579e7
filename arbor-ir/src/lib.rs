#[macro_use]
extern crate log;

pub mod ir;
mod builder;
pub mod linker;
mod printer;

pub use ir::Program;
pub use builder::merge;
pub use linker::{validate, LinkError};
pub use printer::emit_program;
