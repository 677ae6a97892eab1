//! Generation - scene stocking and question-set creation

mod market;
mod questions;

pub use market::*;
pub use questions::*;
