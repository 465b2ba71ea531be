//! Abstract Syntax Tree (AST) definitions for path expressions
//!
//! The tree is built once by the compiler and only read afterwards.

mod expression;
mod operator;
mod visitor;

pub use expression::*;
pub use operator::*;
pub use visitor::{Visitor, walk_expression};
