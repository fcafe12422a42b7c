mod kotlin;
mod java;
mod common;
pub mod xml;

pub use kotlin::KotlinParser;
pub use java::JavaParser;
pub use common::{ParseResult, Parser};
