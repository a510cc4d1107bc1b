pub mod ast;
pub mod error;
pub mod model;
pub mod parse;
pub mod wasm;
