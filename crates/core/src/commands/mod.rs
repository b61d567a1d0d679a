pub mod binder;
pub mod binding;
pub mod environment;
mod error;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod resolver;
pub mod token;

pub use binding::{Binding, Link, Role, Signature};
pub use environment::Environment;
pub use error::CompileError;
pub use lexer::Lexer;
pub use node::{Command, CommandTree, NodeIdx};
pub use token::{Identity, Kind, Token};
