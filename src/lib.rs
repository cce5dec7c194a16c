pub mod ast;
pub mod intern;
pub mod token;
