pub mod ast;
pub mod context;
pub mod words;
pub mod and;
pub mod or;
pub mod planner;
