pub mod grid;
pub mod repl;
