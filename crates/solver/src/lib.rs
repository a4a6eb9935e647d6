pub mod lm;

pub use lm::{solve, Residual, SolveOptions, SolveResult};
