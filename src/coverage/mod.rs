mod decision;
mod evaluator;
mod matchers;


pub use decision::{CoverageMatch, CoverageVerdict};
pub use evaluator::{covers, evaluate, ActionPattern, PatternSet};
