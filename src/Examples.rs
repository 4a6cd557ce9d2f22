//! examples of usage of RustedRoots
/// ready-made equations and systems offered by the menu
pub mod equation_catalogue;
/// small programs showing the solver api
pub mod roots_examples;
