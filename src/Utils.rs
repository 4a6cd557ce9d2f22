//! different utility modules used throughout the project
/// log initialization and saving of the iteration trace into files
pub mod logger;
/// console menu over the equation catalogue
pub mod menu;
/// parameters from a file or from the keyboard
pub mod param_source;
/// graph of an equation and zero contours of a system
pub mod plots;
/// tabled report of a solve
pub mod report;
/// rusted_roots.toml settings
pub mod settings;
/// parse a line of method parameters like "2 3 1e-8 100"
pub mod task_parser;
