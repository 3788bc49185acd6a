//! different utility modules used throughout the project
/// terminal and file logging set up with simplelog
pub mod logger;
/// tiny module to draw assembled chart data with plotters
pub mod plots;
/// tiny module to pretty-print a table of plotted series
pub mod summary;
/// parse plot task documents with titled sections and `key: value; value` lines
pub mod task_parser;
