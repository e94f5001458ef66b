//! different utility modules used throughout the project
/// tiny module to save evaluated series into tab-separated and csv files
pub mod logger;
/// tiny module to render an evaluated frame as a png, with plotters and
/// gnuplot backends
pub mod plots;
