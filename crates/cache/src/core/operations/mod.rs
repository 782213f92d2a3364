//! Cache operations module

mod get;
mod misc;
mod put;
mod remove;
