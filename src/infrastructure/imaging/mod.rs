pub mod engine;
pub mod orientation;
