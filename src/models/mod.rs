pub mod gateway;
pub mod image;

pub use gateway::*;
pub use image::*;
