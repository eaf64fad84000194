pub mod image;
pub mod options;
pub mod thumbnail;

pub use image::*;
pub use options::*;
pub use thumbnail::*;
