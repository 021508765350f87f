//! Slide writing: XML for new slides, their shapes and notes.

pub mod shape;
pub mod slide;

pub use shape::{FreePicture, PictureFill, PlaceholderShape, SlideShape};
pub use slide::SlideBuilder;
