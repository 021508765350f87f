/// Read-side wrappers over the XML parts of a .pptx package.
pub mod presentation;
pub mod slide;

pub use presentation::{PresentationPart, SlideIdEntry};
pub use slide::{SlideLayoutPart, SlideMasterPart, SlidePart};
