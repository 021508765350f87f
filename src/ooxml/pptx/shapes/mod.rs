/// Shapes placed on generated slides.
///
/// - `placeholder`: placeholder declarations read from masters and layouts
/// - `picture`: cropping pictures into placeholder frames
/// - `textframe`: text bodies written into placeholders
pub mod picture;
pub mod placeholder;
pub mod textframe;

pub use picture::Crop;
pub use placeholder::{Placeholder, PlaceholderKind, Rect, SlotRole};
pub use textframe::{Align, Anchor, AutoFit, BodyProps, Paragraph, TextBody};
