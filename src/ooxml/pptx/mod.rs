//! PowerPoint (.pptx) template rendering.
//!
//! Opens a presentation or template, reads the layouts of its first slide
//! master, and writes new slides cloned from those layouts:
//!
//! - `Package`: the .pptx package; slide removal, media, notes, saving
//! - `LayoutInfo`: a layout with its placeholders and resolved geometry
//! - `SlideBuilder`: a slide under construction
//! - `parts`: read-side wrappers over presentation, master, layout and slide XML
//! - `shapes`: placeholders, text bodies and picture cropping
//!
//! # Example
//!
//! ```rust,no_run
//! use slidesmith::ooxml::pptx::{Package, SlideBuilder, SlotRole, TextBody, Paragraph};
//!
//! let mut pkg = Package::open("template.pptx")?;
//! pkg.remove_all_slides()?;
//!
//! let layouts = pkg.slide_layouts()?;
//! let mut slide = SlideBuilder::from_layout(&layouts[0]);
//! if let Some(title) = slide.placeholder_mut(SlotRole::Title) {
//!     let mut body = TextBody::default();
//!     body.push(Paragraph::new("Hello").size(36.0));
//!     title.set_text(body);
//! }
//! pkg.add_slide(&slide)?;
//! pkg.save("deck.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod format;
pub mod layout;
pub mod package;
pub mod parts;
pub mod shapes;
pub mod writer;

#[cfg(test)]
pub(crate) mod fixture;

pub use format::ImageFormat;
pub use layout::LayoutInfo;
pub use package::Package;
pub use shapes::{Crop, Paragraph, Placeholder, PlaceholderKind, Rect, SlotRole, TextBody};
pub use writer::{PictureFill, SlideBuilder};
