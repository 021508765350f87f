//! Office Open XML support for PowerPoint decks.
//!
//! Two layers:
//!
//! 1. **OPC Layer** (`opc`): package handling (ZIP, parts, relationships, content types)
//! 2. **PresentationML** (`pptx`): layouts, placeholders and slide writing on top of it
//!
//! ```rust,no_run
//! use slidesmith::ooxml::pptx::Package;
//!
//! let pkg = Package::open("template.pptx")?;
//! for layout in pkg.slide_layouts()? {
//!     println!("{}: {} placeholders", layout.name, layout.placeholders.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
