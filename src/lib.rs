//! Slidesmith - research a topic, draft slides with an LLM, render them onto a template
//!
//! The pipeline runs once per invocation:
//!
//! 1. the model turns the topic into a web search query,
//! 2. SerpAPI returns a handful of organic results used as context,
//! 3. the model drafts slides as a fenced JSON block ([`synthesizer`]),
//! 4. [`generator`] renders each slide onto the richest layout of a `.pptx`
//!    or `.potx` template, moving the body clear of the title and picture.
//!
//! The OOXML layer under [`ooxml`] reads and writes just enough of a
//! presentation package for that: layouts, placeholders, pictures and notes.
//!
//! # Example - Rendering prepared slides
//!
//! ```no_run
//! use slidesmith::generator::Generator;
//! use slidesmith::images::ImageSource;
//! use slidesmith::model::SlideRecord;
//! use std::path::{Path, PathBuf};
//!
//! struct NoImages;
//!
//! impl ImageSource for NoImages {
//!     fn fetch(&self, _query: &str) -> Option<PathBuf> {
//!         None
//!     }
//! }
//!
//! # fn main() -> slidesmith::Result<()> {
//! let slides = vec![SlideRecord::from_bullets("Why tea", &["Calm", "Focus"])];
//! let report = Generator::new(&NoImages).render(
//!     &slides,
//!     Path::new("templates/corporate.pptx"),
//!     Path::new("tea.pptx"),
//! )?;
//! println!("{} slides", report.slides.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cache;
pub mod common;
pub mod config;
pub mod error;
pub mod generator;
pub mod images;
pub mod llm;
pub mod model;
pub mod ooxml;
pub mod pipeline;
pub mod prompts;
pub mod search;
pub mod synthesizer;

pub use error::{Error, Result};
