//! PowerPoint Module
//! Opens .pptx packages, edits the top-level pictures on every slide and
//! writes the package back in place.
//!
//! Works directly on the ZIP/XML parts so no Office runtime is needed.

mod batch;
mod package;
mod slide;

pub use batch::{collect_pptx_in_folder, process_presentations, BatchReport, PictureTool};
pub use package::Presentation;
pub use slide::{rewrite_slide, PictureEdit, Rgb, SlideSize, SlideStats};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PptxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid package: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("XML attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),
    #[error("Failed to replace file: {0}")]
    Persist(#[from] tempfile::PersistError),
    #[error("Missing package part: {0}")]
    MissingPart(String),
    #[error("Malformed slide XML: {0}")]
    Malformed(&'static str),
    #[error("Invalid slide size in presentation.xml")]
    InvalidSlideSize,
    #[error("Line weight must be a positive number of points, got {0}")]
    InvalidWeight(f64),
}
