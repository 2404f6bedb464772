//! Presentation Package Module
//! Reads a .pptx (ZIP) package into memory, resolves its slide parts and
//! writes it back with edited slides.

use super::slide::{attr_value, rewrite_slide, PictureEdit, SlideSize, SlideStats};
use super::PptxError;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// One entry of the ZIP package, kept in archive order.
struct PackagePart {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
}

/// An opened presentation held fully in memory.
pub struct Presentation {
    path: PathBuf,
    parts: Vec<PackagePart>,
    slide_size: SlideSize,
    /// Slide part names in presentation order.
    slides: Vec<String>,
}

impl Presentation {
    /// Open a .pptx file and read every part.
    pub fn open(path: &Path) -> Result<Self, PptxError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let name = entry.name().to_string();
            let is_dir = entry.is_dir();
            let mut data = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut data)?;
            parts.push(PackagePart { name, data, is_dir });
        }

        let presentation_xml = part_data(&parts, PRESENTATION_PART)?;
        let slide_size = parse_slide_size(presentation_xml)?;
        let slide_ids = parse_slide_rel_ids(presentation_xml)?;
        let targets = parse_relationship_targets(part_data(&parts, PRESENTATION_RELS_PART)?)?;

        let slides: Vec<String> = slide_ids
            .iter()
            .filter_map(|rel_id| targets.get(rel_id))
            .map(|target| resolve_target("ppt", target))
            .filter(|name| parts.iter().any(|p| &p.name == name))
            .collect();

        tracing::debug!(
            path = %path.display(),
            parts = parts.len(),
            slides = slides.len(),
            cx = slide_size.cx,
            cy = slide_size.cy,
            "Presentation opened"
        );

        Ok(Self {
            path: path.to_path_buf(),
            parts,
            slide_size,
            slides,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Raw XML of the slide at `index` (presentation order).
    pub fn slide_xml(&self, index: usize) -> Option<&[u8]> {
        let name = self.slides.get(index)?;
        self.parts
            .iter()
            .find(|p| &p.name == name)
            .map(|p| p.data.as_slice())
    }

    /// Apply the edit to every slide in memory.
    pub fn apply(&mut self, edit: &PictureEdit) -> Result<SlideStats, PptxError> {
        let mut total = SlideStats::default();

        for slide_name in &self.slides {
            let Some(part) = self.parts.iter_mut().find(|p| &p.name == slide_name) else {
                continue;
            };
            let (xml, stats) = rewrite_slide(&part.data, edit, self.slide_size)?;
            tracing::trace!(slide = %slide_name, pictures = stats.pictures, "Slide rewritten");
            part.data = xml;
            total += stats;
        }

        Ok(total)
    }

    /// Overwrite the file the presentation was opened from.
    pub fn save(&self) -> Result<(), PptxError> {
        self.save_as(&self.path)
    }

    /// Write the package to `path` through a temporary file in the same
    /// directory, so a failed write never leaves a truncated deck behind.
    pub fn save_as(&self, path: &Path) -> Result<(), PptxError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

        {
            let mut zip = ZipWriter::new(tmp.as_file_mut());
            let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

            for part in &self.parts {
                if part.is_dir {
                    zip.add_directory(part.name.as_str(), options)?;
                } else {
                    zip.start_file(part.name.as_str(), options)?;
                    zip.write_all(&part.data)?;
                }
            }
            zip.finish()?;
        }

        if let Ok(existing) = fs::metadata(path) {
            tmp.as_file().set_permissions(existing.permissions())?;
        }
        tmp.persist(path)?;
        Ok(())
    }
}

fn part_data<'a>(parts: &'a [PackagePart], name: &str) -> Result<&'a [u8], PptxError> {
    parts
        .iter()
        .find(|p| p.name == name)
        .map(|p| p.data.as_slice())
        .ok_or_else(|| PptxError::MissingPart(name.to_string()))
}

/// Read `p:sldSz` from presentation.xml.
fn parse_slide_size(xml: &[u8]) -> Result<SlideSize, PptxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => return Err(PptxError::InvalidSlideSize),
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldSz" => {
                let cx = attr_value(&e, b"cx")?.and_then(|v| v.parse::<i64>().ok());
                let cy = attr_value(&e, b"cy")?.and_then(|v| v.parse::<i64>().ok());
                return match (cx, cy) {
                    (Some(cx), Some(cy)) if cx > 0 && cy > 0 => Ok(SlideSize { cx, cy }),
                    _ => Err(PptxError::InvalidSlideSize),
                };
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Relationship ids of `p:sldIdLst/p:sldId`, in presentation order.
fn parse_slide_rel_ids(xml: &[u8]) -> Result<Vec<String>, PptxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut ids = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sldId" => {
                // The relationship id is the namespaced `r:id`; the bare `id` is numeric.
                for attr in e.attributes() {
                    let attr = attr?;
                    if attr.key.local_name().as_ref() == b"id" && attr.key.prefix().is_some() {
                        ids.push(attr.unescape_value()?.into_owned());
                    }
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// Map of relationship `Id` to `Target` from a .rels part.
fn parse_relationship_targets(xml: &[u8]) -> Result<HashMap<String, String>, PptxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut targets = HashMap::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"Relationship" => {
                if let (Some(id), Some(target)) = (attr_value(&e, b"Id")?, attr_value(&e, b"Target")?) {
                    targets.insert(id, target);
                }
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// Resolve a relationship target against the directory of its source part.
fn resolve_target(base_dir: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
