//! Slide XML Rewriter
//! Streams a slide part through quick-xml and edits every top-level `p:pic`:
//! centres it on the slide and sets (or creates) its `a:ln` outline.
//!
//! Only pictures that are direct children of the slide's `p:spTree` are
//! touched. Pictures inside group shapes use the group's child coordinate
//! space and are passed through unchanged, as are pictures filling a
//! layout placeholder.

use super::PptxError;
use crate::util::constants::EMU_PER_POINT;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// `a:spPr` children that must come after `a:ln` in the schema sequence.
const LINE_SUCCESSORS: [&[u8]; 5] = [b"effectLst", b"effectDag", b"scene3d", b"sp3d", b"extLst"];

/// Fill choices allowed as the first child of `a:ln`.
const LINE_FILLS: [&[u8]; 4] = [b"noFill", b"solidFill", b"gradFill", b"pattFill"];

const DEFAULT_DML_PREFIX: &str = "a:";

/// RGB colour written as `a:srgbClr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Slide dimensions in EMU, from `p:sldSz`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideSize {
    pub cx: i64,
    pub cy: i64,
}

/// Edit applied to every top-level picture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PictureEdit {
    pub center: bool,
    pub line_width_pt: f64,
    /// When set, the outline gets a solid fill of this colour.
    pub line_color: Option<Rgb>,
}

impl PictureEdit {
    /// Outline width in EMU, truncated like a point-to-EMU length conversion.
    pub fn line_width_emu(&self) -> i64 {
        (self.line_width_pt * EMU_PER_POINT) as i64
    }
}

/// Counters for one rewritten slide.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SlideStats {
    pub pictures: usize,
    pub centered: usize,
}

impl std::ops::AddAssign for SlideStats {
    fn add_assign(&mut self, rhs: Self) {
        self.pictures += rhs.pictures;
        self.centered += rhs.centered;
    }
}

/// Rewrite one slide part, returning the new XML and what was changed.
pub fn rewrite_slide(
    xml: &[u8],
    edit: &PictureEdit,
    size: SlideSize,
) -> Result<(Vec<u8>, SlideStats), PptxError> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + 256));
    let mut buf = Vec::new();
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut stats = SlideStats::default();

    loop {
        let event = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();

        match event {
            Event::Eof => break,
            Event::Start(e)
                if e.local_name().as_ref() == b"pic"
                    && stack.last().map(Vec::as_slice) == Some(b"spTree".as_slice()) =>
            {
                let events = read_element(&mut reader, Event::Start(e))?;
                if is_placeholder(&events) {
                    tracing::debug!("Placeholder picture left unchanged");
                    for ev in events {
                        writer.write_event(ev)?;
                    }
                    continue;
                }
                let (edited, centered) = edit_picture(events, edit, size)?;
                stats.pictures += 1;
                if centered {
                    stats.centered += 1;
                }
                for ev in edited {
                    writer.write_event(ev)?;
                }
            }
            Event::Start(e) => {
                stack.push(e.local_name().as_ref().to_vec());
                writer.write_event(Event::Start(e))?;
            }
            Event::End(e) => {
                stack.pop();
                writer.write_event(Event::End(e))?;
            }
            other => writer.write_event(other)?,
        }
    }

    Ok((writer.into_inner(), stats))
}

/// Read the rest of an element whose start tag has already been consumed.
fn read_element(
    reader: &mut Reader<&[u8]>,
    start: Event<'static>,
) -> Result<Vec<Event<'static>>, PptxError> {
    let mut events = vec![start];
    let mut depth = 1usize;
    let mut buf = Vec::new();

    while depth > 0 {
        let event = reader.read_event_into(&mut buf)?.into_owned();
        buf.clear();
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth -= 1,
            Event::Eof => return Err(PptxError::Malformed("unterminated picture element")),
            _ => {}
        }
        events.push(event);
    }

    Ok(events)
}

fn path_is(path: &[Vec<u8>], expected: &[&[u8]]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a.as_slice() == *b)
}

const PIC: [&[u8]; 1] = [b"pic"];
const PIC_SPPR: [&[u8]; 2] = [b"pic", b"spPr"];
const PIC_XFRM: [&[u8]; 3] = [b"pic", b"spPr", b"xfrm"];
const PIC_LINE: [&[u8]; 3] = [b"pic", b"spPr", b"ln"];

const PIC_NVPR: [&[u8]; 3] = [b"pic", b"nvPicPr", b"nvPr"];

/// Whether the picture fills a layout placeholder (`p:nvPicPr/p:nvPr/p:ph`).
fn is_placeholder(events: &[Event<'static>]) -> bool {
    let mut path: Vec<Vec<u8>> = Vec::new();
    for event in events {
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() == b"ph" && path_is(&path, &PIC_NVPR) {
                    return true;
                }
                if matches!(event, Event::Start(_)) {
                    path.push(e.local_name().as_ref().to_vec());
                }
            }
            Event::End(_) => {
                path.pop();
            }
            _ => {}
        }
    }
    false
}

/// Size of the picture from `p:spPr/a:xfrm/a:ext`.
fn picture_extent(events: &[Event<'static>]) -> Result<Option<(i64, i64)>, PptxError> {
    let mut path: Vec<Vec<u8>> = Vec::new();
    for event in events {
        match event {
            Event::Start(e) | Event::Empty(e) => {
                if e.local_name().as_ref() == b"ext" && path_is(&path, &PIC_XFRM) {
                    let cx = attr_value(e, b"cx")?.and_then(|v| v.parse::<i64>().ok());
                    let cy = attr_value(e, b"cy")?.and_then(|v| v.parse::<i64>().ok());
                    return Ok(cx.zip(cy));
                }
                if matches!(event, Event::Start(_)) {
                    path.push(e.local_name().as_ref().to_vec());
                }
            }
            Event::End(_) => {
                path.pop();
            }
            _ => {}
        }
    }
    Ok(None)
}

/// Apply the edit to one buffered `p:pic` element. Returns the new events and
/// whether the picture was repositioned.
fn edit_picture(
    events: Vec<Event<'static>>,
    edit: &PictureEdit,
    size: SlideSize,
) -> Result<(Vec<Event<'static>>, bool), PptxError> {
    let offset = match (edit.center, picture_extent(&events)?) {
        (true, Some((cx, cy))) => Some(((size.cx - cx) / 2, (size.cy - cy) / 2)),
        (true, None) => {
            tracing::debug!("Picture has no transform; left in place");
            None
        }
        _ => None,
    };
    let offset_attrs = offset.map(|(x, y)| (x.to_string(), y.to_string()));
    let width = edit.line_width_emu().to_string();

    let mut out = Vec::with_capacity(events.len() + 6);
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut dml_prefix = DEFAULT_DML_PREFIX.to_string();
    let mut line_written = false;
    let mut skip_depth = 0usize;

    for event in events {
        if skip_depth > 0 {
            match &event {
                Event::Start(_) => skip_depth += 1,
                Event::End(_) => skip_depth -= 1,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();

                if path_is(&path, &PIC_SPPR) {
                    if carries_dml_prefix(&name) {
                        dml_prefix = prefix_of(&e);
                    }
                    if name == b"ln" {
                        line_written = true;
                        out.push(Event::Start(with_attrs(&e, &[("w", &width)])?));
                        if let Some(color) = edit.line_color {
                            out.extend(solid_fill(&prefix_of(&e), color));
                        }
                        path.push(name);
                        continue;
                    }
                    if !line_written && LINE_SUCCESSORS.contains(&name.as_slice()) {
                        out.extend(new_line(&dml_prefix, &width, edit.line_color));
                        line_written = true;
                    }
                } else if path_is(&path, &PIC_LINE)
                    && edit.line_color.is_some()
                    && LINE_FILLS.contains(&name.as_slice())
                {
                    skip_depth = 1;
                    continue;
                } else if path_is(&path, &PIC_XFRM) && name == b"off" {
                    if let Some((x, y)) = &offset_attrs {
                        out.push(Event::Start(with_attrs(&e, &[("x", x), ("y", y)])?));
                        path.push(name);
                        continue;
                    }
                }

                path.push(name);
                out.push(Event::Start(e));
            }
            Event::Empty(e) => {
                let name = e.local_name().as_ref().to_vec();

                if path_is(&path, &PIC_SPPR) {
                    if name == b"ln" {
                        line_written = true;
                        let start = with_attrs(&e, &[("w", &width)])?;
                        match edit.line_color {
                            Some(color) => {
                                let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                                out.push(Event::Start(start));
                                out.extend(solid_fill(&prefix_of(&e), color));
                                out.push(Event::End(BytesEnd::new(qname)));
                            }
                            None => out.push(Event::Empty(start)),
                        }
                        continue;
                    }
                    if !line_written && LINE_SUCCESSORS.contains(&name.as_slice()) {
                        out.extend(new_line(&dml_prefix, &width, edit.line_color));
                        line_written = true;
                    }
                } else if path_is(&path, &PIC_LINE)
                    && edit.line_color.is_some()
                    && LINE_FILLS.contains(&name.as_slice())
                {
                    continue;
                } else if path_is(&path, &PIC_XFRM) && name == b"off" {
                    if let Some((x, y)) = &offset_attrs {
                        out.push(Event::Empty(with_attrs(&e, &[("x", x), ("y", y)])?));
                        continue;
                    }
                } else if path_is(&path, &PIC) && name == b"spPr" {
                    // <p:spPr/> has nowhere to hold a line yet
                    let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    out.push(Event::Start(e));
                    out.extend(new_line(&dml_prefix, &width, edit.line_color));
                    out.push(Event::End(BytesEnd::new(qname)));
                    line_written = true;
                    continue;
                }

                out.push(Event::Empty(e));
            }
            Event::End(e) => {
                if path_is(&path, &PIC_SPPR) && !line_written {
                    out.extend(new_line(&dml_prefix, &width, edit.line_color));
                    line_written = true;
                }
                path.pop();
                out.push(Event::End(e));
            }
            other => out.push(other),
        }
    }

    Ok((out, offset.is_some()))
}

/// The first shape-property children carry the DrawingML prefix we reuse
/// for any element we create.
fn carries_dml_prefix(name: &[u8]) -> bool {
    matches!(name, b"xfrm" | b"prstGeom" | b"custGeom")
}

fn prefix_of(e: &BytesStart) -> String {
    let qname = e.name();
    match qname.prefix() {
        Some(prefix) => format!("{}:", String::from_utf8_lossy(prefix.as_ref())),
        None => String::new(),
    }
}

fn new_line(prefix: &str, width: &str, color: Option<Rgb>) -> Vec<Event<'static>> {
    let name = format!("{prefix}ln");
    let mut start = BytesStart::new(name.clone());
    start.push_attribute(("w", width));

    match color {
        None => vec![Event::Empty(start)],
        Some(color) => {
            let mut events = vec![Event::Start(start)];
            events.extend(solid_fill(prefix, color));
            events.push(Event::End(BytesEnd::new(name)));
            events
        }
    }
}

fn solid_fill(prefix: &str, color: Rgb) -> Vec<Event<'static>> {
    let fill = format!("{prefix}solidFill");
    let mut clr = BytesStart::new(format!("{prefix}srgbClr"));
    clr.push_attribute(("val", color.hex().as_str()));

    vec![
        Event::Start(BytesStart::new(fill.clone())),
        Event::Empty(clr),
        Event::End(BytesEnd::new(fill)),
    ]
}

/// Copy a start tag, replacing or appending the given attributes.
fn with_attrs(e: &BytesStart, updates: &[(&str, &str)]) -> Result<BytesStart<'static>, PptxError> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in e.attributes() {
        let attr = attr?;
        if !updates.iter().any(|(key, _)| key.as_bytes() == attr.key.as_ref()) {
            out.push_attribute(attr);
        }
    }
    for (key, value) in updates {
        out.push_attribute((*key, *value));
    }

    Ok(out)
}

/// Unescaped value of an attribute, matched on its full (prefixed) name.
pub(super) fn attr_value(e: &BytesStart, key: &[u8]) -> Result<Option<String>, PptxError> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: SlideSize = SlideSize { cx: 10000, cy: 8000 };

    fn slide(pic_sppr: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:pic><p:nvPicPr><p:cNvPr id="2" name="Picture 1"><a:extLst><a:ext uri="{{X}}"/></a:extLst></p:cNvPr><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill>{pic_sppr}</p:pic><p:grpSp><p:nvGrpSpPr><p:cNvPr id="3" name="Group"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:pic><p:nvPicPr><p:cNvPr id="4" name="Nested"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId3"/></p:blipFill><p:spPr><a:xfrm><a:off x="1" y="1"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr></p:pic></p:grpSp></p:spTree></p:cSld></p:sld>"#
        )
    }

    const PLAIN_SPPR: &str = r#"<p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="4000" cy="2000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>"#;

    fn run(xml: &str, edit: PictureEdit) -> (String, SlideStats) {
        let (out, stats) = rewrite_slide(xml.as_bytes(), &edit, SIZE).unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    fn align(weight: f64) -> PictureEdit {
        PictureEdit { center: true, line_width_pt: weight, line_color: None }
    }

    fn border(weight: f64) -> PictureEdit {
        PictureEdit { center: false, line_width_pt: weight, line_color: Some(Rgb::BLACK) }
    }

    #[test]
    fn centers_top_level_picture_and_adds_line() {
        let (out, stats) = run(&slide(PLAIN_SPPR), align(1.0));

        assert_eq!(stats, SlideStats { pictures: 1, centered: 1 });
        assert!(out.contains(r#"<a:off x="3000" y="3000"/>"#), "{out}");
        assert!(out.contains(r#"</a:prstGeom><a:ln w="12700"/></p:spPr>"#), "{out}");
    }

    #[test]
    fn grouped_pictures_are_untouched() {
        let (out, _) = run(&slide(PLAIN_SPPR), align(2.0));
        assert!(out.contains(r#"<a:off x="1" y="1"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr></p:pic></p:grpSp>"#));
    }

    #[test]
    fn offset_truncates_toward_zero() {
        let sppr = r#"<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="11001" cy="1"/></a:xfrm></p:spPr>"#;
        let (out, _) = run(&slide(sppr), align(0.5));
        // (10000 - 11001) / 2 = -500.5, (8000 - 1) / 2 = 3999.5
        assert!(out.contains(r#"<a:off x="-500" y="3999"/>"#), "{out}");
        assert!(out.contains(r#"<a:ln w="6350"/>"#));
    }

    #[test]
    fn border_replaces_existing_fill_and_width() {
        let sppr = r#"<p:spPr><a:xfrm><a:off x="5" y="6"/><a:ext cx="4000" cy="2000"/></a:xfrm><a:ln w="6350"><a:noFill/><a:prstDash val="dash"/></a:ln></p:spPr>"#;
        let (out, stats) = run(&slide(sppr), border(1.5));

        assert_eq!(stats.centered, 0);
        assert!(out.contains(r#"<a:off x="5" y="6"/>"#));
        assert!(
            out.contains(r#"<a:ln w="19050"><a:solidFill><a:srgbClr val="000000"/></a:solidFill><a:prstDash val="dash"/></a:ln>"#),
            "{out}"
        );
        assert!(!out.contains("noFill"));
    }

    #[test]
    fn border_expands_empty_line_element() {
        let sppr = r#"<p:spPr><a:xfrm><a:off x="5" y="6"/><a:ext cx="4000" cy="2000"/></a:xfrm><a:ln w="3175"/></p:spPr>"#;
        let (out, _) = run(&slide(sppr), border(2.0));
        assert!(out.contains(r#"<a:ln w="25400"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln>"#), "{out}");
    }

    #[test]
    fn new_line_is_inserted_before_effects() {
        let sppr = r#"<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="4000" cy="2000"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:effectLst/></p:spPr>"#;
        let (out, _) = run(&slide(sppr), border(1.0));
        assert!(
            out.contains(r#"</a:prstGeom><a:ln w="12700"><a:solidFill><a:srgbClr val="000000"/></a:solidFill></a:ln><a:effectLst/></p:spPr>"#),
            "{out}"
        );
    }

    #[test]
    fn picture_without_transform_keeps_position() {
        let (out, stats) = run(&slide("<p:spPr/>"), align(1.0));
        assert_eq!(stats, SlideStats { pictures: 1, centered: 0 });
        assert!(out.contains(r#"<p:spPr><a:ln w="12700"/></p:spPr>"#), "{out}");
    }

    #[test]
    fn placeholder_pictures_are_untouched() {
        let xml = slide(PLAIN_SPPR).replacen(
            "<p:nvPr/></p:nvPicPr>",
            r#"<p:nvPr><p:ph type="pic" idx="1"/></p:nvPr></p:nvPicPr>"#,
            1,
        );
        let (out, stats) = run(&xml, border(3.0));

        assert_eq!(stats.pictures, 0);
        assert_eq!(out, xml);
    }

    #[test]
    fn slide_without_pictures_round_trips() {
        let xml = r#"<p:sld xmlns:p="p"><p:cSld><p:spTree><p:sp><p:txBody>a &amp; b</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#;
        let (out, stats) = run(xml, align(1.0));
        assert_eq!(stats.pictures, 0);
        assert_eq!(out, xml);
    }

    #[test]
    fn rgb_hex_is_uppercase() {
        assert_eq!(Rgb(255, 10, 0).hex(), "FF0A00");
    }
}
