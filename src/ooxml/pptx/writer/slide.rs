//! Slide and notes slide XML generation.

use crate::ooxml::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::layout::LayoutInfo;
use crate::ooxml::pptx::shapes::{AutoFit, BodyProps, Paragraph, Rect, SlotRole, TextBody};
use crate::ooxml::pptx::writer::shape::{FreePicture, PlaceholderShape, SlideShape};
use std::collections::HashMap;
use std::fmt::Write as _;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const NAMESPACES: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);
const GROUP_SHAPE_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// Font size of speaker notes, in points.
pub const NOTES_FONT_PT: f64 = 8.0;

/// A slide under construction.
///
/// Built from a layout, filled by the caller, then committed with
/// [`Package::add_slide`](crate::ooxml::pptx::Package::add_slide).
#[derive(Debug, Clone)]
pub struct SlideBuilder {
    layout: PackURI,
    shapes: Vec<SlideShape>,
    notes: Option<String>,
}

impl SlideBuilder {
    /// Clone every layout placeholder except date, footer and slide number.
    ///
    /// Shape ids start at 2; id 1 is the shape tree itself.
    pub fn from_layout(layout: &LayoutInfo) -> Self {
        let shapes = layout
            .placeholders
            .iter()
            .filter(|ph| ph.kind.is_cloned_to_slide())
            .enumerate()
            .map(|(i, ph)| SlideShape::Placeholder(PlaceholderShape::from_layout(i as u32 + 2, ph)))
            .collect();

        Self {
            layout: layout.partname.clone(),
            shapes,
            notes: None,
        }
    }

    #[inline]
    pub fn layout(&self) -> &PackURI {
        &self.layout
    }

    pub fn shapes(&self) -> &[SlideShape] {
        &self.shapes
    }

    fn placeholders(&self) -> impl Iterator<Item = &PlaceholderShape> {
        self.shapes.iter().filter_map(|shape| match shape {
            SlideShape::Placeholder(ph) => Some(ph),
            SlideShape::Picture(_) => None,
        })
    }

    /// First placeholder filling `role`, in layout order.
    pub fn placeholder(&self, role: SlotRole) -> Option<&PlaceholderShape> {
        self.placeholders().find(|ph| ph.source.role() == Some(role))
    }

    pub fn placeholder_mut(&mut self, role: SlotRole) -> Option<&mut PlaceholderShape> {
        self.shapes.iter_mut().find_map(|shape| match shape {
            SlideShape::Placeholder(ph) if ph.source.role() == Some(role) => Some(ph),
            _ => None,
        })
    }

    /// Add a picture outside any placeholder; returns its shape id.
    pub fn add_picture(&mut self, image: PackURI, rect: Rect, descr: &str) -> u32 {
        let id = self.next_shape_id();
        self.shapes.push(SlideShape::Picture(FreePicture {
            id,
            image,
            rect,
            descr: descr.to_string(),
        }));
        id
    }

    fn next_shape_id(&self) -> u32 {
        self.shapes.iter().map(SlideShape::id).max().unwrap_or(1) + 1
    }

    pub fn set_notes(&mut self, notes: Option<String>) {
        self.notes = notes.filter(|text| !text.trim().is_empty());
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Distinct image parts the slide embeds, in shape order.
    pub fn image_partnames(&self) -> Vec<&PackURI> {
        let mut images: Vec<&PackURI> = Vec::new();
        for image in self.shapes.iter().filter_map(SlideShape::image) {
            if !images.contains(&image) {
                images.push(image);
            }
        }
        images
    }

    /// Generate `slideN.xml`. `image_rids` maps every embedded image to its rId.
    pub fn to_xml(&self, image_rids: &HashMap<PackURI, String>) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.shapes.len() * 512);
        xml.push_str(XML_DECLARATION);
        xml.push_str("<p:sld ");
        xml.push_str(NAMESPACES);
        xml.push('>');
        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(GROUP_SHAPE_PROPS);

        for shape in &self.shapes {
            shape.write_xml(&mut xml, image_rids)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");
        Ok(xml)
    }
}

/// Speaker notes body: one paragraph per line, 8pt, growing to fit.
pub fn notes_text_body(notes: &str) -> TextBody {
    let mut body = TextBody::new(BodyProps {
        wrap_square: true,
        autofit: AutoFit::ShapeToFitText,
        ..BodyProps::default()
    });
    for line in notes.split('\n') {
        body.push(Paragraph::new(line.trim_end_matches('\r')).size(NOTES_FONT_PT));
    }
    body
}

/// `idx` of the slide image and body placeholders on the generated notes master.
const NOTES_IMAGE_IDX: u32 = 2;
const NOTES_BODY_IDX: u32 = 3;

/// Generate `notesSlideN.xml` holding a slide image and the notes body.
pub fn generate_notes_xml(notes: &str) -> Result<String> {
    let mut xml = String::with_capacity(1536 + notes.len());
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:notes ");
    xml.push_str(NAMESPACES);
    xml.push('>');
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(GROUP_SHAPE_PROPS);

    write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="sldImg" idx="{}"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#
        ),
        NOTES_IMAGE_IDX
    )?;

    write!(
        xml,
        concat!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/>"#,
            r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
            r#"<p:nvPr><p:ph type="body" idx="{}"/></p:nvPr></p:nvSpPr><p:spPr/>"#
        ),
        NOTES_BODY_IDX
    )?;
    notes_text_body(notes).write_xml(&mut xml)?;
    xml.push_str("</p:sp>");

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:notes>");
    Ok(xml)
}

/// A minimal notes master for decks that ship without one.
pub fn generate_notes_master_xml() -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    xml.push_str("<p:notesMaster ");
    xml.push_str(NAMESPACES);
    xml.push('>');
    xml.push_str(r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>"#);
    xml.push_str(GROUP_SHAPE_PROPS);

    let placeholders: [(u32, &str, &str, u32, [i64; 4]); 2] = [
        (2, "Slide Image Placeholder 1", "sldImg", NOTES_IMAGE_IDX, [1_143_000, 685_800, 4_572_000, 3_429_000]),
        (3, "Notes Placeholder 2", r#"body" sz="quarter"#, NOTES_BODY_IDX, [685_800, 4_343_400, 5_486_400, 4_114_800]),
    ];
    for (id, name, kind, idx, [x, y, cx, cy]) in placeholders {
        let shape = format!(
            concat!(
                r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="{}"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#,
                r#"<p:nvPr><p:ph type="{}" idx="{}"/></p:nvPr></p:nvSpPr>"#,
                r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
                r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:sp>"#
            ),
            id, name, kind, idx, x, y, cx, cy
        );
        xml.push_str(&shape);
    }

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str(concat!(
        r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
        r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#
    ));
    xml.push_str("<p:notesStyle>");
    for level in 1..=9 {
        let indent = (level - 1) * 457_200;
        let style = format!(
            concat!(
                r#"<a:lvl{0}pPr marL="{1}" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1">"#,
                r#"<a:defRPr sz="1200" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill>"#,
                r#"<a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl{0}pPr>"#
            ),
            level, indent
        );
        xml.push_str(&style);
    }
    xml.push_str("</p:notesStyle>");
    xml.push_str("</p:notesMaster>");
    xml
}
