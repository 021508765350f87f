//! Shapes written onto generated slides.

use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::shapes::{Crop, Placeholder, PlaceholderKind, Rect, TextBody};
use std::collections::HashMap;
use std::fmt::Write as _;

/// An image part shown in a placeholder frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PictureFill {
    pub image: PackURI,
    pub crop: Crop,
    pub descr: String,
}

/// A placeholder cloned from the slide layout.
#[derive(Debug, Clone)]
pub struct PlaceholderShape {
    pub id: u32,
    pub name: String,
    /// The layout placeholder this shape was cloned from.
    pub source: Placeholder,
    /// Explicit geometry overriding the inherited one.
    pub xfrm: Option<Rect>,
    pub text: Option<TextBody>,
    pub picture: Option<PictureFill>,
}

impl PlaceholderShape {
    pub fn from_layout(id: u32, source: &Placeholder) -> Self {
        Self {
            id,
            name: format!("{} {}", source.kind.base_name(), id.saturating_sub(1)),
            source: source.clone(),
            xfrm: None,
            text: None,
            picture: None,
        }
    }

    #[inline]
    pub fn kind(&self) -> &PlaceholderKind {
        &self.source.kind
    }

    /// Effective geometry: the explicit one, else what the layout or master declares.
    pub fn rect(&self) -> Option<Rect> {
        self.xfrm.or(self.source.rect)
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.xfrm = Some(rect.clamped());
    }

    pub fn set_text(&mut self, body: TextBody) {
        self.text = Some(body);
    }

    /// Turn the placeholder into a picture placeholder showing `fill`.
    pub fn insert_picture(&mut self, fill: PictureFill) {
        self.picture = Some(fill);
    }

    fn write_ph(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<p:ph");
        if *self.kind() != PlaceholderKind::Object {
            write!(xml, r#" type="{}""#, escape_xml(self.kind().as_attr()))?;
        }
        if self.source.idx != 0 {
            write!(xml, r#" idx="{}""#, self.source.idx)?;
        }
        xml.push_str("/>");
        Ok(())
    }

    pub(crate) fn write_xml(&self, xml: &mut String, image_rids: &HashMap<PackURI, String>) -> Result<()> {
        let written = match &self.picture {
            Some(fill) => {
                let r_id = image_rids
                    .get(&fill.image)
                    .ok_or_else(|| OoxmlError::PartNotFound(fill.image.to_string()))?;
                self.write_picture(xml, fill, r_id)
            },
            None => self.write_shape(xml),
        };
        written.map_err(|e| OoxmlError::Xml(e.to_string()))?;

        if self.picture.is_none() {
            match &self.text {
                Some(body) => body.write_xml(xml)?,
                None if self.kind().takes_text() || self.source.has_text_frame => {
                    xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody>");
                },
                None => {},
            }
            xml.push_str("</p:sp>");
        }
        Ok(())
    }

    fn write_shape(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<p:sp><p:nvSpPr>");
        write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, self.id, escape_xml(&self.name))?;
        xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr>"#);
        self.write_ph(xml)?;
        xml.push_str("</p:nvPr></p:nvSpPr>");
        write_sp_pr(xml, self.xfrm, false)
    }

    fn write_picture(&self, xml: &mut String, fill: &PictureFill, r_id: &str) -> std::fmt::Result {
        xml.push_str("<p:pic><p:nvPicPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="{}" descr="{}"/>"#,
            self.id,
            escape_xml(&self.name),
            escape_xml(&fill.descr)
        )?;
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noGrp="1" noChangeAspect="1"/></p:cNvPicPr><p:nvPr>"#);
        self.write_ph(xml)?;
        xml.push_str("</p:nvPr></p:nvPicPr>");
        write_blip_fill(xml, r_id, &fill.crop)?;
        write_sp_pr(xml, self.xfrm, false)?;
        xml.push_str("</p:pic>");
        Ok(())
    }
}

/// A picture placed at a fixed position, outside any placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct FreePicture {
    pub id: u32,
    pub image: PackURI,
    pub rect: Rect,
    pub descr: String,
}

impl FreePicture {
    pub(crate) fn write_xml(&self, xml: &mut String, image_rids: &HashMap<PackURI, String>) -> Result<()> {
        let r_id = image_rids
            .get(&self.image)
            .ok_or_else(|| OoxmlError::PartNotFound(self.image.to_string()))?;
        self.write_inner(xml, r_id).map_err(|e| OoxmlError::Xml(e.to_string()))
    }

    fn write_inner(&self, xml: &mut String, r_id: &str) -> std::fmt::Result {
        xml.push_str("<p:pic><p:nvPicPr>");
        write!(
            xml,
            r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
            self.id,
            self.id.saturating_sub(1),
            escape_xml(&self.descr)
        )?;
        xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
        write_blip_fill(xml, r_id, &Crop::default())?;
        write_sp_pr(xml, Some(self.rect.clamped()), true)?;
        xml.push_str("</p:pic>");
        Ok(())
    }
}

/// Any shape a generated slide holds.
#[derive(Debug, Clone)]
pub enum SlideShape {
    Placeholder(PlaceholderShape),
    Picture(FreePicture),
}

impl SlideShape {
    pub fn id(&self) -> u32 {
        match self {
            SlideShape::Placeholder(shape) => shape.id,
            SlideShape::Picture(picture) => picture.id,
        }
    }

    /// Image part this shape embeds, if any.
    pub fn image(&self) -> Option<&PackURI> {
        match self {
            SlideShape::Placeholder(shape) => shape.picture.as_ref().map(|fill| &fill.image),
            SlideShape::Picture(picture) => Some(&picture.image),
        }
    }

    pub(crate) fn write_xml(&self, xml: &mut String, image_rids: &HashMap<PackURI, String>) -> Result<()> {
        match self {
            SlideShape::Placeholder(shape) => shape.write_xml(xml, image_rids),
            SlideShape::Picture(picture) => picture.write_xml(xml, image_rids),
        }
    }
}

fn write_blip_fill(xml: &mut String, r_id: &str, crop: &Crop) -> std::fmt::Result {
    write!(xml, r#"<p:blipFill><a:blip r:embed="{}"/>"#, r_id)?;
    crop.write_src_rect(xml)?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch></p:blipFill>");
    Ok(())
}

fn write_sp_pr(xml: &mut String, xfrm: Option<Rect>, rect_geometry: bool) -> std::fmt::Result {
    if xfrm.is_none() && !rect_geometry {
        xml.push_str("<p:spPr/>");
        return Ok(());
    }
    xml.push_str("<p:spPr>");
    if let Some(rect) = xfrm {
        write!(
            xml,
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            rect.x, rect.y, rect.cx, rect.cy
        )?;
    }
    if rect_geometry {
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    }
    xml.push_str("</p:spPr>");
    Ok(())
}
