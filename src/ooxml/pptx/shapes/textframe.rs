/// Text bodies written into placeholder shapes.
use crate::common::xml::{escape_xml, resolve_entity};
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt::Write as _;

/// `a:bodyPr/@anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Top,
    Middle,
    Bottom,
}

impl Anchor {
    fn as_attr(self) -> &'static str {
        match self {
            Anchor::Top => "t",
            Anchor::Middle => "ctr",
            Anchor::Bottom => "b",
        }
    }
}

/// Autofit child of `a:bodyPr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoFit {
    /// Inherit from the layout.
    Inherit,
    /// `<a:spAutoFit/>`: the shape grows to fit its text.
    ShapeToFitText,
    /// `<a:noAutofit/>`.
    Off,
}

/// Attributes of `a:bodyPr`. `None` fields inherit from the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyProps {
    pub wrap_square: bool,
    pub left_inset: Option<i64>,
    pub right_inset: Option<i64>,
    pub anchor: Option<Anchor>,
    pub autofit: AutoFit,
}

impl Default for BodyProps {
    fn default() -> Self {
        Self {
            wrap_square: false,
            left_inset: None,
            right_inset: None,
            anchor: None,
            autofit: AutoFit::Inherit,
        }
    }
}

/// `a:pPr/@algn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_attr(self) -> &'static str {
        match self {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
        }
    }
}

/// One paragraph holding a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Run font size in points.
    pub size_pt: Option<f64>,
    pub level: Option<u8>,
    pub align: Option<Align>,
    /// Space after the paragraph in points.
    pub space_after_pt: Option<f64>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size_pt: None,
            level: None,
            align: None,
            space_after_pt: None,
        }
    }

    pub fn size(mut self, pt: f64) -> Self {
        self.size_pt = Some(pt);
        self
    }

    pub fn level(mut self, level: u8) -> Self {
        self.level = Some(level);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    pub fn space_after(mut self, pt: f64) -> Self {
        self.space_after_pt = Some(pt);
        self
    }

    fn write_xml(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<a:p>");

        if self.level.is_some() || self.align.is_some() || self.space_after_pt.is_some() {
            xml.push_str("<a:pPr");
            if let Some(level) = self.level {
                write!(xml, r#" lvl="{}""#, level)?;
            }
            if let Some(align) = self.align {
                write!(xml, r#" algn="{}""#, align.as_attr())?;
            }
            match self.space_after_pt {
                Some(pt) => write!(
                    xml,
                    r#"><a:spcAft><a:spcPts val="{}"/></a:spcAft></a:pPr>"#,
                    (pt * 100.0).round() as i64
                )?,
                None => xml.push_str("/>"),
            }
        }

        if !self.text.is_empty() {
            xml.push_str("<a:r>");
            match self.size_pt {
                Some(pt) => write!(xml, r#"<a:rPr lang="en-US" sz="{}" dirty="0"/>"#, (pt * 100.0).round() as i64)?,
                None => xml.push_str(r#"<a:rPr lang="en-US" dirty="0"/>"#),
            }
            write!(xml, "<a:t>{}</a:t></a:r>", escape_xml(&self.text))?;
        }

        xml.push_str("</a:p>");
        Ok(())
    }
}

/// Content of a `p:txBody`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBody {
    pub props: BodyProps,
    pub paragraphs: Vec<Paragraph>,
}

impl TextBody {
    pub fn new(props: BodyProps) -> Self {
        Self {
            props,
            paragraphs: Vec::new(),
        }
    }

    pub fn push(&mut self, paragraph: Paragraph) {
        self.paragraphs.push(paragraph);
    }

    /// Texts of all paragraphs, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.paragraphs.iter().map(|p| p.text.as_str()).collect()
    }

    /// Serialize as `<p:txBody>`. A body with no paragraphs still gets an empty `<a:p/>`.
    pub fn write_xml(&self, xml: &mut String) -> Result<()> {
        self.write_inner(xml).map_err(|e| OoxmlError::Xml(e.to_string()))
    }

    fn write_inner(&self, xml: &mut String) -> std::fmt::Result {
        xml.push_str("<p:txBody><a:bodyPr");
        let props = &self.props;
        if props.wrap_square {
            xml.push_str(r#" wrap="square""#);
        }
        if let Some(inset) = props.left_inset {
            write!(xml, r#" lIns="{}""#, inset)?;
        }
        if let Some(inset) = props.right_inset {
            write!(xml, r#" rIns="{}""#, inset)?;
        }
        if let Some(anchor) = props.anchor {
            write!(xml, r#" anchor="{}""#, anchor.as_attr())?;
        }
        match props.autofit {
            AutoFit::Inherit => xml.push_str("/>"),
            AutoFit::ShapeToFitText => xml.push_str("><a:spAutoFit/></a:bodyPr>"),
            AutoFit::Off => xml.push_str("><a:noAutofit/></a:bodyPr>"),
        }
        xml.push_str("<a:lstStyle/>");

        if self.paragraphs.is_empty() {
            xml.push_str("<a:p/>");
        }
        for paragraph in &self.paragraphs {
            paragraph.write_xml(xml)?;
        }

        xml.push_str("</p:txBody>");
        Ok(())
    }
}

/// Paragraph texts of every `p:txBody` in `xml`, one inner vector per body.
pub fn text_bodies(xml: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut bodies = Vec::new();
    let mut current: Option<Vec<String>> = None;
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"txBody" => current = Some(Vec::new()),
                b"p" => {
                    if let Some(body) = current.as_mut() {
                        body.push(String::new());
                    }
                },
                b"t" => in_text = true,
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"p" {
                    if let Some(body) = current.as_mut() {
                        body.push(String::new());
                    }
                }
            },
            Ok(Event::Text(t)) if in_text => {
                if let Some(last) = current.as_mut().and_then(|body| body.last_mut()) {
                    let text = std::str::from_utf8(t.as_ref()).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    last.push_str(text);
                }
            },
            Ok(Event::GeneralRef(r)) if in_text => {
                if let Some(last) = current.as_mut().and_then(|body| body.last_mut()) {
                    let name = std::str::from_utf8(r.as_ref()).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    last.extend(resolve_entity(name));
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"txBody" => bodies.extend(current.take()),
                b"t" => in_text = false,
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(bodies)
}
