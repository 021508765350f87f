/// Placeholder shapes declared by slide masters and layouts.
///
/// Layout placeholders are what a generated slide is built from: each one is
/// cloned onto the slide and later filled with a title, a bullet list or a
/// picture.
use crate::common::xml::resolve_entity;
use crate::ooxml::error::{OoxmlError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::borrow::Cow;
use std::fmt;

/// The `type` attribute of `<p:ph>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Title,
    Body,
    CenterTitle,
    Subtitle,
    Date,
    SlideNumber,
    Footer,
    Header,
    Object,
    Chart,
    Table,
    ClipArt,
    OrgChart,
    MediaClip,
    SlideImage,
    Picture,
    /// A type this crate has no name for, kept verbatim.
    Unknown(String),
}

/// What a generated slide puts into a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotRole {
    Title,
    Body,
    Picture,
}

impl fmt::Display for SlotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotRole::Title => "title",
            SlotRole::Body => "body",
            SlotRole::Picture => "picture",
        })
    }
}

impl PlaceholderKind {
    /// Parse the `type` attribute. An absent attribute means `obj`.
    pub fn from_attr(value: Option<&str>) -> Self {
        match value.unwrap_or("obj") {
            "title" => Self::Title,
            "body" => Self::Body,
            "ctrTitle" => Self::CenterTitle,
            "subTitle" => Self::Subtitle,
            "dt" => Self::Date,
            "sldNum" => Self::SlideNumber,
            "ftr" => Self::Footer,
            "hdr" => Self::Header,
            "obj" => Self::Object,
            "chart" => Self::Chart,
            "tbl" => Self::Table,
            "clipArt" => Self::ClipArt,
            "dgm" => Self::OrgChart,
            "media" => Self::MediaClip,
            "sldImg" => Self::SlideImage,
            "pic" => Self::Picture,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The attribute value written back into `<p:ph type="..">`.
    pub fn as_attr(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Body => "body",
            Self::CenterTitle => "ctrTitle",
            Self::Subtitle => "subTitle",
            Self::Date => "dt",
            Self::SlideNumber => "sldNum",
            Self::Footer => "ftr",
            Self::Header => "hdr",
            Self::Object => "obj",
            Self::Chart => "chart",
            Self::Table => "tbl",
            Self::ClipArt => "clipArt",
            Self::OrgChart => "dgm",
            Self::MediaClip => "media",
            Self::SlideImage => "sldImg",
            Self::Picture => "pic",
            Self::Unknown(raw) => raw,
        }
    }

    /// Upper-case name used in analysis reports.
    pub fn display_name(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            Self::Title => "TITLE",
            Self::Body => "BODY",
            Self::CenterTitle => "CENTER_TITLE",
            Self::Subtitle => "SUBTITLE",
            Self::Date => "DATE",
            Self::SlideNumber => "SLIDE_NUMBER",
            Self::Footer => "FOOTER",
            Self::Header => "HEADER",
            Self::Object => "OBJECT",
            Self::Chart => "CHART",
            Self::Table => "TABLE",
            Self::ClipArt => "CLIP_ART",
            Self::OrgChart => "ORG_CHART",
            Self::MediaClip => "MEDIA_CLIP",
            Self::SlideImage => "SLIDE_IMAGE",
            Self::Picture => "PICTURE",
            Self::Unknown(raw) => return Cow::Owned(format!("UNKNOWN_{}", raw)),
        })
    }

    /// Role a generated slide gives this placeholder, if any.
    ///
    /// Only the declared `title`, `body` and `pic` types count; content
    /// (`obj` or untyped) placeholders stay empty.
    pub fn role(&self) -> Option<SlotRole> {
        match self {
            Self::Title => Some(SlotRole::Title),
            Self::Body => Some(SlotRole::Body),
            Self::Picture => Some(SlotRole::Picture),
            _ => None,
        }
    }

    /// Kind of the master placeholder a layout placeholder inherits from.
    pub fn master_kind(&self) -> PlaceholderKind {
        match self {
            Self::CenterTitle | Self::Title => Self::Title,
            Self::Date | Self::Footer | Self::SlideNumber => self.clone(),
            _ => Self::Body,
        }
    }

    /// Date, footer and slide number placeholders are not copied onto new slides.
    pub fn is_cloned_to_slide(&self) -> bool {
        !matches!(self, Self::Date | Self::Footer | Self::SlideNumber)
    }

    /// Whether a freshly cloned shape carries an empty `<p:txBody>`.
    pub fn takes_text(&self) -> bool {
        matches!(
            self,
            Self::Title | Self::CenterTitle | Self::Subtitle | Self::Body | Self::Object
        )
    }

    /// Prefix of the shape name PowerPoint gives cloned placeholders.
    pub fn base_name(&self) -> &'static str {
        match self {
            Self::Title | Self::CenterTitle => "Title",
            Self::Subtitle => "Subtitle",
            Self::Body => "Text Placeholder",
            Self::Object => "Content Placeholder",
            Self::Chart => "Chart Placeholder",
            Self::Table => "Table Placeholder",
            Self::ClipArt => "ClipArt Placeholder",
            Self::OrgChart => "SmartArt Placeholder",
            Self::MediaClip => "Media Placeholder",
            Self::SlideImage => "Slide Image Placeholder",
            Self::Picture => "Picture Placeholder",
            Self::Date => "Date Placeholder",
            Self::SlideNumber => "Slide Number Placeholder",
            Self::Footer => "Footer Placeholder",
            Self::Header => "Header Placeholder",
            Self::Unknown(_) => "Placeholder",
        }
    }
}

impl fmt::Display for PlaceholderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Position and size in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Rect {
    pub const fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.x + self.cx
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y + self.cy
    }

    /// Same rect with negative extents clamped to zero.
    pub fn clamped(self) -> Self {
        Self {
            cx: self.cx.max(0),
            cy: self.cy.max(0),
            ..self
        }
    }
}

/// A placeholder as declared on a master or layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// `idx` attribute, 0 when absent.
    pub idx: u32,
    /// `cNvPr/@name`.
    pub name: String,
    /// Own `a:xfrm`, or the one inherited from the master.
    pub rect: Option<Rect>,
    /// Whether the declaring shape has a `p:txBody`.
    pub has_text_frame: bool,
    /// Prompt text of the declaring shape.
    pub text: String,
}

impl Placeholder {
    #[inline]
    pub fn role(&self) -> Option<SlotRole> {
        self.kind.role()
    }

    /// Fill a missing rect from the first master placeholder of the matching kind.
    pub fn inherit_from(&mut self, master: &[Placeholder]) {
        if self.rect.is_some() {
            return;
        }
        let base_kind = self.kind.master_kind();
        self.rect = master
            .iter()
            .find(|ph| ph.kind == base_kind)
            .and_then(|ph| ph.rect);
    }
}

#[derive(Default)]
struct ShapeScan {
    name: String,
    ph: Option<(PlaceholderKind, u32)>,
    rect: Option<Rect>,
    has_text_frame: bool,
    text: String,
    seen_cnvpr: bool,
}

impl ShapeScan {
    fn into_placeholder(self) -> Option<Placeholder> {
        let (kind, idx) = self.ph?;
        Some(Placeholder {
            kind,
            idx,
            name: self.name,
            rect: self.rect,
            has_text_frame: self.has_text_frame,
            text: self.text.trim_end().to_string(),
        })
    }
}

fn attr_str(e: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.local_name().as_ref() == key {
            let value = attr.unescape_value().map_err(|e| OoxmlError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn attr_i64(e: &BytesStart<'_>, key: &[u8]) -> Result<i64> {
    Ok(attr_str(e, key)?
        .and_then(|value| value.trim().parse::<i64>().ok())
        .unwrap_or(0))
}

/// Placeholders that are direct children of the shape tree of a master,
/// layout or slide, in document order.
///
/// Shapes inside group shapes are skipped.
pub fn parse_placeholders(xml: &[u8]) -> Result<Vec<Placeholder>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut placeholders = Vec::new();
    let mut group_depth = 0usize;
    let mut current: Option<ShapeScan> = None;
    let mut in_sp_pr = false;
    let mut in_xfrm = false;
    let mut in_text = false;
    let mut origin = (0i64, 0i64);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"grpSp" => group_depth += 1,
                b"sp" | b"pic" if group_depth == 0 && current.is_none() => {
                    current = Some(ShapeScan::default());
                },
                b"spPr" if current.is_some() => in_sp_pr = true,
                b"xfrm" if in_sp_pr => in_xfrm = true,
                b"txBody" => {
                    if let Some(shape) = current.as_mut() {
                        shape.has_text_frame = true;
                    }
                },
                b"t" if current.is_some() => in_text = true,
                b"cNvPr" | b"ph" | b"off" | b"ext" => {
                    if let Some(shape) = current.as_mut() {
                        scan_leaf(shape, &e, in_xfrm, &mut origin)?;
                    }
                },
                _ => {},
            },
            Ok(Event::Empty(e)) => {
                if let Some(shape) = current.as_mut() {
                    scan_leaf(shape, &e, in_xfrm, &mut origin)?;
                }
            },
            Ok(Event::Text(t)) if in_text => {
                if let Some(shape) = current.as_mut() {
                    shape.text.push_str(&String::from_utf8_lossy(t.as_ref()));
                }
            },
            Ok(Event::GeneralRef(r)) if in_text => {
                if let Some(shape) = current.as_mut() {
                    shape.text.extend(resolve_entity(&String::from_utf8_lossy(r.as_ref())));
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"grpSp" => group_depth = group_depth.saturating_sub(1),
                b"sp" | b"pic" if group_depth == 0 => {
                    if let Some(shape) = current.take() {
                        placeholders.extend(shape.into_placeholder());
                    }
                    in_sp_pr = false;
                    in_xfrm = false;
                },
                b"spPr" => in_sp_pr = false,
                b"xfrm" => in_xfrm = false,
                b"t" => in_text = false,
                b"p" => {
                    if let Some(shape) = current.as_mut() {
                        shape.text.push('\n');
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(placeholders)
}

fn scan_leaf(shape: &mut ShapeScan, e: &BytesStart<'_>, in_xfrm: bool, origin: &mut (i64, i64)) -> Result<()> {
    match e.local_name().as_ref() {
        b"cNvPr" if !shape.seen_cnvpr => {
            shape.seen_cnvpr = true;
            shape.name = attr_str(e, b"name")?.unwrap_or_default();
        },
        b"ph" => {
            let kind = PlaceholderKind::from_attr(attr_str(e, b"type")?.as_deref());
            let idx = attr_str(e, b"idx")?
                .and_then(|value| value.trim().parse::<u32>().ok())
                .unwrap_or(0);
            shape.ph = Some((kind, idx));
        },
        b"off" if in_xfrm => {
            *origin = (attr_i64(e, b"x")?, attr_i64(e, b"y")?);
        },
        b"ext" if in_xfrm => {
            shape.rect = Some(Rect::new(origin.0, origin.1, attr_i64(e, b"cx")?, attr_i64(e, b"cy")?));
        },
        _ => {},
    }
    Ok(())
}
