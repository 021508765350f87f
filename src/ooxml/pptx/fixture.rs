//! In-memory .pptx templates for tests.

use crate::ooxml::pptx::shapes::Rect;
use std::fmt::Write as _;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

pub const SLIDE_SIZE: (i64, i64) = (12_192_000, 6_858_000);
pub const MASTER_TITLE_RECT: Rect = Rect::new(838_200, 365_125, 10_515_600, 1_325_563);
pub const MASTER_BODY_RECT: Rect = Rect::new(838_200, 1_825_625, 10_515_600, 4_351_338);
pub const LAYOUT_TITLE_RECT: Rect = Rect::new(457_200, 274_638, 8_229_600, 1_143_000);
pub const LAYOUT_PICTURE_RECT: Rect = Rect::new(5_183_188, 987_425, 6_172_200, 4_873_625);

pub const THEME_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office Theme"><a:themeElements><a:clrScheme name="Office"/><a:fontScheme name="Office"/><a:fmtScheme name="Office"/></a:themeElements></a:theme>"#;

const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);
const SP_TREE_START: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const CT_BASE: &str = "application/vnd.openxmlformats-officedocument.presentationml";

/// A placeholder on a fixture layout. An empty `kind` omits the `type` attribute.
#[derive(Debug, Clone)]
pub struct FixturePlaceholder {
    pub kind: &'static str,
    pub idx: u32,
    pub rect: Option<Rect>,
    pub text: bool,
}

pub fn ph(kind: &'static str, idx: u32, rect: Option<Rect>) -> FixturePlaceholder {
    FixturePlaceholder {
        kind,
        idx,
        rect,
        text: kind != "pic",
    }
}

#[derive(Debug, Clone)]
pub struct FixtureLayout {
    pub name: &'static str,
    pub placeholders: Vec<FixturePlaceholder>,
}

#[derive(Debug, Clone)]
pub struct TemplateSpec {
    pub layouts: Vec<FixtureLayout>,
    pub existing_slide: bool,
    pub potx: bool,
}

/// Title Only, Title and Content, Picture with Caption.
pub fn standard_layouts() -> Vec<FixtureLayout> {
    vec![
        FixtureLayout {
            name: "Title Only",
            placeholders: vec![ph("title", 0, None), ph("dt", 10, None), ph("sldNum", 12, None)],
        },
        FixtureLayout {
            name: "Title and Content",
            placeholders: vec![ph("title", 0, Some(LAYOUT_TITLE_RECT)), ph("", 1, None)],
        },
        FixtureLayout {
            name: "Picture with Caption",
            placeholders: vec![
                ph("title", 0, Some(Rect::new(839_788, 457_200, 3_932_237, 1_600_200))),
                ph("pic", 1, Some(LAYOUT_PICTURE_RECT)),
                ph("body", 2, Some(Rect::new(839_788, 2_057_400, 3_932_237, 3_811_588))),
            ],
        },
    ]
}

pub fn template_bytes() -> Vec<u8> {
    build_template(&TemplateSpec {
        layouts: standard_layouts(),
        existing_slide: true,
        potx: false,
    })
}

pub fn template_bytes_as_potx() -> Vec<u8> {
    build_template(&TemplateSpec {
        layouts: standard_layouts(),
        existing_slide: true,
        potx: true,
    })
}

/// Write a template into `dir` and return its path.
pub fn write_template(dir: &Path, name: &str, spec: &TemplateSpec) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, build_template(spec)).unwrap();
    path
}

/// A solid PNG of the given pixel size.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

pub fn word_document_bytes() -> Vec<u8> {
    zip_members(&[
        (
            "[Content_Types].xml",
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#
                .as_bytes()
                .to_vec(),
        ),
        (
            "_rels/.rels",
            rels(&[("rId1", "officeDocument", "word/document.xml")]).into_bytes(),
        ),
        ("word/document.xml", b"<w:document/>".to_vec()),
    ])
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="{}">"#, REL_NS);
    for (r_id, kind, target) in entries {
        write!(xml, r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#, r_id, REL_BASE, kind, target).unwrap();
    }
    xml.push_str("</Relationships>");
    xml
}

fn placeholder_sp(id: u32, placeholder: &FixturePlaceholder) -> String {
    let mut xml = String::new();
    write!(xml, r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {}"/><p:cNvSpPr/><p:nvPr><p:ph"#, id, id).unwrap();
    if !placeholder.kind.is_empty() {
        write!(xml, r#" type="{}""#, placeholder.kind).unwrap();
    }
    if placeholder.idx != 0 {
        write!(xml, r#" idx="{}""#, placeholder.idx).unwrap();
    }
    xml.push_str("/></p:nvPr></p:nvSpPr>");
    match placeholder.rect {
        Some(r) => write!(
            xml,
            r#"<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr>"#,
            r.x, r.y, r.cx, r.cy
        )
        .unwrap(),
        None => xml.push_str("<p:spPr/>"),
    }
    if placeholder.text {
        xml.push_str("<p:txBody><a:bodyPr/><a:lstStyle/><a:p><a:r><a:t>Click to add text</a:t></a:r></a:p></p:txBody>");
    }
    xml.push_str("</p:sp>");
    xml
}

fn master_xml(layout_count: usize) -> String {
    let mut xml = format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldMaster {}><p:cSld>{}"#, NS, SP_TREE_START);
    let master_phs = [
        ph("title", 0, Some(MASTER_TITLE_RECT)),
        ph("body", 1, Some(MASTER_BODY_RECT)),
        ph("dt", 2, Some(Rect::new(838_200, 6_356_350, 2_743_200, 365_125))),
        ph("sldNum", 4, Some(Rect::new(8_610_600, 6_356_350, 2_743_200, 365_125))),
    ];
    for (i, placeholder) in master_phs.iter().enumerate() {
        xml.push_str(&placeholder_sp(i as u32 + 2, placeholder));
    }
    xml.push_str(r#"</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);
    if layout_count > 0 {
        xml.push_str("<p:sldLayoutIdLst>");
        for i in 0..layout_count {
            write!(xml, r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#, 2_147_483_649u32 + i as u32, layout_rid(i, layout_count)).unwrap();
        }
        xml.push_str("</p:sldLayoutIdLst>");
    }
    xml.push_str("</p:sldMaster>");
    xml
}

/// Layout relationships are numbered in reverse so list order and rId order differ.
fn layout_rid(index: usize, count: usize) -> usize {
    count - index
}

fn layout_xml(layout: &FixtureLayout) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sldLayout {} preserve="1"><p:cSld name="{}">{}"#,
        NS, layout.name, SP_TREE_START
    );
    for (i, placeholder) in layout.placeholders.iter().enumerate() {
        xml.push_str(&placeholder_sp(i as u32 + 2, placeholder));
    }
    xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>");
    xml
}

fn presentation_xml(existing_slide: bool) -> String {
    let mut xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:presentation {} saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        NS
    );
    if existing_slide {
        xml.push_str(r#"<p:sldIdLst><p:sldId id="256" r:id="rId2"/></p:sldIdLst>"#);
    }
    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/><p:defaultTextStyle><a:defPPr><a:defRPr lang="en-US"/></a:defPPr></p:defaultTextStyle></p:presentation>"#,
        SLIDE_SIZE.0, SLIDE_SIZE.1
    )
    .unwrap();
    xml
}

const EXISTING_SLIDE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/><p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:p><a:r><a:t>Old slide</a:t></a:r></a:p></p:txBody></p:sp><p:pic><p:nvPicPr><p:cNvPr id="3" name="Picture 2"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/></p:blipFill><p:spPr/></p:pic></p:spTree></p:cSld></p:sld>"#;

/// Build a template package.
pub fn build_template(spec: &TemplateSpec) -> Vec<u8> {
    let count = spec.layouts.len();
    let main_type = if spec.potx { "template.main+xml" } else { "presentation.main+xml" };

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>"#,
    );
    let mut override_part = |name: &str, content_type: String| {
        write!(content_types, r#"<Override PartName="{}" ContentType="{}"/>"#, name, content_type).unwrap();
    };
    override_part("/ppt/presentation.xml", format!("{}.{}", CT_BASE, main_type));
    override_part("/ppt/slideMasters/slideMaster1.xml", format!("{}.slideMaster+xml", CT_BASE));
    override_part("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml".to_string());
    for i in 0..count {
        override_part(&format!("/ppt/slideLayouts/slideLayout{}.xml", i + 1), format!("{}.slideLayout+xml", CT_BASE));
    }
    if spec.existing_slide {
        override_part("/ppt/slides/slide1.xml", format!("{}.slide+xml", CT_BASE));
        override_part("/ppt/notesSlides/notesSlide1.xml", format!("{}.notesSlide+xml", CT_BASE));
    }
    content_types.push_str("</Types>");

    let mut members: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types.into_bytes()),
        ("_rels/.rels".into(), rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]).into_bytes()),
        ("ppt/presentation.xml".into(), presentation_xml(spec.existing_slide).into_bytes()),
        ("ppt/theme/theme1.xml".into(), THEME_XML.as_bytes().to_vec()),
        ("ppt/slideMasters/slideMaster1.xml".into(), master_xml(count).into_bytes()),
    ];

    let mut pres_rels = vec![("rId1", "slideMaster", "slideMasters/slideMaster1.xml")];
    if spec.existing_slide {
        pres_rels.push(("rId2", "slide", "slides/slide1.xml"));
    }
    pres_rels.push(("rId3", "theme", "theme/theme1.xml"));
    members.push(("ppt/_rels/presentation.xml.rels".into(), rels(&pres_rels).into_bytes()));

    let master_rels: Vec<(String, String)> = (0..count)
        .map(|i| (format!("rId{}", layout_rid(i, count)), format!("../slideLayouts/slideLayout{}.xml", i + 1)))
        .collect();
    let mut master_entries: Vec<(&str, &str, &str)> =
        master_rels.iter().map(|(r, t)| (r.as_str(), "slideLayout", t.as_str())).collect();
    let theme_rid = format!("rId{}", count + 1);
    master_entries.push((theme_rid.as_str(), "theme", "../theme/theme1.xml"));
    members.push(("ppt/slideMasters/_rels/slideMaster1.xml.rels".into(), rels(&master_entries).into_bytes()));

    for (i, layout) in spec.layouts.iter().enumerate() {
        members.push((format!("ppt/slideLayouts/slideLayout{}.xml", i + 1), layout_xml(layout).into_bytes()));
        members.push((
            format!("ppt/slideLayouts/_rels/slideLayout{}.xml.rels", i + 1),
            rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]).into_bytes(),
        ));
    }

    if spec.existing_slide {
        members.push(("ppt/slides/slide1.xml".into(), EXISTING_SLIDE_XML.as_bytes().to_vec()));
        let mut slide_rels = vec![
            ("rId2", "image", "../media/image1.png"),
            ("rId3", "notesSlide", "../notesSlides/notesSlide1.xml"),
        ];
        if count > 0 {
            slide_rels.insert(0, ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"));
        }
        members.push(("ppt/slides/_rels/slide1.xml.rels".into(), rels(&slide_rels).into_bytes()));
        members.push(("ppt/media/image1.png".into(), png_bytes(2, 2)));
        members.push((
            "ppt/notesSlides/notesSlide1.xml".into(),
            format!(r#"<p:notes {}><p:cSld>{}</p:spTree></p:cSld></p:notes>"#, NS, SP_TREE_START).into_bytes(),
        ));
        members.push((
            "ppt/notesSlides/_rels/notesSlide1.xml.rels".into(),
            rels(&[("rId1", "slide", "../slides/slide1.xml")]).into_bytes(),
        ));
    }

    zip_members(&members)
}

fn zip_members<S: AsRef<str>>(members: &[(S, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    for (name, blob) in members {
        writer.start_file(name.as_ref(), options).unwrap();
        writer.write_all(blob).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
