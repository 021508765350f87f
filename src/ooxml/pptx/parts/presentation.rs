/// Presentation part - the main part in a .pptx package.
///
/// Corresponds to `/ppt/presentation.xml` in the package.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::part::Part;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

/// Slide size used when `p:sldSz` is missing (10in x 7.5in).
pub const DEFAULT_SLIDE_SIZE: (i64, i64) = (9_144_000, 6_858_000);

/// Smallest id PowerPoint accepts for `p:sldId`.
pub const MIN_SLIDE_ID: u32 = 256;

/// One `<p:sldId id=".." r:id=".."/>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideIdEntry {
    pub id: u32,
    pub r_id: String,
}

/// Read access to `/ppt/presentation.xml`.
pub struct PresentationPart<'a> {
    part: &'a dyn Part,
}

impl<'a> PresentationPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    #[inline]
    fn xml_bytes(&self) -> &[u8] {
        self.part.blob()
    }

    /// Slide width and height in EMU.
    pub fn slide_size(&self) -> Result<(i64, i64)> {
        let mut reader = Reader::from_reader(self.xml_bytes());
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == b"sldSz" => {
                    let (mut cx, mut cy) = DEFAULT_SLIDE_SIZE;
                    for attr in e.attributes().flatten() {
                        let value = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                        match attr.key.as_ref() {
                            b"cx" => {
                                cx = value
                                    .parse()
                                    .map_err(|e| OoxmlError::Xml(format!("Invalid slide width: {}", e)))?
                            },
                            b"cy" => {
                                cy = value
                                    .parse()
                                    .map_err(|e| OoxmlError::Xml(format!("Invalid slide height: {}", e)))?
                            },
                            _ => {},
                        }
                    }
                    return Ok((cx, cy));
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e.to_string())),
                _ => {},
            }
        }

        Ok(DEFAULT_SLIDE_SIZE)
    }

    /// Slide entries of `p:sldIdLst` in presentation order.
    pub fn slide_ids(&self) -> Result<Vec<SlideIdEntry>> {
        let mut entries = Vec::new();
        for_each_list_entry(self.xml_bytes(), b"sldId", |id, r_id| {
            if let (Some(id), Some(r_id)) = (id, r_id) {
                entries.push(SlideIdEntry { id, r_id });
            }
        })?;
        Ok(entries)
    }

    /// rIds of `p:sldMasterIdLst` in order.
    pub fn slide_master_rids(&self) -> Result<Vec<String>> {
        let mut rids = Vec::new();
        for_each_list_entry(self.xml_bytes(), b"sldMasterId", |_, r_id| rids.extend(r_id))?;
        Ok(rids)
    }

    /// rId of the notes master, if the presentation declares one.
    pub fn notes_master_rid(&self) -> Result<Option<String>> {
        let mut rids = Vec::new();
        for_each_list_entry(self.xml_bytes(), b"notesMasterId", |_, r_id| rids.extend(r_id))?;
        Ok(rids.into_iter().next())
    }
}

/// Visit every `<p:{element} id=".." r:id=".."/>`.
pub(crate) fn for_each_list_entry(
    xml: &[u8],
    element: &[u8],
    mut visit: impl FnMut(Option<u32>, Option<String>),
) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.local_name().as_ref() == element => {
                let mut id = None;
                let mut r_id = None;
                for attr in e.attributes().flatten() {
                    let value = std::str::from_utf8(&attr.value).map_err(|e| OoxmlError::Xml(e.to_string()))?;
                    if attr.key.local_name().as_ref() != b"id" {
                        continue;
                    }
                    if attr.key.as_ref().contains(&b':') {
                        r_id = Some(value.to_string());
                    } else {
                        id = value.trim().parse::<u32>().ok();
                    }
                }
                visit(id, r_id);
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(())
}

/// Root children that must precede `p:sldIdLst`.
const BEFORE_SLIDE_LIST: [&[u8]; 3] = [b"sldMasterIdLst", b"notesMasterIdLst", b"handoutMasterIdLst"];

/// Rewrite `presentation.xml` with a new slide list.
///
/// Every existing `p:sldIdLst` is dropped and `slides` written in its place,
/// after the master id lists. With `notes_master_rid` set, a
/// `p:notesMasterIdLst` is inserted right after `p:sldMasterIdLst` unless the
/// document already has one. Everything else passes through unchanged.
pub fn rewrite_id_lists(xml: &[u8], slides: &[SlideIdEntry], notes_master_rid: Option<&str>) -> Result<Vec<u8>> {
    let mut reader = Reader::from_reader(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len() + slides.len() * 48));

    let mut prefixes = Prefixes::default();
    let mut depth = 0usize;
    let mut skip_depth: Option<usize> = None;
    let mut slides_written = false;
    let mut notes_master_done = notes_master_rid.is_none();

    loop {
        let event = reader.read_event().map_err(|e| OoxmlError::Xml(e.to_string()))?;

        if let Some(level) = skip_depth {
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == level {
                        skip_depth = None;
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            continue;
        }

        match &event {
            Event::Start(e) | Event::Empty(e) if depth == 0 => {
                prefixes = Prefixes::from_root(e);
            },
            Event::Start(e) | Event::Empty(e) if depth == 1 => {
                let local = e.local_name();
                let local = local.as_ref();

                if local == b"sldIdLst" {
                    if matches!(event, Event::Start(_)) {
                        skip_depth = Some(depth);
                        depth += 1;
                    }
                    continue;
                }
                if local == b"notesMasterIdLst" {
                    notes_master_done = true;
                }
                if !notes_master_done && local != b"sldMasterIdLst" {
                    if let Some(r_id) = notes_master_rid {
                        write_notes_master_list(&mut writer, &prefixes, r_id)?;
                    }
                    notes_master_done = true;
                }
                if !slides_written && !BEFORE_SLIDE_LIST.contains(&local) {
                    write_slide_list(&mut writer, &prefixes, slides)?;
                    slides_written = true;
                }
            },
            Event::End(_) if depth == 1 => {
                if !notes_master_done {
                    if let Some(r_id) = notes_master_rid {
                        write_notes_master_list(&mut writer, &prefixes, r_id)?;
                    }
                    notes_master_done = true;
                }
                if !slides_written {
                    write_slide_list(&mut writer, &prefixes, slides)?;
                    slides_written = true;
                }
            },
            _ => {},
        }

        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => break,
            _ => {},
        }

        writer.write_event(event).map_err(|e| OoxmlError::Xml(e.to_string()))?;
    }

    Ok(writer.into_inner())
}

/// Namespace prefixes declared on the root element.
#[derive(Debug, Clone)]
struct Prefixes {
    pml: Option<String>,
    rel: String,
}

impl Default for Prefixes {
    fn default() -> Self {
        Self {
            pml: Some("p".to_string()),
            rel: "r".to_string(),
        }
    }
}

impl Prefixes {
    fn from_root(root: &BytesStart<'_>) -> Self {
        let name = root.name();
        let pml = name
            .prefix()
            .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned());
        let mut rel = None;
        for attr in root.attributes().flatten() {
            let key = attr.key.as_ref();
            if let Some(declared) = key.strip_prefix(b"xmlns:") {
                if attr.value.as_ref() == namespace::OFC_RELATIONSHIPS.as_bytes() {
                    rel = Some(String::from_utf8_lossy(declared).into_owned());
                }
            }
        }
        Self {
            pml,
            rel: rel.unwrap_or_else(|| "r".to_string()),
        }
    }

    fn pml(&self, local: &str) -> String {
        match &self.pml {
            Some(prefix) => format!("{}:{}", prefix, local),
            None => local.to_string(),
        }
    }

    fn rel_id(&self) -> String {
        format!("{}:id", self.rel)
    }
}

fn write_slide_list(writer: &mut Writer<Vec<u8>>, prefixes: &Prefixes, slides: &[SlideIdEntry]) -> Result<()> {
    if slides.is_empty() {
        return Ok(());
    }
    let list = prefixes.pml("sldIdLst");
    let rel_id = prefixes.rel_id();
    write(writer, Event::Start(BytesStart::new(list.as_str())))?;
    for slide in slides {
        let id = slide.id.to_string();
        let mut entry = BytesStart::new(prefixes.pml("sldId"));
        entry.push_attribute(Attribute::from(("id", id.as_str())));
        entry.push_attribute(Attribute::from((rel_id.as_str(), slide.r_id.as_str())));
        write(writer, Event::Empty(entry))?;
    }
    write(writer, Event::End(BytesEnd::new(list.as_str())))
}

fn write_notes_master_list(writer: &mut Writer<Vec<u8>>, prefixes: &Prefixes, r_id: &str) -> Result<()> {
    let list = prefixes.pml("notesMasterIdLst");
    let rel_id = prefixes.rel_id();
    write(writer, Event::Start(BytesStart::new(list.as_str())))?;
    let mut entry = BytesStart::new(prefixes.pml("notesMasterId"));
    entry.push_attribute(Attribute::from((rel_id.as_str(), r_id)));
    write(writer, Event::Empty(entry))?;
    write(writer, Event::End(BytesEnd::new(list.as_str())))
}

#[inline]
fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| OoxmlError::Xml(e.to_string()))
}
