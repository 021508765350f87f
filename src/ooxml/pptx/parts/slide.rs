/// Slide masters, slide layouts and slides.
///
/// All three share the `p:cSld/p:spTree` structure; the wrappers here only
/// read what layout selection needs: names, placeholder lists and the
/// master's ordered layout references.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::part::Part;
use crate::ooxml::pptx::parts::presentation::for_each_list_entry;
use crate::ooxml::pptx::shapes::placeholder::{Placeholder, parse_placeholders};
use quick_xml::Reader;
use quick_xml::events::Event;

/// `p:cSld/@name`, empty when absent.
fn common_slide_name(xml: &[u8]) -> Result<String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"cSld" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"name" {
                            let name = attr.unescape_value().map_err(|e| OoxmlError::Xml(e.to_string()))?;
                            return Ok(name.into_owned());
                        }
                    }
                    return Ok(String::new());
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(OoxmlError::Xml(e.to_string())),
            _ => {},
        }
    }

    Ok(String::new())
}

/// A slide master part (`/ppt/slideMasters/slideMasterN.xml`).
pub struct SlideMasterPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideMasterPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    /// rIds of `p:sldLayoutIdLst`, in the order the master lists its layouts.
    pub fn layout_rids(&self) -> Result<Vec<String>> {
        let mut rids = Vec::new();
        for_each_list_entry(self.part.blob(), b"sldLayoutId", |_, r_id| rids.extend(r_id))?;
        Ok(rids)
    }

    /// Master placeholders; layouts inherit geometry from these.
    pub fn placeholders(&self) -> Result<Vec<Placeholder>> {
        parse_placeholders(self.part.blob())
    }
}

/// A slide layout part (`/ppt/slideLayouts/slideLayoutN.xml`).
pub struct SlideLayoutPart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlideLayoutPart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(self.part.blob())
    }

    /// Placeholders with geometry as declared on the layout itself.
    pub fn placeholders(&self) -> Result<Vec<Placeholder>> {
        parse_placeholders(self.part.blob())
    }
}

/// A slide part (`/ppt/slides/slideN.xml`).
pub struct SlidePart<'a> {
    part: &'a dyn Part,
}

impl<'a> SlidePart<'a> {
    pub fn from_part(part: &'a dyn Part) -> Result<Self> {
        Ok(Self { part })
    }

    pub fn name(&self) -> Result<String> {
        common_slide_name(self.part.blob())
    }

    pub fn placeholders(&self) -> Result<Vec<Placeholder>> {
        parse_placeholders(self.part.blob())
    }
}
