/// Package implementation for PowerPoint presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, Part, XmlPart};
use crate::ooxml::pptx::format::ImageFormat;
use crate::ooxml::pptx::layout::LayoutInfo;
use crate::ooxml::pptx::parts::presentation::{MIN_SLIDE_ID, rewrite_id_lists};
use crate::ooxml::pptx::parts::{PresentationPart, SlideIdEntry, SlideLayoutPart, SlideMasterPart};
use crate::ooxml::pptx::writer::slide::{SlideBuilder, generate_notes_master_xml, generate_notes_xml};
use log::{debug, warn};
use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::Path;

/// A PowerPoint package opened for rewriting.
///
/// The usual flow is: open a template, drop its slides, add slides built
/// from its layouts, save.
///
/// ```rust,no_run
/// use slidesmith::ooxml::pptx::{Package, SlideBuilder};
///
/// let mut pkg = Package::open("template.pptx")?;
/// pkg.remove_all_slides()?;
/// let layouts = pkg.slide_layouts()?;
/// pkg.add_slide(&SlideBuilder::from_layout(&layouts[0]))?;
/// pkg.save("deck.pptx")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Package {
    opc: OpcPackage,
    pres_partname: PackURI,
    /// Current `p:sldIdLst`, in order.
    slides: Vec<SlideIdEntry>,
}

impl Package {
    /// Open a .pptx or .potx file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_opc(OpcPackage::open(path)?)
    }

    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        Self::from_opc(OpcPackage::from_reader(reader)?)
    }

    fn from_opc(mut opc: OpcPackage) -> Result<Self> {
        let pres_partname = opc
            .main_document_partname()
            .map_err(|e| OoxmlError::PartNotFound(format!("main presentation part: {}", e)))?;
        let main_part = opc.get_part_mut(&pres_partname)?;

        // Templates are saved as ordinary presentations
        let content_type = main_part.content_type().to_string();
        match content_type.as_str() {
            ct::PML_PRESENTATION_MAIN => {},
            ct::PML_TEMPLATE_MAIN => main_part.set_content_type(ct::PML_PRESENTATION_MAIN),
            other => {
                return Err(OoxmlError::InvalidContentType {
                    expected: format!("{} or {}", ct::PML_PRESENTATION_MAIN, ct::PML_TEMPLATE_MAIN),
                    got: other.to_string(),
                });
            },
        }

        let slides = PresentationPart::from_part(&*main_part)?.slide_ids()?;
        Ok(Self {
            opc,
            pres_partname,
            slides,
        })
    }

    fn presentation(&self) -> Result<PresentationPart<'_>> {
        PresentationPart::from_part(self.opc.get_part(&self.pres_partname)?)
    }

    /// Slide width and height in EMU.
    pub fn slide_size(&self) -> Result<(i64, i64)> {
        self.presentation()?.slide_size()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Partnames of the slides, in presentation order.
    pub fn slide_partnames(&self) -> Result<Vec<PackURI>> {
        let pres = self.opc.get_part(&self.pres_partname)?;
        self.slides
            .iter()
            .map(|entry| Ok(pres.related_partname(&entry.r_id)?))
            .collect()
    }

    /// Any part of the package.
    pub fn part(&self, partname: &PackURI) -> Result<&dyn Part> {
        Ok(self.opc.get_part(partname)?)
    }

    /// Layouts of the first slide master, in the master's list order.
    ///
    /// Placeholders without their own geometry inherit it from the master.
    pub fn slide_layouts(&self) -> Result<Vec<LayoutInfo>> {
        let pres_part = self.opc.get_part(&self.pres_partname)?;
        let Some(master_rid) = self.presentation()?.slide_master_rids()?.into_iter().next() else {
            return Ok(Vec::new());
        };
        let master_part = self.opc.get_part(&pres_part.related_partname(&master_rid)?)?;
        let master = SlideMasterPart::from_part(master_part)?;
        let master_placeholders = master.placeholders()?;

        let mut layouts = Vec::new();
        for r_id in master.layout_rids()? {
            let partname = master_part.related_partname(&r_id)?;
            let Ok(part) = self.opc.get_part(&partname) else {
                warn!("Layout {} listed by the master is missing from the package", partname);
                continue;
            };
            let layout = SlideLayoutPart::from_part(part)?;
            let mut placeholders = layout.placeholders()?;
            for placeholder in &mut placeholders {
                placeholder.inherit_from(&master_placeholders);
            }
            layouts.push(LayoutInfo {
                index: layouts.len(),
                name: layout.name()?,
                partname,
                placeholders,
            });
        }

        Ok(layouts)
    }

    /// Drop every slide, its notes slide and anything only they referenced.
    ///
    /// Returns the number of slides removed.
    pub fn remove_all_slides(&mut self) -> Result<usize> {
        let removed = std::mem::take(&mut self.slides).len();

        let pres_part = self.opc.get_part_mut(&self.pres_partname)?;
        let slide_rids: Vec<String> = pres_part
            .rels()
            .all_with_reltype(rt::SLIDE)
            .into_iter()
            .map(|rel| rel.r_id().to_string())
            .collect();
        for r_id in &slide_rids {
            pres_part.rels_mut().remove(r_id);
        }

        self.write_presentation_xml(None)?;
        let pruned = self.opc.prune_unreachable();
        debug!("Removed {} slides ({} parts pruned)", removed, pruned);
        Ok(removed)
    }

    /// Add image bytes as a media part, reusing an identical existing one.
    pub fn add_image(&mut self, bytes: Vec<u8>) -> Result<PackURI> {
        let format = ImageFormat::detect_from_bytes(&bytes)
            .ok_or_else(|| OoxmlError::UnsupportedImage("unrecognised image signature".to_string()))?;

        if let Some(existing) = self
            .opc
            .iter_parts()
            .find(|part| part.content_type().starts_with("image/") && part.blob() == bytes.as_slice())
        {
            return Ok(existing.partname().clone());
        }

        let partname = self
            .opc
            .next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
        self.opc.add_part(Box::new(BlobPart::new(
            partname.clone(),
            format.mime_type().to_string(),
            bytes,
        )));
        Ok(partname)
    }

    fn notes_master_partname(&self) -> Result<Option<PackURI>> {
        let pres_part = self.opc.get_part(&self.pres_partname)?;
        let rels = pres_part.rels().all_with_reltype(rt::NOTES_MASTER);
        let partname = rels.first().map(|rel| rel.target_partname()).transpose()?;
        Ok(partname)
    }

    /// The notes master, created from the first slide master's theme when missing.
    pub fn ensure_notes_master(&mut self) -> Result<PackURI> {
        if let Some(partname) = self.notes_master_partname()? {
            return Ok(partname);
        }

        let pres_part = self.opc.get_part(&self.pres_partname)?;
        let master_rid = self
            .presentation()?
            .slide_master_rids()?
            .into_iter()
            .next()
            .ok_or_else(|| OoxmlError::PartNotFound("slide master".to_string()))?;
        let master_part = self.opc.get_part(&pres_part.related_partname(&master_rid)?)?;
        let theme_rel = master_part
            .rels()
            .all_with_reltype(rt::THEME)
            .first()
            .map(|rel| rel.target_partname())
            .transpose()?
            .ok_or_else(|| OoxmlError::PartNotFound("slide master theme".to_string()))?;
        let theme_blob = self.opc.get_part(&theme_rel)?.blob().to_vec();

        let theme_partname = self.opc.next_partname("/ppt/theme/theme%d.xml")?;
        self.opc.add_part(Box::new(XmlPart::new(
            theme_partname.clone(),
            ct::OFC_THEME.to_string(),
            theme_blob,
        )));

        let master_partname = self.opc.next_partname("/ppt/notesMasters/notesMaster%d.xml")?;
        let mut notes_master = XmlPart::new(
            master_partname.clone(),
            ct::PML_NOTES_MASTER.to_string(),
            generate_notes_master_xml().into_bytes(),
        );
        notes_master.relate_to(&theme_partname, rt::THEME);
        self.opc.add_part(Box::new(notes_master));

        let r_id = self
            .opc
            .get_part_mut(&self.pres_partname)?
            .relate_to(&master_partname, rt::NOTES_MASTER);
        self.write_presentation_xml(Some(&r_id))?;
        debug!("Created notes master {}", master_partname);
        Ok(master_partname)
    }

    /// Commit a slide at the end of the deck; returns its partname.
    ///
    /// Images the slide embeds must already be in the package
    /// ([`Package::add_image`]); slides with notes need a notes master
    /// ([`Package::ensure_notes_master`]).
    pub fn add_slide(&mut self, slide: &SlideBuilder) -> Result<PackURI> {
        if !self.opc.contains_part(slide.layout()) {
            return Err(OoxmlError::PartNotFound(slide.layout().to_string()));
        }

        let partname = self.opc.next_partname("/ppt/slides/slide%d.xml")?;
        let mut part = XmlPart::new(partname.clone(), ct::PML_SLIDE.to_string(), Vec::new());
        part.relate_to(slide.layout(), rt::SLIDE_LAYOUT);

        let mut image_rids = HashMap::new();
        for image in slide.image_partnames() {
            if !self.opc.contains_part(image) {
                return Err(OoxmlError::PartNotFound(image.to_string()));
            }
            let r_id = part.relate_to(image, rt::IMAGE);
            image_rids.insert(image.clone(), r_id);
        }
        part.set_blob(slide.to_xml(&image_rids)?.into_bytes());

        if let Some(notes) = slide.notes() {
            let notes_master = self
                .notes_master_partname()?
                .ok_or_else(|| OoxmlError::PartNotFound("notes master".to_string()))?;
            let notes_partname = self.opc.next_partname("/ppt/notesSlides/notesSlide%d.xml")?;
            let mut notes_part = XmlPart::new(
                notes_partname.clone(),
                ct::PML_NOTES_SLIDE.to_string(),
                generate_notes_xml(notes)?.into_bytes(),
            );
            notes_part.relate_to(&notes_master, rt::NOTES_MASTER);
            notes_part.relate_to(&partname, rt::SLIDE);
            part.relate_to(&notes_partname, rt::NOTES_SLIDE);
            self.opc.add_part(Box::new(notes_part));
        }
        self.opc.add_part(Box::new(part));

        let r_id = self
            .opc
            .get_part_mut(&self.pres_partname)?
            .relate_to(&partname, rt::SLIDE);
        let id = self
            .slides
            .iter()
            .map(|entry| entry.id + 1)
            .max()
            .unwrap_or(MIN_SLIDE_ID)
            .max(MIN_SLIDE_ID);
        self.slides.push(SlideIdEntry { id, r_id });
        self.write_presentation_xml(None)?;

        Ok(partname)
    }

    fn write_presentation_xml(&mut self, notes_master_rid: Option<&str>) -> Result<()> {
        let part = self.opc.get_part_mut(&self.pres_partname)?;
        let xml = rewrite_id_lists(part.blob(), &self.slides, notes_master_rid)?;
        part.set_blob(xml);
        Ok(())
    }

    /// Serialize to .pptx bytes. Unreachable parts are left out.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(self.opc.to_bytes()?)
    }

    /// Write the package to `path` through a temp file in the same directory.
    ///
    /// Either the complete file appears at `path` or nothing does.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(path).map_err(|e| OoxmlError::Io(e.error))?;
        Ok(())
    }
}
