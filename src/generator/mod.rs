//! Rendering slide records onto a presentation template.
//!
//! Every record becomes one slide built from the richest layout the template
//! offers. The body is moved under the title and beside the picture, the
//! picture is cropped into its placeholder (or placed freely when the layout
//! has none) and notes go to a notes slide.

pub mod content;
pub mod geometry;
pub mod layout;

use crate::error::{Error, Result};
use crate::images::ImageSource;
use crate::model::SlideRecord;
use crate::ooxml::opc::PackURI;
use crate::ooxml::pptx::{Crop, LayoutInfo, Package, PictureFill, Rect, SlideBuilder, SlotRole};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub use layout::select_layout;

/// What happened to one slide.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideReport {
    pub layout: String,
    pub roles: BTreeSet<SlotRole>,
    pub image_placed: bool,
    pub has_notes: bool,
    pub title_rect: Option<Rect>,
    pub body_rect: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderReport {
    pub output: PathBuf,
    pub slides: Vec<SlideReport>,
}

/// Renders decks, asking `images` for one picture per slide title.
pub struct Generator<'a> {
    images: &'a dyn ImageSource,
}

impl<'a> Generator<'a> {
    pub fn new(images: &'a dyn ImageSource) -> Self {
        Self { images }
    }

    /// Render `slides` onto `template` and save the result to `output`.
    ///
    /// Nothing is written unless every slide was added.
    pub fn render(&self, slides: &[SlideRecord], template: &Path, output: &Path) -> Result<RenderReport> {
        let (mut pkg, layouts) = open_template(template)?;
        let open_error = |reason: String| Error::TemplateOpen {
            path: template.to_path_buf(),
            reason,
        };
        if layouts.is_empty() {
            return Err(open_error("template has no slide layouts".to_string()));
        }
        let slide_size = pkg.slide_size().map_err(|e| open_error(e.to_string()))?;

        let removed = pkg.remove_all_slides()?;
        info!(
            "Rendering {} slides onto {} ({} template slides removed)",
            slides.len(),
            template.display(),
            removed
        );

        let mut reports = Vec::with_capacity(slides.len());
        for (i, record) in slides.iter().enumerate() {
            let layout = select_layout(&layouts).ok_or_else(|| open_error("template has no slide layouts".to_string()))?;
            let report = self.render_slide(&mut pkg, layout, slide_size, record)?;
            debug!("Slide {} {:?}: {:?}", i + 1, record.title, report);
            reports.push(report);
        }

        pkg.save(output).map_err(|e| Error::Save {
            path: output.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!("Saved {} slides to {}", reports.len(), output.display());

        Ok(RenderReport {
            output: output.to_path_buf(),
            slides: reports,
        })
    }

    fn render_slide(
        &self,
        pkg: &mut Package,
        layout: &LayoutInfo,
        slide_size: (i64, i64),
        record: &SlideRecord,
    ) -> Result<SlideReport> {
        let mut slide = SlideBuilder::from_layout(layout);

        match slide.placeholder_mut(SlotRole::Title) {
            Some(title) if title.kind().takes_text() => title.set_text(content::title_body(&record.title)),
            _ => warn!("Layout {:?} has no title placeholder", layout.name),
        }

        let title_rect = slide.placeholder(SlotRole::Title).and_then(|ph| ph.rect());
        let picture_rect = slide.placeholder(SlotRole::Picture).and_then(|ph| ph.rect());
        match (title_rect, slide.placeholder_mut(SlotRole::Body)) {
            (Some(title), Some(body)) => body.set_rect(geometry::reconcile_body(title, picture_rect, slide_size)),
            (None, Some(_)) => warn!("Title geometry unknown on {:?}, body left in place", layout.name),
            _ => {},
        }

        match slide.placeholder_mut(SlotRole::Body) {
            Some(body) => body.set_text(content::bullet_body(record)),
            None => warn!("Layout {:?} has no body placeholder", layout.name),
        }
        let body_rect = slide.placeholder(SlotRole::Body).and_then(|ph| ph.rect());

        let image_placed = self.place_image(pkg, &mut slide, &record.title, body_rect);

        slide.set_notes(record.notes.clone());
        let has_notes = slide.notes().is_some();
        if has_notes && let Err(e) = pkg.ensure_notes_master() {
            warn!("Cannot add a notes master, dropping notes of {:?}: {}", record.title, e);
            slide.set_notes(None);
        }

        pkg.add_slide(&slide)?;

        Ok(SlideReport {
            layout: layout.name.clone(),
            roles: layout.roles(),
            image_placed,
            has_notes: slide.notes().is_some(),
            title_rect,
            body_rect,
        })
    }

    /// Fetch and place the picture for `title`. Failures are logged and leave the slide without one.
    fn place_image(&self, pkg: &mut Package, slide: &mut SlideBuilder, title: &str, body_rect: Option<Rect>) -> bool {
        let Some(path) = self.images.fetch(title) else {
            debug!("No image for {:?}", title);
            return false;
        };
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Cannot read image {}: {}", path.display(), e);
                return false;
            },
        };
        let pixels = image_dimensions(&bytes);
        let image = match pkg.add_image(bytes) {
            Ok(image) => image,
            Err(e) => {
                warn!("Cannot embed image {}: {}", path.display(), e);
                return false;
            },
        };
        let descr = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match slide.placeholder_mut(SlotRole::Picture) {
            Some(frame) => {
                let rect = frame.rect().map(geometry::shift_picture);
                if let Some(rect) = rect {
                    frame.set_rect(rect);
                }
                let crop = match (pixels, rect) {
                    (Some(px), Some(rect)) => Crop::to_fit(px, (rect.cx, rect.cy)),
                    _ => Crop::default(),
                };
                frame.insert_picture(PictureFill { image, crop, descr });
            },
            None => {
                add_free_picture(slide, image, body_rect, &descr);
            },
        }
        true
    }
}

/// Open a template and read its layouts.
pub(crate) fn open_template(path: &Path) -> Result<(Package, Vec<LayoutInfo>)> {
    if !path.is_file() {
        return Err(Error::TemplateNotFound(path.to_path_buf()));
    }
    let open_error = |e: crate::ooxml::OoxmlError| Error::TemplateOpen {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    let pkg = Package::open(path).map_err(open_error)?;
    let layouts = pkg.slide_layouts().map_err(open_error)?;
    Ok((pkg, layouts))
}

fn add_free_picture(slide: &mut SlideBuilder, image: PackURI, body_rect: Option<Rect>, descr: &str) {
    let rect = geometry::free_picture_rect(body_rect);
    let id = slide.add_picture(image, rect, descr);
    debug!("Added picture {} at ({}, {})", id, rect.x, rect.y);
}

fn image_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;
    use crate::ooxml::pptx::fixture::{self, FixtureLayout, TemplateSpec, ph};
    use crate::ooxml::pptx::parts::SlidePart;
    use crate::ooxml::pptx::shapes::textframe::text_bodies;
    use crate::ooxml::pptx::PlaceholderKind;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Hands out one fixed file and remembers the queries.
    struct FixedImage {
        path: Option<PathBuf>,
        queries: RefCell<Vec<String>>,
    }

    impl FixedImage {
        fn none() -> Self {
            Self {
                path: None,
                queries: RefCell::new(Vec::new()),
            }
        }

        fn png(dir: &Path, width: u32, height: u32) -> Self {
            let path = dir.join("picture.png");
            std::fs::write(&path, fixture::png_bytes(width, height)).unwrap();
            Self {
                path: Some(path),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl ImageSource for FixedImage {
        fn fetch(&self, query: &str) -> Option<PathBuf> {
            self.queries.borrow_mut().push(query.to_string());
            self.path.clone()
        }
    }

    fn standard_template(dir: &Path) -> PathBuf {
        fixture::write_template(
            dir,
            "template.pptx",
            &TemplateSpec {
                layouts: fixture::standard_layouts(),
                existing_slide: true,
                potx: false,
            },
        )
    }

    fn records() -> Vec<SlideRecord> {
        vec![
            SlideRecord::from_bullets("Intro", &["a", "b"]).with_notes(Some("Say hello".to_string())),
            SlideRecord::from_bullets("Details", &["c"]),
        ]
    }

    fn slide_xml(pkg: &Package, partname: &PackURI) -> String {
        String::from_utf8(pkg.part(partname).unwrap().blob().to_vec()).unwrap()
    }

    #[test]
    fn test_render_picture_layout() {
        let dir = TempDir::new().unwrap();
        let template = standard_template(dir.path());
        let output = dir.path().join("deck.pptx");
        let images = FixedImage::png(dir.path(), 400, 200);

        let report = Generator::new(&images).render(&records(), &template, &output).unwrap();

        assert_eq!(images.queries.borrow().as_slice(), ["Intro", "Details"]);
        assert_eq!(report.slides.len(), 2);
        for slide in &report.slides {
            assert_eq!(slide.layout, "Picture with Caption");
            assert!(slide.image_placed);
            let title = slide.title_rect.unwrap();
            let body = slide.body_rect.unwrap();
            assert!(body.y >= title.y + title.cy);
            assert_eq!(body, Rect::new(457_200, 2_240_280, 4_268_788, 4_434_840));
        }
        assert!(report.slides[0].has_notes);
        assert!(!report.slides[1].has_notes);

        let pkg = Package::open(&output).unwrap();
        assert_eq!(pkg.slide_count(), 2);
        let partnames = pkg.slide_partnames().unwrap();

        let first = slide_xml(&pkg, &partnames[0]);
        let bodies = text_bodies(first.as_bytes()).unwrap();
        assert_eq!(bodies, vec![vec!["Intro".to_string()], vec!["a".to_string(), "b".to_string()]]);
        assert!(first.contains(r#"sz="3600""#));
        assert!(first.contains(r#"<a:pPr lvl="0" algn="l"><a:spcAft><a:spcPts val="500"/>"#));
        assert!(first.contains("<p:pic>"));
        assert!(first.contains("<a:srcRect"));

        let placeholders = SlidePart::from_part(pkg.part(&partnames[0]).unwrap())
            .unwrap()
            .placeholders()
            .unwrap();
        let picture = placeholders.iter().find(|p| p.kind == PlaceholderKind::Picture).unwrap();
        assert_eq!(picture.rect, Some(Rect::new(5_183_188 - 457_200, 987_425, 6_172_200, 4_873_625)));

        let notes = pkg.part(&partnames[0]).unwrap().rels().part_with_reltype(rt::NOTES_SLIDE).unwrap();
        let notes_xml = String::from_utf8(pkg.part(&notes.target_partname().unwrap()).unwrap().blob().to_vec()).unwrap();
        assert!(notes_xml.contains("Say hello"));
        assert!(notes_xml.contains(r#"sz="800""#));
        assert!(notes_xml.contains("<a:spAutoFit/>"));
        assert!(pkg.part(&partnames[1]).unwrap().rels().part_with_reltype(rt::NOTES_SLIDE).is_err());
    }

    #[test]
    fn test_free_picture_beside_full_width_body() {
        let dir = TempDir::new().unwrap();
        let template = fixture::write_template(
            dir.path(),
            "content.pptx",
            &TemplateSpec {
                layouts: vec![
                    FixtureLayout {
                        name: "Title Only",
                        placeholders: vec![ph("title", 0, None)],
                    },
                    FixtureLayout {
                        name: "Title and Content",
                        placeholders: vec![ph("title", 0, Some(fixture::LAYOUT_TITLE_RECT)), ph("", 1, None)],
                    },
                    FixtureLayout {
                        name: "Title and Text",
                        placeholders: vec![ph("title", 0, Some(fixture::LAYOUT_TITLE_RECT)), ph("body", 1, None)],
                    },
                ],
                existing_slide: false,
                potx: false,
            },
        );
        let output = dir.path().join("out.pptx");
        let images = FixedImage::png(dir.path(), 10, 10);

        let report = Generator::new(&images)
            .render(&[SlideRecord::from_bullets("Only", &["x"])], &template, &output)
            .unwrap();
        let slide = &report.slides[0];
        assert_eq!(slide.layout, "Title and Text");
        assert_eq!(slide.roles, BTreeSet::from([SlotRole::Title, SlotRole::Body]));

        let body = slide.body_rect.unwrap();
        assert_eq!(body.cx, fixture::SLIDE_SIZE.0 - 914_400);
        let pkg = Package::open(&output).unwrap();
        let xml = slide_xml(&pkg, &pkg.slide_partnames().unwrap()[0]);
        // Body reaches past 5.5in, so the picture starts half an inch after it
        let expected_x = body.x + body.cx + 457_200;
        assert!(xml.contains(&format!(r#"<a:off x="{}" y="1371600"/>"#, expected_x)));
        assert!(xml.contains(r#"<a:ext cx="3200400" cy="3657600"/>"#));
    }

    #[test]
    fn test_no_image_and_title_only_layouts() {
        let dir = TempDir::new().unwrap();
        let template = fixture::write_template(
            dir.path(),
            "plain.pptx",
            &TemplateSpec {
                layouts: vec![FixtureLayout {
                    name: "Title Only",
                    placeholders: vec![ph("title", 0, None)],
                }],
                existing_slide: false,
                potx: true,
            },
        );
        let output = dir.path().join("out.pptx");
        let report = Generator::new(&FixedImage::none())
            .render(&records(), &template, &output)
            .unwrap();

        assert!(report.slides.iter().all(|s| !s.image_placed && s.body_rect.is_none()));
        assert_eq!(report.slides[0].title_rect, Some(fixture::MASTER_TITLE_RECT));
        assert_eq!(Package::open(&output).unwrap().slide_count(), 2);
    }

    #[test]
    fn test_missing_template_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("out.pptx");
        let err = Generator::new(&FixedImage::none())
            .render(&records(), &dir.path().join("missing.pptx"), &output)
            .unwrap_err();
        assert!(matches!(err, Error::TemplateNotFound(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_unreadable_template() {
        let dir = TempDir::new().unwrap();
        let template = dir.path().join("broken.pptx");
        std::fs::write(&template, b"not a zip").unwrap();
        let output = dir.path().join("out.pptx");
        let err = Generator::new(&FixedImage::none())
            .render(&records(), &template, &output)
            .unwrap_err();
        assert!(matches!(err, Error::TemplateOpen { .. }));
        assert!(!output.exists());
    }

    #[test]
    fn test_template_without_layouts() {
        let dir = TempDir::new().unwrap();
        let template = fixture::write_template(
            dir.path(),
            "empty.pptx",
            &TemplateSpec {
                layouts: Vec::new(),
                existing_slide: false,
                potx: false,
            },
        );
        let err = Generator::new(&FixedImage::none())
            .render(&records(), &template, &dir.path().join("o.pptx"))
            .unwrap_err();
        assert!(matches!(err, Error::TemplateOpen { reason, .. } if reason.contains("no slide layouts")));
    }

    #[test]
    fn test_unusable_image_is_skipped() {
        let dir = TempDir::new().unwrap();
        let template = standard_template(dir.path());
        let bogus = dir.path().join("bogus.png");
        std::fs::write(&bogus, b"definitely not a png").unwrap();
        let images = FixedImage {
            path: Some(bogus),
            queries: RefCell::new(Vec::new()),
        };
        let output = dir.path().join("out.pptx");

        let report = Generator::new(&images).render(&records(), &template, &output).unwrap();
        assert!(report.slides.iter().all(|s| !s.image_placed));
        let pkg = Package::open(&output).unwrap();
        let xml = slide_xml(&pkg, &pkg.slide_partnames().unwrap()[0]);
        assert!(!xml.contains("<p:pic>"));
    }
}
