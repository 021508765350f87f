//! Template introspection: what layouts a template offers and which suit generated slides.

use crate::error::{Error, Result};
use crate::generator::{content, open_template};
use crate::ooxml::pptx::{LayoutInfo, Paragraph, SlideBuilder, SlotRole, TextBody};
use log::info;
use std::fmt;
use std::path::{Path, PathBuf};

pub const SAMPLE_TITLE: &str = "Sample Title - AI Slide Generator";
pub const SAMPLE_BULLETS: [&str; 3] = [
    "• Sample bullet point 1",
    "• Sample bullet point 2",
    "• Sample bullet point 3",
];
const RECOMMENDATIONS: usize = 3;

/// How well a layout suits a title + bullets + picture slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutScore {
    pub index: usize,
    pub score: u32,
    pub features: Vec<&'static str>,
}

/// Title 3, body 2, picture 1.
pub fn score_layout(layout: &LayoutInfo) -> LayoutScore {
    let mut score = 0;
    let mut features = Vec::new();
    for (role, points, feature) in [
        (SlotRole::Title, 3, "Title"),
        (SlotRole::Body, 2, "Content"),
        (SlotRole::Picture, 1, "Picture"),
    ] {
        if layout.has_role(role) {
            score += points;
            features.push(feature);
        }
    }
    LayoutScore {
        index: layout.index,
        score,
        features,
    }
}

#[derive(Debug, Clone)]
pub struct TemplateAnalysis {
    pub path: PathBuf,
    pub layouts: Vec<LayoutInfo>,
}

impl TemplateAnalysis {
    /// Layouts scoring above zero, best first; equal scores keep layout order.
    pub fn ranked(&self) -> Vec<LayoutScore> {
        let mut ranked: Vec<LayoutScore> = self
            .layouts
            .iter()
            .map(score_layout)
            .filter(|s| s.score > 0)
            .collect();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    pub fn recommendations(&self) -> Vec<LayoutScore> {
        let mut ranked = self.ranked();
        ranked.truncate(RECOMMENDATIONS);
        ranked
    }
}

impl fmt::Display for TemplateAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "Analyzing template: {}", self.path.display())?;
        writeln!(f, "Total layouts: {}", self.layouts.len())?;
        writeln!(f, "{}", rule)?;

        for layout in &self.layouts {
            writeln!(f)?;
            writeln!(f, "Layout {}: {}", layout.index, layout.name)?;
            writeln!(f, "Placeholders: {}", layout.placeholders.len())?;
            for (j, ph) in layout.placeholders.iter().enumerate() {
                writeln!(f, "  [{}] Type: {} (idx {})", j, ph.kind.display_name(), ph.idx)?;
                if ph.has_text_frame {
                    writeln!(f, "      Has text frame: Yes")?;
                    if !ph.text.is_empty() {
                        writeln!(f, "      Default text: '{}'", ph.text)?;
                    }
                } else {
                    writeln!(f, "      Has text frame: No")?;
                }
                match ph.rect {
                    Some(rect) => {
                        writeln!(f, "      Position: ({}, {})", rect.x, rect.y)?;
                        writeln!(f, "      Size: {} x {}", rect.cx, rect.cy)?;
                    },
                    None => writeln!(f, "      Position: inherited")?,
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Recommended layouts for slide generation:")?;
        for (rank, rec) in self.recommendations().iter().enumerate() {
            let name = self.layouts.get(rec.index).map_or("", |l| l.name.as_str());
            writeln!(f, "{}. Layout {}: {} (Score: {})", rank + 1, rec.index, name, rec.score)?;
            writeln!(f, "   Features: {}", rec.features.join(", "))?;
        }
        Ok(())
    }
}

/// Layouts and placeholders of the template at `path`.
pub fn analyze(path: &Path) -> Result<TemplateAnalysis> {
    let (_, layouts) = open_template(path)?;
    Ok(TemplateAnalysis {
        path: path.to_path_buf(),
        layouts,
    })
}

/// Copy `source` to `output` with its slides replaced by one sample slide on
/// the best scoring layout. Returns that layout's name.
pub fn create_optimized_template(source: &Path, output: &Path) -> Result<String> {
    let (mut pkg, layouts) = open_template(source)?;
    let analysis = TemplateAnalysis {
        path: source.to_path_buf(),
        layouts,
    };
    let layout = analysis
        .ranked()
        .first()
        .and_then(|best| analysis.layouts.get(best.index))
        .or_else(|| crate::generator::select_layout(&analysis.layouts))
        .ok_or_else(|| Error::TemplateOpen {
            path: source.to_path_buf(),
            reason: "template has no slide layouts".to_string(),
        })?;

    pkg.remove_all_slides()?;
    let mut slide = SlideBuilder::from_layout(layout);
    if let Some(title) = slide.placeholder_mut(SlotRole::Title) {
        title.set_text(content::title_body(SAMPLE_TITLE));
    }
    if let Some(body) = slide.placeholder_mut(SlotRole::Body) {
        let mut text = TextBody::default();
        for bullet in SAMPLE_BULLETS {
            text.push(Paragraph::new(bullet));
        }
        body.set_text(text);
    }
    pkg.add_slide(&slide)?;

    pkg.save(output).map_err(|e| Error::Save {
        path: output.to_path_buf(),
        reason: e.to_string(),
    })?;
    info!("Optimized template written to {} using layout {:?}", output.display(), layout.name);
    Ok(layout.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::Package;
    use crate::ooxml::pptx::fixture::{self, FixtureLayout, TemplateSpec, ph};
    use crate::ooxml::pptx::shapes::textframe::text_bodies;
    use tempfile::TempDir;

    fn template(dir: &Path) -> PathBuf {
        fixture::write_template(
            dir,
            "corporate.pptx",
            &TemplateSpec {
                layouts: fixture::standard_layouts(),
                existing_slide: true,
                potx: false,
            },
        )
    }

    #[test]
    fn test_scores_and_ranking() {
        let dir = TempDir::new().unwrap();
        let analysis = analyze(&template(dir.path())).unwrap();
        let ranked = analysis.recommendations();
        assert_eq!(
            ranked,
            vec![
                LayoutScore {
                    index: 2,
                    score: 6,
                    features: vec!["Title", "Content", "Picture"],
                },
                LayoutScore {
                    index: 0,
                    score: 3,
                    features: vec!["Title"],
                },
                LayoutScore {
                    index: 1,
                    score: 3,
                    features: vec!["Title"],
                },
            ]
        );
    }

    #[test]
    fn test_zero_scores_are_dropped_and_ties_stable() {
        let dir = TempDir::new().unwrap();
        let path = fixture::write_template(
            dir.path(),
            "t.pptx",
            &TemplateSpec {
                layouts: vec![
                    FixtureLayout {
                        name: "Blank",
                        placeholders: vec![ph("dt", 10, None)],
                    },
                    FixtureLayout {
                        name: "First",
                        placeholders: vec![ph("title", 0, None)],
                    },
                    FixtureLayout {
                        name: "Second",
                        placeholders: vec![ph("title", 0, None)],
                    },
                ],
                existing_slide: false,
                potx: false,
            },
        );
        let ranked = analyze(&path).unwrap().ranked();
        assert_eq!(ranked.iter().map(|s| s.index).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_report_text() {
        let dir = TempDir::new().unwrap();
        let report = analyze(&template(dir.path())).unwrap().to_string();
        assert!(report.contains("Total layouts: 3"));
        assert!(report.contains("Layout 1: Title and Content"));
        assert!(report.contains("Type: OBJECT (idx 1)"));
        assert!(report.contains("Has text frame: No"));
        assert!(report.contains("1. Layout 2: Picture with Caption (Score: 6)"));
        assert!(report.contains("   Features: Title, Content, Picture"));
    }

    #[test]
    fn test_missing_template() {
        assert!(matches!(
            analyze(Path::new("/no/such/template.pptx")),
            Err(Error::TemplateNotFound(_))
        ));
    }

    #[test]
    fn test_create_optimized_template() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("optimized.pptx");
        let layout = create_optimized_template(&template(dir.path()), &output).unwrap();
        assert_eq!(layout, "Picture with Caption");

        let pkg = Package::open(&output).unwrap();
        assert_eq!(pkg.slide_count(), 1);
        let partname = &pkg.slide_partnames().unwrap()[0];
        let bodies = text_bodies(pkg.part(partname).unwrap().blob()).unwrap();
        assert_eq!(bodies[0], vec![SAMPLE_TITLE.to_string()]);
        assert_eq!(bodies[1], SAMPLE_BULLETS.map(str::to_string).to_vec());
    }
}
