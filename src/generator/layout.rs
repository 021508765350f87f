//! Layout choice for a slide.

use crate::ooxml::pptx::{LayoutInfo, SlotRole};
use log::debug;

/// Index the template falls back to when no layout has a title.
pub const FALLBACK_LAYOUT: usize = 1;

/// The first layout with title, body and picture; else with title and body;
/// else with a title; else the fallback.
///
/// `None` only for an empty list.
pub fn select_layout(layouts: &[LayoutInfo]) -> Option<&LayoutInfo> {
    const PREFERENCES: [&[SlotRole]; 3] = [
        &[SlotRole::Title, SlotRole::Body, SlotRole::Picture],
        &[SlotRole::Title, SlotRole::Body],
        &[SlotRole::Title],
    ];

    for wanted in PREFERENCES {
        if let Some(layout) = layouts
            .iter()
            .find(|layout| wanted.iter().all(|role| layout.has_role(*role)))
        {
            debug!("Layout {:?} has {:?}", layout.name, wanted);
            return Some(layout);
        }
    }

    let fallback = layouts.get(FALLBACK_LAYOUT).or_else(|| layouts.first());
    if let Some(layout) = fallback {
        debug!("No layout with a title, using fallback {:?}", layout.name);
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::PackURI;
    use crate::ooxml::pptx::{Placeholder, PlaceholderKind};

    fn layout(index: usize, name: &str, kinds: &[PlaceholderKind]) -> LayoutInfo {
        LayoutInfo {
            index,
            name: name.to_string(),
            partname: PackURI::new(format!("/ppt/slideLayouts/slideLayout{}.xml", index + 1)).unwrap(),
            placeholders: kinds
                .iter()
                .map(|kind| Placeholder {
                    kind: kind.clone(),
                    idx: 0,
                    name: String::new(),
                    rect: None,
                    has_text_frame: true,
                    text: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_richest_layout_wins() {
        let layouts = vec![
            layout(0, "Title Only", &[PlaceholderKind::Title]),
            layout(1, "Two", &[PlaceholderKind::Title, PlaceholderKind::Body]),
            layout(2, "Pic", &[PlaceholderKind::Title, PlaceholderKind::Picture, PlaceholderKind::Body]),
        ];
        assert_eq!(select_layout(&layouts).unwrap().name, "Pic");
    }

    #[test]
    fn test_content_placeholder_is_not_a_body() {
        let layouts = vec![
            layout(0, "Title Slide", &[PlaceholderKind::CenterTitle, PlaceholderKind::Subtitle]),
            layout(1, "Title and Content", &[PlaceholderKind::Title, PlaceholderKind::Object]),
            layout(2, "Section Header", &[PlaceholderKind::Title, PlaceholderKind::Body]),
            layout(3, "Picture and Content", &[PlaceholderKind::Title, PlaceholderKind::Picture, PlaceholderKind::Object]),
        ];
        assert_eq!(select_layout(&layouts).unwrap().name, "Section Header");
    }

    #[test]
    fn test_title_and_body() {
        let layouts = vec![
            layout(0, "Title Only", &[PlaceholderKind::Title]),
            layout(1, "Pic only", &[PlaceholderKind::Picture]),
            layout(2, "Content", &[PlaceholderKind::Title, PlaceholderKind::Body]),
        ];
        assert_eq!(select_layout(&layouts).unwrap().name, "Content");
    }

    #[test]
    fn test_any_title() {
        let layouts = vec![
            layout(0, "Blank", &[]),
            layout(1, "Section", &[PlaceholderKind::CenterTitle]),
            layout(2, "Title Only", &[PlaceholderKind::Title]),
        ];
        assert_eq!(select_layout(&layouts).unwrap().name, "Title Only");
    }

    #[test]
    fn test_fallbacks() {
        let blank = |i| layout(i, &format!("Blank {}", i), &[PlaceholderKind::Date]);
        assert_eq!(select_layout(&[blank(0), blank(1), blank(2)]).unwrap().index, 1);
        assert_eq!(select_layout(&[blank(0)]).unwrap().index, 0);
        assert!(select_layout(&[]).is_none());
    }
}
