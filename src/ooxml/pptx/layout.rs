//! Slide layouts offered by a template.

use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::pptx::shapes::{Placeholder, SlotRole};
use std::collections::BTreeSet;

/// A layout of the first slide master, with inherited placeholder geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutInfo {
    /// Position in the master's layout list.
    pub index: usize,
    /// `p:cSld/@name`.
    pub name: String,
    pub partname: PackURI,
    /// Placeholders in document order.
    pub placeholders: Vec<Placeholder>,
}

impl LayoutInfo {
    pub fn has_role(&self, role: SlotRole) -> bool {
        self.placeholders.iter().any(|ph| ph.role() == Some(role))
    }

    /// First placeholder taking `role`.
    pub fn first_with_role(&self, role: SlotRole) -> Option<&Placeholder> {
        self.placeholders.iter().find(|ph| ph.role() == Some(role))
    }

    /// Roles this layout can fill.
    pub fn roles(&self) -> BTreeSet<SlotRole> {
        self.placeholders.iter().filter_map(Placeholder::role).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::shapes::{PlaceholderKind, Rect};

    #[test]
    fn test_roles() {
        let ph = |kind: PlaceholderKind, idx| Placeholder {
            kind,
            idx,
            name: String::new(),
            rect: Some(Rect::default()),
            has_text_frame: false,
            text: String::new(),
        };
        let layout = LayoutInfo {
            index: 8,
            name: "Picture with Caption".into(),
            partname: PackURI::new("/ppt/slideLayouts/slideLayout9.xml").unwrap(),
            placeholders: vec![
                ph(PlaceholderKind::Title, 0),
                ph(PlaceholderKind::Picture, 1),
                ph(PlaceholderKind::Body, 2),
                ph(PlaceholderKind::Date, 10),
            ],
        };

        assert!(layout.has_role(SlotRole::Picture));
        assert_eq!(layout.first_with_role(SlotRole::Body).map(|p| p.idx), Some(2));
        assert_eq!(
            layout.roles().into_iter().collect::<Vec<_>>(),
            vec![SlotRole::Title, SlotRole::Body, SlotRole::Picture]
        );
    }
}
