//! Text written into the title and body placeholders.

use crate::common::unit::inches_to_emu;
use crate::model::SlideRecord;
use crate::ooxml::pptx::shapes::{Align, Anchor, BodyProps};
use crate::ooxml::pptx::{Paragraph, TextBody};

pub const TITLE_FONT_PT: f64 = 36.0;
pub const BULLET_FONT_PT: f64 = 20.0;
pub const BULLET_SPACE_AFTER_PT: f64 = 5.0;

pub fn title_body(title: &str) -> TextBody {
    let mut body = TextBody::default();
    body.push(Paragraph::new(title).size(TITLE_FONT_PT));
    body
}

/// One left-aligned 20pt paragraph per bullet, anchored at the top.
pub fn bullet_body(slide: &SlideRecord) -> TextBody {
    let inset = inches_to_emu(0.1);
    let mut body = TextBody::new(BodyProps {
        wrap_square: true,
        left_inset: Some(inset),
        right_inset: Some(inset),
        anchor: Some(Anchor::Top),
        ..BodyProps::default()
    });
    for bullet in slide.bullets() {
        body.push(
            Paragraph::new(bullet)
                .level(0)
                .align(Align::Left)
                .size(BULLET_FONT_PT)
                .space_after(BULLET_SPACE_AFTER_PT),
        );
    }
    body
}
