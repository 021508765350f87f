//! Placement of the body and pictures relative to the layout's placeholders.
//!
//! All values are EMU.

use crate::common::unit::inches_to_emu;
use crate::ooxml::pptx::Rect;

/// Left margin of the body and gap between body and picture.
pub fn margin() -> i64 {
    inches_to_emu(0.5)
}

/// Vertical gap under the title and above the slide's bottom edge.
pub fn gap() -> i64 {
    inches_to_emu(0.2)
}

/// Body frame below `title`, left of `picture` when there is one.
///
/// Negative extents are clamped to zero.
pub fn reconcile_body(title: Rect, picture: Option<Rect>, slide_size: (i64, i64)) -> Rect {
    let (slide_w, slide_h) = slide_size;
    let x = margin();
    let y = title.bottom() + gap();
    let cy = slide_h - y - gap();
    let cx = match picture {
        Some(picture) => picture.x - x - margin(),
        None => slide_w - inches_to_emu(1.0),
    };
    Rect::new(x, y, cx, cy).clamped()
}

/// Picture placeholder frame moved half an inch to the left.
pub fn shift_picture(picture: Rect) -> Rect {
    Rect {
        x: picture.x - margin(),
        ..picture
    }
}

/// Frame of a picture added outside any placeholder, kept right of `body`.
pub fn free_picture_rect(body: Option<Rect>) -> Rect {
    let default_left = inches_to_emu(5.5);
    let x = body.map_or(default_left, |body| default_left.max(body.right() + margin()));
    Rect::new(x, inches_to_emu(1.5), inches_to_emu(3.5), inches_to_emu(4.0))
}
