/// Picture cropping.
///
/// A picture inserted into a placeholder keeps the placeholder's frame and
/// is cropped so the visible part of the image has the frame's aspect ratio.
use std::fmt::Write as _;

/// Fraction of the image cut from each edge, `0.0..0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Crop {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Crop {
    /// Centered crop of an `image_px` image into a `frame` (EMU) of another aspect ratio.
    ///
    /// A frame wider than the image trims top and bottom; otherwise the
    /// left and right edges go.
    pub fn to_fit(image_px: (u32, u32), frame: (i64, i64)) -> Self {
        let (img_w, img_h) = image_px;
        let (frame_w, frame_h) = frame;
        if img_w == 0 || img_h == 0 || frame_w <= 0 || frame_h <= 0 {
            return Self::default();
        }

        let image_ratio = img_w as f64 / img_h as f64;
        let frame_ratio = frame_w as f64 / frame_h as f64;

        if frame_ratio > image_ratio {
            let cut = (1.0 - image_ratio / frame_ratio) / 2.0;
            Self {
                top: cut,
                bottom: cut,
                ..Self::default()
            }
        } else {
            let cut = (1.0 - frame_ratio / image_ratio) / 2.0;
            Self {
                left: cut,
                right: cut,
                ..Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| per_mille_percent(*v) == 0)
    }

    /// `<a:srcRect/>` with edges in thousandths of a percent; nothing when uncropped.
    pub fn write_src_rect(&self, xml: &mut String) -> std::fmt::Result {
        if self.is_empty() {
            return Ok(());
        }
        xml.push_str("<a:srcRect");
        for (name, value) in [("l", self.left), ("t", self.top), ("r", self.right), ("b", self.bottom)] {
            let value = per_mille_percent(value);
            if value != 0 {
                write!(xml, r#" {}="{}""#, name, value)?;
            }
        }
        xml.push_str("/>");
        Ok(())
    }
}

#[inline]
fn per_mille_percent(fraction: f64) -> i64 {
    (fraction * 100_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_frame_crops_top_and_bottom() {
        // 4:3 image into a 16:9 frame
        let crop = Crop::to_fit((800, 600), (16_000, 9_000));
        assert_eq!(crop.left, 0.0);
        assert_eq!(crop.right, 0.0);
        assert!((crop.top - 0.125).abs() < 1e-9);
        assert_eq!(crop.top, crop.bottom);

        let mut xml = String::new();
        crop.write_src_rect(&mut xml).unwrap();
        assert_eq!(xml, r#"<a:srcRect t="12500" b="12500"/>"#);
    }

    #[test]
    fn test_tall_frame_crops_sides() {
        let crop = Crop::to_fit((2000, 1000), (1000, 1000));
        assert!((crop.left - 0.25).abs() < 1e-9);
        assert_eq!(crop.left, crop.right);
        assert_eq!(crop.top, 0.0);
    }

    #[test]
    fn test_matching_ratio_is_uncropped() {
        let crop = Crop::to_fit((640, 480), (4_000, 3_000));
        assert!(crop.is_empty());
        let mut xml = String::new();
        crop.write_src_rect(&mut xml).unwrap();
        assert!(xml.is_empty());
    }

    #[test]
    fn test_degenerate_input() {
        assert!(Crop::to_fit((0, 480), (4_000, 3_000)).is_empty());
        assert!(Crop::to_fit((640, 480), (0, 3_000)).is_empty());
    }
}
