use ndarray as nd;

use crate::detection::Rect;
use crate::image::Image;
use crate::pipeline::TrackedHuman;

const PALETTE: [[u8; 3]; 6] = [
    [230, 60, 60],
    [60, 200, 60],
    [70, 110, 240],
    [230, 200, 50],
    [200, 80, 220],
    [60, 210, 210],
];

/// Expand a grayscale frame to RGB and outline one box per live track,
/// color keyed by track id.
pub fn render_annotations(frame: &Image, humans: &[TrackedHuman]) -> nd::Array3<u8> {
    let mut canvas = nd::Array3::<u8>::zeros((frame.height, frame.width, 3));
    for y in 0..frame.height {
        for x in 0..frame.width {
            let value = frame.value(x, y);
            for c in 0..3 {
                canvas[[y, x, c]] = value;
            }
        }
    }

    for human in humans {
        let color = PALETTE[(human.id % PALETTE.len() as u64) as usize];
        draw_rect(&mut canvas, &human.rect, color);
    }
    canvas
}

fn draw_rect(canvas: &mut nd::Array3<u8>, rect: &Rect, color: [u8; 3]) {
    let (height, width, _) = canvas.dim();
    let clamp = |v: f64, hi: usize| (v.max(0.) as usize).min(hi.saturating_sub(1));

    let x0 = clamp(rect.x, width);
    let x1 = clamp(rect.x + rect.width, width);
    let y0 = clamp(rect.y, height);
    let y1 = clamp(rect.y + rect.height, height);

    for x in x0..=x1 {
        for c in 0..3 {
            canvas[[y0, x, c]] = color[c];
            canvas[[y1, x, c]] = color[c];
        }
    }
    for y in y0..=y1 {
        for c in 0..3 {
            canvas[[y, x0, c]] = color[c];
            canvas[[y, x1, c]] = color[c];
        }
    }
}
