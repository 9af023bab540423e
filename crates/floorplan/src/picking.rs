use foundation::math::Vec2;

use crate::booths::Booth;
use crate::canvas::CanvasSize;

/// Marker hit radius on the design canvas, in canvas pixels.
pub const DEFAULT_HIT_RADIUS: f64 = 15.0;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickOptions {
    pub radius: f64,
}

impl Default for PickOptions {
    fn default() -> Self {
        Self {
            radius: DEFAULT_HIT_RADIUS,
        }
    }
}

/// Booth marker under `p`, if any.
///
/// Ordering contract:
/// - A booth is hit when its center is strictly closer than `opts.radius`.
/// - If several booths are hit, the first one in `booths` wins, even when a
///   later one is closer. This is a stable tie-break, not nearest-neighbour.
///
/// Used for both clicks and hover; it carries no state of its own.
pub fn pick_booth(booths: &[Booth], p: Vec2, opts: PickOptions) -> Option<&Booth> {
    booths
        .iter()
        .find(|b| b.center().distance(p) < opts.radius)
}

/// Where the canvas element is laid out on screen, in display pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DisplayRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Maps a pointer position in display pixels to canvas pixels.
///
/// Returns `None` when the displayed canvas has no area.
pub fn pointer_to_canvas(pointer: Vec2, rect: DisplayRect, canvas: CanvasSize) -> Option<Vec2> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return None;
    }
    let scale_x = canvas.width / rect.width;
    let scale_y = canvas.height / rect.height;
    Some(Vec2::new(
        (pointer.x - rect.left) * scale_x,
        (pointer.y - rect.top) * scale_y,
    ))
}

/// Pointer picking wrapper: display pixels in, booth out.
pub fn pick_pointer(
    booths: &[Booth],
    pointer: Vec2,
    rect: DisplayRect,
    canvas: CanvasSize,
    opts: PickOptions,
) -> Option<&Booth> {
    let p = pointer_to_canvas(pointer, rect, canvas)?;
    pick_booth(booths, p, opts)
}
