//! Pointer-drag crop interaction in canvas pixel space.
//!
//! Pointer events arrive in client coordinates, which depend on the page
//! zoom and on the canvas element's DOM size. The controller makes crop
//! adjustments zoom-independent: client deltas are divided by the zoom
//! factor to get DOM-space deltas, then converted to canvas-pixel deltas
//! using the DOM-size-to-pixel-size ratio, and only then applied to the
//! crop rectangle.

/// Minimum crop rectangle edge, canvas pixels.
pub const MIN_CROP_PX: f64 = 50.0;
/// Margin kept between the crop rectangle and the canvas edge, pixels.
pub const EDGE_MARGIN_PX: f64 = 10.0;

/// A rectangle in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Which part of the crop rectangle the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragHandle {
    NorthWest,
    NorthEast,
    SouthWest,
    SouthEast,
    /// Grab anywhere inside the rectangle: move without resizing.
    Move,
}

/// Conversion factors between client, DOM, and canvas pixel coordinates.
#[derive(Debug, Clone, Copy)]
pub struct DragContext {
    /// Current page zoom factor dividing client coordinates.
    pub zoom: f64,
    /// Canvas element DOM size.
    pub dom_width: f64,
    pub dom_height: f64,
    /// Canvas backing-store pixel size.
    pub canvas_width: f64,
    pub canvas_height: f64,
}

impl DragContext {
    /// Convert a client-coordinate delta into a canvas-pixel delta.
    fn canvas_delta(&self, client_dx: f64, client_dy: f64) -> (f64, f64) {
        let zoom = if self.zoom > 0.0 { self.zoom } else { 1.0 };
        let dom_dx = client_dx / zoom;
        let dom_dy = client_dy / zoom;
        let ratio_x = if self.dom_width > 0.0 {
            self.canvas_width / self.dom_width
        } else {
            1.0
        };
        let ratio_y = if self.dom_height > 0.0 {
            self.canvas_height / self.dom_height
        } else {
            1.0
        };
        (dom_dx * ratio_x, dom_dy * ratio_y)
    }
}

/// One in-progress crop drag: created on pointer-down, queried on every
/// pointer-move, discarded on pointer-up.
#[derive(Debug, Clone)]
pub struct CropDrag {
    context: DragContext,
    handle: DragHandle,
    start_box: PixelBox,
    start_client: (f64, f64),
}

impl CropDrag {
    /// The start box is sanitized into the canvas margins on entry, so a
    /// caller-supplied box smaller than the minimum or outside the canvas
    /// never produces inverted clamp bounds later.
    pub fn begin(
        context: DragContext,
        handle: DragHandle,
        start_box: PixelBox,
        client_x: f64,
        client_y: f64,
    ) -> Self {
        Self {
            start_box: sanitize_box(&start_box, &context),
            context,
            handle,
            start_client: (client_x, client_y),
        }
    }

    pub fn handle(&self) -> DragHandle {
        self.handle
    }

    /// The crop rectangle for the current pointer position. Always within
    /// the canvas margins, never below the minimum size, opposite edges
    /// never crossed.
    pub fn update(&self, client_x: f64, client_y: f64) -> PixelBox {
        let (dx, dy) = self.context.canvas_delta(
            client_x - self.start_client.0,
            client_y - self.start_client.1,
        );
        apply_handle(&self.start_box, self.handle, dx, dy, &self.context)
    }

    /// Finish the drag at the pointer-up position, consuming the drag.
    pub fn end(self, client_x: f64, client_y: f64) -> PixelBox {
        self.update(client_x, client_y)
    }
}

/// Clamp that tolerates inverted bounds: when `hi < lo` the low bound wins
/// instead of panicking.
fn clamp_span(v: f64, lo: f64, hi: f64) -> f64 {
    v.clamp(lo, hi.max(lo))
}

/// Force a caller-supplied box into the margin/min-size region. On a canvas
/// too small to honor the minimum crop size, the available room wins.
fn sanitize_box(b: &PixelBox, ctx: &DragContext) -> PixelBox {
    let avail_w = (ctx.canvas_width - 2.0 * EDGE_MARGIN_PX).max(0.0);
    let avail_h = (ctx.canvas_height - 2.0 * EDGE_MARGIN_PX).max(0.0);
    let width = clamp_span(b.width, MIN_CROP_PX.min(avail_w), avail_w);
    let height = clamp_span(b.height, MIN_CROP_PX.min(avail_h), avail_h);
    let x = clamp_span(b.x, EDGE_MARGIN_PX, ctx.canvas_width - EDGE_MARGIN_PX - width);
    let y = clamp_span(b.y, EDGE_MARGIN_PX, ctx.canvas_height - EDGE_MARGIN_PX - height);
    PixelBox::new(x, y, width, height)
}

fn apply_handle(
    b: &PixelBox,
    handle: DragHandle,
    dx: f64,
    dy: f64,
    ctx: &DragContext,
) -> PixelBox {
    let min_x = EDGE_MARGIN_PX;
    let min_y = EDGE_MARGIN_PX;
    let max_x = ctx.canvas_width - EDGE_MARGIN_PX;
    let max_y = ctx.canvas_height - EDGE_MARGIN_PX;

    match handle {
        DragHandle::Move => {
            let x = clamp_span(b.x + dx, min_x, max_x - b.width);
            let y = clamp_span(b.y + dy, min_y, max_y - b.height);
            PixelBox::new(x, y, b.width, b.height)
        }
        DragHandle::NorthWest => {
            let x = clamp_span(b.x + dx, min_x, b.right() - MIN_CROP_PX);
            let y = clamp_span(b.y + dy, min_y, b.bottom() - MIN_CROP_PX);
            PixelBox::new(x, y, (b.right() - x).max(0.0), (b.bottom() - y).max(0.0))
        }
        DragHandle::NorthEast => {
            let right = clamp_span(b.right() + dx, b.x + MIN_CROP_PX.min(max_x - b.x), max_x);
            let y = clamp_span(b.y + dy, min_y, b.bottom() - MIN_CROP_PX);
            PixelBox::new(b.x, y, (right - b.x).max(0.0), (b.bottom() - y).max(0.0))
        }
        DragHandle::SouthWest => {
            let x = clamp_span(b.x + dx, min_x, b.right() - MIN_CROP_PX);
            let bottom = clamp_span(b.bottom() + dy, b.y + MIN_CROP_PX.min(max_y - b.y), max_y);
            PixelBox::new(x, b.y, (b.right() - x).max(0.0), (bottom - b.y).max(0.0))
        }
        DragHandle::SouthEast => {
            let right = clamp_span(b.right() + dx, b.x + MIN_CROP_PX.min(max_x - b.x), max_x);
            let bottom = clamp_span(b.bottom() + dy, b.y + MIN_CROP_PX.min(max_y - b.y), max_y);
            PixelBox::new(b.x, b.y, (right - b.x).max(0.0), (bottom - b.y).max(0.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DragContext {
        DragContext {
            zoom: 1.0,
            dom_width: 400.0,
            dom_height: 400.0,
            canvas_width: 800.0,
            canvas_height: 800.0,
        }
    }

    fn start_box() -> PixelBox {
        PixelBox::new(100.0, 100.0, 200.0, 200.0)
    }

    #[test]
    fn test_dom_to_canvas_ratio_applies() {
        // DOM is half the canvas size, so client deltas double.
        let drag = CropDrag::begin(context(), DragHandle::Move, start_box(), 0.0, 0.0);
        let out = drag.update(10.0, 5.0);
        assert_eq!((out.x, out.y), (120.0, 110.0));
    }

    #[test]
    fn test_zoom_independence() {
        // The same physical gesture at 2x zoom produces twice the client
        // delta; dividing by zoom restores the same crop movement.
        let mut zoomed = context();
        zoomed.zoom = 2.0;
        let at_1x = CropDrag::begin(context(), DragHandle::Move, start_box(), 0.0, 0.0);
        let at_2x = CropDrag::begin(zoomed, DragHandle::Move, start_box(), 0.0, 0.0);

        assert_eq!(at_1x.update(10.0, 0.0), at_2x.update(20.0, 0.0));
    }

    #[test]
    fn test_move_clamps_to_margins() {
        let drag = CropDrag::begin(context(), DragHandle::Move, start_box(), 0.0, 0.0);
        let out = drag.update(-500.0, 5000.0);
        assert_eq!(out.x, EDGE_MARGIN_PX);
        assert_eq!(out.bottom(), 800.0 - EDGE_MARGIN_PX);
        assert_eq!((out.width, out.height), (200.0, 200.0));
    }

    #[test]
    fn test_corner_resize_keeps_opposite_corner() {
        let drag = CropDrag::begin(context(), DragHandle::NorthWest, start_box(), 0.0, 0.0);
        let out = drag.update(10.0, 20.0); // canvas delta (20, 40)
        assert_eq!((out.x, out.y), (120.0, 140.0));
        assert_eq!((out.right(), out.bottom()), (300.0, 300.0));
    }

    #[test]
    fn test_resize_enforces_min_size() {
        let drag = CropDrag::begin(context(), DragHandle::SouthEast, start_box(), 0.0, 0.0);
        let out = drag.update(-5000.0, -5000.0);
        assert_eq!((out.width, out.height), (MIN_CROP_PX, MIN_CROP_PX));
        // Opposite edges never cross
        assert!(out.width > 0.0 && out.height > 0.0);
    }

    #[test]
    fn test_resize_clamps_to_canvas_bounds() {
        let drag = CropDrag::begin(context(), DragHandle::SouthEast, start_box(), 0.0, 0.0);
        let out = drag.update(5000.0, 5000.0);
        assert_eq!(out.right(), 800.0 - EDGE_MARGIN_PX);
        assert_eq!(out.bottom(), 800.0 - EDGE_MARGIN_PX);
    }

    #[test]
    fn test_update_is_stateless_from_start() {
        // Every update is computed from the pointer-down snapshot, so
        // replaying the same position gives the same box.
        let drag = CropDrag::begin(context(), DragHandle::NorthEast, start_box(), 50.0, 50.0);
        let a = drag.update(80.0, 30.0);
        let _ = drag.update(500.0, 500.0);
        let b = drag.update(80.0, 30.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_undersized_start_box_is_sanitized() {
        // Smaller than the minimum crop and overlapping the margin; begin
        // must normalize it instead of producing inverted clamp bounds.
        let tiny = PixelBox::new(5.0, 5.0, 40.0, 40.0);
        let drag = CropDrag::begin(context(), DragHandle::NorthWest, tiny, 0.0, 0.0);

        let out = drag.update(-100.0, -100.0);
        assert!(out.x >= EDGE_MARGIN_PX);
        assert!(out.y >= EDGE_MARGIN_PX);
        assert!(out.width >= MIN_CROP_PX);
        assert!(out.height >= MIN_CROP_PX);
    }

    #[test]
    fn test_canvas_smaller_than_min_crop_never_panics() {
        // 60px canvas leaves only 40px between the margins, below the
        // minimum crop size; the available room wins.
        let ctx = DragContext {
            zoom: 1.0,
            dom_width: 60.0,
            dom_height: 60.0,
            canvas_width: 60.0,
            canvas_height: 60.0,
        };
        let b = PixelBox::new(0.0, 0.0, 200.0, 200.0);
        for handle in [
            DragHandle::NorthWest,
            DragHandle::NorthEast,
            DragHandle::SouthWest,
            DragHandle::SouthEast,
            DragHandle::Move,
        ] {
            let drag = CropDrag::begin(ctx, handle, b, 0.0, 0.0);
            for (cx, cy) in [(-500.0, -500.0), (0.0, 0.0), (500.0, 500.0)] {
                let out = drag.update(cx, cy);
                assert!(out.width >= 0.0 && out.height >= 0.0, "{handle:?}");
                assert!(out.x >= EDGE_MARGIN_PX && out.y >= EDGE_MARGIN_PX, "{handle:?}");
            }
        }
    }

    #[test]
    fn test_end_matches_last_update() {
        let drag = CropDrag::begin(context(), DragHandle::SouthEast, start_box(), 0.0, 0.0);
        let moved = drag.update(25.0, 25.0);
        assert_eq!(drag.end(25.0, 25.0), moved);
    }
}
