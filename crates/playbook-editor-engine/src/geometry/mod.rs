/*!
 * # Caret Geometry
 *
 * Everything in this module works in *visual lines*: the soft-wrapped lines a
 * block's content actually renders as, which a long paragraph can have many of
 * even though the model stores it as a single string. The host (a browser
 * `contenteditable`, a webview, a headless fixture) exposes its live layout
 * through the [`TextLayout`] trait; the functions here never touch a widget
 * toolkit directly, so the same algorithms run under a real renderer and under
 * the [`MonospaceLayout`] fixture in tests.
 *
 * The coordinate model:
 *
 * - A **caret position** is `(line, column)` — zero-based visual line index
 *   within one block, zero-based character offset from that line's start.
 * - A **visual line rectangle** is derived by grouping the content's client
 *   rectangles by rounded top coordinate. Rounding to the nearest pixel
 *   absorbs sub-pixel jitter that would otherwise split one rendered line
 *   into two.
 * - Rectangles are queried fresh on every call. Layout can change between
 *   keystrokes, so nothing here is cached.
 *
 * Geometry is a best-effort view of the world: hit-testing can fail, content
 * can be empty, the selection can sit outside the region. Every function in
 * this module degrades to a safe default (`{line: 0, column: 0}`, or leaving
 * the selection untouched) instead of propagating an error into the input
 * path.
 */

mod caret;
mod layout;
mod monospace;

pub use caret::{
    caret_on_first_line, caret_on_last_line, place_caret_at, position_from_selection,
};
pub use layout::TextLayout;
pub use monospace::MonospaceLayout;

/// Caret location relative to one block's current rendering.
///
/// `line` indexes the block's soft-wrapped visual lines, not logical
/// paragraphs. The value is ephemeral: recomputed from the live selection on
/// every relevant event and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaretPosition {
    pub line: usize,
    pub column: usize,
}

impl CaretPosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// One client rectangle reported by the host layout, in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
}

impl TextRect {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    fn rounded_top(&self) -> i64 {
        self.top.round() as i64
    }
}

/// One rendered visual line of a block, merged from the client rectangles
/// that share its (rounded) top coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualLineRect {
    pub top: f64,
    pub left: f64,
    pub right: f64,
    pub height: f64,
}

impl VisualLineRect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn vertical_midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Group client rectangles into visual lines.
///
/// Rectangles whose tops round to the same pixel belong to the same line; per
/// line the minimum left, maximum right and maximum height are kept. Output
/// is ordered by ascending top, i.e. reading order.
pub fn group_rects_into_lines(rects: &[TextRect]) -> Vec<VisualLineRect> {
    let mut lines: Vec<(i64, VisualLineRect)> = Vec::new();
    for rect in rects {
        let top = rect.rounded_top();
        match lines.iter_mut().find(|(line_top, _)| *line_top == top) {
            Some((_, line)) => {
                line.left = line.left.min(rect.left);
                line.right = line.right.max(rect.right);
                line.height = line.height.max(rect.height());
            }
            None => lines.push((
                top,
                VisualLineRect {
                    top: top as f64,
                    left: rect.left,
                    right: rect.right,
                    height: rect.height(),
                },
            )),
        }
    }
    lines.sort_by_key(|(top, _)| *top);
    lines.into_iter().map(|(_, line)| line).collect()
}

/// Soft-wrap-aware visual line rectangles for the region's full content.
pub fn visual_line_rects(layout: &dyn TextLayout) -> Vec<VisualLineRect> {
    group_rects_into_lines(&layout.content_rects())
}
