use super::{CaretPosition, TextLayout, TextRect, visual_line_rects};

// Pixel tolerances for deciding that the caret's rectangle touches the top or
// bottom edge of the block's bounding box. Rendered line boxes overhang their
// container by a pixel or two depending on line-height.
const FIRST_LINE_TOLERANCE: f64 = 2.0;
const LAST_LINE_TOLERANCE: f64 = 3.0;

/// Compute the caret's `(line, column)` from the live selection.
///
/// The visual line index is the number of distinct rounded rectangle tops in
/// the selection's prefix range, minus one. The column is the character
/// distance from the start of that visual line, found by hit-testing just
/// inside the line's left edge at its vertical midpoint. When hit-testing is
/// unavailable the nearest preceding hard newline is used instead, which
/// degrades soft-wrap accuracy but never fails.
///
/// Every failure path resolves to `{line: 0, column: 0}`; this function sits
/// on the key-event path and must not panic.
pub fn position_from_selection(layout: &dyn TextLayout) -> CaretPosition {
    let Some(offset) = layout.selection_offset() else {
        return CaretPosition::default();
    };

    let rects = layout.prefix_rects(offset);
    let Some(last) = rects.last() else {
        return CaretPosition::default();
    };

    let mut tops: Vec<i64> = rects.iter().map(|r| r.top.round() as i64).collect();
    tops.sort_unstable();
    tops.dedup();
    let line = tops.len().saturating_sub(1);

    let text = layout.text();
    if text.is_empty() {
        return CaretPosition::default();
    }

    // Left edge of the caret's line: minimum left among the runs sharing the
    // caret's rounded top.
    let current_top = last.top.round() as i64;
    let mut line_left = last.left;
    for rect in &rects {
        if rect.top.round() as i64 == current_top {
            line_left = line_left.min(rect.left);
        }
    }

    let y = (last.top + last.bottom) / 2.0;
    let x = line_left.floor() + 1.0;
    let line_start = layout
        .offset_at_point(x, y)
        .unwrap_or_else(|| hard_line_start(text, offset));

    CaretPosition {
        line,
        column: offset.saturating_sub(line_start),
    }
}

/// Place the caret at a `(line, column)` position within the region.
///
/// Line and column are clamped against the freshly measured layout. The
/// horizontal target is seeded proportionally along the line's width and then
/// snapped to a real character boundary by hit-testing; the approximation is
/// fine because the hit-test has the final word. Failures leave the selection
/// unchanged.
///
/// Callers must ensure the region's layout already reflects the content this
/// placement was computed for — hit-testing against stale layout silently
/// yields wrong offsets. The session defers placements to its effect queue
/// for exactly this reason.
pub fn place_caret_at(layout: &mut dyn TextLayout, position: CaretPosition) {
    if layout.text().is_empty() {
        layout.set_selection(0);
        layout.focus();
        return;
    }
    let content_len = layout.text().chars().count();

    let lines = visual_line_rects(&*layout);
    if lines.is_empty() {
        layout.focus();
        return;
    }

    let line_index = position.line.min(lines.len() - 1);
    let line = lines[line_index];
    let y_mid = line.vertical_midpoint();

    // Start of the target line, then start of the next line (or the content
    // end on the last line) to bound the line's character length.
    let Some(line_start) = layout.offset_at_point(line.left.floor() + 1.0, y_mid) else {
        layout.focus();
        return;
    };
    let mut line_end = content_len;
    if let Some(next) = lines.get(line_index + 1)
        && let Some(next_start) =
            layout.offset_at_point(next.left.floor() + 1.0, next.vertical_midpoint())
    {
        line_end = next_start;
    }

    let line_len = line_end.saturating_sub(line_start);
    let column = position.column.min(line_len);

    let width = line.width().max(1.0);
    let ratio = column as f64 / line_len.max(1) as f64;
    let x = line.left.floor() + (ratio * (width - 1.0)).floor() + 1.0;

    let target = layout.offset_at_point(x, y_mid).unwrap_or(line_start);
    layout.set_selection(target);
    layout.focus();
}

/// Whether the caret sits on the block's first visual line.
///
/// Geometric check: the caret rectangle's top coincides (within tolerance)
/// with the top of the block's bounding box. A block with no measurable
/// content has no rectangles to test, so it counts as trivially first —
/// callers that care about emptiness check it explicitly first.
pub fn caret_on_first_line(layout: &dyn TextLayout) -> bool {
    let Some((caret, bounds)) = caret_and_bounds(layout) else {
        return true;
    };
    caret.top.trunc() <= bounds.top.trunc() + FIRST_LINE_TOLERANCE
}

/// Whether the caret sits on the block's last visual line. Counterpart of
/// [`caret_on_first_line`].
pub fn caret_on_last_line(layout: &dyn TextLayout) -> bool {
    let Some((caret, bounds)) = caret_and_bounds(layout) else {
        return true;
    };
    caret.bottom.trunc() >= bounds.bottom.trunc() - LAST_LINE_TOLERANCE
}

/// Caret rectangle (last rect of the selection prefix) and the bounding box
/// of the block's full content. `None` when either is unmeasurable.
fn caret_and_bounds(layout: &dyn TextLayout) -> Option<(TextRect, TextRect)> {
    let offset = layout.selection_offset()?;
    let caret = *layout.prefix_rects(offset).last()?;

    let content = layout.content_rects();
    let first = content.first()?;
    let mut bounds = *first;
    for rect in &content {
        bounds.top = bounds.top.min(rect.top);
        bounds.left = bounds.left.min(rect.left);
        bounds.right = bounds.right.max(rect.right);
        bounds.bottom = bounds.bottom.max(rect.bottom);
    }
    Some((caret, bounds))
}

/// Fallback line start: the character position just after the last hard
/// newline strictly before the caret.
fn hard_line_start(text: &str, caret: usize) -> usize {
    text.chars()
        .take(caret)
        .enumerate()
        .filter(|(_, ch)| *ch == '\n')
        .map(|(index, _)| index + 1)
        .last()
        .unwrap_or(0)
}
