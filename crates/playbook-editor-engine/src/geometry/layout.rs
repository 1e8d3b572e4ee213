use super::TextRect;

/// Live text layout of one block's editable region.
///
/// This is the seam between the engine and whatever actually renders text. A
/// browser host implements it over the selection API, `getClientRects` and
/// point-to-position hit-testing; tests implement it with [`MonospaceLayout`]
/// and never need a rendering engine.
///
/// All offsets are character offsets into [`text`](TextLayout::text), which is
/// the plain-text projection of the region's content (what a DOM range
/// stringifies to).
///
/// [`MonospaceLayout`]: super::MonospaceLayout
pub trait TextLayout {
    /// Plain text content of the region.
    fn text(&self) -> &str;

    /// Character offset of the collapsed selection focus inside this region,
    /// or `None` when there is no selection or it sits outside the region.
    ///
    /// Equivalent to stringifying a range that spans from the start of the
    /// region to the selection's end point and taking its length.
    fn selection_offset(&self) -> Option<usize>;

    /// Client rectangles covering the content from the region start up to
    /// `end` (one rectangle per visually contiguous run). Empty content
    /// yields no rectangles.
    fn prefix_rects(&self, end: usize) -> Vec<TextRect>;

    /// Client rectangles for the entire content.
    fn content_rects(&self) -> Vec<TextRect> {
        self.prefix_rects(self.text().chars().count())
    }

    /// Hit-test a viewport point to a character offset.
    ///
    /// Hosts wrap whichever native primitive exists (two variants are common
    /// across engines); behavior through this method must be identical either
    /// way. `None` means the point resolved to no text — callers fall back to
    /// a coarser heuristic, never treat it as fatal.
    fn offset_at_point(&self, x: f64, y: f64) -> Option<usize>;

    /// Collapse the selection to `offset` within this region.
    fn set_selection(&mut self, offset: usize);

    /// Give the region input focus. Idempotent.
    fn focus(&mut self);
}
