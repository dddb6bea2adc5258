//! Cube grid (open cubbies) expansion.

use crate::engine::diagnostics::{check_depth, DiagnosticKind, MIN_INTERIOR_SPACE};
use crate::engine::expanders::{
    ComponentExpander, EdgeBanding, Envelope, ExpandContext, Expansion, Grain, Piece,
};
use crate::engine::layout::CubeGrid;

impl CubeGrid {
    /// Clear cell size `(width, height)` inside the given envelope.
    #[must_use]
    pub fn cell_size(&self, envelope: &Envelope, thickness: f64) -> (f64, f64) {
        let cols = f64::from(self.cols);
        let rows = f64::from(self.rows);
        let width = (cols - 1.0).mul_add(-thickness, envelope.width) / cols;
        let height = (rows - 1.0).mul_add(-thickness, envelope.height) / rows;
        (width, height)
    }
}

impl ComponentExpander for CubeGrid {
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion {
        if self.rows == 0 || self.cols == 0 {
            return Expansion::from_diagnostic(ctx.error(
                DiagnosticKind::SlotOverflow,
                format!(
                    "cube grid needs at least one row and one column, got {}x{}",
                    self.rows, self.cols
                ),
            ));
        }

        let t = ctx.thickness();
        let (cell_width, cell_height) = self.cell_size(envelope, t);
        if cell_width < MIN_INTERIOR_SPACE || cell_height < MIN_INTERIOR_SPACE {
            return Expansion::from_diagnostic(ctx.error(
                DiagnosticKind::SlotOverflow,
                format!(
                    "{}x{} cube grid leaves {cell_width:.1} x {cell_height:.1} mm cells",
                    self.rows, self.cols
                ),
            ));
        }

        if let Some(diag) = check_depth(envelope.depth, "cube grid") {
            return Expansion::from_diagnostic(diag.in_column(ctx.column_index));
        }

        let carcass = ctx.carcass();
        let mut out = Expansion::default();
        // Verticals run the full slot height, horizontals are cut to the hueco
        if self.cols > 1 {
            out.pieces.push(
                Piece::new(
                    "Cube Vertical Divider",
                    self.cols - 1,
                    envelope.height,
                    envelope.depth,
                    carcass,
                )
                .with_banding(EdgeBanding::FRONT_EDGE),
            );
        }
        if self.rows > 1 {
            out.pieces.push(
                Piece::new(
                    "Cube Horizontal Divider",
                    self.rows - 1,
                    envelope.width,
                    envelope.depth,
                    carcass,
                )
                .with_grain(Grain::Length)
                .with_banding(EdgeBanding::FRONT_EDGE),
            );
        }
        out
    }

    fn nestable(&self) -> bool {
        true
    }
}
