//! Adjustable shelves and hanging rods.

use crate::engine::diagnostics::{check_depth, DiagnosticKind, MIN_INTERIOR_SPACE};
use crate::engine::expanders::{
    ComponentExpander, EdgeBanding, Envelope, ExpandContext, Expansion, HardwareLine, Piece, Unit,
};
use crate::engine::layout::{HangingRod, ShelfBank};

/// Play left between a loose shelf and the column sides (mm).
pub const SHELF_SIDE_CLEARANCE: f64 = 2.0;

/// Shelves stop short of the front edge by this much (mm).
pub const SHELF_SETBACK: f64 = 20.0;

/// Pins supporting one shelf.
pub const PINS_PER_SHELF: u32 = 4;

/// Rod is cut this much shorter than the hueco (mm).
pub const ROD_CLEARANCE: f64 = 5.0;

impl ComponentExpander for ShelfBank {
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion {
        if self.count == 0 {
            return Expansion::default();
        }

        let t = ctx.thickness();
        let n = f64::from(self.count);
        let spacing = n.mul_add(-t, envelope.height) / (n + 1.0);
        if spacing < MIN_INTERIOR_SPACE {
            return Expansion::from_diagnostic(ctx.error(
                DiagnosticKind::SlotOverflow,
                format!(
                    "{} shelves leave {spacing:.1} mm between them in a {:.1} mm slot",
                    self.count, envelope.height
                ),
            ));
        }

        let shelf_depth = envelope.depth - SHELF_SETBACK;
        if let Some(diag) = check_depth(shelf_depth, "shelf") {
            return Expansion::from_diagnostic(diag.in_column(ctx.column_index));
        }

        let mut out = Expansion::default();
        out.pieces.push(
            Piece::new(
                "Shelf",
                self.count,
                envelope.width - SHELF_SIDE_CLEARANCE,
                shelf_depth,
                ctx.carcass(),
            )
            .with_banding(EdgeBanding::FRONT_EDGE),
        );
        out.hardware.push(HardwareLine::new(
            "Shelf pin",
            f64::from(self.count * PINS_PER_SHELF),
            Unit::Piece,
            ctx.catalog.prices.shelf_pin,
        ));
        out
    }

    fn nestable(&self) -> bool {
        true
    }
}

impl ComponentExpander for HangingRod {
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion {
        let cut = envelope.width - ROD_CLEARANCE;
        let prices = &ctx.catalog.prices;

        let mut out = Expansion::default();
        out.hardware.push(
            HardwareLine::new("Hanging rod", cut / 1000.0, Unit::Metre, prices.hanging_rod_per_m)
                .with_note(format!("cut to {cut:.0} mm")),
        );
        out.hardware.push(HardwareLine::new(
            "Rod end support",
            2.0,
            Unit::Piece,
            prices.rod_support,
        ));
        out
    }

    fn nestable(&self) -> bool {
        true
    }
}
