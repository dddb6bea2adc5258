//! Drawer bank expansion.
//!
//! A bank of `n` drawers shares its slot height equally, with a 3 mm gap
//! between fronts. Behind every front sits a box made of two sides, a
//! contra-front and a hardboard bottom, running on one pair of slides.
//!
//! # Sizing
//!
//! - Front height = `(envelope − (n − 1) × 3) / n`, at least 70 mm
//! - Box side height = largest of `180 / 150 / 100` that fits `front − 30`
//! - Box depth = `(usable depth − 15)` rounded down to 50 mm, within 250..=550
//! - Box width = hueco minus the slide clearance for the selected runner

use crate::engine::catalog::Material;
use crate::engine::diagnostics::{check_front_height, DiagnosticKind};
use crate::engine::expanders::{
    ComponentExpander, EdgeBanding, Envelope, ExpandContext, Expansion, Grain, HardwareLine,
    Piece, SlotPosition, Unit,
};
use crate::engine::layout::DrawerBank;

/// Vertical gap between adjacent fronts (mm).
pub const FRONT_GAP: f64 = 3.0;

/// Total side clearance taken off the hueco for each front (mm).
pub const FRONT_SIDE_CLEARANCE: f64 = 4.0;

/// Height a box side must stay below the front (mm).
pub const SIDE_ALLOWANCE: f64 = 30.0;

/// Standard drawer-box side heights, tallest first (mm).
pub const SIDE_HEIGHT_LADDER: [f64; 3] = [180.0, 150.0, 100.0];

/// Rear clearance behind the box (mm).
pub const BOX_REAR_CLEARANCE: f64 = 15.0;

/// Slide lengths come in 50 mm steps.
pub const BOX_DEPTH_STEP: f64 = 50.0;

/// Shortest slide available (mm).
pub const MIN_BOX_DEPTH: f64 = 250.0;

/// Longest slide available (mm).
pub const MAX_BOX_DEPTH: f64 = 550.0;

/// Assembly screws per drawer.
pub const SCREWS_PER_DRAWER: u32 = 12;

/// Height of each front when `count` drawers share `available` mm.
#[must_use]
pub fn front_height(available: f64, count: u32) -> f64 {
    let n = f64::from(count);
    (n - 1.0).mul_add(-FRONT_GAP, available) / n
}

/// Largest standard side height not exceeding `space`.
#[must_use]
pub fn standard_side_height(space: f64) -> Option<f64> {
    SIDE_HEIGHT_LADDER.iter().copied().find(|&h| h <= space)
}

/// Box depth (slide length) for the given usable depth, or `None` if even the
/// shortest slide would protrude.
#[must_use]
pub fn box_depth(usable_depth: f64) -> Option<f64> {
    let stepped = ((usable_depth - BOX_REAR_CLEARANCE) / BOX_DEPTH_STEP).floor() * BOX_DEPTH_STEP;
    (stepped >= MIN_BOX_DEPTH).then(|| stepped.min(MAX_BOX_DEPTH))
}

impl ComponentExpander for DrawerBank {
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion {
        let mut out = Expansion::default();

        if self.count == 0 {
            out.diagnostics.push(ctx.error(
                DiagnosticKind::FrontTooSmall,
                "a drawer bank needs at least one drawer",
            ));
            return out;
        }

        let t = ctx.thickness();
        let carcass = ctx.carcass();
        let count = self.count;

        // A bank sharing its column with another module is closed by its own panel
        let available = match envelope.position {
            SlotPosition::Whole => envelope.height,
            SlotPosition::Lower => {
                out.pieces.push(
                    Piece::new("Drawer Bank Cap", 1, envelope.width, envelope.depth, carcass)
                        .with_banding(EdgeBanding::FRONT_EDGE),
                );
                envelope.height - t
            }
            SlotPosition::Upper => {
                out.pieces.push(
                    Piece::new("Drawer Bank Base", 1, envelope.width, envelope.depth, carcass)
                        .with_banding(EdgeBanding::FRONT_EDGE),
                );
                envelope.height - t
            }
        };

        let front = front_height(available, count);
        out.pieces.push(
            Piece::new(
                "Drawer Front",
                count,
                front,
                envelope.width - FRONT_SIDE_CLEARANCE,
                carcass,
            )
            .with_grain(ctx.front_grain())
            .with_banding(EdgeBanding::ALL),
        );

        if let Some(diag) = check_front_height(front, count) {
            out.diagnostics.push(diag.in_column(ctx.column_index));
            return out;
        }

        let space = front - SIDE_ALLOWANCE;
        let Some(side_height) = self.resolve_side_height(space, ctx, &mut out) else {
            return out;
        };

        let Some(depth) = box_depth(envelope.depth) else {
            out.diagnostics.push(ctx.error(
                DiagnosticKind::SlotOverflow,
                format!(
                    "usable depth {:.1} mm cannot take the shortest {MIN_BOX_DEPTH:.0} mm slide",
                    envelope.depth
                ),
            ));
            return out;
        };

        let slide = ctx.catalog.slides.get(ctx.spec.slide_type);
        let box_width = envelope.width - slide.clearance;

        out.pieces.push(
            Piece::new("Drawer Box Side", count * 2, depth, side_height, carcass)
                .with_banding(EdgeBanding::FRONT_EDGE),
        );
        out.pieces.push(
            Piece::new(
                "Drawer Contra-Front",
                count,
                box_width - 2.0 * t,
                side_height,
                carcass,
            )
            .with_grain(Grain::Width)
            .with_banding(EdgeBanding::FRONT_EDGE),
        );
        out.pieces.push(
            Piece::new("Drawer Box Bottom", count, box_width, depth, Material::Hardboard3)
                .with_grain(Grain::None),
        );

        out.hardware.push(HardwareLine::new(
            format!("Drawer slide {} {depth:.0}mm", ctx.spec.slide_type),
            f64::from(count),
            Unit::Pair,
            slide.unit_cost,
        ));
        out.hardware.push(HardwareLine::new(
            "Drawer screw",
            f64::from(count * SCREWS_PER_DRAWER),
            Unit::Piece,
            ctx.catalog.prices.drawer_screw,
        ));

        out
    }
}

impl DrawerBank {
    /// Picks the box side height, honouring a manual choice when it fits.
    fn resolve_side_height(
        &self,
        space: f64,
        ctx: &ExpandContext<'_>,
        out: &mut Expansion,
    ) -> Option<f64> {
        match self.side_height {
            Some(manual) if manual > 0.0 && manual <= space => Some(manual),
            Some(manual) => {
                let clamped = standard_side_height(space);
                if let Some(height) = clamped {
                    out.diagnostics.push(ctx.warning(
                        DiagnosticKind::SideHeightClamped,
                        format!(
                            "manual drawer side height {manual:.0} mm exceeds what fits \
                             ({space:.1} mm), clamped down to {height:.0} mm"
                        ),
                    ));
                } else {
                    out.diagnostics.push(no_side_fits(space, ctx));
                }
                clamped
            }
            None => {
                let auto = standard_side_height(space);
                if auto.is_none() {
                    out.diagnostics.push(no_side_fits(space, ctx));
                }
                auto
            }
        }
    }
}

fn no_side_fits(space: f64, ctx: &ExpandContext<'_>) -> crate::engine::diagnostics::Diagnostic {
    ctx.error(
        DiagnosticKind::NoStandardSide,
        format!(
            "no standard side fits: {space:.1} mm available, smallest standard is {:.0} mm",
            SIDE_HEIGHT_LADDER[SIDE_HEIGHT_LADDER.len() - 1]
        ),
    )
}
