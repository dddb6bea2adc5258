//! Door expansion: leaves, hinges and interior content.

use crate::engine::catalog::HingeStyle;
use crate::engine::diagnostics::{check_depth, DiagnosticKind};
use crate::engine::expanders::{
    expand_component, ComponentExpander, EdgeBanding, Envelope, ExpandContext, Expansion,
    HardwareLine, Piece, Unit,
};
use crate::engine::layout::{Door, MountStyle};

/// Gap between the two leaves of a double door (mm).
pub const LEAF_GAP: f64 = 2.0;

/// Flap doors hang on this many hinges per leaf.
pub const FLIP_HINGES_PER_LEAF: u32 = 2;

/// Number of hinges one leaf of the given height needs.
#[must_use]
pub fn hinges_per_leaf(leaf_height: f64) -> u32 {
    if leaf_height < 900.0 {
        2
    } else if leaf_height < 1600.0 {
        3
    } else if leaf_height < 2100.0 {
        4
    } else {
        5
    }
}

/// Total side clearance taken off the hueco (mm).
#[must_use]
pub const fn mount_clearance(mount: MountStyle) -> f64 {
    match mount {
        MountStyle::Overlay => 4.0,
        MountStyle::Inset => 6.0,
    }
}

/// Depth lost to the door in front of interior content (mm).
#[must_use]
pub const fn interior_setback(mount: MountStyle) -> f64 {
    match mount {
        MountStyle::Overlay => 20.0,
        MountStyle::Inset => 40.0,
    }
}

impl Door {
    /// Hinge overlay class this door is fitted with.
    #[must_use]
    pub const fn hinge_style(&self, global: HingeStyle) -> HingeStyle {
        match self.mount {
            MountStyle::Inset => HingeStyle::Codo18,
            MountStyle::Overlay => global,
        }
    }
}

impl ComponentExpander for Door {
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion {
        let leaf_height = self.height.unwrap_or(envelope.height);
        let fits = leaf_height > 0.0 && leaf_height <= envelope.height;
        if !fits {
            return Expansion::from_diagnostic(ctx.error(
                DiagnosticKind::SlotOverflow,
                format!(
                    "door height {leaf_height:.1} mm does not fit the {:.1} mm {} slot",
                    envelope.height,
                    envelope.position.label()
                ),
            ));
        }

        let leaves = self.leaves.count();
        let n = f64::from(leaves);
        let leaf_width =
            (n - 1.0).mul_add(-LEAF_GAP, envelope.width - mount_clearance(self.mount)) / n;

        let mut out = Expansion::default();
        let mut leaf = Piece::new("Door Leaf", leaves, leaf_height, leaf_width, ctx.carcass())
            .with_grain(ctx.front_grain())
            .with_banding(EdgeBanding::ALL);
        if leaves == 1 && !self.opening.is_flip() {
            leaf = leaf.with_note(format!("hinged {}", self.hinge_side));
        }
        out.pieces.push(leaf);

        let style = self.hinge_style(ctx.spec.hinge_style);
        let per_leaf = if self.opening.is_flip() {
            FLIP_HINGES_PER_LEAF
        } else {
            hinges_per_leaf(leaf_height)
        };
        out.hardware.push(HardwareLine::new(
            format!("Hinge {style}"),
            f64::from(per_leaf * leaves),
            Unit::Piece,
            ctx.catalog.hinges.unit_cost(style),
        ));
        if self.opening.is_flip() {
            out.hardware.push(HardwareLine::new(
                "Gas strut",
                f64::from(leaves),
                Unit::Piece,
                ctx.catalog.prices.gas_strut,
            ));
        }

        if let Some(interior) = self.interior.as_deref() {
            match ctx.nested() {
                Some(inner) => {
                    // Interior content stops at the top of the leaf
                    let behind = Envelope {
                        height: leaf_height,
                        ..*envelope
                    }
                    .set_back(interior_setback(self.mount));
                    match check_depth(behind.depth, "door interior") {
                        Some(diag) => out.diagnostics.push(diag.in_column(ctx.column_index)),
                        None => out.extend(expand_component(interior, &behind, &inner)),
                    }
                }
                None => out.diagnostics.push(ctx.error(
                    DiagnosticKind::UnsupportedNesting,
                    "door interiors cannot hold further doors",
                )),
            }
        }

        out
    }
}
