//! Cabinet decomposition and cut-list synthesis.
//!
//! [`compute_cut_list`] turns a [`CabinetSpec`] and a [`Catalog`] into a
//! [`CutList`]: every board to cut, the hardware to buy, feasibility
//! diagnostics and a cost estimate. It is a pure function; it performs no I/O,
//! holds no state between calls and never panics on bad input. Problems with a
//! layout are reported as diagnostics on the result.
//!
//! # Pipeline
//!
//! 1. [`resolver`] builds the carcass skeleton and the column width
//! 2. each column is split into slot envelopes and every occupied slot is
//!    handed to its [`expanders`] rule
//! 3. an error in a slot skips the rest of that column; other columns go on
//! 4. [`aggregate`] merges the lists and prices the result
//!
//! # Example
//!
//! ```
//! use cabinet_cutlist_mcp::engine::{compute_cut_list, Catalog};
//! use cabinet_cutlist_mcp::engine::layout::{CabinetSpec, ColumnSpec, Component, ShelfBank};
//!
//! let spec = CabinetSpec::new(600.0, 720.0, 560.0)
//!     .with_column(ColumnSpec::whole(Component::ShelfBank(ShelfBank { count: 2 })));
//! let cut_list = compute_cut_list(&spec, &Catalog::default());
//! assert!(cut_list.is_valid);
//! assert!(cut_list.pieces.iter().any(|p| p.name == "Shelf"));
//! ```

pub mod aggregate;
pub mod catalog;
pub mod diagnostics;
pub mod expanders;
pub mod layout;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use aggregate::SheetEstimate;
pub use catalog::Catalog;
pub use diagnostics::{Category, Diagnostic, DiagnosticKind, Severity};
pub use expanders::{EdgeBanding, Grain, HardwareLine, Piece, Unit};
pub use layout::CabinetSpec;

use diagnostics::check_slot_height;
use expanders::{expand_component, Envelope, ExpandContext, Expansion, SlotPosition};
use layout::{ColumnSpec, Component};
use resolver::Skeleton;

/// Result of one computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutList {
    /// Boards to cut, merged.
    pub pieces: Vec<Piece>,
    /// Hardware to buy, merged, global lines last.
    pub hardware: Vec<HardwareLine>,
    /// Feasibility findings.
    pub diagnostics: Vec<Diagnostic>,
    /// `false` iff any diagnostic is an error.
    pub is_valid: bool,
    /// Sheet material plus hardware.
    pub cost_estimate: f64,
    /// Sheets per material.
    pub sheets: Vec<SheetEstimate>,
    /// Edge banding to buy (m).
    pub edge_banding_m: f64,
}

impl CutList {
    /// A result holding a single structural diagnostic and nothing to cut.
    fn infeasible(diagnostic: Diagnostic) -> Self {
        Self {
            pieces: Vec::new(),
            hardware: Vec::new(),
            is_valid: !diagnostic.is_error(),
            diagnostics: vec![diagnostic],
            cost_estimate: 0.0,
            sheets: Vec::new(),
            edge_banding_m: 0.0,
        }
    }

    /// Selling price for the given margin multiplier.
    #[must_use]
    pub fn quoted_price(&self, margin: f64) -> f64 {
        self.cost_estimate * margin
    }

    /// Error diagnostics only.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Total number of boards to cut.
    #[must_use]
    pub fn piece_count(&self) -> u32 {
        self.pieces.iter().map(|p| p.quantity).sum()
    }
}

/// Decomposes a cabinet into its cut-list, hardware, diagnostics and cost.
#[must_use]
pub fn compute_cut_list(spec: &CabinetSpec, catalog: &Catalog) -> CutList {
    let skeleton = match resolver::resolve(spec) {
        Ok(skeleton) => skeleton,
        Err(diagnostic) => {
            tracing::debug!(%diagnostic, "Cabinet is structurally infeasible");
            return CutList::infeasible(diagnostic);
        }
    };

    let mut all = Expansion {
        pieces: skeleton.pieces.clone(),
        ..Expansion::default()
    };
    for (index, column) in spec.columns.iter().enumerate() {
        let ctx = ExpandContext::new(spec, catalog, index);
        all.extend(expand_column(column, &skeleton, &ctx));
    }

    let is_valid = !all.has_errors();
    let totals = aggregate::aggregate(all.pieces, all.hardware, catalog);

    tracing::debug!(
        is_valid,
        diagnostics = all.diagnostics.len(),
        cost = totals.cost_estimate,
        "Computed cut list"
    );

    CutList {
        pieces: totals.pieces,
        hardware: totals.hardware,
        diagnostics: all.diagnostics,
        is_valid,
        cost_estimate: totals.cost_estimate,
        sheets: totals.sheets,
        edge_banding_m: totals.edge_banding_m,
    }
}

/// Diagnostics of a cabinet without the lists.
#[must_use]
pub fn validate_cabinet(spec: &CabinetSpec, catalog: &Catalog) -> Vec<Diagnostic> {
    compute_cut_list(spec, catalog).diagnostics
}

/// Splits a column into slot envelopes and expands each one.
fn expand_column(column: &ColumnSpec, skeleton: &Skeleton, ctx: &ExpandContext<'_>) -> Expansion {
    let envelope = |height, position| Envelope {
        width: skeleton.column_width,
        height,
        depth: skeleton.usable_depth,
        position,
    };

    match column {
        ColumnSpec::Whole { slot } => expand_slots(
            &[(slot, envelope(skeleton.usable_height, SlotPosition::Whole))],
            ctx,
        ),
        ColumnSpec::Split {
            lower_height,
            lower,
            upper,
        } => {
            let upper_height = skeleton.usable_height - lower_height - ctx.thickness();
            if !lower_height.is_finite() || *lower_height <= 0.0 || upper_height <= 0.0 {
                return Expansion::from_diagnostic(ctx.error(
                    DiagnosticKind::SlotOverflow,
                    format!(
                        "split at {lower_height} mm does not fit the {:.1} mm usable column height",
                        skeleton.usable_height
                    ),
                ));
            }

            let mut out = Expansion::default();
            out.pieces.push(
                Piece::new(
                    "Fixed Shelf",
                    1,
                    skeleton.column_width,
                    ctx.spec.depth,
                    ctx.carcass(),
                )
                .with_banding(EdgeBanding::FRONT_EDGE),
            );
            out.extend(expand_slots(
                &[
                    (lower, envelope(*lower_height, SlotPosition::Lower)),
                    (upper, envelope(upper_height, SlotPosition::Upper)),
                ],
                ctx,
            ));
            out
        }
    }
}

/// Expands slots bottom to top, stopping the column at the first error.
fn expand_slots(slots: &[(&Component, Envelope)], ctx: &ExpandContext<'_>) -> Expansion {
    let mut out = Expansion::default();

    for (index, (component, envelope)) in slots.iter().enumerate() {
        if component.is_empty() {
            continue;
        }

        let slot = match check_slot_height(envelope.height, envelope.position.label()) {
            Some(diagnostic) => Expansion::from_diagnostic(diagnostic.in_column(ctx.column_index)),
            None => expand_component(component, envelope, ctx),
        };
        let failed = slot.has_errors();
        out.extend(slot);

        if failed {
            let skipped = slots[index + 1..]
                .iter()
                .filter(|(c, _)| !c.is_empty())
                .count();
            if skipped > 0 {
                tracing::warn!(column = ctx.column_index, skipped, "Skipping rest of column");
                out.diagnostics.push(
                    Diagnostic::info(
                        DiagnosticKind::ColumnSkipped,
                        format!("{skipped} remaining slot(s) skipped after an error"),
                    )
                    .in_column(ctx.column_index),
                );
            }
            break;
        }
    }

    out
}
