//! Dimension resolver: carcass skeleton and column envelopes.
//!
//! The carcass is two full-height sides with a top and bottom fitted between
//! them, a back nailed on behind, an optional plinth board and `N − 1`
//! vertical dividers splitting the inner width into `N` equal columns.

use crate::engine::diagnostics::{check_hueco_width, Diagnostic, DiagnosticKind};
use crate::engine::expanders::{EdgeBanding, Grain, Piece};
use crate::engine::layout::CabinetSpec;

/// The back panel is cut this much smaller than the carcass in both directions (mm).
pub const BACK_INSET: f64 = 15.0;

/// Depth taken by a sliding-door kit in front of the carcass interior (mm).
pub const SLIDING_DOOR_ALLOWANCE: f64 = 85.0;

/// Resolved carcass geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    /// Sides, top/bottom, back, plinth and vertical dividers.
    pub pieces: Vec<Piece>,
    /// Width between the two sides (mm).
    pub inner_width: f64,
    /// Clear width of each column (the hueco, mm).
    pub column_width: f64,
    /// Number of columns.
    pub column_count: usize,
    /// Clear height between bottom and top (mm).
    pub usable_height: f64,
    /// Depth available to slot content (mm).
    pub usable_depth: f64,
}

impl Skeleton {
    /// Clear width of every column, left to right.
    #[must_use]
    pub fn column_widths(&self) -> Vec<f64> {
        vec![self.column_width; self.column_count]
    }
}

/// Resolves the skeleton of a cabinet.
///
/// # Errors
///
/// Returns a blocking structural diagnostic when the cabinet cannot be built
/// at all: non-positive dimensions, no columns, no usable height or depth, or
/// columns narrower than the minimum hueco.
#[allow(clippy::cast_precision_loss)]
pub fn resolve(spec: &CabinetSpec) -> Result<Skeleton, Diagnostic> {
    check_dimensions(spec)?;

    let t = spec.panel_thickness.mm();
    let count = spec.column_count();
    let n = count as f64;

    let inner_width = 2.0f64.mul_add(-t, spec.width);
    let column_width = (n - 1.0).mul_add(-t, inner_width) / n;
    let usable_height = spec.height - spec.plinth_height - 2.0 * t;
    let usable_depth = if spec.sliding_door_kit {
        spec.depth - SLIDING_DOOR_ALLOWANCE
    } else {
        spec.depth
    };

    if usable_height <= 0.0 || usable_depth <= 0.0 {
        return Err(structural(format!(
            "no usable interior: {usable_height:.1} mm high, {usable_depth:.1} mm deep"
        )));
    }
    if let Some(diag) = check_hueco_width(column_width) {
        return Err(diag);
    }

    let carcass = spec.panel_thickness.material();
    let mut pieces = vec![
        Piece::new("Side", 2, spec.height, spec.depth, carcass)
            .with_banding(EdgeBanding::FRONT_EDGE),
        Piece::new("Top/Bottom", 2, inner_width, spec.depth, carcass)
            .with_banding(EdgeBanding::FRONT_EDGE),
        Piece::new(
            "Back",
            1,
            spec.height - BACK_INSET,
            spec.width - BACK_INSET,
            spec.back_thickness.material(),
        )
        .with_grain(Grain::None),
    ];
    if count > 1 {
        pieces.push(
            Piece::new(
                "Vertical Divider",
                u32::try_from(count - 1).unwrap_or(u32::MAX),
                usable_height,
                spec.depth,
                carcass,
            )
            .with_banding(EdgeBanding::FRONT_EDGE),
        );
    }
    if spec.plinth_height > 0.0 {
        pieces.push(
            Piece::new("Plinth", 1, inner_width, spec.plinth_height, carcass)
                .with_banding(EdgeBanding::FRONT_EDGE),
        );
    }

    tracing::debug!(
        inner_width,
        column_width,
        usable_height,
        usable_depth,
        columns = count,
        "Resolved skeleton"
    );

    Ok(Skeleton {
        pieces,
        inner_width,
        column_width,
        column_count: count,
        usable_height,
        usable_depth,
    })
}

fn check_dimensions(spec: &CabinetSpec) -> Result<(), Diagnostic> {
    for (name, value) in [
        ("width", spec.width),
        ("height", spec.height),
        ("depth", spec.depth),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(structural(format!(
                "cabinet {name} must be a positive number of millimetres, got {value}"
            )));
        }
    }
    if !spec.plinth_height.is_finite() || spec.plinth_height < 0.0 {
        return Err(structural(format!(
            "plinth height must be zero or positive, got {}",
            spec.plinth_height
        )));
    }
    if spec.columns.is_empty() {
        return Err(structural("cabinet has no columns"));
    }
    Ok(())
}

fn structural(message: impl Into<String>) -> Diagnostic {
    Diagnostic::error(DiagnosticKind::InvalidDimensions, message)
}
