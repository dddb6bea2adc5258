//! Feasibility diagnostics and the checks that produce them.
//!
//! The engine never fails with an `Err`: every problem with a layout is
//! reported as a [`Diagnostic`]. Errors make the whole result invalid for
//! export; warnings and info notes are advisory.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Narrowest usable column (hueco) width (mm).
pub const MIN_HUECO_WIDTH: f64 = 150.0;

/// Lowest drawer front that can still be built (mm).
pub const MIN_FRONT_HEIGHT: f64 = 70.0;

/// Smallest clear interior space before a slot or cell counts as usable (mm).
pub const MIN_INTERIOR_SPACE: f64 = 70.0;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational note.
    Info,
    /// Advisory; does not affect validity.
    Warning,
    /// Blocks export of the result.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Scope a diagnostic aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// The whole cabinet cannot be built.
    StructuralInfeasible,
    /// One drawer bank cannot be built.
    DrawerInfeasible,
    /// A component does not fit its slot.
    SlotOverflow,
    /// Nothing is aborted.
    Advisory,
}

/// Fine-grained diagnostic code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Non-positive or non-finite cabinet dimensions, or no columns.
    InvalidDimensions,
    /// Column width below [`MIN_HUECO_WIDTH`].
    HuecoTooNarrow,
    /// Drawer front below [`MIN_FRONT_HEIGHT`], or zero drawers.
    FrontTooSmall,
    /// No standard drawer-box side fits behind the front.
    NoStandardSide,
    /// Component does not fit the slot envelope.
    SlotOverflow,
    /// Interior content that cannot be nested behind a door.
    UnsupportedNesting,
    /// Manual drawer side height reduced to one that fits.
    SideHeightClamped,
    /// Remaining slots of a column were skipped after an error.
    ColumnSkipped,
}

impl DiagnosticKind {
    /// Maps the code to the scope it aborts.
    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            Self::InvalidDimensions | Self::HuecoTooNarrow => Category::StructuralInfeasible,
            Self::FrontTooSmall | Self::NoStandardSide => Category::DrawerInfeasible,
            Self::SlotOverflow | Self::UnsupportedNesting => Category::SlotOverflow,
            Self::SideHeightClamped | Self::ColumnSkipped => Category::Advisory,
        }
    }
}

/// A feasibility finding attached to a computation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Severity.
    pub severity: Severity,
    /// Code.
    pub kind: DiagnosticKind,
    /// Human-readable description.
    pub message: String,
    /// Zero-based column the finding belongs to, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_index: Option<usize>,
}

impl Diagnostic {
    /// Creates an error diagnostic.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, message)
    }

    /// Creates a warning diagnostic.
    pub fn warning(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, message)
    }

    /// Creates an info diagnostic.
    pub fn info(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self::new(Severity::Info, kind, message)
    }

    fn new(severity: Severity, kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            kind,
            message: message.into(),
            column_index: None,
        }
    }

    /// Attaches a column index.
    #[must_use]
    pub const fn in_column(mut self, column_index: usize) -> Self {
        self.column_index = Some(column_index);
        self
    }

    /// Whether this diagnostic blocks export.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Scope this diagnostic aborts.
    #[must_use]
    pub const fn category(&self) -> Category {
        self.kind.category()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.column_index {
            Some(index) => write!(f, "[{}] column {}: {}", self.severity, index + 1, self.message),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Returns `true` if any diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

/// Checks the usable column width.
#[must_use]
pub fn check_hueco_width(w_hueco: f64) -> Option<Diagnostic> {
    (w_hueco < MIN_HUECO_WIDTH).then(|| {
        Diagnostic::error(
            DiagnosticKind::HuecoTooNarrow,
            format!(
                "column width {w_hueco:.1} mm is below the {MIN_HUECO_WIDTH:.0} mm minimum; \
                 reduce the column count or widen the cabinet"
            ),
        )
    })
}

/// Checks a computed drawer front height.
#[must_use]
pub fn check_front_height(front_height: f64, count: u32) -> Option<Diagnostic> {
    (front_height < MIN_FRONT_HEIGHT).then(|| {
        Diagnostic::error(
            DiagnosticKind::FrontTooSmall,
            format!(
                "{count} drawers leave fronts of {front_height:.1} mm, below the \
                 {MIN_FRONT_HEIGHT:.0} mm minimum; use fewer drawers or a taller slot"
            ),
        )
    })
}

/// Checks that a slot is tall enough to hold anything at all.
#[must_use]
pub fn check_slot_height(height: f64, label: &str) -> Option<Diagnostic> {
    (height < MIN_INTERIOR_SPACE).then(|| {
        Diagnostic::error(
            DiagnosticKind::SlotOverflow,
            format!(
                "{label} slot is {height:.1} mm tall, below the {MIN_INTERIOR_SPACE:.0} mm \
                 minimum usable space"
            ),
        )
    })
}

/// Checks that a part cut to `depth` still has usable depth.
///
/// NaN depths fail the check.
#[must_use]
pub fn check_depth(depth: f64, what: &str) -> Option<Diagnostic> {
    let fits = depth >= MIN_INTERIOR_SPACE;
    (!fits).then(|| {
        Diagnostic::error(
            DiagnosticKind::SlotOverflow,
            format!(
                "{what} would be {depth:.1} mm deep, below the {MIN_INTERIOR_SPACE:.0} mm \
                 minimum; deepen the cabinet"
            ),
        )
    })
}
