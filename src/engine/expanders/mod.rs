//! Component expanders.
//!
//! Each slot component (drawer bank, door, shelf bank, hanging rod, cube grid)
//! has its own module implementing [`ComponentExpander`]: given the slot's
//! envelope it emits the pieces to cut, the hardware to buy, and any
//! feasibility diagnostics.
//!
//! [`expand_component`] is the single dispatch point. Doors call it again for
//! their interior content, one level deep at most.

pub mod cube;
pub mod door;
pub mod drawer;
pub mod shelf;

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::engine::catalog::{Catalog, Material};
use crate::engine::diagnostics::{Diagnostic, DiagnosticKind};
use crate::engine::layout::{CabinetSpec, Component, GrainDirection};

/// Deepest interior nesting allowed (a door's interior is depth 1).
pub const MAX_NESTING_DEPTH: u8 = 1;

/// Which piece dimension the grain runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grain {
    /// Along `length`.
    Length,
    /// Along `width`.
    Width,
    /// No grain constraint (plain boards, backs).
    None,
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "length"),
            Self::Width => write!(f, "width"),
            Self::None => write!(f, "none"),
        }
    }
}

bitflags! {
    /// Edges of a piece that receive edge banding.
    ///
    /// `LENGTH_*` are the two edges running along the piece length,
    /// `WIDTH_*` the two running along its width.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct EdgeBanding: u8 {
        /// First long edge (the visible front edge on carcass parts).
        const LENGTH_1 = 0b0001;
        /// Second long edge.
        const LENGTH_2 = 0b0010;
        /// First short edge.
        const WIDTH_1 = 0b0100;
        /// Second short edge.
        const WIDTH_2 = 0b1000;
        /// Front edge only.
        const FRONT_EDGE = Self::LENGTH_1.bits();
        /// All four edges.
        const ALL = Self::LENGTH_1.bits() | Self::LENGTH_2.bits() | Self::WIDTH_1.bits() | Self::WIDTH_2.bits();
    }
}

impl EdgeBanding {
    /// Short code used in cut sheets, e.g. `L1 L2 W1`.
    #[must_use]
    pub fn code(self) -> String {
        let names = [
            (Self::LENGTH_1, "L1"),
            (Self::LENGTH_2, "L2"),
            (Self::WIDTH_1, "W1"),
            (Self::WIDTH_2, "W2"),
        ];
        let parts: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if parts.is_empty() {
            "-".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// One line of the cut-list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Part name, e.g. "Side" or "Drawer Front".
    pub name: String,
    /// Number of identical pieces.
    pub quantity: u32,
    /// First dimension (mm); the vertical extent for upright and front parts.
    pub length: f64,
    /// Second dimension (mm).
    pub width: f64,
    /// Grain direction relative to the piece dimensions.
    pub grain: Grain,
    /// Board the piece is cut from.
    pub material: Material,
    /// Banded edges.
    pub edge_banding: EdgeBanding,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Piece {
    /// Creates a piece with grain along its length and no banding.
    pub fn new(
        name: impl Into<String>,
        quantity: u32,
        length: f64,
        width: f64,
        material: Material,
    ) -> Self {
        Self {
            name: name.into(),
            quantity,
            length,
            width,
            grain: Grain::Length,
            material,
            edge_banding: EdgeBanding::empty(),
            note: None,
        }
    }

    /// Sets the grain direction.
    #[must_use]
    pub const fn with_grain(mut self, grain: Grain) -> Self {
        self.grain = grain;
        self
    }

    /// Sets the banded edges.
    #[must_use]
    pub const fn with_banding(mut self, banding: EdgeBanding) -> Self {
        self.edge_banding = banding;
        self
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Face area of one piece in square millimetres.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    /// Perimeter of one piece in millimetres.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        2.0 * (self.length + self.width)
    }
}

/// Unit a hardware quantity is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    /// Single pieces.
    #[serde(rename = "pc")]
    Piece,
    /// Matched pairs (drawer slides).
    Pair,
    /// Metres (rod, banding).
    #[serde(rename = "m")]
    Metre,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Piece => write!(f, "pc"),
            Self::Pair => write!(f, "pair"),
            Self::Metre => write!(f, "m"),
        }
    }
}

/// One line of the hardware shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareLine {
    /// Item description.
    pub item: String,
    /// Quantity in `unit`.
    pub quantity: f64,
    /// Counting unit.
    pub unit: Unit,
    /// Price per unit.
    pub unit_cost: f64,
    /// Free-form note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl HardwareLine {
    /// Creates a hardware line.
    pub fn new(item: impl Into<String>, quantity: f64, unit: Unit, unit_cost: f64) -> Self {
        Self {
            item: item.into(),
            quantity,
            unit,
            unit_cost,
            note: None,
        }
    }

    /// Attaches a note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Line total.
    #[must_use]
    pub fn total_cost(&self) -> f64 {
        self.quantity * self.unit_cost
    }
}

/// Where a slot sits within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotPosition {
    /// Fills the whole column.
    Whole,
    /// Lower half of a split column.
    Lower,
    /// Upper half of a split column.
    Upper,
}

impl SlotPosition {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Whole => "whole",
            Self::Lower => "lower",
            Self::Upper => "upper",
        }
    }
}

/// The space a component is expanded into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Envelope {
    /// Clear width (the column's hueco, mm).
    pub width: f64,
    /// Clear height of the slot (mm).
    pub height: f64,
    /// Usable depth (mm).
    pub depth: f64,
    /// Position within the column.
    pub position: SlotPosition,
}

impl Envelope {
    /// Same envelope with the depth reduced by `setback`.
    #[must_use]
    pub fn set_back(self, setback: f64) -> Self {
        Self {
            depth: self.depth - setback,
            ..self
        }
    }
}

/// Everything an expander needs besides its envelope.
#[derive(Debug, Clone, Copy)]
pub struct ExpandContext<'a> {
    /// The cabinet being decomposed.
    pub spec: &'a CabinetSpec,
    /// Catalog in use.
    pub catalog: &'a Catalog,
    /// Column being expanded (zero-based).
    pub column_index: usize,
    /// Interior nesting level (0 for slot content).
    pub depth: u8,
}

impl<'a> ExpandContext<'a> {
    /// Context for the top level of a column.
    #[must_use]
    pub const fn new(spec: &'a CabinetSpec, catalog: &'a Catalog, column_index: usize) -> Self {
        Self {
            spec,
            catalog,
            column_index,
            depth: 0,
        }
    }

    /// Context one nesting level deeper, or `None` past the limit.
    #[must_use]
    pub const fn nested(&self) -> Option<Self> {
        if self.depth >= MAX_NESTING_DEPTH {
            return None;
        }
        Some(Self {
            depth: self.depth + 1,
            ..*self
        })
    }

    /// Carcass board thickness (mm).
    #[must_use]
    pub const fn thickness(&self) -> f64 {
        self.spec.panel_thickness.mm()
    }

    /// Carcass board.
    #[must_use]
    pub const fn carcass(&self) -> Material {
        self.spec.panel_thickness.material()
    }

    /// Grain of a front-facing piece whose `length` is its height.
    #[must_use]
    pub const fn front_grain(&self) -> Grain {
        match self.spec.front_grain {
            GrainDirection::Vertical => Grain::Length,
            GrainDirection::Horizontal => Grain::Width,
        }
    }

    /// Error diagnostic tagged with this column.
    #[must_use]
    pub fn error(&self, kind: DiagnosticKind, message: impl Into<String>) -> Diagnostic {
        Diagnostic::error(kind, message).in_column(self.column_index)
    }

    /// Warning diagnostic tagged with this column.
    #[must_use]
    pub fn warning(&self, kind: DiagnosticKind, message: impl Into<String>) -> Diagnostic {
        Diagnostic::warning(kind, message).in_column(self.column_index)
    }
}

/// Output of one expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    /// Pieces to cut.
    pub pieces: Vec<Piece>,
    /// Hardware to buy.
    pub hardware: Vec<HardwareLine>,
    /// Findings.
    pub diagnostics: Vec<Diagnostic>,
}

impl Expansion {
    /// An expansion holding a single diagnostic.
    #[must_use]
    pub fn from_diagnostic(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            ..Self::default()
        }
    }

    /// Appends another expansion.
    pub fn extend(&mut self, other: Self) {
        self.pieces.extend(other.pieces);
        self.hardware.extend(other.hardware);
        self.diagnostics.extend(other.diagnostics);
    }

    /// Whether any error was raised.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        crate::engine::diagnostics::has_errors(&self.diagnostics)
    }
}

/// Expansion rule for one component kind.
pub trait ComponentExpander {
    /// Expands the component into pieces, hardware and diagnostics.
    fn expand(&self, envelope: &Envelope, ctx: &ExpandContext<'_>) -> Expansion;

    /// Whether the component may be fitted behind a door.
    fn nestable(&self) -> bool {
        false
    }
}

/// Expands whatever component occupies a slot.
#[must_use]
pub fn expand_component(
    component: &Component,
    envelope: &Envelope,
    ctx: &ExpandContext<'_>,
) -> Expansion {
    let expander: &dyn ComponentExpander = match component {
        Component::Empty => return Expansion::default(),
        Component::DrawerBank(bank) => bank,
        Component::Door(door) => door,
        Component::ShelfBank(shelves) => shelves,
        Component::HangingRod(rod) => rod,
        Component::CubeGrid(grid) => grid,
    };

    if ctx.depth > 0 && !expander.nestable() {
        return Expansion::from_diagnostic(ctx.error(
            DiagnosticKind::UnsupportedNesting,
            format!(
                "a {} cannot be fitted behind a door; use shelves, a cube grid or a rod",
                component.label()
            ),
        ));
    }

    tracing::trace!(
        column = ctx.column_index,
        kind = component.label(),
        position = envelope.position.label(),
        width = envelope.width,
        height = envelope.height,
        depth = envelope.depth,
        "Expanding slot"
    );

    expander.expand(envelope, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout::{ColumnSpec, Door, DoorLeaves, DrawerBank, MountStyle};

    fn spec() -> CabinetSpec {
        CabinetSpec::new(600.0, 720.0, 560.0).with_column(ColumnSpec::whole(Component::Empty))
    }

    #[test]
    fn banding_codes() {
        assert_eq!(EdgeBanding::empty().code(), "-");
        assert_eq!(EdgeBanding::FRONT_EDGE.code(), "L1");
        assert_eq!(EdgeBanding::ALL.code(), "L1 L2 W1 W2");
    }

    #[test]
    fn piece_geometry() {
        let piece = Piece::new("Shelf", 2, 500.0, 300.0, Material::Melamine18);
        assert!((piece.area() - 150_000.0).abs() < f64::EPSILON);
        assert!((piece.perimeter() - 1600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn nesting_limit() {
        let spec = spec();
        let catalog = Catalog::default();
        let ctx = ExpandContext::new(&spec, &catalog, 0);
        let inner = ctx.nested().unwrap();
        assert_eq!(inner.depth, 1);
        assert!(inner.nested().is_none());
    }

    #[test]
    fn empty_slot_expands_to_nothing() {
        let spec = spec();
        let catalog = Catalog::default();
        let ctx = ExpandContext::new(&spec, &catalog, 0);
        let envelope = Envelope {
            width: 564.0,
            height: 684.0,
            depth: 560.0,
            position: SlotPosition::Whole,
        };
        assert_eq!(
            expand_component(&Component::Empty, &envelope, &ctx),
            Expansion::default()
        );
    }

    #[test]
    fn drawers_cannot_nest_behind_doors() {
        let spec = spec();
        let catalog = Catalog::default();
        let ctx = ExpandContext::new(&spec, &catalog, 0).nested().unwrap();
        let envelope = Envelope {
            width: 564.0,
            height: 684.0,
            depth: 540.0,
            position: SlotPosition::Whole,
        };
        for component in [
            Component::DrawerBank(DrawerBank::new(2)),
            Component::Door(Door::new(DoorLeaves::Single, MountStyle::Overlay)),
        ] {
            let expansion = expand_component(&component, &envelope, &ctx);
            assert!(expansion.pieces.is_empty());
            assert_eq!(
                expansion.diagnostics[0].kind,
                DiagnosticKind::UnsupportedNesting
            );
        }
    }
}
