//! Declarative layout of one cabinet.
//!
//! A [`CabinetSpec`] is built once per computation (usually deserialised from
//! JSON) and handed to the engine by reference. It owns its columns in
//! left-to-right order; each column owns one or two slots, and each slot
//! holds one [`Component`].
//!
//! # Example
//!
//! ```
//! use cabinet_cutlist_mcp::engine::layout::CabinetSpec;
//!
//! let json = r#"{
//!     "width": 900, "height": 2000, "depth": 550,
//!     "columns": [
//!         { "mode": "split", "lower_height": 700,
//!           "lower": { "kind": "drawer_bank", "count": 3 },
//!           "upper": { "kind": "hanging_rod" } }
//!     ]
//! }"#;
//! let spec = CabinetSpec::from_json(json).unwrap();
//! assert_eq!(spec.column_count(), 1);
//! ```

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::catalog::{BackThickness, HingeStyle, PanelThickness, SlideType};
use crate::error::LayoutError;

/// Direction the wood-grain pattern runs on fronts, as seen installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrainDirection {
    /// Grain runs left to right.
    Horizontal,
    /// Grain runs floor to top.
    #[default]
    Vertical,
}

/// Global attributes and columns of one cabinet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CabinetSpec {
    /// Overall width (mm).
    pub width: f64,
    /// Overall height including plinth (mm).
    pub height: f64,
    /// Overall depth (mm).
    pub depth: f64,
    /// Recessed base height (mm).
    #[serde(default)]
    pub plinth_height: f64,
    /// Carcass board thickness.
    #[serde(default)]
    pub panel_thickness: PanelThickness,
    /// Back panel thickness.
    #[serde(default)]
    pub back_thickness: BackThickness,
    /// Grain direction on doors and drawer fronts.
    #[serde(default)]
    pub front_grain: GrainDirection,
    /// Globally selected hinge overlay class.
    #[serde(default)]
    pub hinge_style: HingeStyle,
    /// Drawer runner family.
    #[serde(default)]
    pub slide_type: SlideType,
    /// Sliding-door kit fitted to the front (takes 85 mm of depth).
    #[serde(default)]
    pub sliding_door_kit: bool,
    /// Columns, left to right.
    pub columns: Vec<ColumnSpec>,
}

impl CabinetSpec {
    /// Creates a cabinet with default materials and no columns.
    #[must_use]
    pub fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
            plinth_height: 0.0,
            panel_thickness: PanelThickness::default(),
            back_thickness: BackThickness::default(),
            front_grain: GrainDirection::default(),
            hinge_style: HingeStyle::default(),
            slide_type: SlideType::default(),
            sliding_door_kit: false,
            columns: Vec::new(),
        }
    }

    /// Appends a column on the right.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the plinth height.
    #[must_use]
    pub const fn with_plinth(mut self, plinth_height: f64) -> Self {
        self.plinth_height = plinth_height;
        self
    }

    /// Sets the carcass board thickness.
    #[must_use]
    pub const fn with_panel_thickness(mut self, thickness: PanelThickness) -> Self {
        self.panel_thickness = thickness;
        self
    }

    /// Number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Parses a cabinet from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not describe a cabinet.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        serde_json::from_str(json).map_err(|source| LayoutError::Parse { source })
    }

    /// Reads and parses a cabinet layout file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LayoutError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

/// How a column is divided vertically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColumnSpec {
    /// One slot over the full usable height.
    Whole {
        /// Slot content.
        slot: Component,
    },
    /// Two slots separated by a fixed shelf.
    Split {
        /// Height of the lower slot (mm).
        lower_height: f64,
        /// Lower slot content.
        lower: Component,
        /// Upper slot content.
        upper: Component,
    },
}

impl ColumnSpec {
    /// A whole-height column.
    #[must_use]
    pub const fn whole(slot: Component) -> Self {
        Self::Whole { slot }
    }

    /// A split column with an explicit lower slot height.
    #[must_use]
    pub const fn split(lower_height: f64, lower: Component, upper: Component) -> Self {
        Self::Split {
            lower_height,
            lower,
            upper,
        }
    }
}

/// Content of one slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    /// Nothing fitted.
    Empty,
    /// Stack of drawers.
    DrawerBank(DrawerBank),
    /// One or two door leaves, optionally with interior content.
    Door(Door),
    /// Adjustable shelves on pins.
    ShelfBank(ShelfBank),
    /// Wardrobe rod.
    HangingRod(HangingRod),
    /// Grid of open cubbies.
    CubeGrid(CubeGrid),
}

impl Component {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::DrawerBank(_) => "drawer bank",
            Self::Door(_) => "door",
            Self::ShelfBank(_) => "shelf bank",
            Self::HangingRod(_) => "hanging rod",
            Self::CubeGrid(_) => "cube grid",
        }
    }

    /// Whether the slot is unoccupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Drawer bank parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerBank {
    /// Number of drawers, stacked with 3 mm gaps.
    pub count: u32,
    /// Manual drawer-box side height (mm); chosen from the standard ladder when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_height: Option<f64>,
}

impl DrawerBank {
    /// A bank of `count` drawers with automatic side height.
    #[must_use]
    pub const fn new(count: u32) -> Self {
        Self {
            count,
            side_height: None,
        }
    }
}

/// Number of door leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DoorLeaves {
    /// One leaf.
    #[default]
    Single,
    /// Two leaves meeting in the centre.
    Double,
}

impl DoorLeaves {
    /// Number of leaves as a count.
    #[must_use]
    pub const fn count(self) -> u32 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
        }
    }
}

impl TryFrom<u8> for DoorLeaves {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Single),
            2 => Ok(Self::Double),
            other => Err(format!("invalid leaf count {other}: must be 1 or 2")),
        }
    }
}

impl From<DoorLeaves> for u8 {
    fn from(value: DoorLeaves) -> Self {
        match value {
            DoorLeaves::Single => 1,
            DoorLeaves::Double => 2,
        }
    }
}

/// Side a single leaf is hinged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HingeSide {
    /// Hinged on the left.
    #[default]
    Left,
    /// Hinged on the right.
    Right,
}

impl fmt::Display for HingeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// How the door opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningStyle {
    /// Side-hinged swing door.
    #[default]
    Hinged,
    /// Top-hinged, lifts up on a gas strut.
    FlipUp,
    /// Bottom-hinged, folds down on a stay.
    FlipDown,
}

impl OpeningStyle {
    /// Whether this is one of the flap styles.
    #[must_use]
    pub const fn is_flip(self) -> bool {
        matches!(self, Self::FlipUp | Self::FlipDown)
    }
}

/// How the door sits relative to the carcass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MountStyle {
    /// Door face covers the carcass edges.
    #[default]
    Overlay,
    /// Door sits flush inside the opening.
    Inset,
}

/// Door parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Door {
    /// One or two leaves.
    #[serde(default)]
    pub leaves: DoorLeaves,
    /// Hinge side for single-leaf doors.
    #[serde(default)]
    pub hinge_side: HingeSide,
    /// Opening style.
    #[serde(default)]
    pub opening: OpeningStyle,
    /// Mount style.
    #[serde(default)]
    pub mount: MountStyle,
    /// Leaf height (mm); the slot height when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Content fitted behind the door.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interior: Option<Box<Component>>,
}

impl Door {
    /// A door filling its slot.
    #[must_use]
    pub const fn new(leaves: DoorLeaves, mount: MountStyle) -> Self {
        Self {
            leaves,
            hinge_side: HingeSide::Left,
            opening: OpeningStyle::Hinged,
            mount,
            height: None,
            interior: None,
        }
    }

    /// Sets an explicit leaf height.
    #[must_use]
    pub const fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Sets the opening style.
    #[must_use]
    pub const fn with_opening(mut self, opening: OpeningStyle) -> Self {
        self.opening = opening;
        self
    }

    /// Fits interior content behind the door.
    #[must_use]
    pub fn with_interior(mut self, interior: Component) -> Self {
        self.interior = Some(Box::new(interior));
        self
    }
}

/// Shelf bank parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShelfBank {
    /// Number of adjustable shelves.
    pub count: u32,
}

/// Hanging rod (no parameters; sized from the column).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HangingRod {}

/// Cube grid parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeGrid {
    /// Number of cubby rows.
    pub rows: u32,
    /// Number of cubby columns.
    pub cols: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_cabinet() {
        let json = r#"{
            "width": 600, "height": 720, "depth": 560,
            "columns": [{ "mode": "whole", "slot": { "kind": "empty" } }]
        }"#;
        let spec = CabinetSpec::from_json(json).unwrap();
        assert_eq!(spec.panel_thickness, PanelThickness::T18);
        assert_eq!(spec.back_thickness, BackThickness::T3);
        assert_eq!(spec.front_grain, GrainDirection::Vertical);
        assert!(spec.plinth_height.abs() < f64::EPSILON);
        assert_eq!(spec.columns, vec![ColumnSpec::whole(Component::Empty)]);
    }

    #[test]
    fn parse_door_with_interior() {
        let json = r#"{
            "width": 900, "height": 2000, "depth": 550, "panel_thickness": 15,
            "columns": [{
                "mode": "whole",
                "slot": {
                    "kind": "door", "leaves": 2, "mount": "inset",
                    "interior": { "kind": "shelf_bank", "count": 4 }
                }
            }]
        }"#;
        let spec = CabinetSpec::from_json(json).unwrap();
        let ColumnSpec::Whole { slot: Component::Door(door) } = &spec.columns[0] else {
            panic!("Expected whole column with a door");
        };
        assert_eq!(door.leaves, DoorLeaves::Double);
        assert_eq!(door.mount, MountStyle::Inset);
        assert_eq!(door.opening, OpeningStyle::Hinged);
        assert_eq!(
            door.interior.as_deref(),
            Some(&Component::ShelfBank(ShelfBank { count: 4 }))
        );
    }

    #[test]
    fn parse_split_column() {
        let json = r#"{
            "mode": "split", "lower_height": 800,
            "lower": { "kind": "drawer_bank", "count": 4, "side_height": 150 },
            "upper": { "kind": "cube_grid", "rows": 2, "cols": 3 }
        }"#;
        let column: ColumnSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            column,
            ColumnSpec::split(
                800.0,
                Component::DrawerBank(DrawerBank {
                    count: 4,
                    side_height: Some(150.0)
                }),
                Component::CubeGrid(CubeGrid { rows: 2, cols: 3 }),
            )
        );
    }

    #[test]
    fn reject_three_leaves() {
        let json = r#"{ "kind": "door", "leaves": 3 }"#;
        assert!(serde_json::from_str::<Component>(json).is_err());
    }

    #[test]
    fn reject_unknown_kind() {
        let json = r#"{ "kind": "wine_rack" }"#;
        assert!(serde_json::from_str::<Component>(json).is_err());
    }

    #[test]
    fn reject_unknown_cabinet_field() {
        let json = r#"{ "width": 1, "height": 1, "depth": 1, "columns": [], "colour": "oak" }"#;
        assert!(CabinetSpec::from_json(json).is_err());
    }

    #[test]
    fn builder_matches_json() {
        let built = CabinetSpec::new(600.0, 720.0, 560.0)
            .with_plinth(100.0)
            .with_column(ColumnSpec::whole(Component::HangingRod(HangingRod {})));
        let json = serde_json::to_string(&built).unwrap();
        let parsed = CabinetSpec::from_json(&json).unwrap();
        assert_eq!(built, parsed);
    }
}
