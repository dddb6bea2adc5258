//! Material choices, hardware families and the price/clearance tables.
//!
//! The catalog is a plain value handed to the engine on every call. Its
//! defaults reflect the stock a typical melamine shop works with:
//!
//! - **Panels**: melamine board in 15, 18 or 25 mm
//! - **Backs**: 3 mm hardboard, 5.5 mm MDF or 18 mm melamine
//! - **Hinges**: 35 mm cup hinges in three overlay classes (codo 0/9/18)
//! - **Slides**: telescopic, undermount or roller runners
//!
//! Any table can be overridden from the configuration file; fields that are
//! not mentioned keep their default.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Carcass panel thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum PanelThickness {
    /// 15 mm board.
    T15,
    /// 18 mm board, the shop standard.
    #[default]
    T18,
    /// 25 mm board.
    T25,
}

impl PanelThickness {
    /// Thickness in millimetres.
    #[must_use]
    pub const fn mm(self) -> f64 {
        match self {
            Self::T15 => 15.0,
            Self::T18 => 18.0,
            Self::T25 => 25.0,
        }
    }

    /// Melamine board of this thickness.
    #[must_use]
    pub const fn material(self) -> Material {
        match self {
            Self::T15 => Material::Melamine15,
            Self::T18 => Material::Melamine18,
            Self::T25 => Material::Melamine25,
        }
    }
}

impl TryFrom<f64> for PanelThickness {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        match value {
            v if (v - 15.0).abs() < f64::EPSILON => Ok(Self::T15),
            v if (v - 18.0).abs() < f64::EPSILON => Ok(Self::T18),
            v if (v - 25.0).abs() < f64::EPSILON => Ok(Self::T25),
            other => Err(format!(
                "invalid panel thickness {other}: must be one of 15, 18, 25"
            )),
        }
    }
}

impl From<PanelThickness> for f64 {
    fn from(value: PanelThickness) -> Self {
        value.mm()
    }
}

/// Back panel thickness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum BackThickness {
    /// 3 mm hardboard (fibrofácil).
    #[default]
    T3,
    /// 5.5 mm MDF.
    T5_5,
    /// 18 mm melamine, for freestanding or structural backs.
    T18,
}

impl BackThickness {
    /// Thickness in millimetres.
    #[must_use]
    pub const fn mm(self) -> f64 {
        match self {
            Self::T3 => 3.0,
            Self::T5_5 => 5.5,
            Self::T18 => 18.0,
        }
    }

    /// Board the back panel is cut from.
    #[must_use]
    pub const fn material(self) -> Material {
        match self {
            Self::T3 => Material::Hardboard3,
            Self::T5_5 => Material::Mdf5_5,
            Self::T18 => Material::Melamine18,
        }
    }
}

impl TryFrom<f64> for BackThickness {
    type Error = String;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        match value {
            v if (v - 3.0).abs() < f64::EPSILON => Ok(Self::T3),
            v if (v - 5.5).abs() < f64::EPSILON => Ok(Self::T5_5),
            v if (v - 18.0).abs() < f64::EPSILON => Ok(Self::T18),
            other => Err(format!(
                "invalid back thickness {other}: must be one of 3, 5.5, 18"
            )),
        }
    }
}

impl From<BackThickness> for f64 {
    fn from(value: BackThickness) -> Self {
        value.mm()
    }
}

/// Sheet material a piece is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Material {
    /// 15 mm melamine-faced particle board.
    #[serde(rename = "melamine_15")]
    Melamine15,
    /// 18 mm melamine-faced particle board.
    #[serde(rename = "melamine_18")]
    Melamine18,
    /// 25 mm melamine-faced particle board.
    #[serde(rename = "melamine_25")]
    Melamine25,
    /// 3 mm hardboard.
    #[serde(rename = "hardboard_3")]
    Hardboard3,
    /// 5.5 mm MDF.
    #[serde(rename = "mdf_5_5")]
    Mdf5_5,
}

impl Material {
    /// Board thickness in millimetres.
    #[must_use]
    pub const fn thickness(self) -> f64 {
        match self {
            Self::Melamine15 => 15.0,
            Self::Melamine18 => 18.0,
            Self::Melamine25 => 25.0,
            Self::Hardboard3 => 3.0,
            Self::Mdf5_5 => 5.5,
        }
    }

    /// Whether the board has a melamine face and therefore takes edge banding.
    #[must_use]
    pub const fn is_melamine_faced(self) -> bool {
        matches!(self, Self::Melamine15 | Self::Melamine18 | Self::Melamine25)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Melamine15 => write!(f, "Melamine 15mm"),
            Self::Melamine18 => write!(f, "Melamine 18mm"),
            Self::Melamine25 => write!(f, "Melamine 25mm"),
            Self::Hardboard3 => write!(f, "Hardboard 3mm"),
            Self::Mdf5_5 => write!(f, "MDF 5.5mm"),
        }
    }
}

/// Hinge overlay class ("codo").
///
/// Determines how far the door face sits relative to the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HingeStyle {
    /// Codo 0: full overlay, the door covers the side panel.
    #[default]
    #[serde(rename = "codo_0")]
    Codo0,
    /// Codo 9: half overlay, two doors share one divider.
    #[serde(rename = "codo_9")]
    Codo9,
    /// Codo 18: internal hinge, the door sits inside the carcass.
    #[serde(rename = "codo_18")]
    Codo18,
}

impl fmt::Display for HingeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codo0 => write!(f, "codo 0"),
            Self::Codo9 => write!(f, "codo 9"),
            Self::Codo18 => write!(f, "codo 18"),
        }
    }
}

/// Drawer runner family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideType {
    /// Side-mounted ball-bearing telescopic slides.
    #[default]
    Telescopic,
    /// Concealed undermount runners.
    Undermount,
    /// Budget epoxy roller runners.
    Roller,
}

impl fmt::Display for SlideType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Telescopic => write!(f, "telescopic"),
            Self::Undermount => write!(f, "undermount"),
            Self::Roller => write!(f, "roller"),
        }
    }
}

/// Clearance and price of one slide family.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SlideProfile {
    /// Total width lost to the runners (both sides together, mm).
    pub clearance: f64,
    /// Price of one pair.
    pub unit_cost: f64,
}

/// Slide clearance table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideTable {
    /// Telescopic slides: 12.7 mm per side plus play.
    pub telescopic: SlideProfile,
    /// Undermount runners.
    pub undermount: SlideProfile,
    /// Roller runners.
    pub roller: SlideProfile,
}

impl SlideTable {
    /// Returns the profile for a slide family.
    #[must_use]
    pub const fn get(&self, slide: SlideType) -> &SlideProfile {
        match slide {
            SlideType::Telescopic => &self.telescopic,
            SlideType::Undermount => &self.undermount,
            SlideType::Roller => &self.roller,
        }
    }
}

impl Default for SlideTable {
    fn default() -> Self {
        Self {
            telescopic: SlideProfile {
                clearance: 26.0,
                unit_cost: 9.50,
            },
            undermount: SlideProfile {
                clearance: 10.0,
                unit_cost: 24.00,
            },
            roller: SlideProfile {
                clearance: 25.0,
                unit_cost: 4.20,
            },
        }
    }
}

/// Hinge price table, one entry per overlay class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HingeTable {
    /// Codo 0 unit cost.
    pub codo_0: f64,
    /// Codo 9 unit cost.
    pub codo_9: f64,
    /// Codo 18 unit cost.
    pub codo_18: f64,
}

impl HingeTable {
    /// Unit cost of one hinge of the given class.
    #[must_use]
    pub const fn unit_cost(&self, style: HingeStyle) -> f64 {
        match style {
            HingeStyle::Codo0 => self.codo_0,
            HingeStyle::Codo9 => self.codo_9,
            HingeStyle::Codo18 => self.codo_18,
        }
    }
}

impl Default for HingeTable {
    fn default() -> Self {
        Self {
            codo_0: 2.10,
            codo_9: 2.10,
            codo_18: 2.40,
        }
    }
}

/// Unit prices of the remaining hardware.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriceList {
    /// Drawer assembly screw, per piece.
    pub drawer_screw: f64,
    /// Carcass structural screw, per piece.
    pub structural_screw: f64,
    /// Shelf pin, per piece.
    pub shelf_pin: f64,
    /// Gas strut for flip doors, per piece.
    pub gas_strut: f64,
    /// Oval wardrobe rod, per metre.
    pub hanging_rod_per_m: f64,
    /// Rod end support, per piece.
    pub rod_support: f64,
    /// Edge banding tape, per metre.
    pub edge_banding_per_m: f64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            drawer_screw: 0.03,
            structural_screw: 0.04,
            shelf_pin: 0.05,
            gas_strut: 6.80,
            hanging_rod_per_m: 5.50,
            rod_support: 0.90,
            edge_banding_per_m: 0.45,
        }
    }
}

/// One sheet of board stock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SheetStock {
    /// Sheet length (mm).
    pub length: f64,
    /// Sheet width (mm).
    pub width: f64,
    /// Price per sheet.
    pub price: f64,
}

impl SheetStock {
    /// Creates a sheet entry.
    #[must_use]
    pub const fn new(length: f64, width: f64, price: f64) -> Self {
        Self {
            length,
            width,
            price,
        }
    }

    /// Sheet area in square millimetres.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.length * self.width
    }
}

/// Sheet stock per material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SheetTable {
    /// 15 mm melamine.
    pub melamine_15: SheetStock,
    /// 18 mm melamine.
    pub melamine_18: SheetStock,
    /// 25 mm melamine.
    pub melamine_25: SheetStock,
    /// 3 mm hardboard.
    pub hardboard_3: SheetStock,
    /// 5.5 mm MDF.
    pub mdf_5_5: SheetStock,
}

impl SheetTable {
    /// Returns the stock sheet for a material.
    #[must_use]
    pub const fn get(&self, material: Material) -> &SheetStock {
        match material {
            Material::Melamine15 => &self.melamine_15,
            Material::Melamine18 => &self.melamine_18,
            Material::Melamine25 => &self.melamine_25,
            Material::Hardboard3 => &self.hardboard_3,
            Material::Mdf5_5 => &self.mdf_5_5,
        }
    }

    fn entries(&self) -> [(&'static str, &SheetStock); 5] {
        [
            ("melamine_15", &self.melamine_15),
            ("melamine_18", &self.melamine_18),
            ("melamine_25", &self.melamine_25),
            ("hardboard_3", &self.hardboard_3),
            ("mdf_5_5", &self.mdf_5_5),
        ]
    }
}

impl Default for SheetTable {
    fn default() -> Self {
        Self {
            melamine_15: SheetStock::new(2750.0, 1830.0, 62.0),
            melamine_18: SheetStock::new(2750.0, 1830.0, 71.0),
            melamine_25: SheetStock::new(2750.0, 1830.0, 96.0),
            hardboard_3: SheetStock::new(2440.0, 1830.0, 14.0),
            mdf_5_5: SheetStock::new(2440.0, 1830.0, 21.0),
        }
    }
}

/// Waste allowances applied by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WasteFactors {
    /// Multiplier on net sheet area before rounding up to whole sheets.
    pub sheet: f64,
    /// Multiplier on net edge-banding length.
    pub edge_banding: f64,
}

impl Default for WasteFactors {
    fn default() -> Self {
        Self {
            sheet: 1.15,
            edge_banding: 1.2,
        }
    }
}

/// The materials and hardware catalog passed into every computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Catalog {
    /// Slide clearance and price table.
    pub slides: SlideTable,
    /// Hinge price table.
    pub hinges: HingeTable,
    /// Remaining hardware prices.
    pub prices: PriceList,
    /// Sheet stock per material.
    pub sheets: SheetTable,
    /// Waste allowances.
    pub waste: WasteFactors,
}

impl Catalog {
    /// Checks that every table holds physically meaningful values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending entry.
    pub fn validate(&self) -> Result<(), String> {
        for (name, slide) in [
            ("telescopic", &self.slides.telescopic),
            ("undermount", &self.slides.undermount),
            ("roller", &self.slides.roller),
        ] {
            if !slide.clearance.is_finite() || slide.clearance < 0.0 {
                return Err(format!("slide '{name}' clearance must be >= 0"));
            }
            check_price(&format!("slides.{name}.unit_cost"), slide.unit_cost)?;
        }

        check_price("hinges.codo_0", self.hinges.codo_0)?;
        check_price("hinges.codo_9", self.hinges.codo_9)?;
        check_price("hinges.codo_18", self.hinges.codo_18)?;

        let p = &self.prices;
        for (name, value) in [
            ("drawer_screw", p.drawer_screw),
            ("structural_screw", p.structural_screw),
            ("shelf_pin", p.shelf_pin),
            ("gas_strut", p.gas_strut),
            ("hanging_rod_per_m", p.hanging_rod_per_m),
            ("rod_support", p.rod_support),
            ("edge_banding_per_m", p.edge_banding_per_m),
        ] {
            check_price(&format!("prices.{name}"), value)?;
        }

        for (name, sheet) in self.sheets.entries() {
            if !(sheet.length > 0.0 && sheet.width > 0.0) {
                return Err(format!("sheet '{name}' dimensions must be positive"));
            }
            check_price(&format!("sheets.{name}.price"), sheet.price)?;
        }

        if !(self.waste.sheet >= 1.0) {
            return Err("waste.sheet must be >= 1.0".to_string());
        }
        if !(self.waste.edge_banding >= 1.0) {
            return Err("waste.edge_banding must be >= 1.0".to_string());
        }

        Ok(())
    }
}

fn check_price(name: &str, value: f64) -> Result<(), String> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(format!("{name} must be a non-negative price"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_thickness_from_number() {
        assert_eq!(PanelThickness::try_from(15.0), Ok(PanelThickness::T15));
        assert_eq!(PanelThickness::try_from(18.0), Ok(PanelThickness::T18));
        assert_eq!(PanelThickness::try_from(25.0), Ok(PanelThickness::T25));
        assert!(PanelThickness::try_from(16.0).is_err());
    }

    #[test]
    fn back_thickness_from_json() {
        let back: BackThickness = serde_json::from_str("5.5").unwrap();
        assert_eq!(back, BackThickness::T5_5);
        assert_eq!(back.material(), Material::Mdf5_5);
        assert!(serde_json::from_str::<BackThickness>("4").is_err());
    }

    #[test]
    fn thickness_serialises_as_number() {
        let json = serde_json::to_string(&PanelThickness::T25).unwrap();
        assert_eq!(json, "25.0");
    }

    #[test]
    fn melamine_faced_materials() {
        assert!(Material::Melamine18.is_melamine_faced());
        assert!(!Material::Hardboard3.is_melamine_faced());
        assert!(!Material::Mdf5_5.is_melamine_faced());
        assert_eq!(BackThickness::T18.material(), Material::Melamine18);
    }

    #[test]
    fn slide_lookup() {
        let table = SlideTable::default();
        assert!((table.get(SlideType::Telescopic).clearance - 26.0).abs() < f64::EPSILON);
        assert!(table.get(SlideType::Undermount).clearance < table.get(SlideType::Roller).clearance);
    }

    #[test]
    fn default_catalog_is_valid() {
        assert!(Catalog::default().validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let json = r#"{"prices": {"shelf_pin": 0.10}, "waste": {"sheet": 1.3}}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        assert!((catalog.prices.shelf_pin - 0.10).abs() < f64::EPSILON);
        assert!((catalog.prices.gas_strut - 6.80).abs() < f64::EPSILON);
        assert!((catalog.waste.sheet - 1.3).abs() < f64::EPSILON);
        assert!((catalog.waste.edge_banding - 1.2).abs() < f64::EPSILON);
    }

    #[test]
    fn reject_negative_price() {
        let mut catalog = Catalog::default();
        catalog.prices.gas_strut = -1.0;
        let err = catalog.validate().unwrap_err();
        assert!(err.contains("gas_strut"));
    }

    #[test]
    fn reject_waste_below_one() {
        let mut catalog = Catalog::default();
        catalog.waste.edge_banding = 0.9;
        assert!(catalog.validate().is_err());
    }
}
