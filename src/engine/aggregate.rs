//! Cut-list aggregation and costing.
//!
//! Identical pieces from different columns are merged into a single line,
//! hardware is totalled per item, and two global lines are appended: the
//! structural screws holding the carcass together and the edge-banding tape.
//! Sheet counts are a rough area estimate, not a nesting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::engine::catalog::{Catalog, Material};
use crate::engine::expanders::{EdgeBanding, Grain, HardwareLine, Piece, Unit};

/// Structural screws per cut piece.
pub const SCREWS_PER_PIECE: u32 = 4;

/// Estimated board consumption for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetEstimate {
    /// Board material.
    pub material: Material,
    /// Net face area of all pieces (m²).
    pub net_area_m2: f64,
    /// Whole sheets to buy, waste included.
    pub sheets: u32,
    /// Price per sheet.
    pub sheet_price: f64,
}

impl SheetEstimate {
    /// Cost of the sheets.
    #[must_use]
    pub fn cost(&self) -> f64 {
        f64::from(self.sheets) * self.sheet_price
    }
}

/// Aggregated lists and totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Totals {
    /// Merged pieces.
    pub pieces: Vec<Piece>,
    /// Merged hardware, global lines last.
    pub hardware: Vec<HardwareLine>,
    /// Sheets per material, in order of first appearance.
    pub sheets: Vec<SheetEstimate>,
    /// Edge banding to buy, waste included (m).
    pub edge_banding_m: f64,
    /// Sheets plus hardware.
    pub cost_estimate: f64,
}

/// Pieces are merged when these match.
#[derive(Debug, PartialEq, Eq, Hash)]
struct PieceKey {
    name: String,
    length: i64,
    width: i64,
    material: Material,
    grain: Grain,
    banding: EdgeBanding,
}

impl PieceKey {
    #[allow(clippy::cast_possible_truncation)]
    fn of(piece: &Piece) -> Self {
        // Dimensions compare at 0.01 mm resolution
        Self {
            name: piece.name.clone(),
            length: (piece.length * 100.0).round() as i64,
            width: (piece.width * 100.0).round() as i64,
            material: piece.material,
            grain: piece.grain,
            banding: piece.edge_banding,
        }
    }
}

/// Merges identical pieces, summing quantities in order of first appearance.
#[must_use]
pub fn merge_pieces(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut merged: IndexMap<PieceKey, Piece> = IndexMap::new();
    for piece in pieces {
        if piece.quantity == 0 {
            continue;
        }
        merged
            .entry(PieceKey::of(&piece))
            .and_modify(|existing| existing.quantity += piece.quantity)
            .or_insert(piece);
    }
    merged.into_values().collect()
}

/// Merges hardware lines by `(item, unit)`, summing quantities.
#[must_use]
pub fn merge_hardware(lines: Vec<HardwareLine>) -> Vec<HardwareLine> {
    let mut merged: IndexMap<(String, Unit), HardwareLine> = IndexMap::new();
    for line in lines {
        merged
            .entry((line.item.clone(), line.unit))
            .and_modify(|existing| existing.quantity += line.quantity)
            .or_insert(line);
    }
    merged.into_values().collect()
}

/// Edge banding needed for all melamine-faced pieces, waste included (m).
#[must_use]
pub fn edge_banding_metres(pieces: &[Piece], waste: f64) -> f64 {
    let net_mm: f64 = pieces
        .iter()
        .filter(|p| p.material.is_melamine_faced())
        .map(|p| p.perimeter() * f64::from(p.quantity))
        .sum();
    net_mm * waste / 1000.0
}

/// Whole sheets needed per material.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sheet_estimates(pieces: &[Piece], catalog: &Catalog) -> Vec<SheetEstimate> {
    let mut areas: IndexMap<Material, f64> = IndexMap::new();
    for piece in pieces {
        *areas.entry(piece.material).or_insert(0.0) += piece.area() * f64::from(piece.quantity);
    }

    areas
        .into_iter()
        .map(|(material, area)| {
            let stock = catalog.sheets.get(material);
            let sheets = (area * catalog.waste.sheet / stock.area()).ceil().max(0.0) as u32;
            SheetEstimate {
                material,
                net_area_m2: area / 1_000_000.0,
                sheets,
                sheet_price: stock.price,
            }
        })
        .collect()
}

/// Produces the final lists, sheet estimate and cost.
#[must_use]
pub fn aggregate(pieces: Vec<Piece>, hardware: Vec<HardwareLine>, catalog: &Catalog) -> Totals {
    let pieces = merge_pieces(pieces);
    let mut hardware = merge_hardware(hardware);

    let piece_count: u32 = pieces.iter().map(|p| p.quantity).sum();
    let edge_banding_m = edge_banding_metres(&pieces, catalog.waste.edge_banding);

    if piece_count > 0 {
        hardware.push(HardwareLine::new(
            "Structural screw",
            f64::from(piece_count * SCREWS_PER_PIECE),
            Unit::Piece,
            catalog.prices.structural_screw,
        ));
    }
    if edge_banding_m > 0.0 {
        hardware.push(HardwareLine::new(
            "Edge banding",
            edge_banding_m,
            Unit::Metre,
            catalog.prices.edge_banding_per_m,
        ));
    }

    let sheets = sheet_estimates(&pieces, catalog);
    let sheet_cost: f64 = sheets.iter().map(SheetEstimate::cost).sum();
    let hardware_cost: f64 = hardware.iter().map(HardwareLine::total_cost).sum();
    let cost_estimate = sheet_cost + hardware_cost;

    tracing::debug!(
        pieces = pieces.len(),
        hardware = hardware.len(),
        sheet_cost,
        hardware_cost,
        "Aggregated cut list"
    );

    Totals {
        pieces,
        hardware,
        sheets,
        edge_banding_m,
        cost_estimate,
    }
}
