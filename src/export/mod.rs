//! CSV cut-sheet export.
//!
//! A cut sheet is one CSV document with three titled tables (pieces,
//! hardware, sheets) followed by the cost totals. Only valid cut lists are
//! exported: a sheet with blocking diagnostics would send wrong parts to the
//! saw.

use std::path::Path;

use serde::Serialize;

use crate::engine::{CutList, HardwareLine, Piece, SheetEstimate};
use crate::error::ExportError;

#[derive(Serialize)]
struct PieceRow<'a> {
    part: &'a str,
    qty: u32,
    length_mm: String,
    width_mm: String,
    thickness_mm: String,
    material: String,
    grain: String,
    edge_banding: String,
    note: &'a str,
}

impl<'a> From<&'a Piece> for PieceRow<'a> {
    fn from(piece: &'a Piece) -> Self {
        Self {
            part: &piece.name,
            qty: piece.quantity,
            length_mm: format!("{:.1}", piece.length),
            width_mm: format!("{:.1}", piece.width),
            thickness_mm: format!("{:.1}", piece.material.thickness()),
            material: piece.material.to_string(),
            grain: piece.grain.to_string(),
            edge_banding: piece.edge_banding.code(),
            note: piece.note.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct HardwareRow<'a> {
    item: &'a str,
    qty: String,
    unit: String,
    unit_cost: String,
    total: String,
    note: &'a str,
}

impl<'a> From<&'a HardwareLine> for HardwareRow<'a> {
    fn from(line: &'a HardwareLine) -> Self {
        Self {
            item: &line.item,
            qty: format_quantity(line.quantity),
            unit: line.unit.to_string(),
            unit_cost: format!("{:.2}", line.unit_cost),
            total: format!("{:.2}", line.total_cost()),
            note: line.note.as_deref().unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
struct SheetRow {
    material: String,
    net_area_m2: String,
    sheets: u32,
    sheet_price: String,
    total: String,
}

impl From<&SheetEstimate> for SheetRow {
    fn from(sheet: &SheetEstimate) -> Self {
        Self {
            material: sheet.material.to_string(),
            net_area_m2: format!("{:.3}", sheet.net_area_m2),
            sheets: sheet.sheets,
            sheet_price: format!("{:.2}", sheet.sheet_price),
            total: format!("{:.2}", sheet.cost()),
        }
    }
}

const PIECE_HEADER: [&str; 9] = [
    "part",
    "qty",
    "length_mm",
    "width_mm",
    "thickness_mm",
    "material",
    "grain",
    "edge_banding",
    "note",
];
const HARDWARE_HEADER: [&str; 6] = ["item", "qty", "unit", "unit_cost", "total", "note"];
const SHEET_HEADER: [&str; 5] = ["material", "net_area_m2", "sheets", "sheet_price", "total"];

/// Whole counts print without decimals, lengths with two.
fn format_quantity(quantity: f64) -> String {
    if quantity.fract().abs() < f64::EPSILON {
        format!("{quantity:.0}")
    } else {
        format!("{quantity:.2}")
    }
}

/// Renders a cut list as a CSV cut sheet.
///
/// # Errors
///
/// Returns [`ExportError::InvalidResult`] if the cut list has blocking
/// diagnostics, or an error if CSV encoding fails.
pub fn to_csv(cut_list: &CutList, margin: f64) -> Result<String, ExportError> {
    if !cut_list.is_valid {
        return Err(ExportError::InvalidResult {
            errors: cut_list.errors().count(),
        });
    }

    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["Pieces"])?;
    writer.write_record(PIECE_HEADER)?;
    for piece in &cut_list.pieces {
        writer.serialize(PieceRow::from(piece))?;
    }

    writer.write_record(["Hardware"])?;
    writer.write_record(HARDWARE_HEADER)?;
    for line in &cut_list.hardware {
        writer.serialize(HardwareRow::from(line))?;
    }

    writer.write_record(["Sheets"])?;
    writer.write_record(SHEET_HEADER)?;
    for sheet in &cut_list.sheets {
        writer.serialize(SheetRow::from(sheet))?;
    }

    let cost = format!("{:.2}", cut_list.cost_estimate);
    let quote = format!("{:.2}", cut_list.quoted_price(margin));
    writer.write_record(["Totals"])?;
    writer.write_record(["cost_estimate", cost.as_str()])?;
    writer.write_record(["quoted_price", quote.as_str()])?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes a cut sheet to `path`.
///
/// # Errors
///
/// Returns an error if the cut list is invalid or the file cannot be written.
pub fn write_csv_file(cut_list: &CutList, margin: f64, path: &Path) -> Result<(), ExportError> {
    let csv = to_csv(cut_list, margin)?;
    std::fs::write(path, csv).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), pieces = cut_list.pieces.len(), "Exported cut sheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::layout::{CabinetSpec, ColumnSpec, Component, HangingRod};
    use crate::engine::{compute_cut_list, Catalog};

    fn wardrobe() -> CutList {
        let spec = CabinetSpec::new(600.0, 2000.0, 550.0)
            .with_column(ColumnSpec::whole(Component::HangingRod(HangingRod {})));
        compute_cut_list(&spec, &Catalog::default())
    }

    #[test]
    fn sections_in_order() {
        let csv = to_csv(&wardrobe(), 1.0).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Pieces");
        assert_eq!(
            lines[1],
            "part,qty,length_mm,width_mm,thickness_mm,material,grain,edge_banding,note"
        );
        assert!(lines[2].starts_with("Side,2,2000.0,550.0,18.0,Melamine 18mm,length,L1,"));

        let hardware = lines.iter().position(|l| *l == "Hardware").unwrap();
        let sheets = lines.iter().position(|l| *l == "Sheets").unwrap();
        let totals = lines.iter().position(|l| *l == "Totals").unwrap();
        assert!(hardware < sheets && sheets < totals);
        assert!(csv.contains("Hanging rod,0.56,m,5.50"));
        assert!(csv.contains("cut to 559 mm"));
    }

    #[test]
    fn margin_applied_to_quote() {
        let cut_list = wardrobe();
        let csv = to_csv(&cut_list, 2.0).unwrap();
        let expected = format!("quoted_price,{:.2}", cut_list.cost_estimate * 2.0);
        assert!(csv.contains(&expected));
    }

    #[test]
    fn refuses_invalid_cut_list() {
        let spec = CabinetSpec::new(100.0, 2000.0, 550.0)
            .with_column(ColumnSpec::whole(Component::Empty));
        let cut_list = compute_cut_list(&spec, &Catalog::default());
        let err = to_csv(&cut_list, 1.0).unwrap_err();
        assert!(matches!(err, ExportError::InvalidResult { errors: 1 }));
    }

    #[test]
    fn back_panel_thickness_column() {
        let csv = to_csv(&wardrobe(), 1.0).unwrap();
        let back = csv.lines().find(|l| l.starts_with("Back,")).unwrap();
        assert!(back.contains(",3.0,Hardboard 3mm,"));
    }

    #[test]
    fn quantity_formatting() {
        assert_eq!(format_quantity(12.0), "12");
        assert_eq!(format_quantity(0.559), "0.56");
    }
}
