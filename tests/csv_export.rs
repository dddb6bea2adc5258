//! Integration tests for CSV cut-sheet export.

use cabinet_cutlist_mcp::engine::layout::{
    CabinetSpec, ColumnSpec, Component, Door, DoorLeaves, DrawerBank, MountStyle, ShelfBank,
};
use cabinet_cutlist_mcp::engine::{compute_cut_list, Catalog, CutList};
use cabinet_cutlist_mcp::error::ExportError;
use cabinet_cutlist_mcp::export::{to_csv, write_csv_file};
use tempfile::tempdir;

fn base_unit() -> CutList {
    let spec = CabinetSpec::new(800.0, 870.0, 560.0)
        .with_plinth(100.0)
        .with_column(ColumnSpec::whole(Component::DrawerBank(DrawerBank::new(3))))
        .with_column(ColumnSpec::whole(Component::Door(
            Door::new(DoorLeaves::Single, MountStyle::Overlay)
                .with_interior(Component::ShelfBank(ShelfBank { count: 1 })),
        )));
    compute_cut_list(&spec, &Catalog::default())
}

fn read_records(csv: &str) -> Vec<Vec<String>> {
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv.as_bytes())
        .records()
        .map(|r| r.expect("Malformed CSV record").iter().map(String::from).collect())
        .collect()
}

#[test]
fn test_every_piece_has_a_row() {
    let cut_list = base_unit();
    assert!(cut_list.is_valid, "{:?}", cut_list.diagnostics);

    let records = read_records(&to_csv(&cut_list, 1.0).expect("Export failed"));
    let hardware_at = records
        .iter()
        .position(|r| r[0] == "Hardware")
        .expect("No hardware section");

    // title and header precede the piece rows
    let piece_rows = &records[2..hardware_at];
    assert_eq!(piece_rows.len(), cut_list.pieces.len());
    for (row, piece) in piece_rows.iter().zip(&cut_list.pieces) {
        assert_eq!(row.len(), 9);
        assert_eq!(row[4], format!("{:.1}", piece.material.thickness()));
        assert_eq!(row[0], piece.name);
        assert_eq!(row[1], piece.quantity.to_string());
    }
}

#[test]
fn test_hardware_ends_with_global_lines() {
    let cut_list = base_unit();
    let records = read_records(&to_csv(&cut_list, 1.0).expect("Export failed"));

    let hardware_at = records.iter().position(|r| r[0] == "Hardware").unwrap();
    let sheets_at = records.iter().position(|r| r[0] == "Sheets").unwrap();
    let items: Vec<&str> = records[hardware_at + 2..sheets_at]
        .iter()
        .map(|r| r[0].as_str())
        .collect();

    assert_eq!(items.len(), cut_list.hardware.len());
    assert_eq!(
        &items[items.len() - 2..],
        &["Structural screw", "Edge banding"]
    );
    assert!(items.iter().any(|i| i.starts_with("Hinge")));
    assert!(items.contains(&"Shelf pin"));
}

#[test]
fn test_totals_match_cut_list() {
    let cut_list = base_unit();
    let records = read_records(&to_csv(&cut_list, 1.4).expect("Export failed"));

    let cost = records.iter().find(|r| r[0] == "cost_estimate").unwrap();
    let quote = records.iter().find(|r| r[0] == "quoted_price").unwrap();
    assert_eq!(cost[1], format!("{:.2}", cut_list.cost_estimate));
    assert_eq!(quote[1], format!("{:.2}", cut_list.cost_estimate * 1.4));
}

#[test]
fn test_write_file() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("base_unit.csv");
    let cut_list = base_unit();

    write_csv_file(&cut_list, 1.0, &file_path).expect("Failed to write");

    let written = std::fs::read_to_string(&file_path).expect("Failed to read");
    assert_eq!(written, to_csv(&cut_list, 1.0).unwrap());
}

#[test]
fn test_invalid_cut_list_is_not_written() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("invalid.csv");
    let spec = CabinetSpec::new(600.0, 336.0, 550.0)
        .with_column(ColumnSpec::whole(Component::DrawerBank(DrawerBank::new(10))));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    let err = write_csv_file(&cut_list, 1.0, &file_path).unwrap_err();
    assert!(matches!(err, ExportError::InvalidResult { errors: 1 }));
    assert!(!file_path.exists());
}

#[test]
fn test_missing_directory_is_an_io_error() {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("no_such_dir").join("out.csv");

    let err = write_csv_file(&base_unit(), 1.0, &file_path).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
}
