//! End-to-end cut-list scenarios and boundary conditions.
//!
//! These tests drive `compute_cut_list` through the public API only, the way
//! a caller embedding the engine would.

use cabinet_cutlist_mcp::engine::layout::{
    CabinetSpec, ColumnSpec, Component, CubeGrid, Door, DoorLeaves, DrawerBank, HangingRod,
    MountStyle, ShelfBank,
};
use cabinet_cutlist_mcp::engine::resolver;
use cabinet_cutlist_mcp::engine::{
    compute_cut_list, validate_cabinet, Catalog, Category, CutList, DiagnosticKind, Piece,
};

fn pieces_named<'a>(cut_list: &'a CutList, name: &str) -> Vec<&'a Piece> {
    cut_list.pieces.iter().filter(|p| p.name == name).collect()
}

fn quantity_of(cut_list: &CutList, name: &str) -> u32 {
    pieces_named(cut_list, name).iter().map(|p| p.quantity).sum()
}

fn has_kind(cut_list: &CutList, kind: DiagnosticKind) -> bool {
    cut_list.diagnostics.iter().any(|d| d.kind == kind)
}

fn drawer_column(count: u32) -> ColumnSpec {
    ColumnSpec::whole(Component::DrawerBank(DrawerBank::new(count)))
}

// =============================================================================
// Reference Scenarios
// =============================================================================

#[test]
fn test_two_drawer_columns() {
    let spec = CabinetSpec::new(1200.0, 2000.0, 550.0)
        .with_column(drawer_column(6))
        .with_column(drawer_column(6));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(cut_list.is_valid, "{:?}", cut_list.diagnostics);

    let side = pieces_named(&cut_list, "Side");
    assert_eq!(side.len(), 1);
    assert_eq!(side[0].quantity, 2);
    assert!((side[0].length - 2000.0).abs() < 1e-9);
    assert!((side[0].width - 550.0).abs() < 1e-9);

    assert_eq!(quantity_of(&cut_list, "Top/Bottom"), 2);
    assert_eq!(quantity_of(&cut_list, "Back"), 1);
    assert_eq!(quantity_of(&cut_list, "Vertical Divider"), 1);
    assert_eq!(quantity_of(&cut_list, "Drawer Front"), 12);
    assert_eq!(quantity_of(&cut_list, "Drawer Box Side"), 24);

    // 1964 mm of column shared by six fronts and five gaps
    let front = pieces_named(&cut_list, "Drawer Front")[0];
    assert!((front.length - (1964.0 - 15.0) / 6.0).abs() < 0.01);
    assert!((front.width - (573.0 - 4.0)).abs() < 0.01);

    assert!(!cut_list
        .hardware
        .iter()
        .any(|h| h.item.starts_with("Hinge")));
}

#[test]
fn test_double_door_leaves_and_hinges() {
    // 936 mm cabinet leaves a 900 mm hueco
    let door = Door::new(DoorLeaves::Double, MountStyle::Overlay).with_height(1800.0);
    let spec = CabinetSpec::new(936.0, 2000.0, 550.0)
        .with_column(ColumnSpec::whole(Component::Door(door)));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(cut_list.is_valid, "{:?}", cut_list.diagnostics);

    let leaves = pieces_named(&cut_list, "Door Leaf");
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].quantity, 2);
    assert!((leaves[0].width - (896.0 - 2.0) / 2.0).abs() < 1e-9);
    assert!((leaves[0].length - 1800.0).abs() < 1e-9);

    // 1800 mm falls in the [1600, 2100) band: four per leaf
    let hinges: f64 = cut_list
        .hardware
        .iter()
        .filter(|h| h.item.starts_with("Hinge"))
        .map(|h| h.quantity)
        .sum();
    assert!((hinges - 8.0).abs() < f64::EPSILON);
}

#[test]
fn test_too_many_drawers_for_envelope() {
    // 336 mm cabinet leaves a 300 mm whole-column envelope
    let spec = CabinetSpec::new(600.0, 336.0, 550.0).with_column(drawer_column(10));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(!cut_list.is_valid);
    let error = cut_list.errors().next().unwrap();
    assert_eq!(error.kind, DiagnosticKind::FrontTooSmall);
    assert_eq!(error.category(), Category::DrawerInfeasible);
    assert_eq!(error.column_index, Some(0));

    assert_eq!(quantity_of(&cut_list, "Drawer Front"), 10);
    assert_eq!(quantity_of(&cut_list, "Drawer Box Side"), 0);
    assert_eq!(quantity_of(&cut_list, "Drawer Box Bottom"), 0);
    assert!(!cut_list
        .hardware
        .iter()
        .any(|h| h.item.starts_with("Drawer slide")));
}

// =============================================================================
// Boundary Tests
// =============================================================================

#[test]
fn test_front_height_boundary() {
    // Two drawers, one 3 mm gap: 143 mm of envelope gives exactly 70 mm fronts
    let at_limit = CabinetSpec::new(600.0, 179.0, 550.0).with_column(drawer_column(2));
    let cut_list = compute_cut_list(&at_limit, &Catalog::default());
    assert!(!has_kind(&cut_list, DiagnosticKind::FrontTooSmall));

    let below = CabinetSpec::new(600.0, 178.98, 550.0).with_column(drawer_column(2));
    let cut_list = compute_cut_list(&below, &Catalog::default());
    let error = cut_list.errors().next().unwrap();
    assert_eq!(error.kind, DiagnosticKind::FrontTooSmall);
    assert_eq!(error.category(), Category::DrawerInfeasible);
}

#[test]
fn test_hueco_width_boundary() {
    let at_limit =
        CabinetSpec::new(186.0, 720.0, 550.0).with_column(ColumnSpec::whole(Component::Empty));
    let cut_list = compute_cut_list(&at_limit, &Catalog::default());
    assert!(cut_list.is_valid, "{:?}", cut_list.diagnostics);

    let below =
        CabinetSpec::new(185.99, 720.0, 550.0).with_column(ColumnSpec::whole(Component::Empty));
    let cut_list = compute_cut_list(&below, &Catalog::default());
    assert!(!cut_list.is_valid);
    assert_eq!(cut_list.diagnostics.len(), 1);
    assert_eq!(cut_list.diagnostics[0].kind, DiagnosticKind::HuecoTooNarrow);
    assert_eq!(
        cut_list.diagnostics[0].category(),
        Category::StructuralInfeasible
    );
    assert!(cut_list.pieces.is_empty());
}

#[test]
fn test_degenerate_dimensions() {
    for (width, height, depth) in [
        (0.0, 720.0, 550.0),
        (600.0, -1.0, 550.0),
        (600.0, 720.0, f64::NAN),
        (600.0, 30.0, 550.0),
    ] {
        let spec = CabinetSpec::new(width, height, depth)
            .with_column(ColumnSpec::whole(Component::Empty));
        let diagnostics = validate_cabinet(&spec, &Catalog::default());
        assert_eq!(diagnostics.len(), 1, "{width} x {height} x {depth}");
        assert_eq!(diagnostics[0].category(), Category::StructuralInfeasible);
    }
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_single_column_width_is_inner_width() {
    for width in [186.0, 450.0, 600.5, 1000.0, 2400.0] {
        let spec =
            CabinetSpec::new(width, 720.0, 550.0).with_column(ColumnSpec::whole(Component::Empty));
        let skeleton = resolver::resolve(&spec).unwrap();
        let total: f64 = skeleton.column_widths().iter().sum();
        assert!(
            (total - skeleton.inner_width).abs() < f64::EPSILON,
            "width {width}"
        );
    }
}

#[test]
fn test_fronts_and_gaps_fill_envelope() {
    for height in [720.0, 870.0, 1234.5, 2000.0] {
        for count in 1..=6u32 {
            let spec = CabinetSpec::new(600.0, height, 560.0).with_column(drawer_column(count));
            let cut_list = compute_cut_list(&spec, &Catalog::default());
            let Some(front) = pieces_named(&cut_list, "Drawer Front").first().copied() else {
                panic!("no drawer front for {count} drawers in {height} mm");
            };

            let n = f64::from(count);
            let filled = front.length * n + (n - 1.0) * 3.0;
            assert!((filled - (height - 36.0)).abs() < 0.01, "{count} x {height}");
        }
    }
}

#[test]
fn test_identical_inputs_give_identical_lists() {
    let spec = CabinetSpec::new(1800.0, 2100.0, 600.0)
        .with_plinth(80.0)
        .with_column(ColumnSpec::split(
            760.0,
            Component::DrawerBank(DrawerBank::new(3)),
            Component::HangingRod(HangingRod {}),
        ))
        .with_column(ColumnSpec::whole(Component::Door(
            Door::new(DoorLeaves::Single, MountStyle::Inset)
                .with_interior(Component::ShelfBank(ShelfBank { count: 5 })),
        )))
        .with_column(ColumnSpec::whole(Component::CubeGrid(CubeGrid {
            rows: 4,
            cols: 2,
        })));
    let catalog = Catalog::default();

    let first = compute_cut_list(&spec, &catalog);
    let second = compute_cut_list(&spec, &catalog);
    assert!(first.is_valid, "{:?}", first.diagnostics);
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_computations_agree() {
    let spec = CabinetSpec::new(1200.0, 2000.0, 550.0)
        .with_column(drawer_column(4))
        .with_column(ColumnSpec::whole(Component::ShelfBank(ShelfBank {
            count: 6,
        })));
    let catalog = Catalog::default();
    let expected = compute_cut_list(&spec, &catalog);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| compute_cut_list(&spec, &catalog)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_error_in_one_column_keeps_others() {
    let spec = CabinetSpec::new(1200.0, 2000.0, 550.0)
        .with_column(ColumnSpec::whole(Component::CubeGrid(CubeGrid {
            rows: 40,
            cols: 1,
        })))
        .with_column(ColumnSpec::whole(Component::HangingRod(HangingRod {})));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(!cut_list.is_valid);
    assert_eq!(cut_list.errors().count(), 1);
    assert_eq!(cut_list.errors().next().unwrap().column_index, Some(0));
    assert!(cut_list.hardware.iter().any(|h| h.item == "Hanging rod"));
}

#[test]
fn test_shallow_cabinet_rejects_interior_parts() {
    let door = Door::new(DoorLeaves::Single, MountStyle::Inset)
        .with_interior(Component::ShelfBank(ShelfBank { count: 2 }));
    let spec = CabinetSpec::new(600.0, 720.0, 50.0)
        .with_column(ColumnSpec::whole(Component::Door(door)));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(!cut_list.is_valid);
    assert_eq!(
        cut_list.errors().next().unwrap().category(),
        Category::SlotOverflow
    );
    assert_eq!(quantity_of(&cut_list, "Shelf"), 0);
    assert!(cut_list
        .pieces
        .iter()
        .all(|p| p.length > 0.0 && p.width > 0.0));

    let open_shelves = CabinetSpec::new(600.0, 720.0, 60.0)
        .with_column(ColumnSpec::whole(Component::ShelfBank(ShelfBank { count: 1 })));
    assert!(!compute_cut_list(&open_shelves, &Catalog::default()).is_valid);
}

#[test]
fn test_door_interior_follows_door_height() {
    let door = Door::new(DoorLeaves::Single, MountStyle::Overlay)
        .with_height(800.0)
        .with_interior(Component::CubeGrid(CubeGrid { rows: 2, cols: 2 }));
    let spec = CabinetSpec::new(600.0, 2000.0, 550.0)
        .with_column(ColumnSpec::whole(Component::Door(door)));
    let cut_list = compute_cut_list(&spec, &Catalog::default());

    assert!(cut_list.is_valid, "{:?}", cut_list.diagnostics);
    let vertical = pieces_named(&cut_list, "Cube Vertical Divider")[0];
    assert!((vertical.length - 800.0).abs() < 1e-9);
}
