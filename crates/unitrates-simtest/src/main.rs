//! Unit Rates Headless Simulation Harness
//!
//! Validates the pure market logic and the engine's drag/placement
//! behavior without any rendering or input layer. Runs entirely
//! in-process.
//!
//! Usage:
//!   cargo run -p unitrates-simtest
//!   cargo run -p unitrates-simtest -- --verbose

use unitrates_core::prelude::*;
use unitrates_core::systems::Arrival;
use unitrates_logic::drop_zone::{DropTarget, DropZones};
use unitrates_logic::items::{ItemKind, ALL_KINDS};
use unitrates_logic::manifest::{validate_manifest, MarketRecord, Severity};
use unitrates_logic::motion::{Easing, Flight};
use unitrates_logic::numberline::{marker_for, AddOutcome, DoubleNumberLine, MarkerOrigin};
use unitrates_logic::questions::{candidate_quantities, Question};
use unitrates_logic::row::{Row, RowSpec};

use std::cell::Cell;
use std::rc::Rc;

// ── Market manifest (same JSON external tooling uses) ───────────────────
const MANIFEST_JSON: &str = include_str!("../../../data/market_manifest.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn result(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.to_string(),
        passed,
        detail,
    }
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Unit Rates Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Market manifest validation
    results.extend(validate_market_manifest(verbose));

    // 2. Row layout sweep
    results.extend(validate_row_layout(verbose));

    // 3. Motion math
    results.extend(validate_motion(verbose));

    // 4. Drop zones
    results.extend(validate_drop_zones(verbose));

    // 5. Double number line
    results.extend(validate_number_line(verbose));

    // 6. Question logic
    results.extend(validate_questions(verbose));

    // 7. End-to-end engine scenarios
    results.extend(validate_engine_scenarios(verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Market manifest ──────────────────────────────────────────────────

fn validate_market_manifest(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let records: Vec<MarketRecord> = match serde_json::from_str(MANIFEST_JSON) {
        Ok(records) => records,
        Err(e) => {
            results.push(result("manifest_parse", false, format!("JSON error: {}", e)));
            return results;
        }
    };
    results.push(result(
        "manifest_parse",
        true,
        format!("{} records", records.len()),
    ));

    let errors = validate_manifest(&records);
    let hard_errors: Vec<_> = errors
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .collect();
    if verbose {
        for e in &errors {
            println!("  [{}] {}", e.category, e.message);
        }
    }
    results.push(result(
        "manifest_catalog_match",
        hard_errors.is_empty(),
        format!("{} errors, {} total findings", hard_errors.len(), errors.len()),
    ));

    results.push(result(
        "manifest_covers_catalog",
        records.len() == ALL_KINDS.len(),
        format!("{} records for {} kinds", records.len(), ALL_KINDS.len()),
    ));

    results
}

// ── 2. Row layout ───────────────────────────────────────────────────────

fn validate_row_layout(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    // The stock shelf geometry: 4 cells, width 70, spacing 8, center 350.
    let spec = RowSpec {
        center_x: 350.0,
        y: 0.0,
        cell_width: 70.0,
        spacing: 8.0,
        cell_count: 4,
    };
    let mut row: Row<u32> = Row::new(&spec);

    let (x0, _) = row.cell_position(0);
    let (x3, _) = row.cell_position(3);
    let symmetric = ((x0 + x3) / 2.0 - 350.0).abs() < 0.001;
    let spanned = (x3 - x0 - spec.span()).abs() < 0.001;
    results.push(result(
        "row_geometry",
        symmetric && spanned && (spec.delta_x() - 78.0).abs() < 0.001,
        format!("cells {:.0}..{:.0}, delta {:.0}", x0, x3, spec.delta_x()),
    ));

    // Fill via closest-cell search: every cell used exactly once.
    let mut placed = 0;
    for occupant in 0..4u32 {
        if let Some(index) = row.closest_unoccupied_cell(350.0, 0.0) {
            row.put(occupant, index);
            placed += 1;
        }
    }
    let exhausted = row.closest_unoccupied_cell(350.0, 0.0).is_none()
        && row.first_unoccupied_cell().is_none();
    results.push(result(
        "row_fill_exhausts",
        placed == 4 && exhausted,
        format!("{} placed, full row reports no free cell", placed),
    ));

    // Round trip and reset.
    row.clear();
    row.put(7, 2);
    let back_out = row.remove(7);
    row.clear();
    row.clear();
    results.push(result(
        "row_round_trip",
        back_out == 2 && row.occupied_count() == 0,
        "put/remove round trip, double clear stays empty".to_string(),
    ));

    if verbose {
        println!("  row spans {:.1} units", spec.span());
    }
    results
}

// ── 3. Motion ───────────────────────────────────────────────────────────

fn validate_motion(_verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut flight = Flight::new((0.0, 0.0), (300.0, 400.0), 250.0, Easing::QuadOut);
    let mut frames = 0;
    let mut pos = (0.0, 0.0);
    while !flight.is_done() && frames < 1000 {
        pos = flight.advance(1.0 / 60.0);
        frames += 1;
    }
    // 500 units at 250 u/s = 2 s = 120 frames.
    results.push(result(
        "flight_arrival",
        flight.is_done() && pos == (300.0, 400.0) && (119..=121).contains(&frames),
        format!("arrived in {} frames at {:?}", frames, pos),
    ));

    let mid = Easing::QuadOut.apply(0.5);
    results.push(result(
        "easing_decelerates",
        mid > 0.5 && Easing::Linear.apply(0.5) == 0.5,
        format!("quad-out midpoint {:.2}", mid),
    ));

    results
}

// ── 4. Drop zones ───────────────────────────────────────────────────────

fn validate_drop_zones(_verbose: bool) -> Vec<TestResult> {
    let zones = DropZones::new(320.0);
    let ok = zones.choose(100.0) == DropTarget::Scale
        && zones.choose(319.9) == DropTarget::Scale
        && zones.choose(320.0) == DropTarget::Shelf
        && zones.choose(500.0) == DropTarget::Shelf;
    vec![result(
        "drop_zone_threshold",
        ok,
        "y < 320 lands on the scale, otherwise the shelf".to_string(),
    )]
}

// ── 5. Double number line ───────────────────────────────────────────────

fn validate_number_line(_verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut line = DoubleNumberLine::new(15.0);
    let added = line.add(marker_for(0.5, 4.0, MarkerOrigin::Editable));
    let upgraded = line.add(marker_for(0.5, 4.0, MarkerOrigin::Question));
    let rejected = line.add(marker_for(0.5, 99.0, MarkerOrigin::Editable));
    results.push(result(
        "numberline_add_rules",
        added == AddOutcome::Added
            && upgraded == AddOutcome::Upgraded
            && rejected == AddOutcome::OutOfRange,
        format!("{:?}/{:?}/{:?}", added, upgraded, rejected),
    ));

    line.add(marker_for(0.5, 2.0, MarkerOrigin::Editable));
    line.add(marker_for(0.5, 8.0, MarkerOrigin::Scale));
    let undone = line.undo().map(|m| m.quantity);
    line.erase();
    let survivors: Vec<f64> = line.markers().iter().map(|m| m.quantity).collect();
    results.push(result(
        "numberline_undo_erase",
        undone == Some(2.0) && survivors == vec![4.0],
        format!("undo {:?}, erase kept {:?}", undone, survivors),
    ));

    results
}

// ── 6. Questions ────────────────────────────────────────────────────────

fn validate_questions(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    let mut checked = 0;
    let mut consistent = true;
    for kind in ALL_KINDS {
        let data = kind.data();
        for quantity in candidate_quantities(kind) {
            let q = Question::cost_of(kind, quantity);
            // Expected answer is the rounded unit-rate product, and the
            // checker accepts it.
            let expected = (data.unit_rate * quantity * 100.0).round() / 100.0;
            if (q.answer - expected).abs() > 1e-9 || !q.check(expected) {
                consistent = false;
            }
            checked += 1;
        }
        if verbose {
            println!("  {}: {} candidates", data.name, candidate_quantities(kind).len());
        }
    }
    results.push(result(
        "question_answers_consistent",
        consistent,
        format!("{} cost questions checked", checked),
    ));

    let q = Question::quantity_for(ItemKind::Apples, 8.0);
    results.push(result(
        "quantity_for_inverts",
        q.dollars() == 4.0 && q.check(8.0) && !q.check(9.0),
        format!("$4.00 buys {} apples", q.answer),
    ));

    results
}

// ── 7. Engine scenarios ─────────────────────────────────────────────────

fn settle(engine: &mut MarketEngine) -> Vec<Arrival> {
    let mut arrivals = Vec::new();
    for _ in 0..600 {
        arrivals.extend(engine.update(1.0 / 60.0));
        if engine
            .world
            .query::<&unitrates_core::components::Animation>()
            .iter()
            .count()
            == 0
        {
            break;
        }
    }
    arrivals
}

fn validate_engine_scenarios(verbose: bool) -> Vec<TestResult> {
    let mut results = Vec::new();

    // Bag decomposition: one totals notification, items spread over cells.
    {
        let mut engine = MarketEngine::new(SceneConfig::for_kind(ItemKind::Apples));
        let notifications = Rc::new(Cell::new(0u32));
        let notifications_in_cb = Rc::clone(&notifications);
        let _sub = engine
            .subscribe_totals(move |_| notifications_in_cb.set(notifications_in_cb.get() + 1));

        let bag = engine.shelf.bags.occupant_at(0).expect("stocked shelf");
        let grab = engine.world.get::<&Position>(bag).unwrap().point;
        engine.begin_drag(bag, grab);
        engine.end_drag(bag, Vec2::new(350.0, 220.0));
        let arrivals = settle(&mut engine);

        let totals = engine.totals();
        results.push(result(
            "bag_decomposition",
            !engine.world.contains(bag)
                && engine.scale.items.occupied_count() == 5
                && arrivals.len() == 5
                && notifications.get() == 1
                && totals.quantity == 5.0
                && totals.cost == 2.50
                && engine.debug_validate().is_empty(),
            format!(
                "5 items on scale, {} notification(s), totals {:?}",
                notifications.get(),
                totals
            ),
        ));
    }

    // Retarget race: two candy bags released at the same instant over the
    // same cell end up in distinct cells.
    {
        let mut engine = MarketEngine::new(SceneConfig::for_kind(ItemKind::PurpleCandy));
        let bag_a = engine.shelf.bags.occupant_at(0).unwrap();
        let bag_b = engine.shelf.bags.occupant_at(1).unwrap();
        for bag in [bag_a, bag_b] {
            let grab = engine.world.get::<&Position>(bag).unwrap().point;
            engine.begin_drag(bag, grab);
            engine.end_drag(bag, Vec2::new(350.0, 220.0));
        }
        settle(&mut engine);

        let cell_a = engine.scale.bags.index_of(bag_a);
        let cell_b = engine.scale.bags.index_of(bag_b);
        results.push(result(
            "retarget_race",
            cell_a.is_some() && cell_b.is_some() && cell_a != cell_b
                && engine.debug_validate().is_empty(),
            format!("bags settled in cells {:?} and {:?}", cell_a, cell_b),
        ));
    }

    // Reset: construction defaults, twice in a row.
    {
        let mut engine = MarketEngine::new(SceneConfig::for_kind(ItemKind::Carrots));
        let bag = engine.shelf.bags.occupant_at(0).unwrap();
        let grab = engine.world.get::<&Position>(bag).unwrap().point;
        engine.begin_drag(bag, grab);
        engine.end_drag(bag, Vec2::new(350.0, 220.0));
        settle(&mut engine);

        let mut ok = true;
        for _ in 0..2 {
            engine.reset();
            ok &= engine.shelf.bags.occupied_count() == 4
                && engine.scale.items.occupied_count() == 0
                && engine.totals() == ScaleTotals::default()
                && engine.debug_validate().is_empty();
        }
        results.push(result(
            "reset_idempotent",
            ok,
            "shelf restocked, scale empty, totals zero".to_string(),
        ));
    }

    // Every kind can run a full shelf→scale→reset cycle cleanly.
    {
        let mut clean = 0;
        for kind in ALL_KINDS {
            let mut engine = MarketEngine::new(SceneConfig::for_kind(kind));
            let bags: Vec<_> = engine.shelf.bags.occupants().map(|(_, e)| e).collect();
            for bag in bags {
                let grab = engine.world.get::<&Position>(bag).unwrap().point;
                engine.begin_drag(bag, grab);
                engine.drag_to(bag, Vec2::new(340.0, 230.0));
                engine.end_drag(bag, Vec2::new(340.0, 230.0));
            }
            settle(&mut engine);
            let consistent = engine.debug_validate().is_empty() && engine.totals().quantity > 0.0;
            if consistent {
                clean += 1;
            }
            if verbose {
                println!(
                    "  {}: totals {:?}",
                    kind.data().name,
                    engine.totals()
                );
            }
            engine.reset();
        }
        results.push(result(
            "all_kinds_cycle",
            clean == ALL_KINDS.len(),
            format!("{}/{} kinds cycled cleanly", clean, ALL_KINDS.len()),
        ));
    }

    results
}
