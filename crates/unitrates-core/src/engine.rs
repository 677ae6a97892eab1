//! Market engine - main entry point for running one scene of the
//! simulation.
//!
//! The engine owns the ECS world, the shelf and scale, the double number
//! line, and the scene's question sets. A host drives it with the pointer
//! API (`begin_drag` / `drag_to` / `end_drag`) and a per-frame
//! `update(dt)`, and observes scale totals through `subscribe_totals`.
//! Everything runs on the caller's thread; there is no internal
//! concurrency.

use hecs::{Entity, World};

use unitrates_logic::drop_zone::{DropTarget, DropZones};
use unitrates_logic::items::ItemKind;
use unitrates_logic::numberline::{AddOutcome, DoubleNumberLine, Marker, MarkerOrigin};
use unitrates_logic::questions::Question;

use crate::components::{Animation, Bag, Dragging, MarketItem, Position, RowSlot, Vec2};
use crate::containers::{ContainerSpec, Scale, ScaleTotals, Shelf};
use crate::generation;
use crate::notify::{Notifier, Subscription};
use crate::systems::{self, Arrival};

/// Layout and behavior parameters for one scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub item: ItemKind,
    pub shelf: ContainerSpec,
    pub scale: ContainerSpec,
    /// Vertical split between scale and shelf territory.
    pub y_above_scale: f32,
    /// Flight speed for released movables, units per second.
    pub animation_speed: f32,
    pub question_set_count: usize,
}

impl SceneConfig {
    /// Stock layout for a kind: shelf below, scale above, rows sized so
    /// the whole inventory fits either container.
    pub fn for_kind(item: ItemKind) -> Self {
        let data = item.data();
        let bag_cells = data.bags_per_scene as usize;
        // Enough item cells for every bag opened at once.
        let item_cells = match data.items_per_bag() {
            Some(per_bag) => bag_cells * per_bag as usize,
            None => bag_cells,
        };
        let spec = |y: f32| ContainerSpec {
            position: Vec2::new(350.0, y),
            bag_cells,
            bag_cell_width: 70.0,
            item_cells,
            item_cell_width: 30.0,
            cell_spacing: 8.0,
            back_row_dy: 12.0,
        };
        Self {
            item,
            shelf: spec(420.0),
            scale: spec(220.0),
            y_above_scale: 320.0,
            animation_speed: 400.0,
            question_set_count: 3,
        }
    }

    /// Largest quantity the scene can put on the scale, which bounds the
    /// number line axis.
    pub fn quantity_max(&self) -> f64 {
        let data = self.item.data();
        f64::from(data.bags_per_scene) * data.bag_quantity
    }
}

/// One scene of the market simulation.
pub struct MarketEngine {
    /// ECS world containing all movables
    pub world: World,
    pub config: SceneConfig,
    pub shelf: Shelf,
    pub scale: Scale,
    pub number_line: DoubleNumberLine,
    pub question_sets: Vec<Vec<Question>>,
    /// Simulation time in seconds since start
    sim_time: f64,
    totals_changed: Notifier<ScaleTotals>,
}

impl MarketEngine {
    /// Build a scene: rows laid out per the config, shelf stocked,
    /// questions generated.
    pub fn new(config: SceneConfig) -> Self {
        let mut world = World::new();
        let mut shelf = Shelf::new(&config.shelf);
        let scale = Scale::new(&config.scale);
        generation::stock_shelf(&mut world, &mut shelf, config.item);

        let mut rng = rand::thread_rng();
        let question_sets =
            generation::generate_question_sets(config.item, config.question_set_count, &mut rng);
        let number_line = DoubleNumberLine::new(config.quantity_max());

        Self {
            world,
            shelf,
            scale,
            number_line,
            question_sets,
            sim_time: 0.0,
            totals_changed: Notifier::new(),
            config,
        }
    }

    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }

    fn zones(&self) -> DropZones {
        DropZones::new(self.config.y_above_scale)
    }

    /// Advance the simulation by `delta_seconds`. Returns the movables
    /// that arrived in their cells this frame.
    pub fn update(&mut self, delta_seconds: f32) -> Vec<Arrival> {
        self.sim_time += f64::from(delta_seconds);
        let arrivals = systems::animation_system(
            &mut self.world,
            &mut self.shelf,
            &mut self.scale,
            self.config.animation_speed,
            delta_seconds,
        );
        if !arrivals.is_empty() {
            self.sync_totals();
        }
        arrivals
    }

    /// Pointer down over a movable.
    pub fn begin_drag(&mut self, entity: Entity, pointer: Vec2) {
        systems::begin_drag(&mut self.world, &mut self.shelf, &mut self.scale, entity, pointer);
        // Dragging something off the scale changes the reading at once.
        self.sync_totals();
    }

    /// Pointer moved while holding a movable.
    pub fn drag_to(&mut self, entity: Entity, pointer: Vec2) {
        systems::drag_move(&mut self.world, entity, pointer);
    }

    /// Pointer released. Returns the container the movable headed for.
    pub fn end_drag(&mut self, entity: Entity, pointer: Vec2) -> Option<DropTarget> {
        let zones = self.zones();
        let target = systems::end_drag(
            &mut self.world,
            &mut self.shelf,
            &mut self.scale,
            &zones,
            self.config.animation_speed,
            entity,
            pointer,
        );
        // Bag decomposition places its items synchronously; one totals
        // notification covers the whole batch.
        self.sync_totals();
        target
    }

    pub fn totals(&self) -> ScaleTotals {
        self.scale.totals()
    }

    /// Register a scale-totals observer. Delivery stops when the returned
    /// handle is disposed or dropped.
    pub fn subscribe_totals(&self, callback: impl FnMut(&ScaleTotals) + 'static) -> Subscription {
        self.totals_changed.subscribe(callback)
    }

    fn sync_totals(&mut self) {
        let (totals, changed) = self.scale.recompute_totals(&self.world);
        if changed {
            self.totals_changed.notify(&totals);
        }
    }

    /// Snapshot the current scale reading onto the double number line.
    pub fn mark_scale_reading(&mut self) -> AddOutcome {
        let totals = self.scale.totals();
        self.number_line.add(Marker {
            cost: totals.cost,
            quantity: totals.quantity,
            origin: MarkerOrigin::Scale,
        })
    }

    /// Check an answer to a question. A correct answer reveals a
    /// permanent marker on the number line.
    pub fn answer_question(&mut self, set: usize, index: usize, guess: f64) -> bool {
        let question = match self.question_sets.get(set).and_then(|s| s.get(index)) {
            Some(question) => question.clone(),
            None => return false,
        };
        let correct = question.check(guess);
        if correct {
            self.number_line.add(Marker {
                cost: question.dollars(),
                quantity: question.quantity,
                origin: MarkerOrigin::Question,
            });
        }
        correct
    }

    /// Return everything to construction-time defaults: rows emptied,
    /// movables despawned, shelf restocked, number line cleared, fresh
    /// question sets. Safe to call repeatedly.
    pub fn reset(&mut self) {
        let had = self.scale.totals();
        self.world.clear();
        self.shelf.clear();
        self.scale.clear();
        self.number_line.clear();
        self.sim_time = 0.0;
        generation::stock_shelf(&mut self.world, &mut self.shelf, self.config.item);
        let mut rng = rand::thread_rng();
        self.question_sets = generation::generate_question_sets(
            self.config.item,
            self.config.question_set_count,
            &mut rng,
        );
        if had != ScaleTotals::default() {
            self.totals_changed.notify(&ScaleTotals::default());
        }
    }

    /// Audit the container/ownership invariants. Returns human-readable
    /// violations; empty means consistent. Used by tests and the headless
    /// harness.
    pub fn debug_validate(&self) -> Vec<String> {
        let mut violations = Vec::new();
        let rows: [(&str, &unitrates_logic::row::Row<Entity>); 6] = [
            ("shelf bags", &self.shelf.bags),
            ("shelf front items", self.shelf.items.row(RowSlot::FrontItems)),
            ("shelf back items", self.shelf.items.row(RowSlot::BackItems)),
            ("scale bags", &self.scale.bags),
            ("scale front items", self.scale.items.row(RowSlot::FrontItems)),
            ("scale back items", self.scale.items.row(RowSlot::BackItems)),
        ];

        // Occupied cells point at live, non-dragging entities, and no
        // entity sits in two cells.
        let mut seen: Vec<Entity> = Vec::new();
        for (name, row) in rows {
            for (index, entity) in row.occupants() {
                if !self.world.contains(entity) {
                    violations.push(format!("{} cell {} holds a dead entity", name, index));
                    continue;
                }
                if self.world.get::<&Dragging>(entity).is_ok() {
                    violations.push(format!("{} cell {} holds a dragging entity", name, index));
                }
                if let Ok(anim) = self.world.get::<&Animation>(entity) {
                    if !anim.reserved {
                        violations.push(format!(
                            "{} cell {} holds an entity with an unreserved claim",
                            name, index
                        ));
                    }
                }
                if seen.contains(&entity) {
                    violations.push(format!("entity occupies two cells ({} cell {})", name, index));
                }
                seen.push(entity);
            }
        }

        // Idle movables own exactly one cell.
        for (entity, _) in self.world.query::<&Position>().iter() {
            let is_movable = self.world.get::<&Bag>(entity).is_ok()
                || self.world.get::<&MarketItem>(entity).is_ok();
            let in_flight = self.world.get::<&Dragging>(entity).is_ok()
                || self.world.get::<&Animation>(entity).is_ok();
            if is_movable && !in_flight && !seen.contains(&entity) {
                violations.push(format!("idle movable {:?} owns no cell", entity));
            }
        }
        violations
    }
}
