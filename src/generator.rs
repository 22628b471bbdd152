//! Random timetabling instances.
//!
//! Instances are generated as [`ProblemSpec`]s from a seed, so the same
//! seed and configuration always give the same problem. They are not
//! guaranteed to be solvable; availability and capacity are drawn
//! independently.

use rand::prelude::*;

use crate::error::Result;
use crate::models::{ConstraintGraph, Timeslot};
use crate::problem::{ProblemSpec, RoomSpec, TeacherSpec, UnitSpec};

const DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];
const TIMES: [&str; 8] = ["9AM", "10AM", "11AM", "12PM", "1PM", "2PM", "3PM", "4PM"];

/// Configuration for generated instances.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of schedule units.
    pub num_units: usize,
    /// Number of teachers.
    pub num_teachers: usize,
    /// Number of rooms.
    pub num_rooms: usize,
    /// Number of distinct subjects.
    pub num_subjects: usize,
    /// Days in the week (at most 5).
    pub num_days: usize,
    /// Timeslots per day (at most 8).
    pub slots_per_day: usize,
    /// Candidate teachers listed per unit.
    pub teachers_per_unit: usize,
    /// Candidate rooms listed per teacher.
    pub rooms_per_teacher: usize,
    /// Direct candidate rooms listed per unit.
    pub direct_rooms_per_unit: usize,
    /// Timeslot values listed per unit and teacher variable, and per room
    /// variable when `room_variables` is set.
    pub slot_candidates: usize,
    /// Whether rooms become variables ranging over timeslots.
    pub room_variables: bool,
    /// Probability that a teacher or room is available at a given slot.
    pub availability: f64,
    /// Unit size range (min, max).
    pub unit_capacity_range: (u32, u32),
    /// Room capacity range (min, max).
    pub room_capacity_range: (u32, u32),
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::small()
    }
}

impl GeneratorConfig {
    /// At most four variables with at most four values each.
    pub fn tiny() -> Self {
        Self {
            num_units: 2,
            num_teachers: 2,
            num_rooms: 3,
            num_subjects: 2,
            num_days: 1,
            slots_per_day: 2,
            teachers_per_unit: 2,
            rooms_per_teacher: 2,
            direct_rooms_per_unit: 1,
            slot_candidates: 0,
            room_variables: false,
            availability: 0.8,
            unit_capacity_range: (10, 30),
            room_capacity_range: (10, 40),
        }
    }

    /// Four variables of every kind, each with at most four values: one
    /// unit, one teacher and two room variables, with timeslot candidates.
    pub fn tiny_mixed() -> Self {
        Self {
            num_units: 1,
            num_teachers: 1,
            num_rooms: 2,
            num_subjects: 1,
            num_days: 1,
            slots_per_day: 3,
            teachers_per_unit: 1,
            rooms_per_teacher: 2,
            direct_rooms_per_unit: 1,
            slot_candidates: 2,
            room_variables: true,
            availability: 0.7,
            unit_capacity_range: (10, 30),
            room_capacity_range: (10, 40),
        }
    }

    /// A handful of units over one school day.
    pub fn small() -> Self {
        Self {
            num_units: 8,
            num_teachers: 4,
            num_rooms: 5,
            num_subjects: 3,
            num_days: 2,
            slots_per_day: 4,
            teachers_per_unit: 2,
            rooms_per_teacher: 3,
            direct_rooms_per_unit: 0,
            slot_candidates: 0,
            room_variables: false,
            availability: 0.8,
            unit_capacity_range: (10, 30),
            room_capacity_range: (15, 40),
        }
    }

    /// A school week with more contention.
    pub fn medium() -> Self {
        Self {
            num_units: 24,
            num_teachers: 10,
            num_rooms: 12,
            num_subjects: 6,
            num_days: 5,
            slots_per_day: 6,
            teachers_per_unit: 3,
            rooms_per_teacher: 4,
            direct_rooms_per_unit: 0,
            slot_candidates: 0,
            room_variables: false,
            availability: 0.75,
            unit_capacity_range: (10, 35),
            room_capacity_range: (15, 45),
        }
    }
}

/// Seeded instance generator.
#[derive(Debug, Clone)]
pub struct InstanceGenerator {
    config: GeneratorConfig,
    rng: StdRng,
}

impl InstanceGenerator {
    /// Creates a generator with the given config and seed.
    pub fn new(config: GeneratorConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates a problem.
    pub fn generate(&mut self) -> ProblemSpec {
        let slots = self.timeslots();
        let subjects: Vec<String> = (0..self.config.num_subjects.max(1))
            .map(|i| format!("S{i}"))
            .collect();

        let rooms = self.generate_rooms(&slots);
        let teachers = self.generate_teachers(&slots, &subjects, &rooms);
        let units = self.generate_units(&slots, &subjects, &teachers, &rooms);

        ProblemSpec {
            units,
            teachers,
            rooms,
            solver: None,
        }
    }

    /// Generates a problem and builds its graph.
    pub fn generate_graph(&mut self) -> Result<ConstraintGraph> {
        self.generate().to_graph()
    }

    fn timeslots(&self) -> Vec<Timeslot> {
        let days = self.config.num_days.clamp(1, DAYS.len());
        let times = self.config.slots_per_day.clamp(1, TIMES.len());
        DAYS[..days]
            .iter()
            .flat_map(|day| TIMES[..times].iter().map(move |time| Timeslot::new(*day, *time)))
            .collect()
    }

    fn available(&mut self, slots: &[Timeslot]) -> Vec<Timeslot> {
        let p = self.config.availability.clamp(0.0, 1.0);
        slots
            .iter()
            .filter(|_| self.rng.random_bool(p))
            .cloned()
            .collect()
    }

    fn pick(&mut self, names: &[String], count: usize) -> Vec<String> {
        names
            .choose_multiple(&mut self.rng, count.min(names.len()))
            .cloned()
            .collect()
    }

    fn pick_slots(&mut self, slots: &[Timeslot]) -> Vec<Timeslot> {
        let count = self.config.slot_candidates.min(slots.len());
        slots.choose_multiple(&mut self.rng, count).cloned().collect()
    }

    fn generate_rooms(&mut self, slots: &[Timeslot]) -> Vec<RoomSpec> {
        let (min, max) = self.config.room_capacity_range;
        (0..self.config.num_rooms)
            .map(|i| RoomSpec {
                name: format!("R{i}"),
                capacity: self.rng.random_range(min..=max.max(min)),
                features: Vec::new(),
                availability: self.available(slots),
                slot_candidates: if self.config.room_variables {
                    self.pick_slots(slots)
                } else {
                    Vec::new()
                },
            })
            .collect()
    }

    fn generate_teachers(
        &mut self,
        slots: &[Timeslot],
        subjects: &[String],
        rooms: &[RoomSpec],
    ) -> Vec<TeacherSpec> {
        let room_names: Vec<String> = rooms.iter().map(|r| r.name.clone()).collect();
        (0..self.config.num_teachers)
            .map(|i| {
                let count = self.rng.random_range(1..=subjects.len());
                TeacherSpec {
                    name: format!("T{i}"),
                    subjects: self.pick(subjects, count),
                    availability: self.available(slots),
                    rooms: Some(self.pick(&room_names, self.config.rooms_per_teacher)),
                    slot_candidates: self.pick_slots(slots),
                }
            })
            .collect()
    }

    fn generate_units(
        &mut self,
        slots: &[Timeslot],
        subjects: &[String],
        teachers: &[TeacherSpec],
        rooms: &[RoomSpec],
    ) -> Vec<UnitSpec> {
        let teacher_names: Vec<String> = teachers.iter().map(|t| t.name.clone()).collect();
        let room_names: Vec<String> = rooms.iter().map(|r| r.name.clone()).collect();
        let (min, max) = self.config.unit_capacity_range;
        (0..self.config.num_units)
            .map(|i| UnitSpec {
                name: format!("U{i}"),
                subject: subjects.choose(&mut self.rng).cloned(),
                capacity: self.rng.random_range(min..=max.max(min)),
                special_requirements: false,
                required_features: Vec::new(),
                timeslots: slots.choose(&mut self.rng).cloned().into_iter().collect(),
                teachers: Some(self.pick(&teacher_names, self.config.teachers_per_unit)),
                rooms: self.pick(&room_names, self.config.direct_rooms_per_unit),
                slot_candidates: self.pick_slots(slots),
            })
            .collect()
    }
}
