use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::annealer::AnnealingModel;
use crate::error::PlaceError;
use crate::placeable::{Placeable, PlacementSnapshot};

/// A rejected-or-applied move, returned by [`Places::move_one`] so the
/// annealer can undo it without re-deriving which placeable changed.
#[derive(Debug, Clone, Copy)]
pub struct PlacementChange {
    index: usize,
    before: PlacementSnapshot,
}

/// Owns every placeable, the anchor-based neighbor index, the running
/// global energy, and the subset eligible for mutation.
#[derive(Debug, Clone, Default)]
pub struct Places {
    places: Vec<Placeable>,
    neighbors: Vec<Vec<usize>>,
    moveable: Vec<usize>,
    total_energy: f64,
}

impl Places {
    pub fn new() -> Self {
        Places::default()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn get(&self, index: usize) -> &Placeable {
        &self.places[index]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placeable> {
        self.places.iter()
    }

    pub fn neighbors_of(&self, index: usize) -> &[usize] {
        &self.neighbors[index]
    }

    /// Cached total energy. O(1).
    pub fn energy(&self) -> f64 {
        self.total_energy
    }

    /// Add a placeable, wiring it into the neighbor index of every
    /// existing placeable within range and folding in its placement and
    /// overlap costs. The O(n) distance checks against already-inserted
    /// placeables run in parallel (mirroring the per-row vertex
    /// computation in a topo renderer's geometry pass); the fold back
    /// into shared state happens sequentially so the energy update stays
    /// deterministic. Returns the new placeable's neighbor indices.
    pub fn add(&mut self, place: Placeable) -> &[usize] {
        let index = self.places.len();

        let in_range: Vec<usize> = (0..index)
            .into_par_iter()
            .filter(|&other| place.in_range(&self.places[other]))
            .collect();

        let mut delta = 0.0;
        for &other in &in_range {
            delta += place.overlap_energy(&self.places[other]);
            self.neighbors[other].push(index);
        }
        delta += place.placement_energy();

        if place.zoom_threshold() <= 7 {
            self.moveable.push(index);
        }

        self.places.push(place);
        self.neighbors.push(in_range);
        self.total_energy += delta;

        &self.neighbors[index]
    }

    /// Sum of this placeable's placement cost and its overlap cost
    /// against every current neighbor; used both to subtract the old
    /// contribution before a move and to add the new one back.
    fn contribution(&self, index: usize) -> f64 {
        let place = &self.places[index];
        let overlap: f64 = self.neighbors[index]
            .iter()
            .map(|&other| place.overlap_energy(&self.places[other]))
            .sum();
        place.placement_energy() + overlap
    }

    fn apply_and_rebalance(&mut self, index: usize, f: impl FnOnce(&mut Placeable)) {
        let before = self.contribution(index);
        f(&mut self.places[index]);
        let after = self.contribution(index);
        self.total_energy += after - before;
    }

    /// Choose a moveable placeable uniformly, mutate its placement state,
    /// and rebalance the cached energy. Neighbor sets are untouched: they
    /// are anchor-based and stay valid over every reachable placement.
    pub fn move_one(&mut self, rng: &mut impl Rng) -> Result<PlacementChange, PlaceError> {
        if self.moveable.is_empty() {
            return Err(PlaceError::EmptyPopulation);
        }
        let index = self.moveable[rng.gen_range(0..self.moveable.len())];
        let before = self.places[index].snapshot();
        self.apply_and_rebalance(index, |p| p.do_move(rng));
        Ok(PlacementChange { index, before })
    }

    /// Undo a move returned by [`Places::move_one`], restoring the exact
    /// placement state it captured and rebalancing energy the same way.
    pub fn undo(&mut self, change: PlacementChange) {
        self.apply_and_rebalance(change.index, |p| p.restore(change.before));
    }

    /// Recompute total energy from scratch; used by tests and the
    /// defensive invariant check, never on the hot path.
    pub fn recompute_energy(&self) -> f64 {
        let mut energy = 0.0;
        for (index, place) in self.places.iter().enumerate() {
            energy += place.placement_energy();
            for &other in &self.neighbors[index] {
                if other > index {
                    energy += place.overlap_energy(&self.places[other]);
                }
            }
        }
        energy
    }

    pub fn check_energy_invariant(&self) -> Result<(), PlaceError> {
        let recomputed = self.recompute_energy();
        if (recomputed - self.total_energy).abs() > 1e-6 * recomputed.abs().max(1.0) {
            return Err(PlaceError::EnergyInvariantViolation {
                cached: self.total_energy,
                recomputed,
            });
        }
        Ok(())
    }
}

impl AnnealingModel for Places {
    type Change = PlacementChange;

    fn energy(&self) -> f64 {
        Places::energy(self)
    }

    fn propose(&mut self, rng: &mut StdRng) -> Result<Self::Change, PlaceError> {
        self.move_one(rng)
    }

    fn undo(&mut self, change: Self::Change) {
        Places::undo(self, change)
    }
}
