//! Platzierungslogik für die 3D-Beladung eines einzelnen Containers.
//!
//! Dieses Modul implementiert den gierigen Pivot-Punkt-Algorithmus: Für jedes
//! Objekt werden Kandidatenpunkte (Ursprung plus die drei Extrempunkte jedes
//! bereits platzierten Kartons) und sechs Orientierungen durchprobiert, unter
//! Berücksichtigung von:
//! - Containergrenzen und Kollisionen
//! - Gewichtsgrenzen
//! - Auflagefläche und Stabilität (keine schwebenden Kartons)
//! - Zerbrechlichkeit (empfindliche Kartons tragen keine robusteren)
//! - Schichtung (keine deutlich schwereren Kartons auf leichteren)

use std::cmp::Ordering;

use crate::geometry::{footprint_overlap, is_flush_on_top};
use crate::model::{Bin, Carton, PlacedCarton, Rotation};
use crate::types::{BoundingBox, EPSILON_GENERAL, EPSILON_SURFACE, Vec3};

/// Konfiguration für den Platzierungsalgorithmus.
///
/// Enthält alle Toleranzen und Grenzwerte zur Steuerung des Stapelverhaltens.
#[derive(Copy, Clone, Debug)]
pub struct PackingConfig {
    /// Minimaler Anteil der Grundfläche, der unterstützt sein muss (0.0 bis 1.0)
    pub support_ratio: f64,
    /// Toleranz für bündige Stapelflächen in cm
    pub surface_epsilon: f64,
    /// Faktor auf das mittlere Trägergewicht, bis zu dem gestapelt werden darf
    pub stack_weight_factor: f64,
    /// Allgemeine numerische Toleranz
    pub general_epsilon: f64,
}

impl PackingConfig {
    pub const DEFAULT_SUPPORT_RATIO: f64 = 0.7;
    pub const DEFAULT_SURFACE_EPSILON: f64 = EPSILON_SURFACE;
    pub const DEFAULT_STACK_WEIGHT_FACTOR: f64 = 1.1;
    pub const DEFAULT_GENERAL_EPSILON: f64 = EPSILON_GENERAL;

    /// Erstellt einen Builder für benutzerdefinierte Konfiguration.
    pub fn builder() -> PackingConfigBuilder {
        PackingConfigBuilder::default()
    }
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            support_ratio: Self::DEFAULT_SUPPORT_RATIO,
            surface_epsilon: Self::DEFAULT_SURFACE_EPSILON,
            stack_weight_factor: Self::DEFAULT_STACK_WEIGHT_FACTOR,
            general_epsilon: Self::DEFAULT_GENERAL_EPSILON,
        }
    }
}

/// Builder für PackingConfig.
#[derive(Clone, Debug)]
pub struct PackingConfigBuilder {
    config: PackingConfig,
}

impl Default for PackingConfigBuilder {
    fn default() -> Self {
        Self {
            config: PackingConfig::default(),
        }
    }
}

impl PackingConfigBuilder {
    /// Setzt die minimale Unterstützungsrate.
    pub fn support_ratio(mut self, ratio: f64) -> Self {
        self.config.support_ratio = ratio;
        self
    }

    /// Setzt die Toleranz für bündige Stapelflächen.
    pub fn surface_epsilon(mut self, epsilon: f64) -> Self {
        self.config.surface_epsilon = epsilon;
        self
    }

    /// Setzt den Stapelgewichtsfaktor.
    pub fn stack_weight_factor(mut self, factor: f64) -> Self {
        self.config.stack_weight_factor = factor;
        self
    }

    /// Setzt die allgemeine Toleranz.
    pub fn general_epsilon(mut self, epsilon: f64) -> Self {
        self.config.general_epsilon = epsilon;
        self
    }

    /// Erstellt die finale Konfiguration.
    pub fn build(self) -> PackingConfig {
        self.config
    }
}

/// Befüllt einen Container mit den Kartons in der gegebenen Reihenfolge.
///
/// Jeder Karton wird am ersten akzeptierten Pivot×Orientierung-Paar
/// festgeschrieben; Kartons ohne gültige Position werden zurückgegeben.
///
/// # Parameter
/// * `bin` - Der zu befüllende Container; Platzierungen werden angehängt
/// * `cartons` - Kartons in Beladereihenfolge
/// * `config` - Konfigurationsparameter
///
/// # Rückgabewert
/// Die Kartons, die in diesem Container keinen Platz gefunden haben
pub fn pack_single_bin(bin: &mut Bin, cartons: Vec<Carton>, config: &PackingConfig) -> Vec<Carton> {
    let mut leftovers = Vec::new();

    for carton in cartons {
        if !place_carton(bin, &carton, config) {
            leftovers.push(carton);
        }
    }

    leftovers
}

/// Versucht, einen Karton im Container zu platzieren.
///
/// Pivots werden in Beladereihenfolge geprüft: Boden zuerst, dann von hinten
/// nach vorn, dann von links nach rechts. Die erste akzeptierte Kombination
/// wird festgeschrieben.
/// Einzige zulässige Orientierung für rotationsgesperrte Kartons.
const IDENTITY_ONLY: [Rotation; 1] = [Rotation::Whd];

fn place_carton(bin: &mut Bin, carton: &Carton, config: &PackingConfig) -> bool {
    let rotations: &[Rotation] = if carton.allow_rotation {
        &Rotation::ALL
    } else {
        &IDENTITY_ONLY
    };

    for pivot in candidate_pivots(bin) {
        for &rotation in rotations {
            if accepts(bin, carton, pivot, rotation, config) {
                bin.placed
                    .push(PlacedCarton::new(carton.clone(), pivot, rotation));
                return true;
            }
        }
    }

    false
}

/// Zählt die Kandidaten-Pivotpunkte des Containers auf.
///
/// Der Ursprung plus je drei Extrempunkte pro platziertem Karton, stabil
/// sortiert nach (y, z, x) aufsteigend. Die Sortierung bestimmt die
/// Beladereihenfolge und muss stabil bleiben.
fn candidate_pivots(bin: &Bin) -> Vec<(f64, f64, f64)> {
    let mut pivots = Vec::with_capacity(1 + 3 * bin.placed.len());
    pivots.push((0.0, 0.0, 0.0));

    for p in &bin.placed {
        let (x, y, z) = p.position;
        let (w, h, d) = p.dims;
        pivots.push((x + w, y, z));
        pivots.push((x, y + h, z));
        pivots.push((x, y, z + d));
    }

    pivots.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
            .then_with(|| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal))
    });

    pivots
}

/// Prüft, ob ein Karton am Pivot in der gegebenen Orientierung zulässig ist.
///
/// Zulässig heißt: innerhalb des Containers, kollisionsfrei, innerhalb der
/// Gewichtsgrenze und oberhalb des Bodens regelkonform gestapelt.
fn accepts(
    bin: &Bin,
    carton: &Carton,
    pivot: (f64, f64, f64),
    rotation: Rotation,
    config: &PackingConfig,
) -> bool {
    let dims = rotation.apply(carton.dims);
    let (x, y, z) = pivot;

    if x + dims.0 > bin.dims.0 + config.general_epsilon
        || y + dims.1 > bin.dims.1 + config.general_epsilon
        || z + dims.2 > bin.dims.2 + config.general_epsilon
    {
        return false;
    }

    let candidate =
        BoundingBox::from_position_and_dims(Vec3::from_tuple(pivot), Vec3::from_tuple(dims));
    if bin
        .placed
        .iter()
        .any(|p| p.bounding_box().intersects(&candidate))
    {
        return false;
    }

    if !bin.can_take_weight(carton.weight) {
        return false;
    }

    if y > config.general_epsilon {
        return stack_is_sound(bin, carton, x, y, z, dims.0, dims.2, config);
    }

    true
}

/// Kennzahlen der Trägermenge direkt unter einem Kandidaten.
#[derive(Debug, Default)]
struct SupportStats {
    area: f64,
    total_weight: f64,
    count: usize,
    min_fragility: u8,
}

/// Sammelt alle Träger, deren Oberseite bündig unter dem Kandidaten liegt.
///
/// Ein Träger zählt, wenn seine Oberseite innerhalb der Flächentoleranz auf
/// Höhe `y` liegt und sein Grundriss den des Kandidaten überlappt.
fn support_stats(
    bin: &Bin,
    x: f64,
    y: f64,
    z: f64,
    width: f64,
    depth: f64,
    config: &PackingConfig,
) -> SupportStats {
    let mut stats = SupportStats {
        min_fragility: u8::MAX,
        ..SupportStats::default()
    };

    for p in &bin.placed {
        if !is_flush_on_top(y, p, config.surface_epsilon) {
            continue;
        }

        let overlap = footprint_overlap(x, z, width, depth, p);
        if overlap <= 0.0 {
            continue;
        }

        stats.area += overlap;
        stats.total_weight += p.carton.weight;
        stats.count += 1;
        stats.min_fragility = stats.min_fragility.min(p.carton.fragility);
    }

    stats
}

/// Prüft die Stapelregeln für einen Kandidaten oberhalb des Bodens.
///
/// Erfordert eine nicht-leere Trägermenge (kein Schweben), mindestens die
/// konfigurierte Auflagefläche, keine robusteren Kartons auf empfindlicheren
/// und kein Kartongewicht über dem Faktor auf das mittlere Trägergewicht.
fn stack_is_sound(
    bin: &Bin,
    carton: &Carton,
    x: f64,
    y: f64,
    z: f64,
    width: f64,
    depth: f64,
    config: &PackingConfig,
) -> bool {
    let stats = support_stats(bin, x, y, z, width, depth, config);

    if stats.count == 0 {
        // Karton würde in der Luft hängen
        return false;
    }

    let footprint = width * depth;
    if footprint <= config.general_epsilon {
        return false;
    }
    if stats.area / footprint < config.support_ratio {
        return false;
    }

    if stats.min_fragility < carton.fragility {
        return false;
    }

    let mean_weight = stats.total_weight / stats.count as f64;
    carton.weight <= config.stack_weight_factor * mean_weight + config.general_epsilon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_bin(dims: (f64, f64, f64), max_weight: f64) -> Bin {
        Bin {
            dims,
            max_weight,
            target_volume: dims.0 * dims.1 * dims.2,
            placed: Vec::new(),
        }
    }

    fn carton(id: &str, dims: (f64, f64, f64), weight: f64, fragility: u8) -> Carton {
        Carton::new(id, "SKU", dims, weight, true, fragility).unwrap()
    }

    fn rigid(id: &str, dims: (f64, f64, f64), weight: f64, fragility: u8) -> Carton {
        Carton::new(id, "SKU", dims, weight, false, fragility).unwrap()
    }

    #[test]
    fn first_carton_lands_at_origin_without_rotation() {
        let mut bin = test_bin((100.0, 100.0, 100.0), 1000.0);
        let leftovers =
            pack_single_bin(&mut bin, vec![carton("a", (50.0, 50.0, 50.0), 10.0, 3)], &PackingConfig::default());

        assert!(leftovers.is_empty());
        assert_eq!(bin.placed.len(), 1);
        assert_eq!(bin.placed[0].position, (0.0, 0.0, 0.0));
        assert_eq!(bin.placed[0].rotation, Rotation::Whd);
    }

    #[test]
    fn floor_pivots_are_preferred_over_stacking() {
        let mut bin = test_bin((30.0, 30.0, 30.0), 1000.0);
        let cartons = vec![
            carton("a", (10.0, 10.0, 10.0), 5.0, 3),
            carton("b", (10.0, 10.0, 10.0), 5.0, 3),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert!(leftovers.is_empty());
        // Pivot (10,0,0) kommt vor (0,0,10) und vor (0,10,0)
        assert_eq!(bin.placed[1].position, (10.0, 0.0, 0.0));
    }

    #[test]
    fn stacks_when_no_floor_space_remains() {
        let mut bin = test_bin((10.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            carton("a", (10.0, 10.0, 10.0), 5.0, 3),
            carton("b", (10.0, 10.0, 10.0), 5.0, 3),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert!(leftovers.is_empty());
        assert_eq!(bin.placed[1].position, (0.0, 10.0, 0.0));
    }

    #[test]
    fn fragile_carton_may_not_bear_tougher_one() {
        let mut bin = test_bin((10.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            carton("fragile", (10.0, 10.0, 10.0), 5.0, 1),
            carton("tough", (10.0, 10.0, 10.0), 5.0, 5),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert_eq!(leftovers.len(), 1, "robuster Karton darf nicht auf empfindlichem liegen");
        assert_eq!(leftovers[0].id, "tough");
    }

    #[test]
    fn equal_fragility_may_stack() {
        let mut bin = test_bin((10.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            carton("a", (10.0, 10.0, 10.0), 5.0, 2),
            carton("b", (10.0, 10.0, 10.0), 5.0, 2),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rejects_heavy_carton_on_light_support() {
        let mut bin = test_bin((10.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            carton("light", (10.0, 10.0, 10.0), 5.0, 3),
            carton("heavy", (10.0, 10.0, 10.0), 9.0, 3),
        ];

        // 9.0 > 1.1 * 5.0
        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert_eq!(leftovers.len(), 1);
        assert_eq!(leftovers[0].id, "heavy");
    }

    #[test]
    fn accepts_carton_within_stack_weight_factor() {
        let mut bin = test_bin((10.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            carton("below", (10.0, 10.0, 10.0), 5.0, 3),
            carton("above", (10.0, 10.0, 10.0), 5.5, 3),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert!(leftovers.is_empty());
    }

    #[test]
    fn rejects_insufficient_support_area() {
        let mut bin = test_bin((20.0, 30.0, 20.0), 1000.0);
        let cartons = vec![
            rigid("base", (10.0, 10.0, 10.0), 20.0, 5),
            rigid("wide", (20.0, 10.0, 20.0), 5.0, 3),
        ];

        // Auflage 100 von 400 = 25% < 70%
        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert_eq!(leftovers.len(), 1);
        assert_eq!(leftovers[0].id, "wide");
    }

    #[test]
    fn combined_supporters_satisfy_support_ratio() {
        let mut bin = test_bin((20.0, 30.0, 10.0), 1000.0);
        let cartons = vec![
            rigid("left", (10.0, 10.0, 10.0), 10.0, 3),
            rigid("right", (10.0, 10.0, 10.0), 10.0, 3),
            rigid("top", (20.0, 10.0, 10.0), 10.0, 3),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert!(leftovers.is_empty());
        let top = bin.placed.iter().find(|p| p.carton.id == "top").unwrap();
        assert_eq!(top.position, (0.0, 10.0, 0.0));
    }

    #[test]
    fn respects_weight_capacity() {
        let mut bin = test_bin((100.0, 100.0, 100.0), 15.0);
        let cartons = vec![
            carton("a", (10.0, 10.0, 10.0), 10.0, 3),
            carton("b", (10.0, 10.0, 10.0), 10.0, 3),
        ];

        let leftovers = pack_single_bin(&mut bin, cartons, &PackingConfig::default());
        assert_eq!(bin.placed.len(), 1);
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn rotation_enables_fit_in_flat_bin() {
        let mut bin = test_bin((30.0, 10.0, 30.0), 1000.0);
        let tall = carton("tall", (10.0, 30.0, 10.0), 5.0, 3);

        let leftovers = pack_single_bin(&mut bin, vec![tall], &PackingConfig::default());
        assert!(leftovers.is_empty());
        assert_ne!(bin.placed[0].rotation, Rotation::Whd);
        assert!(bin.placed[0].dims.1 <= 10.0 + EPSILON_GENERAL);
    }

    #[test]
    fn rotation_lock_prevents_fit_in_flat_bin() {
        let mut bin = test_bin((30.0, 10.0, 30.0), 1000.0);
        let tall = rigid("tall", (10.0, 30.0, 10.0), 5.0, 3);

        let leftovers = pack_single_bin(&mut bin, vec![tall], &PackingConfig::default());
        assert_eq!(leftovers.len(), 1);
        assert!(bin.placed.is_empty());
    }

    #[test]
    fn oversized_carton_is_left_over() {
        let mut bin = test_bin((100.0, 100.0, 100.0), 1000.0);
        let big = carton("big", (200.0, 50.0, 50.0), 5.0, 3);

        let leftovers = pack_single_bin(&mut bin, vec![big], &PackingConfig::default());
        assert_eq!(leftovers.len(), 1);
        assert!(bin.placed.is_empty());
    }

    #[test]
    fn rejects_carton_hanging_in_air() {
        let config = PackingConfig::default();
        let mut bin = test_bin((30.0, 30.0, 30.0), 1000.0);
        bin.placed.push(PlacedCarton::new(
            carton("a", (10.0, 10.0, 10.0), 5.0, 3),
            (0.0, 0.0, 0.0),
            Rotation::Whd,
        ));
        let floating = carton("b", (10.0, 10.0, 10.0), 5.0, 3);

        assert!(!accepts(&bin, &floating, (0.0, 15.0, 0.0), Rotation::Whd, &config));
        assert!(!accepts(&bin, &floating, (15.0, 10.0, 0.0), Rotation::Whd, &config));
        assert!(accepts(&bin, &floating, (0.0, 10.0, 0.0), Rotation::Whd, &config));
    }

    #[test]
    fn pivot_order_is_floor_first_back_to_front() {
        let mut bin = test_bin((30.0, 30.0, 30.0), 1000.0);
        bin.placed.push(PlacedCarton::new(
            carton("a", (10.0, 10.0, 10.0), 5.0, 3),
            (0.0, 0.0, 0.0),
            Rotation::Whd,
        ));

        let pivots = candidate_pivots(&bin);
        assert_eq!(
            pivots,
            vec![
                (0.0, 0.0, 0.0),
                (10.0, 0.0, 0.0),
                (0.0, 0.0, 10.0),
                (0.0, 10.0, 0.0),
            ]
        );
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = PackingConfig::builder()
            .support_ratio(0.5)
            .stack_weight_factor(2.0)
            .build();

        assert!((config.support_ratio - 0.5).abs() < EPSILON_GENERAL);
        assert!((config.stack_weight_factor - 2.0).abs() < EPSILON_GENERAL);
        assert!((config.surface_epsilon - EPSILON_SURFACE).abs() < EPSILON_GENERAL);
    }
}
