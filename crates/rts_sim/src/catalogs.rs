//! Immutable unit catalogs and speed-scaled timing constants (§4.3).

use rts_core::Micros;

/// The closed set of unit types (§3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitKind {
    Mine,
    Worker,
    Soldier,
    Archer,
    Base,
    Barracks,
    Refinery,
}

impl UnitKind {
    pub const ALL: [UnitKind; 7] = [
        UnitKind::Mine,
        UnitKind::Worker,
        UnitKind::Soldier,
        UnitKind::Archer,
        UnitKind::Base,
        UnitKind::Barracks,
        UnitKind::Refinery,
    ];
}

/// Static per-type descriptor. Fields independent of `game_speed` live here;
/// speed-scaled fields (creation time, movement, damage) are computed by
/// `Catalogs` from the `base_*` values below.
#[derive(Clone, Debug)]
pub struct UnitDescriptor {
    pub kind: UnitKind,
    pub footprint: (u16, u16),
    pub cost: u32,
    pub max_health: i32,
    pub attack_range: f64,
    pub mining_capacity: u32,
    pub can_move: bool,
    pub can_build: bool,
    pub can_train: bool,
    pub can_attack: bool,
    pub can_gather: bool,
    pub builds: Vec<UnitKind>,
    pub trains: Vec<UnitKind>,
    pub dependency: Vec<UnitKind>,

    /// Scalar multiplied into `ts = 1 / game_speed` to get creation time.
    creation_scalar: f64,
    /// Tiles per (real) second at `game_speed == 1`.
    base_speed: f64,
    /// Damage dealt per attack-timer elapse at `game_speed == 1`.
    base_damage: i32,
}

/// All timing/damage/movement scaled by a single `game_speed` (§4.3).
#[derive(Clone, Debug)]
pub struct Catalogs {
    game_speed: u32,
    descriptors: Vec<UnitDescriptor>,
    mining_boost: f64,
}

impl Catalogs {
    /// Build catalogs for the given `game_speed` (1-30 typical; 0 pauses
    /// all timers). Catalogs are immutable after construction; changing
    /// speed means building a new `Catalogs`.
    pub fn new(game_speed: u32) -> Self {
        Self {
            game_speed,
            descriptors: default_descriptors(),
            mining_boost: 2.0,
        }
    }

    pub fn game_speed(&self) -> u32 {
        self.game_speed
    }

    pub fn descriptor(&self, kind: UnitKind) -> &UnitDescriptor {
        self.descriptors
            .iter()
            .find(|d| d.kind == kind)
            .expect("UnitKind::ALL covers every descriptor")
    }

    /// `creation_time[type] = ts * creation_scalar[type]`, `ts = 1/game_speed`.
    pub fn creation_time(&self, kind: UnitKind) -> Micros {
        Micros::scaled_secs(self.descriptor(kind).creation_scalar, self.game_speed)
    }

    /// `moving_speed[type] = game_speed * base_speed[type]`, tiles/sec.
    pub fn moving_speed(&self, kind: UnitKind) -> f64 {
        self.game_speed as f64 * self.descriptor(kind).base_speed
    }

    /// `damage[type] = game_speed * base_damage[type]`.
    pub fn damage(&self, kind: UnitKind) -> i32 {
        (self.game_speed as i32) * self.descriptor(kind).base_damage
    }

    pub fn mining_boost(&self) -> f64 {
        self.mining_boost
    }
}

fn default_descriptors() -> Vec<UnitDescriptor> {
    vec![
        UnitDescriptor {
            kind: UnitKind::Mine,
            footprint: (3, 3),
            cost: 0,
            max_health: 10_000,
            attack_range: 0.0,
            mining_capacity: 0,
            can_move: false,
            can_build: false,
            can_train: false,
            can_attack: false,
            can_gather: false,
            builds: vec![],
            trains: vec![],
            dependency: vec![],
            creation_scalar: 0.0,
            base_speed: 0.0,
            base_damage: 0,
        },
        UnitDescriptor {
            kind: UnitKind::Worker,
            footprint: (1, 1),
            cost: 50,
            max_health: 50,
            attack_range: 0.0,
            mining_capacity: 100,
            can_move: true,
            can_build: true,
            can_train: false,
            can_attack: false,
            can_gather: true,
            builds: vec![UnitKind::Base, UnitKind::Barracks, UnitKind::Refinery],
            trains: vec![],
            dependency: vec![],
            creation_scalar: 2.0,
            base_speed: 0.1,
            base_damage: 0,
        },
        UnitDescriptor {
            kind: UnitKind::Soldier,
            footprint: (1, 1),
            cost: 100,
            max_health: 100,
            attack_range: 1.0,
            mining_capacity: 0,
            can_move: true,
            can_build: false,
            can_train: false,
            can_attack: true,
            can_gather: false,
            builds: vec![],
            trains: vec![],
            dependency: vec![UnitKind::Barracks],
            creation_scalar: 3.0,
            base_speed: 0.1,
            base_damage: 20,
        },
        UnitDescriptor {
            kind: UnitKind::Archer,
            footprint: (1, 1),
            cost: 120,
            max_health: 70,
            attack_range: 4.0,
            mining_capacity: 0,
            can_move: true,
            can_build: false,
            can_train: false,
            can_attack: true,
            can_gather: false,
            builds: vec![],
            trains: vec![],
            dependency: vec![UnitKind::Barracks],
            creation_scalar: 4.0,
            base_speed: 0.1,
            base_damage: 12,
        },
        UnitDescriptor {
            kind: UnitKind::Base,
            footprint: (3, 3),
            cost: 500,
            max_health: 1000,
            attack_range: 0.0,
            mining_capacity: 0,
            can_move: false,
            can_build: false,
            can_train: true,
            can_attack: false,
            can_gather: false,
            builds: vec![],
            trains: vec![UnitKind::Worker],
            dependency: vec![],
            creation_scalar: 20.0,
            base_speed: 0.0,
            base_damage: 0,
        },
        UnitDescriptor {
            kind: UnitKind::Barracks,
            footprint: (3, 3),
            cost: 300,
            max_health: 600,
            attack_range: 0.0,
            mining_capacity: 0,
            can_move: false,
            can_build: false,
            can_train: true,
            can_attack: false,
            can_gather: false,
            builds: vec![],
            trains: vec![UnitKind::Soldier, UnitKind::Archer],
            dependency: vec![UnitKind::Base],
            creation_scalar: 15.0,
            base_speed: 0.0,
            base_damage: 0,
        },
        UnitDescriptor {
            kind: UnitKind::Refinery,
            footprint: (3, 3),
            cost: 250,
            max_health: 400,
            attack_range: 0.0,
            mining_capacity: 0,
            can_move: false,
            can_build: false,
            can_train: false,
            can_attack: false,
            can_gather: false,
            builds: vec![],
            trains: vec![],
            dependency: vec![UnitKind::Base],
            creation_scalar: 12.0,
            base_speed: 0.0,
            base_damage: 0,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_creation_time_at_speed_20() {
        let catalogs = Catalogs::new(20);
        // ts = 1/20, creation_scalar = 2 -> 0.1s
        assert_eq!(catalogs.creation_time(UnitKind::Worker), Micros::from_millis(100));
    }

    #[test]
    fn soldier_damage_scales_with_speed() {
        let catalogs = Catalogs::new(1);
        assert_eq!(catalogs.damage(UnitKind::Soldier), 20);
        let catalogs = Catalogs::new(3);
        assert_eq!(catalogs.damage(UnitKind::Soldier), 60);
    }

    #[test]
    fn moving_speed_zero_for_structures() {
        let catalogs = Catalogs::new(10);
        assert_eq!(catalogs.moving_speed(UnitKind::Base), 0.0);
        assert!(catalogs.moving_speed(UnitKind::Worker) > 0.0);
    }

    #[test]
    fn game_speed_zero_pauses_all_timers() {
        let catalogs = Catalogs::new(0);
        assert_eq!(catalogs.creation_time(UnitKind::Worker), Micros::MAX);
        assert_eq!(catalogs.creation_time(UnitKind::Base), Micros::MAX);
    }

    #[test]
    fn rebuilding_catalogs_at_same_speed_is_deterministic() {
        let a = Catalogs::new(5);
        let b = Catalogs::new(5);
        assert_eq!(a.creation_time(UnitKind::Archer), b.creation_time(UnitKind::Archer));
        assert_eq!(a.damage(UnitKind::Soldier), b.damage(UnitKind::Soldier));
    }
}
