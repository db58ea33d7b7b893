//! Component types and the fixed-layout entity record.
//!
//! An [`Entity`] holds zero or one of each component kind as an optional
//! typed field. Behaviour is never stored in components: capabilities such as
//! [`Bumpable`] carry a data tag that the turn engine dispatches on.

use std::collections::BTreeSet;
use std::fmt;

use bitflags::bitflags;

use crate::env::EnemyStats;

use super::{Inventory, Position};

bitflags! {
    /// Set of component kinds, used to express query requirements.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ComponentSet: u16 {
        const ON_MAP    = 1 << 0;
        const NAMED     = 1 << 1;
        const CARRYABLE = 1 << 2;
        const STOCKABLE = 1 << 3;
        const ENEMY     = 1 << 4;
        const WALLET    = 1 << 5;
        const PLAYER    = 1 << 6;
        const INVENTORY = 1 << 7;
        const CLIMBABLE = 1 << 8;
        const BUMPABLE  = 1 << 9;
    }
}

impl ComponentSet {
    /// Components whose changes invalidate the spatial index.
    pub const INDEXED: Self = Self::ON_MAP.union(Self::NAMED);
}

/// Something that's on the map: a location plus flags for how it interacts
/// with movement and line of sight.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OnMap {
    pub position: Position,
    /// Solid objects cannot be moved through.
    pub solid: bool,
    /// Opaque objects would block sight; visibility does not consult it yet.
    pub opaque: bool,
}

impl OnMap {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            solid: false,
            opaque: false,
        }
    }

    pub fn solid(position: Position) -> Self {
        Self {
            position,
            solid: true,
            opaque: false,
        }
    }
}

/// Material type of a carryable thing; stacks group on this.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(ascii_case_insensitive)]
pub enum Material {
    #[strum(serialize = "rock")]
    Rock,
    #[strum(serialize = "quartz")]
    Quartz,
    #[strum(serialize = "copper ore")]
    CopperOre,
    #[strum(serialize = "iron ore")]
    IronOre,
    #[strum(serialize = "mithril ore")]
    MithrilOre,
    #[strum(serialize = "gem")]
    Gem,
    #[strum(serialize = "moss")]
    Moss,
    #[strum(serialize = "potion")]
    Potion,
    #[strum(serialize = "copper ingot")]
    CopperIngot,
    #[strum(serialize = "iron ingot")]
    IronIngot,
    #[strum(serialize = "mithril ingot")]
    MithrilIngot,
    #[strum(serialize = "copper trinket")]
    CopperTrinket,
    #[strum(serialize = "iron trinket")]
    IronTrinket,
    #[strum(serialize = "mithril trinket")]
    MithrilTrinket,
    /// The artifact whose completion wins the game.
    #[strum(serialize = "amulet")]
    Amulet,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyKind {
    #[strum(serialize = "enemy")]
    Normal,
    Elite,
}

/// Type tag used for display lookup and hover text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Ladder,
    Enemy(EnemyKind),
    Item(Material),
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Ladder => f.write_str("ladder"),
            EntityKind::Enemy(kind) => write!(f, "{kind}"),
            EntityKind::Item(material) => write!(f, "{material}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Named {
    pub kind: EntityKind,
}

impl Named {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind }
    }

    pub fn hover(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Carryable {
    pub material: Material,
}

impl Carryable {
    pub fn new(material: Material) -> Self {
        Self { material }
    }
}

/// Accepted into the workshop stockpile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Stockable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyState {
    pub kind: EnemyKind,
    pub hp: i32,
    pub damage: i32,
    /// Asleep until the player first sees it.
    pub active: bool,
    /// Set by a shove; the enemy loses its next action.
    pub staggered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Wallet {
    pub balance: i64,
}

impl Wallet {
    /// Applies a credit or debit. Debits that would overdraw are refused.
    pub fn transact(&mut self, amount: i64) -> bool {
        match self.balance.checked_add(amount) {
            Some(next) if next >= 0 => {
                self.balance = next;
                true
            }
            _ => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerStats {
    pub hp: i32,
    pub max_hp: i32,
    pub tool: String,
    /// Damage dealt to walls and enemies on bump.
    pub dmg: i32,
    /// Hardest material the tool can crack.
    pub hardness: i32,
    pub gear: BTreeSet<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Climbable;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BumpKind {
    /// Hit and shove.
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bumpable {
    pub kind: BumpKind,
}

impl Bumpable {
    pub fn new(kind: BumpKind) -> Self {
        Self { kind }
    }
}

/// Fixed-layout entity record: one optional slot per component kind.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Entity {
    pub on_map: Option<OnMap>,
    pub named: Option<Named>,
    pub carryable: Option<Carryable>,
    pub stockable: Option<Stockable>,
    pub enemy: Option<EnemyState>,
    pub wallet: Option<Wallet>,
    pub player: Option<PlayerStats>,
    pub inventory: Option<Inventory>,
    pub climbable: Option<Climbable>,
    pub bumpable: Option<Bumpable>,
}

impl Entity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style component insertion.
    #[must_use]
    pub fn with<C: Component>(mut self, component: C) -> Self {
        *C::slot_mut(&mut self) = Some(component);
        self
    }

    pub fn get<C: Component>(&self) -> Option<&C> {
        C::slot(self).as_ref()
    }

    pub fn components(&self) -> ComponentSet {
        let mut set = ComponentSet::empty();
        set.set(ComponentSet::ON_MAP, self.on_map.is_some());
        set.set(ComponentSet::NAMED, self.named.is_some());
        set.set(ComponentSet::CARRYABLE, self.carryable.is_some());
        set.set(ComponentSet::STOCKABLE, self.stockable.is_some());
        set.set(ComponentSet::ENEMY, self.enemy.is_some());
        set.set(ComponentSet::WALLET, self.wallet.is_some());
        set.set(ComponentSet::PLAYER, self.player.is_some());
        set.set(ComponentSet::INVENTORY, self.inventory.is_some());
        set.set(ComponentSet::CLIMBABLE, self.climbable.is_some());
        set.set(ComponentSet::BUMPABLE, self.bumpable.is_some());
        set
    }

    pub fn has(&self, required: ComponentSet) -> bool {
        self.components().contains(required)
    }

    pub fn position(&self) -> Option<Position> {
        self.on_map.map(|on_map| on_map.position)
    }
}

/// Entity templates.
impl Entity {
    /// Loose rock, quartz or ore lying on the floor.
    pub fn mineral(material: Material, position: Position) -> Self {
        Self::item(material).with(OnMap::new(position))
    }

    pub fn moss(position: Position) -> Self {
        Self::mineral(Material::Moss, position)
    }

    /// Carryable goods that are not on the map, e.g. crafted output.
    pub fn item(material: Material) -> Self {
        Self::new()
            .with(Named::new(EntityKind::Item(material)))
            .with(Carryable::new(material))
            .with(Stockable)
    }

    pub fn enemy(kind: EnemyKind, stats: EnemyStats, position: Position) -> Self {
        Self::new()
            .with(OnMap::solid(position))
            .with(Named::new(EntityKind::Enemy(kind)))
            .with(EnemyState {
                kind,
                hp: stats.hp,
                damage: stats.damage,
                active: false,
                staggered: false,
            })
            .with(Bumpable::new(BumpKind::Enemy))
    }

    pub fn ladder(position: Position) -> Self {
        Self::new()
            .with(OnMap::new(position))
            .with(Named::new(EntityKind::Ladder))
            .with(Climbable)
    }
}

/// A component kind with a dedicated slot in [`Entity`].
pub trait Component: Sized + 'static {
    const SET: ComponentSet;

    fn slot(entity: &Entity) -> &Option<Self>;

    fn slot_mut(entity: &mut Entity) -> &mut Option<Self>;
}

macro_rules! component {
    ($ty:ty, $field:ident, $flag:ident) => {
        impl Component for $ty {
            const SET: ComponentSet = ComponentSet::$flag;

            #[inline]
            fn slot(entity: &Entity) -> &Option<Self> {
                &entity.$field
            }

            #[inline]
            fn slot_mut(entity: &mut Entity) -> &mut Option<Self> {
                &mut entity.$field
            }
        }
    };
}

component!(OnMap, on_map, ON_MAP);
component!(Named, named, NAMED);
component!(Carryable, carryable, CARRYABLE);
component!(Stockable, stockable, STOCKABLE);
component!(EnemyState, enemy, ENEMY);
component!(Wallet, wallet, WALLET);
component!(PlayerStats, player, PLAYER);
component!(Inventory, inventory, INVENTORY);
component!(Climbable, climbable, CLIMBABLE);
component!(Bumpable, bumpable, BUMPABLE);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn material_names_round_trip_through_strum() {
        assert_eq!(Material::CopperOre.to_string(), "copper ore");
        assert_eq!("Copper Ore".parse::<Material>(), Ok(Material::CopperOre));
        assert_eq!(EntityKind::Enemy(EnemyKind::Normal).to_string(), "enemy");
        assert_eq!(EntityKind::Enemy(EnemyKind::Elite).to_string(), "elite");
    }

    #[test]
    fn components_reflect_filled_slots() {
        let entity = Entity::new()
            .with(OnMap::new(Position::new(1, 2)))
            .with(Carryable::new(Material::Moss))
            .with(Stockable);

        assert!(entity.has(ComponentSet::ON_MAP | ComponentSet::CARRYABLE));
        assert!(!entity.has(ComponentSet::ENEMY));
        assert_eq!(entity.position(), Some(Position::new(1, 2)));
    }

    #[test]
    fn wallet_refuses_overdraft() {
        let mut wallet = Wallet::default();
        assert!(wallet.transact(3));
        assert!(!wallet.transact(-5));
        assert_eq!(wallet.balance, 3);
        assert!(wallet.transact(-3));
        assert_eq!(wallet.balance, 0);
    }
}
