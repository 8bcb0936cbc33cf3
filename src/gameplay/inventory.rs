//! Typed item inventories

use std::fmt;

use serde::{Deserialize, Serialize};

/// Every kind of item a player can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    Empanada,
    Lomito,
    Pizza,
    Burger,
    Rum,
    Tobacco,
    Honey,
}

impl ItemKind {
    pub const COUNT: usize = 7;

    pub const ALL: [Self; Self::COUNT] = [
        Self::Empanada,
        Self::Lomito,
        Self::Pizza,
        Self::Burger,
        Self::Rum,
        Self::Tobacco,
        Self::Honey,
    ];

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Empanada => "empanada",
            Self::Lomito => "lomito",
            Self::Pizza => "pizza",
            Self::Burger => "burger",
            Self::Rum => "rum",
            Self::Tobacco => "tobacco",
            Self::Honey => "honey",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when removing more items than are held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsufficientItems {
    pub kind: ItemKind,
    pub requested: u32,
    pub available: u32,
}

impl fmt::Display for InsufficientItems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Not enough {}: requested {}, have {}",
            self.kind, self.requested, self.available
        )
    }
}

impl std::error::Error for InsufficientItems {}

/// Anything that holds items.
pub trait Inventory {
    /// Number of items of a kind
    fn count(&self, kind: ItemKind) -> u32;

    fn add(&mut self, kind: ItemKind, amount: u32);

    /// Remove `amount` items. Nothing changes on failure.
    ///
    /// # Errors
    ///
    /// Returns [`InsufficientItems`] if fewer than `amount` are held.
    fn remove(&mut self, kind: ItemKind, amount: u32) -> Result<(), InsufficientItems>;

    fn clear(&mut self);

    fn has(&self, kind: ItemKind, amount: u32) -> bool {
        self.count(kind) >= amount
    }

    /// Items of every kind
    fn total(&self) -> u32 {
        ItemKind::ALL.iter().map(|&kind| self.count(kind)).sum()
    }
}

/// Per-kind item counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCounts {
    counts: [u32; ItemKind::COUNT],
}

impl ItemCounts {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style add
    #[must_use]
    pub fn with(mut self, kind: ItemKind, amount: u32) -> Self {
        self.add(kind, amount);
        self
    }

    /// Non-zero entries in [`ItemKind::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (ItemKind, u32)> + '_ {
        ItemKind::ALL
            .into_iter()
            .map(|kind| (kind, self.counts[kind.index()]))
            .filter(|&(_, count)| count > 0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Whether `inventory` holds at least these counts
    #[must_use]
    pub fn satisfied_by(&self, inventory: &(impl Inventory + ?Sized)) -> bool {
        self.iter().all(|(kind, count)| inventory.has(kind, count))
    }
}

impl FromIterator<(ItemKind, u32)> for ItemCounts {
    fn from_iter<I: IntoIterator<Item = (ItemKind, u32)>>(iter: I) -> Self {
        let mut counts = Self::new();
        for (kind, amount) in iter {
            counts.add(kind, amount);
        }
        counts
    }
}

impl fmt::Display for ItemCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (kind, count) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{count} {kind}")?;
            first = false;
        }
        if first {
            f.write_str("nothing")?;
        }
        Ok(())
    }
}

impl Inventory for ItemCounts {
    fn count(&self, kind: ItemKind) -> u32 {
        self.counts[kind.index()]
    }

    fn add(&mut self, kind: ItemKind, amount: u32) {
        let slot = &mut self.counts[kind.index()];
        *slot = slot.saturating_add(amount);
    }

    fn remove(&mut self, kind: ItemKind, amount: u32) -> Result<(), InsufficientItems> {
        let slot = &mut self.counts[kind.index()];
        if *slot < amount {
            return Err(InsufficientItems {
                kind,
                requested: amount,
                available: *slot,
            });
        }
        *slot -= amount;
        Ok(())
    }

    fn clear(&mut self) {
        self.counts = [0; ItemKind::COUNT];
    }
}

/// Move items between two inventories.
///
/// # Errors
///
/// Returns [`InsufficientItems`] if `from` holds fewer than `amount`; neither
/// side changes in that case.
pub fn transfer(
    from: &mut dyn Inventory,
    to: &mut dyn Inventory,
    kind: ItemKind,
    amount: u32,
) -> Result<(), InsufficientItems> {
    from.remove(kind, amount)?;
    to.add(kind, amount);
    Ok(())
}
