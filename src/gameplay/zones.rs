//! Pickups and timed zones
//!
//! Pickups are collected the moment the player's box overlaps them. Zones
//! need the player to stay inside for a dwell time; leaving early resets
//! the timer.

use serde::{Deserialize, Serialize};

use super::inventory::{Inventory, ItemKind};
use super::player::Player;
use crate::world::PixelRect;

/// What a pickup gives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Item(ItemKind),
    Coin,
}

/// A one-shot collectible
#[derive(Debug, Clone, PartialEq)]
pub struct Pickup {
    rect: PixelRect,
    kind: PickupKind,
    collected: bool,
}

impl Pickup {
    #[must_use]
    pub fn new(rect: PixelRect, kind: PickupKind) -> Self {
        Self {
            rect,
            kind,
            collected: false,
        }
    }

    #[must_use]
    pub fn food(rect: PixelRect, item: ItemKind) -> Self {
        Self::new(rect, PickupKind::Item(item))
    }

    #[must_use]
    pub fn coin(rect: PixelRect) -> Self {
        Self::new(rect, PickupKind::Coin)
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn kind(&self) -> PickupKind {
        self.kind
    }

    #[must_use]
    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Hand the pickup to the player if they overlap it
    pub fn try_collect(&mut self, player: &mut Player) -> Option<PickupKind> {
        if self.collected || !self.rect.intersects(&player.rect()) {
            return None;
        }
        self.collected = true;
        match self.kind {
            PickupKind::Item(item) => player.add(item, 1),
            PickupKind::Coin => player.add_coins(1),
        }
        Some(self.kind)
    }
}

/// Restaurant counter: standing in it long enough hands out one item,
/// unless the player already carries one.
#[derive(Debug, Clone, PartialEq)]
pub struct FoodZone {
    rect: PixelRect,
    item: ItemKind,
    give_time: f32,
    started: Option<f32>,
}

impl FoodZone {
    #[must_use]
    pub fn new(rect: PixelRect, item: ItemKind, give_time: f32) -> Self {
        Self {
            rect,
            item,
            give_time,
            started: None,
        }
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn item(&self) -> ItemKind {
        self.item
    }

    /// Returns the item handed out this tick, if any
    pub fn update(&mut self, player: &mut Player, now: f32) -> Option<ItemKind> {
        let needs_item = !player.has(self.item, 1);
        if !needs_item || !self.rect.intersects(&player.rect()) {
            self.started = None;
            return None;
        }

        let started = *self.started.get_or_insert(now);
        if now - started < self.give_time {
            return None;
        }
        self.started = None;
        player.add(self.item, 1);
        log::debug!("Restaurant handed out {}", self.item);
        Some(self.item)
    }
}

/// Item kinds a delivery zone accepts by default, most valuable first
pub const DEFAULT_DELIVERABLES: [ItemKind; 2] = [ItemKind::Lomito, ItemKind::Empanada];

/// Drop-off point: after `dwell` seconds inside it one carried item is
/// consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryZone {
    rect: PixelRect,
    dwell: f32,
    deliverables: Vec<ItemKind>,
    /// Timer start and the item picked when it started
    pending: Option<(f32, ItemKind)>,
}

impl DeliveryZone {
    #[must_use]
    pub fn new(rect: PixelRect, dwell: f32) -> Self {
        Self {
            rect,
            dwell,
            deliverables: DEFAULT_DELIVERABLES.to_vec(),
            pending: None,
        }
    }

    /// Accepted items, in preference order
    #[must_use]
    pub fn with_deliverables(mut self, deliverables: Vec<ItemKind>) -> Self {
        self.deliverables = deliverables;
        self
    }

    #[must_use]
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    #[must_use]
    pub fn is_delivering(&self) -> bool {
        self.pending.is_some()
    }

    /// Fraction of the dwell time spent so far, 0 when idle
    #[must_use]
    pub fn progress(&self, now: f32) -> f32 {
        match self.pending {
            Some((started, _)) if self.dwell > 0.0 => ((now - started) / self.dwell).clamp(0.0, 1.0),
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Returns the item delivered this tick, if any
    pub fn update(&mut self, player: &mut Player, now: f32) -> Option<ItemKind> {
        let carried = self
            .deliverables
            .iter()
            .copied()
            .find(|&kind| player.has(kind, 1));

        let Some(candidate) = carried.filter(|_| self.rect.intersects(&player.rect())) else {
            self.pending = None;
            return None;
        };

        let (started, item) = *self.pending.get_or_insert((now, candidate));
        if now - started < self.dwell {
            return None;
        }
        self.pending = None;

        // The item chosen at the start may have been spent in the meantime
        player.remove(item, 1).ok()?;
        log::debug!("Delivered {item}");
        Some(item)
    }
}
