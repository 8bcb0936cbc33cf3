//! Gameplay module
//!
//! The player, what they carry, and the places and people they deal with.

mod inventory;
mod orders;
mod player;
mod zones;

pub use inventory::{InsufficientItems, Inventory, ItemCounts, ItemKind, transfer};
pub use orders::{
    CompletedOrder, OrderBoard, OrderBoardConfig, OrderRequest, OrderStatistics, OrderStatus,
    OrderUpdate,
};
pub use player::{Player, PlayerConfig};
pub use zones::{DEFAULT_DELIVERABLES, DeliveryZone, FoodZone, Pickup, PickupKind};
