// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Domain types for gear.
//!
//! - Gear: the six slots, in enumeration order
//! - GearSet: the sixteen equipment sets
//! - SetCombo: sorted six-tuple of set ids with its base-16 address
//! - Item: an equippable item with stats and integer tags

pub mod constants;
pub mod item;
pub mod set;
pub mod set_combo;
pub mod slot;

pub use constants::*;
pub use item::{Item, ItemId, ItemStat, StatKind};
pub use set::GearSet;
pub use set_combo::SetCombo;
pub use slot::Gear;
