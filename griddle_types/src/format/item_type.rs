use anyhow::{anyhow, Result};
use derive_more::{Deref, From};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::any;

#[derive(From, Deref, Clone, Copy)]
pub struct ItemTypeInt(u8);
impl From<ItemType> for ItemTypeInt {
    fn from(item_type: ItemType) -> Self {
        let int = item_type.to_u8().unwrap();
        Self(int)
    }
}

/// The one-byte tag of an item record. The discriminants are the ASCII
/// bytes stored on disk; they never change across versions.
#[repr(u8)]
#[derive(PartialEq, Eq, Hash, Clone, Copy, FromPrimitive, ToPrimitive, Debug)]
pub enum ItemType {
    Value = b'v',
    List = b'L',
    Table = b'H',
}
impl TryFrom<ItemTypeInt> for ItemType {
    type Error = anyhow::Error;
    fn try_from(int: ItemTypeInt) -> Result<Self> {
        ItemType::from_u8(int.0).ok_or(anyhow!(
            "Unknown {} {}",
            any::type_name::<ItemTypeInt>(),
            int.0
        ))
    }
}
