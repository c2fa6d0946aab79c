use derive_more::{Deref, From};
use griddle_types::format::KeyHash;
use std::collections::HashMap;
use std::ops::Index;

/// Handle to an [`Item`] within the [`Table`] that owns it. Stable for the
/// lifetime of the table; never dangles because items are arena-owned and
/// only dropped with the whole table.
#[derive(From, Deref, Clone, Copy, PartialEq, Eq, Debug)]
pub struct ItemId(usize);

/// One named node in the key tree. Holds exactly one payload, fixed at
/// assignment time.
pub struct Item<V> {
    key: String,
    hash: KeyHash,
    parent: Option<ItemId>,
    payload: Option<Payload<V>>,
}

impl<V> Item<V> {
    pub fn key(&self) -> &str {
        &self.key
    }
    pub fn hash(&self) -> KeyHash {
        self.hash
    }
    pub fn parent(&self) -> Option<ItemId> {
        self.parent
    }
    pub fn payload(&self) -> Option<&Payload<V>> {
        self.payload.as_ref()
    }
}

pub enum Payload<V> {
    Value { data: V, options: Option<V> },
    Table(Table<V>),
    /// Ordered ascending by key; kept sorted at attach time.
    List { children: Vec<ItemId> },
}

/// An unordered collection of items sharing one hash namespace, keyed by
/// full key for uniqueness. A table nested inside an item is serialized as
/// an independent sub-database.
///
/// All contract violations (duplicate key, payload set twice, child key not
/// extending the parent key) panic: they are bugs in the tree-building
/// code, not bad input data.
#[derive(Default)]
pub struct Table<V> {
    items: Vec<Item<V>>,
    by_key: HashMap<String, ItemId>,
}

impl<V> Table<V> {
    pub fn new() -> Self {
        Self {
            items: vec![],
            by_key: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Creates an item with no payload yet. The hash of the full key is
    /// computed here, once.
    pub fn insert(&mut self, key: &str) -> ItemId {
        assert!(
            !self.by_key.contains_key(key),
            "duplicate key {key:?} in table"
        );
        let id = ItemId(self.items.len());
        self.items.push(Item {
            key: String::from(key),
            hash: KeyHash::compute(key),
            parent: None,
            payload: None,
        });
        self.by_key.insert(String::from(key), id);
        id
    }

    /* Payload assignment. Each item accepts exactly one. */

    pub fn set_value(&mut self, id: ItemId, data: V, options: Option<V>) {
        self.set_payload(id, Payload::Value { data, options });
    }

    pub fn set_table(&mut self, id: ItemId, table: Table<V>) {
        self.set_payload(id, Payload::Table(table));
    }

    pub fn set_children_root(&mut self, id: ItemId) {
        self.set_payload(id, Payload::List { children: vec![] });
    }

    fn set_payload(&mut self, id: ItemId, payload: Payload<V>) {
        let item = &mut self.items[*id];
        assert!(
            item.payload.is_none(),
            "payload already set for {:?}",
            item.key
        );
        item.payload = Some(payload);
    }

    /// Shorthand for `insert` + `set_value` without options.
    pub fn insert_value(&mut self, key: &str, data: V) -> ItemId {
        let id = self.insert(key);
        self.set_value(id, data, None);
        id
    }

    /// Shorthand for inserting an item holding a nested table.
    pub fn insert_table(&mut self, key: &str, table: Table<V>) -> ItemId {
        let id = self.insert(key);
        self.set_table(id, table);
        id
    }

    /// Inserts `child` into `parent`'s child list, keeping the list
    /// ascending by key, and records the parent link. The child's key must
    /// have the parent's key as a string prefix.
    pub fn attach_child(&mut self, parent: ItemId, child: ItemId) {
        assert!(parent != child, "item attached to itself");

        let child_key = self.items[*child].key.clone();
        assert!(
            self.items[*child].parent.is_none(),
            "item {child_key:?} already attached"
        );

        let parent_key = self.items[*parent].key.clone();
        assert!(
            child_key.starts_with(&parent_key),
            "child key {child_key:?} does not extend parent key {parent_key:?}"
        );

        // Insertion sort at attach time, not at serialization time.
        let at = match self.items[*parent].payload {
            Some(Payload::List { ref children }) => children
                .iter()
                .position(|sibling| self.items[**sibling].key > child_key)
                .unwrap_or(children.len()),
            _ => panic!("parent {parent_key:?} does not hold a child list"),
        };
        match self.items[*parent].payload {
            Some(Payload::List { ref mut children }) => children.insert(at, child),
            _ => unreachable!(),
        }

        self.items[*child].parent = Some(parent);
    }

    pub fn get(&self, key: &str) -> Option<ItemId> {
        self.by_key.get(key).copied()
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemId, &Item<V>)> {
        self.items
            .iter()
            .enumerate()
            .map(|(at, item)| (ItemId(at), item))
    }

    /// The item's key with its parent's key prefix stripped; what is stored
    /// on disk.
    pub fn basename(&self, id: ItemId) -> &str {
        let item = &self.items[*id];
        match item.parent {
            Some(parent) => &item.key[self.items[*parent].key.len()..],
            None => &item.key,
        }
    }
}

impl<V> Index<ItemId> for Table<V> {
    type Output = Item<V>;
    fn index(&self, id: ItemId) -> &Item<V> {
        &self.items[*id]
    }
}
