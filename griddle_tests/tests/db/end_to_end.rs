use crate::db::walk::Database;
use anyhow::Result;
use griddle_builder::{DatabaseBuilder, Table};
use griddle_types::codec::RawBytesCodec;
use griddle_types::format::{ItemType, SIGNATURE};

fn write_solo(root: &Table<Vec<u8>>) -> Result<Vec<u8>> {
    let mut sink = vec![];
    DatabaseBuilder::write(root, &RawBytesCodec, &mut sink)?;
    Ok(sink)
}

#[test]
fn value_and_nested_table() -> Result<()> {
    let mut nested = Table::new();
    let list_root = nested.insert("");
    nested.set_children_root(list_root);
    let x = nested.insert_value("x", vec![7]);
    nested.attach_child(list_root, x);

    let mut root = Table::new();
    root.insert_value("foo", vec![42]);
    root.insert_table("bar/", nested);

    let bytes = write_solo(&root)?;

    assert_eq!(&bytes[..8], &SIGNATURE);
    let db = Database::open(&bytes)?;
    assert!(!db.root_pointer().is_null());

    let table = db.root()?;
    assert_eq!(table.n_items(), 2);

    let (_, foo) = table.find("foo")?;
    assert_eq!(table.value_bytes(&foo)?, &[42]);

    let (_, bar) = table.find("bar/")?;
    assert_eq!(bar.item_type, ItemType::Table);
    let sub = table.nested_table(&bar)?;
    let (x_index, x) = sub.find("x")?;
    assert_eq!(sub.value_bytes(&x)?, &[7]);
    assert_eq!(sub.full_key(x_index)?, "x");

    Ok(())
}

#[test]
fn missing_keys_are_not_found() -> Result<()> {
    let mut root = Table::new();
    root.insert_value("present", vec![1]);

    let bytes = write_solo(&root)?;
    let table = Database::open(&bytes)?.root()?;

    assert!(table.lookup("absent")?.is_none());
    assert!(table.lookup("presen")?.is_none());
    assert!(table.lookup("present ")?.is_none());
    Ok(())
}

#[test]
fn options_blob_round_trips() -> Result<()> {
    let mut root = Table::new();
    let id = root.insert("flagged");
    root.set_value(id, vec![1, 2, 3], Some(vec![9, 9]));
    let plain = root.insert("plain");
    root.set_value(plain, vec![4], None);

    let bytes = write_solo(&root)?;
    let db = Database::open(&bytes)?;
    let table = db.root()?;

    let (_, flagged) = table.find("flagged")?;
    assert_eq!(table.value_bytes(&flagged)?, &[1, 2, 3]);
    assert!(!flagged.options.is_null());
    assert_eq!(flagged.options.start % 8, 0);
    assert_eq!(db.deref(flagged.options), &[9, 9]);

    let (_, plain) = table.find("plain")?;
    assert!(plain.options.is_null());
    Ok(())
}

#[test]
fn empty_database() -> Result<()> {
    let bytes = write_solo(&Table::new())?;
    let table = Database::open(&bytes)?.root()?;
    assert_eq!(table.n_items(), 0);
    assert_eq!(table.n_buckets(), 0);
    assert!(table.lookup("anything")?.is_none());
    Ok(())
}

#[test]
fn tables_nest_recursively() -> Result<()> {
    let mut inner = Table::new();
    inner.insert_value("leaf", vec![3]);

    let mut middle = Table::new();
    middle.insert_table("inner/", inner);
    middle.insert_value("sibling", vec![2]);

    let mut root = Table::new();
    root.insert_table("middle/", middle);

    let bytes = write_solo(&root)?;
    let table = Database::open(&bytes)?.root()?;

    let (_, middle) = table.find("middle/")?;
    let middle = table.nested_table(&middle)?;
    let (_, sibling) = middle.find("sibling")?;
    assert_eq!(middle.value_bytes(&sibling)?, &[2]);

    let (_, inner) = middle.find("inner/")?;
    let inner = middle.nested_table(&inner)?;
    let (_, leaf) = inner.find("leaf")?;
    assert_eq!(inner.value_bytes(&leaf)?, &[3]);
    Ok(())
}

#[test]
fn bucket_chains_cover_every_key() -> Result<()> {
    // Enough keys that several buckets chain more than one item.
    let keys: Vec<String> = (0..64).map(|at| format!("key-{at:02}")).collect();

    let mut root = Table::new();
    for (at, key) in keys.iter().enumerate() {
        root.insert_value(key, vec![at as u8]);
    }

    let bytes = write_solo(&root)?;
    let table = Database::open(&bytes)?.root()?;
    assert_eq!(table.n_items(), keys.len() as u32);

    for (at, key) in keys.iter().enumerate() {
        let (_, record) = table.find(key)?;
        assert_eq!(table.value_bytes(&record)?, &[at as u8]);
    }
    Ok(())
}
