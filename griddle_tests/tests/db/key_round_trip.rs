use crate::db::walk::Database;
use anyhow::Result;
use griddle_builder::{DatabaseBuilder, ItemId, Table};
use griddle_types::codec::RawBytesCodec;
use griddle_types::format::ItemType;
use rand::distributions::{Alphanumeric, DistString};
use rand::Rng;

fn write_solo(root: &Table<Vec<u8>>) -> Result<Vec<u8>> {
    let mut sink = vec![];
    DatabaseBuilder::write(root, &RawBytesCodec, &mut sink)?;
    Ok(sink)
}

fn list_item(table: &mut Table<Vec<u8>>, key: &str) -> ItemId {
    let id = table.insert(key);
    table.set_children_root(id);
    id
}

/// Builds `/` -> `/apps/` -> `/apps/...` three levels deep and checks that
/// every full key can be rebuilt from basenames along the parent chain.
#[test]
fn full_keys_rebuild_through_parent_chain() -> Result<()> {
    let mut root = Table::new();

    let top = list_item(&mut root, "/");
    let apps = list_item(&mut root, "/apps/");
    let system = root.insert_value("/system", vec![0]);
    root.attach_child(top, apps);
    root.attach_child(top, system);

    let editor = root.insert_value("/apps/editor", vec![1]);
    let term = root.insert_value("/apps/term", vec![2]);
    root.attach_child(apps, editor);
    root.attach_child(apps, term);

    let keys = ["/", "/apps/", "/system", "/apps/editor", "/apps/term"];

    let bytes = write_solo(&root)?;
    let table = Database::open(&bytes)?.root()?;
    assert_eq!(table.n_items() as usize, keys.len());

    for key in keys {
        let (index, _) = table.find(key)?;
        assert_eq!(table.full_key(index)?, key);
    }

    // Every record is reachable, and its rebuilt key is one of the inputs.
    for index in 0..table.n_items() {
        let full_key = table.full_key(index)?;
        assert!(keys.contains(&full_key.as_str()), "{full_key:?}");
    }
    Ok(())
}

#[test]
fn child_arrays_read_ascending_by_key() -> Result<()> {
    let mut root = Table::new();
    let parent = list_item(&mut root, "dir/");

    // Attach in scrambled order.
    for name in ["m", "c", "z", "a", "q"] {
        let child = root.insert_value(&format!("dir/{name}"), vec![0]);
        root.attach_child(parent, child);
    }

    let bytes = write_solo(&root)?;
    let table = Database::open(&bytes)?.root()?;

    let (_, dir) = table.find("dir/")?;
    assert_eq!(dir.item_type, ItemType::List);

    let child_keys: Vec<String> = table
        .child_indices(&dir)?
        .into_iter()
        .map(|index| table.full_key(index))
        .collect::<Result<_>>()?;
    assert_eq!(child_keys, ["dir/a", "dir/c", "dir/m", "dir/q", "dir/z"]);
    Ok(())
}

#[test]
fn random_flat_tables_round_trip() -> Result<()> {
    let mut rng = rand::thread_rng();
    for _ in 0..10 {
        let count = rng.gen_range(1usize..80);
        let mut root = Table::new();
        let mut keys = vec![];
        while keys.len() < count {
            let key_len = rng.gen_range(1usize..20);
            let key = Alphanumeric.sample_string(&mut rng, key_len);
            if root.get(&key).is_none() {
                let payload = vec![keys.len() as u8];
                root.insert_value(&key, payload);
                keys.push(key);
            }
        }

        let bytes = write_solo(&root)?;
        let table = Database::open(&bytes)?.root()?;
        for (at, key) in keys.iter().enumerate() {
            let (index, record) = table.find(key)?;
            assert_eq!(table.full_key(index)?, *key);
            assert_eq!(table.value_bytes(&record)?, &[at as u8]);
        }
    }
    Ok(())
}
