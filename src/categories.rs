//! Two-pass category hierarchy resolution.
//!
//! Pass one finds or creates the top-level parents needed by the observed
//! child names; pass two finds or creates the children under their resolved
//! parent ids. Lookup key is `(name, type, parent_id)` throughout, so the
//! same name can exist as a parent and as another category's child, or under
//! both types. Nothing is ever updated or deleted: a re-run against the same
//! sheet resolves to the same rows and writes nothing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;
use crate::normalize::TransactionKind;

fn find_category(
    conn: &Connection,
    name: &str,
    kind: &str,
    parent_id: Option<i64>,
) -> Result<Option<i64>> {
    let id = conn
        .query_row(
            "SELECT id FROM categories WHERE name = ?1 AND category_type = ?2 AND parent_id IS ?3",
            rusqlite::params![name, kind, parent_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn find_or_create(
    conn: &Connection,
    name: &str,
    kind: &str,
    parent_id: Option<i64>,
    is_default: bool,
) -> Result<i64> {
    if let Some(id) = find_category(conn, name, kind, parent_id)? {
        return Ok(id);
    }
    conn.execute(
        "INSERT INTO categories (name, category_type, parent_id, is_default) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![name, kind, parent_id, is_default as i32],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Resolve every `(childName, observedKind)` pair to a category id, creating
/// missing parents and children along the way.
///
/// `mapping` is the predefined `(child, parent)` region of the workbook; all
/// of its pairs carry `mapping_kind`, and when a child appears in it, the
/// mapping's type overrides the kind observed on the rows (the mapping is
/// authoritative for where a category lives, never for a transaction's own
/// polarity). Mapping entries whose child is never observed create nothing.
pub fn resolve_categories(
    conn: &Connection,
    observed: &[(String, TransactionKind)],
    mapping: &[(String, String)],
    mapping_kind: TransactionKind,
) -> Result<HashMap<(String, TransactionKind), i64>> {
    // First pair wins on duplicate children in the mapping region.
    let mut parent_of: BTreeMap<&str, &str> = BTreeMap::new();
    for (child, parent) in mapping {
        parent_of.entry(child.as_str()).or_insert(parent.as_str());
    }

    let observed_set: BTreeSet<&(String, TransactionKind)> = observed.iter().collect();

    // Pass one: parents reachable from an observed child.
    let needed_parents: BTreeSet<&str> = observed_set
        .iter()
        .filter_map(|(child, _)| parent_of.get(child.as_str()).copied())
        .collect();
    let mut parent_ids: HashMap<&str, i64> = HashMap::new();
    for parent in needed_parents {
        let id = find_or_create(conn, parent, mapping_kind.as_str(), None, true)?;
        parent_ids.insert(parent, id);
    }

    // Pass two: children under their resolved parent (or top-level).
    let mut resolved = HashMap::new();
    for (child, kind) in observed_set {
        let mapped_parent = parent_of.get(child.as_str());
        let effective_kind = if mapped_parent.is_some() { mapping_kind } else { *kind };
        let parent_id = mapped_parent.map(|p| parent_ids[p]);
        let id = find_or_create(conn, child, effective_kind.as_str(), parent_id, false)?;
        resolved.insert((child.clone(), *kind), id);
    }

    Ok(resolved)
}
