use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::models::Category;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("jangbu.db"))?;
    let mut stmt = conn.prepare(
        "SELECT id, name, category_type, parent_id, is_default FROM categories \
         ORDER BY category_type, COALESCE(parent_id, id), parent_id IS NOT NULL, name",
    )?;
    let categories: Vec<Category> = stmt
        .query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                name: row.get(1)?,
                kind: row.get(2)?,
                parent_id: row.get(3)?,
                is_default: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if categories.is_empty() {
        println!("No categories yet. Seed a workbook first.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Type", "Default"]);
    for cat in &categories {
        let name = if cat.parent_id.is_some() {
            format!("  └ {}", cat.name)
        } else {
            cat.name.clone()
        };
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(name),
            Cell::new(&cat.kind),
            Cell::new(if cat.is_default { "yes" } else { "" }),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
