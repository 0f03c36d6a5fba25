use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("jangbu.db");

    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());
    println!("Sheet TZ:   UTC{:+}", settings.tz_offset_hours);

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;
        println!();
        for (label, table) in [
            ("Categories:  ", "categories"),
            ("Members:     ", "members"),
            ("Institutions:", "institutions"),
            ("Accounts:    ", "accounts"),
            ("Holdings:    ", "holdings"),
            ("Snapshots:   ", "snapshots"),
            ("Transactions:", "transactions"),
            ("Imports:     ", "imports"),
        ] {
            let n: i64 = conn.query_row(&format!("SELECT count(*) FROM {table}"), [], |r| r.get(0))?;
            println!("{label} {n}");
        }
    } else {
        println!();
        println!("Database not found. Run `jangbu init` to set up.");
    }

    Ok(())
}
