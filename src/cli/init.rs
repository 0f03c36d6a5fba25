use colored::Colorize;

use crate::db::{get_connection, init_db};
use crate::error::Result;
use crate::settings::{save_settings, Settings};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = Settings::default();
    if let Some(dir) = data_dir {
        settings.data_dir = dir;
    }

    let dir = std::path::PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&dir)?;
    save_settings(&settings)?;

    let db_path = dir.join("jangbu.db");
    let conn = get_connection(&db_path)?;
    init_db(&conn)?;

    println!("Data dir:  {}", dir.display());
    println!("Database:  {}", db_path.display());
    println!("{}", "Ready. Seed a workbook with `jangbu seed expenses <file>`.".green());
    Ok(())
}
