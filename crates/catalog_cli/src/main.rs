//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open a catalog database (file from `CATALOG_DB_PATH` or the first
//!   argument, otherwise in-memory) and print the admin site configuration.
//! - Optionally start file logging from `CATALOG_LOG_DIR`/`CATALOG_LOG_LEVEL`.

use catalog_core::admin::changelist::{change_list, ChangeListFilters, DateFilter};
use catalog_core::db::{open_db, open_db_in_memory};
use catalog_core::{core_version, init_logging_with, ping, AdminSite, LoggingConfig};
use log::error;
use std::process::ExitCode;

const DB_PATH_ENV: &str = "CATALOG_DB_PATH";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_run module=cli status=error error={err}");
            eprintln!("catalog_cli: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(config) = LoggingConfig::from_env()? {
        init_logging_with(config)?;
    }

    println!("catalog_core ping={}", ping());
    println!("catalog_core version={}", core_version());

    let db_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var(DB_PATH_ENV).ok());
    let conn = match db_path.as_deref() {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };

    let site = AdminSite::catalog()?;
    let today = chrono::Local::now().date_naive();
    for entity in site.entities() {
        let Some(admin) = site.get(entity) else {
            continue;
        };
        let listed = change_list(&conn, &site, entity, &ChangeListFilters::default(), today)?;
        println!(
            "admin entity={} name=\"{}\" rows={} columns={} filters={} inlines={}",
            entity,
            entity.verbose_name_plural(),
            listed.rows.len(),
            admin.list_display.join(","),
            admin.list_filter.join(","),
            admin
                .inlines
                .iter()
                .map(|inline| inline.child.model_name())
                .collect::<Vec<_>>()
                .join(",")
        );
        if admin.list_filter.iter().any(|name| name == "due_back") {
            let choices = DateFilter::ALL
                .iter()
                .map(|choice| choice.label())
                .collect::<Vec<_>>()
                .join("|");
            println!("admin entity={entity} filter=due_back choices={choices}");
        }
    }
    Ok(())
}
