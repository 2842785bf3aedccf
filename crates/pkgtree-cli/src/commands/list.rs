//! Handler for `pkgtree list`.

use miette::Result;

use pkgtree_ops::ops_list;

use crate::cli::{GlobalArgs, OutputFormat};

pub fn exec(global: &GlobalArgs, packages: &[String], format: OutputFormat) -> Result<()> {
    let db = super::open_database(global)?;
    let listed = ops_list::list(&db, packages)?;

    if format == OutputFormat::Json {
        println!("{}", super::to_json(&listed)?);
        return Ok(());
    }

    for package in &listed {
        println!("{}", console::style(&package.package).bold());
        for version in &package.versions {
            println!(
                "    {:<16} slot {:<8} [{}]",
                version.version,
                version.slot,
                version.keywords.join(" ")
            );
        }
    }
    Ok(())
}
