//! The list command

use colored::Colorize;
use std::path::Path;
use suite_core::ServiceSpec;

use super::load_catalog;
use crate::error::Result;

/// The command template as written in the catalog.
fn command_template(spec: &ServiceSpec) -> String {
    std::iter::once(spec.command.script.as_str())
        .chain(spec.command.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run the list command
pub fn run_list(catalog: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    println!("{}", "Services".bold());
    println!();

    for spec in &catalog.services {
        println!(
            "  {:<24} {:<18} {:<7} {}",
            spec.name.green(),
            spec.directory,
            spec.ecosystem.as_str().cyan(),
            command_template(spec).dimmed()
        );
    }

    println!();
    println!("{} {} services", "Total:".dimmed(), catalog.len());

    Ok(())
}
