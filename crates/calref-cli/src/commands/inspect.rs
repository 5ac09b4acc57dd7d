//! Inspect command - show a reference table's structure and provenance.

use std::path::PathBuf;

use colored::Colorize;

use calref::{RefTable, TableStore};

pub fn run(table: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let table = RefTable::open(&table)?;
    let meta = table.metadata();

    if json_output {
        let out = serde_json::json!({
            "metadata": meta,
            "keywords": table.keywords().collect::<Vec<_>>(),
            "columns": table.column_names().collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Table".cyan().bold(),
        meta.path.display().to_string().white()
    );
    println!("  rows:    {}", meta.row_count.to_string().white().bold());
    println!("  columns: {}", meta.column_count.to_string().white().bold());
    println!("  size:    {} bytes", meta.size_bytes);

    let keywords: Vec<_> = table.keywords().collect();
    if !keywords.is_empty() {
        println!();
        println!("{}", "Header keywords:".yellow().bold());
        for (key, value) in keywords {
            println!("  {:12} {}", key, value);
        }
    }

    println!();
    println!("{}", "Columns:".yellow().bold());
    for name in table.column_names() {
        println!("  {}", name);
    }

    if verbose {
        println!();
        println!("  hash: {}", meta.hash);
        println!("  opened: {}", meta.opened_at);
    }

    Ok(())
}
