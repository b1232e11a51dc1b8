//! Tag commands: `tags`, `tag`, `tag-stats`, `tag-color`

use std::path::Path;

use crate::cli::Cli;
use crate::output_by_format;
use papershelf_core::error::Result;
use papershelf_core::paths;
use papershelf_core::store::PaperStore;

/// Print the tags of one file
pub fn execute_show(cli: &Cli, store: &PaperStore, path: &Path) -> Result<()> {
    let tags = store.get_tags(path);
    print_tags(cli, path, &tags)
}

/// Add tags to a file (and its siblings) and persist them
pub fn execute_add(cli: &Cli, store: &mut PaperStore, path: &Path, tags: &[String]) -> Result<()> {
    store.set_tags(path, tags);
    let report = store.flush()?;

    if report.paths_skipped > 0 && !cli.quiet {
        eprintln!(
            "warning: {} has not been ingested, its tags are kept for this session only",
            path.display()
        );
    }

    let tags = store.get_tags(path);
    print_tags(cli, path, &tags)
}

fn print_tags(cli: &Cli, path: &Path, tags: &[String]) -> Result<()> {
    output_by_format!(cli.format,
        json => {
            let output = serde_json::json!({
                "path": paths::normalize(path),
                "tags": tags,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            for tag in tags {
                println!("{}", tag);
            }
        }
    )
}

/// Print tag usage, most used first
pub fn execute_stats(cli: &Cli, store: &PaperStore) -> Result<()> {
    let usage = store.tag_usage()?;

    output_by_format!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&usage)?);
            Ok(())
        },
        human => {
            if usage.is_empty() && !cli.quiet {
                println!("No tags found");
            }
            let width = usage.iter().map(|t| t.name.len()).max().unwrap_or(0);
            for tag in &usage {
                match &tag.color {
                    Some(color) => {
                        println!("{:<width$}  {:>4}  {}", tag.name, tag.papers, color)
                    }
                    None => println!("{:<width$}  {:>4}", tag.name, tag.papers),
                }
            }
        }
    )
}

pub fn execute_color(cli: &Cli, store: &PaperStore, tag: &str, color: Option<&str>) -> Result<()> {
    store.set_tag_color(tag, color)?;

    output_by_format!(cli.format,
        json => {
            let output = serde_json::json!({ "tag": tag, "color": color });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        },
        human => {
            if !cli.quiet {
                match color {
                    Some(color) => println!("{} color set to {}", tag, color),
                    None => println!("{} color cleared", tag),
                }
            }
        }
    )
}
