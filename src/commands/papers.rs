//! `papershelf papers` command

use crate::cli::Cli;
use crate::output_by_format;
use papershelf_core::error::Result;
use papershelf_core::store::PaperStore;

/// List papers with a path on this device
pub fn execute(cli: &Cli, store: &PaperStore) -> Result<()> {
    let papers = store.papers_on_device()?;

    output_by_format!(cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&papers)?);
            Ok(())
        },
        human => {
            if papers.is_empty() && !cli.quiet {
                println!("No papers found");
            }
            for paper in &papers {
                if paper.tags.is_empty() {
                    println!("{}", paper.name);
                } else {
                    println!("{} [{}]", paper.name, paper.tags.join(", "));
                }
            }
        }
    )
}
