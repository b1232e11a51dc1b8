use clap::ValueEnum;

/// Output format for papershelf commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
}

/// Run the branch matching the output format.
///
/// The `json` branch is an expression returning `Result<()>`; the `human`
/// branch is a block.
#[macro_export]
macro_rules! output_by_format {
    ($format:expr, json => $json:expr, human => $human:block) => {
        match $format {
            $crate::cli::OutputFormat::Json => $json,
            $crate::cli::OutputFormat::Human => {
                $human;
                Ok(())
            }
        }
    };
}
