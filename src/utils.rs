//! Utils

use clap::Parser;

/// Arguments for the order examples
#[derive(Debug, Parser)]
pub struct ExampleOrderArgs {
    /// Fixture set to load the menu & orders from
    #[clap(short, long, default_value = "classic")]
    pub fixture: String,

    /// Order to place, defaults to the first one in the fixture set
    #[clap(short, long)]
    pub order: Option<String>,

    /// Tracing filter directive, e.g. `info` or `pizzeria=debug`
    #[clap(short, long, default_value = "info")]
    pub log_level: String,
}
