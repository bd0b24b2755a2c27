pub mod cli;
pub mod config;
pub mod pipeline;

pub use cli::{build_cli_command, Cli};
pub use config::{DatasetConfig, DestestConfig, PathsConfig, SynthesisConfig};
pub use pipeline::{run, select_renderer, RunReport, Stage};
