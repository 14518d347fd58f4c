use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Read the ResourceList from FILE instead of stdin ("-" means stdin)
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Write the resulting ResourceList to FILE instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ResolveArgs {
    /// Read the ResourceList from FILE instead of stdin ("-" means stdin)
    #[arg(long, short, value_name = "FILE")]
    pub input: Option<PathBuf>,
}
