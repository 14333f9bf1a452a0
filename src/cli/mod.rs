pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    CliArgs, Commands, MakefileArgs, OrderArgs, PatchArgs, PlatformArg, PrepareArgs, TreeArgs,
};
pub use output::{OutputFormat, OutputFormatter};
