use crate::prepare::Platform;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build preparation for the DSSAT crop simulation model
#[derive(Parser, Debug)]
#[command(
    name = "dssat-prep",
    about = "Prepare a DSSAT-CSM source tree for compilation",
    version,
    author,
    long_about = "dssat-prep scans a Fortran source tree for module declarations, orders the \
                  files so every module is compiled before its users, and writes a makefile \
                  that builds them in that order. It also patches platform-specific lines \
                  and stages the runtime data next to the executable."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the full preparation",
        long_about = "Patches platform markers, resolves the compile order, writes the makefile, \
                      creates the object and executable directories and copies the model data \
                      and profile next to the executable.\n\n\
                      Examples:\n  \
                      dssat-prep prepare\n  \
                      dssat-prep prepare /opt/dssat --model-version 4.7\n  \
                      dssat-prep prepare --no-stage --format json"
    )]
    Prepare(PrepareArgs),

    #[command(
        about = "Print the resolved compile order",
        long_about = "Collects and scans the sources and prints the order in which they must be \
                      compiled. Nothing is written to disk.\n\n\
                      Examples:\n  \
                      dssat-prep order\n  \
                      dssat-prep order --source-dir src --format json"
    )]
    Order(OrderArgs),

    #[command(
        about = "Render the makefile without touching the tree",
        long_about = "Resolves the compile order and prints the makefile, or writes it to the \
                      file given with --output. No directories are created and nothing is \
                      patched or staged.\n\n\
                      Examples:\n  \
                      dssat-prep makefile\n  \
                      dssat-prep makefile -o build.mk"
    )]
    Makefile(MakefileArgs),

    #[command(
        about = "Switch platform-specific lines in the given files",
        long_about = "Comments out lines marked for the other platform and uncomments lines \
                      marked for the target platform.\n\n\
                      Examples:\n  \
                      dssat-prep patch ModuleDefs.for\n  \
                      dssat-prep patch --platform windows ModuleDefs.for CRSIMDEF.for"
    )]
    Patch(PatchArgs),
}

/// Options shared by every command that reads the source tree.
#[derive(Args, Debug, Clone, Default)]
pub struct TreeArgs {
    #[arg(
        value_name = "ROOT",
        help = "Root directory of the installation (defaults to current directory)"
    )]
    pub root: Option<PathBuf>,

    #[arg(short = 'c', long, value_name = "FILE", help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        value_name = "MAJOR.MINOR",
        help = "Model version used in derived names, e.g. 4.7"
    )]
    pub model_version: Option<String>,

    #[arg(long, value_name = "DIR", help = "Source tree (relative to ROOT)")]
    pub source_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR", help = "Object directory (relative to ROOT)")]
    pub object_dir: Option<PathBuf>,

    #[arg(long, value_name = "CMD", help = "Fortran compiler command")]
    pub compiler: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[arg(long, value_enum, help = "Target platform for patching (defaults to host)")]
    pub platform: Option<PlatformArg>,

    #[arg(long, help = "Skip platform patching")]
    pub no_patch: bool,

    #[arg(long, help = "Skip copying data and profile")]
    pub no_stage: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct OrderArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Args, Debug, Clone)]
pub struct MakefileArgs {
    #[command(flatten)]
    pub tree: TreeArgs,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the makefile to FILE instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PatchArgs {
    #[arg(value_name = "FILE", required = true, help = "Files to patch in place")]
    pub files: Vec<PathBuf>,

    #[arg(long, value_enum, help = "Target platform (defaults to host)")]
    pub platform: Option<PlatformArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformArg {
    Linux,
    Windows,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Linux => Platform::Linux,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_prepare_args() {
        let args = CliArgs::parse_from(["dssat-prep", "prepare"]);
        match args.command {
            Commands::Prepare(prepare) => {
                assert!(prepare.tree.root.is_none());
                assert!(prepare.tree.config.is_none());
                assert!(prepare.platform.is_none());
                assert!(!prepare.no_patch);
                assert!(!prepare.no_stage);
                assert_eq!(prepare.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Prepare command"),
        }
    }

    #[test]
    fn test_prepare_with_overrides() {
        let args = CliArgs::parse_from([
            "dssat-prep",
            "prepare",
            "/opt/dssat",
            "--model-version",
            "4.7",
            "--compiler",
            "ifort",
            "--platform",
            "windows",
            "--no-stage",
        ]);
        match args.command {
            Commands::Prepare(prepare) => {
                assert_eq!(prepare.tree.root, Some(PathBuf::from("/opt/dssat")));
                assert_eq!(prepare.tree.model_version.as_deref(), Some("4.7"));
                assert_eq!(prepare.tree.compiler.as_deref(), Some("ifort"));
                assert_eq!(prepare.platform, Some(PlatformArg::Windows));
                assert!(prepare.no_stage);
            }
            _ => panic!("Expected Prepare command"),
        }
    }

    #[test]
    fn test_order_json_format() {
        let args = CliArgs::parse_from(["dssat-prep", "order", "--format", "json"]);
        match args.command {
            Commands::Order(order) => assert_eq!(order.format, OutputFormatArg::Json),
            _ => panic!("Expected Order command"),
        }
    }

    #[test]
    fn test_makefile_output() {
        let args = CliArgs::parse_from(["dssat-prep", "makefile", "-o", "build.mk"]);
        match args.command {
            Commands::Makefile(makefile) => {
                assert_eq!(makefile.output, Some(PathBuf::from("build.mk")))
            }
            _ => panic!("Expected Makefile command"),
        }
    }

    #[test]
    fn test_patch_requires_files() {
        assert!(CliArgs::try_parse_from(["dssat-prep", "patch"]).is_err());

        let args = CliArgs::parse_from(["dssat-prep", "patch", "a.for", "b.for"]);
        match args.command {
            Commands::Patch(patch) => assert_eq!(patch.files.len(), 2),
            _ => panic!("Expected Patch command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let args = CliArgs::parse_from(["dssat-prep", "order", "-v"]);
        assert!(args.verbose);
        assert!(!args.quiet);

        let args = CliArgs::parse_from(["dssat-prep", "--log-level", "trace", "order"]);
        assert_eq!(args.log_level.as_deref(), Some("trace"));

        assert!(CliArgs::try_parse_from(["dssat-prep", "order", "-v", "-q"]).is_err());
    }

    #[test]
    fn test_platform_arg_conversion() {
        assert_eq!(Platform::from(PlatformArg::Linux), Platform::Linux);
        assert_eq!(Platform::from(PlatformArg::Windows), Platform::Windows);
    }
}
