//! Configuration for a preparation run
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment variables, then command-line flags (applied by the CLI).
//! Every path not set explicitly is derived from the root directory and the
//! model version, so the defaults reproduce the usual layout:
//!
//! ```text
//! <root>/dssat-csm/            source tree
//! <root>/obj/                  object files, <root>/obj/mod for .mod files
//! <root>/DSSAT46/DSCSM046.EXE  executable
//! <root>/DSSATPRO.L46          profile copied next to the executable
//! <root>/makefile              generated build script
//! ```
//!
//! # Environment Variables
//!
//! - `DSSAT_PREP_VERSION`: model version as `MAJOR.MINOR` - default: "4.6"
//! - `DSSAT_PREP_ROOT_DIR`: root directory - default: "."
//! - `DSSAT_PREP_SOURCE_DIR`: source tree - default: "<root>/dssat-csm"
//! - `DSSAT_PREP_OBJECT_DIR`: object directory - default: "<root>/obj"
//! - `DSSAT_PREP_COMPILER`: compiler command - default: "gfortran"
//! - `DSSAT_PREP_PLATFORM`: patch target (linux|windows) - default: host

use crate::emit::EmitConfig;
use crate::prepare::Platform;
use crate::resolve::Resolver;
use crate::source::{CollectorConfig, ModuleName};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_VERSION_MAJOR: u32 = 4;
const DEFAULT_VERSION_MINOR: u32 = 6;
const DEFAULT_SOURCE_SUBDIR: &str = "dssat-csm";
const DEFAULT_OBJECT_SUBDIR: &str = "obj";
const DEFAULT_COMPILER: &str = "gfortran";
const DEFAULT_COMPILE_FLAGS: &str =
    "-O2 -ffixed-line-length-132 -ffree-line-length-none -fd-lines-as-comments -c";
const DEFAULT_INCLUDE_FLAGS: &str = "-I$(OD)/mod -J$(OD)/mod";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    #[error("Failed to parse {field}: {error}")]
    ParseError { field: String, error: String },

    #[error("Failed to read config file {path}: {source}")]
    FileRead { path: PathBuf, source: io::Error },

    #[error("Invalid config file {path}: {source}")]
    FileParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub version_major: u32,
    pub version_minor: u32,

    pub root_dir: PathBuf,
    /// Relative paths below are taken relative to `root_dir`.
    pub source_dir: Option<PathBuf>,
    pub object_dir: Option<PathBuf>,
    pub exe_dir: Option<PathBuf>,
    pub exe_name: Option<String>,
    pub profile_name: Option<String>,
    /// Data directory inside the source tree, copied into the executable directory.
    pub data_subdir: String,
    pub makefile_name: String,
    pub title: String,

    pub compiler: String,
    pub compile_flags: String,
    pub include_flags: String,
    pub module_subdir: String,
    pub extensions: Vec<String>,
    pub object_suffix: String,
    /// Created under the object directory in addition to the ones the sources need.
    pub object_subdirs: Vec<String>,

    pub source_markers: Vec<String>,
    pub candidate_keywords: Vec<String>,
    /// Modules provided by the compiler rather than by any source file.
    pub external_modules: Vec<ModuleName>,

    /// Files, relative to the source directory, carrying platform markers.
    pub platform_files: Vec<PathBuf>,
    pub platform: Platform,
}

impl Default for PrepConfig {
    fn default() -> Self {
        Self {
            version_major: DEFAULT_VERSION_MAJOR,
            version_minor: DEFAULT_VERSION_MINOR,
            root_dir: PathBuf::from("."),
            source_dir: None,
            object_dir: None,
            exe_dir: None,
            exe_name: None,
            profile_name: None,
            data_subdir: "Data".to_string(),
            makefile_name: "makefile".to_string(),
            title: "DSSAT-CSM".to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            compile_flags: DEFAULT_COMPILE_FLAGS.to_string(),
            include_flags: DEFAULT_INCLUDE_FLAGS.to_string(),
            module_subdir: "mod".to_string(),
            extensions: vec![".for".to_string(), ".f90".to_string(), ".F90".to_string()],
            object_suffix: ".o".to_string(),
            object_subdirs: ["mod", "OP_OBS", "ORYZA", "SALUS", "ttutil"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            source_markers: vec![".f".to_string()],
            candidate_keywords: vec!["end".to_string(), "module".to_string()],
            external_modules: [
                "iso_c_binding",
                "iso_fortran_env",
                "ieee_arithmetic",
                "ieee_exceptions",
                "ieee_features",
            ]
            .iter()
            .filter_map(|name| ModuleName::new(name))
            .collect(),
            platform_files: vec![PathBuf::from("ModuleDefs.for"), PathBuf::from("CRSIMDEF.for")],
            platform: Platform::host(),
        }
    }
}

impl PrepConfig {
    /// Defaults, overlaid with `file` if given, overlaid with the environment.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text).map_err(|source| ConfigError::FileParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(version) = env::var("DSSAT_PREP_VERSION") {
            self.set_version_from("DSSAT_PREP_VERSION", &version)?;
        }
        if let Ok(root) = env::var("DSSAT_PREP_ROOT_DIR") {
            self.root_dir = PathBuf::from(root);
        }
        if let Ok(source) = env::var("DSSAT_PREP_SOURCE_DIR") {
            self.source_dir = Some(PathBuf::from(source));
        }
        if let Ok(object) = env::var("DSSAT_PREP_OBJECT_DIR") {
            self.object_dir = Some(PathBuf::from(object));
        }
        if let Ok(compiler) = env::var("DSSAT_PREP_COMPILER") {
            self.compiler = compiler;
        }
        if let Ok(platform) = env::var("DSSAT_PREP_PLATFORM") {
            self.platform = parse_platform(&platform)?;
        }
        Ok(())
    }

    /// Sets the model version from a `MAJOR.MINOR` string such as `4.7`.
    pub fn set_version(&mut self, value: &str) -> Result<(), ConfigError> {
        self.set_version_from("version", value)
    }

    fn set_version_from(&mut self, field: &str, value: &str) -> Result<(), ConfigError> {
        let (major, minor) = parse_version(field, value)?;
        self.version_major = major;
        self.version_minor = minor;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compiler.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Compiler command must not be empty".to_string(),
            ));
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::ValidationFailed(
                "At least one source extension is required".to_string(),
            ));
        }
        if let Some(bad) = self.extensions.iter().find(|ext| !ext.starts_with('.') || ext.len() < 2) {
            return Err(ConfigError::ValidationFailed(format!(
                "Invalid source extension: '{}'. Extensions must start with '.'",
                bad
            )));
        }
        if self.source_markers.iter().all(|m| m.is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "At least one non-empty source marker is required".to_string(),
            ));
        }
        if self.candidate_keywords.iter().all(|k| k.is_empty()) {
            return Err(ConfigError::ValidationFailed(
                "At least one non-empty candidate keyword is required".to_string(),
            ));
        }
        if self.object_suffix.trim_start_matches('.').is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Object suffix must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Makes `root_dir` absolute against the current directory.
    pub fn with_absolute_root(mut self) -> io::Result<Self> {
        if self.root_dir.is_relative() {
            self.root_dir = env::current_dir()?.join(&self.root_dir);
        }
        Ok(self)
    }

    /// Version identifier used in derived names, e.g. `46`.
    pub fn version_id(&self) -> String {
        format!("{}{}", self.version_major, self.version_minor)
    }

    pub fn source_dir(&self) -> PathBuf {
        self.rooted(self.source_dir.as_deref(), DEFAULT_SOURCE_SUBDIR)
    }

    pub fn object_dir(&self) -> PathBuf {
        self.rooted(self.object_dir.as_deref(), DEFAULT_OBJECT_SUBDIR)
    }

    pub fn exe_dir(&self) -> PathBuf {
        let default = format!("DSSAT{}", self.version_id());
        self.rooted(self.exe_dir.as_deref(), &default)
    }

    pub fn exe_path(&self) -> PathBuf {
        let name = self
            .exe_name
            .clone()
            .unwrap_or_else(|| format!("DSCSM0{}.EXE", self.version_id()));
        self.exe_dir().join(name)
    }

    pub fn profile_name(&self) -> String {
        self.profile_name
            .clone()
            .unwrap_or_else(|| format!("DSSATPRO.L{}", self.version_id()))
    }

    pub fn profile_source(&self) -> PathBuf {
        self.root_dir.join(self.profile_name())
    }

    pub fn profile_target(&self) -> PathBuf {
        self.exe_dir().join(self.profile_name())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.source_dir().join(&self.data_subdir)
    }

    pub fn makefile_path(&self) -> PathBuf {
        self.root_dir.join(&self.makefile_name)
    }

    pub fn platform_file_paths(&self) -> Vec<PathBuf> {
        let source = self.source_dir();
        self.platform_files.iter().map(|f| source.join(f)).collect()
    }

    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            source_markers: self.source_markers.clone(),
            candidate_keywords: self.candidate_keywords.clone(),
        }
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new().with_external_modules(self.external_modules.iter().cloned())
    }

    /// Emitter settings for a run whose canonical source root is `source_root`.
    pub fn emit_config(&self, source_root: PathBuf) -> EmitConfig {
        EmitConfig {
            title: self.title.clone(),
            compiler: self.compiler.clone(),
            compile_flags: self.compile_flags.clone(),
            include_flags: self.include_flags.clone(),
            source_root,
            object_root: self.object_dir(),
            output_executable: self.exe_path(),
            extensions: self.extensions.clone(),
            object_suffix: self.object_suffix.clone(),
            module_subdir: self.module_subdir.clone(),
        }
    }

    fn rooted(&self, explicit: Option<&Path>, default: &str) -> PathBuf {
        match explicit {
            Some(path) => self.root_dir.join(path),
            None => self.root_dir.join(default),
        }
    }
}

fn parse_version(field: &str, value: &str) -> Result<(u32, u32), ConfigError> {
    let parse_error = || ConfigError::ParseError {
        field: field.to_string(),
        error: format!("expected MAJOR.MINOR, got '{}'", value),
    };
    let (major, minor) = value.trim().split_once('.').ok_or_else(parse_error)?;
    let major = major.parse::<u32>().map_err(|_| parse_error())?;
    let minor = minor.parse::<u32>().map_err(|_| parse_error())?;
    Ok((major, minor))
}

fn parse_platform(value: &str) -> Result<Platform, ConfigError> {
    match value.to_lowercase().as_str() {
        "linux" | "unix" => Ok(Platform::Linux),
        "windows" | "dos" => Ok(Platform::Windows),
        other => Err(ConfigError::ParseError {
            field: "DSSAT_PREP_PLATFORM".to_string(),
            error: format!("unknown platform '{}'. Valid options: linux, windows", other),
        }),
    }
}
