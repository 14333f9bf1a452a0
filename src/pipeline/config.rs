/// Which parts of a preparation run to execute.
///
/// Collection, scanning and ordering always run; the rest can be turned off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub patch_platform: bool,
    pub write_build_script: bool,
    pub stage_assets: bool,
    pub finalize: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            patch_platform: true,
            write_build_script: true,
            stage_assets: true,
            finalize: true,
        }
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect, scan and resolve only. Nothing on disk is modified.
    pub fn order_only() -> Self {
        Self {
            patch_platform: false,
            write_build_script: false,
            stage_assets: false,
            finalize: false,
        }
    }

    pub fn with_patch_platform(mut self, enabled: bool) -> Self {
        self.patch_platform = enabled;
        self
    }

    pub fn with_build_script(mut self, enabled: bool) -> Self {
        self.write_build_script = enabled;
        self
    }

    pub fn with_stage_assets(mut self, enabled: bool) -> Self {
        self.stage_assets = enabled;
        self
    }

    pub fn with_finalize(mut self, enabled: bool) -> Self {
        self.finalize = enabled;
        self
    }
}
