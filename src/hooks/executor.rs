use crate::error::{BumpError, Result};
use crate::hooks::HookContext;
use std::path::Path;
use std::process::Command;

/// Executes git-bump hook scripts
pub struct HookExecutor;

impl HookExecutor {
    /// Execute a hook script with the given context
    ///
    /// The script runs in `workdir` (relative script paths are resolved
    /// against it) with environment variables set from the context. Exit code
    /// 0 is success; anything else is a failure.
    ///
    /// # Returns
    /// * `Ok(())` if hook succeeds (exit code 0)
    /// * `Err(BumpError::Hook)` if script not found, not runnable, or returns non-zero exit code
    pub fn execute(script: &Path, workdir: &Path, context: &HookContext) -> Result<()> {
        let path = workdir.join(script);

        if !path.exists() {
            return Err(BumpError::hook(format!(
                "Hook script not found: {}",
                path.display()
            )));
        }

        if !path.is_file() {
            return Err(BumpError::hook(format!(
                "Hook path is not a file: {}",
                path.display()
            )));
        }

        tracing::info!(hook = context.hook_type.name(), script = %path.display(), "running hook");

        let output = Command::new(&path)
            .current_dir(workdir)
            .envs(context.to_env_vars())
            .output()
            .map_err(|e| {
                BumpError::hook(format!("Failed to execute hook {}: {}", path.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(BumpError::hook(format!(
                "Hook {} failed with exit code {}\nStdout: {}\nStderr: {}",
                path.display(),
                output.status.code().unwrap_or(-1),
                stdout.trim_end(),
                stderr.trim_end()
            )));
        }

        Ok(())
    }
}
