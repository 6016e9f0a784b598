//! BIRD routing daemon integration.
//!
//! The output file holds one `route <prefix> reject;` statement per prefix
//! for inclusion from a static protocol block. After a changed write,
//! `--apply` reloads the daemon with `birdc configure`.

use anyhow::Result;
use tracing::info;

use crate::cmd::{args_of, CommandRunner};

/// Render one reject-route statement.
pub fn reject_statement(prefix: &str) -> String {
    format!("route {} reject;", prefix)
}

/// Reload the BIRD configuration via `birdc configure`.
///
/// A missing `birdc` binary is an error the caller reports; nothing is
/// retried or rolled back.
pub fn apply_configuration(runner: &dyn CommandRunner) -> Result<()> {
    info!("Applying changes to BIRD configuration...");

    let which = runner.run("which", &args_of(&["birdc"]))?;
    if !which.success {
        anyhow::bail!("birdc command not found. Please install the BIRD routing daemon.");
    }

    let configure = runner.run("birdc", &args_of(&["configure"]))?;
    if !configure.success {
        anyhow::bail!(
            "Failed to reload BIRD configuration: {}",
            configure.stderr.trim()
        );
    }

    info!("Successfully reloaded BIRD configuration");
    Ok(())
}
