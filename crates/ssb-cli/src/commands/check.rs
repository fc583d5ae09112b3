//! `ssb check`: verify the project can be built.

use ssb_core::error::SsbResult;

use super::CommandContext;

/// Execute the check command
pub fn execute(ctx: &CommandContext) -> SsbResult<()> {
    ctx.output.info("Checking configuration...");

    let project = ctx.project()?;
    let assembly = ctx.assemble(&project)?;
    assembly.config.check_required_files()?;
    ctx.report_advisories(&project, &assembly.advisories)?;

    if assembly.advisories.is_empty() {
        ctx.output.success(&format!("{} configuration is valid", project.mode));
    } else {
        ctx.output.success(&format!(
            "{} configuration is usable with {} advisories",
            project.mode,
            assembly.advisories.len()
        ));
    }
    Ok(())
}
