//! `ssb config`: print the effective configuration.

use ssb_config::EffectiveConfig;
use ssb_core::error::SsbResult;

use super::CommandContext;

/// Execute the config command
pub fn execute(webpack_only: bool, ctx: &CommandContext) -> SsbResult<()> {
    let project = ctx.project()?;
    let assembly = ctx.assemble(&project)?;

    assembly.config.check_required_files()?;
    ctx.report_advisories(&project, &assembly.advisories)?;

    ctx.output.print(&render(&assembly.config, webpack_only));
    Ok(())
}

/// The JSON document printed for `config`
pub fn render(config: &EffectiveConfig, webpack_only: bool) -> String {
    if webpack_only {
        format!("{:#}", config.webpack)
    } else {
        config.to_json_pretty()
    }
}
