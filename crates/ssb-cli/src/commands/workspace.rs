//! `ssb workspace`: print what the enclosing monorepo says about the app.

use serde_json::{json, Value};
use ssb_config::ProjectContext;
use ssb_core::error::SsbResult;

use super::CommandContext;

/// Execute the workspace command
pub fn execute(ctx: &CommandContext) -> SsbResult<()> {
    let project = ctx.project()?;
    if !project.workspace.is_app_included {
        ctx.output.info("The app is not part of a yarn workspace");
    }
    ctx.output.print(&format!("{:#}", render(&project)));
    Ok(())
}

pub fn render(project: &ProjectContext) -> Value {
    json!({
        "workspace": project.workspace,
        "srcPaths": project.src_paths,
        "useYarn": project.use_yarn,
    })
}
