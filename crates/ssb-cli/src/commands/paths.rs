//! `ssb paths`: print the resolved project paths.

use serde_json::{json, Value};
use ssb_config::ProjectContext;
use ssb_core::error::SsbResult;

use super::CommandContext;

/// Execute the paths command
pub fn execute(ctx: &CommandContext) -> SsbResult<()> {
    let project = ctx.project()?;
    ctx.output.print(&format!("{:#}", render(&project)));
    Ok(())
}

/// Paths keyed by name, plus the app directory and served path
pub fn render(project: &ProjectContext) -> Value {
    let mut map = project.paths.to_map();
    map.insert(
        "appDirectory".to_string(),
        json!(project.resolver.app_directory()),
    );
    map.insert("servedPath".to_string(), json!(project.served_path));
    map.insert("publicUrl".to_string(), json!(project.public_url));
    Value::Object(map)
}
