use crate::decl::Decl;
use crate::error::ScoutError;
use serde::Serialize;

#[derive(Serialize)]
struct JsonOutput<'a> {
    count: usize,
    declarations: &'a [Decl],
}

/// Format matched declarations as pretty JSON.
pub fn format_output(decls: &[Decl]) -> Result<String, ScoutError> {
    let output = JsonOutput {
        count: decls.len(),
        declarations: decls,
    };
    let mut json = serde_json::to_string_pretty(&output)?;
    json.push('\n');
    Ok(json)
}
