//! Idempotent import insertion.

use ripple_core::{ImportRef, QueryError};

use crate::project::Project;
use crate::tree::{parse_file, select, stage_text, PathExpr};

/// Ensure `file_path` imports the symbol, returning whether the file was
/// mutated (the edit is staged; the caller flushes).
///
/// - If any import already binds the name, the file is untouched — no
///   attempt is made to reconcile alternate sources.
/// - If an import from the same module exists, the name is merged into its
///   `{…}` clause. Default and `*`-style imports have no clause to merge
///   into and are left unchanged.
/// - Otherwise a fresh import line is prepended.
pub fn add_import(
    project: &mut Project,
    file_path: &str,
    import: &ImportRef,
) -> Result<bool, QueryError> {
    let tree = parse_file(project, file_path)?;
    let name = import.name();

    let bound = PathExpr::parse(&format!(
        "//ImportDeclaration//Identifier[@value='{name}']"
    ))?;
    if !select(&tree, tree.root(), &bound).is_empty() {
        return Ok(false);
    }

    let location = import.location();
    let same_module = PathExpr::parse(&format!(
        "//ImportDeclaration[//StringLiteral[@value='{location}']]"
    ))?;
    if let Some(&declaration) = select(&tree, tree.root(), &same_module).first() {
        let range = tree.range(declaration);
        let text = tree.text(declaration);
        return match text.find('{') {
            Some(brace) => {
                let insert_at = range.start + brace + 1;
                stage_text(project, &tree, insert_at..insert_at, format!(" {name},"))?;
                Ok(true)
            }
            // Default or `*`-style import from the same module: unsupported,
            // leave the file unchanged.
            None => Ok(false),
        };
    }

    stage_text(
        project,
        &tree,
        0..0,
        format!("import {{ {name} }} from \"{location}\";\n"),
    )?;
    Ok(true)
}
