//! Usage text

use std::fmt::Write;

use encase_config::RepoTypeCatalog;

/// Render usage, listing every repo-type with its description.
pub fn render(program: &str, catalog: &RepoTypeCatalog, default_repo_type: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[Usage] {program} [-t repo_type] [-n] [-v] [-V] [-H] project_name [py-encase options ...]"
    );
    let _ = writeln!(
        out,
        "[Usage] {program} [-t repo_type] [-n] [-v] [-V] [-H] -P project_name [py-encase options ...]"
    );
    out.push_str("[Options]\n");
    out.push_str("         -P proj_name : Repository / project name\n");
    let _ = writeln!(
        out,
        "         -t repo_type : Repository type (Default: {default_repo_type})"
    );
    out.push_str("         -n           : Dry-run mode for this launcher\n");
    out.push_str("         -v           : Verbose messages from this launcher\n");
    out.push_str("         -V           : Run py-encase with --verbose\n");
    out.push_str("         -H           : Show this help message\n");
    out.push_str("[Available repository types]\n");
    for profile in catalog.iter() {
        let _ = writeln!(out, "        {:10} : {}", profile.name, profile.description);
    }
    out
}
