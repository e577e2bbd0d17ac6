//! `export`: write demands as CSV or JSON to stdout or a file.

use crate::cli::ExportArgs;
use crate::cli::commands::demand::select;
use crate::error::Result;
use crate::export::{ExportFormat, export_to_path, export_to_writer};
use crate::format::{OutputContext, OutputMode};
use crate::repository::Repository;

/// # Errors
///
/// Returns an error for bad arguments or if writing fails.
pub fn execute(repo: &Repository, args: &ExportArgs, ctx: &OutputContext) -> Result<()> {
    let format: ExportFormat = args.format.parse()?;
    let demands = select(repo, &args.filter)?;

    let Some(path) = &args.output else {
        let stdout = std::io::stdout();
        export_to_writer(&demands, format, &mut stdout.lock())?;
        return Ok(());
    };

    let path = format.output_path(path);
    let result = export_to_path(&demands, format, &path)?;
    match ctx.mode() {
        OutputMode::Json => ctx.json_pretty(&result),
        OutputMode::Plain => ctx.success(&format!(
            "Exported {} demands to {}",
            result.exported_count,
            path.display()
        )),
        OutputMode::Quiet => {}
    }
    Ok(())
}
