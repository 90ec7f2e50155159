use std::io::Write;
use std::path::Path;

use crate::error::PersistError;
use crate::model::store::TaskStore;
use crate::model::task::format_date;

const HEADER: [&str; 6] = ["Level", "Title", "Start Date", "End Date", "Status", "Visible"];

/// Export the task tree to a semicolon-delimited CSV file, one row per task in
/// board order. Dates are `YYYY-MM-DD`, blank when unset.
///
/// Returns the number of tasks written.
pub fn export_csv(tasks: &TaskStore, path: &Path) -> Result<usize, PersistError> {
    let file = std::fs::File::create(path)?;
    let written = write_csv(tasks, file)?;
    tracing::info!(path = %path.display(), rows = written, "CSV exported");
    Ok(written)
}

/// Write the CSV rows to any writer.
pub fn write_csv<W: Write>(tasks: &TaskStore, writer: W) -> Result<usize, PersistError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(HEADER)?;

    let mut count = 0;
    for task in tasks.walk() {
        wtr.write_record([
            task.kind.to_string().as_str(),
            task.title.as_str(),
            format_date(task.start).as_str(),
            format_date(task.end).as_str(),
            task.status.label(),
            if task.visible { "yes" } else { "no" },
        ])?;
        count += 1;
    }

    wtr.flush()?;
    Ok(count)
}
