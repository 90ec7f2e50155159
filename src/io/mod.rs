pub mod csv_export;
pub mod file;

pub use csv_export::export_csv;
pub use file::{load_project, save_project, ProjectFile, PROJECT_EXTENSION};
