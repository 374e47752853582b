use std::path::Path;

use crate::package::PackageDescriptor;
use crate::sync::SyncReport;

pub mod config;
mod install;
mod list;
mod paths;
mod remove;
mod status;
mod update;

#[cfg(test)]
mod fixture;

pub use config::{GlobalOptions, Settings};
pub use install::install;
pub use list::list;
pub use remove::remove;
pub use status::status;
pub use update::update;

/// Print what happened to a package's files. Nothing is printed when the
/// project skipped synchronization.
pub(crate) fn print_report(package: &PackageDescriptor, report: &SyncReport, root: &Path) {
    if report.skipped {
        return;
    }
    println!("  > Exec Plugin {}", package.name);
    for line in report.progress_lines(root) {
        println!("{}", line);
    }
    if let Some(error) = report.clear_error() {
        eprintln!("{}", error);
    }
}
