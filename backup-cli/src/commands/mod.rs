mod list;
mod prune;
mod run;

// Backup commands
pub use list::run_list_backups;
pub use prune::run_prune;
pub use run::run_backup;

/// 人类易读的文件大小
pub(crate) fn format_size(size: u64) -> String {
    if size > 1024 * 1024 * 1024 {
        format!("{:.1}GB", size as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if size > 1024 * 1024 {
        format!("{:.1}MB", size as f64 / (1024.0 * 1024.0))
    } else if size > 1024 {
        format!("{:.1}KB", size as f64 / 1024.0)
    } else {
        format!("{size}B")
    }
}
