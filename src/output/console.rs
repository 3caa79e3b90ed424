//! Console output utilities.

use console::style;

use crate::download::DownloadState;

/// Print an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("INFO").cyan().bold(), message);
}

/// Print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("OK").green().bold(), message);
}

/// Print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", style("WARN").yellow().bold(), message);
}

/// Print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("ERROR").red().bold(), message);
}

/// Print the application banner.
pub fn print_banner() {
    let banner = r#"
╔═══════════════════════════════════════════════╗
║     instagrab                                 ║
║     One-shot Instagram downloader             ║
╚═══════════════════════════════════════════════╝
"#;
    println!("{}", style(banner).cyan());
}

/// Print the end-of-run download summary.
pub fn print_summary(state: &DownloadState) {
    println!();
    println!("{}", style("Summary:").bold());
    println!("  Target: {}", state.target);
    println!("  Pictures: {}", state.pic_count);
    println!("  Videos: {}", state.vid_count);
    if state.skipped_count > 0 {
        println!("  Skipped (already on disk): {}", state.skipped_count);
    }
    if state.failed_count > 0 {
        println!(
            "  {}",
            style(format!("Failed: {}", state.failed_count)).yellow()
        );
    }
    println!();
}
