use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar counting processed files.
///
/// The bar is drawn on stderr and ticks every 80ms so it stays alive while
/// large files are being rewritten.
pub fn create_file_bar(total: usize, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} {msg} [{bar:30.cyan/blue}] {pos}/{len}")
            .expect("valid progress template")
            .progress_chars("=> "),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Finish a bar, leaving `message` in place of the bar.
pub fn finish_bar(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(message.to_string());
}
