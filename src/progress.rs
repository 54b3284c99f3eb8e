//! Progress bar display while compressing the staging tree

use indicatif::{ProgressBar, ProgressStyle};

/// File-level progress for archive writing
pub struct ArchiveProgress {
    file_pb: ProgressBar,
}

impl ArchiveProgress {
    /// Create a progress bar over `total_files`
    ///
    /// Hidden when stderr is not a terminal.
    pub fn new(total_files: u64) -> Self {
        let file_pb = ProgressBar::new(total_files);
        if let Ok(style) =
            ProgressStyle::default_bar().template("  [{bar:40.green/yellow}] {pos}/{len} files {msg}")
        {
            file_pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        Self { file_pb }
    }

    /// Record one written entry
    pub fn update_file(&self, entry_name: &str) {
        // Truncate long paths for display
        let display_path = if entry_name.chars().count() > 50 {
            let tail: String = entry_name
                .chars()
                .rev()
                .take(47)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            format!("...{tail}")
        } else {
            entry_name.to_string()
        };
        self.file_pb.set_message(display_path);
        self.file_pb.inc(1);
    }

    pub fn finish(&self) {
        self.file_pb.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.file_pb.abandon();
    }
}
