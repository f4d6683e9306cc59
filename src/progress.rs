use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar counting collapses during a full solve.
pub struct SolveProgress {
    progress_bar: ProgressBar,
}

impl SolveProgress {
    /// Creates a bar over `cells_to_collapse` collapses; hidden unless `visible`.
    pub fn new(cells_to_collapse: usize, visible: bool) -> Self {
        let pb = if visible {
            ProgressBar::new(cells_to_collapse as u64)
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} cells") {
            pb.set_style(style.progress_chars("##-"));
        }
        Self { progress_bar: pb }
    }

    /// Record one collapse.
    pub fn increment(&self) {
        self.progress_bar.inc(1);
    }

    /// Collapses recorded so far.
    pub fn position(&self) -> u64 {
        self.progress_bar.position()
    }

    /// Finish and clear progress display
    pub fn finish(self) {
        self.progress_bar.finish_and_clear();
    }
}
