// Tue Jan 13 2026 - Alex

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Stages of one `validate` run, in order, with their bar position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Loading,
    Validating,
    Features,
    Writing,
}

impl Stage {
    fn position(&self) -> u64 {
        match self {
            Stage::Loading => 10,
            Stage::Validating => 40,
            Stage::Features => 70,
            Stage::Writing => 90,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Stage::Loading => "Loading records...",
            Stage::Validating => "Validating packet structure...",
            Stage::Features => "Extracting payload features...",
            Stage::Writing => "Writing results...",
        }
    }
}

pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(100);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    pub fn enter(&self, stage: Stage) {
        log::debug!("{:?}", stage);
        self.bar.set_position(stage.position());
        self.bar.set_message(stage.message());
    }

    pub fn finish(&self) {
        self.bar.set_position(100);
        self.bar.finish_and_clear();
    }
}
