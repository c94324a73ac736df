use container_bench_core::prelude::{DataTypeFamily, ScenarioId};
use indicatif::{ProgressBar, ProgressStyle};

/// Progress through the benchmark matrix, one step per (family, scenario).
///
/// Anything printed while the bar is visible must go through [MatrixProgress::suspend] so that
/// report tables are not interleaved with the bar.
pub(crate) struct MatrixProgress {
    bar: Option<ProgressBar>,
}

impl MatrixProgress {
    pub(crate) fn new(total_cells: u64, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total_cells);
        match ProgressStyle::with_template(
            "{spinner:.green} [{wide_bar:.cyan/blue}] {pos}/{len} [{elapsed_precise} / ~{eta_precise}] {msg}",
        ) {
            Ok(style) => bar.set_style(style.progress_chars("#>-")),
            Err(e) => log::debug!("Using the default progress style: {e}"),
        }

        Self { bar: Some(bar) }
    }

    pub(crate) fn start_scenario(&self, family: DataTypeFamily, scenario: ScenarioId) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{family} #{scenario}"));
        }
    }

    pub(crate) fn finish_scenario(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    pub(crate) fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        match &self.bar {
            Some(bar) => bar.suspend(f),
            None => f(),
        }
    }

    pub(crate) fn finish(&self) {
        if let Some(bar) = &self.bar {
            log::trace!("Progress bar finished");
            bar.finish_and_clear();
        }
    }
}
