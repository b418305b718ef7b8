//! Progress reporting for solve execution

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

use mcq_application::{ProgressNotifier, SolveProgress};

/// Reports solve progress with a progress bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_solve_start(&self, total_calls: usize) {
        let pb = ProgressBar::new(total_calls as u64);
        pb.set_style(Self::style());
        pb.set_prefix("Solving");
        pb.set_message("dispatching...");
        *self.bar.lock().unwrap() = Some(pb);
    }

    fn on_batch_recorded(&self, update: &SolveProgress) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(format!(
                "{} {}#{} ({} answered)",
                "v".green(),
                update.model_key,
                update.iteration,
                update.answers_so_far.len()
            ));
            pb.inc(1);
        }
    }

    fn on_call_failed(&self, model_key: &str, iteration: u32, _error: &str) {
        if let Some(pb) = self.bar.lock().unwrap().as_ref() {
            pb.set_message(format!("{} {}#{}", "x".red(), model_key, iteration));
            pb.inc(1);
        }
    }

    fn on_solve_complete(&self, resolved: usize) {
        if let Some(pb) = self.bar.lock().unwrap().take() {
            pb.finish_with_message(format!("{} questions resolved", resolved.to_string().green()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_solve_start(&self, total_calls: usize) {
        println!("{} solving ({} calls scheduled)", "->".cyan(), total_calls);
    }

    fn on_batch_recorded(&self, update: &SolveProgress) {
        println!(
            "  {} {}#{} ({} answered)",
            "v".green(),
            update.model_key,
            update.iteration,
            update.answers_so_far.len()
        );
    }

    fn on_call_failed(&self, model_key: &str, iteration: u32, error: &str) {
        println!("  {} {}#{}: {}", "x".red(), model_key, iteration, error);
    }

    fn on_solve_complete(&self, resolved: usize) {
        println!("{} {} questions resolved", "->".cyan(), resolved);
    }
}
