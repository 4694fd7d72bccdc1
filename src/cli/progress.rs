use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::fixers::traits::{Progress, ProgressFactory};

fn style(template: &str) -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(style("{spinner:.cyan} {msg}"));
        Self { bar }
    }
}

impl Progress for Spinner {
    fn start(&self, message: &str) {
        self.bar.set_message(message.to_string());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn stop(&self) {
        self.bar.finish_and_clear();
    }

    fn fail(&self) {
        let message = self.bar.message();
        self.bar.set_style(style("{msg}"));
        self.bar
            .abandon_with_message(format!("{} {}", "✖".red(), message));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

pub struct SpinnerFactory;

impl ProgressFactory for SpinnerFactory {
    fn create(&self) -> Box<dyn Progress> {
        Box::new(Spinner::new())
    }
}
