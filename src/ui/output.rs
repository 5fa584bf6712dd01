//! Status lines for human output.
//!
//! Data goes to stdout through the renderers; these are the decorations
//! around it. Errors and warnings go to stderr.

use crate::ui::{err_theme, theme, Icons};
use owo_colors::OwoColorize;

pub fn header(icon: &str, text: &str) {
    println!("{} {}", icon, text.style(theme().accent.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().good.clone()));
}

pub fn error(label: &str) {
    eprintln!("{} {}", Icons::CROSS, label.style(err_theme().bad.clone()));
}

pub fn warn(label: &str) {
    eprintln!("{} {}", Icons::WARN, label.style(err_theme().bad.clone()));
}

pub fn info(label: &str, value: &str) {
    println!("{}: {}", label.style(theme().accent.clone()), value);
}

pub fn dim(text: &str) -> String {
    text.style(theme().dim.clone()).to_string()
}
