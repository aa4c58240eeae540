use indicatif::{ProgressBar, ProgressStyle};

use crate::ui::{OutputFormat, get_output_format};

/// Spinner for a blocking step. Hidden when events are rendered as JSON.
pub fn create_spinner(message: String) -> ProgressBar {
    if get_output_format() == OutputFormat::Json {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .map(|s| s.tick_chars("⠁⠉⠙⠚⠒⠂⠲⠴⠤⠄⠦⠖⠓⠋ "))
    {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Clear the spinner line and print a checkmark line in its place.
pub fn finish_spinner_with_success(pb: ProgressBar, message: impl Into<String>) {
    let hidden = pb.is_hidden();
    pb.finish_and_clear();
    if !hidden {
        println!("✓ {}", message.into());
    }
}
