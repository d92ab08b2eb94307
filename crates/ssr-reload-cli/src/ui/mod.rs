//! Terminal status output.
//!
//! ```no_run
//! use ssr_reload_cli::ui;
//!
//! ui::init_colors(false);
//! ui::success("Reload server ready");
//! ui::warning("Ready-server did not answer");
//! ```

mod messages;

pub use messages::{error, info, success, warning};

use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether status messages are colored.
///
/// `--no-color` always wins; otherwise `NO_COLOR`, `FORCE_COLOR`, and the
/// terminal decide.
pub fn init_colors(no_color: bool) {
    COLORS.store(
        !no_color && crate::logger::should_use_colors(),
        Ordering::Relaxed,
    );
}

fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_color_flag_disables_colors() {
        init_colors(true);
        assert!(!colors_enabled());
    }
}
