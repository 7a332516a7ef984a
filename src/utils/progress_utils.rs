use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar drawn on stderr. `None` when stderr is not a terminal,
/// so piped output and tests stay clean.
pub fn progress_bar(len: u64, msg: String) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }

    let bar = ProgressBar::new(len);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise} / {eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
            .ok()?
            .progress_chars("##-")
    );
    bar.set_message(msg);

    Some(bar)
}
