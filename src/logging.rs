//! Stderr logging for the command-line binary

use log::LevelFilter;

/// Level used for a given verbosity flag
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the stderr logger; later calls only adjust the level
pub fn init(verbose: bool) {
    let level = level_for(verbose);

    let installed = env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .try_init();

    if installed.is_err() {
        log::set_max_level(level);
    }
}
