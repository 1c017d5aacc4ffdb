use std::fmt::Display;

/// Write a message to stderr.
///
/// Stdout is reserved for command output.
fn print_message(v: impl Display) {
    eprintln!("{v}");
}

pub(crate) fn plain(v: impl Display) {
    print_message(v);
}

pub(crate) fn error(v: impl Display) {
    print_message(std::format_args!("ERROR: {v}"));
}
