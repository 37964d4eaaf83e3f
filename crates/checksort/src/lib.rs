pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub fn init() {
    // Stdout carries reordered text in pipe mode; diagnostics go to stderr.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
}
