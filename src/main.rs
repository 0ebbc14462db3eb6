mod app;
mod config;
mod diff;
mod rewriter;
mod rules;

fn main() {
    if let Err(err) = app::run() {
        eprintln!("restyle failed: {err}");
        std::process::exit(1);
    }
}
