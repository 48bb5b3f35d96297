use clap::Parser;

/// Celadon — a webview application shell with a session-scoped IPC bridge.
#[derive(Parser, Debug)]
#[command(name = "celadon", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log filter override (e.g. debug, celadon=trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Directory to serve as the demo window's content mount.
    #[arg(short = 'd', long)]
    pub content_dir: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
