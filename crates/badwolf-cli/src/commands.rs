use clap::Parser;

/// Runs one BQL statement against a fresh in-memory store and prints its
/// result table. Not the interactive shell the BQL spec leaves out of scope:
/// no history, no REPL loop, one statement in and one table out.
#[derive(Debug, Parser)]
#[command(name = "bw-bql")]
#[command(about = "Runs one BQL statement and prints its result table", long_about = None, version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// The BQL statement to run. Read from stdin when omitted.
    pub statement: Option<String>,
}
