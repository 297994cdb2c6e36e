mod commands;
mod logger;
mod printer;

use std::io::Read;
use std::sync::Arc;

use badwolf_planner::Executor;
use badwolf_store::Store;
use badwolf_store_memory::MemoryStore;
use clap::Parser;
use tokio_util::sync::CancellationToken;

fn main() {
    if let Err(err) = logger::init() {
        eprintln!("warning: failed to initialise logging: {err}");
    }
    std::process::exit(run());
}

fn run() -> i32 {
    let cli = commands::Cli::parse();
    let source = match cli.statement {
        Some(s) => s,
        None => {
            let mut buf = String::new();
            if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("error: failed to read statement from stdin: {err}");
                return 1;
            }
            buf
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("error: failed to start async runtime: {err}");
            return 1;
        }
    };

    runtime.block_on(async move {
        match execute(&source).await {
            Ok(table) => {
                printer::print_table(&table);
                0
            }
            Err(err) => {
                eprintln!("error: {err}");
                1
            }
        }
    })
}

async fn execute(source: &str) -> Result<badwolf_table::Table, Box<dyn std::error::Error>> {
    let statement = badwolf_semantic::parse_statement(source).await?;
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let executor = Executor::new(store);
    let table = executor.execute(&statement, CancellationToken::new()).await?;
    Ok(table)
}
