//! `siteapp` binary: reads configuration, opens the database and serves HTTP.

mod cli;

use clap::Parser;
use cli::{Cli, Command, IN_MEMORY_DB};
use log::info;
use siteapp_core::db::migrations::latest_version;
use siteapp_core::db::{open_db, open_db_in_memory};
use siteapp_core::{core_version, default_log_level, init_logging};
use siteapp_web::AppState;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(Command::Info) = cli.command {
        println!("siteapp_core version={}", core_version());
        println!("siteapp_core schema_version={}", latest_version());
        return Ok(());
    }

    let args = cli.serve;
    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, args.log_dir.as_deref())?;

    let conn = if args.db == IN_MEMORY_DB {
        open_db_in_memory()?
    } else {
        open_db(&args.db)?
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;
    info!(
        "event=config module=cli status=ok addr={} db={}",
        local_addr, args.db
    );

    println!("siteapp listening on http://{local_addr}");
    println!();
    println!("  GET|POST /                         - login");
    println!("  GET|POST /registrar/               - create account");
    println!("  GET|POST /logout/                  - end session");
    println!("  GET      /usuarios/                - list records");
    println!("  GET|POST /usuarios/novo/           - new record");
    println!("  GET|POST /usuarios/<id>/editar/    - edit record");
    println!("  GET|POST /usuarios/<id>/excluir/   - delete record");
    println!();
    println!("Press Ctrl+C to shut down");

    siteapp_web::serve(listener, AppState::new(conn)).await?;
    Ok(())
}
