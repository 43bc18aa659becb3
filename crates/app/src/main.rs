// CLI modules
mod args;
mod bag;
mod op;
mod ops;
mod process;
mod state;

use std::io::IsTerminal;

use args::Args;
use clap::{Parser, Subcommand};
use op::Op;
use ops::{
    Assert, Create, Decrypt, Echo, Encrypt, Enumerate, Init, Nick, Pub, Sign, Unwrap, Verify,
    Version, Wrap,
};
use tokio::io::AsyncReadExt;

command_enum! {
    (Init, Init),
    (Create, Create),
    (Pub, Pub),
    (Nick, Nick),
    (Wrap, Wrap),
    (Encrypt, Encrypt),
    (Decrypt, Decrypt),
    (Sign, Sign),
    (Verify, Verify),
    (Assert, Assert),
    (Enumerate, Enumerate),
    (Echo, Echo),
    (Unwrap, Unwrap),
    (Version, Version),
}

impl Command {
    /// Whether this command consumes blocks or text from stdin
    fn reads_stdin(&self) -> bool {
        !matches!(
            self,
            Command::Init(_) | Command::Create(_) | Command::Version(_)
        )
    }
}

async fn read_stdin() -> std::io::Result<String> {
    if std::io::stdin().is_terminal() {
        return Ok(String::new());
    }
    let mut input = String::new();
    tokio::io::stdin().read_to_string(&mut input).await?;
    Ok(input)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let level = process::resolve_log_level(args.log_level, args.config_path.clone());
    process::init_logging(level);

    let input = if args.command.reads_stdin() {
        match read_stdin().await {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        String::new()
    };

    let ctx = match op::OpContext::new(args.config_path, &input) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match args.command.execute(&ctx).await {
        Ok(output) => {
            let output = output.to_string();
            if output.ends_with('\n') {
                print!("{}", output);
            } else {
                println!("{}", output);
            }
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
