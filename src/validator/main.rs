//! Standalone checker for account and proxy files.
//!
//! Parses every credential and proxy line offline and reports what the bot
//! would be able to use, without contacting the game server.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use zoo_farm_bot::api::{InitData, ProxyEntry};
use zoo_farm_bot::config::read_lines;

/// Account file checker.
#[derive(Parser, Debug)]
#[command(name = "check_accounts")]
#[command(about = "Validates initData and proxy files for the Zoo farm bot")]
#[command(version)]
struct Args {
    /// File with one Telegram initData string per line.
    #[arg(short, long, default_value = "data.txt")]
    data: PathBuf,

    /// Optional proxy file, matched to accounts by position.
    #[arg(short, long, default_value = "proxy.txt")]
    proxies: PathBuf,

    /// Show details for valid lines too.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    check(&args.data, &args.proxies, args.verbose)
}

fn check(data_path: &Path, proxy_path: &Path, verbose: bool) -> ExitCode {
    println!("Checking: {}", data_path.display());

    let lines = match read_lines(data_path) {
        Ok(lines) => lines,
        Err(e) => {
            eprintln!("✗ {e}");
            return ExitCode::FAILURE;
        }
    };

    let proxies = if proxy_path.exists() {
        match read_lines(proxy_path) {
            Ok(lines) => lines,
            Err(e) => {
                eprintln!("✗ {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("No proxy file at {}, accounts will connect directly", proxy_path.display());
        Vec::new()
    };
    println!();

    let mut errors = 0;

    for (i, line) in lines.iter().enumerate() {
        let mut problems = Vec::new();

        let username = match InitData::parse(line) {
            Ok(init) => {
                if init.hash.is_none() {
                    problems.push("missing `hash` field".to_owned());
                }
                if let Err(e) = init.require_user() {
                    problems.push(e.to_string());
                }
                init.username().to_owned()
            }
            Err(e) => {
                problems.push(e.to_string());
                "Unknown".to_owned()
            }
        };

        let route = match proxies.get(i).map(|p| ProxyEntry::parse(p)) {
            Some(Ok(proxy)) => proxy.to_host_port(),
            Some(Err(e)) => {
                problems.push(e.to_string());
                "invalid proxy".to_owned()
            }
            None => "direct".to_owned(),
        };

        if problems.is_empty() {
            if verbose {
                println!("[{}] {} via {}", i + 1, username, route);
                println!("  ✓ OK");
            }
        } else {
            errors += 1;
            println!("[{}] {} via {}", i + 1, username, route);
            for problem in problems {
                println!("  ✗ Error: {problem}");
            }
        }
    }

    if proxies.len() > lines.len() {
        println!(
            "⚠ {} proxy line(s) have no matching account",
            proxies.len() - lines.len()
        );
    }

    println!();

    let total = lines.len();
    if total == 0 {
        println!("✗ No accounts found");
        ExitCode::FAILURE
    } else if errors == 0 {
        println!("✓ All {total} accounts are usable");
        ExitCode::SUCCESS
    } else {
        println!("✗ Validation failed: {errors} problem account(s) out of {total}");
        println!("  Usable: {}/{total}", total - errors);
        ExitCode::FAILURE
    }
}
