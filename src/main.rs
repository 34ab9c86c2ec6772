//! sqleval - filter JSON records with a SQL WHERE clause

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{debug, info};
use sqleval::access::JsonRecord;
use sqleval::expression::Predicate;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Evaluate a SQL WHERE clause against JSON records
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WHERE clause, with or without the WHERE keyword
    #[arg(value_name = "WHERE")]
    where_clause: String,

    /// Evaluate against the JSON object in this file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    record: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = run(
        &args,
        io::stdin().lock(),
        BufWriter::new(io::stdout().lock()),
    );
    if let Err(e) = &result {
        eprintln!("Error: {:#}", e);
    }
    ExitCode::from(exit_status(&result))
}

/// 0 when something matched, 1 when nothing did, 2 on error
fn exit_status(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(_) => 2,
    }
}

/// Returns whether anything matched
fn run(args: &Args, input: impl BufRead, mut out: impl Write) -> Result<bool> {
    let predicate = Predicate::parse(&args.where_clause)?;

    match &args.record {
        Some(path) => {
            let record = JsonRecord::from_path(path)?;
            let matched = predicate.matches(&record)?;
            writeln!(out, "{}", matched)?;
            out.flush()?;
            Ok(matched)
        }
        None => filter_lines(&predicate, input, out),
    }
}

/// Echo the newline-delimited JSON records that satisfy `predicate`
fn filter_lines(predicate: &Predicate, input: impl BufRead, mut out: impl Write) -> Result<bool> {
    let mut scanned = 0usize;
    let mut matched = 0usize;

    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let lineno = index + 1;
        let record: JsonRecord = line
            .parse()
            .with_context(|| format!("line {}", lineno))?;
        scanned += 1;

        if predicate
            .matches(&record)
            .with_context(|| format!("line {}", lineno))?
        {
            matched += 1;
            writeln!(out, "{}", line)?;
        } else {
            debug!("line {} rejected", lineno);
        }
    }
    out.flush()?;

    info!("{} of {} records matched", matched, scanned);
    Ok(matched > 0)
}
