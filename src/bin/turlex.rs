//! # TurLex CLI Harness
//!
//! Tokenizes a SQL file or a `.sqls` test bundle and prints token
//! statistics, throughput, and the active SIMD tier.
//!
//! ## Usage
//!
//! ```bash
//! # Tokenize a plain SQL file
//! turlex query.sql
//!
//! # Run every case in a test bundle
//! turlex suite.sqls
//!
//! # Dump the token stream for each case
//! turlex --tokens query.sql
//! ```
//!
//! ## Bundle Format
//!
//! A `.sqls` bundle holds many SQL cases, each introduced by metadata
//! comments and closed by an end marker:
//!
//! ```text
//! --ID: join-basic
//! --DESC: two-table inner join
//! --LEVEL: simple
//! SELECT * FROM a JOIN b ON a.id = b.id
//! --END
//! ```

use eyre::{bail, Result, WrapErr};
use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use turlex::{TokenKind, Tokenizer};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut show_tokens = false;
    let mut path: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "--version" | "-v" => {
                println!("turlex {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--tokens" | "-t" => {
                show_tokens = true;
            }
            arg if arg.starts_with('-') => {
                bail!("Unknown option: {arg}");
            }
            arg => {
                if path.is_some() {
                    bail!("Multiple input files given");
                }
                path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    let Some(path) = path else {
        print_usage();
        return Ok(());
    };

    let raw = std::fs::read(&path)
        .wrap_err_with(|| format!("cannot read input file {}", path.display()))?;

    let cases = if path.extension().is_some_and(|ext| ext == "sqls") {
        let text = String::from_utf8_lossy(&raw);
        let cases = parse_bundle(&text);
        if cases.is_empty() {
            bail!("no test cases found in {}", path.display());
        }
        cases
    } else {
        vec![SqlCase {
            id: file_stem(&path),
            description: String::new(),
            level: String::new(),
            sql: String::from_utf8_lossy(&raw).into_owned(),
        }]
    };

    println!("Loaded {} case(s) from {}", cases.len(), path.display());

    let mut totals: BTreeMap<&'static str, usize> = BTreeMap::new();
    let mut total_bytes = 0usize;
    let mut total_tokens = 0usize;
    let started = Instant::now();
    let mut simd_level = "";

    for case in &cases {
        let bytes = case.sql.as_bytes();
        let mut tokenizer = Tokenizer::new(bytes);
        let tokens = tokenizer.tokenize();
        simd_level = tokenizer.simd_level();

        total_bytes += bytes.len();
        total_tokens += tokens.len();
        for token in &tokens {
            *totals.entry(token.kind.name()).or_insert(0) += 1;
        }

        if show_tokens {
            if case.level.is_empty() {
                println!("\n-- {} --", case.id);
            } else {
                println!("\n-- {} [{}] --", case.id, case.level);
            }
            if !case.description.is_empty() {
                println!("   {}", case.description);
            }
            for token in &tokens {
                if token.kind == TokenKind::Keyword {
                    println!(
                        "  {:>4}:{:<3} {:<10} {:?} [{}]",
                        token.line,
                        token.column,
                        token.kind.name(),
                        token.text(),
                        token.keyword.name()
                    );
                } else {
                    println!(
                        "  {:>4}:{:<3} {:<10} {:?}",
                        token.line,
                        token.column,
                        token.kind.name(),
                        token.text()
                    );
                }
            }
        }
    }

    let elapsed = started.elapsed();

    println!("\nToken statistics:");
    for (kind, count) in &totals {
        println!("  {kind:<12} {count:>8}");
    }
    println!("  {:<12} {:>8}", "total", total_tokens);

    let secs = elapsed.as_secs_f64();
    let mib_per_sec = if secs > 0.0 {
        (total_bytes as f64 / (1024.0 * 1024.0)) / secs
    } else {
        0.0
    };
    println!(
        "\nTokenized {} byte(s) in {:.3} ms ({:.1} MiB/s)",
        total_bytes,
        secs * 1000.0,
        mib_per_sec
    );
    println!("SIMD level: {simd_level}");

    Ok(())
}

fn print_usage() {
    println!("TurLex - SIMD-accelerated SQL tokenizer");
    println!();
    println!("Usage: turlex [OPTIONS] <FILE>");
    println!();
    println!("Arguments:");
    println!("  <FILE>    A .sql file, or a .sqls bundle of test cases");
    println!();
    println!("Options:");
    println!("  -t, --tokens     Print the token stream for each case");
    println!("  -h, --help       Show this help");
    println!("  -v, --version    Show version");
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One SQL case from a `.sqls` bundle.
#[derive(Debug, Default, Clone)]
struct SqlCase {
    id: String,
    description: String,
    level: String,
    sql: String,
}

/// Parses a `.sqls` bundle. Cases missing an id or a body are dropped;
/// `--`-prefixed lines inside a body are treated as bundle metadata and
/// skipped, and CRLF line endings are tolerated.
fn parse_bundle(text: &str) -> Vec<SqlCase> {
    let mut cases = Vec::new();
    let mut current = SqlCase::default();
    let mut in_sql = false;

    for raw_line in text.lines() {
        let line = raw_line.trim_end_matches('\r');

        if let Some(id) = line.strip_prefix("--ID:") {
            current = SqlCase {
                id: id.trim().to_string(),
                ..SqlCase::default()
            };
            in_sql = false;
        } else if let Some(desc) = line.strip_prefix("--DESC:") {
            current.description = desc.trim().to_string();
        } else if let Some(level) = line.strip_prefix("--LEVEL:") {
            current.level = level.trim().to_string();
            current.sql.clear();
            in_sql = true;
        } else if line == "--END" {
            if !current.id.is_empty() && !current.sql.is_empty() {
                cases.push(std::mem::take(&mut current));
            } else {
                current = SqlCase::default();
            }
            in_sql = false;
        } else if in_sql && !line.is_empty() && !line.starts_with("--") {
            if !current.sql.is_empty() {
                current.sql.push('\n');
            }
            current.sql.push_str(line);
        }
    }

    cases
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bundle_basic() {
        let text = "--ID: t1\n--DESC: first\n--LEVEL: simple\nSELECT 1\n--END\n";
        let cases = parse_bundle(text);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, "t1");
        assert_eq!(cases[0].description, "first");
        assert_eq!(cases[0].level, "simple");
        assert_eq!(cases[0].sql, "SELECT 1");
    }

    #[test]
    fn parse_bundle_multiline_sql_and_crlf() {
        let text = "--ID: t2\r\n--LEVEL: hard\r\nSELECT a\r\nFROM b\r\n--END\r\n";
        let cases = parse_bundle(text);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].sql, "SELECT a\nFROM b");
    }

    #[test]
    fn parse_bundle_skips_incomplete_cases() {
        let text = "--ID: empty\n--LEVEL: simple\n--END\n--ID: ok\n--LEVEL: simple\nSELECT 2\n--END\n";
        let cases = parse_bundle(text);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].id, "ok");
    }

    #[test]
    fn parse_bundle_ignores_metadata_comments_in_body() {
        let text = "--ID: t3\n--LEVEL: simple\nSELECT 1\n-- stray note\nFROM t\n--END\n";
        let cases = parse_bundle(text);
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].sql, "SELECT 1\nFROM t");
    }

    #[test]
    fn parse_bundle_trailing_case_without_end_is_dropped() {
        let text = "--ID: t4\n--LEVEL: simple\nSELECT 1\n";
        assert!(parse_bundle(text).is_empty());
    }
}
