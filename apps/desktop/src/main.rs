use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{config::load_settings, DirectoryApi, JarnClient, LookupOutcome};
use shared::{
    domain::{Code, Department},
    protocol::{InstructorRecord, RecordRequest},
};
use tracing_subscriber::EnvFilter;

const SUBMIT_SUCCESS_MESSAGE: &str = "Submission successful! I will review your data ASAP.";

#[derive(Parser, Debug)]
#[command(name = "jarn", about = "Look up Jarn (instructor) records by abbreviation")]
struct Args {
    /// TOML file with `base_url` / `request_timeout_secs`.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the configured service base URL.
    #[arg(long)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find the instructor behind a three-letter abbreviation.
    Lookup { code: Code },
    /// Ask for a missing abbreviation to be added.
    Request {
        code: Code,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = Department::default())]
        department: Department,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let args = Args::parse();

    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let client = JarnClient::new(&settings).context("failed to build directory client")?;

    match args.command {
        Command::Lookup { code } => {
            if !code.is_complete() {
                bail!("abbreviation must have exactly three letters, got \"{code}\"");
            }
            match client.lookup(code).await.context("lookup failed")? {
                LookupOutcome::Found(record) => print_record(&record),
                LookupOutcome::NotFound(code) => {
                    println!("No Jarn found for the abbreviation \"{code}\".");
                    println!(
                        "Submit it with: jarn request {code} --name \"<full name>\" --department <dept>"
                    );
                }
            }
        }
        Command::Request {
            code,
            name,
            department,
        } => {
            let request = RecordRequest::new(&code.as_string(), &name, department)?;
            client
                .submit_request(&request)
                .await
                .context("An error occurred. Please try again later.")?;
            println!("{SUBMIT_SUCCESS_MESSAGE}");
        }
    }

    Ok(())
}

fn print_record(record: &InstructorRecord) {
    println!("{}", record.thai_name);
    println!("{}", record.english_name);
    println!();
    println!("Education:");
    for line in &record.education_lines {
        println!("  - {line}");
    }
    println!("Research Interest:");
    for interest in &record.research_interests {
        println!("  - {interest}");
    }
    println!("Room: {}", record.room);
    println!("Email: {}", record.email);
    println!("Website: {}", record.website);
    if let Some(reference) = &record.reference_url {
        println!("Reference: {reference}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_request_with_default_department() {
        let args = Args::try_parse_from(["jarn", "request", "abc", "--name", "Somchai"])
            .expect("args");
        let Command::Request {
            code, department, ..
        } = args.command
        else {
            panic!("expected request command");
        };
        assert_eq!(code.as_string(), "ABC");
        assert_eq!(department, Department::Computer);
    }

    #[test]
    fn rejects_non_letter_codes() {
        assert!(Args::try_parse_from(["jarn", "lookup", "A1C"]).is_err());
    }

    #[test]
    fn accepts_department_slug() {
        let args = Args::try_parse_from([
            "jarn",
            "--base-url",
            "http://127.0.0.1:3000/api",
            "request",
            "XYZ",
            "--name",
            "Somchai",
            "--department",
            "water-resources",
        ])
        .expect("args");
        assert_eq!(args.base_url.as_deref(), Some("http://127.0.0.1:3000/api"));
        assert!(matches!(
            args.command,
            Command::Request {
                department: Department::WaterResources,
                ..
            }
        ));
    }
}
