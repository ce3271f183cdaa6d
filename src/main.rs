// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// CLI entrypoint for the reditor front end.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser};

use reditor::console::{Console, Severity};
use reditor::editor::render_document;
use reditor::profile::registry::ProfileRegistry;
use reditor::profile::{DirProfileSource, ProfileSource};
use reditor::remote::http::HttpTransport;
use reditor::remote::{render_outcome, CompileClient, CompileOutcome, CompileRequest};
use reditor::{DEFAULT_ENDPOINT, DEFAULT_PROFILES};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(
    name = "reditor",
    version = VERSION,
    about = "Front end for the reditor online assembler: profile-driven highlighting and remote compilation"
)]
pub struct Cli {
    #[arg(
        long = "profiles-dir",
        value_name = "DIR",
        default_value = "profiles",
        long_help = "Directory holding <name>.jsonc profile descriptors. All default profiles plus the selected one are loaded from here at startup."
    )]
    pub profiles_dir: PathBuf,
    #[arg(
        short = 'p',
        long = "profile",
        value_name = "NAME",
        default_value = "potados",
        long_help = "CPU profile to highlight and compile with. Pass 'none' to select no profile."
    )]
    pub profile: String,
    #[arg(
        long = "endpoint",
        value_name = "URL",
        default_value = DEFAULT_ENDPOINT,
        long_help = "Compile service endpoint. Only http:// URLs are accepted by the built-in transport."
    )]
    pub endpoint: String,
    #[arg(
        long = "method",
        value_name = "NAME",
        long_help = "Optional compile method forwarded to the service."
    )]
    pub method: Option<String>,
    #[arg(short = 'i', long = "infile", value_name = "FILE")]
    pub infile: Option<PathBuf>,
    #[arg(
        long = "highlight",
        action = ArgAction::SetTrue,
        long_help = "Print the input with ANSI syntax highlighting."
    )]
    pub highlight: bool,
    #[arg(
        long = "compile",
        action = ArgAction::SetTrue,
        long_help = "Submit the input to the compile service and print the result."
    )]
    pub compile: bool,
    #[arg(
        long = "list-profiles",
        action = ArgAction::SetTrue,
        long_help = "List the profiles that loaded successfully and exit."
    )]
    pub list_profiles: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let use_color = std::env::var("NO_COLOR").is_err();
    let mut console = Console::new(Box::new(std::io::stdout()), use_color);

    let mut names: Vec<String> = DEFAULT_PROFILES.iter().map(ToString::to_string).collect();
    if cli.profile != "none" && !names.contains(&cli.profile) {
        names.push(cli.profile.clone());
    }
    let source: Arc<dyn ProfileSource + Send + Sync> =
        Arc::new(DirProfileSource::new(&cli.profiles_dir));
    let registry = ProfileRegistry::load_all(&source, &names, &mut console);

    if cli.list_profiles {
        for name in registry.names() {
            println!("{name}");
        }
        return;
    }

    if !cli.highlight && !cli.compile {
        eprintln!("nothing to do; pass --highlight and/or --compile");
        process::exit(1);
    }

    let Some(infile) = cli.infile.as_deref() else {
        eprintln!("no input file; pass --infile");
        process::exit(1);
    };
    let code = match fs::read_to_string(infile) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("failed to read {}: {err}", infile.display());
            process::exit(1);
        }
    };

    if cli.highlight {
        let descriptor = if cli.profile == "none" {
            None
        } else {
            registry.get(&cli.profile)
        };
        let Some(descriptor) = descriptor else {
            eprintln!("no highlighting mode registered for profile '{}'", cli.profile);
            process::exit(1);
        };
        print!("{}", render_document(&descriptor, &code, use_color));
    }

    if cli.compile {
        if cli.profile == "none" {
            console.line(Severity::Error, "No profile provided");
            process::exit(1);
        }
        let Some(descriptor) = registry.get(&cli.profile) else {
            console.line(
                Severity::Error,
                &format!("profile '{}' is not loaded", cli.profile),
            );
            process::exit(1);
        };

        let transport = match HttpTransport::new(&cli.endpoint) {
            Ok(transport) => transport,
            Err(err) => {
                eprintln!("{err}");
                process::exit(1);
            }
        };
        let client = CompileClient::new(transport);
        let request = CompileRequest {
            code: &code,
            profile: &cli.profile,
            method: cli.method.as_deref(),
        };
        match client.compile(&request) {
            Ok(outcome) => {
                render_outcome(&mut console, &outcome, &descriptor);
                if matches!(
                    outcome,
                    CompileOutcome::Failure(_) | CompileOutcome::Unrecognized
                ) {
                    process::exit(1);
                }
            }
            Err(err) => {
                console.line(Severity::Error, &err.to_string());
                process::exit(1);
            }
        }
    }
}
