//! plurall-access - Roster lookup CLI for Plurall portal credentials
//!
//! Reads the class roster (CSV or cached copy), composes the credentials
//! message for a student, and opens a WhatsApp deep link to send it.
//!
//! CHANGELOG:
//! - 10/16/2026 - Config panel and session commands
//! - 10/14/2026 - Initial CLI skeleton

use clap::{Parser, Subcommand};
use plurall_access::commands;
use plurall_access::commands::messaging::{parse_target, Target};
use plurall_access::output::OutputControls;
use plurall_access::roster::StudentRecord;
use plurall_access::settings::Settings;
use std::path::PathBuf;
use std::process::ExitCode;

/// Roster lookup CLI for Plurall portal credentials.
#[derive(Parser, Debug)]
#[command(name = "plurall-access")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Compact JSON output (no whitespace)
    #[arg(long, global = true)]
    compact: bool,

    /// Print deep links instead of opening them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Data directory for the cached roster and config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Roster CSV location (file path or http(s) URL)
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    // =========================================================================
    // LOOKUP COMMANDS
    // =========================================================================
    /// List classes in display order
    Classes,

    /// List the students of a class
    Students {
        /// Class name (e.g., "5º Ano")
        class: String,
    },

    /// Show the credentials message for a student
    Show {
        /// Class name
        class: String,

        /// Student name (fuzzy matched within the class)
        student: String,

        /// Render display markup instead of plain text
        #[arg(long)]
        markup: bool,
    },

    // =========================================================================
    // MESSAGING COMMANDS
    // =========================================================================
    /// Send a student's credentials
    Send {
        /// Class name
        class: String,

        /// Student name (fuzzy matched within the class)
        student: String,

        /// Recipient: primary, secondary, or a phone number with area code
        #[arg(short, long, value_parser = parse_target)]
        to: Target,
    },

    /// Ask the primary contact to enroll a student missing from the roster
    NotRegistered {
        /// Class name
        class: String,

        /// Student name
        name: String,

        /// Ask for the credentials to be sent to this number
        #[arg(long)]
        student_phone: Option<String>,
    },

    // =========================================================================
    // CONFIGURATION PANEL
    // =========================================================================
    /// Re-download the roster source, bypassing caches
    Refresh,

    /// Show or change the fixed contacts
    Config {
        /// Configuration panel password
        #[arg(short, long)]
        password: String,

        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Add a student to the cached roster
    AddStudent {
        /// Configuration panel password
        #[arg(short, long)]
        password: String,

        class: String,
        name: String,
        login: String,
        student_password: String,
    },

    /// Remove a student by id (see `students <class>`)
    RemoveStudent {
        /// Configuration panel password
        #[arg(short, long)]
        password: String,

        id: u32,
    },

    // =========================================================================
    // SESSION
    // =========================================================================
    /// Interactive session: NDJSON events on stdin, responses on stdout
    Session,
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the configured contacts
    Show,

    /// Change one or both contacts
    Set {
        #[arg(long)]
        primary: Option<String>,

        #[arg(long)]
        secondary: Option<String>,
    },
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let output = OutputControls {
        json: cli.json || cli.compact,
        compact: cli.compact,
    };
    let settings = Settings::resolve(cli.data_dir, cli.source);

    let result = match cli.command {
        // Lookup commands
        Command::Classes => commands::lookup::classes(&settings, &output),
        Command::Students { class } => commands::lookup::students(&settings, &class, &output),
        Command::Show { class, student, markup } => {
            commands::lookup::show(&settings, &class, &student, markup, &output)
        }

        // Messaging commands
        Command::Send { class, student, to } => {
            commands::messaging::send(&settings, &class, &student, &to, cli.dry_run, &output)
        }
        Command::NotRegistered { class, name, student_phone } => commands::messaging::not_registered(
            &settings,
            &class,
            &name,
            student_phone.as_deref(),
            cli.dry_run,
            &output,
        ),

        // Configuration panel
        Command::Refresh => commands::admin::refresh(&settings, &output),
        Command::Config { password, action } => match action {
            ConfigAction::Show => commands::admin::config_show(&settings, &password, &output),
            ConfigAction::Set { primary, secondary } => {
                commands::admin::config_set(&settings, &password, primary, secondary, &output)
            }
        },
        Command::AddStudent {
            password,
            class,
            name,
            login,
            student_password,
        } => commands::admin::add_student(
            &settings,
            &password,
            StudentRecord::new(class, name, login, student_password),
            &output,
        ),
        Command::RemoveStudent { password, id } => {
            commands::admin::remove_student(&settings, &password, id, &output)
        }

        // Session
        Command::Session => commands::session::run(&settings, cli.dry_run),
    };

    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            if cli.json || cli.compact {
                println!("{}", plurall_access::output::format_error(&format!("{:#}", e)));
            } else {
                eprintln!("Error: {:#}", e);
            }
            ExitCode::from(1)
        }
    }
}
