//! CLI entry point and command dispatch for vendor-risk.

mod cmd;

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;

use vendor_risk::domain::VendorStatus;
use vendor_risk::scoring::Rating;

#[derive(Parser)]
#[command(name = "vendor-risk")]
#[command(version)]
#[command(about = "Vendor security-risk assessment", long_about = None)]
#[command(
    after_help = "GETTING STARTED:\n    vendor-risk init --name <ORG>      Create .vendor-risk/ in the current directory\n    vendor-risk vendor add <NAME> ...  Register a vendor\n    vendor-risk assess <NAME>          Answer the questionnaire interactively"
)]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize vendor-risk in the current directory
    Init {
        /// Name of the assessing organization
        #[arg(long)]
        name: Option<String>,
        /// Default approver for reviews
        #[arg(long)]
        reviewer: Option<String>,
        /// Overwrite an existing config.md
        #[arg(long)]
        force: bool,
    },
    /// Manage the vendor registry
    Vendor {
        #[command(subcommand)]
        command: VendorCommands,
    },
    /// Manage the question bank
    Question {
        #[command(subcommand)]
        command: QuestionCommands,
    },
    /// Submit a security questionnaire for a vendor
    Assess(AssessArgs),
    /// Review workflow for submitted assessments
    Review {
        #[command(subcommand)]
        command: ReviewCommands,
    },
    /// Show risk counts and upcoming reviews
    Dashboard {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the impact x maturity risk matrix
    Matrix,
    /// Signed access to uploaded documents
    Document {
        #[command(subcommand)]
        command: DocumentCommands,
    },
    /// Show or validate the effective configuration
    Config {
        /// Report errors and warnings instead of printing the config
        #[arg(long)]
        validate: bool,
    },
    /// Generate shell completion script
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
    /// Show version information (with --verbose, commit and build date)
    Version,
}

#[derive(Subcommand)]
enum VendorCommands {
    /// Register a vendor
    Add(VendorAddArgs),
    /// List vendors
    List {
        /// Filter by risk rating (low, medium, high)
        #[arg(long, value_parser = parse_rating)]
        risk: Option<Rating>,
        /// Only vendors that were never assessed
        #[arg(long, conflicts_with = "risk")]
        unrated: bool,
        /// Filter by status (active, inactive, pending)
        #[arg(long, value_parser = parse_status)]
        status: Option<VendorStatus>,
        /// Filter by category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a vendor and its assessment history
    Show {
        /// Vendor ID or exact name
        vendor: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search vendors by name
    Search {
        query: String,
        /// Also match owner and contact names and emails
        #[arg(long)]
        all_fields: bool,
    },
    /// Update vendor fields (an empty value clears optional fields)
    Update {
        /// Vendor ID or exact name
        vendor: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        website: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<VendorStatus>,
    },
    /// Delete a vendor and its assessment history
    Delete {
        /// Vendor ID or exact name
        vendor: String,
        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// List categories in use
    Categories,
}

#[derive(Args)]
struct VendorAddArgs {
    /// Vendor name
    name: String,
    /// Internal owner of the relationship
    #[arg(long)]
    owner: Option<String>,
    #[arg(long)]
    website: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// Initial status
    #[arg(long, value_parser = parse_status, default_value = "pending")]
    status: VendorStatus,
    /// Primary contact name
    #[arg(long)]
    contact: String,
    /// Primary contact email
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    role: Option<String>,
    #[arg(long)]
    department: Option<String>,
    /// Secondary contact name
    #[arg(long)]
    secondary_contact: Option<String>,
    #[arg(long, requires = "secondary_contact")]
    secondary_email: Option<String>,
    #[arg(long, requires = "secondary_contact")]
    secondary_phone: Option<String>,
}

#[derive(Subcommand)]
enum QuestionCommands {
    /// Add a question to the bank
    Add {
        /// Question text
        text: String,
        #[arg(long)]
        category: String,
        /// multiple_choice, single_choice, text, number, boolean, file_upload, date
        #[arg(long = "type")]
        question_type: String,
        /// Weight between 0 and 100
        #[arg(long)]
        weight: String,
        #[arg(long)]
        mandatory: bool,
        /// Store the question as inactive
        #[arg(long)]
        inactive: bool,
        /// Choices as a JSON array, e.g. '["Yes","No"]'
        #[arg(long)]
        options: Option<String>,
    },
    /// List active questions, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Deactivate a question
    Delete { id: String },
}

#[derive(Args)]
struct AssessArgs {
    /// Vendor name (created if unknown)
    vendor: String,
    /// YAML answers file with maturity: and impact: sections
    #[arg(long, conflicts_with = "yes")]
    answers: Option<PathBuf>,
    /// Flags answered yes (repeatable), e.g. --yes has_iso27001
    #[arg(long, value_name = "FLAG")]
    yes: Vec<String>,
    /// ISO-27001 certificate file
    #[arg(long)]
    certificate: Option<PathBuf>,
    /// Certificate expiry date (YYYY-MM-DD)
    #[arg(long)]
    expires: Option<String>,
    #[arg(long)]
    maturity_notes: Option<String>,
    #[arg(long)]
    impact_notes: Option<String>,
    /// Output the new assessment as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum ReviewCommands {
    /// Approve a completed assessment
    Approve {
        /// Assessment ID
        id: String,
        /// Approver name (defaults to organization.reviewer)
        #[arg(long)]
        by: Option<String>,
    },
}

#[derive(Subcommand)]
enum DocumentCommands {
    /// Print a signed URL for the certificate of a vendor's latest assessment
    Url {
        /// Vendor ID or exact name, or a bucket-relative document path
        target: String,
    },
    /// Resolve a signed URL and copy the document to a local file
    Fetch {
        url: String,
        /// Destination file
        #[arg(long, short)]
        output: PathBuf,
    },
}

fn parse_rating(s: &str) -> Result<Rating, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn parse_status(s: &str) -> Result<VendorStatus, String> {
    s.parse().map_err(|e: anyhow::Error| e.to_string())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    if cli.quiet {
        std::env::set_var("VENDOR_RISK_QUIET", "1");
    }

    match cli.command {
        Commands::Init {
            name,
            reviewer,
            force,
        } => cmd::init::cmd_init(name, reviewer, force),
        Commands::Vendor { command } => match command {
            VendorCommands::Add(args) => cmd::vendor::cmd_add(args.into()),
            VendorCommands::List {
                risk,
                unrated,
                status,
                category,
                json,
            } => cmd::vendor::cmd_list(
                vendor_risk::repository::VendorFilter {
                    risk,
                    status,
                    category,
                    unrated,
                },
                json,
            ),
            VendorCommands::Show { vendor, json } => cmd::vendor::cmd_show(&vendor, json),
            VendorCommands::Search { query, all_fields } => {
                cmd::vendor::cmd_search(&query, all_fields)
            }
            VendorCommands::Update {
                vendor,
                name,
                owner,
                website,
                category,
                description,
                status,
            } => cmd::vendor::cmd_update(
                &vendor,
                vendor_risk::domain::VendorUpdate {
                    name,
                    owner_name: owner,
                    website,
                    category,
                    description,
                    status,
                },
            ),
            VendorCommands::Delete { vendor, yes } => cmd::vendor::cmd_delete(&vendor, yes),
            VendorCommands::Categories => cmd::vendor::cmd_categories(),
        },
        Commands::Question { command } => match command {
            QuestionCommands::Add {
                text,
                category,
                question_type,
                weight,
                mandatory,
                inactive,
                options,
            } => cmd::question::cmd_add(vendor_risk::domain::NewQuestion {
                text,
                category,
                question_type,
                weight,
                mandatory,
                active: !inactive,
                options,
            }),
            QuestionCommands::List { json } => cmd::question::cmd_list(json),
            QuestionCommands::Delete { id } => cmd::question::cmd_delete(&id),
        },
        Commands::Assess(args) => cmd::assess::cmd_assess(cmd::assess::AssessOptions {
            vendor: args.vendor,
            answers: args.answers,
            yes: args.yes,
            certificate: args.certificate,
            expires: args.expires,
            maturity_notes: args.maturity_notes,
            impact_notes: args.impact_notes,
            json: args.json,
        }),
        Commands::Review { command } => match command {
            ReviewCommands::Approve { id, by } => cmd::review::cmd_approve(&id, by),
        },
        Commands::Dashboard { json } => cmd::review::cmd_dashboard(json),
        Commands::Matrix => cmd::review::cmd_matrix(),
        Commands::Document { command } => match command {
            DocumentCommands::Url { target } => cmd::document::cmd_url(&target),
            DocumentCommands::Fetch { url, output } => cmd::document::cmd_fetch(&url, &output),
        },
        Commands::Config { validate } => {
            if validate {
                cmd::config::cmd_config_validate()
            } else {
                cmd::config::cmd_config_show()
            }
        }
        Commands::Completion { shell } => cmd_completion(shell),
        Commands::Version => cmd_version(verbose),
    }
}

impl From<VendorAddArgs> for vendor_risk::domain::NewVendor {
    fn from(args: VendorAddArgs) -> Self {
        use vendor_risk::domain::ContactInput;

        Self {
            name: args.name,
            owner_name: args.owner,
            website: args.website,
            category: args.category,
            description: args.description,
            status: args.status,
            primary: ContactInput {
                name: args.contact,
                email: args.email,
                phone: args.phone,
                role: args.role,
                department: args.department,
            },
            secondary: args.secondary_contact.map(|name| ContactInput {
                name,
                email: args.secondary_email.unwrap_or_default(),
                phone: args.secondary_phone,
                ..Default::default()
            }),
        }
    }
}

fn cmd_completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "vendor-risk", &mut io::stdout());
    Ok(())
}

fn cmd_version(verbose: bool) -> Result<()> {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("vendor-risk {}", VERSION);

    if verbose {
        const GIT_SHA: &str = env!("GIT_SHA");
        const BUILD_DATE: &str = env!("BUILD_DATE");
        println!("commit: {}", GIT_SHA);
        println!("built: {}", BUILD_DATE);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assess_flags() {
        let cli = Cli::try_parse_from([
            "vendor-risk",
            "assess",
            "Acme",
            "--yes",
            "has_iso27001",
            "--yes",
            "uses_mfa",
            "--certificate",
            "cert.pdf",
            "--expires",
            "2027-01-01",
        ])
        .unwrap();
        let Commands::Assess(args) = cli.command else {
            panic!("expected assess");
        };
        assert_eq!(args.vendor, "Acme");
        assert_eq!(args.yes, vec!["has_iso27001", "uses_mfa"]);
        assert_eq!(args.expires.as_deref(), Some("2027-01-01"));
    }

    #[test]
    fn test_parse_vendor_list_filters() {
        let cli = Cli::try_parse_from(["vendor-risk", "vendor", "list", "--risk", "High"]).unwrap();
        let Commands::Vendor {
            command: VendorCommands::List { risk, .. },
        } = cli.command
        else {
            panic!("expected vendor list");
        };
        assert_eq!(risk, Some(Rating::High));

        assert!(Cli::try_parse_from(["vendor-risk", "vendor", "list", "--risk", "n/a"]).is_err());
    }

    #[test]
    fn test_secondary_email_requires_contact() {
        let result = Cli::try_parse_from([
            "vendor-risk",
            "vendor",
            "add",
            "Acme",
            "--contact",
            "Alice",
            "--email",
            "a@example.com",
            "--secondary-email",
            "b@example.com",
        ]);
        assert!(result.is_err());
    }
}
