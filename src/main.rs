mod tui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use emplea::checks;
use emplea::config::Config;
use emplea::logging;
use emplea::models::{Application, ApplicationStatus, Category, JobListing, ListingDraft, Profile};
use emplea::query::{ListingQuery, Selector};
use emplea::storage::open_cache;
use emplea::{ApplyOutcome, EarnOutcome, Session, SessionError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "emplea")]
#[command(about = "Early job placement for students and graduates - browse, apply, track")]
struct Cli {
    /// Directory holding the local data store
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List job listings
    Jobs {
        /// Search title, organization and description
        #[arg(short, long, default_value = "")]
        query: String,

        /// Region (RM, V, VIII, X) or "any"
        #[arg(short, long, default_value = "any")]
        region: Selector<String>,

        /// Category (Internship, Part-time, Volunteer, Full-time) or "any"
        #[arg(short, long, default_value = "any")]
        category: Selector<Category>,
    },

    /// Show listing details
    Show {
        /// Listing ID
        id: String,
    },

    /// Apply to a listing
    Apply {
        /// Listing ID
        id: String,
    },

    /// List your applications with their history
    Applications,

    /// Change the status of an application
    Status {
        /// Application (listing) ID
        id: String,

        /// New status (review, interview, offer, reject)
        status: ApplicationStatus,

        /// Record this timestamp instead of the current time
        #[arg(long)]
        at: Option<String>,
    },

    /// Withdraw an application
    Cancel {
        /// Application (listing) ID
        id: String,
    },

    /// List micro-credentials
    Credentials,

    /// Mark a micro-credential as earned
    Earn {
        /// Credential ID
        id: String,
    },

    /// Show or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Publish a listing as an organization
    Publish {
        #[arg(long, default_value = "")]
        title: String,

        #[arg(long, default_value = "")]
        organization: String,

        #[arg(long, default_value = "RM")]
        region: String,

        #[arg(long, default_value = "")]
        locality: String,

        #[arg(long, default_value = "Internship")]
        category: Category,

        /// Work mode (On-site, Remote, Hybrid...)
        #[arg(long, default_value = "On-site")]
        mode: String,

        #[arg(long, default_value = "20 h/week")]
        hours: String,

        /// Comma-separated requirements
        #[arg(long, default_value = "")]
        requirements: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Show the current role, or switch between Candidate and Organization
    Role {
        #[arg(long)]
        toggle: bool,
    },

    /// Restore seed data and clear the local store
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },

    /// Run consistency checks over seed data, filters and storage
    Check,

    /// Interactive browser
    Browse,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show the profile
    Show,

    /// Update profile fields; omitted fields keep their value
    Set {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        /// Field of study
        #[arg(long)]
        field: Option<String>,

        #[arg(long)]
        locality: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.verbose);
    logging::init(config.verbose);

    let cache = open_cache(&config.db_path());
    let mut session = Session::open(cache);

    match cli.command {
        Commands::Jobs {
            query,
            region,
            category,
        } => {
            let results = session.search(&ListingQuery::new(query, region, category));
            if results.is_empty() {
                println!("No results for the applied filters.");
            } else {
                println!(
                    "{:<7} {:<12} {:<32} {:<20} {:<6} {:<14}",
                    "ID", "CATEGORY", "TITLE", "ORGANIZATION", "REGION", "LOCALITY"
                );
                println!("{}", "-".repeat(94));
                for job in results {
                    let marker = if session.has_applied(&job.id) { "*" } else { " " };
                    println!(
                        "{:<6}{} {:<12} {:<32} {:<20} {:<6} {:<14}",
                        job.id,
                        marker,
                        job.category,
                        truncate(&job.title, 30),
                        truncate(&job.organization, 18),
                        job.region,
                        truncate(&job.locality, 14)
                    );
                }
            }
        }

        Commands::Show { id } => match session.find_job(&id) {
            Some(job) => print_listing(job),
            None => println!("Listing {} not found.", id),
        },

        Commands::Apply { id } => match session.apply(&id) {
            ApplyOutcome::Applied => {
                println!("Application sent. See it with `emplea applications`.")
            }
            ApplyOutcome::AlreadyApplied => println!("You already applied to {}.", id),
            ApplyOutcome::UnknownListing => println!("Listing {} not found.", id),
        },

        Commands::Applications => {
            let applications = session.applications();
            if applications.is_empty() {
                println!("You haven't applied yet. Explore listings to start your first experience.");
            } else {
                for (i, app) in applications.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print_application(app);
                }
            }
        }

        Commands::Status { id, status, at } => {
            match session.set_status(&id, status, at.as_deref()) {
                Ok(app) => println!(
                    "{} is now '{}' ({} history entries).",
                    app.id(),
                    app.status,
                    app.history.len()
                ),
                Err(SessionError::UnknownApplication(_)) => {
                    println!("No application for listing {}.", id)
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Cancel { id } => {
            if session.cancel(&id) {
                println!("Application to {} withdrawn.", id);
            } else {
                println!("No application for listing {}.", id);
            }
        }

        Commands::Credentials => {
            println!("{:<7} {:<10} {:<26} {}", "ID", "STATUS", "NAME", "DESCRIPTION");
            println!("{}", "-".repeat(84));
            for cred in session.credentials() {
                let status = if cred.is_earned() { "Earned" } else { "Pending" };
                println!(
                    "{:<7} {:<10} {:<26} {}",
                    cred.id,
                    status,
                    truncate(&cred.name, 24),
                    cred.description
                );
            }
        }

        Commands::Earn { id } => match session.earn_credential(&id) {
            Ok(EarnOutcome::Earned) => println!("Credential {} earned.", id),
            Ok(EarnOutcome::AlreadyEarned) => println!("Credential {} was already earned.", id),
            Err(SessionError::UnknownCredential(_)) => println!("Credential {} not found.", id),
            Err(e) => return Err(e.into()),
        },

        Commands::Profile { command } => match command {
            ProfileCommands::Show => print_profile(session.profile()),

            ProfileCommands::Set {
                name,
                email,
                field,
                locality,
            } => {
                let current = session.profile().clone();
                let profile = Profile {
                    name: name.unwrap_or(current.name),
                    email: email.unwrap_or(current.email),
                    field_of_study: field.unwrap_or(current.field_of_study),
                    locality: locality.unwrap_or(current.locality),
                };
                session.save_profile(profile);
                println!("Profile saved.");
                print_profile(session.profile());
            }
        },

        Commands::Publish {
            title,
            organization,
            region,
            locality,
            category,
            mode,
            hours,
            requirements,
            description,
        } => {
            let draft = ListingDraft {
                title,
                organization,
                region,
                locality,
                category,
                work_mode: mode,
                hours_per_week: hours,
                requirements,
                description,
            };
            match session.publish(draft) {
                Ok(job) => {
                    println!("Listing {} published. It is now visible in Explore.", job.id);
                }
                Err(SessionError::Validation(e)) => bail!("{}", capitalize(&e.to_string())),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Role { toggle } => {
            if toggle {
                session.toggle_role();
            }
            println!("Current role: {}", session.role());
        }

        Commands::Reset { yes } => {
            if yes {
                session.reset();
                println!("Local data reset.");
            } else {
                println!("This restores listings, applications, credentials and profile to their defaults.");
                println!("Run again with --yes to confirm.");
            }
        }

        Commands::Check => {
            let results = checks::run(session.cache());
            let passed = results.iter().filter(|r| r.passed).count();
            for r in &results {
                let mark = if r.passed { "OK  " } else { "FAIL" };
                match &r.info {
                    Some(info) => println!("{}  {} ({})", mark, r.name, info),
                    None => println!("{}  {}", mark, r.name),
                }
            }
            println!("\n{}/{} OK.", passed, results.len());
            if passed != results.len() {
                bail!("{} check(s) failed", results.len() - passed);
            }
        }

        Commands::Browse => {
            tui::run_browse(&mut session)?;
        }
    }

    Ok(())
}

fn print_listing(job: &JobListing) {
    println!("{} [{}]", job.title, job.id);
    println!("{} - {}, {}", job.organization, job.locality, job.region);
    println!("{} | {} | {}", job.category, job.work_mode, job.hours_per_week);
    println!();
    for line in textwrap::fill(&job.description, 78).lines() {
        println!("{}", line);
    }
    println!();
    println!("Requirements: {}", job.requirements.join(", "));
}

fn print_application(app: &Application) {
    println!("{} [{}]  {}", app.listing.title, app.id(), app.status);
    println!("{} - {}", app.listing.organization, app.listing.locality);
    println!("Applied: {}", app.applied_at);
    println!("History:");
    for entry in &app.history {
        println!("  - {} - {}", entry.status, entry.timestamp);
    }
}

fn print_profile(profile: &Profile) {
    println!("Name:           {}", profile.name);
    println!("Email:          {}", profile.email);
    println!("Field of study: {}", profile.field_of_study);
    println!("Locality:       {}", profile.locality);
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
