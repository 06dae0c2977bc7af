//! Memberwatch CLI - queries the member directory for account expirations
//! and sends approaching-expiry notifications.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use tabled::{Table, Tabled};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memberwatch_core::application::{notify, ExpiryReport, ExpiryService, KEY_DATES};
use memberwatch_core::domain::{AccountRecord, AccountStatus, DomainError};
use memberwatch_core::error::AppError;
use memberwatch_core::port::time_provider::SystemTimeProvider;
use memberwatch_infra_ldap::{LdapConfig, LdapDirectoryGateway};
use memberwatch_infra_smtp::{EnvCredentialsProvider, SmtpConfig, SmtpNotificationDispatcher};

#[derive(Parser)]
#[command(name = "memberwatch")]
#[command(about = "Member directory expiration monitor", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory URI
    #[arg(long, env = "MEMBERWATCH_LDAP_URI", default_value = "ldap://localhost:389")]
    ldap_uri: String,

    /// Member search base
    #[arg(
        long,
        env = "MEMBERWATCH_BASE_DN",
        default_value = "cn=members,dc=example,dc=edu"
    )]
    base_dn: String,

    /// Bind DN (omit for anonymous bind)
    #[arg(long, env = "MEMBERWATCH_BIND_DN")]
    bind_dn: Option<String>,

    /// Bind password
    #[arg(long, env = "MEMBERWATCH_BIND_PASSWORD", hide_env_values = true)]
    bind_password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the key expiry dates (30, 15, 10, 5, 2, 1 days out)
    Report {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List accounts expiring within a day-offset range
    Range {
        /// Beginning offset in days (inclusive)
        begin: i64,

        /// End offset in days (inclusive, strictly greater than begin)
        end: i64,
    },

    /// Expiration status of one account
    Status {
        /// Account identifier (uid)
        account: String,
    },

    /// Contact address of one account
    Mail {
        /// Account identifier (uid)
        account: String,
    },

    /// Expiration instant of one account
    Expiration {
        /// Account identifier (uid)
        account: String,
    },

    /// Send an approaching-expiry notice to one account
    Notify {
        /// Account identifier (uid)
        account: String,

        /// Days until expiry, interpolated into the notice body
        #[arg(short, long)]
        days: i64,

        /// Mail relay host
        #[arg(long, env = "MEMBERWATCH_SMTP_HOST", default_value = "smtp.office365.com")]
        smtp_host: String,

        /// Mail submission port (STARTTLS)
        #[arg(long, env = "MEMBERWATCH_SMTP_PORT", default_value = "587")]
        smtp_port: u16,

        /// Envelope sender address
        #[arg(long, env = "MEMBERWATCH_SMTP_SENDER")]
        sender: String,
    },
}

#[derive(Tabled)]
struct ExpiryRow {
    #[tabled(rename = "days")]
    offset_days: i64,
    uid: String,
    mail: String,
    #[tabled(rename = "expires")]
    expires: String,
}

impl ExpiryRow {
    fn from_record(offset_days: i64, record: &AccountRecord) -> Self {
        Self {
            offset_days,
            uid: display_uid(record),
            mail: display_mail(record),
            expires: display_expiry(record),
        }
    }
}

#[derive(Tabled)]
struct RangeRow {
    uid: String,
    mail: String,
    #[tabled(rename = "expires")]
    expires: String,
}

impl RangeRow {
    fn from_record(record: &AccountRecord) -> Self {
        Self {
            uid: display_uid(record),
            mail: display_mail(record),
            expires: display_expiry(record),
        }
    }
}

fn display_uid(record: &AccountRecord) -> String {
    record.uid.clone().unwrap_or_else(|| record.dn.clone())
}

fn display_mail(record: &AccountRecord) -> String {
    record.mail.clone().unwrap_or_else(|| "-".to_string())
}

fn display_expiry(record: &AccountRecord) -> String {
    record
        .expires_at
        .map(|s| format_instant(s.instant().seconds()))
        .unwrap_or_else(|| "never".to_string())
}

/// Each failure kind maps to a distinct exit code so callers can branch on it
fn exit_code(err: &AppError) -> u8 {
    match err {
        AppError::Domain(DomainError::InvalidRange { .. }) => 2,
        AppError::Domain(DomainError::InvalidIdentifier(_)) => 3,
        AppError::Domain(DomainError::AmbiguousResult(_)) => 4,
        AppError::Domain(DomainError::NotFound(_)) => 5,
        AppError::Domain(DomainError::NoExpirationSet(_)) => 6,
        AppError::Directory(_) => 10,
        AppError::Mail(_) => 11,
        _ => 1,
    }
}

fn format_instant(seconds: i64) -> String {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

fn init_logging() {
    let log_format =
        std::env::var("MEMBERWATCH_LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            EnvFilter::try_new(
                "memberwatch_core=info,memberwatch_infra_ldap=info,memberwatch_infra_smtp=info",
            )
        })
        .expect("Failed to create env filter");

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().pretty())
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let cli = Cli::parse();

    let gateway = Arc::new(LdapDirectoryGateway::new(LdapConfig {
        uri: cli.ldap_uri.clone(),
        base_dn: cli.base_dn.clone(),
        bind_dn: cli.bind_dn.clone(),
        bind_password: cli.bind_password.clone(),
    }));
    let service = ExpiryService::new(gateway, Arc::new(SystemTimeProvider));

    match run(cli.command, &service).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {}", "error:".red().bold(), err);
            ExitCode::from(exit_code(&err))
        }
    }
}

async fn run(command: Commands, service: &ExpiryService) -> Result<ExitCode, AppError> {
    match command {
        Commands::Report { json } => {
            let report = service.key_date_report(&KEY_DATES).await;
            if json {
                print_report_json(&report)?;
            } else {
                print_report_table(&report);
            }
            // partial failures do not abort the batch, but they do flag the run
            Ok(if report.is_clean() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }

        Commands::Range { begin, end } => {
            let records = service.accounts_expiring_in_range(begin, end).await?;
            if records.is_empty() {
                println!("No accounts expire between {} and {} days out.", begin, end);
            } else {
                let rows: Vec<RangeRow> = records.iter().map(RangeRow::from_record).collect();
                println!("{}", Table::new(rows));
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Status { account } => {
            let status = service.account_status(&account).await?;
            match status {
                AccountStatus::Expired => println!("{}", "expired".red()),
                AccountStatus::NotExpired => println!("{}", "not expired".green()),
                AccountStatus::NotFound => println!("account does not exist"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Mail { account } => {
            // existence first, so "no account" and "no address" stay distinct
            if service.account_status(&account).await? == AccountStatus::NotFound {
                return Err(DomainError::NotFound(account).into());
            }
            match service.contact_address(&account).await? {
                Some(address) => println!("{}", address),
                None => println!("no contact address on record"),
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Expiration { account } => {
            let instant = service.expiration_instant(&account).await?;
            println!(
                "{} ({} unix)",
                format_instant(instant.seconds()),
                instant.seconds()
            );
            Ok(ExitCode::SUCCESS)
        }

        Commands::Notify {
            account,
            days,
            smtp_host,
            smtp_port,
            sender,
        } => {
            if service.account_status(&account).await? == AccountStatus::NotFound {
                return Err(DomainError::NotFound(account).into());
            }
            let recipient = service
                .contact_address(&account)
                .await?
                .ok_or_else(|| AppError::Config(format!("{} has no contact address", account)))?;

            let dispatcher = SmtpNotificationDispatcher::new(
                SmtpConfig {
                    host: smtp_host,
                    port: smtp_port,
                    sender,
                },
                &EnvCredentialsProvider,
            )?;

            notify::send_expiry_notice(&dispatcher, &recipient, days).await?;
            info!(account = %account, recipient = %recipient, "notification dispatched");
            println!("Notified {} ({})", account, recipient);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_report_table(report: &ExpiryReport) {
    if report.matches.is_empty() {
        println!("No accounts approaching expiration.");
    } else {
        let rows: Vec<ExpiryRow> = report
            .matches
            .iter()
            .flat_map(|m| {
                m.accounts
                    .iter()
                    .map(|r| ExpiryRow::from_record(m.offset_days, r))
            })
            .collect();
        println!("{}", Table::new(rows));
    }

    for failure in &report.failures {
        eprintln!(
            "{} query for {} days out failed: {}",
            "warning:".yellow().bold(),
            failure.offset_days,
            failure.error
        );
    }
}

fn print_report_json(report: &ExpiryReport) -> Result<(), AppError> {
    let failures: Vec<serde_json::Value> = report
        .failures
        .iter()
        .map(|f| {
            serde_json::json!({
                "offset_days": f.offset_days,
                "error": f.error.to_string(),
            })
        })
        .collect();

    let out = serde_json::json!({
        "matches": &report.matches,
        "failures": failures,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
