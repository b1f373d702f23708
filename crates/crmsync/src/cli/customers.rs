//! Customer CLI arguments.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Args;

use crmsync_core::customer::{CreateCustomerRequest, CustomerStatus, UpdateCustomerRequest};
use crmsync_core::listing::StatusFilter;
use crmsync_core::serde::parse_timestamp;

/// Search and status filter shared by `list` and `export`.
#[derive(Debug, Clone, Args)]
pub struct FilterArgs {
    /// Case-insensitive text matched against name, email and company.
    #[arg(long, short)]
    pub search: Option<String>,
    /// Status filter: all, active, pending or inactive.
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Page number, 1-based; clamped into range.
    #[arg(long, short, default_value_t = 1)]
    pub page: usize,
}

#[derive(Debug, Clone, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Destination file (default: CRMSYNC_EXPORT_FILENAME or clientes.csv).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    /// Full name.
    #[arg(long)]
    pub name: String,
    /// Email address.
    #[arg(long)]
    pub email: String,
    /// Phone number.
    #[arg(long)]
    pub phone: String,
    /// Company name.
    #[arg(long)]
    pub company: String,
    /// Customer status.
    #[arg(long, default_value = "active")]
    pub status: CustomerStatus,
    /// Optional notes.
    #[arg(long)]
    pub notes: Option<String>,
}

impl From<CreateArgs> for CreateCustomerRequest {
    fn from(args: CreateArgs) -> Self {
        let request =
            CreateCustomerRequest::new(args.name, args.email, args.phone, args.company, args.status);
        match args.notes {
            Some(notes) => request.with_notes(notes),
            None => request,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct UpdateArgs {
    /// Customer ID.
    pub id: String,
    /// New name.
    #[arg(long)]
    pub name: Option<String>,
    /// New email.
    #[arg(long)]
    pub email: Option<String>,
    /// New phone.
    #[arg(long)]
    pub phone: Option<String>,
    /// New company.
    #[arg(long)]
    pub company: Option<String>,
    /// New status.
    #[arg(long)]
    pub status: Option<CustomerStatus>,
    /// New notes.
    #[arg(long)]
    pub notes: Option<String>,
    /// Last contact (YYYY-MM-DD or RFC 3339).
    #[arg(long, value_parser = parse_last_contact)]
    pub last_contact: Option<DateTime<Utc>>,
}

impl UpdateArgs {
    /// Splits the arguments into the target id and the patch.
    pub fn into_request(self) -> (String, UpdateCustomerRequest) {
        let request = UpdateCustomerRequest {
            name: self.name,
            email: self.email,
            phone: self.phone,
            company: self.company,
            status: self.status,
            notes: self.notes,
            last_contact: self.last_contact,
        };
        (self.id, request)
    }
}

fn parse_last_contact(value: &str) -> Result<DateTime<Utc>, String> {
    parse_timestamp(value).ok_or_else(|| format!("invalid date: {value}"))
}
