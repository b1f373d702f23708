//! CSV rendering of a customer list.
//!
//! Produces the text of the downloadable file; writing it anywhere is left
//! to the caller.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;

use crate::customer::Customer;

/// Default name of the exported file.
pub const DEFAULT_EXPORT_FILENAME: &str = "clientes.csv";

/// UTF-8 byte-order mark, so spreadsheet tools pick the right encoding.
pub const BOM: char = '\u{feff}';

/// Column headers, in order.
pub const HEADERS: [&str; 8] = [
    "Nombre",
    "Email",
    "Teléfono",
    "Empresa",
    "Estado",
    "Fecha Creación",
    "Último Contacto",
    "Notas",
];

const MISSING: &str = "-";

/// Errors that can occur when exporting customers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("No hay clientes para exportar")]
    Empty,

    #[error("Error al generar el CSV: {0}")]
    Write(String),
}

/// Formats a timestamp as an es-ES short date (`15/1/2024`).
pub fn format_date_es(date: &DateTime<Utc>) -> String {
    date.format("%-d/%-m/%Y").to_string()
}

fn row(customer: &Customer) -> [String; 8] {
    [
        customer.name.clone(),
        customer.email.clone(),
        customer.phone.clone(),
        customer.company.clone(),
        customer.status.to_string(),
        format_date_es(&customer.created_at),
        customer
            .last_contact
            .as_ref()
            .map(format_date_es)
            .unwrap_or_else(|| MISSING.to_string()),
        customer
            .notes
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| MISSING.to_string()),
    ]
}

/// Renders customers as CSV text, BOM included.
///
/// The header row is unquoted; every data cell is quoted. Rows are joined
/// with `\n` and there is no trailing newline.
pub fn customers_to_csv<'a, I>(customers: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Customer>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut rows = 0;
    for customer in customers {
        writer
            .write_record(row(customer))
            .map_err(|e| ExportError::Write(e.to_string()))?;
        rows += 1;
    }

    if rows == 0 {
        return Err(ExportError::Empty);
    }

    let body = writer
        .into_inner()
        .map_err(|e| ExportError::Write(e.to_string()))?;
    let body = String::from_utf8(body).map_err(|e| ExportError::Write(e.to_string()))?;

    let mut csv = String::with_capacity(body.len() + 128);
    csv.push(BOM);
    csv.push_str(&HEADERS.join(","));
    csv.push('\n');
    csv.push_str(body.strip_suffix('\n').unwrap_or(&body));
    Ok(csv)
}
