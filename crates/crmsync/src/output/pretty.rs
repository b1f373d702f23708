//! Pretty output formatting.

use crmsync_core::customer::{Customer, CustomerStats, CustomerStatus};
use crmsync_core::export::format_date_es;
use crmsync_core::listing::Page;

use crate::demo::DemoReport;

/// Format a customer for display.
pub fn format_customer(customer: &Customer) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Email: {}\n  Phone: {}\n  Company: {}\n  Created: {}",
        customer.name,
        customer.status.label(),
        customer.id,
        customer.email,
        customer.phone,
        customer.company,
        format_date_es(&customer.created_at)
    );
    if let Some(last_contact) = &customer.last_contact {
        output.push_str(&format!("\n  Last contact: {}", format_date_es(last_contact)));
    }
    if let Some(notes) = &customer.notes {
        output.push_str(&format!("\n  Notes: {}", notes));
    }
    output
}

/// Format one page of customers, with the page-number control.
pub fn format_page(page: &Page<Customer>) -> String {
    if page.total_items == 0 {
        return "No customers found.".to_string();
    }
    let mut output = format!(
        "CUSTOMERS {}-{} of {} (page {}/{})\n",
        page.start_index + 1,
        page.end_index,
        page.total_items,
        page.current_page,
        page.total_pages
    );
    output.push_str(&"-".repeat(40));
    for customer in &page.items {
        output.push_str(&format!("\n{}", format_customer(customer)));
        output.push('\n');
    }

    let pages: Vec<String> = page
        .window()
        .map(|n| {
            if n == page.current_page {
                format!("[{n}]")
            } else {
                n.to_string()
            }
        })
        .collect();
    output.push_str(&format!("\nPages: {}", pages.join(" ")));
    output
}

/// Format dashboard statistics.
pub fn format_stats(stats: &CustomerStats) -> String {
    let mut output = format!("Total: {}", stats.total);
    for status in CustomerStatus::ALL {
        output.push_str(&format!("\n{}: {}", status.label(), stats.count(status)));
    }
    output.push_str(&format!("\nActive rate: {}%", stats.active_percent()));
    output
}

/// Format the steps of a demo session.
pub fn format_demo(report: &DemoReport) -> String {
    report
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{:>2}. {:<18} {}", i + 1, step.step, step.outcome))
        .collect::<Vec<_>>()
        .join("\n")
}
