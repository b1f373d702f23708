//! Demo customers used to seed the record store.
//!
//! Pure data with no side effects; usable from tests and at start-up.

use chrono::{DateTime, TimeZone, Utc};

use super::types::{Customer, CustomerStatus};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .unwrap_or_default()
}

/// Returns the twelve demo customers, ids `"1"` to `"12"`.
pub fn seed_customers() -> Vec<Customer> {
    use CustomerStatus::{Active, Inactive, Pending};

    vec![
        Customer::new(
            "1",
            "Juan García",
            "juan@example.com",
            "+34 600 123 456",
            "Tech Solutions",
            Active,
            at(2024, 1, 15, 10, 30),
        )
        .with_last_contact(at(2025, 1, 1, 14, 0))
        .with_notes("Cliente VIP"),
        Customer::new(
            "2",
            "María López",
            "maria@example.com",
            "+34 600 234 567",
            "Marketing Pro",
            Active,
            at(2024, 2, 10, 9, 15),
        )
        .with_last_contact(at(2024, 12, 28, 11, 30)),
        Customer::new(
            "3",
            "Carlos Martínez",
            "carlos@example.com",
            "+34 600 345 678",
            "Innovación Digital",
            Pending,
            at(2024, 3, 5, 16, 45),
        ),
        Customer::new(
            "4",
            "Ana Rodríguez",
            "ana@example.com",
            "+34 600 456 789",
            "Consultores SA",
            Active,
            at(2024, 4, 20, 8, 0),
        )
        .with_last_contact(at(2024, 12, 30, 16, 20)),
        Customer::new(
            "5",
            "Pedro Sánchez",
            "pedro@example.com",
            "+34 600 567 890",
            "DevOps Team",
            Inactive,
            at(2024, 5, 12, 14, 30),
        )
        .with_last_contact(at(2024, 8, 15, 10, 0)),
        Customer::new(
            "6",
            "Laura Fernández",
            "laura@example.com",
            "+34 600 678 901",
            "Design Studio",
            Active,
            at(2024, 6, 8, 11, 20),
        )
        .with_last_contact(at(2024, 12, 29, 9, 45)),
        Customer::new(
            "7",
            "Javier Ruiz",
            "javier@example.com",
            "+34 600 789 012",
            "Cloud Services",
            Pending,
            at(2024, 7, 14, 15, 10),
        ),
        Customer::new(
            "8",
            "Carmen Díaz",
            "carmen@example.com",
            "+34 600 890 123",
            "Legal Advisors",
            Active,
            at(2024, 8, 22, 10, 50),
        )
        .with_last_contact(at(2025, 1, 2, 12, 30)),
        Customer::new(
            "9",
            "Miguel Ángel Torres",
            "miguel@example.com",
            "+34 600 901 234",
            "Fintech Solutions",
            Active,
            at(2024, 9, 3, 13, 40),
        )
        .with_last_contact(at(2024, 12, 27, 15, 10)),
        Customer::new(
            "10",
            "Isabel Moreno",
            "isabel@example.com",
            "+34 600 012 345",
            "HR Consulting",
            Inactive,
            at(2024, 10, 18, 9, 25),
        )
        .with_last_contact(at(2024, 11, 20, 14, 0)),
        Customer::new(
            "11",
            "Francisco Jiménez",
            "francisco@example.com",
            "+34 600 123 456",
            "E-commerce Plus",
            Active,
            at(2024, 11, 5, 16, 15),
        )
        .with_last_contact(at(2024, 12, 31, 10, 20)),
        Customer::new(
            "12",
            "Sofía Romero",
            "sofia@example.com",
            "+34 600 234 567",
            "Media Group",
            Pending,
            at(2024, 12, 1, 12, 0),
        ),
    ]
}
