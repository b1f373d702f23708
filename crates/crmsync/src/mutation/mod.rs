//! Mutation pipeline: drives each write through
//! `idle → pending → fulfilled | rejected` and invalidates the customers
//! query when, and only when, the write succeeds.

mod pipeline;

pub use pipeline::MutationPipeline;

use serde::Serialize;

/// Which write a mutation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            MutationKind::Create => "create",
            MutationKind::Update => "update",
            MutationKind::Delete => "delete",
        };
        f.write_str(kind)
    }
}

/// Lifecycle state of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "error", rename_all = "lowercase")]
pub enum MutationStatus {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    /// Carries the error message shown to the user.
    Rejected(String),
}

impl MutationStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, MutationStatus::Pending)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            MutationStatus::Rejected(message) => Some(message),
            _ => None,
        }
    }
}

/// One write in progress or just settled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingMutation {
    pub kind: MutationKind,
    /// Id of the customer being changed; `None` for creates until they land.
    pub target: Option<String>,
    pub status: MutationStatus,
}

impl PendingMutation {
    /// Message shown to the user once the mutation settles.
    pub fn outcome_message(&self) -> Option<&'static str> {
        let message = match (&self.status, self.kind) {
            (MutationStatus::Idle | MutationStatus::Pending, _) => return None,
            (MutationStatus::Fulfilled, MutationKind::Create) => "Cliente creado correctamente",
            (MutationStatus::Fulfilled, MutationKind::Update) => "Cliente actualizado correctamente",
            (MutationStatus::Fulfilled, MutationKind::Delete) => "Cliente eliminado correctamente",
            (MutationStatus::Rejected(_), MutationKind::Create) => "Error al crear el cliente",
            (MutationStatus::Rejected(_), MutationKind::Update) => "Error al actualizar el cliente",
            (MutationStatus::Rejected(_), MutationKind::Delete) => "Error al eliminar el cliente",
        };
        Some(message)
    }
}

/// Broadcast on every mutation state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationEvent {
    /// Sequence number, increasing across all mutations.
    pub id: u64,
    /// Shared by the events of one mutation.
    pub mutation_id: u64,
    pub mutation: PendingMutation,
}
