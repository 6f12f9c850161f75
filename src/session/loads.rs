//! Generation-guarded asynchronous loads.
//!
//! The engine never performs IO. It hands out [`LoadRequest`]s and the caller fulfils them, in
//! any order and possibly much later. Every view switch bumps the generation, so results that
//! arrive for a view that is no longer mounted are recognised and dropped.

use std::collections::BTreeMap;

/// What a load is for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadKind {
    /// Product photo for the mounted view and color.
    Background {
        /// Photo reference.
        reference: String,
    },
    /// Source of an image layer that already exists, or a preview map of the view.
    ViewAsset {
        /// Asset reference.
        reference: String,
    },
    /// Layer source of a stored view that is not mounted. Survives view switches because it
    /// only feeds that view's own export.
    StoredViewAsset {
        /// Asset reference.
        reference: String,
    },
    /// Image that becomes a new layer once it arrives.
    NewImageLayer {
        /// Image reference.
        reference: String,
    },
    /// Font file for a text family.
    Font {
        /// Family name.
        family: String,
    },
}

/// Identifies one outstanding load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    /// Unique id within the session.
    pub id: u64,
    /// View generation at request time.
    pub generation: u64,
    /// View mounted at request time.
    pub view_id: String,
    /// Purpose.
    pub kind: LoadKind,
}

/// Ask the caller for the bytes behind `reference`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ticket to hand back with the result.
    pub ticket: LoadTicket,
    /// What to fetch: URL, relative path, or font family name.
    pub reference: String,
}

/// Whether a completed load still matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadVerdict {
    /// Issued for the mounted view in the current generation.
    Current,
    /// Superseded, unknown or already completed.
    Stale,
}

/// Issues tickets and judges completions.
#[derive(Clone, Debug, Default)]
pub struct LoadTracker {
    generation: u64,
    next_id: u64,
    pending: BTreeMap<u64, LoadTicket>,
}

impl LoadTracker {
    /// Fresh tracker at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Invalidate everything issued so far.
    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Number of loads not completed yet.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Return `true` when a load of `kind` for `view_id` is outstanding in this generation.
    pub fn is_pending(&self, view_id: &str, kind: &LoadKind) -> bool {
        self.pending
            .values()
            .any(|t| t.generation == self.generation && t.view_id == view_id && &t.kind == kind)
    }

    /// Issue a request for `reference`.
    pub fn issue(&mut self, view_id: &str, kind: LoadKind, reference: &str) -> LoadRequest {
        self.next_id += 1;
        let ticket = LoadTicket {
            id: self.next_id,
            generation: self.generation,
            view_id: view_id.to_string(),
            kind,
        };
        self.pending.insert(ticket.id, ticket.clone());
        LoadRequest {
            ticket,
            reference: reference.to_string(),
        }
    }

    /// Retire `ticket` and judge it against the mounted view.
    pub fn complete(&mut self, ticket: &LoadTicket, mounted_view: &str) -> LoadVerdict {
        let Some(issued) = self.pending.remove(&ticket.id) else {
            tracing::debug!(id = ticket.id, "unknown or already completed load ticket");
            return LoadVerdict::Stale;
        };
        if issued != *ticket {
            return LoadVerdict::Stale;
        }
        if matches!(ticket.kind, LoadKind::StoredViewAsset { .. }) {
            return LoadVerdict::Current;
        }
        if ticket.generation != self.generation || ticket.view_id != mounted_view {
            tracing::debug!(
                id = ticket.id,
                ticket_generation = ticket.generation,
                generation = self.generation,
                view = %ticket.view_id,
                "discarding stale load"
            );
            return LoadVerdict::Stale;
        }
        LoadVerdict::Current
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/loads.rs"]
mod tests;
