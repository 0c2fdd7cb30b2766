//! Booking conflict detection for gig scheduling.
//!
//! A gig occupies the half-open time interval `[begin, end)`. A staff member or an asset must not
//! be assigned to two gigs with overlapping intervals. This module holds the interval logic and
//! the data types describing a detected conflict; the store implementations supply the candidate
//! assignments (the Postgres store filters and orders them in SQL with the same predicate and
//! ordering, the mock store uses these functions directly).

use chrono::{DateTime, Utc};

/// Strict interval overlap test for two half-open intervals `[a_begin, a_end)` and
/// `[b_begin, b_end)`.
///
/// Back-to-back bookings where one interval ends exactly when the other begins do not overlap.
pub fn overlaps(
    a_begin: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_begin: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_begin < b_end && b_begin < a_end
}

/// An existing assignment whose gig overlaps a requested booking window.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConflictingAssignment {
    /// Display label of the blocked resource: the staff member's name or the asset's tag.
    pub resource_label: String,
    pub gig_name: String,
    pub gig_begin: DateTime<Utc>,
    pub gig_end: DateTime<Utc>,
}

/// Pick the conflict to report from a set of overlapping assignments.
///
/// The reported conflict is deterministic: the assignment whose gig starts earliest wins, with
/// (gig end, gig name) as tie-break.
pub fn first_conflict(
    mut candidates: Vec<ConflictingAssignment>,
) -> Option<ConflictingAssignment> {
    candidates.sort_by(|a, b| {
        (a.gig_begin, a.gig_end, &a.gig_name).cmp(&(b.gig_begin, b.gig_end, &b.gig_name))
    });
    candidates.into_iter().next()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    Staff,
    Asset,
}

/// A detected booking conflict, reported as ordinary data to the caller.
///
/// Conflicts are expected, user-facing outcomes of the booking endpoint, not errors; the endpoint
/// turns them into a rejected booking with [BookingConflict::message] as the error text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingConflict {
    pub kind: ConflictKind,
    pub assignment: ConflictingAssignment,
}

impl BookingConflict {
    pub fn staff(assignment: ConflictingAssignment) -> Self {
        Self {
            kind: ConflictKind::Staff,
            assignment,
        }
    }

    pub fn asset(assignment: ConflictingAssignment) -> Self {
        Self {
            kind: ConflictKind::Asset,
            assignment,
        }
    }

    /// Human-readable message naming the blocked resource and the conflicting gig.
    pub fn message(&self) -> String {
        match self.kind {
            ConflictKind::Staff => format!(
                "Staff conflict detected: {} is already assigned to \"{}\"",
                self.assignment.resource_label, self.assignment.gig_name
            ),
            ConflictKind::Asset => format!(
                "Asset conflict detected: Asset {} is already assigned to \"{}\"",
                self.assignment.resource_label, self.assignment.gig_name
            ),
        }
    }
}
