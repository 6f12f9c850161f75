use super::*;

fn bg(reference: &str) -> LoadKind {
    LoadKind::Background {
        reference: reference.to_string(),
    }
}

#[test]
fn current_load_is_accepted_once() {
    let mut tracker = LoadTracker::new();
    let req = tracker.issue("front", bg("front.jpg"), "front.jpg");
    assert_eq!(tracker.pending(), 1);
    assert!(tracker.is_pending("front", &bg("front.jpg")));
    assert_eq!(tracker.complete(&req.ticket, "front"), LoadVerdict::Current);
    assert_eq!(tracker.complete(&req.ticket, "front"), LoadVerdict::Stale);
    assert_eq!(tracker.pending(), 0);
}

#[test]
fn generation_bump_makes_old_tickets_stale() {
    let mut tracker = LoadTracker::new();
    let req = tracker.issue("front", bg("front.jpg"), "front.jpg");
    tracker.bump();
    assert!(!tracker.is_pending("front", &bg("front.jpg")));
    assert_eq!(tracker.complete(&req.ticket, "front"), LoadVerdict::Stale);
}

#[test]
fn other_view_is_stale() {
    let mut tracker = LoadTracker::new();
    let req = tracker.issue("front", bg("front.jpg"), "front.jpg");
    assert_eq!(tracker.complete(&req.ticket, "back"), LoadVerdict::Stale);
}

#[test]
fn forged_ticket_is_stale() {
    let mut tracker = LoadTracker::new();
    let req = tracker.issue("front", bg("front.jpg"), "front.jpg");
    let mut forged = req.ticket.clone();
    forged.kind = bg("other.jpg");
    assert_eq!(tracker.complete(&forged, "front"), LoadVerdict::Stale);
}

#[test]
fn stored_view_load_survives_switches_but_not_reuse() {
    let mut tracker = LoadTracker::new();
    let kind = LoadKind::StoredViewAsset {
        reference: "logo.png".to_string(),
    };
    let req = tracker.issue("back", kind, "logo.png");
    tracker.bump();
    assert_eq!(tracker.complete(&req.ticket, "front"), LoadVerdict::Current);
    assert_eq!(tracker.complete(&req.ticket, "front"), LoadVerdict::Stale);
}
