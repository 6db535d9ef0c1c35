use formsync_autosave::SaveSerializer;

#[test]
fn single_save_completes() {
    let mut s = SaveSerializer::new();
    assert!(!s.in_flight());

    let t = s.dispatch();
    assert!(s.in_flight());
    assert!(s.is_current(t));
    assert!(s.complete(t));
    assert!(!s.in_flight());
}

#[test]
fn completing_twice_is_rejected() {
    let mut s = SaveSerializer::new();
    let t = s.dispatch();
    assert!(s.complete(t));
    assert!(!s.complete(t));
}

#[test]
fn newer_dispatch_supersedes_older() {
    let mut s = SaveSerializer::new();
    let old = s.dispatch();
    let new = s.dispatch();

    assert!(new.generation() > old.generation());
    assert!(!s.is_current(old));
    assert!(!s.complete(old));
    // The stale completion did not settle the current save.
    assert!(s.in_flight());
    assert!(s.complete(new));
}

#[test]
fn stale_completion_after_current_settled_is_ignored() {
    let mut s = SaveSerializer::new();
    let old = s.dispatch();
    let new = s.dispatch();
    assert!(s.complete(new));
    assert!(!s.complete(old));
    assert!(!s.in_flight());
}

#[test]
fn invalidate_stales_everything() {
    let mut s = SaveSerializer::new();
    let t = s.dispatch();
    let before = s.generation();
    s.invalidate();
    assert!(s.generation() > before);
    assert!(!s.in_flight());
    assert!(!s.complete(t));

    let next = s.dispatch();
    assert!(s.complete(next));
}
