use dbinspect_core::{Cancellable, CancellationToken};

#[test]
fn new_token_is_not_cancelled() {
    assert!(!CancellationToken::new().is_cancelled());
}

#[test]
fn clones_share_the_flag() {
    let token = CancellationToken::new();
    let clone = token.clone();
    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn child_observes_parent_cancellation() {
    let parent = CancellationToken::new();
    let child = parent.child();
    let grandchild = child.child();
    parent.cancel();
    assert!(child.is_cancelled());
    assert!(grandchild.is_cancelled());
}

#[test]
fn cancelling_child_leaves_parent_running() {
    let parent = CancellationToken::new();
    let child = parent.child();
    child.cancel();
    assert!(child.is_cancelled());
    assert!(!parent.is_cancelled());
}
