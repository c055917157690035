//! Mount lifecycle of the session guard driven through a fake host

use futures::poll;
use shloksagar_core::testing::{FakeHost, GatedVerifier, GuardFixture, RedirectLog, T0};
use shloksagar_core::{
    ActiveMount, ActivityEvent, GuardState, Mount, RedirectReason, SessionOutcome, VerifyError,
};
use std::time::Duration;

fn fixture() -> GuardFixture<GatedVerifier> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("shloksagar_core=debug")
        .with_test_writer()
        .try_init();
    GuardFixture::new(GatedVerifier::new())
}

fn active(mount: Mount) -> ActiveMount {
    match mount {
        Mount::Active(active) => active,
        other => panic!("expected an active mount, got {other:?}"),
    }
}

#[tokio::test]
async fn test_mount_subscribes_timer_and_listeners() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));

    assert_eq!(host.live_listeners(), 1);
    assert_eq!(host.live_timers(), vec![Duration::from_secs(60)]);
    assert_eq!(host.pending_tasks(), 1);
    assert_eq!(fx.guard.current_mount(), Some(mount.id()));

    host.run_tasks().await;
    assert_eq!(fx.verifier.tokens(), vec!["tok-fixture".to_string()]);
    assert!(redirects.is_empty());
    assert_eq!(fx.guard.state(), GuardState::Active);
}

#[tokio::test]
async fn test_unmount_releases_everything() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    mount.stop();

    assert_eq!(host.live_listeners(), 0);
    assert!(host.live_timers().is_empty());
    assert_eq!(fx.guard.current_mount(), None);

    fx.clock.advance_secs(4000);
    assert_eq!(host.fire(ActivityEvent::PointerDown), 0);
    assert_eq!(host.tick(), 0);
    assert_eq!(fx.sessions().last_activity(), Some(T0));

    // Verification spawned by the retired mount never reaches the backend
    host.run_tasks().await;
    assert_eq!(fx.verifier.calls(), 0);
    assert!(redirects.is_empty());
    assert!(fx.sessions().token().is_some());
}

#[tokio::test]
async fn test_login_view_bypass_subscribes_nothing() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();

    let mount = fx.guard.start("/login", &host, redirects.sink());
    assert!(matches!(mount, Mount::Bypassed));

    fx.sign_in_at(T0 - 7_200_000);
    let mount = fx.guard.start("/login?expired=true", &host, redirects.sink());
    assert!(matches!(mount, Mount::Bypassed));

    assert_eq!(host.live_listeners(), 0);
    assert!(host.live_timers().is_empty());
    assert_eq!(host.pending_tasks(), 0);
    assert!(redirects.is_empty());
}

#[tokio::test]
async fn test_activity_keeps_session_alive() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let _mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    host.run_tasks().await;

    fx.clock.set(T0 + 1_000_000);
    assert_eq!(host.fire(ActivityEvent::KeyDown), 1);
    assert_eq!(fx.sessions().last_activity(), Some(T0 + 1_000_000));

    fx.clock.set(T0 + 1_000_000 + 1_799_000);
    host.tick();
    assert!(redirects.is_empty());
    assert_eq!(fx.guard.check("/dashboard"), SessionOutcome::Valid);
}

#[tokio::test]
async fn test_missing_token_redirects_before_verification() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();

    let mount = fx.guard.start("/dashboard", &host, redirects.sink());
    let Mount::Redirected(redirect) = mount else {
        panic!("expected an immediate redirect, got {mount:?}");
    };

    assert_eq!(redirect.reason, RedirectReason::NoSession);
    assert_eq!(redirect.location(), "/login");
    assert_eq!(host.pending_tasks(), 0);
    assert_eq!(fx.verifier.calls(), 0);
    // Immediate redirects are returned, not delivered
    assert!(redirects.is_empty());
}

#[tokio::test]
async fn test_expired_session_redirects_with_flag() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();
    fx.clock.advance_secs(1801);

    let mount = fx.guard.start("/settings", &host, redirects.sink());
    let Mount::Redirected(redirect) = mount else {
        panic!("expected an immediate redirect, got {mount:?}");
    };

    assert_eq!(redirect.location(), "/login?expired=true");
    assert_eq!(fx.sessions().load(), None);
    assert_eq!(host.live_listeners(), 0);
}

#[tokio::test]
async fn test_late_rejection_still_redirects() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    let gate = fx.verifier.gate();
    fx.sign_in();

    let _mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    let mut task = host.take_tasks().remove(0);
    assert!(poll!(task.as_mut()).is_pending());

    // The view is usable while verification is in flight
    assert_eq!(fx.guard.state(), GuardState::Active);
    host.tick();
    assert!(redirects.is_empty());

    gate.send(Err(VerifyError::Rejected(401))).unwrap();
    task.await;

    let delivered = redirects.all();
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].reason, RedirectReason::Invalid);
    assert_eq!(delivered[0].location(), "/login");
    assert_eq!(fx.guard.state(), GuardState::Unauthenticated);
    assert_eq!(fx.sessions().load(), None);
    assert_eq!(fx.cookies.get("adminToken"), None);
}

#[tokio::test]
async fn test_verification_after_unmount_is_ignored() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    let gate = fx.verifier.gate();
    fx.sign_in();

    let mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    let mut task = host.take_tasks().remove(0);
    assert!(poll!(task.as_mut()).is_pending());

    drop(mount);
    gate.send(Err(VerifyError::Transport("offline".into())))
        .unwrap();
    task.await;

    assert_eq!(fx.verifier.calls(), 1);
    assert!(redirects.is_empty());
    assert!(fx.sessions().token().is_some());
}

#[tokio::test]
async fn test_idle_tick_expires_session() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let _mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    host.run_tasks().await;

    fx.clock.advance_secs(1800);
    host.tick();
    assert!(redirects.is_empty());

    fx.clock.advance_secs(1);
    host.tick();
    host.tick();

    let delivered = redirects.all();
    assert_eq!(delivered.len(), 1);
    assert!(delivered[0].is_expired());
    assert_eq!(delivered[0].location(), "/login?expired=true");
    assert_eq!(fx.guard.state(), GuardState::Expired);
    assert!(fx.store.is_empty());
}

#[tokio::test]
async fn test_logout_silences_mount() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let _mount = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    host.run_tasks().await;

    let outcome = fx.guard.logout();
    assert!(matches!(
        outcome,
        SessionOutcome::RedirectTo(ref r) if r.reason == RedirectReason::LoggedOut
    ));

    fx.clock.advance_secs(3600);
    host.fire(ActivityEvent::Scroll);
    host.tick();
    assert!(redirects.is_empty());
    assert!(fx.store.is_empty());
}

#[tokio::test]
async fn test_restart_replaces_previous_mount() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();
    fx.sign_in();

    let first = active(fx.guard.start("/dashboard", &host, redirects.sink()));
    let second = active(fx.guard.start("/settings", &host, redirects.sink()));
    assert_ne!(first.id(), second.id());
    assert_eq!(fx.guard.current_mount(), Some(second.id()));

    assert!(!fx.guard.record_activity(first.id()));
    fx.clock.advance_secs(30);
    assert!(fx.guard.record_activity(second.id()));

    // Retiring the stale mount leaves the current one in place
    drop(first);
    assert_eq!(fx.guard.current_mount(), Some(second.id()));
    assert_eq!(host.live_listeners(), 1);
}

#[tokio::test]
async fn test_unknown_path_is_guarded() {
    let fx = fixture();
    let host = FakeHost::new();
    let redirects = RedirectLog::new();

    let mount = fx.guard.start("/no-such-page", &host, redirects.sink());
    assert!(matches!(
        mount,
        Mount::Redirected(ref r) if r.reason == RedirectReason::NoSession
    ));

    fx.sign_in();
    let _mount = active(fx.guard.start("/no-such-page", &host, redirects.sink()));
    assert_eq!(host.live_timers(), vec![Duration::from_secs(60)]);
    assert_eq!(host.live_listeners(), 1);
}
