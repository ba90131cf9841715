#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end reconciliation scenarios against the in-memory fakes.

use std::sync::{Arc, Mutex};

use {
    chrono::{DateTime, Duration, TimeZone, Utc},
    livewatch_common::ChannelId,
    livewatch_notify::{
        Action, LiveSnapshot, LiveStatusSource, MessageId, NotificationSurface,
        ReconciliationEngine,
        fake::{FakeSource, FakeSurface, SurfaceCall},
    },
    livewatch_watchlist::WatchList,
    rstest::rstest,
};

fn ch(raw: &str) -> ChannelId {
    ChannelId::parse(raw).unwrap()
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 14, 18, 0, 0).single().unwrap()
}

fn live(display_name: &str, started_at: DateTime<Utc>) -> LiveSnapshot {
    LiveSnapshot {
        display_name: display_name.into(),
        title: format!("{display_name} streams"),
        category_id: Some("509658".into()),
        category_name: Some("Just Chatting".into()),
        viewer_count: 42,
        started_at,
        thumbnail_url_template: "https://static-cdn.jtvnw.net/previews-ttv/live_user-{width}x{height}.jpg"
            .into(),
        avatar_url: Some("https://static-cdn.jtvnw.net/avatar.png".into()),
    }
}

struct World {
    engine: ReconciliationEngine,
    source: Arc<FakeSource>,
    surface: Arc<FakeSurface>,
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl World {
    fn watching(channels: &[&str]) -> Self {
        let list = channels
            .iter()
            .map(|c| ch(c))
            .collect::<WatchList>()
            .into_shared();
        let source = Arc::new(FakeSource::new());
        let surface = Arc::new(FakeSurface::new());
        let now = Arc::new(Mutex::new(base_time()));
        let clock_now = Arc::clone(&now);
        let engine = ReconciliationEngine::new(
            list,
            Arc::clone(&source) as Arc<dyn LiveStatusSource>,
            Arc::clone(&surface) as Arc<dyn NotificationSurface>,
        )
        .with_clock(Arc::new(move || *clock_now.lock().unwrap()));
        Self {
            engine,
            source,
            surface,
            now,
        }
    }

    fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    fn tracked(&self, channel: &str) -> Option<MessageId> {
        self.engine.registry().get(&ch(channel))
    }
}

#[tokio::test]
async fn alice_goes_live_is_updated_then_goes_offline() {
    let mut world = World::watching(&["alice"]);
    world
        .source
        .set_live(&ch("alice"), live("alice", base_time() - Duration::minutes(90)));

    let report = world.engine.reconcile().await;
    let Some(Action::Created { message_id }) = report.action_for(&ch("alice")) else {
        panic!("expected a new message, got {:?}", report.outcome_for(&ch("alice")));
    };
    assert_eq!(world.surface.mutations(), vec![SurfaceCall::Send(message_id)]);
    let posted = world.surface.message(message_id).unwrap();
    assert_eq!(posted.live_for, "1h30m");
    assert_eq!(posted.viewers, "42");
    assert_eq!(posted.category, "Just Chatting");
    assert_eq!(posted.url, "https://twitch.tv/alice");
    assert_eq!(posted.author_name, "alice is live on Twitch!");

    world.surface.clear_calls();
    world.advance(Duration::minutes(1));
    let report = world.engine.reconcile().await;
    assert_eq!(report.action_for(&ch("alice")), Some(Action::Updated { message_id }));
    assert_eq!(world.surface.mutations(), vec![SurfaceCall::Edit(message_id)]);
    assert_eq!(world.surface.message(message_id).unwrap().live_for, "1h31m");
    assert_eq!(world.tracked("alice"), Some(message_id));

    world.surface.clear_calls();
    world.source.set_offline(&ch("alice"));
    let report = world.engine.reconcile().await;
    assert_eq!(report.action_for(&ch("alice")), Some(Action::Removed { message_id }));
    assert_eq!(world.surface.mutations(), vec![SurfaceCall::Delete(message_id)]);
    assert_eq!(world.tracked("alice"), None);
    assert!(world.surface.message_ids().is_empty());
}

#[tokio::test]
async fn offline_channels_without_records_cause_no_calls() {
    let mut world = World::watching(&["alice", "bob", "carol"]);

    for _ in 0..3 {
        let report = world.engine.reconcile().await;
        assert!(report.channels.iter().all(|r| matches!(r.outcome, Ok(Action::Idle))));
    }
    assert!(world.surface.calls().is_empty());
}

#[tokio::test]
async fn going_offline_deletes_once_even_if_message_is_already_gone() {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.engine.reconcile().await;
    let id = world.tracked("alice").unwrap();

    // Vanishes between the sweep and the decision: the sweep sees it, the
    // delete does not.
    world.surface.fail_fetches(true);
    world.surface.delete_externally(id);
    world.source.set_offline(&ch("alice"));
    world.surface.clear_calls();

    let report = world.engine.reconcile().await;
    assert_eq!(report.action_for(&ch("alice")), Some(Action::Removed { message_id: id }));
    assert_eq!(world.surface.mutations(), vec![SurfaceCall::Delete(id)]);
    assert_eq!(world.tracked("alice"), None);
}

#[tokio::test]
async fn repeated_ticks_edit_the_same_message() {
    let mut world = World::watching(&["alice"]);
    world
        .source
        .set_live(&ch("alice"), live("alice", base_time() - Duration::minutes(10)));

    world.engine.reconcile().await;
    let id = world.tracked("alice").unwrap();

    for _ in 0..5 {
        world.advance(Duration::minutes(1));
        world.surface.clear_calls();
        let report = world.engine.reconcile().await;
        assert_eq!(report.action_for(&ch("alice")), Some(Action::Updated { message_id: id }));
        assert_eq!(world.surface.mutations(), vec![SurfaceCall::Edit(id)]);
    }
    assert_eq!(world.surface.message_ids(), vec![id]);
}

#[rstest]
#[case::just_before_two_hours(119, false)]
#[case::two_hours(120, true)]
#[case::just_after_two_hours(121, false)]
#[case::three_hours(180, false)]
#[case::four_hours(240, true)]
#[tokio::test]
async fn long_broadcasts_are_reposted_on_even_hours(
    #[case] minutes_live: i64,
    #[case] reposted: bool,
) {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(
        &ch("alice"),
        live("alice", base_time() - Duration::minutes(minutes_live - 1)),
    );
    world.engine.reconcile().await;
    let first = world.tracked("alice").unwrap();

    world.advance(Duration::minutes(1));
    world.surface.clear_calls();
    let report = world.engine.reconcile().await;
    let current = world.tracked("alice").unwrap();

    if reposted {
        assert_ne!(current, first);
        assert_eq!(
            report.action_for(&ch("alice")),
            Some(Action::Recreated {
                previous: first,
                message_id: current,
            })
        );
        assert_eq!(world.surface.mutations(), vec![
            SurfaceCall::Delete(first),
            SurfaceCall::Send(current),
        ]);
        assert_eq!(world.surface.message_ids(), vec![current]);
    } else {
        assert_eq!(current, first);
        assert_eq!(world.surface.mutations(), vec![SurfaceCall::Edit(first)]);
    }
}

#[tokio::test]
async fn externally_deleted_message_is_reposted_while_live() {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.engine.reconcile().await;
    let first = world.tracked("alice").unwrap();

    world.surface.delete_externally(first);
    world.advance(Duration::minutes(1));
    let report = world.engine.reconcile().await;

    assert_eq!(report.swept, vec![ch("alice")]);
    let Some(Action::Created { message_id }) = report.action_for(&ch("alice")) else {
        panic!("expected a fresh message");
    };
    assert_ne!(message_id, first);
    assert_eq!(world.tracked("alice"), Some(message_id));
}

#[tokio::test]
async fn externally_deleted_message_is_forgotten_when_offline() {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.engine.reconcile().await;
    let first = world.tracked("alice").unwrap();

    world.surface.delete_externally(first);
    world.source.set_offline(&ch("alice"));
    world.surface.clear_calls();
    let report = world.engine.reconcile().await;

    assert_eq!(report.swept, vec![ch("alice")]);
    assert_eq!(report.action_for(&ch("alice")), Some(Action::Idle));
    assert!(world.surface.mutations().is_empty());
    assert_eq!(world.tracked("alice"), None);
}

#[tokio::test]
async fn message_vanishing_mid_tick_is_healed_by_the_edit() {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.engine.reconcile().await;
    let first = world.tracked("alice").unwrap();

    // The sweep cannot verify anything, so the edit is what discovers the loss.
    world.surface.fail_fetches(true);
    world.surface.delete_externally(first);
    world.surface.clear_calls();
    let report = world.engine.reconcile().await;

    let Some(Action::Healed {
        previous,
        message_id,
    }) = report.action_for(&ch("alice"))
    else {
        panic!("expected the edit to fall back to a new message");
    };
    assert_eq!(previous, first);
    assert_eq!(world.surface.mutations(), vec![
        SurfaceCall::Edit(first),
        SurfaceCall::Send(message_id),
    ]);
    assert_eq!(world.tracked("alice"), Some(message_id));
}

#[tokio::test]
async fn one_failing_channel_does_not_block_the_others() {
    let mut world = World::watching(&["alice", "bob", "carol"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.source.set_failing(&ch("bob"), "helix returned 503");
    world.source.set_live(&ch("carol"), live("carol", base_time()));

    let report = world.engine.reconcile().await;

    assert_eq!(report.failures().count(), 1);
    assert!(report.outcome_for(&ch("bob")).unwrap().is_err());
    assert!(matches!(report.action_for(&ch("alice")), Some(Action::Created { .. })));
    assert!(matches!(report.action_for(&ch("carol")), Some(Action::Created { .. })));
    assert_eq!(world.engine.registry().len(), 2);
}

#[tokio::test]
async fn query_failure_leaves_existing_notification_alone() {
    let mut world = World::watching(&["alice"]);
    world.source.set_live(&ch("alice"), live("alice", base_time()));
    world.engine.reconcile().await;
    let id = world.tracked("alice").unwrap();

    world.source.set_failing(&ch("alice"), "timeout");
    world.surface.clear_calls();
    world.engine.reconcile().await;

    assert!(world.surface.mutations().is_empty());
    assert_eq!(world.tracked("alice"), Some(id));
}
