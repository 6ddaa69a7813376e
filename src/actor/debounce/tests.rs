use std::path::Path;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::DebounceActor;
use super::scheduler::Scheduler;
use crate::actor::messages::{DebounceMsg, PipelineMsg};
use crate::core::{SessionId, Snapshot};

fn session(name: &str) -> SessionId {
    SessionId::for_document(Path::new(name))
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

#[test]
fn test_burst_fires_once_after_last_change() {
    let id = session("/doc/main.tex");
    let t0 = Instant::now();
    let mut scheduler = Scheduler::new(ms(1000));

    scheduler.on_change(Snapshot::new(id, 1, "a"), t0);
    scheduler.on_change(Snapshot::new(id, 2, "ab"), t0 + ms(200));
    scheduler.on_change(Snapshot::new(id, 3, "abc"), t0 + ms(900));

    assert!(scheduler.take_due(t0 + ms(1000)).is_empty());
    assert!(scheduler.take_due(t0 + ms(1899)).is_empty());

    let fired = scheduler.take_due(t0 + ms(1900));
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].revision, 3);
    assert_eq!(&*fired[0].text, "abc");

    assert!(scheduler.take_due(t0 + ms(5000)).is_empty());
}

#[test]
fn test_sessions_are_independent() {
    let a = session("/doc/a.tex");
    let b = session("/doc/b.tex");
    let t0 = Instant::now();
    let mut scheduler = Scheduler::new(ms(100));

    scheduler.on_change(Snapshot::new(a, 1, "a"), t0);
    scheduler.on_change(Snapshot::new(b, 1, "b"), t0 + ms(50));

    let first = scheduler.take_due(t0 + ms(100));
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].session, a);
    assert!(scheduler.is_armed(b));

    let second = scheduler.take_due(t0 + ms(150));
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].session, b);
}

#[test]
fn test_cancel_drops_deadline() {
    let id = session("/doc/main.tex");
    let t0 = Instant::now();
    let mut scheduler = Scheduler::new(ms(100));

    scheduler.on_change(Snapshot::new(id, 1, "a"), t0);
    assert!(scheduler.cancel(id));
    assert!(!scheduler.cancel(id));
    assert!(scheduler.take_due(t0 + ms(500)).is_empty());
    assert!(scheduler.next_deadline().is_none());
}

#[test]
fn test_sleep_duration() {
    let id = session("/doc/main.tex");
    let t0 = Instant::now();
    let mut scheduler = Scheduler::new(ms(1000));

    assert_eq!(scheduler.sleep_duration(t0), Duration::from_secs(86400));

    scheduler.on_change(Snapshot::new(id, 1, "a"), t0);
    assert_eq!(scheduler.sleep_duration(t0 + ms(400)), ms(600));
    // overdue deadlines still yield a non-zero sleep
    assert_eq!(scheduler.sleep_duration(t0 + ms(2000)), ms(1));
}

#[tokio::test]
async fn test_actor_coalesces_burst() {
    let id = session("/doc/main.tex");
    let (tx, rx) = mpsc::channel(8);
    let (pipeline_tx, mut pipeline_rx) = mpsc::channel(8);
    let handle = tokio::spawn(DebounceActor::new(rx, pipeline_tx, ms(50)).run());

    for revision in 1..=3 {
        tx.send(DebounceMsg::Change(Snapshot::new(id, revision, format!("rev {revision}"))))
            .await
            .unwrap();
    }

    let msg = tokio::time::timeout(Duration::from_secs(5), pipeline_rx.recv())
        .await
        .unwrap()
        .unwrap();
    match msg {
        PipelineMsg::Fire(snapshot) => {
            assert_eq!(snapshot.revision, 3);
            assert_eq!(&*snapshot.text, "rev 3");
        }
        other => panic!("unexpected message {other:?}"),
    }

    // nothing else fires
    assert!(
        tokio::time::timeout(ms(200), pipeline_rx.recv())
            .await
            .is_err()
    );

    tx.send(DebounceMsg::Shutdown).await.unwrap();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_actor_cancel_before_fire() {
    let id = session("/doc/main.tex");
    let (tx, rx) = mpsc::channel(8);
    let (pipeline_tx, mut pipeline_rx) = mpsc::channel(8);
    let handle = tokio::spawn(DebounceActor::new(rx, pipeline_tx, ms(100)).run());

    tx.send(DebounceMsg::Change(Snapshot::new(id, 1, "a")))
        .await
        .unwrap();
    tx.send(DebounceMsg::Cancel(id)).await.unwrap();

    assert!(
        tokio::time::timeout(ms(300), pipeline_rx.recv())
            .await
            .is_err()
    );

    tx.send(DebounceMsg::Shutdown).await.unwrap();
    handle.await.unwrap();
}
