//! End-to-end queue flows.

use crate::{Delivery, OutgoingQueue, QoS, RecordingPublisher, ReplayReport};
use mqtt_queue_database::{OutgoingRepository, QueueStore};

fn queue() -> OutgoingQueue {
    OutgoingQueue::from_store(QueueStore::open_in_memory().unwrap())
}

#[test]
fn quoted_payload_is_replayed_and_removed() {
    let mut queue = queue();
    let id = queue.enqueue("sensors/temp", b"it's 21C").unwrap();
    assert_eq!(queue.pending_count().unwrap(), 1);

    let stored = queue.store().get_outgoing(&id).unwrap().unwrap();
    assert_eq!(stored.payload(), b"it's 21C");
    assert_eq!(stored.payload_len, 8);

    let mut publisher = RecordingPublisher::new();
    let report = queue.send_queued(QoS::AtMostOnce, &mut publisher).unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(queue.pending_count().unwrap(), 0);
    assert_eq!(publisher.calls()[0].topic, "sensors/temp");
    assert_eq!(publisher.calls()[0].payload, b"it's 21C");
}

#[test]
fn failed_first_publish_keeps_only_that_record() {
    let mut queue = queue();
    let first = queue.enqueue("a", b"first").unwrap();
    let second = queue.enqueue("b", b"second").unwrap();

    let mut publisher = RecordingPublisher::new().fail_call(0);
    let report = queue.send_queued(QoS::AtLeastOnce, &mut publisher).unwrap();

    assert_eq!(report.attempted, 2);
    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(queue.pending_count().unwrap(), 1);

    let rows = queue.store().list_outgoing().unwrap();
    assert_eq!(rows[0].id.as_deref(), Some(first.as_str()));
    assert!(queue.store().get_outgoing(&second).unwrap().is_none());
}

#[test]
fn replayed_messages_use_session_qos_and_clear_flags() {
    let mut queue = queue();
    queue.enqueue("a", b"1").unwrap();

    let mut publisher = RecordingPublisher::new();
    queue.send_queued(QoS::ExactlyOnce, &mut publisher).unwrap();

    let call = &publisher.calls()[0];
    assert_eq!(call.qos, QoS::ExactlyOnce);
    assert!(!call.retained);
    assert!(!call.dup);
    assert_eq!(call.id, 0);
    assert!(call.from_queue);
}

#[test]
fn delivered_messages_are_not_sent_twice() {
    let mut queue = queue();
    queue.enqueue("a", b"1").unwrap();
    queue.enqueue("b", b"2").unwrap();

    let mut publisher = RecordingPublisher::new();
    queue.send_queued(QoS::AtMostOnce, &mut publisher).unwrap();
    assert_eq!(publisher.len(), 2);

    let report = queue.send_queued(QoS::AtMostOnce, &mut publisher).unwrap();
    assert_eq!(report, ReplayReport::default());
    assert_eq!(publisher.len(), 2);
}

#[test]
fn failed_messages_are_retried_on_next_pass() {
    let mut queue = queue();
    queue.enqueue("flaky", b"x").unwrap();

    let mut offline = RecordingPublisher::always_failing();
    queue.send_queued(QoS::AtMostOnce, &mut offline).unwrap();
    queue.send_queued(QoS::AtMostOnce, &mut offline).unwrap();
    assert_eq!(offline.len(), 2);
    assert_eq!(queue.pending_count().unwrap(), 1);

    let mut online = RecordingPublisher::new();
    let report = queue.send_queued(QoS::AtMostOnce, &mut online).unwrap();
    assert_eq!(report.delivered, 1);
    assert_eq!(queue.pending_count().unwrap(), 0);
}

#[test]
fn replay_order_follows_storage_order() {
    let mut queue = queue();
    for i in 0..5 {
        queue.enqueue("ordered", i.to_string().as_bytes()).unwrap();
    }

    let mut publisher = RecordingPublisher::new();
    queue.send_queued(QoS::AtMostOnce, &mut publisher).unwrap();

    let payloads: Vec<_> = publisher.calls().iter().map(|c| c.payload.clone()).collect();
    assert_eq!(
        payloads,
        vec![b"0".to_vec(), b"1".to_vec(), b"2".to_vec(), b"3".to_vec(), b"4".to_vec()]
    );
}

#[test]
fn publish_or_enqueue_sends_when_connected() {
    let mut queue = queue();
    let mut publisher = RecordingPublisher::new();

    let outcome = queue
        .publish_or_enqueue("live", b"now", QoS::AtLeastOnce, &mut publisher)
        .unwrap();

    assert_eq!(outcome, Delivery::Sent);
    assert_eq!(queue.pending_count().unwrap(), 0);
    assert!(!publisher.calls()[0].from_queue);
}

#[test]
fn publish_or_enqueue_queues_when_offline() {
    let mut queue = queue();
    let mut offline = RecordingPublisher::always_failing();

    let outcome = queue
        .publish_or_enqueue("later", b"data", QoS::AtMostOnce, &mut offline)
        .unwrap();

    let Delivery::Queued(id) = outcome else {
        panic!("expected message to be queued");
    };
    let stored = queue.store().get_outgoing(&id).unwrap().unwrap();
    assert_eq!(stored.topic, "later");
    assert_eq!(stored.payload(), b"data");
}

#[test]
fn closure_publisher_drives_replay() {
    let mut queue = queue();
    queue.enqueue("keep", b"1").unwrap();
    queue.enqueue("send", b"2").unwrap();

    let mut publish = |topic: &str, _msg: &crate::PublishMessage<'_>| -> Result<(), crate::PublishError> {
        if topic == "keep" {
            Err(crate::PublishError::Rejected("not now".to_string()))
        } else {
            Ok(())
        }
    };
    let report = queue.send_queued(QoS::AtMostOnce, &mut publish).unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(report.failed, 1);
    let rows = queue.store().list_outgoing().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].topic.as_deref(), Some("keep"));
}
