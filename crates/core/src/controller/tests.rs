use std::time::Duration;

use symptom_chat_service::{Condition, QueryReply};
use symptom_chat_test_service::{PresetReply, TestQueryService};
use tokio::time::timeout;

use crate::message::{MessageContent, MessageKind, Sender};
use crate::{
    ConditionEntry, ConversationBuilder, ConversationController, Segment,
    Snapshot,
};

const GREETING: &str = "Hi, how are you feeling?";
const APOLOGY: &str = "Sorry, please try again.";

fn controller_for(service: &TestQueryService) -> ConversationController {
    ConversationBuilder::with_query_service(service.clone())
        .with_greeting(GREETING)
        .with_apology(APOLOGY)
        .build()
}

/// Waits for the outstanding query, if any, to settle.
async fn settled(controller: &ConversationController) -> Snapshot {
    // Make sure every command sent so far has been handled first.
    controller.snapshot().await.unwrap();
    let mut rx = controller.subscribe();
    timeout(Duration::from_secs(30), rx.wait_for(|s| !s.loading))
        .await
        .unwrap()
        .unwrap()
        .clone()
}

fn tail(snapshot: &Snapshot, n: usize) -> Vec<(Sender, MessageKind, String)> {
    let messages = &snapshot.messages;
    messages[messages.len().saturating_sub(n)..]
        .iter()
        .map(|m| (m.sender(), m.kind(), m.text().into_owned()))
        .collect()
}

fn count_kind(snapshot: &Snapshot, kind: MessageKind) -> usize {
    snapshot.messages.iter().filter(|m| m.kind() == kind).count()
}

#[tokio::test]
async fn test_starts_with_greeting() {
    let service = TestQueryService::default();
    let controller = controller_for(&service);

    let snapshot = controller.subscribe().borrow().clone();
    assert_eq!(
        tail(&snapshot, 10),
        [(Sender::Assistant, MessageKind::Plain, GREETING.to_owned())]
    );
    assert!(!snapshot.loading);
    assert!(snapshot.pending_input.is_empty());
}

#[tokio::test]
async fn test_liver_scenario() {
    let mut service = TestQueryService::default();
    service.add_reply(
        QueryReply::text_only("Possible liver involvement.")
            .with_conditions([Condition::new("Jaundice", "Yellowing of skin")]),
    );
    let controller = controller_for(&service);

    controller
        .update_input("itching,fatigue,yellowish skin")
        .unwrap();
    controller.submit().unwrap();
    let snapshot = settled(&controller).await;

    assert_eq!(
        tail(&snapshot, 3),
        [
            (
                Sender::User,
                MessageKind::Plain,
                "itching,fatigue,yellowish skin".to_owned()
            ),
            (
                Sender::Assistant,
                MessageKind::Plain,
                "Possible liver involvement.".to_owned()
            ),
            (
                Sender::Assistant,
                MessageKind::Conditions,
                "Possible Conditions\n1. Jaundice — Yellowing of skin"
                    .to_owned()
            ),
        ]
    );
    let last = snapshot.messages.last().unwrap();
    assert_eq!(
        last.content(),
        &MessageContent::Conditions(vec![
            Segment::Title,
            Segment::Entry(ConditionEntry {
                rank: 1,
                condition: "Jaundice".to_owned(),
                text: "Yellowing of skin".to_owned(),
            }),
        ])
    );
    assert_eq!(
        service.received_queries(),
        ["itching,fatigue,yellowish skin"]
    );
}

#[tokio::test]
async fn test_failure_becomes_apology() {
    let mut service = TestQueryService::default();
    service.add_preset(PresetReply::transport_failure("connection refused"));
    let controller = controller_for(&service);

    controller.update_input("test").unwrap();
    controller.submit().unwrap();
    let snapshot = settled(&controller).await;

    assert_eq!(
        tail(&snapshot, 2),
        [
            (Sender::User, MessageKind::Plain, "test".to_owned()),
            (Sender::Assistant, MessageKind::Error, APOLOGY.to_owned()),
        ]
    );
    assert!(!snapshot.loading);
    assert_eq!(count_kind(&snapshot, MessageKind::Typing), 0);
}

#[tokio::test]
async fn test_blank_input_is_ignored() {
    let service = TestQueryService::default();
    let controller = controller_for(&service);

    for input in ["", "   ", "\n\t"] {
        controller.update_input(input).unwrap();
        controller.submit().unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(snapshot.messages.len(), 1);
        assert!(!snapshot.loading);
    }
    assert!(service.received_queries().is_empty());
}

#[tokio::test]
async fn test_immediate_echo() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("Rest well."));
    let latch = service.hold_replies();
    let controller = controller_for(&service);

    controller.update_input("headache, fever").unwrap();
    controller.submit().unwrap();
    let snapshot = controller.snapshot().await.unwrap();

    assert_eq!(
        tail(&snapshot, 2),
        [
            (Sender::User, MessageKind::Plain, "headache, fever".to_owned()),
            (Sender::Assistant, MessageKind::Typing, String::new()),
        ]
    );
    assert!(snapshot.loading);
    assert!(snapshot.pending_input.is_empty());

    // Typing is still possible while the query is outstanding.
    controller.update_input("and a sore throat").unwrap();
    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.pending_input, "and a sore throat");
    assert!(snapshot.loading);

    latch.release();
    let snapshot = settled(&controller).await;
    assert_eq!(count_kind(&snapshot, MessageKind::Typing), 0);
    assert_eq!(snapshot.pending_input, "and a sore throat");
}

#[tokio::test]
async fn test_submit_is_trimmed() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("ok"));
    let controller = controller_for(&service);

    controller.update_input("  cough \n").unwrap();
    controller.submit().unwrap();
    let snapshot = settled(&controller).await;

    assert_eq!(service.received_queries(), ["cough"]);
    assert_eq!(snapshot.messages[1].text(), "cough");
}

#[tokio::test]
async fn test_one_query_at_a_time() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("first"));
    service.add_reply(QueryReply::text_only("second"));
    let latch = service.hold_replies();
    let controller = controller_for(&service);

    controller.update_input("a").unwrap();
    controller.submit().unwrap();
    controller.update_input("b").unwrap();
    controller.submit().unwrap();
    for i in 0..5 {
        controller.update_input(format!("again {i}")).unwrap();
        controller.submit().unwrap();
    }

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(
        tail(&snapshot, 3),
        [
            (Sender::Assistant, MessageKind::Plain, GREETING.to_owned()),
            (Sender::User, MessageKind::Plain, "a".to_owned()),
            (Sender::Assistant, MessageKind::Typing, String::new()),
        ]
    );
    assert_eq!(count_kind(&snapshot, MessageKind::Typing), 1);
    assert_eq!(snapshot.pending_input, "again 4");

    latch.release();
    let snapshot = settled(&controller).await;
    assert_eq!(snapshot.messages.len(), 3);
    assert_eq!(service.received_queries(), ["a"]);
    assert_eq!(service.peak_in_flight(), 1);

    // Once settled, the next submission goes through.
    controller.submit().unwrap();
    latch.release();
    let snapshot = settled(&controller).await;
    assert_eq!(service.received_queries(), ["a", "again 4"]);
    assert_eq!(
        tail(&snapshot, 1),
        [(Sender::Assistant, MessageKind::Plain, "second".to_owned())]
    );
}

#[tokio::test]
async fn test_empty_conditions_produce_one_message() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("Drink water."));
    service.add_reply(QueryReply::text_only("Sleep more.").with_conditions(Vec::new()));
    let controller = controller_for(&service);

    for input in ["thirst", "tired"] {
        let before = controller.snapshot().await.unwrap().messages.len();
        controller.update_input(input).unwrap();
        controller.submit().unwrap();
        let snapshot = settled(&controller).await;

        // The user message plus exactly one reply.
        assert_eq!(snapshot.messages.len(), before + 2);
        assert_eq!(count_kind(&snapshot, MessageKind::Conditions), 0);
    }
}

#[tokio::test]
async fn test_conditions_keep_rank_order() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("Several options.").with_conditions([
        Condition::new("A", "x"),
        Condition::new("B", "y"),
        Condition::new("C", "z"),
    ]));
    let controller = controller_for(&service);

    controller.update_input("something").unwrap();
    controller.submit().unwrap();
    let snapshot = settled(&controller).await;

    let MessageContent::Conditions(segments) =
        snapshot.messages.last().unwrap().content()
    else {
        panic!("expected a conditions message");
    };
    let entries: Vec<_> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Entry(entry) => {
                Some((entry.rank, entry.condition.as_str()))
            }
            Segment::Title => None,
        })
        .collect();
    assert_eq!(entries, [(1, "A"), (2, "B"), (3, "C")]);
}

#[tokio::test]
async fn test_clear_resets_to_greeting() {
    let mut service = TestQueryService::default();
    service.add_reply(
        QueryReply::text_only("ok").with_conditions([Condition::new("Flu", "")]),
    );
    service.add_preset(PresetReply::Malformed);
    let controller = controller_for(&service);

    for input in ["fever", "chills"] {
        controller.update_input(input).unwrap();
        controller.submit().unwrap();
        settled(&controller).await;
    }
    controller.update_input("draft").unwrap();
    assert!(controller.snapshot().await.unwrap().messages.len() > 1);

    for _ in 0..2 {
        controller.clear().unwrap();
        let snapshot = controller.snapshot().await.unwrap();
        assert_eq!(
            tail(&snapshot, 10),
            [(Sender::Assistant, MessageKind::Plain, GREETING.to_owned())]
        );
        assert!(snapshot.pending_input.is_empty());
    }
}

#[tokio::test]
async fn test_clear_discards_outstanding_reply() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("stale"));
    service.add_reply(QueryReply::text_only("fresh"));
    let latch = service.hold_replies();
    let controller = controller_for(&service);

    controller.update_input("a").unwrap();
    controller.submit().unwrap();
    controller.clear().unwrap();

    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.messages.len(), 1);
    // The query is still outstanding and keeps blocking submission.
    assert!(snapshot.loading);
    controller.update_input("b").unwrap();
    controller.submit().unwrap();

    latch.release();
    let snapshot = settled(&controller).await;
    assert_eq!(
        tail(&snapshot, 10),
        [(Sender::Assistant, MessageKind::Plain, GREETING.to_owned())]
    );
    assert_eq!(snapshot.pending_input, "b");
    assert_eq!(service.received_queries(), ["a"]);

    controller.submit().unwrap();
    latch.release();
    let snapshot = settled(&controller).await;
    assert_eq!(
        tail(&snapshot, 2),
        [
            (Sender::User, MessageKind::Plain, "b".to_owned()),
            (Sender::Assistant, MessageKind::Plain, "fresh".to_owned()),
        ]
    );
}

#[tokio::test]
async fn test_select_suggestion() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("ok"));
    let controller = ConversationBuilder::with_query_service(service.clone())
        .with_suggestions(["sneezing, runny nose"])
        .build();

    assert_eq!(controller.suggestions(), ["sneezing, runny nose"]);
    controller
        .select_suggestion(controller.suggestions()[0].clone())
        .unwrap();
    let snapshot = controller.snapshot().await.unwrap();
    assert_eq!(snapshot.pending_input, "sneezing, runny nose");
    assert_eq!(snapshot.messages.len(), 1);
    assert!(service.received_queries().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_becomes_apology() {
    let mut service = TestQueryService::default();
    service.add_reply(QueryReply::text_only("too late"));
    service.set_delay(Duration::from_secs(600));
    let controller = ConversationBuilder::with_query_service(service)
        .with_apology(APOLOGY)
        .with_timeout(Duration::from_secs(5))
        .build();

    controller.update_input("cough").unwrap();
    controller.submit().unwrap();
    let snapshot = settled(&controller).await;

    assert_eq!(
        tail(&snapshot, 1),
        [(Sender::Assistant, MessageKind::Error, APOLOGY.to_owned())]
    );
}
