//! Property-based tests for payload encoding, key ordering and batch accounting.

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use txn_store::mapping::{canonical_text, compress_event, decode_sequence, encode_sequence, inflate_event};
use txn_store::pipeline::aggregate;
use txn_store::{BatchWriteItem, ProcessingContext, ProcessingStatus};

fn json_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 _.-]{0,16}".prop_map(Value::String),
    ]
}

fn json_value() -> impl Strategy<Value = Value> {
    json_leaf().prop_recursive(3, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn status() -> impl Strategy<Value = ProcessingStatus> {
    prop_oneof![
        Just(ProcessingStatus::SuccessfullyPutItem),
        Just(ProcessingStatus::FailedValidation),
        Just(ProcessingStatus::FailedGetItem),
        Just(ProcessingStatus::FailedConditionalCheck),
        Just(ProcessingStatus::FailedPutItem),
    ]
}

fn context(status: ProcessingStatus) -> ProcessingContext {
    let ctx = ProcessingContext::new(BatchWriteItem::default());
    match status {
        ProcessingStatus::SuccessfullyPutItem => ctx.succeed(),
        ProcessingStatus::FailedConditionalCheck => ctx.conflict("conflict", None),
        other => ctx.fail(other, "failed"),
    }
}

proptest! {
    #[test]
    fn inflate_inverts_compress(event in json_value()) {
        let encoded = compress_event(Some(&event)).unwrap();
        prop_assert_eq!(inflate_event(&encoded).unwrap(), canonical_text(Some(&event)));
    }

    #[test]
    fn sequence_encoding_preserves_order(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(a.cmp(&b), encode_sequence(a).cmp(&encode_sequence(b)));
    }

    #[test]
    fn sequence_encoding_round_trips(n in any::<i32>()) {
        prop_assert_eq!(decode_sequence(&encode_sequence(n)), Some(n));
    }

    #[test]
    fn counts_always_balance(statuses in prop::collection::vec(status(), 0..40)) {
        let contexts: Vec<ProcessingContext> = statuses.iter().copied().map(context).collect();
        let response = aggregate(&contexts);

        prop_assert_eq!(response.total_sent, statuses.len());
        prop_assert_eq!(response.total_sent, response.total_written + response.failed_count);
        prop_assert_eq!(
            response.failed_items.map(|f| f.len()).unwrap_or(0),
            response.failed_count
        );
    }
}
