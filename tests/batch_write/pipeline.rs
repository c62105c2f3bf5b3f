//! End-to-end pipeline scenarios against the in-memory stores.

use std::sync::Arc;

use txn_store::mapping::{canonical_text, inflate_event};
use txn_store::{BatchWriteItem, BatchWriteService, ResponseType};

use crate::support::{Harness, UnreachableStore, CONTRACT};

#[tokio::test]
async fn stores_record_with_derived_keys() {
    let h = Harness::new();
    let item = h.item(42);
    let response = h.service().put_transactions(vec![item.clone()]).await;

    assert_eq!(response.response_type, ResponseType::AllItemsProcessedSuccessfully);
    assert_eq!(response.status_code(), 200);

    let stored = h
        .transactions
        .get(&format!("{CONTRACT}~POSTED"), "2024-03-01~P0000000042_")
        .unwrap()
        .unwrap();
    assert_eq!(stored.contract_id, CONTRACT);
    assert_eq!(stored.sort_key, "000001");
    assert_eq!(stored.command_key, "cmd-42~core-banking");
    assert_eq!(
        inflate_event(&stored.event).unwrap(),
        canonical_text(item.event.as_ref())
    );
}

#[tokio::test]
async fn resubmission_conflicts_with_first_write() {
    let h = Harness::new();
    let service = h.service();

    let first = service.put_transactions(vec![h.item(1)]).await;
    assert_eq!(first.response_type, ResponseType::AllItemsProcessedSuccessfully);
    let first_record = h.transactions.records().unwrap().remove(0);

    let second = service.put_transactions(vec![h.item(1)]).await;
    assert_eq!(second.response_type, ResponseType::AllItemsFailedConditionalCheck);
    assert_eq!(second.status_code(), 409);

    let failed = second.failed_items.unwrap();
    assert_eq!(failed[0].error_code, "failed_conditional_check");
    assert_eq!(failed[0].existing_item.as_ref(), Some(&first_record));
    assert_eq!(h.transactions.len().unwrap(), 1);
}

#[tokio::test]
async fn missing_category_everywhere_fails_validation() {
    let h = Harness::new();
    let items: Vec<BatchWriteItem> = (1..=3)
        .map(|n| BatchWriteItem {
            transaction_category: None,
            ..h.item(n)
        })
        .collect();

    let response = h.service().put_transactions(items).await;
    assert_eq!(response.response_type, ResponseType::AllItemsFailedValidation);
    assert_eq!(response.status_code(), 400);
    for failed in response.failed_items.unwrap() {
        assert_eq!(failed.error_code, "failed_validation");
        assert_eq!(
            failed.reason.as_deref(),
            Some("transactionCategory field is required")
        );
    }
    assert!(h.transactions.is_empty().unwrap());
}

#[tokio::test]
async fn one_success_two_failures_is_partial() {
    let h = Harness::new();
    let items = vec![
        BatchWriteItem {
            financial_core_command_id: None,
            ..h.item(1)
        },
        h.item(2),
        BatchWriteItem {
            transaction_effective_date: None,
            ..h.item(3)
        },
    ];

    let response = h.service().put_transactions(items).await;
    assert_eq!(response.response_type, ResponseType::PartialItemsProcessedSuccessfully);
    assert_eq!(response.status_code(), 207);
    assert_eq!(response.total_sent, 3);
    assert_eq!(response.total_written, 1);
    assert_eq!(response.failed_count, 2);

    let reasons: Vec<_> = response
        .failed_items
        .unwrap()
        .into_iter()
        .map(|f| f.reason.unwrap())
        .collect();
    assert_eq!(
        reasons,
        [
            "financialCoreCommandId field is required",
            "transactionEffectiveDate field is required"
        ]
    );
}

#[tokio::test]
async fn malformed_reference_is_a_validation_failure() {
    let h = Harness::new();
    let items = vec![
        BatchWriteItem {
            account_reference_id: Some(h.decryptor.seal("accountId=abc~~sortId999").unwrap()),
            ..h.item(1)
        },
        BatchWriteItem {
            account_reference_id: Some(h.decryptor.seal("accountId=abc").unwrap()),
            ..h.item(2)
        },
        BatchWriteItem {
            account_reference_id: Some("bm90IGEgdG9rZW4=".into()),
            ..h.item(3)
        },
    ];

    let response = h.service().put_transactions(items).await;
    assert_eq!(response.response_type, ResponseType::AllItemsFailedValidation);
    let reasons: Vec<String> = response
        .failed_items
        .unwrap()
        .into_iter()
        .map(|f| f.reason.unwrap())
        .collect();
    assert!(reasons[0].starts_with("accountReferenceId cannot be decrypted"));
    assert!(!reasons[0].contains("abc"));
    assert_eq!(reasons[1], "Decrypted accountId or sortId cannot be empty");
    assert!(reasons[2].starts_with("accountReferenceId cannot be decrypted"));
}

#[tokio::test]
async fn provision_check_gates_writes() {
    let h = Harness::new();
    let service = h.checked_service();

    let response = service.put_transactions(vec![h.item(1)]).await;
    assert_eq!(response.response_type, ResponseType::AllItemsFailedValidation);
    assert_eq!(
        response.failed_items.unwrap()[0].reason.as_deref(),
        Some("No provision record found in account store")
    );
    assert!(h.transactions.is_empty().unwrap());

    h.provisions.provision(CONTRACT).unwrap();
    let response = service.put_transactions(vec![h.item(1)]).await;
    assert_eq!(response.response_type, ResponseType::AllItemsProcessedSuccessfully);
}

#[tokio::test]
async fn account_store_outage_is_a_get_failure() {
    let h = Harness::new();
    let service = h.service().with_provision_check(Arc::new(UnreachableStore));

    let response = service.put_transactions(vec![h.item(1), h.item(2)]).await;
    assert_eq!(response.response_type, ResponseType::AllItemsFailedPutItem);
    assert_eq!(response.status_code(), 500);
    let failed = response.failed_items.unwrap();
    assert_eq!(failed[0].error_code, "failed_get_item");
    assert_eq!(
        failed[0].reason.as_deref(),
        Some("Error getting item from account store. ErrorMessage: service unavailable")
    );
}

#[tokio::test]
async fn transaction_store_outage_is_a_put_failure() {
    let h = Harness::new();
    let service = BatchWriteService::new(Arc::new(h.decryptor.clone()), Arc::new(UnreachableStore));

    let response = service.put_transactions(vec![h.item(5)]).await;
    assert_eq!(response.response_type, ResponseType::AllItemsFailedPutItem);
    let failed = response.failed_items.unwrap();
    assert_eq!(failed[0].error_code, "failed_put_item");
    assert!(failed[0]
        .reason
        .as_deref()
        .unwrap()
        .ends_with("OrderKey: 2024-03-01~P0000000005_, ErrorMessage: service unavailable"));
}

#[tokio::test]
async fn mixed_failures_without_success_are_unknown() {
    let h = Harness::new();
    let service = h.service();
    service.put_transactions(vec![h.item(1)]).await;

    let items = vec![
        h.item(1),
        BatchWriteItem {
            transaction_category: None,
            ..h.item(2)
        },
    ];
    let response = service.put_transactions(items).await;
    assert_eq!(response.response_type, ResponseType::UnknownErrors);
    assert_eq!(response.status_code(), 500);
    assert_eq!(response.failed_count, 2);
}

#[tokio::test]
async fn negative_sequence_numbers_are_stored_in_order() {
    let h = Harness::new();
    let items = [3, -1, 0, -5].into_iter().map(|n| h.item(n)).collect();
    let response = h.service().with_max_concurrency(2).put_transactions(items).await;
    assert_eq!(response.total_written, 4);

    let order: Vec<i32> = h
        .transactions
        .records()
        .unwrap()
        .into_iter()
        .map(|r| r.posted_transaction_sequence_number)
        .collect();
    assert_eq!(order, [-5, -1, 0, 3]);
}
