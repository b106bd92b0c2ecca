mod common;

use rust_decimal_macros::dec;

use banking_engine::error::AppError;
use banking_engine::models::{PaymentMethod, TransactionKind};
use banking_engine::services::{LedgerEngine, PaymentInstruction, ReportingService};

#[tokio::test]
async fn test_deposit_credits_balance_and_appends_record() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(0)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let outcome = engine
        .deposit(&account.account_no, dec!(500), "cash deposit")
        .await
        .expect("Failed to deposit");

    assert_eq!(outcome.account.balance, dec!(500));
    assert_eq!(outcome.record.kind, TransactionKind::Deposit);
    assert_eq!(outcome.record.amount, dec!(500));
    assert_eq!(outcome.record.balance_after, dec!(500));
    assert!(outcome.account.initial_deposit_date.is_some());
    assert!(outcome.account.interest_start_date.is_some());
}

#[tokio::test]
async fn test_deposit_below_minimum_rejected() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(0)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let err = engine
        .deposit(&account.account_no, dec!(50), "too small")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let reporting = ReportingService::new(pool.clone());
    let account = reporting.account(&account.account_no).await.unwrap();
    assert_eq!(account.balance, dec!(0));
    assert!(account.initial_deposit_date.is_none());
}

#[tokio::test]
async fn test_first_deposit_date_is_set_exactly_once() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(0)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let first = engine
        .deposit(&account.account_no, dec!(500), "first")
        .await
        .unwrap();
    let second = engine
        .deposit(&account.account_no, dec!(300), "second")
        .await
        .unwrap();

    assert_eq!(second.account.balance, dec!(800));
    assert_eq!(
        second.account.initial_deposit_date,
        first.account.initial_deposit_date
    );
    assert_eq!(
        second.account.interest_start_date,
        first.account.interest_start_date
    );
}

#[tokio::test]
async fn test_withdraw_then_overdraw_fails_and_preserves_balance() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(1000)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let outcome = engine
        .withdraw(&account.account_no, dec!(700), "rent")
        .await
        .expect("Failed to withdraw");
    assert_eq!(outcome.account.balance, dec!(300));

    let err = engine
        .withdraw(&account.account_no, dec!(400), "groceries")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.to_string().contains("300"), "message was: {}", err);

    let reporting = ReportingService::new(pool.clone());
    let account = reporting.account(&account.account_no).await.unwrap();
    assert_eq!(account.balance, dec!(300));
}

#[tokio::test]
async fn test_withdraw_above_product_maximum_rejected() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(50000)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let err = engine
        .withdraw(&account.account_no, dec!(25000), "big")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(err.to_string().contains("20000"), "message was: {}", err);
}

#[tokio::test]
async fn test_transfer_conserves_total_and_records_both_sides() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let source = common::create_account(&pool, &product, dec!(1000)).await;
    let destination = common::create_account(&pool, &product, dec!(500)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let outcome = engine
        .transfer(&source.account_no, &destination.account_no, dec!(200), "rent")
        .await
        .expect("Failed to transfer");

    assert_eq!(outcome.source.balance, dec!(800));
    assert_eq!(outcome.destination.balance, dec!(700));
    assert_eq!(
        outcome.source.balance + outcome.destination.balance,
        dec!(1500)
    );

    assert_eq!(outcome.outgoing.kind, TransactionKind::Transfer);
    assert_eq!(outcome.outgoing.balance_after, dec!(800));
    assert_eq!(
        outcome.outgoing.source_account.as_deref(),
        Some(source.account_no.as_str())
    );
    assert_eq!(
        outcome.outgoing.destination_account.as_deref(),
        Some(destination.account_no.as_str())
    );
    assert_eq!(outcome.incoming.balance_after, dec!(700));
    assert_eq!(
        outcome.incoming.source_account.as_deref(),
        Some(source.account_no.as_str())
    );
}

#[tokio::test]
async fn test_transfer_to_missing_destination_rolls_back() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let source = common::create_account(&pool, &product, dec!(1000)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let err = engine
        .transfer(&source.account_no, "NO-SUCH-ACCOUNT", dec!(200), "oops")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let reporting = ReportingService::new(pool.clone());
    let account = reporting.account(&source.account_no).await.unwrap();
    assert_eq!(account.balance, dec!(1000));
    assert!(reporting
        .statement(&source.account_no, None)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_transfer_to_self_rejected() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let account = common::create_account(&pool, &product, dec!(1000)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let err = engine
        .transfer(&account.account_no, &account.account_no, dec!(200), "loop")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_pay_moves_money_and_records_each_side_once() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let payer = common::create_account(&pool, &product, dec!(500)).await;
    let recipient = common::create_account(&pool, &product, dec!(100)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let outcome = engine
        .pay(
            &payer.account_no,
            PaymentInstruction {
                recipient_account: recipient.account_no.clone(),
                recipient_name: "Acme Utilities".to_string(),
                payment_method: PaymentMethod::BankAccount,
                amount: dec!(200),
                description: "electricity bill".to_string(),
            },
        )
        .await
        .expect("Failed to pay");

    assert_eq!(outcome.payer.balance, dec!(300));
    assert_eq!(outcome.recipient.balance, dec!(300));
    assert_eq!(outcome.sent.kind, TransactionKind::Payment);
    assert_eq!(
        outcome.sent.recipient_account.as_deref(),
        Some(recipient.account_no.as_str())
    );
    assert_eq!(outcome.sent.payment_method, Some(PaymentMethod::BankAccount));

    let reporting = ReportingService::new(pool.clone());
    let recipient_statement = reporting
        .statement(&recipient.account_no, None)
        .await
        .unwrap();
    assert_eq!(recipient_statement.len(), 1);
    assert_eq!(recipient_statement[0].kind, TransactionKind::Payment);
    assert!(recipient_statement[0]
        .description
        .contains(&payer.account_no));

    let payer_statement = reporting.statement(&payer.account_no, None).await.unwrap();
    assert_eq!(payer_statement.len(), 1);
}

#[tokio::test]
async fn test_pay_to_own_account_rejected() {
    let Some(pool) = common::setup_test_db().await else { return };
    let product = common::create_product(&pool, dec!(20000)).await;
    let payer = common::create_account(&pool, &product, dec!(500)).await;
    let engine = LedgerEngine::new(pool.clone(), common::test_rules());

    let err = engine
        .pay(
            &payer.account_no,
            PaymentInstruction {
                recipient_account: payer.account_no.clone(),
                recipient_name: "Me".to_string(),
                payment_method: PaymentMethod::CreditCard,
                amount: dec!(200),
                description: "self".to_string(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
