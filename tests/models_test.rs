//! Deserialization tests for the feed wire formats.

use rust_decimal_macros::dec;

use magpie::MagpieError;
use magpie::models::TradeSide;
use magpie::models::book::OrderBookSnapshot;
use magpie::models::ticker;
use magpie::models::trade::TradeEvent;
use magpie::models::transaction;

#[test]
fn order_book_payload_deserializes() {
    let json = r#"{
        "timestamp": "1700000000",
        "asks": [["100.50", "1.25"], ["100.60", "0.75"]],
        "bids": [["100.40", "2.00"], ["100.30", "0.10"]]
    }"#;

    let book: OrderBookSnapshot = serde_json::from_str(json).unwrap();

    assert_eq!(book.asks.len(), 2);
    assert_eq!(book.asks[0].price(), dec!(100.50));
    assert_eq!(book.asks[0].amount(), dec!(1.25));
    assert_eq!(book.bids[1].price(), dec!(100.30));
}

#[test]
fn order_book_rejects_malformed_level() {
    let json = r#"{"asks": [["100.50"]], "bids": []}"#;
    assert!(serde_json::from_str::<OrderBookSnapshot>(json).is_err());
}

#[test]
fn trade_event_deserializes_from_numbers() {
    let json = r#"{"id": 987654321, "amount": 0.5, "price": 42152.0}"#;

    let trade: TradeEvent = serde_json::from_str(json).unwrap();

    assert_eq!(trade.id, 987654321);
    assert_eq!(trade.amount, dec!(0.5));
    assert_eq!(trade.price, dec!(42152.0));
}

#[test]
fn ticker_body_decodes_string_fields() {
    let json = r#"{
        "high": "42800.00",
        "low": "41500.00",
        "vwap": "42000.12",
        "volume": "1234.56789",
        "timestamp": "1700000000",
        "last": "42152.30"
    }"#;

    let snapshot = ticker::decode(json).unwrap();

    assert_eq!(snapshot.daily_high, dec!(42800.00));
    assert_eq!(snapshot.daily_low, dec!(41500.00));
    assert_eq!(snapshot.daily_vwap, dec!(42000.12));
    assert_eq!(snapshot.daily_volume, dec!(1234.56789));
    assert_eq!(snapshot.last_check_timestamp, 1_700_000_000);
}

#[test]
fn ticker_with_unparseable_timestamp_is_malformed() {
    let json = r#"{
        "high": "1", "low": "1", "vwap": "1", "volume": "1",
        "timestamp": "around noon"
    }"#;

    let err = ticker::decode(json).unwrap_err();
    assert!(matches!(err, MagpieError::Malformed(_)));
}

#[test]
fn ticker_with_missing_field_is_a_decode_error() {
    let json = r#"{"high": "1", "low": "1", "vwap": "1"}"#;

    let err = ticker::decode(json).unwrap_err();
    assert!(matches!(err, MagpieError::Decode(_)));
}

#[test]
fn transactions_list_decodes_sides_and_dates() {
    let json = r#"[
        {"tid": 3, "type": 1, "date": "1700000300"},
        {"tid": 2, "type": 0, "date": "1700000200"},
        {"tid": 1, "type": 1, "date": 1700000100}
    ]"#;

    let transactions = transaction::decode_list(json).unwrap();

    assert_eq!(transactions.len(), 3);
    assert_eq!(transactions[0].tid, 3);
    assert_eq!(transactions[0].side, TradeSide::Sell);
    assert_eq!(transactions[0].executed_at, 1_700_000_300);
    assert_eq!(transactions[1].side, TradeSide::Buy);
    // Integer-typed dates are tolerated alongside the usual strings.
    assert_eq!(transactions[2].executed_at, 1_700_000_100);
}

#[test]
fn transaction_with_unknown_type_code_is_rejected() {
    let json = r#"[{"tid": 1, "type": 2, "date": "1700000100"}]"#;
    assert!(transaction::decode_list(json).is_err());
}

#[test]
fn empty_transactions_list_is_valid() {
    let transactions = transaction::decode_list("[]").unwrap();
    assert!(transactions.is_empty());
}
