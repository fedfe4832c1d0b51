//! Decoding feed frames and storing the result.

use rust_decimal_macros::dec;

use tickerwheel::DecodeError;
use tickerwheel::feed::{FeedFrame, decode};
use tickerwheel::store::TickerStore;

fn apply(store: &TickerStore, raw: &str) -> Result<bool, DecodeError> {
    match decode(raw)? {
        FeedFrame::Ticker(snapshot) => {
            store.put(snapshot);
            Ok(true)
        }
        FeedFrame::Ack { .. } => Ok(false),
    }
}

#[test]
fn decoded_ticker_round_trips_through_store() {
    let store = TickerStore::new();
    let frames = [
        ("BTCUSDT", "50000.00", "1.2345", "10", "500000"),
        ("ETHUSDT", "2250.55000000", "-0.6800", "4567.80100000", "10280000.50"),
        ("DOGEUSDT", "0.0812", "12.0000", "987654321", "80199999.9"),
    ];

    for (s, c, p, v, q) in frames {
        let raw = format!(r#"{{"e":"24hrTicker","s":"{s}","c":"{c}","P":"{p}","v":"{v}","q":"{q}"}}"#);
        assert!(apply(&store, &raw).unwrap());

        let got = store.get(s).expect("snapshot stored");
        assert_eq!(got.symbol, s);
        assert_eq!(got.price.to_string(), c);
        assert_eq!(got.change_percent.to_string(), p);
        assert_eq!(got.base_volume.to_string(), v);
        assert_eq!(got.quote_volume.to_string(), q);
    }

    assert_eq!(store.len(), 3);
}

#[test]
fn ack_frames_never_touch_the_store() {
    let store = TickerStore::new();
    for raw in [
        r#"{"id":1,"result":null}"#,
        r#"{"result":null,"id":42}"#,
        r#"{"id":3,"error":{"code":1,"msg":"Invalid JSON"}}"#,
    ] {
        assert_eq!(apply(&store, raw), Ok(false), "frame: {raw}");
    }
    assert!(store.is_empty());
}

#[test]
fn malformed_input_is_reported_not_panicking() {
    for raw in ["", "{", "null", "42", "\"text\"", "[{\"s\":\"BTCUSDT\"}]", "{\"s\":}"] {
        assert!(
            matches!(decode(raw), Err(DecodeError::Malformed(_))),
            "frame: {raw:?}"
        );
    }
}

#[test]
fn incomplete_ticker_frame_is_rejected() {
    let store = TickerStore::new();
    let err = apply(&store, r#"{"s":"BTCUSDT","c":"1","P":"1","v":"1"}"#).unwrap_err();
    assert_eq!(err, DecodeError::IncompleteFields(vec!["q"]));
    assert!(store.is_empty());
}

#[test]
fn later_frame_replaces_earlier_one() {
    let store = TickerStore::new();
    apply(&store, r#"{"s":"BTCUSDT","c":"1","P":"1","v":"1","q":"1"}"#).unwrap();
    apply(&store, r#"{"s":"BTCUSDT","c":"2","P":"-1","v":"3","q":"4"}"#).unwrap();

    let got = store.get("BTC-USDT").unwrap();
    assert_eq!(got.price, dec!(2));
    assert_eq!(got.change_percent, dec!(-1.0000));
    assert_eq!(got.quote_volume, dec!(4));
}
