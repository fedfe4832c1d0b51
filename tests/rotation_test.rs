//! Cyclic rotation over the configured symbols.

use tickerwheel::rotation::{RotationHandle, SymbolRotator};

fn symbols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn returns_to_start_after_multiples_of_length() {
    for len in 1..=5usize {
        let list: Vec<String> = (0..len).map(|i| format!("SYM{i}-USDT")).collect();
        let mut rotator = SymbolRotator::new(list.clone(), 3).unwrap();

        for n in 1..=(3 * len) {
            let current = rotator.tick().to_string();
            assert_eq!(current, list[n % len]);
            assert_eq!(rotator.counter(), 0);
            if n % len == 0 {
                assert_eq!(current, list[0]);
            }
        }
    }
}

#[test]
fn one_cycle_visits_every_symbol_once_in_order() {
    let list = symbols(&["BTC-USDT", "ETH-USDT", "SOL-USDT", "ADA-USDT"]);
    let mut rotator = SymbolRotator::new(list.clone(), 2).unwrap();

    let mut seen = vec![rotator.current().to_string()];
    for _ in 1..list.len() {
        seen.push(rotator.tick().to_string());
    }
    assert_eq!(seen, list);
}

#[test]
fn handle_ticks_are_visible_to_readers() {
    let handle = RotationHandle::new(SymbolRotator::new(symbols(&["BTC-USDT", "ETH-USDT"]), 2).unwrap());
    let reader = handle.clone();

    assert_eq!(reader.current(), "BTC-USDT");
    handle.tick();
    assert_eq!(reader.current(), "ETH-USDT");
    handle.tick();
    assert_eq!(reader.current(), "BTC-USDT");
}
