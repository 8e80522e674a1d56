use proptest::prelude::*;
use schemer::{Interpreter, Value, read};

// ============================================================================
// Strategies
// ============================================================================

/// Integers small enough that every fold stays exact in f64
fn small_int() -> impl Strategy<Value = i32> {
    -10_000i32..10_000i32
}

fn int_list(max_len: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::vec(small_int(), 1..max_len)
}

fn source_list(items: &[i32]) -> String {
    let body: Vec<String> = items.iter().map(|n| n.to_string()).collect();
    body.join(" ")
}

fn numbers(items: &[i32]) -> Value {
    Value::list(items.iter().map(|n| Value::Number(f64::from(*n))).collect())
}

fn prelude() -> Interpreter {
    Interpreter::with_prelude().expect("bootstrap library loads")
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn sum_matches_host_fold(items in int_list(20)) {
        let interp = Interpreter::new();
        let result = interp.parse(&format!("(+ {})", source_list(&items))).unwrap();
        let expected: f64 = items.iter().map(|n| f64::from(*n)).sum();
        prop_assert_eq!(result, Value::Number(expected));
    }

    #[test]
    fn difference_folds_from_first_argument(items in int_list(20)) {
        let interp = Interpreter::new();
        let result = interp.parse(&format!("(- {})", source_list(&items))).unwrap();
        let mut rest = items.iter().map(|n| f64::from(*n));
        let first = rest.next().unwrap();
        let expected = rest.fold(first, |acc, n| acc - n);
        prop_assert_eq!(result, Value::Number(expected));
    }

    #[test]
    fn printed_numbers_read_back(n in any::<f64>().prop_filter("finite", |f| f.is_finite())) {
        let printed = Value::Number(n).to_string();
        prop_assert_eq!(read(&printed).unwrap(), Value::Number(n));
    }

    #[test]
    fn reverse_is_an_involution(items in prop::collection::vec(small_int(), 0..15)) {
        let interp = prelude();
        let src = format!("(reverse (reverse '({})))", source_list(&items));
        prop_assert_eq!(interp.parse(&src).unwrap(), numbers(&items));
    }

    #[test]
    fn unique_is_idempotent_and_order_preserving(
        items in prop::collection::vec(0i32..5, 0..15)
    ) {
        let interp = prelude();
        let once = interp.parse(&format!("(unique '({}))", source_list(&items))).unwrap();
        let twice = interp
            .parse(&format!("(unique (unique '({})))", source_list(&items)))
            .unwrap();
        prop_assert_eq!(&once, &twice);

        let mut seen = Vec::new();
        for n in &items {
            if !seen.contains(n) {
                seen.push(*n);
            }
        }
        prop_assert_eq!(once, numbers(&seen));
    }

    #[test]
    fn length_counts_elements(items in prop::collection::vec(small_int(), 0..20)) {
        let interp = prelude();
        let result = interp.parse(&format!("(length '({}))", source_list(&items))).unwrap();
        prop_assert_eq!(result, Value::Number(items.len() as f64));
    }
}
