use yt_card_filter::normalize::normalize;
use yt_card_filter::{parse_view_count, time_to_seconds};

#[test]
fn view_counts_with_multipliers() {
    assert_eq!(parse_view_count("1.2K"), 1_200);
    assert_eq!(parse_view_count("1.2K views"), 1_200);
    assert_eq!(parse_view_count("5M"), 5_000_000);
    assert_eq!(parse_view_count("5M views"), 5_000_000);
    assert_eq!(parse_view_count("1B views"), 1_000_000_000);
    assert_eq!(parse_view_count("12k"), 12_000);
}

#[test]
fn view_counts_in_indian_notation() {
    assert_eq!(parse_view_count("2 crore"), 20_000_000);
    assert_eq!(parse_view_count("3 lakh"), 300_000);
    assert_eq!(parse_view_count("2.7 crore views"), 27_000_000);
    assert_eq!(parse_view_count("12,34,567 views"), 1_234_567);
}

#[test]
fn view_counts_in_other_locales() {
    assert_eq!(parse_view_count("1,2 тыс. просмотров"), 1_200);
    assert_eq!(parse_view_count("15 млн просмотров"), 15_000_000);
    assert_eq!(parse_view_count("1.234.567 visualizações"), 1_234_567);
    assert_eq!(parse_view_count("١٢٣ مشاهدة"), 123);
    assert_eq!(parse_view_count("12\u{00a0}K views"), 12_000);
}

#[test]
fn view_counts_without_numbers() {
    assert_eq!(parse_view_count(""), 0);
    assert_eq!(parse_view_count("No views"), 0);
    assert_eq!(parse_view_count("K views"), 0);
}

#[test]
fn minutes_are_not_millions() {
    assert_eq!(parse_view_count("5 minutes"), 5);
    assert_eq!(parse_view_count("3 months ago"), 3);
}

#[test]
fn durations() {
    assert_eq!(time_to_seconds("12:34"), 754);
    assert_eq!(time_to_seconds("1:02:45"), 3765);
    assert_eq!(time_to_seconds("3:12"), 192);
    assert_eq!(time_to_seconds("10:00"), 600);
    assert_eq!(time_to_seconds("45"), 45);
}

#[test]
fn durations_without_digits() {
    assert_eq!(time_to_seconds(""), 0);
    assert_eq!(time_to_seconds("abc"), 0);
    assert_eq!(time_to_seconds("LIVE"), 0);
}

#[test]
fn durations_in_arabic_digits() {
    assert_eq!(time_to_seconds("٣:١٢"), 192);
}

#[test]
fn normalize_is_idempotent() {
    for raw in ["1\u{00a0}234", "  ٤٥٬٢٣١ VIEWS ", "1,2\u{202f}тыс.", "plain"] {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "input {raw:?}");
    }
}
