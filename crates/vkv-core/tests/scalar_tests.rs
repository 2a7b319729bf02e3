use chrono::{Duration, NaiveDate, NaiveTime};
use half::f16;
use uuid::Uuid;
use vkv_core::scalar::parse_bool;
use vkv_core::{parse_all, Scalar};

/// Assert that a value's rendering is read back as the same value.
fn assert_stable(token: &str) {
    let parsed = parse_all(token);
    let rendered = parsed.to_string();
    assert_eq!(
        parse_all(&rendered),
        parsed,
        "cascade not stable:\n  token:    {token}\n  rendered: {rendered}"
    );
}

// ============================================================================
// Boolean stage
// ============================================================================

#[test]
fn bool_tokens_case_insensitive() {
    for token in ["t", "TRUE", "True", "1", "y", "YES"] {
        assert_eq!(parse_all(token), Scalar::Bool(true), "token {token}");
    }
    for token in ["f", "False", "0", "N", "no"] {
        assert_eq!(parse_all(token), Scalar::Bool(false), "token {token}");
    }
}

#[test]
fn bool_stage_wins_over_integers() {
    assert_eq!(parse_all("1"), Scalar::Bool(true));
    assert_eq!(parse_all("0"), Scalar::Bool(false));
    assert_eq!(parse_all("2"), Scalar::I8(2));
}

#[test]
fn parse_bool_rejects_other_words() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// ============================================================================
// Integer stages: narrowest width first
// ============================================================================

#[test]
fn integers_take_narrowest_width() {
    assert_eq!(parse_all("123"), Scalar::I8(123));
    assert_eq!(parse_all("-128"), Scalar::I8(-128));
    assert_eq!(parse_all("200"), Scalar::U8(200));
    assert_eq!(parse_all("-200"), Scalar::I16(-200));
    assert_eq!(parse_all("40000"), Scalar::U16(40000));
    assert_eq!(parse_all("-40000"), Scalar::I32(-40000));
    assert_eq!(parse_all("3000000000"), Scalar::U32(3_000_000_000));
    assert_eq!(parse_all("-3000000000"), Scalar::I64(-3_000_000_000));
    assert_eq!(
        parse_all("10000000000000000000"),
        Scalar::U64(10_000_000_000_000_000_000)
    );
    assert_eq!(
        parse_all("-10000000000000000000"),
        Scalar::I128(-10_000_000_000_000_000_000)
    );
    assert_eq!(
        parse_all("200000000000000000000000000000000000000"),
        Scalar::U128(200_000_000_000_000_000_000_000_000_000_000_000_000)
    );
}

#[test]
fn integer_is_not_a_string_or_float() {
    assert!(matches!(parse_all("123"), Scalar::I8(_)));
    assert!(matches!(parse_all("730"), Scalar::I16(_)));
}

// ============================================================================
// Float stages
// ============================================================================

#[test]
fn float_takes_narrowest_width_that_holds_it() {
    assert_eq!(parse_all("0.5"), Scalar::F16(f16::from_f32(0.5)));
    assert_eq!(parse_all("1.23"), Scalar::F32(1.23));
    assert_eq!(parse_all("0.1234567891234"), Scalar::F64(0.1234567891234));
}

#[test]
fn float_with_exponent() {
    assert_eq!(parse_all("1e5"), Scalar::F32(100000.0));
    assert_eq!(parse_all("1e300"), Scalar::F64(1e300));
}

// ============================================================================
// Char, dates, GUID, times
// ============================================================================

#[test]
fn single_character() {
    assert_eq!(parse_all("x"), Scalar::Char('x'));
    assert_eq!(parse_all("é"), Scalar::Char('é'));
}

#[test]
fn date_only() {
    let expected = Scalar::Date(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    assert_eq!(parse_all("2024-03-01"), expected);
    assert_eq!(parse_all("2024/03/01"), expected);
}

#[test]
fn date_time_with_either_separator() {
    let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap();
    assert_eq!(parse_all("2024-03-01T12:30:45"), Scalar::DateTime(expected));
    assert_eq!(parse_all("2024-03-01 12:30:45"), Scalar::DateTime(expected));
}

#[test]
fn date_time_with_offset() {
    match parse_all("2024-03-01T12:30:00+02:00") {
        Scalar::DateTimeOffset(value) => {
            assert_eq!(value.offset().local_minus_utc(), 2 * 3600);
            assert_eq!(value.to_rfc3339(), "2024-03-01T12:30:00+02:00");
        }
        other => panic!("expected date-time with offset, got {other:?}"),
    }
}

#[test]
fn guid() {
    let text = "0f8fad5b-d9cb-469f-a165-70867728950e";
    assert_eq!(parse_all(text), Scalar::Guid(Uuid::parse_str(text).unwrap()));
}

#[test]
fn time_of_day() {
    assert_eq!(
        parse_all("12:30:45"),
        Scalar::Time(NaiveTime::from_hms_opt(12, 30, 45).unwrap())
    );
    assert_eq!(
        parse_all("08:15"),
        Scalar::Time(NaiveTime::from_hms_opt(8, 15, 0).unwrap())
    );
}

#[test]
fn time_span_with_days() {
    let expected = Duration::days(1) + Duration::hours(2) + Duration::minutes(3) + Duration::seconds(4);
    assert_eq!(parse_all("1.02:03:04"), Scalar::TimeSpan(expected));
}

#[test]
fn time_span_negative() {
    assert_eq!(
        parse_all("-00:30:00"),
        Scalar::TimeSpan(Duration::minutes(-30))
    );
}

// ============================================================================
// String fallback
// ============================================================================

#[test]
fn unmatched_text_stays_string() {
    assert_eq!(parse_all("hello world"), Scalar::String("hello world".into()));
    assert_eq!(parse_all("C:\\Games"), Scalar::String("C:\\Games".into()));
    assert_eq!(parse_all(""), Scalar::String(String::new()));
}

#[test]
fn as_str_only_for_strings() {
    assert_eq!(parse_all("hello").as_str(), Some("hello"));
    assert_eq!(parse_all("42").as_str(), None);
}

// ============================================================================
// Rendering reads back as the same value
// ============================================================================

#[test]
fn rendering_is_stable_through_the_cascade() {
    for token in [
        "yes",
        "123",
        "-200",
        "3000000000",
        "0.5",
        "1.23",
        "0.1",
        "0.1234567891234",
        "1e300",
        "-2.75",
        "x",
        "2024-03-01",
        "2024/03/01",
        "2024-03-01 12:30:45.5",
        "2024-03-01T12:30:00+02:00",
        "0f8fad5b-d9cb-469f-a165-70867728950e",
        "23:59:59",
        "1.02:03:04.5",
        "-3.00:00:01",
        "just text",
    ] {
        assert_stable(token);
    }
}

#[test]
fn bool_renders_lowercase() {
    assert_eq!(parse_all("YES").to_string(), "true");
    assert_eq!(parse_all("n").to_string(), "false");
}

#[test]
fn float_renders_with_decimal_point() {
    assert_eq!(Scalar::F64(2.0).to_string(), "2.0");
    assert_eq!(Scalar::F32(1.23).to_string(), "1.23");
    assert_eq!(Scalar::F16(f16::from_f32(0.5)).to_string(), "0.5");
}

#[test]
fn date_time_renders_with_t_separator() {
    let value = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 30, 45)
        .unwrap();
    assert_eq!(Scalar::DateTime(value).to_string(), "2024-03-01T12:30:45");
}

#[test]
fn kind_names() {
    assert_eq!(parse_all("123").kind(), "i8");
    assert_eq!(parse_all("hello").kind(), "string");
    assert_eq!(parse_all("yes").kind(), "bool");
}
