use messgate_core::{
    classify, extract_token_id, GatePass, Severity, StatusBadge, StudentInfo, TokenId,
    TokenStatus,
};

#[test]
fn test_extracts_json_token() {
    assert_eq!(extract_token_id(r#"{"tokenId":"ABC123"}"#), "ABC123");
    assert_eq!(extract_token_id(r#"  { "tokenId" : "  ABC123 " }  "#), "ABC123");
}

#[test]
fn test_extracts_nested_token() {
    assert_eq!(
        extract_token_id(r#"{"success":true,"data":{"tokenId":"NESTED-7"}}"#),
        "NESTED-7"
    );
}

#[test]
fn test_top_level_wins_over_nested() {
    assert_eq!(
        extract_token_id(r#"{"tokenId":"TOP","data":{"tokenId":"NESTED"}}"#),
        "TOP"
    );
}

#[test]
fn test_strips_one_layer_of_quotes() {
    assert_eq!(extract_token_id(r#""XYZ""#), "XYZ");
    assert_eq!(extract_token_id("'XYZ'"), "XYZ");
    assert_eq!(extract_token_id(r#"  " XYZ "  "#), "XYZ");
}

#[test]
fn test_quoted_json_is_unwrapped() {
    assert_eq!(extract_token_id(r#"'{"tokenId":"Q-1"}'"#), "Q-1");
}

#[test]
fn test_malformed_json_fails_closed() {
    assert_eq!(extract_token_id("{bad json"), "");
    assert_eq!(extract_token_id(r#"  {"tokenId":"ABC123""#), "");
    assert_eq!(extract_token_id(r#"'{"tokenId":'"#), "");
    assert!(TokenId::from_scan("{bad json").is_none());
    assert_eq!(extract_token_id("{bad json}"), "");
    assert_eq!(extract_token_id("{}"), "");
    assert_eq!(extract_token_id(r#"{"other":"x"}"#), "");
    assert_eq!(extract_token_id(r#"{"tokenId":{"deep":"x"}}"#), "");
}

#[test]
fn test_empty_input() {
    assert_eq!(extract_token_id(""), "");
    assert_eq!(extract_token_id("   \n\t"), "");
    assert_eq!(extract_token_id(r#""""#), "");
}

#[test]
fn test_bare_token_passes_through() {
    assert_eq!(extract_token_id("  MESS-2025-0042 "), "MESS-2025-0042");
}

#[test]
fn test_extraction_is_idempotent() {
    let samples = [
        "",
        "ABC123",
        "  padded  ",
        r#""XYZ""#,
        "'XYZ'",
        r#""'double-wrapped'""#,
        r#"{"tokenId":"ABC123"}"#,
        r#"{"tokenId":"\"inner-quoted\""}"#,
        r#"{"tokenId":"{\"tokenId\":\"nested-json\"}"}"#,
        r#"{"tokenId":"{broken"}"#,
        r#"{"data":{"tokenId":42}}"#,
        "{bad json",
        "\"",
        "'mismatched\"",
        "ünïcödé-tökén",
    ];
    for sample in samples {
        let once = extract_token_id(sample);
        assert_eq!(extract_token_id(&once), once, "input: {sample:?}");
    }
}

#[test]
fn test_gate_pass_round_trips_through_extractor() {
    let student = StudentInfo {
        name: "Asha R".to_string(),
        register_number: "21BCE1042".to_string(),
        degree: "BTECH".to_string(),
        semester: "6".to_string(),
    };
    let pass = GatePass::new(TokenId::parse("TKN-88").unwrap(), &student);
    let encoded = pass.encode();

    let value: serde_json::Value = serde_json::from_str(&encoded).unwrap();
    assert_eq!(value["registerNumber"], "21BCE1042");
    assert_eq!(extract_token_id(&encoded), "TKN-88");
    assert_eq!(TokenId::from_scan(&encoded).unwrap().as_str(), "TKN-88");
}

#[test]
fn test_classify_is_case_insensitive() {
    assert_eq!(classify("used"), TokenStatus::Used);
    assert_eq!(classify("USED"), TokenStatus::Used);
    assert_eq!(classify("Expired"), TokenStatus::Expired);
    assert_eq!(classify("unused"), TokenStatus::Unused);
}

#[test]
fn test_classify_unknown_values() {
    assert_eq!(classify(""), TokenStatus::Unknown);
    assert_eq!(classify("REVOKED"), TokenStatus::Unknown);
    assert_eq!(classify("used!"), TokenStatus::Unknown);
}

#[test]
fn test_severity_mapping() {
    assert_eq!(TokenStatus::Unused.severity(), Severity::Positive);
    assert_eq!(TokenStatus::Used.severity(), Severity::Caution);
    assert_eq!(TokenStatus::Expired.severity(), Severity::Negative);
    assert_eq!(TokenStatus::Unknown.severity(), Severity::Neutral);
}

#[test]
fn test_status_badge_labels() {
    assert_eq!(StatusBadge::for_raw("unused").label, "UNUSED");
    assert_eq!(StatusBadge::for_raw("revoked").label, "REVOKED");
    assert_eq!(StatusBadge::for_raw("").label, "—");
    assert_eq!(StatusBadge::for_raw("expired").severity, Severity::Negative);
}
