use crm_mail_extract::*;

// --- Table layout ---

#[test]
fn test_standard_rule_order() {
    let table = RuleTable::default();
    let kinds: Vec<RuleKind> = table.rules().iter().map(|r| r.kind).collect();
    assert_eq!(
        kinds,
        vec![
            RuleKind::ReplyHeader,
            RuleKind::OutlookHeader,
            RuleKind::OriginalMessage,
            RuleKind::UnderscoreDivider,
            RuleKind::QuoteMarker,
            RuleKind::SignOff,
        ]
    );
}

#[test]
fn test_signoff_action_carries_threshold() {
    let table = RuleTable::standard(80);
    let signoff = table
        .rules()
        .iter()
        .find(|r| r.kind == RuleKind::SignOff)
        .unwrap();
    assert_eq!(signoff.action, RuleAction::CutIfTailShorterThan(80));

    let structural = table
        .rules()
        .iter()
        .filter(|r| r.kind != RuleKind::SignOff)
        .all(|r| r.action == RuleAction::Cut);
    assert!(structural);
}

// --- Evaluate ---

#[test]
fn test_evaluate_reply_header() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("On Tue, Feb 6, 2024 at 10:12 AM Bob wrote:", &[]),
        Some(RuleKind::ReplyHeader)
    );
    assert_eq!(table.evaluate("On Tuesday we can meet.", &[]), None);
}

#[test]
fn test_evaluate_wrapped_reply_header() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate(
            "On Mon, Jan 1, 2024 at 9:00 AM Jane Doe <",
            &["jane@x.com> wrote:", "", "> Can I reschedule?"]
        ),
        Some(RuleKind::ReplyHeader)
    );
    assert_eq!(
        table.evaluate(
            "On Mon, Jan 1, 2024 at 9:00 AM",
            &["", "Jane Doe", "<jane@x.com> wrote:"]
        ),
        Some(RuleKind::ReplyHeader)
    );
}

#[test]
fn test_evaluate_wrapped_reply_header_needs_wrote() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("On Monday we can meet.", &["See you then.", "Ana"]),
        None
    );
    assert_eq!(
        table.evaluate("On Mon, Jan 1", &["Jane", "Doe", "wrote:"]),
        None
    );
}

#[test]
fn test_evaluate_outlook_needs_header_block() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("From: Jane Doe", &["Sent: Monday", "To: Bookings"]),
        Some(RuleKind::OutlookHeader)
    );
    assert_eq!(
        table.evaluate("From: the whole team at Acme", &["We love the venue."]),
        None
    );
}

#[test]
fn test_evaluate_bold_outlook_header() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("*From:* Jane", &["", "*Sent:* Monday"]),
        Some(RuleKind::OutlookHeader)
    );
}

#[test]
fn test_evaluate_dividers() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("-----Original Message-----", &[]),
        Some(RuleKind::OriginalMessage)
    );
    assert_eq!(
        table.evaluate("________________________________", &[]),
        Some(RuleKind::UnderscoreDivider)
    );
    assert_eq!(table.evaluate("snake_case_name", &[]), None);
}

#[test]
fn test_evaluate_quote_marker() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("   > indented quote", &[]),
        Some(RuleKind::QuoteMarker)
    );
    assert_eq!(table.evaluate("a > b", &[]), None);
}

#[test]
fn test_evaluate_signoff_depends_on_tail() {
    let table = RuleTable::default();
    assert_eq!(
        table.evaluate("Kind regards,", &["Ana", "Sales"]),
        Some(RuleKind::SignOff)
    );

    let long_tail = ["I also wanted to ask whether the garden room is free on the 14th."];
    assert_eq!(table.evaluate("Thanks,", &long_tail), None);
}

#[test]
fn test_signoff_variants() {
    let table = RuleTable::default();
    for line in [
        "Sent from my iPhone",
        "Sent from my Galaxy",
        "Sent from Outlook for Android",
        "Get Outlook for iOS",
        "Regards",
        "Best regards,",
        "Thanks!",
        "Thank you,",
        "Cheers",
        "Best,",
        "Sincerely,",
        "--",
    ] {
        assert_eq!(
            table.evaluate(line, &[]),
            Some(RuleKind::SignOff),
            "expected sign-off: {line}"
        );
    }
}

#[test]
fn test_structural_rule_wins_over_signoff() {
    let table = RuleTable::default();
    assert_eq!(table.evaluate("> Thanks,", &[]), Some(RuleKind::QuoteMarker));
}

#[test]
fn test_rule_matches_and_stops() {
    let table = RuleTable::default();
    let signoff = table
        .rules()
        .iter()
        .find(|r| r.kind == RuleKind::SignOff)
        .unwrap();
    assert!(signoff.matches("Cheers,", &[]));
    assert!(signoff.stops(&["Bob"]));
    assert!(!signoff.stops(&[
        "Bob Smith, Regional Director of Partnerships and Events, Acme Corp"
    ]));
}

// --- Truncate ---

#[test]
fn test_truncate_skips_leading_blanks() {
    let table = RuleTable::default();
    assert_eq!(table.truncate("\n\n  \nHello\n\nWorld"), "Hello\n\nWorld");
}

#[test]
fn test_truncate_stops_at_first_marker() {
    let table = RuleTable::default();
    let text = "Sure.\n\nOn Mon, Jan 1 Jane wrote:\n> earlier\n-----Original Message-----";
    assert_eq!(table.truncate(text), "Sure.\n");
}

#[test]
fn test_truncate_marker_on_first_line_leaves_nothing() {
    let table = RuleTable::default();
    assert_eq!(table.truncate("> all quoted\n> still quoted"), "");
}

#[test]
fn test_truncate_tail_measures_remaining_content_only() {
    let table = RuleTable::default();
    let text = "Booked.\nThanks,\n\n\n\nAna";
    assert_eq!(table.truncate(text), "Booked.");
}

#[test]
fn test_truncate_many_signoffs_stays_linear() {
    let table = RuleTable::default();
    let text = format!("Hello there.\n{}", "Thanks,\n".repeat(40_000));

    let started = std::time::Instant::now();
    let kept = table.truncate(&text);
    assert!(started.elapsed() < std::time::Duration::from_secs(5));

    // Each "Thanks," is 7 chars plus a newline; the cut lands on the first
    // sign-off with fewer than 52 chars of tail, i.e. six lines left.
    assert!(kept.starts_with("Hello there.\nThanks,"));
    assert_eq!(kept.lines().count(), 39_994);
}

#[test]
fn test_signoff_tail_limit_counts_separators() {
    let table = RuleTable::standard(9);
    assert_eq!(
        table.evaluate("Thanks,", &["Ana", "", "Sale"]),
        Some(RuleKind::SignOff)
    );
    assert_eq!(table.evaluate("Thanks,", &["Ana", "", "Sales"]), None);
}
