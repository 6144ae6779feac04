//! Property-based tests for the rendering pipeline and navigation.
//!
//! Tests validate:
//! 1. Author colors are deterministic, in range and follow the 31-multiplier hash
//! 2. Formatter output is balanced and escaped for any input
//! 3. Stripping codes keeps every non-control character
//! 4. Date grouping keeps every record, in order
//! 5. Navigation never leaves the date list

use chanlog::model::{group_by_date, Anchor, DateId, MessageRecord};
use chanlog::render::format;
use chanlog::render::{color_for, hash_code, Palette};
use chanlog::state::{Boundary, DateSelection, DateSync, NavigationState};
use proptest::prelude::*;
use regex::Regex;

/// Characters that exercise links, escaping and every control code, but no
/// digits, so color codes never consume text.
fn body_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            Just("a".to_string()),
            Just("Z".to_string()),
            Just(" ".to_string()),
            Just("<".to_string()),
            Just(">".to_string()),
            Just("&".to_string()),
            Just("\"".to_string()),
            Just("'".to_string()),
            Just("(".to_string()),
            Just(")".to_string()),
            Just(".".to_string()),
            Just("é".to_string()),
            Just("\n".to_string()),
            Just("http://ex.org/p".to_string()),
            Just("\x02".to_string()),
            Just("\x03".to_string()),
            Just("\x1D".to_string()),
            Just("\x1F".to_string()),
            Just("\x0F".to_string()),
            Just("\x16".to_string()),
        ],
        0..40,
    )
    .prop_map(|parts| parts.concat())
}

/// Bodies that also carry color digits.
fn colored_body_strategy() -> impl Strategy<Value = String> {
    (body_strategy(), 0u8..120, 0u8..120, body_strategy())
        .prop_map(|(a, fg, bg, b)| format!("{a}\x03{fg},{bg}{b}\x03{a}"))
}

fn is_stripped_control(c: char) -> bool {
    (c.is_ascii_control() && c != '\t' && c != '\n') || c == '\x7F'
}

/// Checks tag balance of formatter output and that no raw angle brackets leak.
fn assert_balanced(markup: &str) -> Result<(), TestCaseError> {
    let tag = Regex::new(r#"<(/?)(b|i|u|span|a)(?:\s[^>]*)?>"#).expect("valid regex");
    let mut stack: Vec<String> = Vec::new();

    for caps in tag.captures_iter(markup) {
        let name = caps[2].to_string();
        if &caps[1] == "/" {
            prop_assert_eq!(stack.pop(), Some(name), "mismatched close in {:?}", markup);
        } else {
            stack.push(name);
        }
    }
    prop_assert!(stack.is_empty(), "unclosed tags {:?} in {:?}", stack, markup);

    let text_only = tag.replace_all(markup, "");
    prop_assert!(!text_only.contains('<'), "raw '<' in {:?}", markup);
    prop_assert!(!text_only.contains('>'), "raw '>' in {:?}", markup);
    Ok(())
}

// ===== Property 1: Color assignment =====

proptest! {
    #[test]
    fn color_index_is_deterministic_and_in_range(name in any::<String>(), len in 1usize..32) {
        let first = color_for(&name, len);
        prop_assert_eq!(first, color_for(&name, len));
        prop_assert!(first.get() < len);
    }

    #[test]
    fn hash_matches_utf16_recurrence(name in any::<String>()) {
        let expected = name
            .encode_utf16()
            .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)));
        prop_assert_eq!(hash_code(&name), expected);
    }

    #[test]
    fn palette_color_is_one_of_its_entries(name in any::<String>()) {
        let palette = Palette::default();
        let color = palette.color_for(&name);
        prop_assert!(chanlog::render::color::DEFAULT_PALETTE.contains(&color));
    }
}

// ===== Property 2: Balanced, escaped output =====

proptest! {
    #[test]
    fn formatted_markup_is_balanced(body in body_strategy()) {
        assert_balanced(format::format(&body).as_str())?;
    }

    #[test]
    fn colored_markup_is_balanced(body in colored_body_strategy()) {
        assert_balanced(format::format(&body).as_str())?;
    }

    #[test]
    fn arbitrary_input_never_breaks_markup(body in any::<String>()) {
        assert_balanced(format::format(&body).as_str())?;
    }
}

// ===== Property 3: Stripping keeps text =====

proptest! {
    #[test]
    fn strip_removes_only_control_codes(body in body_strategy()) {
        let expected: String = body.chars().filter(|c| !is_stripped_control(*c)).collect();
        prop_assert_eq!(format::strip(&body), expected);
    }
}

// ===== Property 4: Date grouping =====

fn record_strategy() -> impl Strategy<Value = MessageRecord> {
    (1u32..5, 0u32..24, any::<u16>()).prop_map(|(day, hour, anchor)| {
        MessageRecord::new(
            format!("2023-10-{day:02}T{hour:02}:00:00"),
            "nick",
            "body",
            Anchor::new(anchor.to_string()).expect("numeric anchor"),
        )
    })
}

proptest! {
    #[test]
    fn grouping_keeps_every_record_in_order(records in prop::collection::vec(record_strategy(), 0..30)) {
        let groups = group_by_date(records.clone());

        let total: usize = groups.iter().map(|g| g.records.len()).sum();
        prop_assert_eq!(total, records.len());

        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            prop_assert!(seen.insert(group.date.clone()), "date {} grouped twice", group.date);
            let expected: Vec<&MessageRecord> = records
                .iter()
                .filter(|r| r.date().as_ref() == Some(&group.date))
                .collect();
            let actual: Vec<&MessageRecord> = group.records.iter().collect();
            prop_assert_eq!(actual, expected);
        }

        let first_seen: Vec<DateId> = records.iter().filter_map(MessageRecord::date).fold(
            Vec::new(),
            |mut acc, d| {
                if !acc.contains(&d) {
                    acc.push(d);
                }
                acc
            },
        );
        let group_dates: Vec<DateId> = groups.iter().map(|g| g.date.clone()).collect();
        prop_assert_eq!(group_dates, first_seen);
    }
}

// ===== Property 5: Navigation bounds =====

#[derive(Default)]
struct LastSync(Option<DateSelection>);

impl DateSync for LastSync {
    fn sync_date(&mut self, selection: &DateSelection) {
        self.0 = Some(selection.clone());
    }
}

proptest! {
    #[test]
    fn navigation_stays_in_range(len in 1usize..10, moves in prop::collection::vec(any::<bool>(), 0..40)) {
        let dates: Vec<DateId> = (0..len)
            .map(|i| DateId::new(format!("day-{i}")).expect("valid"))
            .collect();
        let mut state = NavigationState::new();
        let mut sync = LastSync::default();
        state.initialize(dates, None, &mut sync);

        for newer in moves {
            let before = state.current_index();
            let result = if newer { state.next(&mut sync) } else { state.previous(&mut sync) };

            match result {
                Ok(index) => {
                    prop_assert_eq!(state.current_index(), Some(index));
                    let synced = sync.0.as_ref().expect("synced on success");
                    prop_assert_eq!(synced.index, index);
                    prop_assert_eq!(state.date_at(index), Some(&synced.value));
                }
                Err(boundary) => {
                    prop_assert!(matches!(boundary, Boundary::AtNewest | Boundary::AtOldest));
                    prop_assert_eq!(state.current_index(), before);
                }
            }
            let current = state.current_index().expect("resolved");
            prop_assert!(current < len);
        }
    }
}
