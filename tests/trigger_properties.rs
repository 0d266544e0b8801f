// tests/trigger_properties.rs
// Behavioural properties of phrase matching, composites and time thresholds.

use chrono::{DateTime, NaiveDate};
use news_trigger_filter::phrase::contains;
use news_trigger_filter::{build, filter_stories, ActiveTriggerList, Story, Trigger};
use std::sync::Arc;

const TEXTS: &[&str] = &[
    "Experts agree: CLIMATE, change is real",
    "climate-change summit opens",
    "Change of climate expected",
    "",
    "!!!",
    "The purple cow is soft and cuddly.",
];

const PHRASES: &[&str] = &["climate change", "change", "purple cow", "soft", "", "cow is"];

fn story(title: &str, description: &str, pubdate: &str) -> Story {
    let dt = DateTime::parse_from_rfc3339(pubdate).unwrap();
    Story::new("g", title, description, "", dt)
}

#[test]
fn phrase_matching_is_case_insensitive() {
    for t in TEXTS {
        for p in PHRASES {
            assert_eq!(
                contains(&p.to_uppercase(), &t.to_lowercase()),
                contains(p, t),
                "phrase {p:?} text {t:?}"
            );
        }
    }
}

#[test]
fn empty_phrase_always_matches() {
    for t in TEXTS {
        assert!(contains("", t));
    }
}

#[test]
fn phrase_word_order_matters() {
    let text = "Experts agree: CLIMATE, change is real";
    assert!(contains("climate change", text));
    assert!(!contains("change climate", text));
    assert!(contains("climate change", "climate-change summit opens"));
}

#[test]
fn composites_agree_with_boolean_operators() {
    let leaves: Vec<Arc<Trigger>> = vec![
        Arc::new(Trigger::title("cow")),
        Arc::new(Trigger::description("milk")),
        Arc::new(Trigger::after("01 Jan 2020 00:00:00").unwrap()),
        Arc::new(Trigger::not(Arc::new(Trigger::title("horse")))),
    ];
    let stories = [
        story("Cow", "milk", "2021-01-01T00:00:00+00:00"),
        story("horse", "milk", "2019-01-01T00:00:00+00:00"),
        story("cow horse", "water", "2020-01-01T00:00:00+00:00"),
        story("", "", "2020-06-01T00:00:00-07:00"),
    ];
    for s in &stories {
        for a in &leaves {
            assert_eq!(Trigger::not(a.clone()).evaluate(s), !a.evaluate(s));
            for b in &leaves {
                let (ea, eb) = (a.evaluate(s), b.evaluate(s));
                assert_eq!(Trigger::and(a.clone(), b.clone()).evaluate(s), ea && eb);
                assert_eq!(Trigger::or(a.clone(), b.clone()).evaluate(s), ea || eb);
            }
        }
    }
}

#[test]
fn before_threshold_is_strict_for_naive_and_zoned() {
    let before = Trigger::before("01 Jan 2020 00:00:00").unwrap();

    let naive = |h: u32, m: u32, s: u32, day: u32, year: i32, month: u32| {
        let ts = NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap();
        Story::new("g", "", "", "", ts)
    };
    assert!(!before.evaluate(&naive(0, 0, 0, 1, 2020, 1)));
    assert!(before.evaluate(&naive(23, 59, 59, 31, 2019, 12)));

    assert!(!before.evaluate(&story("", "", "2020-01-01T00:00:00+00:00")));
    assert!(!before.evaluate(&story("", "", "2020-01-01T01:00:00+01:00")));
    assert!(before.evaluate(&story("", "", "2020-01-01T00:59:59+01:00")));
}

#[test]
fn filter_is_idempotent_and_empty_list_matches_nothing() {
    let stories = vec![
        story("cow", "", "2021-01-01T00:00:00+00:00"),
        story("horse", "", "2021-01-01T00:00:00+00:00"),
    ];
    assert!(filter_stories(&stories, &ActiveTriggerList::new()).is_empty());

    let triggers = build("a,TITLE,cow\nb,NOT,a\nADD,a,b").unwrap();
    let first = filter_stories(&stories, &triggers);
    assert_eq!(first, stories);
    assert_eq!(filter_stories(&stories, &triggers), first);
}

#[test]
fn triggers_are_shareable_across_threads() {
    let triggers = Arc::new(build("a,TITLE,cow\nADD,a").unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let triggers = Arc::clone(&triggers);
            std::thread::spawn(move || {
                let title = if i % 2 == 0 { "cow" } else { "dog" };
                let batch = vec![story(title, "", "2021-01-01T00:00:00+00:00")];
                filter_stories(&batch, &triggers).len()
            })
        })
        .collect();
    let hits: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(hits, 2);
}
