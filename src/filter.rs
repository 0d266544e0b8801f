// src/filter.rs
//! Filter pipeline: keeps the stories for which at least one active trigger fires.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use tracing::debug;

use crate::config::ActiveTriggerList;
use crate::story::Story;

/// One-time metrics registration (so series show up once an exporter is installed).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("filter_stories_in_total", "Stories offered to the filter.");
        describe_counter!(
            "filter_stories_matched_total",
            "Stories kept because at least one trigger fired."
        );
    });
}

/// Name of the first active trigger that fires for `story`, if any.
pub fn first_match<'a>(story: &Story, triggers: &'a ActiveTriggerList) -> Option<&'a str> {
    triggers
        .iter()
        .find(|(_, t)| t.evaluate(story))
        .map(|(name, _)| name)
}

/// Stories matched by any trigger in `triggers`, in input order, each at most once.
/// An empty trigger list matches nothing.
pub fn filter_stories(stories: &[Story], triggers: &ActiveTriggerList) -> Vec<Story> {
    ensure_metrics_described();

    let mut out = Vec::new();
    for story in stories {
        if let Some(name) = first_match(story, triggers) {
            debug!(target: "filter", guid = %story.guid, trigger = name, "story matched");
            out.push(story.clone());
        }
    }

    counter!("filter_stories_in_total").increment(stories.len() as u64);
    counter!("filter_stories_matched_total").increment(out.len() as u64);
    debug!(
        target: "filter",
        offered = stories.len(),
        matched = out.len(),
        triggers = triggers.len(),
        "filter pass"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::build;
    use chrono::NaiveDate;

    fn story(guid: &str, title: &str, description: &str) -> Story {
        let ts = NaiveDate::from_ymd_opt(2020, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Story::new(guid, title, description, "https://example.test", ts)
    }

    #[test]
    fn empty_trigger_list_matches_nothing() {
        let stories = vec![story("1", "a", "b"), story("2", "c", "d")];
        assert!(filter_stories(&stories, &ActiveTriggerList::new()).is_empty());
    }

    #[test]
    fn story_included_once_even_if_several_fire() {
        let list = build("a,TITLE,cow\nb,DESCRIPTION,cow\nADD,a,b,a").unwrap();
        let stories = vec![story("1", "cow", "cow"), story("2", "dog", "cat")];
        let out = filter_stories(&stories, &list);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].guid, "1");
    }

    #[test]
    fn order_is_preserved_and_call_is_idempotent() {
        let list = build("a,TITLE,x\nADD,a").unwrap();
        let stories = vec![
            story("3", "x one", ""),
            story("1", "nope", ""),
            story("2", "x two", ""),
        ];
        let first = filter_stories(&stories, &list);
        let second = filter_stories(&stories, &list);
        assert_eq!(first, second);
        let guids: Vec<_> = first.iter().map(|s| s.guid.as_str()).collect();
        assert_eq!(guids, vec!["3", "2"]);
    }

    #[test]
    fn first_match_reports_trigger_name() {
        let list = build("a,TITLE,x\nb,DESCRIPTION,y\nADD,a,b").unwrap();
        assert_eq!(first_match(&story("1", "", "y"), &list), Some("b"));
        assert_eq!(first_match(&story("1", "x", "y"), &list), Some("a"));
        assert_eq!(first_match(&story("1", "", ""), &list), None);
    }
}
