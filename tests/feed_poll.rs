// tests/feed_poll.rs
// Poll cycle over fixture and mock sources, with sink-side dedup.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use news_trigger_filter::feed::rss::RssSource;
use news_trigger_filter::feed::{poll_once, StorySource};
use news_trigger_filter::sink::{JsonLinesSink, StorySink};
use news_trigger_filter::{build, ActiveTriggerList, Story};

const NEWS_XML: &str = include_str!("fixtures/news_rss.xml");

const CFG: &str = "\
// election coverage, plus the debate
t1,TITLE,election
t2,DESCRIPTION,election
t3,OR,t1,t2
d1,DESCRIPTION,Trump
d2,DESCRIPTION,Clinton
debate,AND,d1,d2
ADD,t3,debate
";

struct FailingSource;

#[async_trait]
impl StorySource for FailingSource {
    async fn fetch_latest(&self) -> Result<Vec<Story>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        "failing"
    }
}

fn guids(stories: &[Story]) -> Vec<&str> {
    stories.iter().map(|s| s.guid.as_str()).collect()
}

#[tokio::test]
async fn fixture_feed_is_filtered_in_feed_order() {
    let sources: Vec<Box<dyn StorySource>> =
        vec![Box::new(RssSource::from_fixture("fixture", NEWS_XML))];
    let triggers = build(CFG).unwrap();

    let matched = poll_once(&sources, &triggers).await;
    assert_eq!(guids(&matched), vec!["story-1", "story-2", "story-4"]);
    assert_eq!(matched[1].description, "Election day turnout may suffer from rain.");
    assert_eq!(matched[2].description, r#"Trump and Clinton debate "the economy"."#);
}

#[tokio::test]
async fn failing_source_is_skipped() {
    let sources: Vec<Box<dyn StorySource>> = vec![
        Box::new(FailingSource),
        Box::new(RssSource::from_fixture("fixture", NEWS_XML)),
    ];
    let triggers = ActiveTriggerList::from_keywords(&["sports"]);
    let matched = poll_once(&sources, &triggers).await;
    assert_eq!(guids(&matched), vec!["story-3"]);
}

#[tokio::test]
async fn no_triggers_means_no_output() {
    let sources: Vec<Box<dyn StorySource>> =
        vec![Box::new(RssSource::from_fixture("fixture", NEWS_XML))];
    let matched = poll_once(&sources, &ActiveTriggerList::new()).await;
    assert!(matched.is_empty());
}

#[tokio::test]
async fn redelivered_items_reach_sink_once() {
    let sources: Vec<Box<dyn StorySource>> =
        vec![Box::new(RssSource::from_fixture("fixture", NEWS_XML))];
    let triggers = build(CFG).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());

    let first = poll_once(&sources, &triggers).await;
    assert_eq!(sink.deliver(&first).unwrap(), 3);
    let second = poll_once(&sources, &triggers).await;
    assert_eq!(second, first);
    assert_eq!(sink.deliver(&second).unwrap(), 0);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.lines().count(), 3);
}
