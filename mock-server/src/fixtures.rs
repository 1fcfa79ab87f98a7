//! Canned response bodies, shaped like the live API's.

use serde_json::{json, Value};

pub const KNOWN_FEED_ID: u64 = 920666;
pub const KNOWN_ITUNES_ID: u64 = 1441923632;
pub const KNOWN_FEED_URL: &str = "https://mp3s.nashownotes.com/pc20rss.xml";
pub const KNOWN_EPISODE_ID: u64 = 16795090;

fn feed(id: u64, title: &str, url: &str, language: &str, categories: Value) -> Value {
    json!({
        "id": id,
        "title": title,
        "url": url,
        "originalUrl": url,
        "link": "https://podcastindex.org",
        "description": format!("{title} description"),
        "author": "Podcastindex.org",
        "ownerName": "Podcastindex.org",
        "image": "https://example.com/image.png",
        "artwork": "https://example.com/artwork.png",
        "lastUpdateTime": 1613394044,
        "lastCrawlTime": 1613394034,
        "lastParseTime": 1613394045,
        "lastGoodHttpStatusTime": 1613394034,
        "lastHttpStatus": 200,
        "contentType": "application/rss+xml",
        "itunesId": KNOWN_ITUNES_ID,
        "generator": null,
        "language": language,
        "type": 0,
        "dead": 0,
        "crawlErrors": 0,
        "parseErrors": 0,
        "categories": categories,
        "locked": 0,
        "imageUrlHash": 1702747127
    })
}

fn episode(id: u64, feed_id: u64, title: &str, published: i64) -> Value {
    json!({
        "id": id,
        "title": title,
        "link": "https://podcastindex.org/podcast/920666",
        "description": format!("{title} notes"),
        "guid": format!("guid-{id}"),
        "datePublished": published,
        "datePublishedPretty": "February 12, 2021 5:00pm",
        "dateCrawled": published + 60,
        "enclosureUrl": format!("https://example.com/{id}.mp3"),
        "enclosureType": "audio/mpeg",
        "enclosureLength": 52601138,
        "duration": 3286,
        "explicit": 0,
        "episode": 23,
        "episodeType": "full",
        "season": null,
        "image": "",
        "feedItunesId": KNOWN_ITUNES_ID,
        "feedImage": "https://example.com/image.png",
        "feedId": feed_id,
        "feedLanguage": "en-US",
        "chaptersUrl": null,
        "transcriptUrl": null,
        "soundbites": [
            { "startTime": 1234.5, "duration": 42.25, "title": "Why the Podcast Namespace Matters" }
        ]
    })
}

fn with(mut value: Value, extra: Value) -> Value {
    if let (Some(target), Value::Object(extra)) = (value.as_object_mut(), extra) {
        target.extend(extra);
    }
    value
}

pub fn search(term: &str, query: Value) -> Value {
    let feeds = vec![
        feed(75075, &format!("{term} Daily"), "https://feeds.example.com/daily.xml", "en", json!({"104": "Tv", "105": "Film"})),
        feed(KNOWN_FEED_ID, "Podcasting 2.0", KNOWN_FEED_URL, "en-US", json!({"102": "Technology"})),
    ];
    json!({
        "status": "true",
        "feeds": feeds,
        "count": feeds.len(),
        "query": query,
        "description": "Found matching feeds"
    })
}

pub fn search_person(person: &str, query: Value) -> Value {
    let item = with(
        episode(KNOWN_EPISODE_ID, KNOWN_FEED_ID, &format!("Episode 23 with {person}"), 1613156400),
        json!({
            "feedUrl": KNOWN_FEED_URL,
            "feedAuthor": "Adam Curry & Dave Jones",
            "feedTitle": "Podcasting 2.0"
        }),
    );
    json!({
        "status": "true",
        "items": [item],
        "count": 1,
        "query": query,
        "description": "Found matching items."
    })
}

pub fn categories() -> Value {
    let feeds = json!([
        { "id": 1, "name": "Arts" },
        { "id": 9, "name": "Business" },
        { "id": 16, "name": "Comedy" },
        { "id": 102, "name": "Technology" }
    ]);
    json!({
        "status": "true",
        "feeds": feeds,
        "count": 4,
        "description": "Categories loaded"
    })
}

pub fn recent_episodes(max: Option<&str>) -> Value {
    let item = with(
        episode(KNOWN_EPISODE_ID, KNOWN_FEED_ID, "Episode 23: Namespace", 1613156400),
        json!({ "feedTitle": "Podcasting 2.0" }),
    );
    json!({
        "status": "true",
        "items": [item],
        "count": 1,
        "max": max,
        "description": "1 recent episode"
    })
}

/// Includes one feed without `categories` and one with an upper-case
/// language code, as the live API sometimes returns.
pub fn recent_feeds(max: Option<&str>, since: Option<i64>) -> Value {
    let bare = json!({
        "id": 41504,
        "url": "https://feeds.example.com/bare.xml",
        "title": "Bare Feed",
        "newestItemPublishTime": 1613394000,
        "oldestItemPublishTime": 1580000000,
        "description": "",
        "image": "",
        "itunesId": null,
        "language": "EN"
    });
    let full = json!({
        "id": KNOWN_FEED_ID,
        "url": KNOWN_FEED_URL,
        "title": "Podcasting 2.0",
        "newestItemPublishTime": 1613394044,
        "oldestItemPublishTime": 1597284000,
        "description": "The Podcast Index presents Podcasting 2.0",
        "image": "https://example.com/image.png",
        "itunesId": KNOWN_ITUNES_ID,
        "language": "en-US",
        "categories": { "102": "Technology" }
    });
    json!({
        "status": "true",
        "feeds": [full, bare],
        "count": 2,
        "max": max,
        "since": since,
        "description": "2 recent feeds"
    })
}

pub fn recent_new_feeds(max: Option<&str>) -> Value {
    json!({
        "status": "true",
        "feeds": [{
            "id": 2935217,
            "url": "https://feeds.example.com/new.xml",
            "timeAdded": 1613394083,
            "status": "confirmed",
            "contentHash": "",
            "language": "EN-GB",
            "image": ""
        }],
        "count": 1,
        "max": max,
        "description": "1 new feed"
    })
}

pub fn recent_soundbites() -> Value {
    json!({
        "status": "true",
        "items": [{
            "enclosureUrl": format!("https://example.com/{KNOWN_EPISODE_ID}.mp3"),
            "title": "Why the Podcast Namespace Matters",
            "startTime": 1234.5,
            "duration": 42.25,
            "episodeId": KNOWN_EPISODE_ID,
            "episodeTitle": "Episode 23: Namespace",
            "feedTitle": "Podcasting 2.0",
            "feedUrl": KNOWN_FEED_URL,
            "feedId": KNOWN_FEED_ID
        }],
        "count": 1,
        "description": "Found matching soundbites"
    })
}

pub fn podcast(query: Value) -> Value {
    let feed = with(
        feed(KNOWN_FEED_ID, "Podcasting 2.0", KNOWN_FEED_URL, "en-US", json!({"102": "Technology"})),
        json!({
            "episodeCount": 24,
            "explicit": false,
            "chash": "8ee6a27d5b8b4d6d4e8df9c5e4e3b2d1",
            "funding": { "url": "https://podcastindex.org/donate", "message": "Support the index" },
            "value": {
                "model": { "type": "lightning", "method": "keysend", "suggested": "0.00000015000" },
                "destinations": [
                    { "name": "podcaster", "address": "03ae9f91a0cb8ff43840e3c322c4c61f019d8c1c3cea15a25cfc425ac605e61a4a", "type": "node", "split": 99 },
                    { "name": "Podcastindex.org", "address": "03ae9f91a0cb8ff43840e3c322c4c61f019d8c1c3cea15a25cfc425ac605e61a4a", "type": "node", "split": 1 }
                ]
            }
        }),
    );
    json!({
        "status": "true",
        "query": query,
        "feed": feed,
        "description": "Found matching feed"
    })
}

/// What the live API sends for an unknown feed: success status, empty array.
pub fn podcast_not_found(query: Value) -> Value {
    json!({
        "status": "true",
        "query": query,
        "feed": [],
        "description": "No feeds match this id."
    })
}

pub fn episode_not_found(id: u64) -> Value {
    json!({
        "status": "true",
        "id": id.to_string(),
        "episode": [],
        "description": "No episodes match this id."
    })
}

pub fn trending(max: Option<&str>, since: Option<i64>) -> Value {
    json!({
        "status": "true",
        "feeds": [{
            "id": KNOWN_FEED_ID,
            "url": KNOWN_FEED_URL,
            "title": "Podcasting 2.0",
            "description": "The Podcast Index presents Podcasting 2.0",
            "author": "Podcastindex.org",
            "image": "https://example.com/image.png",
            "artwork": "https://example.com/artwork.png",
            "newestItemPublishTime": 1613394044,
            "itunesId": KNOWN_ITUNES_ID,
            "trendScore": 9,
            "language": "EN",
            "categories": null
        }],
        "count": 1,
        "max": max,
        "since": since,
        "description": "Found matching feeds"
    })
}

pub fn episodes(feed_ids: &[u64], query: Value) -> Value {
    let items: Vec<Value> = feed_ids
        .iter()
        .enumerate()
        .map(|(i, feed_id)| episode(KNOWN_EPISODE_ID + i as u64, *feed_id, "Episode 23: Namespace", 1613156400))
        .collect();
    json!({
        "status": "true",
        "items": items,
        "count": items.len(),
        "query": query,
        "description": "Found matching items."
    })
}

pub fn episode_by_id(id: u64) -> Value {
    let item = with(
        episode(id, KNOWN_FEED_ID, "Episode 23: Namespace", 1613156400),
        json!({ "feedTitle": "Podcasting 2.0" }),
    );
    json!({
        "status": "true",
        "id": id.to_string(),
        "episode": item,
        "description": "Found matching item."
    })
}

pub fn episodes_random(max: Option<&str>) -> Value {
    let item = with(
        episode(KNOWN_EPISODE_ID, KNOWN_FEED_ID, "Episode 23: Namespace", 1613156400),
        json!({ "feedTitle": "Podcasting 2.0", "categories": null }),
    );
    json!({
        "status": "true",
        "episodes": [item],
        "count": 1,
        "max": max,
        "description": "Found matching items."
    })
}

pub fn stats() -> Value {
    json!({
        "status": "true",
        "stats": {
            "feedCountTotal": 4044021,
            "episodeCountTotal": 116953937,
            "feedsWithNewEpisodes3days": 198394,
            "feedsWithNewEpisodes10days": 367425,
            "feedsWithNewEpisodes30days": 596105,
            "feedsWithNewEpisodes90days": 889513,
            "feedsWithValueBlocks": 1766
        },
        "description": "Index statistics"
    })
}

pub fn failure(description: &str) -> Value {
    json!({ "status": "false", "description": description })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_feeds_has_a_feed_without_categories() {
        let body = recent_feeds(None, None);
        let feeds = body["feeds"].as_array().unwrap();
        assert!(feeds.iter().any(|f| f.get("categories").is_none()));
        assert!(feeds.iter().any(|f| f["language"] == "EN"));
    }

    #[test]
    fn episodes_one_item_per_feed() {
        let body = episodes(&[1, 2, 3], json!({}));
        assert_eq!(body["count"], 3);
        assert_eq!(body["items"][2]["feedId"], 3);
    }

    #[test]
    fn with_merges_objects() {
        let merged = with(json!({"a": 1}), json!({"b": 2}));
        assert_eq!(merged, json!({"a": 1, "b": 2}));
    }
}
