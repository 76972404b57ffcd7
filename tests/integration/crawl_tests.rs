//! Integration tests for the harvester
//!
//! These tests use wiremock to stand in for the news site and its comment
//! service, and run discovery and the full harvest end-to-end against it.

use serde_json::{json, Value};
use std::path::Path;
use tuoitre_harvester::config::{CategoryTarget, Config, CrawlerConfig, OutputConfig, SiteConfig};
use tuoitre_harvester::crawler::{Coordinator, Fetcher, ListingDiscoverer};
use tuoitre_harvester::state::ListingAudioIndex;
use tuoitre_harvester::HarvestError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMENT_PATH: &str = "/api/getlist-comment.api";

/// Creates a test configuration pointed at the mock server, without pauses
fn create_test_config(server: &MockServer, root: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            delay: 0.0,
            jitter: 0.0,
            max_retries: 0,
            retry_backoff: 0.0,
            max_workers: 3,
            min_comments_target: 3,
            ..CrawlerConfig::default()
        },
        site: SiteConfig {
            base_url: server.uri(),
            comment_api: format!("{}{}", server.uri(), COMMENT_PATH),
            comment_page_size: 2,
            ..SiteConfig::default()
        },
        output: OutputConfig {
            data_dir: root.join("data"),
            audio_dir: root.join("audio"),
            images_dir: root.join("images"),
            summary_path: None,
        },
        categories: vec![],
    }
}

/// Listing page with one story card per href
fn listing_page(hrefs: &[&str]) -> String {
    let cards: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<div class="box-category-item"><a class="box-category-link-title" href="{}">Tin</a></div>"#,
                href
            )
        })
        .collect();
    format!("<html><body>{}</body></html>", cards)
}

fn article_page(post_id: &str, title: &str, head: &str, content: &str) -> String {
    format!(
        r#"<html><head>
            <meta property="dable:item_id" content="{}">
            <meta property="og:title" content="{}">
            {}
        </head><body><div data-role="content">{}</div></body></html>"#,
        post_id, title, head, content
    )
}

fn comment_page(items: Value) -> String {
    json!({ "Data": items.to_string() }).to_string()
}

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_bytes(server: &MockServer, route: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 64]))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_discovery_stops_at_target_in_listing_order() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    mount_html(
        &server,
        "/thoi-su.htm",
        listing_page(&["/a1.htm", "/a2.htm", "/a3.htm", "/a4.htm", "/a5.htm"]),
    )
    .await;
    mount_html(
        &server,
        "/thoi-su/trang-2.htm",
        listing_page(&["/a6.htm", "/a7.htm", "/a8.htm"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/thoi-su/trang-3.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["/a9.htm"])))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config.crawler, &config.site).unwrap();
    let base = url::Url::parse(&server.uri()).unwrap();
    let audio = ListingAudioIndex::new();
    let urls = ListingDiscoverer::new(&fetcher, &base, &audio)
        .discover(&format!("{}/thoi-su.htm", server.uri()), 6)
        .await;

    let expected: Vec<String> = (1..=6)
        .map(|n| format!("{}/a{}.htm", server.uri(), n))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_discovery_dedups_and_stops_without_progress() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    mount_html(
        &server,
        "/the-gioi.htm",
        listing_page(&["/b1.htm", "/b2.htm", "/b1.htm", "/b3.htm"]),
    )
    .await;
    // The site keeps serving the same stories on later pages
    mount_html(
        &server,
        "/the-gioi/trang-2.htm",
        listing_page(&["/b2.htm", "/b3.htm"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/the-gioi/trang-3.htm"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(&["/b2.htm"])))
        .expect(0)
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config.crawler, &config.site).unwrap();
    let base = url::Url::parse(&server.uri()).unwrap();
    let audio = ListingAudioIndex::new();
    let urls = ListingDiscoverer::new(&fetcher, &base, &audio)
        .discover(&format!("{}/the-gioi.htm", server.uri()), 50)
        .await;

    assert_eq!(
        urls,
        vec![
            format!("{}/b1.htm", server.uri()),
            format!("{}/b2.htm", server.uri()),
            format!("{}/b3.htm", server.uri()),
        ]
    );
}

#[tokio::test]
async fn test_discovery_exhausted_or_failing_listing_keeps_partial_results() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    mount_html(&server, "/kinh-doanh.htm", listing_page(&["/c1.htm", "/c2.htm"])).await;
    mount_html(&server, "/kinh-doanh/trang-2.htm", listing_page(&[])).await;
    mount_html(&server, "/the-thao.htm", listing_page(&["/d1.htm"])).await;
    Mock::given(method("GET"))
        .and(path("/the-thao/trang-2.htm"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = Fetcher::new(&config.crawler, &config.site).unwrap();
    let base = url::Url::parse(&server.uri()).unwrap();
    let audio = ListingAudioIndex::new();
    let discoverer = ListingDiscoverer::new(&fetcher, &base, &audio);

    let exhausted = discoverer
        .discover(&format!("{}/kinh-doanh.htm", server.uri()), 10)
        .await;
    assert_eq!(exhausted.len(), 2);

    let failing = discoverer
        .discover(&format!("{}/the-thao.htm", server.uri()), 10)
        .await;
    assert_eq!(failing, vec![format!("{}/d1.htm", server.uri())]);
}

#[tokio::test]
async fn test_listing_audio_recorded_for_every_anchor() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    mount_html(
        &server,
        "/podcast.htm",
        r#"<html><body>
            <div class="box-category-item"><a class="box-category-link-title" href="/p1.htm">P1</a></div>
            <a data-role="audio-autoplay" href="/p1.htm" data-file="/audio/p1.mp3">Nghe</a>
            <a data-role="audio-autoplay" href="/p2.htm" data-file="/audio/p2.mp3">Nghe</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    let fetcher = Fetcher::new(&config.crawler, &config.site).unwrap();
    let base = url::Url::parse(&server.uri()).unwrap();
    let audio = ListingAudioIndex::new();
    let urls = ListingDiscoverer::new(&fetcher, &base, &audio)
        .discover(&format!("{}/podcast.htm", server.uri()), 1)
        .await;

    assert_eq!(urls, vec![format!("{}/p1.htm", server.uri())]);
    assert_eq!(
        audio.get(&format!("{}/p1.htm", server.uri())),
        vec![format!("{}/audio/p1.mp3", server.uri())]
    );
    // Recorded even though the target was already met
    assert_eq!(
        audio.get(&format!("{}/p2.htm", server.uri())),
        vec![format!("{}/audio/p2.mp3", server.uri())]
    );
}

#[tokio::test]
async fn test_full_harvest_single_category() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    let first_id = "20240101000000001";
    let second_id = "20240101000000002";

    mount_html(
        &server,
        "/thoi-su.htm",
        r#"<html><body>
            <div class="box-category-item"><a class="box-category-link-title" href="/bai-a.htm">A</a></div>
            <div class="box-category-item"><a class="box-category-link-title" href="/bai-b.htm">B</a></div>
            <a data-role="audio-autoplay" href="/bai-a.htm" data-file="/media/listing-a.mp3">Nghe</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_html(&server, "/thoi-su/trang-2.htm", listing_page(&[])).await;

    mount_html(
        &server,
        "/bai-a.htm",
        article_page(
            first_id,
            "Bài A",
            r#"<meta property="article:section" content="Thời sự">
               <meta property="article:published_time" content="2024-01-01T08:00:00+07:00">"#,
            r#"<p>Đoạn một</p><p>Đoạn   hai</p>
               <img data-src="/img/a1.jpg" src="data:image/gif;base64,R0lGOD">
               <audio src="/media/body-a.mp3"></audio>
               <div class="formreactdetail"><div class="reactinfo">
                   <span data-viewreactid="2">1.234</span>
               </div></div>"#,
        ),
    )
    .await;
    mount_html(
        &server,
        "/bai-b.htm",
        article_page(second_id, "Bài B", "", "<p>Không có bình luận</p>"),
    )
    .await;

    mount_bytes(&server, "/img/a1.jpg").await;
    mount_bytes(&server, "/media/body-a.mp3").await;
    mount_bytes(&server, "/media/listing-a.mp3").await;

    Mock::given(method("GET"))
        .and(path(COMMENT_PATH))
        .and(query_param("objId", first_id))
        .and(query_param("objType", "1"))
        .and(query_param("pageindex", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(comment_page(json!([
            {
                "id": 1,
                "sender_fullname": "Lan",
                "content": "Hay quá",
                "reactions": { "1": 4, "3": 0 },
                "child_comments": [
                    { "id": 11, "content": "Đồng ý", "child_comments": [ { "id": 111 } ] }
                ]
            },
            { "id": 2, "content": "Cảm ơn" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(COMMENT_PATH))
        .and(query_param("objId", first_id))
        .and(query_param("pageindex", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(comment_page(json!([{ "id": 3 }]))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator
        .run_categories(&[CategoryTarget {
            url: format!("{}/thoi-su.htm", server.uri()),
            target: 5,
        }])
        .await
        .unwrap();

    assert_eq!(summary.total_posts, 2);
    assert_eq!(summary.total_comments, 5);
    assert_eq!(summary.comment_rich_posts, 1);
    assert_eq!(summary.categories.len(), 1);
    assert_eq!(summary.categories[0].discovered, 2);
    assert_eq!(summary.categories[0].processed, 2);
    assert!(summary.finished_at.is_some());

    let raw = std::fs::read_to_string(dir.path().join("data").join(format!("{}.json", first_id)))
        .unwrap();
    assert!(raw.contains("Bài A"), "non-ASCII text must not be escaped");

    let record: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(record["postId"], first_id);
    assert_eq!(record["title"], "Bài A");
    assert_eq!(record["content"], "Đoạn một\n\nĐoạn hai");
    assert_eq!(record["category"], "Thời sự");
    assert_eq!(record["date"], "2024-01-01T08:00:00+07:00");
    assert_eq!(record["sourceUrl"], format!("{}/bai-a.htm", server.uri()));
    assert_eq!(record["voteReactions"], json!({ "like": 1234 }));
    assert_eq!(record["imageFiles"], json!([format!("{}/a1.jpg", first_id)]));
    assert_eq!(
        record["audioFiles"],
        json!([format!("{}.mp3", first_id), format!("{}_2.mp3", first_id)])
    );
    assert_eq!(record["comments"].as_array().unwrap().len(), 3);
    assert_eq!(record["comments"][0]["commentId"], "1");
    assert_eq!(record["comments"][0]["author"], "Lan");
    assert_eq!(record["comments"][0]["voteReactions"], json!({ "like": 4 }));
    assert_eq!(record["comments"][0]["replies"][0]["replies"][0]["commentId"], "111");
    assert_eq!(record["comments"][1]["author"], Value::Null);

    assert!(dir
        .path()
        .join("images")
        .join(first_id)
        .join("a1.jpg")
        .exists());
    assert!(dir.path().join("audio").join(format!("{}.mp3", first_id)).exists());
    assert!(dir.path().join("audio").join(format!("{}_2.mp3", first_id)).exists());

    // No section metadata: the category falls back to the listing slug
    let second: Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join("data").join(format!("{}.json", second_id)))
            .unwrap(),
    )
    .unwrap();
    assert_eq!(second["category"], "thoi-su");
    assert_eq!(second["comments"], json!([]));
    assert_eq!(second["audioFiles"], json!([]));
}

#[tokio::test]
async fn test_same_post_id_is_written_once() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());
    let post_id = "20240202000000009";

    mount_html(
        &server,
        "/van-hoa.htm",
        listing_page(&["/bai-goc.htm", "/bai-goc-amp.htm", "/bai-goc-mobile.htm"]),
    )
    .await;
    mount_html(&server, "/van-hoa/trang-2.htm", listing_page(&[])).await;
    for route in ["/bai-goc.htm", "/bai-goc-amp.htm", "/bai-goc-mobile.htm"] {
        mount_html(&server, route, article_page(post_id, "Một bài", "", "<p>x</p>")).await;
    }
    Mock::given(method("GET"))
        .and(path(COMMENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"Data": null}"#))
        .expect(1)
        .mount(&server)
        .await;

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator
        .run_categories(&[CategoryTarget {
            url: format!("{}/van-hoa.htm", server.uri()),
            target: 10,
        }])
        .await
        .unwrap();

    assert_eq!(summary.categories[0].discovered, 3);
    assert_eq!(summary.total_posts, 1);

    let written: Vec<_> = std::fs::read_dir(dir.path().join("data"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .collect();
    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0].file_name().to_string_lossy(),
        format!("{}.json", post_id)
    );
}

#[tokio::test]
async fn test_failing_category_does_not_abort_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    Mock::given(method("GET"))
        .and(path("/hong.htm"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_html(&server, "/giao-duc.htm", listing_page(&["/e1.htm", "/e2.htm"])).await;
    mount_html(&server, "/giao-duc/trang-2.htm", listing_page(&[])).await;
    mount_html(
        &server,
        "/e1.htm",
        article_page("20240303000000001", "E1", "", "<p>e1</p>"),
    )
    .await;
    // No post id anywhere: skipped
    mount_html(&server, "/e2.htm", "<html><body>trống</body></html>".to_string()).await;

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator
        .run_categories(&[
            CategoryTarget {
                url: format!("{}/hong.htm", server.uri()),
                target: 5,
            },
            CategoryTarget {
                url: format!("{}/giao-duc.htm", server.uri()),
                target: 5,
            },
        ])
        .await
        .unwrap();

    assert_eq!(summary.categories.len(), 2);
    assert_eq!(summary.categories[0].discovered, 0);
    assert_eq!(summary.categories[1].discovered, 2);
    assert_eq!(summary.categories[1].processed, 1);
    assert_eq!(summary.total_posts, 1);
}

#[tokio::test]
async fn test_run_without_categories_fails() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    let coordinator = Coordinator::new(config).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::NoCategories)));
}

#[tokio::test]
async fn test_non_numeric_post_id_never_leaves_output_dirs() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&server, dir.path());

    mount_html(&server, "/phap-luat.htm", listing_page(&["/thoat.htm", "/tuyet-doi.htm"])).await;
    mount_html(&server, "/phap-luat/trang-2.htm", listing_page(&[])).await;
    // Relative escape in the id, no digits in the URL: the article is skipped
    mount_html(
        &server,
        "/thoat.htm",
        article_page("../escaped", "Thoát", "", r#"<p>x</p><img src="/img/e.jpg">"#),
    )
    .await;
    // Absolute path in the id: the inline script id is used instead
    let absolute = dir.path().join("absolute").display().to_string();
    mount_html(
        &server,
        "/tuyet-doi.htm",
        article_page(
            &absolute,
            "Tuyệt đối",
            "<script>var cfg = { articleId: '20240404000000004' };</script>",
            r#"<p>y</p><audio src="/media/t.mp3"></audio>"#,
        ),
    )
    .await;
    mount_bytes(&server, "/img/e.jpg").await;
    mount_bytes(&server, "/media/t.mp3").await;

    let coordinator = Coordinator::new(config).unwrap();
    let summary = coordinator
        .run_categories(&[CategoryTarget {
            url: format!("{}/phap-luat.htm", server.uri()),
            target: 5,
        }])
        .await
        .unwrap();

    assert_eq!(summary.total_posts, 1);
    assert!(!dir.path().join("escaped.json").exists());
    assert!(!dir.path().join("absolute.json").exists());
    assert!(dir
        .path()
        .join("data")
        .join("20240404000000004.json")
        .exists());
    assert!(dir.path().join("audio").join("20240404000000004.mp3").exists());

    let mut top_level: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    top_level.sort();
    assert_eq!(top_level, vec!["audio", "data", "images"]);

    let records: Vec<_> = std::fs::read_dir(dir.path().join("data"))
        .unwrap()
        .filter_map(|entry| entry.ok())
        .collect();
    assert_eq!(records.len(), 1);
}
