//! Shared fixtures: a mock farm site and matching configuration

use farmstats::config::{
    Config, ListenerConfig, PipelineConfig, SourceConfig, SpiderConfig, UserAgentConfig,
};
use farmstats::PipelineHandle;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at `base_url`
pub fn create_test_config(base_url: &str) -> Config {
    Config {
        pipeline: PipelineConfig {
            workers: 2,
            queue_capacity: 20,
        },
        source: SourceConfig {
            base_url: base_url.to_string(),
            listing_path: "all".to_string(),
            recents_path: "_mini_recents".to_string(),
            required_prefix: '1',
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        spider: SpiderConfig {
            dedup_database_path: None,
            recents_poll_count: 0,
            recents_poll_interval_secs: 1,
        },
        console: ListenerConfig::default(),
        http: ListenerConfig::default(),
    }
}

/// Farm page body with one tooltip per (villager, score)
pub fn farm_page(scores: &[(&str, &str)]) -> String {
    let tooltips: String = scores
        .iter()
        .map(|(name, score)| format!("<i title='Friends><br>{}: {}/10'></i>", name, score))
        .collect();
    format!("<html><body>{}</body></html>", tooltips)
}

/// Listing page body referencing each farm thumbnail
pub fn listing_page(farm_ids: &[&str]) -> String {
    let thumbs: String = farm_ids
        .iter()
        .map(|id| format!(r#"<a href="/{0}"><img src="/{0}-f.png"></a>"#, id))
        .collect();
    format!("<html><body>{}</body></html>", thumbs)
}

pub async fn mount_farm(server: &MockServer, farm_id: &str, scores: &[(&str, &str)]) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", farm_id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(farm_page(scores)))
        .mount(server)
        .await;
}

pub async fn mount_listing(server: &MockServer, page: u32, farm_ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/all"))
        .and(query_param("sort", "recent"))
        .and(query_param("p", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_page(farm_ids)))
        .mount(server)
        .await;
}

pub async fn mount_recents(server: &MockServer, entries: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/_mini_recents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(serde_json::to_string(entries).unwrap())
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

/// Polls until the store holds `count` farms or two seconds pass
pub async fn wait_for_farms(handle: &PipelineHandle, count: usize) {
    for _ in 0..200 {
        if handle.store.len() >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!(
        "expected {} farms, store has {}",
        count,
        handle.store.len()
    );
}
