mod common;

use common::{FakeSource, SHARED_VOICE_ACTOR};
use seiyuu::clients::TransportError;
use seiyuu::db::Store;
use seiyuu::domain::MediaEntryId;
use seiyuu::graph::{GraphResolver, ResolveOptions};
use seiyuu::services::{SyncError, SyncService};
use std::sync::Arc;

async fn setup(source: FakeSource) -> (Arc<FakeSource>, Store, SyncService) {
    let source = Arc::new(source);
    let store = Store::in_memory().await.unwrap();
    let service = SyncService::new(source.clone(), store.clone());
    (source, store, service)
}

#[tokio::test]
async fn test_fan_out_requests_every_page_once() {
    let (source, _store, service) = setup(FakeSource::new(3, 2)).await;

    let report = service.sync("tester").await.unwrap();

    assert_eq!(
        source.requests(),
        vec![(1, 1), (1, 2), (2, 1), (2, 2), (3, 1), (3, 2)]
    );
    assert_eq!(report.pages_fetched, 6);
    assert_eq!(report.username, "tester");
}

#[tokio::test]
async fn test_single_page_list_makes_one_request() {
    let (source, store, service) = setup(FakeSource::new(1, 1)).await;

    service.sync("tester").await.unwrap();

    assert_eq!(source.requests(), vec![(1, 1)]);
    assert_eq!(store.counts().await.unwrap().media, 1);
}

#[tokio::test]
async fn test_inner_pages_follow_the_longest_entry_on_each_outer_page() {
    let (source, store, service) =
        setup(FakeSource::with_layout(vec![vec![1, 3], vec![2]])).await;

    let report = service.sync("tester").await.unwrap();

    assert_eq!(
        source.requests(),
        vec![(1, 1), (1, 2), (1, 3), (2, 1), (2, 2)]
    );
    assert_eq!(report.pages_fetched, 5);
    assert_eq!(report.counts.media, 3);
    // 1 + 3 characters on the first outer page, 2 on the second.
    assert_eq!(report.counts.characters, 6);
    assert_eq!(store.count_dangling_joins().await.unwrap(), 0);
}

#[tokio::test]
async fn test_full_sync_stores_everything_without_dangling_joins() {
    let (_source, store, service) = setup(FakeSource::new(3, 2)).await;

    let report = service.sync("tester").await.unwrap();

    assert_eq!(report.counts.media, 3);
    assert_eq!(report.counts.characters, 6);
    assert_eq!(report.counts.voice_actors, 1);
    assert_eq!(store.count_connections().await.unwrap(), 6);
    assert_eq!(store.count_dangling_joins().await.unwrap(), 0);

    let last = store.last_sync().await.unwrap().unwrap();
    assert_eq!(last.username, "tester");
    assert_eq!(last.pages_fetched, 6);
}

#[tokio::test]
async fn test_initial_page_failure_is_a_transport_error() {
    let (source, store, service) = setup(FakeSource::new(3, 2).failing_on(1, 1)).await;

    let err = service.sync("tester").await.unwrap_err();

    assert!(matches!(
        err,
        SyncError::Transport(TransportError::Status(500))
    ));
    assert_eq!(source.requests(), vec![(1, 1)]);
    assert_eq!(store.counts().await.unwrap().media, 0);
    assert!(store.last_sync().await.unwrap().is_none());
}

#[tokio::test]
async fn test_later_page_failure_keeps_partial_writes() {
    let (_source, store, service) = setup(FakeSource::new(3, 2).failing_on(2, 1)).await;

    let err = service.sync("tester").await.unwrap_err();

    assert!(matches!(err, SyncError::Transport(_)));
    let media = store
        .get_media(MediaEntryId::new(10))
        .await
        .unwrap()
        .expect("first page should have been written");
    assert_eq!(media.display_title(), "Show 10");
    assert!(store.get_media(MediaEntryId::new(20)).await.unwrap().is_none());
    assert!(store.last_sync().await.unwrap().is_none());

    // Whatever made it in is still resolvable.
    let resolution = GraphResolver::new(store)
        .resolve(MediaEntryId::new(10), ResolveOptions::default())
        .await
        .unwrap();
    assert!(resolution.graph.contains_node("media-10"));
}

#[tokio::test]
async fn test_sync_replaces_previous_data() {
    let store = Store::in_memory().await.unwrap();

    SyncService::new(Arc::new(FakeSource::new(3, 2)), store.clone())
        .sync("first")
        .await
        .unwrap();
    SyncService::new(Arc::new(FakeSource::new(1, 1)), store.clone())
        .sync("second")
        .await
        .unwrap();

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.media, 1);
    assert_eq!(counts.characters, 1);
    assert_eq!(store.count_connections().await.unwrap(), 1);
    assert_eq!(store.last_sync().await.unwrap().unwrap().username, "second");
}

#[tokio::test]
async fn test_synced_list_links_media_through_shared_voice_actor() {
    let (_source, store, service) = setup(FakeSource::new(3, 2)).await;
    service.sync("tester").await.unwrap();

    let resolution = GraphResolver::new(store)
        .resolve(MediaEntryId::new(10), ResolveOptions::default())
        .await
        .unwrap();
    let graph = &resolution.graph;

    let actor = format!("voice_actor-{SHARED_VOICE_ACTOR}");
    assert!(graph.contains_node(&actor));
    for media in ["media-10", "media-20", "media-30"] {
        assert!(graph.contains_node(media), "missing {media}");
    }
    assert!(graph.contains_link("character-101", "media-10"));
    assert!(graph.contains_link("character-302", "media-30"));
    assert!(graph.contains_link(&actor, "character-202"));
}
