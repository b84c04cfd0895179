//! Solution linking against the in-memory store.

mod helpers;

use chrono::Utc;
use helpers::{StubAdapter, StubVideoSource, make_draft};
use podium::data::models::Platform;
use podium::data::{MemoryStore, Store};
use podium::pipeline::{Aggregator, Playlist, SolutionLinker, Video};
use std::sync::Arc;

async fn seed_contests(store: &Arc<MemoryStore>, names: &[(&str, Platform)]) {
    let now = Utc::now();
    let mut by_platform: std::collections::HashMap<Platform, Vec<_>> =
        std::collections::HashMap::new();
    for (i, (name, platform)) in names.iter().enumerate() {
        by_platform
            .entry(*platform)
            .or_default()
            .push(make_draft(name, *platform, now, -(10 + i as i64 * 24)));
    }
    let adapters = by_platform
        .into_iter()
        .map(|(platform, drafts)| {
            Box::new(StubAdapter::serving(platform, drafts)) as Box<dyn podium::platforms::SourceAdapter>
        })
        .collect();
    Aggregator::new(adapters, store.clone() as Arc<dyn Store>)
        .run_at(now)
        .await
        .unwrap();
}

fn editorial(title: &str) -> Video {
    Video {
        title: title.to_owned(),
        url: format!(
            "https://www.youtube.com/watch?v={}",
            title.replace(' ', "").to_lowercase()
        ),
    }
}

#[tokio::test]
async fn editorial_video_links_exactly_once() {
    let store = Arc::new(MemoryStore::new());
    seed_contests(&store, &[("Codeforces Round 900 (Div. 2)", Platform::Codeforces)]).await;

    let source = Arc::new(StubVideoSource {
        playlists: vec![(
            Playlist {
                id: "pl1".to_owned(),
                title: "Codeforces Solutions".to_owned(),
            },
            vec![editorial("Codeforces Round #900 Editorial")],
        )],
    });
    let linker = SolutionLinker::new(store.clone() as Arc<dyn Store>, source);

    let first = linker.run().await.unwrap();
    assert_eq!(first.linked, 1);

    // A second pass finds the link already in place and writes nothing.
    let second = linker.run().await.unwrap();
    assert_eq!(second.linked, 0);
    assert_eq!(second.already_linked, 1);

    let contest = &store
        .search_contests(Platform::Codeforces, "Round 900")
        .await
        .unwrap()[0];
    let link = store.find_solution_link(contest.id).await.unwrap().unwrap();
    assert!(!link.added_manually);
}

#[tokio::test]
async fn manual_link_survives_pipeline_runs() {
    let store = Arc::new(MemoryStore::new());
    seed_contests(&store, &[("Weekly Contest 460", Platform::LeetCode)]).await;

    let contest = &store
        .search_contests(Platform::LeetCode, "Weekly Contest 460")
        .await
        .unwrap()[0];
    store
        .upsert_solution_link(contest.id, "https://youtu.be/manual", true)
        .await
        .unwrap();

    let source = Arc::new(StubVideoSource {
        playlists: vec![(
            Playlist {
                id: "pl1".to_owned(),
                title: "LeetCode Editorials".to_owned(),
            },
            vec![editorial("LeetCode Weekly Contest 460 Screencast")],
        )],
    });
    let linker = SolutionLinker::new(store.clone() as Arc<dyn Store>, source);
    let summary = linker.run().await.unwrap();
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.already_linked, 1);

    let link = store.find_solution_link(contest.id).await.unwrap().unwrap();
    assert_eq!(link.url, "https://youtu.be/manual");
    assert!(link.added_manually);
}

#[tokio::test]
async fn ambiguous_matches_are_skipped() {
    let store = Arc::new(MemoryStore::new());
    seed_contests(
        &store,
        &[
            ("Codeforces Round 90 (Div. 2)", Platform::Codeforces),
            ("Codeforces Round 900 (Div. 1)", Platform::Codeforces),
        ],
    )
    .await;

    let source = Arc::new(StubVideoSource {
        playlists: vec![(
            Playlist {
                id: "pl1".to_owned(),
                title: "Codeforces Solutions".to_owned(),
            },
            vec![editorial("Codeforces Round #90 Editorial")],
        )],
    });
    let linker = SolutionLinker::new(store.clone() as Arc<dyn Store>, source);
    let summary = linker.run().await.unwrap();
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.ambiguous, 1);
}

#[tokio::test]
async fn unrecognized_playlists_and_titles_are_counted_not_fatal() {
    let store = Arc::new(MemoryStore::new());
    seed_contests(&store, &[("Starters 150", Platform::CodeChef)]).await;

    let source = Arc::new(StubVideoSource {
        playlists: vec![
            (
                Playlist {
                    id: "pl1".to_owned(),
                    title: "Vlog".to_owned(),
                },
                vec![editorial("My trip to the finals")],
            ),
            (
                Playlist {
                    id: "pl2".to_owned(),
                    title: "CodeChef Solutions".to_owned(),
                },
                vec![editorial("Some unrelated upload")],
            ),
        ],
    });
    let linker = SolutionLinker::new(store.clone() as Arc<dyn Store>, source);
    let summary = linker.run().await.unwrap();
    assert_eq!(summary.linked, 0);
    assert_eq!(summary.unrecognized_titles, 1);
}
