//! End-to-end submission flow over the local backend: confirm a candidate,
//! persist the entry, reload, and materialize the map.

use chrono::{Duration, Utc};
use city_map::map::MapRenderer;
use city_map::models::{Entry, LocationCandidate};
use city_map::store::LocalCsvStore;
use city_map::{submit_entry, EntryStore, Submission, SubmissionStats, SubmitError};

fn austin_candidate() -> LocationCandidate {
    LocationCandidate {
        display_name: "Austin, Texas, USA".to_string(),
        latitude: 30.27,
        longitude: -97.74,
        country: "USA".to_string(),
    }
}

fn local_store(dir: &tempfile::TempDir) -> EntryStore {
    EntryStore::Local(LocalCsvStore::new(dir.path().join("entries.csv")))
}

#[tokio::test]
async fn submit_load_render_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(&dir);
    let stats = SubmissionStats::new();

    let submission = Submission {
        username: "Bo".to_string(),
        candidate: austin_candidate(),
    };
    let report = submit_entry(&store, submission, 24, &stats).await.unwrap();
    assert_eq!(report.total_entries, 1);
    assert_eq!(report.entry.username, "Bo");
    assert_eq!(report.entry.city, "Austin, Texas, USA");
    // Regional classification is derived at submit time
    assert_eq!(report.entry.continent, "America");
    assert_eq!(report.entry.un_region, "Northern America");

    let dataset = store.load().await.unwrap();
    let mut renderer = MapRenderer::new();
    let view = renderer.render(&dataset);
    assert_eq!(view.marker_count(), 1);
    let marker = &view.clusters[0].markers[0];
    assert_eq!(marker.latitude, 30.27);
    assert_eq!(marker.longitude, -97.74);
    assert!(marker.label.contains("Bo"));
    assert!(view.bounds.is_some());
}

#[tokio::test]
async fn duplicate_within_window_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(&dir);
    let stats = SubmissionStats::new();

    let submission = Submission {
        username: "Bo".to_string(),
        candidate: austin_candidate(),
    };
    submit_entry(&store, submission.clone(), 24, &stats).await.unwrap();

    let result = submit_entry(&store, submission, 24, &stats).await;
    assert!(matches!(result, Err(SubmitError::Duplicate { .. })));
    // The rejected submission did not write a row
    assert_eq!(store.load().await.unwrap().len(), 1);
}

#[tokio::test]
async fn old_precedent_outside_window_is_accepted() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(&dir);
    let stats = SubmissionStats::new();

    // Seed an identical triple created 25 hours ago, directly at the store
    // layer so its timestamp survives
    let old = Entry {
        id: uuid::Uuid::new_v4().to_string(),
        username: "Bo".to_string(),
        city: "Austin, Texas, USA".to_string(),
        country: "USA".to_string(),
        latitude: 30.27,
        longitude: -97.74,
        continent: "America".to_string(),
        un_region: "Northern America".to_string(),
        created_at: Utc::now() - Duration::hours(25),
    };
    store.append(old).await.unwrap();

    let submission = Submission {
        username: "Bo".to_string(),
        candidate: austin_candidate(),
    };
    let report = submit_entry(&store, submission, 24, &stats).await.unwrap();
    assert_eq!(report.total_entries, 2);
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let store = local_store(&dir);
    let stats = SubmissionStats::new();

    let submission = Submission {
        username: "Bo".to_string(),
        candidate: LocationCandidate {
            display_name: "Nowhere".to_string(),
            latitude: 200.0,
            longitude: 0.0,
            country: String::new(),
        },
    };
    let result = submit_entry(&store, submission, 24, &stats).await;
    assert!(matches!(result, Err(SubmitError::InvalidCoordinates { .. })));
}

#[tokio::test]
async fn hand_edited_bad_row_never_blocks_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.csv");
    let store = EntryStore::Local(LocalCsvStore::new(&path));
    let stats = SubmissionStats::new();

    let submission = Submission {
        username: "Bo".to_string(),
        candidate: austin_candidate(),
    };
    submit_entry(&store, submission, 24, &stats).await.unwrap();

    // Someone edits the shared file by hand and breaks a coordinate
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("bad-id,Eve,Atlantis,,200.0,0.0,,,2026-01-01T00:00:00+00:00\n");
    std::fs::write(&path, content).unwrap();

    let dataset = store.load().await.unwrap();
    assert_eq!(dataset.len(), 2);

    let mut renderer = MapRenderer::new();
    let view = renderer.render(&dataset);
    assert_eq!(view.marker_count(), 1);
}
