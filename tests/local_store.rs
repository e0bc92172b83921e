//! Integration tests for the local CSV store.

use chrono::Utc;
use city_map::models::Entry;
use city_map::store::LocalCsvStore;

fn entry(username: &str, city: &str, lat: f64, lon: f64) -> Entry {
    Entry {
        id: uuid::Uuid::new_v4().to_string(),
        username: username.to_string(),
        city: city.to_string(),
        country: "USA".to_string(),
        latitude: lat,
        longitude: lon,
        continent: "America".to_string(),
        un_region: "Northern America".to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn append_then_load_preserves_fields() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCsvStore::new(dir.path().join("entries.csv"));

    let written = entry("Bo", "Austin, Texas, USA", 30.27, -97.74);
    store.append(written.clone()).await.unwrap();

    let dataset = store.load().await.unwrap();
    assert_eq!(dataset.len(), 1);
    let read = &dataset.entries()[0];
    assert_eq!(read.id, written.id);
    assert_eq!(read.username, "Bo");
    assert_eq!(read.city, "Austin, Texas, USA");
    assert_eq!(read.country, "USA");
    assert_eq!(read.latitude, 30.27);
    assert_eq!(read.longitude, -97.74);
    assert_eq!(read.continent, "America");
    assert_eq!(read.un_region, "Northern America");
}

#[tokio::test]
async fn repeated_loads_are_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCsvStore::new(dir.path().join("entries.csv"));
    store.append(entry("Bo", "Austin, Texas, USA", 30.27, -97.74)).await.unwrap();
    store.append(entry("Alice", "Paris, France", 48.85, 2.35)).await.unwrap();

    let first = store.load().await.unwrap();
    let second = store.load().await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[tokio::test]
async fn broken_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entries.csv");
    std::fs::write(&path, b"\x00\x01 this is not a csv dataset\nragged,row").unwrap();

    let store = LocalCsvStore::new(&path);
    let dataset = store.load().await.unwrap();
    assert!(dataset.is_empty());
}

#[tokio::test]
async fn appends_accumulate_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalCsvStore::new(dir.path().join("entries.csv"));

    for name in ["A", "B", "C"] {
        store.append(entry(name, "Austin, Texas, USA", 30.27, -97.74)).await.unwrap();
    }
    let dataset = store.load().await.unwrap();
    let names: Vec<&str> = dataset.entries().iter().map(|e| e.username.as_str()).collect();
    assert_eq!(names, ["A", "B", "C"]);
}
