//! CSV codec for the persisted dataset.
//!
//! The on-disk format is deliberately boring: a header row in the canonical
//! column order, one data row per entry. Reads are lenient the way the
//! collaborative tool needs them to be: coordinates that fail to parse are
//! coerced to NaN (filtered later at the render boundary), missing text
//! fields become empty strings, and a structurally broken file yields an
//! empty dataset instead of an error.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::CSV_HEADER;
use crate::error_handling::StoreError;
use crate::models::{Entry, EntryDataset};

/// One row as read from the file, before coercion. Every field is optional
/// so a sparse row still deserializes.
#[derive(Debug, Deserialize)]
struct RawRecord {
    id: Option<String>,
    username: Option<String>,
    city: Option<String>,
    country: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    continent: Option<String>,
    un_region: Option<String>,
    created_at: Option<String>,
}

impl RawRecord {
    fn coerce(self) -> Entry {
        Entry {
            id: self.id.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            country: self.country.unwrap_or_default(),
            latitude: coerce_coordinate(self.latitude),
            longitude: coerce_coordinate(self.longitude),
            continent: self.continent.unwrap_or_default(),
            un_region: self.un_region.unwrap_or_default(),
            created_at: coerce_timestamp(self.created_at),
        }
    }
}

fn coerce_coordinate(value: Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

/// An unparseable timestamp becomes the minimum instant, which keeps the row
/// renderable while making it too old to ever trip the duplicate window.
fn coerce_timestamp(value: Option<String>) -> DateTime<Utc> {
    value
        .as_deref()
        .and_then(|v| DateTime::parse_from_rfc3339(v.trim()).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Decodes file content into a dataset.
///
/// Never fails: a structurally broken file (ragged rows, bad header) is
/// logged and treated as an empty dataset, matching how a low-traffic
/// community tool should behave when someone hand-edits the file badly.
pub(crate) fn decode(bytes: &[u8]) -> EntryDataset {
    let mut reader = csv::Reader::from_reader(bytes);
    let mut entries = Vec::new();

    for record in reader.deserialize::<RawRecord>() {
        match record {
            Ok(raw) => entries.push(raw.coerce()),
            Err(e) => {
                log::warn!("Dataset file could not be parsed, treating it as empty: {}", e);
                return EntryDataset::new();
            }
        }
    }

    EntryDataset::from_entries(entries)
}

/// Encodes a dataset into CSV bytes, header first, canonical column order.
pub(crate) fn encode(dataset: &EntryDataset) -> Result<Vec<u8>, StoreError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for entry in dataset.entries() {
        writer.write_record([
            entry.id.as_str(),
            entry.username.as_str(),
            entry.city.as_str(),
            entry.country.as_str(),
            &entry.latitude.to_string(),
            &entry.longitude.to_string(),
            entry.continent.as_str(),
            entry.un_region.as_str(),
            &entry.created_at.to_rfc3339(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| StoreError::Io(std::io::Error::other(e.to_string())))
}

/// CSV content of an empty dataset: the header row only.
pub(crate) fn header_only() -> Vec<u8> {
    let mut line = CSV_HEADER.join(",");
    line.push('\n');
    line.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_entry() -> Entry {
        Entry {
            id: "9f8a6c1e".to_string(),
            username: "Bo".to_string(),
            city: "Austin, Texas, USA".to_string(),
            country: "USA".to_string(),
            latitude: 30.27,
            longitude: -97.74,
            continent: "America".to_string(),
            un_region: "Northern America".to_string(),
            created_at: "2026-08-26T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_round_trip_preserves_string_fields() {
        let dataset = EntryDataset::from_entries(vec![sample_entry()]);
        let bytes = encode(&dataset).unwrap();
        let decoded = decode(&bytes);

        assert_eq!(decoded.len(), 1);
        let entry = &decoded.entries()[0];
        assert_eq!(entry.id, "9f8a6c1e");
        assert_eq!(entry.username, "Bo");
        assert_eq!(entry.city, "Austin, Texas, USA");
        assert_eq!(entry.country, "USA");
        assert_eq!(entry.latitude, 30.27);
        assert_eq!(entry.longitude, -97.74);
    }

    #[test]
    fn test_decode_header_only_is_empty() {
        let decoded = decode(&header_only());
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_decode_coerces_bad_coordinates_to_nan() {
        let csv = "id,username,city,country,latitude,longitude,continent,un_region,created_at\n\
                   x,Alice,Paris,France,not-a-number,2.35,,,2026-01-01T00:00:00Z\n";
        let decoded = decode(csv.as_bytes());
        assert_eq!(decoded.len(), 1);
        assert!(decoded.entries()[0].latitude.is_nan());
        assert_eq!(decoded.entries()[0].longitude, 2.35);
        // The coerced row is excluded from rendering, not from the dataset
        assert_eq!(decoded.valid_entries().count(), 0);
    }

    #[test]
    fn test_decode_missing_text_fields_become_empty() {
        let csv = "id,username,city,country,latitude,longitude,continent,un_region,created_at\n\
                   x,Alice,Paris,,48.85,2.35,,,\n";
        let decoded = decode(csv.as_bytes());
        let entry = &decoded.entries()[0];
        assert_eq!(entry.country, "");
        assert_eq!(entry.continent, "");
        assert_eq!(entry.created_at, DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_decode_ragged_file_is_empty() {
        let csv = "id,username,city,country,latitude,longitude,continent,un_region,created_at\n\
                   only,three,fields\n";
        assert!(decode(csv.as_bytes()).is_empty());
    }

    #[test]
    fn test_decode_garbage_is_empty() {
        assert!(decode(b"\x00\x01\x02 not a csv file").is_empty());
    }

    #[test]
    fn test_encode_writes_canonical_header() {
        let bytes = encode(&EntryDataset::new()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with(
            "id,username,city,country,latitude,longitude,continent,un_region,created_at"
        ));
    }
}
