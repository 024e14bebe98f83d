//! Ways as delivered by the `/ways` endpoint and their derived properties

use crate::{FixedBoundingBox, FootwayError, Grade, Incline, Result, analyze_incline, classify};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Opaque OSM way identifier (the key of the `ways` object).
///
/// Ids order like object keys do: canonical integers first, by value, then
/// everything else by text. Ways of a response are rendered in that order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WayId(String);

impl WayId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value of an id written as a canonical integer (no sign, no
    /// leading zeros)
    fn index(&self) -> Option<u64> {
        let id = self.0.as_str();
        if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        if id.len() > 1 && id.starts_with('0') {
            return None;
        }
        id.parse().ok()
    }
}

impl Ord for WayId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.index(), other.index()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for WayId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for WayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WayId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<u64> for WayId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A WGS84 position, encoded as `[lat, lon]` on the wire
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<[f64; 2]> for LatLon {
    fn from([lat, lon]: [f64; 2]) -> Self {
        Self { lat, lon }
    }
}

impl From<LatLon> for [f64; 2] {
    fn from(point: LatLon) -> Self {
        [point.lat, point.lon]
    }
}

impl From<LatLon> for geo::Point<f64> {
    fn from(point: LatLon) -> Self {
        geo::Point::new(point.lon, point.lat)
    }
}

/// Sparse OSM tags of a way
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WayTags(HashMap<String, String>);

impl WayTags {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn surface(&self) -> Option<&str> {
        self.get("surface")
    }

    pub fn smoothness(&self) -> Option<&str> {
        self.get("smoothness")
    }

    pub fn incline(&self) -> Option<&str> {
        self.get("incline")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for WayTags {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Properties derived once from a way's tags
#[derive(Clone, Debug, PartialEq)]
pub struct WayProps {
    pub grade: Grade,
    pub surface: Option<String>,
    pub smoothness: Option<String>,
    pub incline: Option<String>,
    pub steep: bool,
}

impl WayProps {
    /// Derive grade and steepness, returning whether the points must be reversed
    pub fn from_tags(tags: &WayTags, incline_threshold: f64) -> (Self, Incline) {
        let grade = classify(tags.smoothness(), tags.surface());
        let incline = analyze_incline(tags.incline(), incline_threshold);
        let props = Self {
            grade,
            surface: tags.surface().map(str::to_owned),
            smoothness: tags.smoothness().map(str::to_owned),
            incline: tags.incline().map(str::to_owned),
            steep: incline.steep,
        };
        (props, incline)
    }
}

/// A single way in a response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WayRecord {
    /// Only present when the server was asked for full output
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub nodes: Vec<LatLon>,
    #[serde(default)]
    pub tags: WayTags,
}

/// The renderable form of a way: ordered points plus derived properties.
///
/// Points of a steep descent are stored reversed so that they run uphill.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentShape {
    pub id: WayId,
    pub points: Vec<LatLon>,
    pub props: WayProps,
}

impl SegmentShape {
    pub fn from_record(id: WayId, record: WayRecord, incline_threshold: f64) -> Self {
        let (props, incline) = WayProps::from_tags(&record.tags, incline_threshold);
        let mut points = record.nodes;
        if incline.reversed {
            points.reverse();
        }
        Self { id, points, props }
    }
}

/// Body of a `/ways` request
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaysRequest {
    pub bboxes: Vec<FixedBoundingBox>,
}

/// `result` member of a successful response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaysPayload {
    /// The server sends `null` when no way matched
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ways: BTreeMap<WayId, WayRecord>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Status string the server sends on success
pub const STATUS_SUCCESS: &str = "success";

/// Body of a `/ways` response
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaysResponse {
    pub status: String,
    /// Echo of the requested boxes, for debugging
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Timestamp of the OSM extract the server is using
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<WaysPayload>,
}

impl WaysResponse {
    /// Wrap ways into a successful response
    pub fn success(ways: BTreeMap<WayId, WayRecord>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_owned(),
            result: Some(WaysPayload { ways }),
            ..Default::default()
        }
    }

    /// The ways of a successful response.
    ///
    /// Any status other than `success` fails the whole response.
    pub fn into_ways(self) -> Result<BTreeMap<WayId, WayRecord>> {
        if self.status != STATUS_SUCCESS {
            return Err(FootwayError::Status(self.status));
        }
        self.result
            .map(|payload| payload.ways)
            .ok_or(FootwayError::MissingResult)
    }
}
