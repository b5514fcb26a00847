//! The fixed four-entry campsite taxonomy and the classification result.
//!
//! [`CampsiteType`] is the only place where a taxonomy id is paired with its
//! canonical name, so a [`ClassificationResult`] can never carry a mismatched
//! `typeId` / `typeName`.

use serde::Serialize;

// ---------------------------------------------------------------------------
// CampsiteType
// ---------------------------------------------------------------------------

/// Accommodation category assigned to a campsite record.
///
/// | id | Variant        | Canonical name  |
/// |----|----------------|-----------------|
/// | 1  | `Camping`      | `Camping`       |
/// | 2  | `Glamping`     | `Glamping`      |
/// | 3  | `TentedResort` | `Tented Resort` |
/// | 4  | `Bungalow`     | `Bungalow`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum CampsiteType {
    Camping = 1,
    Glamping = 2,
    TentedResort = 3,
    Bungalow = 4,
}

impl CampsiteType {
    /// All entries in ascending `typeId` order.
    ///
    /// This is also the tie-break priority used by the heuristic stage.
    pub const ALL: [CampsiteType; 4] = [
        CampsiteType::Camping,
        CampsiteType::Glamping,
        CampsiteType::TentedResort,
        CampsiteType::Bungalow,
    ];

    /// Stable integer identifier persisted against campsite records.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Canonical English label.
    pub fn name(self) -> &'static str {
        match self {
            CampsiteType::Camping => "Camping",
            CampsiteType::Glamping => "Glamping",
            CampsiteType::TentedResort => "Tented Resort",
            CampsiteType::Bungalow => "Bungalow",
        }
    }

    /// Thai label used when describing the categories to the model.
    pub fn thai_name(self) -> &'static str {
        match self {
            CampsiteType::Camping => "แคมป์ปิ้ง / ลานกางเต็นท์",
            CampsiteType::Glamping => "แกลมปิ้ง",
            CampsiteType::TentedResort => "รีสอร์ทเต็นท์",
            CampsiteType::Bungalow => "บังกะโล",
        }
    }

    /// Look up an entry by id; `None` for anything outside `1..=4`.
    ///
    /// ```
    /// use campsite_classifier::taxonomy::CampsiteType;
    ///
    /// assert_eq!(CampsiteType::from_id(3), Some(CampsiteType::TentedResort));
    /// assert_eq!(CampsiteType::from_id(0), None);
    /// ```
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(CampsiteType::Camping),
            2 => Some(CampsiteType::Glamping),
            3 => Some(CampsiteType::TentedResort),
            4 => Some(CampsiteType::Bungalow),
            _ => None,
        }
    }

    /// Position in [`CampsiteType::ALL`], for indexing per-type score arrays.
    pub(crate) fn index(self) -> usize {
        self as usize - 1
    }
}

impl std::fmt::Display for CampsiteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ClassificationResult
// ---------------------------------------------------------------------------

/// Serialized form of [`ClassificationResult`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultRecord {
    type_id: u8,
    type_name: String,
    confidence: f64,
}

/// Outcome of classifying one place: a taxonomy entry plus a confidence in
/// `[0, 1]`.
///
/// Serializes as `{"typeId": 2, "typeName": "Glamping", "confidence": 0.95}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "ResultRecord")]
pub struct ClassificationResult {
    campsite_type: CampsiteType,
    confidence: f64,
}

impl ClassificationResult {
    /// Build a result, clamping `confidence` into `[0, 1]` (NaN becomes 0).
    pub fn new(campsite_type: CampsiteType, confidence: f64) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            campsite_type,
            confidence,
        }
    }

    pub fn campsite_type(&self) -> CampsiteType {
        self.campsite_type
    }

    pub fn type_id(&self) -> u8 {
        self.campsite_type.id()
    }

    pub fn type_name(&self) -> &'static str {
        self.campsite_type.name()
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

impl From<ClassificationResult> for ResultRecord {
    fn from(r: ClassificationResult) -> Self {
        Self {
            type_id: r.type_id(),
            type_name: r.type_name().to_string(),
            confidence: r.confidence,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
