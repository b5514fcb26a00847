//! Static bilingual keyword and category-tag tables.
//!
//! Each taxonomy entry owns a list of Thai and English terms with a weight:
//!
//! | Weight | Meaning     | Example                      |
//! |--------|-------------|------------------------------|
//! | 3      | distinctive | `glamping`, `แคมป์ปิ้ง`        |
//! | 2      | moderate    | `luxury tent`, `resort`      |
//! | 1      | weak        | `camp`, `dome`, `homestay`   |
//!
//! Terms are lowercase; Thai terms are matched as-is.  Within one entry a
//! longer term that contains a shorter one (`แคมป์ปิ้ง` / `แคมป์`) is matched
//! first and blanks the shorter one out.  English terms of five letters or
//! fewer only match as whole words.

use crate::taxonomy::CampsiteType;

pub const DISTINCTIVE: u32 = 3;
pub const MODERATE: u32 = 2;
pub const WEAK: u32 = 1;

// ---------------------------------------------------------------------------
// Keyword tables
// ---------------------------------------------------------------------------

pub struct Keyword {
    pub term: &'static str,
    pub weight: u32,
}

const fn kw(term: &'static str, weight: u32) -> Keyword {
    Keyword { term, weight }
}

pub struct KeywordSet {
    pub campsite_type: CampsiteType,
    pub keywords: &'static [Keyword],
}

pub static KEYWORD_SETS: &[KeywordSet] = &[
    KeywordSet {
        campsite_type: CampsiteType::Camping,
        keywords: &[
            kw("camping", DISTINCTIVE),
            kw("campground", DISTINCTIVE),
            kw("camp ground", DISTINCTIVE),
            kw("campsite", DISTINCTIVE),
            kw("camp site", DISTINCTIVE),
            kw("แคมป์ปิ้ง", DISTINCTIVE),
            kw("แคมปิ้ง", DISTINCTIVE),
            kw("ลานกางเต็นท์", DISTINCTIVE),
            kw("ลานกางเต๊นท์", DISTINCTIVE),
            kw("ลานแคมป์", DISTINCTIVE),
            kw("tent site", MODERATE),
            kw("tent ground", MODERATE),
            kw("กางเต็นท์", MODERATE),
            kw("แคมป์", MODERATE),
            kw("camp", WEAK),
        ],
    },
    KeywordSet {
        campsite_type: CampsiteType::Glamping,
        keywords: &[
            kw("glamping", DISTINCTIVE),
            kw("glamp", DISTINCTIVE),
            kw("แกลมปิ้ง", DISTINCTIVE),
            kw("แกลมปิง", DISTINCTIVE),
            kw("แกรมปิ้ง", DISTINCTIVE),
            kw("luxury tent", MODERATE),
            kw("resort tent", MODERATE),
            kw("safari tent", MODERATE),
            kw("bell tent", MODERATE),
            kw("dome tent", MODERATE),
            kw("เต็นท์หรู", MODERATE),
            kw("เต็นท์โดม", MODERATE),
            kw("dome", WEAK),
            kw("โดม", WEAK),
        ],
    },
    KeywordSet {
        campsite_type: CampsiteType::TentedResort,
        keywords: &[
            kw("tented resort", DISTINCTIVE),
            kw("tented camp", DISTINCTIVE),
            kw("tent resort", DISTINCTIVE),
            kw("รีสอร์ทเต็นท์", DISTINCTIVE),
            kw("เต็นท์รีสอร์ท", DISTINCTIVE),
            kw("รีสอร์ตเต็นท์", DISTINCTIVE),
            kw("resort", MODERATE),
            kw("รีสอร์ท", MODERATE),
            kw("รีสอร์ต", MODERATE),
        ],
    },
    KeywordSet {
        campsite_type: CampsiteType::Bungalow,
        keywords: &[
            kw("bungalow", DISTINCTIVE),
            kw("บังกะโล", DISTINCTIVE),
            kw("บังกาโล", DISTINCTIVE),
            kw("cabin", DISTINCTIVE),
            kw("เคบิน", DISTINCTIVE),
            kw("cottage", MODERATE),
            kw("chalet", MODERATE),
            kw("hut", MODERATE),
            kw("กระท่อม", MODERATE),
            kw("บ้านพัก", MODERATE),
            kw("homestay", WEAK),
            kw("โฮมสเตย์", WEAK),
        ],
    },
];

// ---------------------------------------------------------------------------
// Category-tag signals
// ---------------------------------------------------------------------------

pub struct TagSignal {
    /// Provider tags (lowercase) treated as the same signal.
    pub aliases: &'static [&'static str],
    /// Tag weight contributed to each entry.
    pub weights: &'static [(CampsiteType, u32)],
}

pub static TAG_SIGNALS: &[TagSignal] = &[
    TagSignal {
        aliases: &["campground", "campsite", "camping", "camp_ground"],
        weights: &[(CampsiteType::Camping, 2), (CampsiteType::Glamping, 1)],
    },
    TagSignal {
        aliases: &["rv_park"],
        weights: &[(CampsiteType::Camping, 1)],
    },
    TagSignal {
        aliases: &["lodging", "hotel", "guest_house"],
        weights: &[
            (CampsiteType::Glamping, 1),
            (CampsiteType::TentedResort, 1),
            (CampsiteType::Bungalow, 1),
        ],
    },
    TagSignal {
        aliases: &["resort", "resort_hotel"],
        weights: &[(CampsiteType::TentedResort, 2), (CampsiteType::Glamping, 1)],
    },
];

/// Entries a price tier argues for.
///
/// `>= 4` is "upscale camping", `3` is resort-priced, `<= 1` is budget.
pub fn price_favored(price_level: Option<u8>) -> &'static [CampsiteType] {
    match price_level {
        Some(level) if level >= 4 => &[CampsiteType::Glamping],
        Some(3) => &[CampsiteType::Glamping, CampsiteType::TentedResort],
        Some(0 | 1) => &[CampsiteType::Camping, CampsiteType::Bungalow],
        _ => &[],
    }
}
