//! Heuristic keyword classifier.
//!
//! [`HeuristicClassifier`] scores every taxonomy entry from bilingual keyword
//! hits in the name/address, provider category tags, and the price tier, then
//! picks the best entry.  It never touches the network and never fails: an
//! input with no usable signal comes back as low-confidence Camping.
//!
//! # Scoring
//!
//! ```text
//! score      = 2 × keyword weight + tag weight + price bonus
//! confidence = base(best keyword weight) + corroboration − ambiguity
//! ```
//!
//! Confidence is computed in hundredths so that results are exact
//! (`0.95`, not `0.9500000000000001`).

use crate::classifier::keywords::{
    price_favored, DISTINCTIVE, KEYWORD_SETS, MODERATE, TAG_SIGNALS, WEAK,
};
use crate::place::PlaceCandidate;
use crate::taxonomy::{CampsiteType, ClassificationResult};

/// Confidence returned when nothing in the input points anywhere.
pub const NO_SIGNAL_CONFIDENCE: f64 = 0.30;

const MAX_CONFIDENCE_PCT: i32 = 95;
const PRICE_SHIFTED_CAP_PCT: i32 = 50;

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

/// Per-entry signals gathered from one candidate, indexed by
/// [`CampsiteType::index`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Evidence {
    /// Sum of matched keyword weights.
    pub keyword_weight: [u32; 4],
    /// Highest single matched keyword weight.
    pub best_hit: [u32; 4],
    /// Number of distinct keywords matched.
    pub hits: [usize; 4],
    /// Sum of category-tag weights.
    pub tag_weight: [u32; 4],
    /// Price-tier bonus (0 or 1).
    pub price_bonus: [u32; 4],
}

impl Evidence {
    /// Gather all signals for `place`.
    pub fn gather(place: &PlaceCandidate) -> Self {
        let mut ev = Evidence::default();
        let text = normalize(&place.name, &place.formatted_address);

        for set in KEYWORD_SETS {
            let i = set.campsite_type.index();

            let mut ordered: Vec<_> = set.keywords.iter().collect();
            ordered.sort_by(|a, b| b.term.chars().count().cmp(&a.term.chars().count()));

            let mut remaining = text.clone();
            for k in ordered {
                if let Some(rest) = consume(&remaining, k.term) {
                    remaining = rest;
                    ev.keyword_weight[i] += k.weight;
                    ev.best_hit[i] = ev.best_hit[i].max(k.weight);
                    ev.hits[i] += 1;
                }
            }
        }

        let tags: Vec<String> = place
            .category_tags
            .iter()
            .map(|t| t.trim().to_lowercase())
            .collect();
        for signal in TAG_SIGNALS {
            if tags.iter().any(|t| signal.aliases.contains(&t.as_str())) {
                for (ty, w) in signal.weights {
                    ev.tag_weight[ty.index()] += w;
                }
            }
        }

        for ty in price_favored(place.price_level) {
            ev.price_bonus[ty.index()] = 1;
        }

        ev
    }

    pub fn score(&self, ty: CampsiteType) -> u32 {
        let i = ty.index();
        2 * self.keyword_weight[i] + self.tag_weight[i] + self.price_bonus[i]
    }

    /// `true` when no keyword or tag points at any entry.
    pub fn is_empty(&self) -> bool {
        self.hits.iter().all(|&h| h == 0) && self.tag_weight.iter().all(|&w| w == 0)
    }

    /// Highest-scoring entry; ties go to the lowest `typeId`.
    pub fn leader(&self) -> CampsiteType {
        let mut best = CampsiteType::Camping;
        for ty in CampsiteType::ALL {
            if self.score(ty) > self.score(best) {
                best = ty;
            }
        }
        best
    }
}

/// Lowercase `name` + `address` into one searchable string.
///
/// ASCII punctuation becomes a space and whitespace runs collapse, so
/// `"Tent-Site (Khao Yai)"` and `"tent site khao yai"` match the same terms.
/// Thai text passes through untouched.
pub fn normalize(name: &str, address: &str) -> String {
    let joined = format!("{name} {address}").to_lowercase();
    let spaced: String = joined
        .chars()
        .map(|c| match c {
            '-' | '_' | '/' | ',' | '.' | '(' | ')' | '|' | '&' => ' ',
            other => other,
        })
        .collect();
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// ASCII terms up to this length only match whole words.
const WHOLE_WORD_MAX_LEN: usize = 5;

/// Blank every occurrence of `term` out of `text`; `None` when it has none.
///
/// Short English terms (`hut`, `camp`, `dome`) must be a whole word, with an
/// optional plural `s`, so `phutawan` and `shuttle` do not count as `hut`.
/// Thai has no word spacing, so Thai terms match anywhere.
fn consume(text: &str, term: &str) -> Option<String> {
    if !(term.is_ascii() && term.len() <= WHOLE_WORD_MAX_LEN) {
        return text.contains(term).then(|| text.replace(term, " "));
    }

    let mut matched = false;
    let words: Vec<&str> = text
        .split(' ')
        .map(|w| {
            if w == term || w.strip_suffix('s') == Some(term) {
                matched = true;
                ""
            } else {
                w
            }
        })
        .collect();
    matched.then(|| words.join(" "))
}

// ---------------------------------------------------------------------------
// HeuristicClassifier
// ---------------------------------------------------------------------------

/// Deterministic keyword/signal classifier.
///
/// # Example
/// ```rust
/// use campsite_classifier::classifier::HeuristicClassifier;
/// use campsite_classifier::place::PlaceCandidate;
///
/// let place = PlaceCandidate::new("Pai River Bungalow").with_tags(["lodging"]);
/// let result = HeuristicClassifier::new().classify(&place);
/// assert_eq!(result.type_name(), "Bungalow");
/// assert_eq!(result.confidence(), 0.95);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicClassifier;

impl HeuristicClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, place: &PlaceCandidate) -> ClassificationResult {
        let ev = Evidence::gather(place);

        if ev.is_empty() {
            return ClassificationResult::new(CampsiteType::Camping, NO_SIGNAL_CONFIDENCE);
        }

        let mut winner = ev.leader();
        let mut price_shifted = false;

        // Expensive campground listings without an explicit camping term are
        // staged/luxury sites.
        let high_price = place.price_level.is_some_and(|p| p >= 4);
        if winner == CampsiteType::Camping
            && high_price
            && ev.best_hit[CampsiteType::Camping.index()] < DISTINCTIVE
        {
            winner = CampsiteType::Glamping;
            price_shifted = true;
        }

        let pct = confidence_pct(&ev, winner, price_shifted);
        log::debug!(
            "heuristic: {:?} -> {} ({}%), evidence={:?}",
            place.name,
            winner,
            pct,
            ev
        );
        ClassificationResult::new(winner, pct as f64 / 100.0)
    }
}

fn confidence_pct(ev: &Evidence, winner: CampsiteType, price_shifted: bool) -> i32 {
    let i = winner.index();

    if ev.hits[i] == 0 {
        // Tag-only, no keyword corroboration.
        return match ev.tag_weight[i] {
            w if w >= 2 => 50,
            w if w > 0 => 40,
            _ => 30,
        };
    }

    let mut pct = match ev.best_hit[i] {
        DISTINCTIVE => 85,
        MODERATE => 75,
        WEAK => 60,
        _ => 30,
    };
    if ev.hits[i] > 1 {
        pct += 5;
    }
    if ev.tag_weight[i] > 0 {
        pct += 10;
    }
    if ev.price_bonus[i] > 0 {
        pct += 5;
    }
    let contested = CampsiteType::ALL
        .iter()
        .any(|&other| other != winner && ev.hits[other.index()] > 0);
    if contested {
        pct -= 15;
    }

    pct = pct.min(MAX_CONFIDENCE_PCT);
    if price_shifted {
        pct = pct.min(PRICE_SHIFTED_CAP_PCT);
    }
    pct.max(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
