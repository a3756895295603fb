//! Score calculation
//!
//! Deterministic weighted sums over the signal sets. Every score is clamped
//! to 0..=100, and a metric that was never measured earns no points.

use crate::analysis::{READABLE_SCORE, THIN_CONTENT_WORDS};
use crate::model::{ContentSignals, KeywordRanking, OnPageSignals, Scores, TechnicalSignals};

/// Largest Contentful Paint below this (seconds) earns points
pub const LCP_GOOD_SECS: f64 = 2.5;

/// First Contentful Paint below this (seconds) earns points
pub const FCP_GOOD_SECS: f64 = 1.8;

/// Cumulative Layout Shift above this is flagged
pub const CLS_GOOD: f64 = 0.1;

fn points(condition: bool, weight: u32) -> u32 {
    if condition {
        weight
    } else {
        0
    }
}

fn cap(total: u32) -> u8 {
    total.min(100) as u8
}

pub fn technical_score(t: &TechnicalSignals) -> u8 {
    cap(points(t.https, 30)
        + points(t.mobile_viewport, 20)
        + points(t.robots_txt_present, 15)
        + points(t.sitemap_present, 15)
        + points(t.lcp.map(|v| v < LCP_GOOD_SECS).unwrap_or(false), 10)
        + points(t.fcp.map(|v| v < FCP_GOOD_SECS).unwrap_or(false), 10))
}

pub fn onpage_score(o: &OnPageSignals) -> u8 {
    cap(points(o.title.length > 0, 20)
        + points(o.title.optimal, 10)
        + points(!o.description.missing, 20)
        + points(!o.description.too_long && !o.description.too_short, 10)
        + points(o.h1 == 1, 15)
        + points(o.h2 > 0, 10)
        + points(o.images.valid > 0, 10)
        + points(o.canonical, 5))
}

pub fn content_score(c: &ContentSignals) -> u8 {
    cap(points(c.word_count > THIN_CONTENT_WORDS, 30)
        + points(c.readability > READABLE_SCORE, 30)
        + points(!c.keyword_density.is_empty(), 20)
        + points(!c.duplicate, 20))
}

/// `round(0.4 * technical + 0.4 * onpage + 0.2 * content)`
pub fn overall_score(technical: u8, onpage: u8, content: u8) -> u8 {
    let weighted = 0.4 * technical as f64 + 0.4 * onpage as f64 + 0.2 * content as f64;
    weighted.round().clamp(0.0, 100.0) as u8
}

/// Visibility weight of one search position
///
/// | Position | Weight |
/// |----------|--------|
/// | 1-3 | 100 |
/// | 4-10 | 70 |
/// | 11-20 | 40 |
/// | 21-100 | 10 |
/// | not found | 0 |
pub fn position_weight(rank: Option<u32>) -> u32 {
    match rank {
        Some(1..=3) => 100,
        Some(4..=10) => 70,
        Some(11..=20) => 40,
        Some(21..=100) => 10,
        _ => 0,
    }
}

/// Mean position weight across rankings; `None` when nothing was ranked
pub fn competitor_score(rankings: &[KeywordRanking]) -> Option<u8> {
    if rankings.is_empty() {
        return None;
    }
    let total: u32 = rankings.iter().map(|r| position_weight(r.rank)).sum();
    Some((total as f64 / rankings.len() as f64).round() as u8)
}

/// Computes every score for a result's signal sets
pub fn calculate_scores(
    technical: &TechnicalSignals,
    onpage: &OnPageSignals,
    content: &ContentSignals,
    rankings: &[KeywordRanking],
) -> Scores {
    let t = technical_score(technical);
    let o = onpage_score(onpage);
    let c = content_score(content);
    Scores {
        overall: overall_score(t, o, c),
        technical: t,
        onpage: o,
        content: c,
        competitor: competitor_score(rankings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DescriptionSignals, ImageSignals, KeywordDensity, TitleSignals};
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn foundation() -> TechnicalSignals {
        TechnicalSignals {
            https: true,
            mobile_viewport: true,
            robots_txt_present: true,
            sitemap_present: true,
            crawlable: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_technical_without_metrics() {
        assert_eq!(technical_score(&foundation()), 80);
    }

    #[test]
    fn test_technical_metric_thresholds() {
        let mut t = foundation();
        t.lcp = Some(2.49);
        t.fcp = Some(1.8);
        assert_eq!(technical_score(&t), 90);
        t.fcp = Some(1.0);
        assert_eq!(technical_score(&t), 100);
        t.lcp = Some(2.5);
        assert_eq!(technical_score(&t), 90);
    }

    #[test]
    fn test_technical_empty() {
        assert_eq!(technical_score(&TechnicalSignals::default()), 0);
    }

    #[test]
    fn test_onpage_full_marks() {
        let o = OnPageSignals {
            title: TitleSignals {
                length: 45,
                optimal: true,
            },
            description: DescriptionSignals {
                missing: false,
                too_long: false,
                too_short: false,
                length: 140,
            },
            h1: 1,
            h2: 2,
            images: ImageSignals {
                total: 1,
                missing: 0,
                valid: 1,
            },
            canonical: true,
            ..Default::default()
        };
        assert_eq!(onpage_score(&o), 100);
    }

    #[test]
    fn test_missing_description_keeps_length_points() {
        // Neither too long nor too short, so only presence is lost
        let o = OnPageSignals {
            description: DescriptionSignals {
                missing: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(onpage_score(&o), 10);
    }

    #[test]
    fn test_content_score() {
        let c = ContentSignals {
            word_count: 301,
            readability: 51,
            keyword_density: vec![KeywordDensity {
                term: "bread".to_string(),
                pct: 3.0,
            }],
            ..Default::default()
        };
        assert_eq!(content_score(&c), 100);

        let duplicate = ContentSignals {
            duplicate: true,
            word_count: 300,
            readability: 50,
            ..Default::default()
        };
        assert_eq!(content_score(&duplicate), 0);
    }

    #[test]
    fn test_overall_formula_over_random_signals() {
        let mut rng = StdRng::seed_from_u64(0x5e0_a0d1);
        for _ in 0..500 {
            let t = TechnicalSignals {
                https: rng.gen(),
                mobile_viewport: rng.gen(),
                robots_txt_present: rng.gen(),
                sitemap_present: rng.gen(),
                crawlable: rng.gen(),
                lcp: rng.gen::<bool>().then(|| rng.gen_range(0.5..6.0)),
                fcp: rng.gen::<bool>().then(|| rng.gen_range(0.3..4.0)),
                tti: None,
                cls: None,
            };
            let o = OnPageSignals {
                title: TitleSignals {
                    length: rng.gen_range(0..90),
                    optimal: rng.gen(),
                },
                h1: rng.gen_range(0..3),
                h2: rng.gen_range(0..3),
                canonical: rng.gen(),
                ..Default::default()
            };
            let c = ContentSignals {
                word_count: rng.gen_range(0..1000),
                readability: rng.gen_range(0..=100),
                duplicate: rng.gen(),
                ..Default::default()
            };

            let scores = calculate_scores(&t, &o, &c, &[]);
            let expected = (0.4 * scores.technical as f64
                + 0.4 * scores.onpage as f64
                + 0.2 * scores.content as f64)
                .round() as u8;
            assert_eq!(scores.overall, expected);
            assert!(scores.technical <= 100 && scores.onpage <= 100 && scores.content <= 100);
            assert_eq!(scores.competitor, None);
        }
    }

    #[test]
    fn test_position_weights() {
        assert_eq!(position_weight(Some(1)), 100);
        assert_eq!(position_weight(Some(3)), 100);
        assert_eq!(position_weight(Some(4)), 70);
        assert_eq!(position_weight(Some(10)), 70);
        assert_eq!(position_weight(Some(20)), 40);
        assert_eq!(position_weight(Some(21)), 10);
        assert_eq!(position_weight(Some(100)), 10);
        assert_eq!(position_weight(None), 0);
    }

    #[test]
    fn test_competitor_score() {
        let ranking = |rank| KeywordRanking {
            keyword: "k".to_string(),
            rank,
            url: None,
            title: None,
            date: Utc::now(),
        };
        assert_eq!(competitor_score(&[]), None);
        assert_eq!(
            competitor_score(&[ranking(Some(2)), ranking(Some(15)), ranking(None)]),
            Some(47)
        );
    }
}
