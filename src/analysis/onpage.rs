use crate::document::PageDocument;
use crate::model::{DescriptionSignals, ImageSignals, LinkSignals, OnPageSignals, TitleSignals};
use crate::url::is_internal;

/// Title lengths (characters) considered optimal
pub const TITLE_OPTIMAL: std::ops::RangeInclusive<usize> = 30..=60;

/// Descriptions shorter than this are too short
pub const DESCRIPTION_MIN: usize = 120;

/// Descriptions longer than this are too long
pub const DESCRIPTION_MAX: usize = 160;

pub fn analyze_onpage(doc: &PageDocument) -> OnPageSignals {
    OnPageSignals {
        title: title_signals(doc.title().as_deref()),
        description: description_signals(doc.meta_description().as_deref()),
        h1: doc.heading_count(1),
        h2: doc.heading_count(2),
        h3: doc.heading_count(3),
        images: image_signals(doc),
        canonical: doc.canonical().is_some(),
        open_graph: doc.has_open_graph(),
        twitter_card: doc.has_twitter_card(),
        structured_data: doc.has_structured_data(),
        links: link_signals(doc),
    }
}

fn title_signals(title: Option<&str>) -> TitleSignals {
    let length = title.map(|t| t.chars().count()).unwrap_or(0);
    TitleSignals {
        length,
        optimal: TITLE_OPTIMAL.contains(&length),
    }
}

fn description_signals(description: Option<&str>) -> DescriptionSignals {
    match description {
        None => DescriptionSignals {
            missing: true,
            ..Default::default()
        },
        Some(text) => {
            let length = text.chars().count();
            DescriptionSignals {
                missing: false,
                too_long: length > DESCRIPTION_MAX,
                too_short: length < DESCRIPTION_MIN,
                length,
            }
        }
    }
}

fn image_signals(doc: &PageDocument) -> ImageSignals {
    let images = doc.images();
    let valid = images.iter().filter(|image| image.has_alt()).count();
    ImageSignals {
        total: images.len(),
        missing: images.len() - valid,
        valid,
    }
}

fn link_signals(doc: &PageDocument) -> LinkSignals {
    let mut signals = LinkSignals::default();
    for link in doc.links() {
        signals.total += 1;
        if is_internal(doc.base_url(), &link.url) {
            signals.internal += 1;
        } else {
            signals.external += 1;
            if link.nofollow {
                signals.external_nofollow += 1;
            }
        }
    }
    signals
}
