//! Local SEO (Name/Address/Phone) signals

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::document::PageDocument;
use crate::model::LocalSeoSignals;

/// schema.org types treated as a local business
const LOCAL_BUSINESS_TYPES: &[&str] = &[
    "localbusiness",
    "restaurant",
    "store",
    "dentist",
    "physician",
    "legalservice",
    "attorney",
    "automotivebusiness",
    "autorepair",
    "homeandconstructionbusiness",
    "plumber",
    "electrician",
    "hairsalon",
    "beautysalon",
    "healthandbeautybusiness",
    "foodestablishment",
    "cafeorcoffeeshop",
    "bakery",
    "realestateagent",
    "medicalbusiness",
    "professionalservice",
    "lodgingbusiness",
    "hotel",
];

const MAP_HOSTS: &[&str] = &[
    "google.com/maps",
    "maps.google.",
    "openstreetmap.org",
    "bing.com/maps",
    "maps.apple.com",
];

static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?\(?\b\d{3}\)?[\s.\-]\d{3}[\s.\-]\d{4}\b")
        .expect("hardcoded regex pattern is valid")
});

static STREET_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,5}\s+(?:[a-z0-9.]+\s+){0,4}(?:street|st|avenue|ave|road|rd|boulevard|blvd|lane|ln|drive|dr|way|court|ct|place|pl)\b",
    )
    .expect("hardcoded regex pattern is valid")
});

/// Business details declared in JSON-LD
#[derive(Debug, Default)]
struct SchemaBusiness {
    found: bool,
    telephone: Option<String>,
    has_address: bool,
}

pub fn analyze_local(doc: &PageDocument) -> LocalSeoSignals {
    let text = doc.body_text();
    let schema = schema_business(&doc.json_ld_blocks());

    let mut phone_numbers: Vec<String> = Vec::new();
    let mut seen_digits: Vec<String> = Vec::new();
    let visible = doc
        .phone_links()
        .into_iter()
        .chain(PHONE_PATTERN.find_iter(&text).map(|m| m.as_str().to_string()));
    for number in visible {
        let digits = phone_key(&number);
        if digits.len() >= 7 && !seen_digits.contains(&digits) {
            seen_digits.push(digits);
            phone_numbers.push(number.trim().to_string());
        }
    }

    let nap_consistent = match &schema.telephone {
        Some(declared) => seen_digits.contains(&phone_key(declared)),
        None => seen_digits.len() <= 1,
    };

    LocalSeoSignals {
        phone_numbers,
        has_address: doc.has_address_element() || schema.has_address || STREET_PATTERN.is_match(&text),
        has_local_business_schema: schema.found,
        has_map_embed: doc.iframe_sources().iter().any(|src| {
            let src = src.to_ascii_lowercase();
            MAP_HOSTS.iter().any(|host| src.contains(host))
        }),
        nap_consistent,
    }
}

/// Trailing ten digits, so `+1 (512) 555-0100` and `512.555.0100` compare equal
fn phone_key(number: &str) -> String {
    let digits: Vec<char> = number.chars().filter(char::is_ascii_digit).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}

fn schema_business(blocks: &[String]) -> SchemaBusiness {
    let mut business = SchemaBusiness::default();
    for block in blocks {
        match serde_json::from_str::<Value>(block) {
            Ok(value) => visit(&value, &mut business),
            Err(e) => tracing::debug!("Skipping unparseable JSON-LD block: {}", e),
        }
    }
    business
}

fn visit(value: &Value, business: &mut SchemaBusiness) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| visit(item, business)),
        Value::Object(map) => {
            if map.get("@type").map(is_local_business_type).unwrap_or(false) {
                business.found = true;
                if business.telephone.is_none() {
                    business.telephone = map
                        .get("telephone")
                        .and_then(Value::as_str)
                        .map(str::to_string);
                }
                if map.contains_key("address") {
                    business.has_address = true;
                }
            }
            map.values().for_each(|child| visit(child, business));
        }
        _ => {}
    }
}

fn is_local_business_type(value: &Value) -> bool {
    match value {
        Value::String(name) => {
            let name = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
            LOCAL_BUSINESS_TYPES.contains(&name.as_str())
        }
        Value::Array(names) => names.iter().any(is_local_business_type),
        _ => false,
    }
}
