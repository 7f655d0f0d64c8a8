use crate::types::PricePair;

/// Splits a feed title like `"Gulasch (2,80/4,60 €)"` into the meal name and
/// its prices. Titles without a `" ("` delimiter carry no price at all; a
/// price block with more than two components is treated as no price rather
/// than failing the whole item.
pub fn parse_price_pair(title: &str) -> (String, Option<PricePair>) {
    let Some((name, price_block)) = title.split_once(" (") else {
        return (title.to_string(), None);
    };

    let components: Vec<&str> = price_block.split('/').collect();
    let price = match components.as_slice() {
        [student] => Some(PricePair {
            student: parse_price_component(student),
            employee: None,
        }),
        [student, employee] => Some(PricePair {
            student: parse_price_component(student),
            employee: Some(parse_price_component(employee)),
        }),
        _ => None,
    };

    (name.to_string(), price)
}

// feed prices use a German decimal comma and a trailing currency sign
fn parse_price_component(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '+' | '-'))
        .collect();

    cleaned.replace(',', ".").parse().unwrap_or(0.0)
}

/// Extracts the numeric meal id embedded in a detail-page link by keeping only
/// its digits. A link without digits yields 0.
pub fn parse_id_from_link(link: &str) -> u64 {
    let digits: String = link.chars().filter(|c| c.is_ascii_digit()).collect();

    digits.parse().unwrap_or(0)
}
