use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::Utc;
use serde::Deserialize;

use crate::text_parse_funcs::{parse_id_from_link, parse_price_pair};
use crate::types::{Canteen, CatalogSnapshot, IngestionError, Meal};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    author: Option<String>,
    link: Option<String>,
}

/// Folds the raw feed into a full catalog snapshot: one canteen per distinct
/// author in first-seen order, meals grouped per canteen in feed order.
///
/// A feed that parses but yields no usable items is a valid, empty snapshot.
pub fn ingest(feed_xml: &str) -> Result<CatalogSnapshot, IngestionError> {
    let now = Instant::now();

    let rss: Rss = quick_xml::de::from_str(feed_xml).map_err(|e| {
        log::warn!("feed did not parse as RSS: {}", e);
        IngestionError::Server
    })?;

    let mut canteens: Vec<Canteen> = Vec::new();
    let mut meals_by_canteen: BTreeMap<String, Vec<Meal>> = BTreeMap::new();

    for item in rss.channel.items {
        // title, author and link are all needed to form a meal/canteen pair
        let (Some(title), Some(author), Some(link)) = (item.title, item.author, item.link) else {
            continue;
        };
        if title.is_empty() || author.is_empty() || link.is_empty() {
            continue;
        }

        let (name, price) = parse_price_pair(&title);
        let meal = Meal {
            id: parse_id_from_link(&link),
            name,
            price,
            ingredients: BTreeSet::new(),
            allergens: BTreeSet::new(),
            image_url: None,
        };

        match meals_by_canteen.entry(author) {
            Entry::Vacant(entry) => {
                canteens.push(Canteen::named(entry.key()));
                entry.insert(vec![meal]);
            }
            Entry::Occupied(mut entry) => entry.get_mut().push(meal),
        }
    }

    log::debug!(
        "feed → {} canteens in {:.2?}",
        canteens.len(),
        now.elapsed()
    );

    Ok(CatalogSnapshot {
        canteens,
        meals_by_canteen,
        last_updated: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Speiseplan</title>
    <item>
      <title>Gulasch (2,80/4,60 €)</title>
      <author>Alte Mensa</author>
      <link>https://www.studentenwerk-dresden.de/mensen/speiseplan/details-101.html</link>
    </item>
    <item>
      <title>Pastateller (2,20 €)</title>
      <author>Alte Mensa</author>
      <link>https://www.studentenwerk-dresden.de/mensen/speiseplan/details-102.html</link>
    </item>
    <item>
      <title>Tagessuppe</title>
      <author>Mensa Reichenbachstraße</author>
      <link>https://www.studentenwerk-dresden.de/mensen/speiseplan/details-103.html</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn one_canteen_per_author_in_feed_order() {
        let snapshot = ingest(FEED).unwrap();

        let names: Vec<&str> = snapshot.canteens.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Alte Mensa", "Mensa Reichenbachstraße"]);

        let alte = &snapshot.meals_by_canteen["Alte Mensa"];
        assert_eq!(alte.len(), 2);
        assert_eq!(alte[0].name, "Gulasch");
        assert_eq!(alte[0].id, 101);
        assert_eq!(alte[1].name, "Pastateller");

        let reichenbach = &snapshot.meals_by_canteen["Mensa Reichenbachstraße"];
        assert_eq!(reichenbach.len(), 1);
        assert_eq!(reichenbach[0].price, None);
    }

    #[test]
    fn canteen_list_and_meal_map_carry_the_same_names() {
        let snapshot = ingest(FEED).unwrap();
        assert_eq!(snapshot.canteens.len(), snapshot.meals_by_canteen.len());
        for canteen in &snapshot.canteens {
            assert!(snapshot.meals_by_canteen.contains_key(&canteen.name));
        }
    }

    #[test]
    fn items_missing_required_fields_are_skipped() {
        let feed = r#"<rss><channel>
            <item><title>No author or link</title></item>
            <item><title>Empty author</title><author></author><link>details-7.html</link></item>
            <item><title>Kept (1,00 €)</title><author>Mensa</author><link>details-8.html</link></item>
        </channel></rss>"#;

        let snapshot = ingest(feed).unwrap();
        assert_eq!(snapshot.canteens.len(), 1);
        assert_eq!(snapshot.meals_by_canteen["Mensa"].len(), 1);
        assert_eq!(snapshot.meals_by_canteen["Mensa"][0].id, 8);
    }

    #[test]
    fn feed_without_items_is_an_empty_snapshot() {
        let snapshot = ingest("<rss><channel><title>leer</title></channel></rss>").unwrap();
        assert!(snapshot.canteens.is_empty());
        assert!(snapshot.meals_by_canteen.is_empty());
    }

    #[test]
    fn unparseable_payload_is_a_server_error() {
        assert_eq!(
            ingest("<html>504 Gateway Time-out</html").unwrap_err(),
            IngestionError::Server
        );
    }
}
