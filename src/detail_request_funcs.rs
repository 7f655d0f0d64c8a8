use std::sync::LazyLock;

use scraper::{Element, ElementRef, Html, Selector};
use url::Url;

use crate::constants::{
    ALLERGENS_HEADING, DETAIL_BASE_URL, EXTRAS_HEADING, INGREDIENTS_HEADING,
};
use crate::types::{Allergen, Ingredient, Meal};

static IMAGE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"a#essenfoto"#).unwrap());
static LIST_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"#speiseplandetails ul"#).unwrap());
static LIST_ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());

/// Enriches a meal with the photo, ingredients and allergens from its detail
/// page. Never fails: every missing or unexpected structural element leaves
/// the corresponding field unset and is at most worth a diagnostic.
pub fn enrich(meal: &Meal, detail_html: &str) -> Meal {
    let document = Html::parse_document(detail_html);
    let mut enriched = meal.clone();

    // most meals have no photo, so a missing anchor is not worth a diagnostic
    if let Some(anchor) = document.select(&IMAGE_SEL).next() {
        if let Some(href) = anchor.value().attr("href") {
            match Url::parse(DETAIL_BASE_URL).and_then(|base| base.join(href)) {
                Ok(url) => enriched.image_url = Some(url),
                Err(e) => log::warn!("'{}': unusable image link '{}': {}", meal.name, href, e),
            }
        }
    }

    let lists: Vec<ElementRef> = document.select(&LIST_SEL).collect();

    for label in labelled_list_items(&lists, 0, INGREDIENTS_HEADING, &meal.name) {
        match Ingredient::from_label(&label) {
            Some(ingredient) => {
                enriched.ingredients.insert(ingredient);
            }
            None => log::warn!("'{}': unknown ingredient label '{}'", meal.name, label),
        }
    }

    for label in labelled_list_items(&lists, 1, ALLERGENS_HEADING, &meal.name) {
        match Allergen::from_label(&label) {
            Some(allergen) => {
                enriched.allergens.insert(allergen);
            }
            None => log::warn!("'{}': unknown allergen label '{}'", meal.name, label),
        }
    }

    // the site models dietary flags (vegan etc.) as pseudo-ingredients in the
    // third list; they land in the same set as the real ingredients
    for label in labelled_list_items(&lists, 2, EXTRAS_HEADING, &meal.name) {
        match Ingredient::from_label(&label) {
            Some(ingredient) => {
                enriched.ingredients.insert(ingredient);
            }
            None => log::warn!("'{}': unknown info label '{}'", meal.name, label),
        }
    }

    enriched
}

// The page layout is positional: the Nth list belongs to a section only if the
// h2 directly before it carries that section's canonical heading. List content
// alone never decides the section.
fn labelled_list_items(
    lists: &[ElementRef],
    index: usize,
    heading: &str,
    meal_name: &str,
) -> Vec<String> {
    let Some(list) = lists.get(index) else {
        log::debug!("'{}': detail page has no '{}' list", meal_name, heading);
        return Vec::new();
    };

    let heading_text = list
        .prev_sibling_element()
        .filter(|el| el.value().name() == "h2")
        .map(|el| el.text().collect::<String>().trim().to_string());

    if heading_text.as_deref() != Some(heading) {
        log::warn!("'{}': section '{}' not found where expected", meal_name, heading);
        return Vec::new();
    }

    list.select(&LIST_ITEM_SEL)
        .map(|li| li.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn bare_meal() -> Meal {
        Meal {
            id: 101,
            name: "Gulasch".to_string(),
            price: None,
            ingredients: BTreeSet::new(),
            allergens: BTreeSet::new(),
            image_url: None,
        }
    }

    const DETAIL: &str = r#"<html><body>
        <a id="essenfoto" href="/bilder/gross/101.jpg">Foto</a>
        <div id="speiseplandetails">
            <h2>Zutaten</h2>
            <ul>
                <li>Menü enthält Schweinefleisch</li>
                <li>Menü enthält Knoblauch</li>
                <li>Menü enthält Einhorn</li>
            </ul>
            <h2>Allergene</h2>
            <ul>
                <li>Glutenhaltiges Getreide (A)</li>
                <li>Senf (J)</li>
            </ul>
            <h2>Weitere Informationen</h2>
            <ul>
                <li>Menü enthält Alkohol</li>
            </ul>
        </div>
    </body></html>"#;

    #[test]
    fn enrich_fills_image_ingredients_and_allergens() {
        let meal = enrich(&bare_meal(), DETAIL);

        assert_eq!(
            meal.image_url.as_ref().map(Url::as_str),
            Some("https://www.studentenwerk-dresden.de/bilder/gross/101.jpg")
        );
        // the unknown "Einhorn" entry is dropped, the rest kept; the third
        // section merges into the ingredient set
        assert_eq!(
            meal.ingredients,
            BTreeSet::from([Ingredient::Pork, Ingredient::Garlic, Ingredient::Alcohol])
        );
        assert_eq!(
            meal.allergens,
            BTreeSet::from([Allergen::Gluten, Allergen::Mustard])
        );
    }

    #[test]
    fn enrich_is_idempotent_per_fresh_copy() {
        let first = enrich(&bare_meal(), DETAIL);
        let second = enrich(&bare_meal(), DETAIL);
        assert_eq!(first, second);
    }

    #[test]
    fn mismatched_heading_skips_only_that_section() {
        let detail = r#"<html><body><div id="speiseplandetails">
            <h2>Beschreibung</h2>
            <ul><li>Menü enthält Schweinefleisch</li></ul>
            <h2>Allergene</h2>
            <ul><li>Soja (F)</li></ul>
        </div></body></html>"#;

        let meal = enrich(&bare_meal(), detail);

        assert!(meal.ingredients.is_empty());
        assert_eq!(meal.allergens, BTreeSet::from([Allergen::Soy]));
    }

    #[test]
    fn missing_structure_leaves_everything_unset() {
        let meal = enrich(&bare_meal(), "<html><body><p>Wartungsarbeiten</p></body></html>");

        assert_eq!(meal, bare_meal());
    }

    #[test]
    fn image_absent_when_anchor_missing() {
        let detail = r#"<html><body><div id="speiseplandetails">
            <h2>Zutaten</h2><ul><li>Menü ist vegan</li></ul>
        </div></body></html>"#;

        let meal = enrich(&bare_meal(), detail);

        assert_eq!(meal.image_url, None);
        assert_eq!(meal.ingredients, BTreeSet::from([Ingredient::Vegan]));
    }
}
