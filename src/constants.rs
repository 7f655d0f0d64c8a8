pub const FEED_URL: &str = "https://www.studentenwerk-dresden.de/feeds/speiseplan.rss";

pub const DETAIL_BASE_URL: &str = "https://www.studentenwerk-dresden.de";

// detail pages are positional: three h2+ul pairs inside #speiseplandetails,
// only the heading text confirms which section is which
pub const INGREDIENTS_HEADING: &str = "Zutaten";
pub const ALLERGENS_HEADING: &str = "Allergene";
pub const EXTRAS_HEADING: &str = "Weitere Informationen";

pub const STALE_WINDOW_MINUTES: i64 = 30;

/// Upper bound on simultaneous detail-page fetches when enriching a whole plan.
pub const DETAIL_FETCH_LIMIT: usize = 8;
