use std::fmt;

/// Tag reported when a review mentions none of the known topics.
pub const NO_TOPICS: &str = "None detected";

/// A review topic detected by keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Price,
    Quality,
    Delivery,
}

impl Topic {
    /// All topics, in the order they are tested and reported.
    pub const ALL: [Topic; 3] = [Topic::Price, Topic::Quality, Topic::Delivery];

    /// Lower-case keywords that flag this topic when found anywhere in a review.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::Price => &["price", "cost", "expensive", "cheap"],
            Topic::Quality => &["quality", "build", "material", "durable", "broken"],
            Topic::Delivery => &["delivery", "shipping", "late", "arrived", "courier"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Price => "Price",
            Topic::Quality => "Quality",
            Topic::Delivery => "Delivery",
        }
    }

    /// Whether any keyword occurs in `lowered`, which must already be lower-case.
    fn matches(&self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topics mentioned in `review`, by case-insensitive substring match.
///
/// Topics are independent: a review can hit none, some or all of them.
pub fn detect_topics(review: &str) -> Vec<Topic> {
    let lowered = review.to_lowercase();
    Topic::ALL
        .into_iter()
        .filter(|topic| topic.matches(&lowered))
        .collect()
}

/// Comma-joined topic names for `review`, or [`NO_TOPICS`].
pub fn topic_tag(review: &str) -> String {
    let topics = detect_topics(review);
    if topics.is_empty() {
        return NO_TOPICS.to_string();
    }

    topics
        .iter()
        .map(Topic::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
