use mongodb::bson::{Document, doc};

use crate::models::Class;

/// Filter over the `classes` collection built from a free-text term.
///
/// A blank term selects every class, sorted by subject. Otherwise a class
/// matches when its subject or location contains the term case-insensitively,
/// or when its price or spaces rendered as text contain it. The term is
/// escaped, so `C++` or `.` only ever match literally.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassQuery {
    term: Option<String>,
}

impl ClassQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn parse(raw: Option<&str>) -> Self {
        let term = raw
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_string);
        Self { term }
    }

    pub fn term(&self) -> Option<&str> {
        self.term.as_deref()
    }

    pub fn filter(&self) -> Document {
        let Some(term) = &self.term else {
            return Document::new();
        };
        let pattern = regex::escape(term);

        doc! {
            "$or": [
                { "subject": { "$regex": pattern.as_str(), "$options": "i" } },
                { "location": { "$regex": pattern.as_str(), "$options": "i" } },
                { "$expr": { "$regexMatch": {
                    "input": { "$toString": "$price" },
                    "regex": pattern.as_str(),
                    "options": "i"
                } } },
                { "$expr": { "$regexMatch": {
                    "input": { "$toString": "$spaces" },
                    "regex": pattern.as_str(),
                    "options": "i"
                } } }
            ]
        }
    }

    /// Sort order; only unfiltered listings are ordered.
    pub fn sort(&self) -> Option<Document> {
        self.term.is_none().then(|| doc! { "subject": 1 })
    }

    /// Evaluates the filter against a class without a database round trip.
    pub fn matches(&self, class: &Class) -> bool {
        let Some(term) = &self.term else {
            return true;
        };
        let needle = term.to_lowercase();
        let contains = |haystack: &str| haystack.to_lowercase().contains(&needle);

        contains(&class.subject)
            || contains(&class.location)
            || contains(&class.price.to_string())
            || contains(&class.spaces.to_string())
    }
}
