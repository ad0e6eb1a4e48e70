use url::Url;

/// Page URL parameter holding the active query.
pub const QUERY_PARAM: &str = "q";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("invalid page url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Address-bar capability: read and rewrite query parameters of the current page.
pub trait PageLocation {
    fn href(&self) -> String;
    fn query_param(&self, name: &str) -> Option<String>;
    /// Set `name` to `value` on the current history entry without pushing a new one.
    fn replace_query_param(&mut self, name: &str, value: &str);
}

/// Raw `q` value of the page, untrimmed; missing or empty yields `None`.
pub fn initial_query<L: PageLocation + ?Sized>(location: &L) -> Option<String> {
    location
        .query_param(QUERY_PARAM)
        .filter(|query| !query.is_empty())
}

/// In-memory page location; query rewrites edit the current URL in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocation {
    current: Url,
}

impl MemoryLocation {
    pub fn new(url: Url) -> Self {
        Self { current: url }
    }

    pub fn parse(href: &str) -> Result<Self, LocationError> {
        Ok(Self::new(Url::parse(href)?))
    }

    pub fn current(&self) -> &Url {
        &self.current
    }
}

impl PageLocation for MemoryLocation {
    fn href(&self) -> String {
        self.current.to_string()
    }

    fn query_param(&self, name: &str) -> Option<String> {
        self.current
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    // First occurrence is replaced in place, later duplicates are dropped,
    // other parameters keep their order.
    fn replace_query_param(&mut self, name: &str, value: &str) {
        let mut pairs: Vec<(String, String)> =
            self.current.query_pairs().into_owned().collect();
        let mut replaced = false;
        pairs.retain_mut(|(key, existing)| {
            if key.as_str() != name {
                return true;
            }
            if replaced {
                return false;
            }
            *existing = value.to_owned();
            replaced = true;
            true
        });
        if !replaced {
            pairs.push((name.to_owned(), value.to_owned()));
        }
        self.current.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
}

#[cfg(test)]
mod tests {
    use super::{initial_query, MemoryLocation, PageLocation, QUERY_PARAM};

    fn location(href: &str) -> MemoryLocation {
        MemoryLocation::parse(href).unwrap()
    }

    #[test]
    fn initial_query_is_verbatim() {
        assert_eq!(
            initial_query(&location("https://example.com/?q=%20cats%20")),
            Some(" cats ".to_string())
        );
        assert_eq!(
            initial_query(&location("https://example.com/?q=big+cats")),
            Some("big cats".to_string())
        );
    }

    #[test]
    fn initial_query_missing_or_empty_is_absent() {
        assert_eq!(initial_query(&location("https://example.com/")), None);
        assert_eq!(initial_query(&location("https://example.com/?q=")), None);
        assert_eq!(initial_query(&location("https://example.com/?x=1")), None);
    }

    #[test]
    fn replace_keeps_path_and_other_params() {
        let mut loc = location("https://example.com/swap/?lang=en&q=old&page=2&q=dup");
        loc.replace_query_param(QUERY_PARAM, "new query");

        assert_eq!(loc.query_param(QUERY_PARAM).as_deref(), Some("new query"));
        assert_eq!(loc.current().path(), "/swap/");
        let pairs: Vec<(String, String)> = loc.current().query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("lang".to_string(), "en".to_string()),
                ("q".to_string(), "new query".to_string()),
                ("page".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn replace_appends_when_missing() {
        let mut loc = location("https://example.com/");
        loc.replace_query_param(QUERY_PARAM, "cats & dogs");
        assert_eq!(loc.query_param(QUERY_PARAM).as_deref(), Some("cats & dogs"));
        assert_eq!(loc.href(), "https://example.com/?q=cats+%26+dogs");
    }
}
