use std::fmt;
use std::hash;

/// A header name. Comparison and hashing ignore ASCII case; the name is
/// written out as given.
#[derive(Debug, Clone)]
pub struct Header(String);

impl Header {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Header {}

impl hash::Hash for Header {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

impl From<String> for Header {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Header {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Header> for String {
    fn from(s: Header) -> Self {
        s.0
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered header multimap.
///
/// # Example
/// ```
/// use lighthttp::request::Headers;
///
/// let mut headers = Headers::new();
/// headers.add("Vary", "Accept");
/// headers.add("vary", "Origin");
/// assert_eq!(headers.get_all("VARY"), vec!["Accept", "Origin"]);
///
/// headers.set("Vary", "*");
/// assert_eq!(headers.get_all("Vary"), vec!["*"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Headers(Vec<(Header, String)>);

impl Headers {
    pub fn new() -> Self {
        Self(vec![])
    }
    /// Append a value, keeping any existing values for the name.
    pub fn add(&mut self, name: &str, value: &str) {
        self.0.push((Header::new(name), value.to_string()));
    }
    /// Replace every value for the name with a single value.
    pub fn set(&mut self, name: &str, value: &str) {
        let header = Header::new(name);
        match self.0.iter().position(|(h, _)| h == &header) {
            Some(first) => {
                self.0[first].1 = value.to_string();
                let mut idx = 0;
                self.0.retain(|(h, _)| {
                    let keep = idx <= first || h != &header;
                    idx += 1;
                    keep
                });
            }
            None => self.0.push((header, value.to_string())),
        }
    }
    /// First value for the name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let header = Header::new(name);
        self.0
            .iter()
            .find(|(h, _)| h == &header)
            .map(|(_, v)| v.as_str())
    }
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        let header = Header::new(name);
        self.0
            .iter()
            .filter(|(h, _)| h == &header)
            .map(|(_, v)| v.as_str())
            .collect()
    }
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
    pub fn remove(&mut self, name: &str) {
        let header = Header::new(name);
        self.0.retain(|(h, _)| h != &header);
    }
    pub fn iter(&self) -> impl Iterator<Item = (&Header, &str)> {
        self.0.iter().map(|(h, v)| (h, v.as_str()))
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
