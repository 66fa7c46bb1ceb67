//! Station filter and its query-string encoding.

use url::form_urlencoded;

/// Filter for `GET /stations`.
///
/// Every field is optional: zero numbers and empty strings are left out of the
/// query string entirely. The default filter matches all stations (the API
/// caps the result at 10,000).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StationFilter {
    /// Index of the first result to return
    pub offset: u32,
    /// Maximum number of results
    pub limit: u32,
    /// Station name search; `*` and `?` work as wildcards
    pub searchstring: String,
    /// Station category or range, e.g. `1` or `1-3`
    pub category: String,
    /// Federal state name, e.g. `bayern`
    pub federalstate: String,
    /// EVA number
    pub eva: u64,
    /// RIL100 identifier, e.g. `KA`
    pub ril: String,
    /// `and` or `or`, combining the other criteria
    pub logicaloperator: String,
}

impl StationFilter {
    /// An empty filter matching all stations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Skip the first `offset` results.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Return at most `limit` results.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Search station names; `*` and `?` are wildcards.
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.searchstring = search.into();
        self
    }

    /// Restrict to a station category or range, e.g. `1-3`.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Restrict to one federal state.
    pub fn with_federal_state(mut self, state: impl Into<String>) -> Self {
        self.federalstate = state.into();
        self
    }

    /// Match an EVA number.
    pub fn with_eva(mut self, eva: u64) -> Self {
        self.eva = eva;
        self
    }

    /// Match a RIL100 identifier.
    pub fn with_ril(mut self, ril: impl Into<String>) -> Self {
        self.ril = ril.into();
        self
    }

    /// Combine criteria with `and` or `or`.
    pub fn with_logical_operator(mut self, operator: impl Into<String>) -> Self {
        self.logicaloperator = operator.into();
        self
    }

    /// The parameters that are set, in their canonical order.
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.offset != 0 {
            pairs.push(("offset", self.offset.to_string()));
        }
        if self.limit != 0 {
            pairs.push(("limit", self.limit.to_string()));
        }
        push_text(&mut pairs, "searchstring", &self.searchstring);
        push_text(&mut pairs, "category", &self.category);
        push_text(&mut pairs, "federalstate", &self.federalstate);
        if self.eva != 0 {
            pairs.push(("eva", self.eva.to_string()));
        }
        push_text(&mut pairs, "ril", &self.ril);
        push_text(&mut pairs, "logicaloperator", &self.logicaloperator);
        pairs
    }

    /// Encode as a query string (without the leading `?`).
    ///
    /// Returns an empty string when nothing is set.
    pub fn to_query_string(&self) -> String {
        serialize(self)
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &str) {
    if !value.is_empty() {
        pairs.push((key, value.to_string()));
    }
}

/// Encode `filter` as an `application/x-www-form-urlencoded` query string.
pub fn serialize(filter: &StationFilter) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in filter.pairs() {
        serializer.append_pair(key, &value);
    }
    serializer.finish()
}
