//! Centralized constants for default endpoints and UA.

/// UA sent with every feed request.
pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (compatible; LiveDataDashboard/1.0)";

/// Where the static site (and its `data/` directory) is served from by default.
pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

/// News feed path, relative to the base URL.
pub(crate) const DEFAULT_NEWS_PATH: &str = "data/news.json";

/// UF/m² price table path, relative to the base URL.
pub(crate) const DEFAULT_ZONES_PATH: &str = "data/ufm2.json";

/// Query parameter carrying the cache-busting stamp.
pub(crate) const CACHE_BUST_PARAM: &str = "v";
