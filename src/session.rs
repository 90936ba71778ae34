//! Session configuration
//!
//! A session captures the language, region and client version the API is
//! queried with, and turns them into the static headers every request carries.
//! It is immutable once built and can be shared freely between threads.

use thiserror::Error;
use ulid::Ulid;

/// Client version reported when none is given explicitly.
pub const DEFAULT_CLIENT_VERSION: &str = "8.9.8.108980200";

/// Base64 encoding of `{"purposes": [], "vendors": []}`.
const CONSENT_INFO: &str = "eyJwdXJwb3NlcyI6IFtdLCAidmVuZG9ycyI6IFtdfQ==";

/// Errors that can occur while building a session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// No language tag was given
    #[error("Language must be provided")]
    MissingLanguage,

    /// The language tag does not look like an IETF language tag
    #[error("Language must match IETF language tag format: '{0}'")]
    InvalidLanguage(String),

    /// The region could not be determined
    #[error("Region must be provided. Either make the language more specific or provide a region")]
    MissingRegion,

    /// The region is neither two letters nor three digits
    #[error("Invalid region code: '{0}'")]
    InvalidRegion(String),
}

/// Static, read-only session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    language: String,
    region: String,
    client_version: String,
    session_id: String,
}

impl Session {
    /// Creates a new session.
    ///
    /// When `region` is `None` the region subtag of `language` is used. If the
    /// language carries no region either, construction fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use imdb_graph::Session;
    ///
    /// let session = Session::new("en-us", None, None).unwrap();
    /// assert_eq!(session.language(), "en-US");
    /// assert_eq!(session.region(), "US");
    /// ```
    pub fn new(
        language: &str,
        region: Option<&str>,
        client_version: Option<&str>,
    ) -> Result<Self, SessionError> {
        let language = language.trim();
        if language.is_empty() {
            return Err(SessionError::MissingLanguage);
        }

        let mut tag = LanguageTag::parse(language)?;

        let region = match region.map(str::trim).filter(|r| !r.is_empty()) {
            Some(region) => {
                if !is_region(region) {
                    return Err(SessionError::InvalidRegion(region.to_string()));
                }
                region.to_ascii_uppercase()
            }
            None => tag.region.clone().ok_or(SessionError::MissingRegion)?,
        };

        if tag.region.is_none() {
            tag.region = Some(region.clone());
        }

        Ok(Self {
            language: tag.to_string(),
            region,
            client_version: client_version
                .unwrap_or(DEFAULT_CLIENT_VERSION)
                .to_string(),
            session_id: generate_session_id(),
        })
    }

    /// The normalised language tag (e.g. `en-US`)
    pub fn language(&self) -> &str {
        &self.language
    }

    /// The upper-case region code (e.g. `US`)
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The client version reported to the API.
    pub fn client_version(&self) -> &str {
        &self.client_version
    }

    /// The randomly generated session id sent as `x-amzn-sessionId`.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Static headers attached to every request of this session.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("user-agent", user_agent(&self.client_version)),
            ("x-amzn-sessionId", self.session_id.clone()),
            ("x-imdb-client-name", "imdb-app-android".to_string()),
            ("x-imdb-client-version", self.client_version.clone()),
            ("x-imdb-consent-info", CONSENT_INFO.to_string()),
            ("x-imdb-user-country", self.region.clone()),
            ("x-imdb-user-language", self.language.clone()),
            ("x-imdb-weblab-search-algorithm", "C".to_string()),
        ]
    }
}

/// A minimally validated `lang[-Script][-REGION]` tag.
struct LanguageTag {
    language: String,
    script: Option<String>,
    region: Option<String>,
}

impl LanguageTag {
    fn parse(tag: &str) -> Result<Self, SessionError> {
        let invalid = || SessionError::InvalidLanguage(tag.to_string());
        let mut parts = tag.split(['-', '_']);

        let language = parts
            .next()
            .filter(|p| (2..=3).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphabetic()))
            .ok_or_else(invalid)?
            .to_ascii_lowercase();

        let mut script = None;
        let mut region = None;

        for part in parts {
            if script.is_none()
                && region.is_none()
                && part.len() == 4
                && part.chars().all(|c| c.is_ascii_alphabetic())
            {
                let mut chars = part.chars();
                let first = chars.next().map(|c| c.to_ascii_uppercase());
                script = Some(
                    first
                        .into_iter()
                        .chain(chars.map(|c| c.to_ascii_lowercase()))
                        .collect(),
                );
            } else if region.is_none() && is_region(part) {
                region = Some(part.to_ascii_uppercase());
            } else {
                return Err(invalid());
            }
        }

        Ok(Self {
            language,
            script,
            region,
        })
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.language)?;
        if let Some(script) = &self.script {
            write!(f, "-{}", script)?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{}", region)?;
        }
        Ok(())
    }
}

fn is_region(part: &str) -> bool {
    (part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        || (part.len() == 3 && part.chars().all(|c| c.is_ascii_digit()))
}

fn user_agent(version: &str) -> String {
    format!(
        "Mozilla/5.0 (Linux; Android 13; sdk_gphone64_arm64 Build/TE1A.220922.028; wv) \
         AppleWebKit/537.36 (KHTML, like Gecko) Version/4.0 Chrome/103.0.5060.71 Mobile \
         Safari/537.36 IMDb/{version} (google|sdk_gphone64_arm64; Android 33; google) \
         IMDb-flg/8.9.8 (1080,2154,440,440) IMDb-var/app-andr-ph"
    )
}

/// Generates a random session id shaped like `123-1234567-1234567`.
///
/// The random part of a fresh ULID is printed as a zero-padded 20 digit
/// number and its last 17 digits are split into groups of 3, 7 and 7.
fn generate_session_id() -> String {
    let random = Ulid::new().random() as u64;
    let digits = format!("{:020}", random);
    let tail = &digits[digits.len() - 17..];
    format!("{}-{}-{}", &tail[..3], &tail[3..10], &tail[10..])
}
