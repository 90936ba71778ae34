//! Fixed persisted queries used by the client.
//!
//! The hashes are opaque cache keys understood only by the remote server and
//! must be sent verbatim.

/// A persisted query identified by its operation name and sha256 hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedQuery {
    /// The GraphQL operation name
    pub name: &'static str,
    /// The sha256 hash the server knows the query document by
    pub hash: &'static str,
}

pub(crate) const TITLE_OVERVIEW: PersistedQuery = PersistedQuery {
    name: "TitleReduxOverviewQuery",
    hash: "416ba392ac33c0dc246ac47df17518f9f5503ecb9e05255bcf90f9bf3fb222e0",
};

pub(crate) const TITLE_GENRES: PersistedQuery = PersistedQuery {
    name: "TitleGenresQuery",
    hash: "4be2fa3fed145fedc77af013e530e63eee8da745e14e5a98177834e4fa53ae08",
};

pub(crate) const TITLE_SEASONS: PersistedQuery = PersistedQuery {
    name: "TitleSeasonsQuery",
    hash: "9377599c1dc364839cf15dba16dbe2557298fe88b95ea10569d648248a6344ab",
};

pub(crate) const EPISODES_BY_SEASON: PersistedQuery = PersistedQuery {
    name: "TitleEpisodesBySeasonQuery",
    hash: "f1f9a6d9d62047e017b7400ec3b7fca4922d5bc37ffbd24a3fa9611856de5980",
};

pub(crate) const TITLES_PERSISTED_METADATA: PersistedQuery = PersistedQuery {
    name: "TitlesPersistedMetadataQuery",
    hash: "000ca09de7daa97c9448aec28685a5f3ef8603f8743c45fe3aa4726c35b90878",
};

pub(crate) const TITLES_NON_PERSISTED_METADATA: PersistedQuery = PersistedQuery {
    name: "TitlesNonPersistedMetadataQuery",
    hash: "e548ae7626f7da936ea67e7c6e96114e37ccb46e38cd9b813ba364a993d30fac",
};
