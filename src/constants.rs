pub mod anilist {

    pub const API_URL: &str = "https://graphql.anilist.co";

    pub const USER_AGENT: &str = "Seiyuu/0.1";

    /// Media-list entries per outer page.
    pub const MEDIA_PAGE_SIZE: u32 = 50;

    /// Character edges per inner page, per media entry.
    pub const CHARACTERS_PAGE_SIZE: u32 = 25;

    /// Voice actors are only requested for this language.
    pub const VOICE_ACTOR_LANGUAGE: &str = "JAPANESE";
}

pub mod sync {

    /// Maximum number of page requests in flight during a sync.
    pub const PARALLEL_FETCH_TASKS: usize = 6;
}

pub mod db {

    /// Rows per bulk statement, kept well under SQLite's bound parameter limit.
    pub const WRITE_CHUNK_SIZE: usize = 500;

    /// Ids per `IN (...)` lookup.
    pub const LOOKUP_CHUNK_SIZE: usize = 500;
}
