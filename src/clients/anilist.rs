use super::{MediaListSource, PageRequest, TransportError};
use crate::constants::anilist::{
    API_URL, CHARACTERS_PAGE_SIZE, MEDIA_PAGE_SIZE, USER_AGENT, VOICE_ACTOR_LANGUAGE,
};
use crate::models::{CharacterRole, PersonName, WatchStatus};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One outer page of the user's anime list. Each entry carries one inner page
/// of its character edges.
const MEDIA_LIST_QUERY: &str = r"
query ($username: String, $mediaPage: Int, $charactersPage: Int, $mediaPerPage: Int, $charactersPerPage: Int, $language: StaffLanguage) {
  Page(page: $mediaPage, perPage: $mediaPerPage) {
    pageInfo { total currentPage lastPage hasNextPage perPage }
    mediaList(userName: $username, type: ANIME) {
      id
      mediaId
      status
      score
      media {
        title { romaji english native }
        coverImage { medium color }
        characters(page: $charactersPage, perPage: $charactersPerPage) {
          pageInfo { total currentPage lastPage hasNextPage perPage }
          edges {
            id
            role
            voiceActors(language: $language) {
              id
              name { first last full native alternative }
              image { medium }
              languageV2
            }
            node {
              id
              name { first last full native alternative }
              image { medium }
            }
          }
        }
      }
    }
  }
}
";

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: Variables<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Variables<'a> {
    username: &'a str,
    media_page: u32,
    characters_page: u32,
    media_per_page: u32,
    characters_per_page: u32,
    language: &'a str,
}

#[derive(Deserialize)]
struct GraphQLResponse {
    data: Option<Data>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Deserialize)]
struct Data {
    #[serde(rename = "Page")]
    page: Option<MediaListPage>,
}

/// Response shape for one (media page, characters page) request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListPage {
    pub page_info: PageInfo,
    #[serde(rename = "mediaList", default, deserialize_with = "null_as_default")]
    pub entries: Vec<MediaListEntry>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageInfo {
    pub total: Option<u32>,
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub has_next_page: Option<bool>,
    pub per_page: Option<u32>,
}

impl PageInfo {
    /// Missing page counts are treated as a single page.
    #[must_use]
    pub fn last_page_or_first(&self) -> u32 {
        self.last_page.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaListEntry {
    pub id: i64,
    pub media_id: i64,
    pub status: Option<WatchStatus>,
    pub score: Option<f64>,
    pub media: ApiMedia,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiMedia {
    #[serde(default)]
    pub title: Option<ApiTitle>,
    #[serde(default)]
    pub cover_image: Option<ApiCoverImage>,
    #[serde(default)]
    pub characters: Option<CharacterPage>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiCoverImage {
    pub medium: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPage {
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<CharacterEdge>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEdge {
    pub id: i64,
    pub role: Option<CharacterRole>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub voice_actors: Vec<ApiStaff>,
    pub node: Option<ApiCharacter>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiCharacter {
    pub id: i64,
    #[serde(default)]
    pub name: Option<ApiName>,
    #[serde(default)]
    pub image: Option<ApiImage>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStaff {
    pub id: i64,
    #[serde(default)]
    pub name: Option<ApiName>,
    #[serde(default)]
    pub image: Option<ApiImage>,
    #[serde(rename = "languageV2", default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiName {
    pub first: Option<String>,
    pub last: Option<String>,
    pub full: Option<String>,
    pub native: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub alternative: Vec<String>,
}

impl From<ApiName> for PersonName {
    fn from(name: ApiName) -> Self {
        Self {
            first: name.first,
            last: name.last,
            full: name.full,
            native: name.native,
            alternative: name.alternative,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ApiImage {
    pub medium: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Clone)]
pub struct AnilistClient {
    client: Client,
    api_url: String,
}

impl Default for AnilistClient {
    fn default() -> Self {
        Self::new()
    }
}

impl AnilistClient {
    pub fn new() -> Self {
        Self::with_endpoint(API_URL, USER_AGENT)
    }

    pub fn with_endpoint(api_url: &str, user_agent: &str) -> Self {
        Self {
            client: Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url: api_url.to_string(),
        }
    }

    pub async fn fetch_media_list_page(
        &self,
        request: &PageRequest,
    ) -> Result<MediaListPage, TransportError> {
        debug!(
            username = %request.username,
            media_page = request.media_page,
            characters_page = request.characters_page,
            "Fetching media list page"
        );

        let request_body = GraphQLRequest {
            query: MEDIA_LIST_QUERY,
            variables: Variables {
                username: &request.username,
                media_page: request.media_page,
                characters_page: request.characters_page,
                media_per_page: MEDIA_PAGE_SIZE,
                characters_per_page: CHARACTERS_PAGE_SIZE,
                language: VOICE_ACTOR_LANGUAGE,
            },
        };

        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body: GraphQLResponse = match response.json().await {
            Ok(body) => body,
            Err(_) if !status.is_success() => {
                return Err(TransportError::Status(status.as_u16()));
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(errors) = body.errors.filter(|errors| !errors.is_empty()) {
            let message = errors
                .into_iter()
                .map(|e| e.message)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(TransportError::GraphQL {
                status: status.as_u16(),
                message,
            });
        }

        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        body.data
            .and_then(|d| d.page)
            .ok_or(TransportError::MissingData)
    }
}

#[async_trait::async_trait]
impl MediaListSource for AnilistClient {
    async fn fetch_page(&self, request: &PageRequest) -> Result<MediaListPage, TransportError> {
        self.fetch_media_list_page(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_with_nulls() {
        let json = r##"{
            "data": {
                "Page": {
                    "pageInfo": { "total": 2, "currentPage": 1, "lastPage": 1, "hasNextPage": false, "perPage": 50 },
                    "mediaList": [{
                        "id": 10,
                        "mediaId": 154587,
                        "status": "COMPLETED",
                        "score": 9.5,
                        "media": {
                            "title": { "romaji": "Sousou no Frieren", "english": "Frieren", "native": null },
                            "coverImage": { "medium": "https://img/1.jpg", "color": "#aabbcc" },
                            "characters": {
                                "pageInfo": { "lastPage": 3 },
                                "edges": [{
                                    "id": 100,
                                    "role": "MAIN",
                                    "voiceActors": null,
                                    "node": {
                                        "id": 1,
                                        "name": { "first": "Frieren", "last": null, "full": "Frieren", "native": null, "alternative": null },
                                        "image": { "medium": null }
                                    }
                                }]
                            }
                        }
                    }]
                }
            }
        }"##;

        let response: GraphQLResponse = serde_json::from_str(json).unwrap();
        let page = response.data.and_then(|d| d.page).unwrap();

        assert_eq!(page.page_info.last_page_or_first(), 1);
        let entry = &page.entries[0];
        assert_eq!(entry.status, Some(WatchStatus::Completed));

        let characters = entry.media.characters.as_ref().unwrap();
        assert_eq!(characters.page_info.last_page_or_first(), 3);
        assert!(characters.edges[0].voice_actors.is_empty());
        assert_eq!(
            characters.edges[0].node.as_ref().unwrap().name.as_ref().unwrap().alternative,
            Vec::<String>::new()
        );
    }

    #[test]
    fn missing_last_page_means_one_page() {
        let info = PageInfo {
            last_page: Some(0),
            ..PageInfo::default()
        };
        assert_eq!(info.last_page_or_first(), 1);
        assert_eq!(PageInfo::default().last_page_or_first(), 1);
    }
}
