use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde::de::DeserializeOwned;

use crate::api::note::NoteUpdate;
use crate::api::{NetworkError, Note, NoteDraft};

/// Path of the notes resource, appended to the configured base url
const NOTES_PATH: [&str; 2] = ["api", "notes"];

/// The four operations of the notes resource.
///
/// Each call is a single round trip: no retries, no caching, no timeouts.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Note>, NetworkError>;

    async fn create(&self, draft: &NoteDraft) -> Result<Note, NetworkError>;

    async fn update(&self, id: &str, draft: &NoteDraft) -> Result<Note, NetworkError>;

    async fn remove(&self, id: &str) -> Result<(), NetworkError>;
}

pub struct HttpNotesApi {
    client: Client,
    endpoint: Url,
}

impl HttpNotesApi {
    /// Build a client for the notes resource under `base_url`
    /// (`http://host:3000` becomes `http://host:3000/api/notes`).
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        let invalid = |reason: String| NetworkError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };

        let mut endpoint = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", endpoint.scheme())));
        }
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        endpoint
            .path_segments_mut()
            .map_err(|()| invalid("url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(NOTES_PATH);

        let client = Client::builder()
            .user_agent(concat!("noteboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(HttpNotesApi { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn note_url(&self, id: &str) -> Url {
        let mut url = self.endpoint.clone();
        // `new` already rejected cannot-be-a-base urls
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    fn check(method: &'static str, response: Response) -> Result<Response, NetworkError> {
        let status = response.status();
        if status.is_success() || status.is_redirection() {
            Ok(response)
        } else {
            Err(NetworkError::Status {
                method,
                url: response.url().to_string(),
                status: status.as_u16(),
            })
        }
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, NetworkError> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl NotesApi for HttpNotesApi {
    async fn list(&self) -> Result<Vec<Note>, NetworkError> {
        tracing::debug!(url = %self.endpoint, "GET notes");
        let response = self
            .client
            .request(Method::GET, self.endpoint.clone())
            .send()
            .await?;
        let notes: Vec<Note> = Self::decode(Self::check("GET", response)?).await?;
        tracing::debug!(count = notes.len(), "listed notes");
        Ok(notes)
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, NetworkError> {
        tracing::debug!(url = %self.endpoint, "POST note");
        let response = self
            .client
            .request(Method::POST, self.endpoint.clone())
            .json(draft)
            .send()
            .await?;
        Self::decode(Self::check("POST", response)?).await
    }

    async fn update(&self, id: &str, draft: &NoteDraft) -> Result<Note, NetworkError> {
        let url = self.note_url(id);
        tracing::debug!(%url, "PUT note");
        let body = NoteUpdate {
            id,
            title: &draft.title,
            content: &draft.content,
        };
        let response = self
            .client
            .request(Method::PUT, url)
            .json(&body)
            .send()
            .await?;
        Self::decode(Self::check("PUT", response)?).await
    }

    async fn remove(&self, id: &str) -> Result<(), NetworkError> {
        let url = self.note_url(id);
        tracing::debug!(%url, "DELETE note");
        let response = self.client.request(Method::DELETE, url).send().await?;
        Self::check("DELETE", response)?;
        Ok(())
    }
}
