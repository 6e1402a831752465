use std::env;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use url::Url;

use study_core::model::{CardId, StudentId, Subject, SubjectDraft, SubjectId};

use crate::store::{CardRecord, CardStore, NewCardRecord, StoreError, SubjectStore};
use crate::wire::{DeckDto, DeckPayload, Envelope, FlashcardDto, FlashcardPayload};

/// Connection settings for the flashcard backend.
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    pub base_url: Url,
    /// Sent as `Authorization: Token <value>` when present.
    pub auth_token: Option<String>,
    /// Sent as `X-CSRFToken` on mutating requests when present.
    pub csrf_token: Option<String>,
}

impl RemoteConfig {
    /// Reads the configuration from the environment.
    ///
    /// `STUDY_API_URL` defaults to the local development backend;
    /// `STUDY_AUTH_TOKEN` and `STUDY_CSRF_TOKEN` are optional.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` when `STUDY_API_URL` is not a valid URL.
    pub fn from_env() -> Result<Self, url::ParseError> {
        let raw = env::var("STUDY_API_URL")
            .unwrap_or_else(|_| "http://localhost:8002/api/".into());
        let base_url = Url::parse(&raw)?;
        Ok(Self {
            base_url,
            auth_token: env::var("STUDY_AUTH_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            csrf_token: env::var("STUDY_CSRF_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

/// The reqwest-backed store talking to the deck/flashcard REST API.
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    config: RemoteConfig,
}

impl HttpStore {
    #[must_use]
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.auth_token {
            Some(token) => request.header("Authorization", format!("Token {token}")),
            None => request,
        }
    }

    fn with_csrf(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.csrf_token {
            Some(token) => request.header("X-CSRFToken", token),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        operation: &'static str,
    ) -> Result<Response, StoreError> {
        let response = request
            .send()
            .await
            .map_err(|err| StoreError::Unreachable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(operation, status = status.as_u16(), "backend rejected request");
            return Err(StoreError::Rejected {
                operation,
                status: status.as_u16(),
            });
        }

        tracing::debug!(operation, status = status.as_u16(), "backend request ok");
        Ok(response)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: Response,
        operation: &'static str,
    ) -> Result<Option<T>, StoreError> {
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let envelope: Envelope<T> =
            response.json().await.map_err(|err| StoreError::Decode {
                operation,
                detail: err.to_string(),
            })?;
        Ok(envelope.data)
    }
}

#[async_trait]
impl SubjectStore for HttpStore {
    async fn list_subjects(&self, owner: StudentId) -> Result<Vec<Subject>, StoreError> {
        let operation = "list subjects";
        let url = self.config.endpoint(&format!("decks/student/{owner}/"));
        let response = self.send(self.authorized(self.client.get(url)), operation).await?;

        // A missing `data` key means the student has no decks yet.
        let decks: Vec<DeckDto> = Self::decode(response, operation).await?.unwrap_or_default();
        decks
            .into_iter()
            .map(|dto| {
                dto.into_subject().map_err(|err| StoreError::Decode {
                    operation,
                    detail: err.to_string(),
                })
            })
            .collect()
    }

    async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, StoreError> {
        let operation = "create subject";
        let url = self.config.endpoint("decks/create/");
        let request = self
            .with_csrf(self.authorized(self.client.post(url)))
            .json(&DeckPayload::from_draft(draft));
        let response = self.send(request, operation).await?;

        let dto: DeckDto = Self::decode(response, operation)
            .await?
            .ok_or(StoreError::NotFound { operation })?;
        dto.into_subject().map_err(|err| StoreError::Decode {
            operation,
            detail: err.to_string(),
        })
    }

    async fn delete_subject(&self, id: SubjectId) -> Result<(), StoreError> {
        let operation = "delete subject";
        let url = self.config.endpoint(&format!("decks/delete/{id}/"));
        self.send(self.authorized(self.client.delete(url)), operation)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CardStore for HttpStore {
    async fn list_cards(&self, subject: SubjectId) -> Result<Vec<CardRecord>, StoreError> {
        let operation = "list cards";
        let url = self.config.endpoint(&format!("flashcards/deck/{subject}/"));
        let response = self.send(self.authorized(self.client.get(url)), operation).await?;

        let cards: Vec<FlashcardDto> =
            Self::decode(response, operation).await?.unwrap_or_default();
        Ok(cards.into_iter().map(FlashcardDto::into_record).collect())
    }

    async fn create_card(&self, record: &NewCardRecord) -> Result<CardRecord, StoreError> {
        let operation = "create card";
        let url = self.config.endpoint("flashcards/create/");
        let request = self
            .with_csrf(self.authorized(self.client.post(url)))
            .json(&FlashcardPayload::from_record(record));
        let response = self.send(request, operation).await?;

        let dto: FlashcardDto = Self::decode(response, operation)
            .await?
            .ok_or(StoreError::NotFound { operation })?;
        Ok(dto.into_record())
    }

    async fn update_card(
        &self,
        id: CardId,
        record: &NewCardRecord,
    ) -> Result<CardRecord, StoreError> {
        let operation = "update card";
        let url = self.config.endpoint(&format!("flashcards/update/{id}/"));
        let request = self
            .with_csrf(self.authorized(self.client.put(url)))
            .json(&FlashcardPayload::from_record(record));
        let response = self.send(request, operation).await?;

        let dto: FlashcardDto = Self::decode(response, operation)
            .await?
            .ok_or(StoreError::NotFound { operation })?;
        Ok(dto.into_record())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), StoreError> {
        let operation = "delete card";
        let url = self.config.endpoint(&format!("flashcards/delete/{id}/"));
        self.send(self.authorized(self.client.delete(url)), operation)
            .await?;
        Ok(())
    }
}
