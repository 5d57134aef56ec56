//! Item request service

use std::collections::HashMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        item::Item,
        item_request::{
            CreateItemRequest, ItemRequest, ItemRequestDetails, NewItemRequest, UpdateItemRequest,
        },
        local_now,
    },
    repository::{ItemStore, RequestStore, UserStore},
};

#[derive(Clone)]
pub struct RequestsService {
    requests: Arc<dyn RequestStore>,
    users: Arc<dyn UserStore>,
    items: Arc<dyn ItemStore>,
}

impl RequestsService {
    pub fn new(
        requests: Arc<dyn RequestStore>,
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
    ) -> Self {
        Self {
            requests,
            users,
            items,
        }
    }

    pub async fn create_request(
        &self,
        requestor_id: i64,
        request: CreateItemRequest,
    ) -> AppResult<ItemRequest> {
        request.validate()?;
        self.users.get_by_id(requestor_id).await?;

        let created = self
            .requests
            .create(&NewItemRequest {
                description: request.description,
                requestor_id,
                created: local_now(),
            })
            .await?;

        tracing::info!("User {} created request {}", requestor_id, created.id);
        Ok(created)
    }

    pub async fn update_request(
        &self,
        requestor_id: i64,
        request_id: i64,
        update: UpdateItemRequest,
    ) -> AppResult<ItemRequest> {
        update.validate()?;
        let mut request = self.own_request(requestor_id, request_id).await?;

        request.apply(update);
        let updated = self.requests.update(&request).await?;
        tracing::info!("User {} updated request {}", requestor_id, request_id);
        Ok(updated)
    }

    pub async fn delete_request(&self, requestor_id: i64, request_id: i64) -> AppResult<()> {
        self.own_request(requestor_id, request_id).await?;
        self.requests.delete(request_id).await?;
        tracing::info!("User {} deleted request {}", requestor_id, request_id);
        Ok(())
    }

    /// Request with the items offered for it
    pub async fn get_request(&self, request_id: i64) -> AppResult<ItemRequestDetails> {
        let request = self.requests.get_by_id(request_id).await?;
        let items = self.items.list_by_request(request_id).await?;
        Ok(ItemRequestDetails::new(request, items))
    }

    /// Requests made by a user, newest first
    pub async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        self.users.get_by_id(requestor_id).await?;
        let requests = self.requests.list_by_requestor(requestor_id).await?;
        self.expand(requests).await
    }

    /// Every request, newest first
    pub async fn list_all(&self) -> AppResult<Vec<ItemRequestDetails>> {
        let requests = self.requests.list_all().await?;
        self.expand(requests).await
    }

    async fn own_request(&self, requestor_id: i64, request_id: i64) -> AppResult<ItemRequest> {
        let request = self.requests.get_by_id(request_id).await?;
        if !request.is_requestor(requestor_id) {
            return Err(AppError::Authorization(format!(
                "User {} did not create request {}",
                requestor_id, request_id
            )));
        }
        Ok(request)
    }

    async fn expand(&self, requests: Vec<ItemRequest>) -> AppResult<Vec<ItemRequestDetails>> {
        let ids: Vec<i64> = requests.iter().map(|r| r.id).collect();

        let mut items: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in self.items.list_by_requests(&ids).await? {
            if let Some(request_id) = item.request_id {
                items.entry(request_id).or_default().push(item);
            }
        }

        Ok(requests
            .into_iter()
            .map(|request| {
                let offered = items.remove(&request.id).unwrap_or_default();
                ItemRequestDetails::new(request, offered)
            })
            .collect())
    }
}
