//! Coupon endpoints.

use reqwest::Method;
use serde_json::json;
use storedash_core::{decode_collection, ActiveStatus, Coupon, CouponDraft};

use crate::backend::{
    Confirmation, CreateBackend, DeleteBackend, ResourceBackend, StatusBackend, UpdateBackend,
};
use crate::client::{shape_error, AdminClient};
use crate::error::ApiError;
use crate::routes;

/// Backend for `/api/coupons`. Every mutation reloads the list, since the
/// server may recompute `status` (for example on an expired end date).
#[derive(Debug, Clone)]
pub struct CouponsApi {
    client: AdminClient,
}

impl CouponsApi {
    #[must_use]
    pub fn new(client: AdminClient) -> Self {
        Self { client }
    }
}

impl ResourceBackend for CouponsApi {
    type Resource = Coupon;

    async fn list(&self) -> Result<Vec<Coupon>, ApiError> {
        let body = self.client.get_json(routes::COUPONS).await?;
        decode_collection(body, &["coupons", "data"]).map_err(shape_error(routes::COUPONS))
    }
}

impl CreateBackend for CouponsApi {
    type Draft = CouponDraft;

    async fn create(&self, draft: &CouponDraft) -> Result<Confirmation<Coupon>, ApiError> {
        self.client
            .send_json(Method::POST, routes::CREATE_COUPON, draft)
            .await?;
        Ok(Confirmation::Reload)
    }
}

impl UpdateBackend for CouponsApi {
    type Patch = CouponDraft;

    async fn update(
        &self,
        current: &Coupon,
        patch: &CouponDraft,
    ) -> Result<Confirmation<Coupon>, ApiError> {
        self.client
            .send_json(Method::PUT, &routes::coupon(&current.id), patch)
            .await?;
        Ok(Confirmation::Reload)
    }
}

impl DeleteBackend for CouponsApi {
    async fn delete(&self, current: &Coupon) -> Result<(), ApiError> {
        self.client.delete(&routes::coupon(&current.id), 0).await
    }
}

impl StatusBackend for CouponsApi {
    async fn set_status(
        &self,
        current: &Coupon,
        status: ActiveStatus,
    ) -> Result<Confirmation<ActiveStatus>, ApiError> {
        self.client
            .send_json(
                Method::PATCH,
                &routes::coupon_status(&current.id),
                &json!({ "status": status }),
            )
            .await?;
        Ok(Confirmation::Reload)
    }
}
