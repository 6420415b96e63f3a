use storedash_client::CouponsApi;
use storedash_core::{ActiveStatus, Coupon, CouponDraft, CouponStatus, Resource};

use super::{initial_load, surface_validation, PageContext};
use crate::error::SyncError;
use crate::form::FormDialog;
use crate::notice::{LoadState, Notice};
use crate::synchronizer::Synchronizer;

/// Coupon list with a shared add/edit form. Expired coupons are read-only
/// as far as status goes.
pub struct CouponsPage {
    coupons: Synchronizer<CouponsApi>,
    pub form: FormDialog<CouponDraft>,
}

impl CouponsPage {
    pub async fn mount(ctx: &PageContext) -> Self {
        let coupons = Synchronizer::new(CouponsApi::new(ctx.client.clone()));
        initial_load(&coupons).await;
        Self {
            coupons,
            form: FormDialog::new(),
        }
    }

    #[must_use]
    pub fn synchronizer(&self) -> &Synchronizer<CouponsApi> {
        &self.coupons
    }

    #[must_use]
    pub fn items(&self) -> Vec<Coupon> {
        self.coupons.items()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.coupons.load_state()
    }

    /// # Errors
    ///
    /// Returns the fetch error; the previous list is kept.
    pub async fn retry(&self) -> Result<(), SyncError> {
        self.coupons.load().await
    }

    /// Whether the status switch is offered for `id`.
    #[must_use]
    pub fn can_toggle(&self, id: &str) -> bool {
        self.coupons
            .get(id)
            .is_some_and(|c| c.status != CouponStatus::Expired)
    }

    pub fn open_add(&mut self) {
        self.form.open(CouponDraft::default());
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn open_edit(&mut self, id: &str) -> Result<(), SyncError> {
        let coupon = self.coupons.get(id).ok_or_else(|| SyncError::NotFound {
            label: Coupon::LABEL,
            id: id.to_string(),
        })?;
        self.form.edit(id, CouponDraft::from_coupon(&coupon));
        Ok(())
    }

    /// Creates or updates depending on how the form was opened.
    ///
    /// # Errors
    ///
    /// Returns validation or server errors; the form stays open.
    pub async fn submit(&mut self) -> Result<(), SyncError> {
        let sync = &self.coupons;
        let result = self
            .form
            .submit(CouponDraft::validate, |draft, target| async move {
                match target {
                    Some(id) => sync.update(&id, &draft).await,
                    None => sync.create(&draft).await,
                }
            })
            .await;
        surface_validation(sync, result)
    }

    /// # Errors
    ///
    /// Returns [`SyncError::Frozen`] for expired coupons, otherwise see
    /// [`Synchronizer::toggle_status`].
    pub async fn toggle_status(&self, id: &str) -> Result<ActiveStatus, SyncError> {
        self.coupons.toggle_status(id).await
    }

    /// # Errors
    ///
    /// Returns [`SyncError::NotFound`] for an unknown id.
    pub fn request_delete(&self, id: &str) -> Result<(), SyncError> {
        self.coupons.request_delete(id)
    }

    pub fn cancel_delete(&self) {
        self.coupons.cancel_delete();
    }

    /// # Errors
    ///
    /// See [`Synchronizer::confirm_delete`].
    pub async fn confirm_delete(&self) -> Result<(), SyncError> {
        self.coupons.confirm_delete().await
    }

    #[must_use]
    pub fn take_notices(&self) -> Vec<Notice> {
        self.coupons.take_notices()
    }
}

impl Drop for CouponsPage {
    fn drop(&mut self) {
        self.coupons.unmount();
    }
}
