//! Per-entity service aliases and the lookups the screens use most.

use models::{
    Account, Customer, Loan, LoanProduct, Notification, NotificationPatch, Transaction, User,
};
use uuid::Uuid;

use crate::entity::EntityService;
use crate::errors::ServiceError;
use crate::repository::{ListFilter, Repository};

pub type CustomerService = EntityService<Customer>;
pub type AccountService = EntityService<Account>;
pub type TransactionService = EntityService<Transaction>;
pub type LoanProductService = EntityService<LoanProduct>;
pub type LoanService = EntityService<Loan>;
pub type NotificationService = EntityService<Notification>;
pub type UserService = EntityService<User>;

impl<R: Repository<Account>> EntityService<Account, R> {
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Account>, ServiceError> {
        self.list(ListFilter::new().eq("customer_id", customer_id)).await
    }
}

impl<R: Repository<Loan>> EntityService<Loan, R> {
    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<Loan>, ServiceError> {
        self.list(ListFilter::new().eq("customer_id", customer_id)).await
    }
}

impl<R: Repository<Transaction>> EntityService<Transaction, R> {
    /// Newest first.
    pub async fn list_for_account(&self, account_id: Uuid) -> Result<Vec<Transaction>, ServiceError> {
        self.list(ListFilter::new().eq("account_id", account_id).order_by("created_at", false)).await
    }
}

impl<R: Repository<LoanProduct>> EntityService<LoanProduct, R> {
    pub async fn list_active(&self) -> Result<Vec<LoanProduct>, ServiceError> {
        self.list(ListFilter::new().eq("is_active", true)).await
    }
}

impl<R: Repository<Notification>> EntityService<Notification, R> {
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, ServiceError> {
        self.list(ListFilter::new().eq("user_id", user_id)).await
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, ServiceError> {
        self.update(id, NotificationPatch::read()).await
    }
}
