use std::sync::Arc;

use backend::{Backend, BackendClient};

use crate::dashboard::DashboardService;
use crate::entities::{
    AccountService, CustomerService, LoanProductService, LoanService, NotificationService, TransactionService,
    UserService,
};
use crate::entity::EntityService;
use crate::repository::BackendRepository;

/// Every service, built over one injected backend handle.
#[derive(Clone)]
pub struct Api {
    pub customers: CustomerService,
    pub accounts: AccountService,
    pub transactions: TransactionService,
    pub loan_products: LoanProductService,
    pub loans: LoanService,
    pub notifications: NotificationService,
    pub users: UserService,
    pub dashboard: DashboardService,
}

impl Api {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        let client = BackendClient::new(backend);
        Self {
            customers: service(&client),
            accounts: service(&client),
            transactions: service(&client),
            loan_products: service(&client),
            loans: service(&client),
            notifications: service(&client),
            users: service(&client),
            dashboard: DashboardService::new(client),
        }
    }
}

fn service<E: models::Record>(client: &BackendClient) -> EntityService<E> {
    EntityService::new(Arc::new(BackendRepository::new(client.clone())))
}
